// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use tasksheet_app::{Field, RecordId, RecordStore, UpdateOutcome};
use tasksheet_testkit::{TaskFaker, fixture_date};

fn ids(store: &RecordStore) -> Vec<i64> {
    store.records().iter().map(|record| record.id.get()).collect()
}

#[test]
fn seeded_add_delete_sort_walkthrough() {
    let mut store = RecordStore::seeded();
    assert_eq!(ids(&store), vec![1, 2, 3, 4, 5]);

    assert_eq!(store.add_record(fixture_date()), RecordId::new(6));
    assert!(store.delete_record(RecordId::new(3)).is_some());
    assert_eq!(ids(&store), vec![1, 2, 4, 5, 6]);

    store.sort_by_job_request();
    let titles = store
        .records()
        .iter()
        .map(|record| record.job_request.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        titles,
        vec![
            "Design new features for the website",
            "Launch social media campaign for pro...",
            "New task...",
            "Prepare financial report for Q4",
            "Update press kit for company redesign",
        ]
    );
}

#[test]
fn added_ids_exceed_every_existing_id() {
    for seed in 1..=25 {
        let mut faker = TaskFaker::new(seed);
        let count = faker.int_n(12);
        let mut store = faker.store(count);
        let before = store.len();
        let max = store.records().iter().map(|record| record.id).max();

        let id = store.add_record(fixture_date());

        assert_eq!(store.len(), before + 1, "seed {seed}");
        assert!(max.is_none_or(|max| id > max), "seed {seed}");
        assert_eq!(store.records().last().map(|record| record.id), Some(id));
    }
}

#[test]
fn empty_store_starts_ids_at_one() {
    let mut store = RecordStore::new();
    assert_eq!(store.add_record(fixture_date()), RecordId::new(1));
    assert_eq!(store.add_record(fixture_date()), RecordId::new(2));
}

#[test]
fn deleting_the_highest_id_lets_it_be_reused() {
    let mut store = RecordStore::seeded();
    store.delete_record(RecordId::new(5));
    assert_eq!(store.add_record(fixture_date()), RecordId::new(5));
}

#[test]
fn update_takes_effect_only_for_existing_ids() {
    for seed in 1..=25 {
        let mut faker = TaskFaker::new(seed);
        let mut store = faker.store(8);
        for _ in 0..30 {
            let cell = faker.cell(&store);
            let existed = store.contains(cell.record);
            let before = store.clone();

            let outcome = store.update_field(cell.record, cell.field, "Edited");

            if !existed {
                assert_eq!(outcome, UpdateOutcome::Missing);
                assert_eq!(store, before);
            } else if cell.field.is_enum() {
                assert_eq!(outcome, UpdateOutcome::Rejected);
                assert_eq!(store, before);
            } else {
                assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
                assert_eq!(
                    store.value(cell.record, cell.field).as_deref(),
                    Some("Edited")
                );
                assert_eq!(store.len(), before.len());
            }
        }
    }
}

#[test]
fn enum_columns_accept_known_labels_in_any_case() {
    let mut store = RecordStore::seeded();
    let outcome = store.update_field(RecordId::new(1), Field::Status, "blocked");
    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            old: "In-process".to_owned()
        }
    );
    assert_eq!(
        store.value(RecordId::new(1), Field::Status).as_deref(),
        Some("Blocked")
    );
}

#[test]
fn delete_is_idempotent() {
    for seed in 1..=25 {
        let mut faker = TaskFaker::new(seed);
        let mut store = faker.store(10);
        let target = faker.cell(&store).record;

        store.delete_record(target);
        let after_first = store.clone();
        assert!(store.delete_record(target).is_none());
        assert_eq!(store, after_first);
        assert!(!store.contains(target));
    }
}

#[test]
fn sort_is_idempotent_and_stable() {
    for seed in 1..=25 {
        let mut store = TaskFaker::new(seed).store(30);
        let original = store.records().to_vec();

        store.sort_by_job_request();
        let once = store.clone();
        store.sort_by_job_request();
        assert_eq!(store, once, "seed {seed}");

        let titles = original
            .iter()
            .map(|record| record.job_request.clone())
            .collect::<BTreeSet<_>>();
        for title in titles {
            let before = original
                .iter()
                .filter(|record| record.job_request == title)
                .map(|record| record.id)
                .collect::<Vec<_>>();
            let after = store
                .records()
                .iter()
                .filter(|record| record.job_request == title)
                .map(|record| record.id)
                .collect::<Vec<_>>();
            assert_eq!(before, after, "seed {seed}, title {title}");
        }
    }
}

#[test]
fn sort_folds_case_before_comparing() {
    let mut store = TaskFaker::new(7).store(40);
    store.sort_by_job_request();
    for pair in store.records().windows(2) {
        let left = pair[0].job_request.to_lowercase();
        let right = pair[1].job_request.to_lowercase();
        assert!(left <= right, "{left:?} sorted after {right:?}");
    }
}

#[test]
fn narrow_pages_cover_every_record_once() {
    let store = TaskFaker::new(3).store(8);
    let mut seen = Vec::new();
    for page in 0..3 {
        seen.extend(store.page(page, 3).iter().map(|record| record.id));
    }
    assert_eq!(seen.len(), 8);
    assert!(store.page(3, 3).is_empty());
    assert_eq!(store.page(0, 0).len(), 8);
}
