// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use time::Date;

use crate::{Field, FieldWrite, Priority, Record, RecordId, TaskStatus, seed_records};

/// Outcome of [`RecordStore::update_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { old: String },
    Missing,
    Rejected,
}

/// Ordered in-memory list of task records. Order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self::with_records(seed_records())
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn value(&self, id: RecordId, field: Field) -> Option<String> {
        self.get(id).map(|record| record.value(field))
    }

    /// Records on page `page` when the list is split into pages of `size`.
    pub fn page(&self, page: usize, size: usize) -> &[Record] {
        if size == 0 {
            return &self.records;
        }
        let start = page.saturating_mul(size).min(self.records.len());
        let end = start.saturating_add(size).min(self.records.len());
        &self.records[start..end]
    }

    pub fn next_id(&self) -> RecordId {
        self.records
            .iter()
            .map(|record| record.id)
            .max()
            .map_or(RecordId::new(1), RecordId::next)
    }

    pub fn add_record(&mut self, today: Date) -> RecordId {
        let id = self.next_id();
        self.records.push(Record::placeholder(id, today));
        id
    }

    pub fn delete_record(&mut self, id: RecordId) -> Option<Record> {
        let index = self.position(id)?;
        Some(self.records.remove(index))
    }

    pub fn update_field(&mut self, id: RecordId, field: Field, value: &str) -> UpdateOutcome {
        let Some(record) = self.records.iter_mut().find(|record| record.id == id) else {
            return UpdateOutcome::Missing;
        };
        match record.write(field, value) {
            FieldWrite::Written { old } => UpdateOutcome::Updated { old },
            FieldWrite::Rejected => UpdateOutcome::Rejected,
        }
    }

    /// Sets the status and returns the previous one.
    pub fn set_status(&mut self, id: RecordId, status: TaskStatus) -> Option<TaskStatus> {
        let record = self.records.iter_mut().find(|record| record.id == id)?;
        Some(std::mem::replace(&mut record.status, status))
    }

    /// Sets the priority and returns the previous one.
    pub fn set_priority(&mut self, id: RecordId, priority: Priority) -> Option<Priority> {
        let record = self.records.iter_mut().find(|record| record.id == id)?;
        Some(std::mem::replace(&mut record.priority, priority))
    }

    /// Stable ascending sort on job request text.
    pub fn sort_by_job_request(&mut self) {
        self.records
            .sort_by(|left, right| compare_text(&left.job_request, &right.job_request));
    }
}

/// Case-insensitive comparison. Text that only differs by case puts
/// lowercase first at the first differing character, so "apple" sorts
/// before "Apple" and both before "Banana".
fn compare_text(left: &str, right: &str) -> Ordering {
    let folded = left
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase));
    folded.then_with(|| {
        left.chars()
            .map(|ch| (ch.is_uppercase(), ch))
            .cmp(right.chars().map(|ch| (ch.is_uppercase(), ch)))
    })
}
