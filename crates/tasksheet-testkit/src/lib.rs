// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::PathBuf;
use tasksheet_app::{
    AppCommand, AppState, BufferEdit, CellRef, Direction, Field, LayoutMode, Priority, Record,
    RecordId, RecordStore, TabKind, TaskStatus,
};
use time::Date;
use time::macros::date;

const JOB_VERBS: [&str; 10] = [
    "Launch", "Update", "Finalize", "Design", "Prepare", "Review", "Draft", "Audit", "Plan",
    "Migrate",
];

const JOB_SUBJECTS: [&str; 10] = [
    "press kit",
    "social media campaign",
    "financial report",
    "onboarding flow",
    "vendor contracts",
    "website features",
    "user testing feedback",
    "quarterly roadmap",
    "pricing page",
    "support playbook",
];

const FIRST_NAMES: [&str; 12] = [
    "Alisha", "Irfan", "Mark", "Emily", "Jessica", "Sophie", "Tejas", "Rachel", "Tom", "Kevin",
    "Avery", "Rowan",
];

const LAST_NAMES: [&str; 12] = [
    "Patel",
    "Khan",
    "Johnson",
    "Green",
    "Brown",
    "Choudhury",
    "Pandey",
    "Lee",
    "Wright",
    "Smith",
    "Walker",
    "Reed",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for task records and command streams.
#[derive(Debug, Clone)]
pub struct TaskFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl TaskFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// Job request text drawn from a small pool so sorts see ties.
    pub fn job_request(&mut self) -> String {
        let verb = self.pick(&JOB_VERBS);
        let subject = self.pick(&JOB_SUBJECTS[..4]);
        if self.rng.int_n(4) == 0 {
            format!("{} {subject}", verb.to_ascii_lowercase())
        } else {
            format!("{verb} {subject}")
        }
    }

    pub fn person(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    pub fn record(&mut self, id: RecordId) -> Record {
        let submitter = self.person();
        let submitter_url = format!(
            "www.{}...",
            submitter
                .split_whitespace()
                .collect::<String>()
                .to_ascii_lowercase()
        );
        Record {
            id,
            job_request: self.job_request(),
            submitted: self.sheet_date(),
            status: TaskStatus::ALL[self.rng.int_n(TaskStatus::ALL.len())],
            submitter,
            submitter_url,
            assigned: self.person(),
            priority: Priority::ALL[self.rng.int_n(Priority::ALL.len())],
            due_date: self.sheet_date(),
            est_value: format!("{},000 ₹", self.rng.int_n(9_000) + 1),
        }
    }

    /// Records with strictly increasing ids, sometimes with gaps.
    pub fn records(&mut self, count: usize) -> Vec<Record> {
        let mut next = 1_i64;
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(self.record(RecordId::new(next)));
            next += 1 + self.rng.int_n(3) as i64;
        }
        records
    }

    pub fn store(&mut self, count: usize) -> RecordStore {
        RecordStore::with_records(self.records(count))
    }

    pub fn field(&mut self) -> Field {
        Field::ALL[self.rng.int_n(Field::ALL.len())]
    }

    /// A cell on an existing row most of the time, a dangling one otherwise.
    pub fn cell(&mut self, store: &RecordStore) -> CellRef {
        let field = self.field();
        if store.is_empty() || self.rng.int_n(8) == 0 {
            return CellRef::new(RecordId::new(1_000 + self.rng.int_n(50) as i64), field);
        }
        let record = &store.records()[self.rng.int_n(store.len())];
        CellRef::new(record.id, field)
    }

    pub fn direction(&mut self) -> Direction {
        match self.rng.int_n(4) {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }

    /// One random command that makes sense against `state`.
    pub fn command(&mut self, state: &AppState) -> AppCommand {
        match self.rng.int_n(22) {
            0 | 1 => AppCommand::SelectCell(self.cell(&state.store)),
            2 => AppCommand::ActivateCell(self.cell(&state.store)),
            3 => AppCommand::Confirm,
            4 => AppCommand::Cancel,
            5 => AppCommand::Blur,
            6 => AppCommand::EditBuffer(BufferEdit::Insert(
                (b'a' + self.rng.int_n(26) as u8) as char,
            )),
            7 => AppCommand::EditBuffer(BufferEdit::Backspace),
            8..=10 => AppCommand::Navigate(self.direction()),
            11 => AppCommand::ClearCell,
            12 => AppCommand::AddRecord,
            13 => AppCommand::DeleteSelected,
            14 => AppCommand::DeleteRecord(self.cell(&state.store).record),
            15 => AppCommand::SortByJobRequest,
            16 => AppCommand::SetStatus(
                self.cell(&state.store).record,
                TaskStatus::ALL[self.rng.int_n(TaskStatus::ALL.len())],
            ),
            17 => AppCommand::SetPriority(
                self.cell(&state.store).record,
                Priority::ALL[self.rng.int_n(Priority::ALL.len())],
            ),
            18 => AppCommand::ToggleColumn(self.field()),
            19 => AppCommand::SelectTab(TabKind::ALL[self.rng.int_n(TabKind::ALL.len())]),
            20 => AppCommand::SetLayout(if self.rng.bool() {
                LayoutMode::Wide
            } else {
                LayoutMode::Narrow
            }),
            _ => {
                if self.rng.bool() {
                    AppCommand::NextPage
                } else {
                    AppCommand::PrevPage
                }
            }
        }
    }

    fn sheet_date(&mut self) -> String {
        format!(
            "{:02}-{:02}-{}",
            self.rng.int_n(28) + 1,
            self.rng.int_n(12) + 1,
            2024 + self.rng.int_n(2)
        )
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn fixture_date() -> Date {
    date!(2026 - 02 - 19)
}

pub fn seeded_state() -> AppState {
    AppState::seeded(fixture_date())
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}

pub fn cell(id: i64, field: Field) -> CellRef {
    CellRef::new(RecordId::new(id), field)
}
