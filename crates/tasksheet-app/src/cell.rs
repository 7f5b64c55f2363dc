// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Field, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub record: RecordId,
    pub field: Field,
}

impl CellRef {
    pub const fn new(record: RecordId, field: Field) -> Self {
        Self { record, field }
    }

    pub const fn with_field(self, field: Field) -> Self {
        Self {
            record: self.record,
            field,
        }
    }

    pub const fn with_record(self, record: RecordId) -> Self {
        Self {
            record,
            field: self.field,
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.record, self.field.key())
    }
}

/// Selection and edit state of the grid. Only one cell is ever active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Idle,
    Selected(CellRef),
    Editing {
        cell: CellRef,
        buffer: String,
    },
}

impl CellState {
    /// The active cell, whether selected or being edited.
    pub fn cell(&self) -> Option<CellRef> {
        match self {
            Self::Idle => None,
            Self::Selected(cell) | Self::Editing { cell, .. } => Some(*cell),
        }
    }

    pub fn selected(&self) -> Option<CellRef> {
        match self {
            Self::Selected(cell) => Some(*cell),
            _ => None,
        }
    }

    pub fn editing(&self) -> Option<(CellRef, &str)> {
        match self {
            Self::Editing { cell, buffer } => Some((*cell, buffer.as_str())),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn references(&self, record: RecordId) -> bool {
        self.cell().is_some_and(|cell| cell.record == record)
    }
}

/// Mutation applied to an open edit buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferEdit {
    Insert(char),
    Backspace,
    Replace(String),
}

impl BufferEdit {
    pub fn apply(&self, buffer: &mut String) {
        match self {
            Self::Insert(ch) => buffer.push(*ch),
            Self::Backspace => {
                buffer.pop();
            }
            Self::Replace(text) => text.clone_into(buffer),
        }
    }
}
