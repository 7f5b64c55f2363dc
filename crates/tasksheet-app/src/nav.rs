// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{CellRef, Field, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub fn visible_fields(hidden: &BTreeSet<Field>) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|field| !hidden.contains(field))
        .collect()
}

/// Nearest visible field to `field`, preferring the next one to the right.
pub fn coerce_visible_field(hidden: &BTreeSet<Field>, field: Field) -> Option<Field> {
    if !hidden.contains(&field) {
        return Some(field);
    }
    let index = field.index();
    Field::ALL[index..]
        .iter()
        .chain(Field::ALL[..index].iter().rev())
        .copied()
        .find(|candidate| !hidden.contains(candidate))
}

/// Moves `from` one step in `direction`, clamped to the edges of the
/// store and the visible columns. Returns `from` when nothing moves.
pub fn step(
    store: &RecordStore,
    hidden: &BTreeSet<Field>,
    from: CellRef,
    direction: Direction,
) -> CellRef {
    match direction {
        Direction::Up | Direction::Down => {
            let Some(row) = store.position(from.record) else {
                return from;
            };
            let next = match direction {
                Direction::Up => row.saturating_sub(1),
                _ => row.saturating_add(1).min(store.len().saturating_sub(1)),
            };
            store
                .records()
                .get(next)
                .map_or(from, |record| from.with_record(record.id))
        }
        Direction::Left | Direction::Right => {
            let visible = visible_fields(hidden);
            let Some(column) = visible.iter().position(|field| *field == from.field) else {
                return coerce_visible_field(hidden, from.field)
                    .map_or(from, |field| from.with_field(field));
            };
            let next = match direction {
                Direction::Left => column.saturating_sub(1),
                _ => column.saturating_add(1).min(visible.len().saturating_sub(1)),
            };
            from.with_field(visible[next])
        }
    }
}
