// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

use crate::{AppEvent, CellRef, Field, RecordId};

/// Flat diagnostic view of an [`AppEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    pub action: &'static str,
    pub record: Option<RecordId>,
    pub field: Option<Field>,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl Trace {
    fn action(action: &'static str) -> Self {
        Self {
            action,
            record: None,
            field: None,
            old: None,
            new: None,
        }
    }

    fn at(action: &'static str, cell: CellRef) -> Self {
        Self {
            record: Some(cell.record),
            field: Some(cell.field),
            ..Self::action(action)
        }
    }

    fn row(action: &'static str, record: RecordId) -> Self {
        Self {
            record: Some(record),
            ..Self::action(action)
        }
    }

    fn change(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.old = Some(old.into());
        self.new = Some(new.into());
        self
    }
}

impl AppEvent {
    pub fn trace(&self) -> Trace {
        match self {
            Self::CellSelected(cell) => Trace::at("cell selected", *cell),
            Self::SelectionCleared => Trace::action("selection cleared"),
            Self::EditStarted { cell, value } => Trace {
                old: Some(value.clone()),
                ..Trace::at("edit started", *cell)
            },
            Self::EditCommitted { cell, old, new } => {
                Trace::at("edit committed", *cell).change(old, new)
            }
            Self::EditCancelled(cell) => Trace::at("edit cancelled", *cell),
            Self::FieldUpdated { cell, old, new } => {
                Trace::at("field updated", *cell).change(old, new)
            }
            Self::UpdateRejected { cell, value } => Trace {
                new: Some(value.clone()),
                ..Trace::at("update rejected", *cell)
            },
            Self::CellCleared { cell, old } => Trace::at("cell cleared", *cell).change(old, ""),
            Self::Navigated {
                direction,
                from,
                to,
            } => Trace {
                old: Some(from.to_string()),
                new: Some(to.to_string()),
                ..Trace::at(navigated_action(*direction), *to)
            },
            Self::NavigationClamped { direction, cell } => {
                let mut trace = Trace::at(navigated_action(*direction), *cell);
                trace.old = Some(cell.to_string());
                trace.new = Some(cell.to_string());
                trace
            }
            Self::RecordAdded(id) => Trace::row("row added", *id),
            Self::RecordDeleted(id) => Trace::row("row deleted", *id),
            Self::RecordMissing(id) => Trace::row("row missing", *id),
            Self::RecordsSorted => Trace::action("rows sorted"),
            Self::StatusChanged { record, old, new } => Trace {
                field: Some(Field::Status),
                ..Trace::row("status changed", *record)
            }
            .change(old.as_str(), new.as_str()),
            Self::PriorityChanged { record, old, new } => Trace {
                field: Some(Field::Priority),
                ..Trace::row("priority changed", *record)
            }
            .change(old.as_str(), new.as_str()),
            Self::ColumnHidden(field) => Trace {
                field: Some(*field),
                ..Trace::action("column hidden")
            },
            Self::ColumnShown(field) => Trace {
                field: Some(*field),
                ..Trace::action("column shown")
            },
            Self::ColumnsShown => Trace::action("columns shown"),
            Self::TabChanged(tab) => Trace {
                new: Some(tab.label().to_owned()),
                ..Trace::action("tab changed")
            },
            Self::LayoutChanged(layout) => Trace {
                new: Some(layout.label().to_owned()),
                ..Trace::action("layout changed")
            },
            Self::PageChanged { page, total } => Trace {
                new: Some(format!("{}/{}", page + 1, total)),
                ..Trace::action("page changed")
            },
            Self::StatusUpdated(message) => Trace {
                new: Some(message.clone()),
                ..Trace::action("status updated")
            },
            Self::StatusCleared => Trace::action("status cleared"),
        }
    }
}

fn navigated_action(direction: crate::Direction) -> &'static str {
    match direction {
        crate::Direction::Up => "arrow up",
        crate::Direction::Down => "arrow down",
        crate::Direction::Left => "arrow left",
        crate::Direction::Right => "arrow right",
    }
}

/// Receives every event the core emits.
pub trait EventSink {
    fn record(&mut self, event: &AppEvent);

    fn record_all(&mut self, events: &[AppEvent]) {
        for event in events {
            self.record(event);
        }
    }
}

impl EventSink for Vec<AppEvent> {
    fn record(&mut self, event: &AppEvent) {
        self.push(event.clone());
    }
}
