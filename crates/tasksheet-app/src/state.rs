// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use time::Date;

use crate::{
    BufferEdit, CellRef, CellState, Direction, Field, LayoutMode, Priority, Record, RecordId,
    RecordStore, TabKind, TaskStatus, UpdateOutcome, coerce_visible_field, step, visible_fields,
};

/// Cards shown per page in the narrow layout.
pub const PAGE_SIZE: usize = 3;

pub fn total_pages(record_count: usize) -> usize {
    record_count.div_ceil(PAGE_SIZE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub store: RecordStore,
    pub cell: CellState,
    pub hidden_columns: BTreeSet<Field>,
    pub active_tab: TabKind,
    pub layout: LayoutMode,
    pub page: usize,
    pub status_line: Option<String>,
    pub today: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Single activation (click) of a cell.
    SelectCell(CellRef),
    /// Double activation of a cell.
    ActivateCell(CellRef),
    Confirm,
    Cancel,
    Blur,
    EditBuffer(BufferEdit),
    Navigate(Direction),
    ClearCell,
    AddRecord,
    DeleteSelected,
    DeleteRecord(RecordId),
    UpdateField { cell: CellRef, value: String },
    SortByJobRequest,
    SetStatus(RecordId, TaskStatus),
    SetPriority(RecordId, Priority),
    ToggleColumn(Field),
    ShowAllColumns,
    SelectTab(TabKind),
    NextTab,
    PrevTab,
    SetLayout(LayoutMode),
    NextPage,
    PrevPage,
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CellSelected(CellRef),
    SelectionCleared,
    EditStarted {
        cell: CellRef,
        value: String,
    },
    EditCommitted {
        cell: CellRef,
        old: String,
        new: String,
    },
    EditCancelled(CellRef),
    FieldUpdated {
        cell: CellRef,
        old: String,
        new: String,
    },
    UpdateRejected {
        cell: CellRef,
        value: String,
    },
    CellCleared {
        cell: CellRef,
        old: String,
    },
    Navigated {
        direction: Direction,
        from: CellRef,
        to: CellRef,
    },
    NavigationClamped {
        direction: Direction,
        cell: CellRef,
    },
    RecordAdded(RecordId),
    RecordDeleted(RecordId),
    RecordMissing(RecordId),
    RecordsSorted,
    StatusChanged {
        record: RecordId,
        old: TaskStatus,
        new: TaskStatus,
    },
    PriorityChanged {
        record: RecordId,
        old: Priority,
        new: Priority,
    },
    ColumnHidden(Field),
    ColumnShown(Field),
    ColumnsShown,
    TabChanged(TabKind),
    LayoutChanged(LayoutMode),
    PageChanged {
        page: usize,
        total: usize,
    },
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn new(store: RecordStore, today: Date) -> Self {
        Self {
            store,
            cell: CellState::Idle,
            hidden_columns: BTreeSet::new(),
            active_tab: TabKind::AllOrders,
            layout: LayoutMode::Wide,
            page: 0,
            status_line: None,
            today,
        }
    }

    pub fn seeded(today: Date) -> Self {
        Self::new(RecordStore::seeded(), today)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.store.len())
    }

    /// Records the presentation layer should draw for the current layout.
    pub fn visible_records(&self) -> &[Record] {
        match self.layout {
            LayoutMode::Wide => self.store.records(),
            LayoutMode::Narrow => self.store.page(self.page, PAGE_SIZE),
        }
    }

    pub fn visible_fields(&self) -> Vec<Field> {
        visible_fields(&self.hidden_columns)
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Confirm => self.confirm(),
            AppCommand::Cancel => self.cancel_edit(),
            AppCommand::Blur => self.commit_edit(),
            AppCommand::EditBuffer(edit) => {
                if let CellState::Editing { buffer, .. } = &mut self.cell {
                    edit.apply(buffer);
                }
                Vec::new()
            }
            AppCommand::Navigate(direction) => self.navigate(direction),
            AppCommand::ClearCell => self.clear_cell(),
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
            AppCommand::ActivateCell(cell)
                if self.cell.editing().is_some_and(|(editing, _)| editing == cell) =>
            {
                Vec::new()
            }
            command => {
                // Anything else takes focus away from an open edit, which
                // commits it before the command runs.
                let mut events = self.commit_edit();
                events.extend(self.dispatch_unfocused(command));
                events
            }
        }
    }

    fn dispatch_unfocused(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SelectCell(cell) => self.select(cell),
            AppCommand::ActivateCell(cell) => {
                let mut events = Vec::new();
                if self.cell.selected() != Some(cell) {
                    events.extend(self.select(cell));
                    if self.cell.selected() != Some(cell) {
                        return events;
                    }
                }
                events.extend(self.begin_edit());
                events
            }
            AppCommand::AddRecord => {
                let id = self.store.add_record(self.today);
                vec![
                    AppEvent::RecordAdded(id),
                    self.set_status(format!("row {id} added")),
                ]
            }
            AppCommand::DeleteSelected => match self.cell.cell() {
                Some(cell) => self.delete_record(cell.record),
                None => vec![self.set_status("select a cell to delete its row")],
            },
            AppCommand::DeleteRecord(id) => self.delete_record(id),
            AppCommand::UpdateField { cell, value } => {
                match self.store.update_field(cell.record, cell.field, &value) {
                    UpdateOutcome::Updated { old } => {
                        vec![AppEvent::FieldUpdated {
                            cell,
                            old,
                            new: value,
                        }]
                    }
                    UpdateOutcome::Rejected => vec![AppEvent::UpdateRejected { cell, value }],
                    UpdateOutcome::Missing => vec![AppEvent::RecordMissing(cell.record)],
                }
            }
            AppCommand::SortByJobRequest => {
                self.store.sort_by_job_request();
                vec![
                    AppEvent::RecordsSorted,
                    self.set_status("sorted by job request"),
                ]
            }
            AppCommand::SetStatus(record, status) => {
                match self.store.set_status(record, status) {
                    Some(old) => vec![
                        AppEvent::StatusChanged {
                            record,
                            old,
                            new: status,
                        },
                        self.set_status(format!("row {record} status: {}", status.as_str())),
                    ],
                    None => vec![AppEvent::RecordMissing(record)],
                }
            }
            AppCommand::SetPriority(record, priority) => {
                match self.store.set_priority(record, priority) {
                    Some(old) => vec![
                        AppEvent::PriorityChanged {
                            record,
                            old,
                            new: priority,
                        },
                        self.set_status(format!("row {record} priority: {}", priority.as_str())),
                    ],
                    None => vec![AppEvent::RecordMissing(record)],
                }
            }
            AppCommand::ToggleColumn(field) => self.toggle_column(field),
            AppCommand::ShowAllColumns => {
                self.hidden_columns.clear();
                vec![AppEvent::ColumnsShown, self.set_status("all columns shown")]
            }
            AppCommand::SelectTab(tab) => {
                self.active_tab = tab;
                vec![AppEvent::TabChanged(tab)]
            }
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::SetLayout(layout) => {
                if self.layout == layout {
                    return Vec::new();
                }
                self.layout = layout;
                let mut events = vec![AppEvent::LayoutChanged(layout)];
                events.extend(self.clamp_page());
                events
            }
            AppCommand::NextPage => self.move_page(1),
            AppCommand::PrevPage => self.move_page(-1),
            AppCommand::Confirm
            | AppCommand::Cancel
            | AppCommand::Blur
            | AppCommand::EditBuffer(_)
            | AppCommand::Navigate(_)
            | AppCommand::ClearCell
            | AppCommand::ClearStatus => Vec::new(),
        }
    }

    fn select(&mut self, cell: CellRef) -> Vec<AppEvent> {
        if !self.store.contains(cell.record) {
            return vec![AppEvent::RecordMissing(cell.record)];
        }
        self.cell = CellState::Selected(cell);
        vec![AppEvent::CellSelected(cell)]
    }

    fn confirm(&mut self) -> Vec<AppEvent> {
        match self.cell {
            CellState::Idle => Vec::new(),
            CellState::Selected(_) if self.layout != LayoutMode::Wide => Vec::new(),
            CellState::Selected(_) => self.begin_edit(),
            CellState::Editing { .. } => self.commit_edit(),
        }
    }

    fn begin_edit(&mut self) -> Vec<AppEvent> {
        let Some(cell) = self.cell.selected() else {
            return Vec::new();
        };
        let Some(value) = self.store.value(cell.record, cell.field) else {
            self.cell = CellState::Idle;
            return vec![AppEvent::RecordMissing(cell.record), AppEvent::SelectionCleared];
        };
        self.cell = CellState::Editing {
            cell,
            buffer: value.clone(),
        };
        vec![AppEvent::EditStarted { cell, value }]
    }

    fn commit_edit(&mut self) -> Vec<AppEvent> {
        if !self.cell.is_editing() {
            return Vec::new();
        }
        let CellState::Editing { cell, buffer } = std::mem::take(&mut self.cell) else {
            return Vec::new();
        };
        match self.store.update_field(cell.record, cell.field, &buffer) {
            UpdateOutcome::Updated { old } => {
                self.cell = CellState::Selected(cell);
                vec![AppEvent::EditCommitted {
                    cell,
                    old,
                    new: buffer,
                }]
            }
            UpdateOutcome::Rejected => {
                self.cell = CellState::Selected(cell);
                vec![
                    AppEvent::UpdateRejected {
                        cell,
                        value: buffer,
                    },
                    self.set_status(format!("{} keeps its value", cell.field.label())),
                ]
            }
            UpdateOutcome::Missing => {
                vec![AppEvent::RecordMissing(cell.record), AppEvent::SelectionCleared]
            }
        }
    }

    fn cancel_edit(&mut self) -> Vec<AppEvent> {
        let Some((cell, _)) = self.cell.editing() else {
            return Vec::new();
        };
        self.cell = CellState::Selected(cell);
        vec![AppEvent::EditCancelled(cell)]
    }

    fn navigate(&mut self, direction: Direction) -> Vec<AppEvent> {
        if self.layout != LayoutMode::Wide {
            return Vec::new();
        }
        let Some(from) = self.cell.selected() else {
            return Vec::new();
        };
        let to = step(&self.store, &self.hidden_columns, from, direction);
        if to == from {
            return vec![AppEvent::NavigationClamped {
                direction,
                cell: from,
            }];
        }
        self.cell = CellState::Selected(to);
        vec![AppEvent::Navigated {
            direction,
            from,
            to,
        }]
    }

    fn clear_cell(&mut self) -> Vec<AppEvent> {
        if self.layout != LayoutMode::Wide {
            return Vec::new();
        }
        let Some(cell) = self.cell.selected() else {
            return Vec::new();
        };
        match self.store.update_field(cell.record, cell.field, "") {
            UpdateOutcome::Updated { old } => vec![AppEvent::CellCleared { cell, old }],
            UpdateOutcome::Rejected => vec![
                AppEvent::UpdateRejected {
                    cell,
                    value: String::new(),
                },
                self.set_status(format!("{} cannot be empty", cell.field.label())),
            ],
            UpdateOutcome::Missing => {
                self.cell = CellState::Idle;
                vec![AppEvent::RecordMissing(cell.record), AppEvent::SelectionCleared]
            }
        }
    }

    fn delete_record(&mut self, id: RecordId) -> Vec<AppEvent> {
        if self.store.delete_record(id).is_none() {
            return vec![AppEvent::RecordMissing(id)];
        }
        let mut events = vec![AppEvent::RecordDeleted(id)];
        if self.cell.references(id) {
            self.cell = CellState::Idle;
            events.push(AppEvent::SelectionCleared);
        }
        events.extend(self.clamp_page());
        events.push(self.set_status(format!("row {id} deleted")));
        events
    }

    fn toggle_column(&mut self, field: Field) -> Vec<AppEvent> {
        if self.hidden_columns.remove(&field) {
            return vec![
                AppEvent::ColumnShown(field),
                self.set_status(format!("column shown: {}", field.label())),
            ];
        }
        if self.visible_fields().len() <= 1 {
            return vec![self.set_status("keep one column visible")];
        }
        self.hidden_columns.insert(field);
        let mut events = vec![
            AppEvent::ColumnHidden(field),
            self.set_status(format!("column hidden: {}", field.label())),
        ];
        if let Some(cell) = self.cell.selected()
            && cell.field == field
            && let Some(next) = coerce_visible_field(&self.hidden_columns, field)
        {
            let moved = cell.with_field(next);
            self.cell = CellState::Selected(moved);
            events.push(AppEvent::CellSelected(moved));
        }
        events
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_tab = tabs[next];
        vec![AppEvent::TabChanged(self.active_tab)]
    }

    fn move_page(&mut self, delta: isize) -> Vec<AppEvent> {
        if self.layout != LayoutMode::Narrow {
            return Vec::new();
        }
        let last = self.total_pages().saturating_sub(1);
        let next = if delta.is_negative() {
            self.page.saturating_sub(delta.unsigned_abs())
        } else {
            self.page.saturating_add(delta as usize)
        }
        .min(last);
        if next == self.page {
            return Vec::new();
        }
        self.page = next;
        vec![AppEvent::PageChanged {
            page: next,
            total: self.total_pages(),
        }]
    }

    fn clamp_page(&mut self) -> Vec<AppEvent> {
        let last = self.total_pages().saturating_sub(1);
        if self.page <= last {
            return Vec::new();
        }
        self.page = last;
        vec![AppEvent::PageChanged {
            page: last,
            total: self.total_pages(),
        }]
    }

    fn set_status(&mut self, message: impl Into<String>) -> AppEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}
