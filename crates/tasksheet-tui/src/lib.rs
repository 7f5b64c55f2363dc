// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tasksheet_app::{
    AppCommand, AppEvent, AppState, BufferEdit, CellRef, CellState, Direction, EventSink, Field,
    LayoutMode, PAGE_SIZE, Priority, Record, TabKind, TaskStatus,
};

const BREADCRUMB: &str = "Workspace › Folder 2 › Spreadsheet 3";
const SHEET_TITLE: &str = "Q3 Financial Overview";
const COLUMN_SPACING: u16 = 1;
const EDIT_CURSOR: &str = "▏";
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

/// Presentation settings supplied by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuiOptions {
    /// Terminals narrower than this many columns get the card layout.
    pub narrow_width: u16,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self { narrow_width: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Click {
    cell: CellRef,
    at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    help_visible: bool,
    status_token: u64,
    last_click: Option<Click>,
    frame_area: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyAction {
    Quit,
    ToggleHelp,
    Command(AppCommand),
    Ignore,
}

pub fn run_app<S: EventSink>(
    state: &mut AppState,
    sink: &mut S,
    options: TuiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let (width, _) = terminal::size().context("read terminal size")?;
    apply_command(
        state,
        sink,
        &mut view_data,
        &internal_tx,
        AppCommand::SetLayout(LayoutMode::for_width(width, options.narrow_width)),
    );

    let mut result = Ok(());
    loop {
        process_internal_events(state, sink, &mut view_data, &internal_tx, &internal_rx);

        match terminal.draw(|frame| render(frame, state, &view_data)) {
            Ok(completed) => view_data.frame_area = completed.area,
            Err(error) => {
                result = Err(error).context("draw frame");
                break;
            }
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                if handle_key_event(state, sink, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(Event::Mouse(mouse)) => {
                handle_mouse_event(
                    state,
                    sink,
                    &mut view_data,
                    &internal_tx,
                    mouse,
                    Instant::now(),
                );
            }
            Ok(Event::Resize(width, _)) => {
                apply_command(
                    state,
                    sink,
                    &mut view_data,
                    &internal_tx,
                    AppCommand::SetLayout(LayoutMode::for_width(width, options.narrow_width)),
                );
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    result
}

fn process_internal_events<S: EventSink>(
    state: &mut AppState,
    sink: &mut S,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                apply_command(state, sink, view_data, tx, AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

/// Dispatches one command, forwards its events to the sink and arms the
/// status auto-clear whenever the command set a new status line.
fn apply_command<S: EventSink>(
    state: &mut AppState,
    sink: &mut S,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    sink.record_all(&events);
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn handle_key_event<S: EventSink>(
    state: &mut AppState,
    sink: &mut S,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    match key_action(state, key) {
        KeyAction::Quit => true,
        KeyAction::ToggleHelp => {
            view_data.help_visible = true;
            false
        }
        KeyAction::Command(command) => {
            apply_command(state, sink, view_data, internal_tx, command);
            false
        }
        KeyAction::Ignore => false,
    }
}

fn key_action(state: &AppState, key: KeyEvent) -> KeyAction {
    if state.cell.is_editing() {
        return edit_key_action(key);
    }

    let command = match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => return KeyAction::Quit,
        (KeyCode::Char('?'), _) => return KeyAction::ToggleHelp,
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
            return move_or_select(state, Direction::Up);
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
            return move_or_select(state, Direction::Down);
        }
        (KeyCode::Left, _) | (KeyCode::Char('h'), KeyModifiers::NONE) => {
            return move_or_select(state, Direction::Left);
        }
        (KeyCode::Right, _) | (KeyCode::Char('l'), KeyModifiers::NONE) => {
            return move_or_select(state, Direction::Right);
        }
        (KeyCode::Enter, _) => AppCommand::Confirm,
        (KeyCode::Esc, _) => AppCommand::Cancel,
        (KeyCode::Delete, _) => AppCommand::ClearCell,
        (KeyCode::Tab, _) => AppCommand::Blur,
        (KeyCode::Char('a'), KeyModifiers::NONE) => AppCommand::AddRecord,
        (KeyCode::Char('D'), _) => AppCommand::DeleteSelected,
        (KeyCode::Char('s'), KeyModifiers::NONE) => AppCommand::SortByJobRequest,
        (KeyCode::Char('c'), KeyModifiers::NONE) => match state.cell.selected() {
            Some(cell) => AppCommand::ToggleColumn(cell.field),
            None => return KeyAction::Ignore,
        },
        (KeyCode::Char('C'), _) => AppCommand::ShowAllColumns,
        (KeyCode::Char('f'), KeyModifiers::NONE) => AppCommand::NextTab,
        (KeyCode::Char('b'), KeyModifiers::NONE) => AppCommand::PrevTab,
        (KeyCode::Char('['), _) => AppCommand::PrevPage,
        (KeyCode::Char(']'), _) => AppCommand::NextPage,
        (KeyCode::Char(digit), _) if digit.is_ascii_digit() => {
            return quick_set_action(state, digit);
        }
        _ => return KeyAction::Ignore,
    };
    KeyAction::Command(command)
}

fn edit_key_action(key: KeyEvent) -> KeyAction {
    let command = match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => AppCommand::Confirm,
        (KeyCode::Esc, _) => AppCommand::Cancel,
        (KeyCode::Tab, _) => AppCommand::Blur,
        (KeyCode::Backspace, _) => AppCommand::EditBuffer(BufferEdit::Backspace),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            AppCommand::EditBuffer(BufferEdit::Replace(String::new()))
        }
        (KeyCode::Char(ch), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            AppCommand::EditBuffer(BufferEdit::Insert(ch))
        }
        _ => return KeyAction::Ignore,
    };
    KeyAction::Command(command)
}

/// Arrows move the selection; with nothing selected they pick the first
/// visible cell so the keyboard alone can reach the sheet. Cards have no
/// keyboard navigation.
fn move_or_select(state: &AppState, direction: Direction) -> KeyAction {
    if state.layout != LayoutMode::Wide {
        return KeyAction::Ignore;
    }
    if state.cell.selected().is_some() {
        return KeyAction::Command(AppCommand::Navigate(direction));
    }
    let first_record = state.visible_records().first();
    let first_field = state.visible_fields().first().copied();
    match (first_record, first_field) {
        (Some(record), Some(field)) => {
            KeyAction::Command(AppCommand::SelectCell(CellRef::new(record.id, field)))
        }
        _ => KeyAction::Ignore,
    }
}

fn quick_set_action(state: &AppState, digit: char) -> KeyAction {
    let Some(cell) = state.cell.selected() else {
        return KeyAction::Ignore;
    };
    let Some(index) = digit
        .to_digit(10)
        .and_then(|value| (value as usize).checked_sub(1))
    else {
        return KeyAction::Ignore;
    };
    match cell.field {
        Field::Status => TaskStatus::ALL.get(index).map_or(KeyAction::Ignore, |status| {
            KeyAction::Command(AppCommand::SetStatus(cell.record, *status))
        }),
        Field::Priority => Priority::ALL.get(index).map_or(KeyAction::Ignore, |priority| {
            KeyAction::Command(AppCommand::SetPriority(cell.record, *priority))
        }),
        _ => KeyAction::Ignore,
    }
}

fn handle_mouse_event<S: EventSink>(
    state: &mut AppState,
    sink: &mut S,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    mouse: MouseEvent,
    now: Instant,
) {
    if view_data.help_visible || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let position = Position::new(mouse.column, mouse.row);
    let [header, body, _] = screen_areas(view_data.frame_area);

    if let Some(tab) = tab_at(header, position) {
        apply_command(state, sink, view_data, internal_tx, AppCommand::SelectTab(tab));
        return;
    }

    let Some(cell) = cell_at(body, state, position) else {
        view_data.last_click = None;
        apply_command(state, sink, view_data, internal_tx, AppCommand::Blur);
        return;
    };

    let double = view_data
        .last_click
        .is_some_and(|last| last.cell == cell && now.duration_since(last.at) <= DOUBLE_CLICK_WINDOW);
    let command = if double {
        view_data.last_click = None;
        AppCommand::ActivateCell(cell)
    } else {
        view_data.last_click = Some(Click { cell, at: now });
        AppCommand::SelectCell(cell)
    };
    apply_command(state, sink, view_data, internal_tx, command);
}

fn screen_areas(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(3),
    ])
    .areas(area)
}

fn tab_regions(header: Rect) -> Vec<(Rect, TabKind)> {
    let inner = Block::default().borders(Borders::ALL).inner(header);
    let mut x = inner.x;
    let mut regions = Vec::with_capacity(TabKind::ALL.len());
    for tab in TabKind::ALL {
        // One column of padding either side, then a one column divider.
        x = x.saturating_add(1);
        let width = tab.label().chars().count() as u16;
        regions.push((Rect::new(x, inner.y, width, 1), tab));
        x = x.saturating_add(width).saturating_add(2);
    }
    regions
}

fn tab_at(header: Rect, position: Position) -> Option<TabKind> {
    tab_regions(header)
        .into_iter()
        .find(|(area, _)| area.contains(position))
        .map(|(_, tab)| tab)
}

fn cell_at(body: Rect, state: &AppState, position: Position) -> Option<CellRef> {
    let regions = match state.layout {
        LayoutMode::Wide => grid_regions(body, state),
        LayoutMode::Narrow => card_regions(body, state),
    };
    regions
        .into_iter()
        .find(|(area, _)| area.contains(position))
        .map(|(_, cell)| cell)
}

fn grid_columns(inner: Rect, count: usize) -> Rc<[Rect]> {
    let count = count.max(1);
    Layout::horizontal(vec![Constraint::Ratio(1, count as u32); count])
        .flex(Flex::Start)
        .spacing(COLUMN_SPACING)
        .split(Rect { height: 1, ..inner })
}

/// Index of the first grid row drawn so the selected row stays on screen.
fn grid_offset(state: &AppState, capacity: usize) -> usize {
    let Some(cell) = state.cell.cell() else {
        return 0;
    };
    let Some(row) = state.store.position(cell.record) else {
        return 0;
    };
    if capacity == 0 || row < capacity {
        0
    } else {
        row + 1 - capacity
    }
}

fn grid_regions(body: Rect, state: &AppState) -> Vec<(Rect, CellRef)> {
    let inner = Block::default().borders(Borders::ALL).inner(body);
    let fields = state.visible_fields();
    let columns = grid_columns(inner, fields.len());
    let capacity = inner.height.saturating_sub(1) as usize;
    let offset = grid_offset(state, capacity);

    let mut regions = Vec::new();
    for (row, record) in state
        .store
        .records()
        .iter()
        .skip(offset)
        .take(capacity)
        .enumerate()
    {
        let y = inner.y + 1 + row as u16;
        for (field, column) in fields.iter().zip(columns.iter()) {
            regions.push((
                Rect::new(column.x, y, column.width, 1),
                CellRef::new(record.id, *field),
            ));
        }
    }
    regions
}

fn card_areas(body: Rect, state: &AppState) -> (Vec<Rect>, Rect) {
    let records = state.visible_records().len();
    let card_height = state.visible_fields().len() as u16 + 2;
    let mut constraints = vec![Constraint::Length(card_height); records];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let areas = Layout::vertical(constraints).split(body);
    (areas[..records].to_vec(), areas[records])
}

fn card_regions(body: Rect, state: &AppState) -> Vec<(Rect, CellRef)> {
    let fields = state.visible_fields();
    let (cards, _) = card_areas(body, state);
    let mut regions = Vec::new();
    for (card, record) in cards.iter().zip(state.visible_records()) {
        let inner = Block::default().borders(Borders::ALL).inner(*card);
        for (line, field) in fields.iter().enumerate().take(inner.height as usize) {
            regions.push((
                Rect::new(inner.x, inner.y + line as u16, inner.width, 1),
                CellRef::new(record.id, *field),
            ));
        }
    }
    regions
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let [header, body, status] = screen_areas(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(TabKind::ALL.iter().map(|tab| tab.label()))
        .block(Block::default().title(BREADCRUMB).borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, header);

    match state.layout {
        LayoutMode::Wide => render_grid(frame, body, state),
        LayoutMode::Narrow => render_cards(frame, body, state),
    }

    let status_widget = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, status);

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_grid(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let fields = state.visible_fields();
    let widths = vec![Constraint::Ratio(1, fields.len().max(1) as u32); fields.len().max(1)];

    let header = Row::new(fields.iter().map(|field| {
        Cell::from(field.label()).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let capacity = area.height.saturating_sub(3) as usize;
    let offset = grid_offset(state, capacity);
    let rows = state
        .store
        .records()
        .iter()
        .skip(offset)
        .take(capacity)
        .map(|record| {
            Row::new(
                fields
                    .iter()
                    .map(|field| grid_cell(state, record, *field))
                    .collect::<Vec<_>>(),
            )
        });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .flex(Flex::Start)
        .block(
            Block::default()
                .title(sheet_title(state))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn grid_cell<'a>(state: &AppState, record: &'a Record, field: Field) -> Cell<'a> {
    let cell = CellRef::new(record.id, field);
    match &state.cell {
        CellState::Editing {
            cell: editing,
            buffer,
        } if *editing == cell => Cell::from(format!("{buffer}{EDIT_CURSOR}")).style(editing_style()),
        CellState::Selected(selected) if *selected == cell => {
            Cell::from(record.value(field)).style(selected_style())
        }
        _ => Cell::from(record.value(field)).style(value_style(record, field)),
    }
}

fn render_cards(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let fields = state.visible_fields();
    let (cards, pager) = card_areas(area, state);
    let first_number = state.page * PAGE_SIZE + 1;

    for (index, (card, record)) in cards.iter().zip(state.visible_records()).enumerate() {
        let lines = fields
            .iter()
            .map(|field| card_line(state, record, *field))
            .collect::<Vec<_>>();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("#{}", first_number + index))
            .title(
                Line::from(record.status.as_str())
                    .style(status_style(record.status))
                    .right_aligned(),
            );
        frame.render_widget(Paragraph::new(lines).block(block), *card);
    }

    frame.render_widget(Paragraph::new(pager_text(state)), pager);
}

fn card_line<'a>(state: &AppState, record: &'a Record, field: Field) -> Line<'a> {
    let cell = CellRef::new(record.id, field);
    let label = Span::styled(
        format!("{}: ", field.label()),
        Style::default().fg(Color::DarkGray),
    );
    let value = match &state.cell {
        CellState::Editing {
            cell: editing,
            buffer,
        } if *editing == cell => Span::styled(format!("{buffer}{EDIT_CURSOR}"), editing_style()),
        CellState::Selected(selected) if *selected == cell => {
            Span::styled(record.value(field), selected_style())
        }
        _ => Span::styled(record.value(field), value_style(record, field)),
    };
    Line::from(vec![label, value])
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn editing_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Yellow)
}

fn value_style(record: &Record, field: Field) -> Style {
    match field {
        Field::Status => status_style(record.status),
        Field::Priority => priority_style(record.priority),
        Field::SubmitterUrl => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
        _ => Style::default(),
    }
}

fn status_style(status: TaskStatus) -> Style {
    let color = match status {
        TaskStatus::InProcess => Color::Yellow,
        TaskStatus::NeedToStart => Color::Blue,
        TaskStatus::Complete => Color::Green,
        TaskStatus::Blocked => Color::Red,
    };
    Style::default().fg(color)
}

fn priority_style(priority: Priority) -> Style {
    let color = match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Blue,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn sheet_title(state: &AppState) -> String {
    match state.hidden_columns.len() {
        0 => SHEET_TITLE.to_owned(),
        hidden => format!("{SHEET_TITLE} ({hidden} hidden)"),
    }
}

fn pager_text(state: &AppState) -> String {
    format!(
        "[ prev  Page {} of {}  next ]",
        state.page + 1,
        state.total_pages().max(1)
    )
}

fn status_text(state: &AppState) -> String {
    let mut parts = vec!["Ready".to_owned()];
    if let Some(cell) = state.cell.cell() {
        parts.push(format!("Selected: {cell}"));
    }
    if let Some((cell, _)) = state.cell.editing() {
        parts.push(format!("Editing: {cell}"));
    }
    if let Some(status) = &state.status_line {
        parts.push(status.clone());
    }
    parts.push(format!("{} rows", state.store.len()));
    parts.push(key_hint(state).to_owned());
    parts.join(" | ")
}

fn key_hint(state: &AppState) -> &'static str {
    if state.cell.is_editing() {
        return "enter commit · esc cancel · tab done";
    }
    match state.layout {
        LayoutMode::Wide => "arrows move · enter edit · double-click edit · ? help",
        LayoutMode::Narrow => "[/] page · click select · ? help",
    }
}

fn help_overlay_text() -> &'static str {
    "nav: arrows or h/j/k/l move | enter edit | del clear cell | tab leave cell\n\
edit: type to change | backspace | ctrl+u clear | enter commit | esc cancel\n\
rows: a add | D delete selected row | s sort by job request\n\
cols: c hide current column | C show all columns\n\
quick set: 1-4 on Status | 1-3 on Priority\n\
tabs: f/b next/previous | click a tab\n\
cards: [ previous page | ] next page\n\
mouse: click select | double-click edit\n\
global: ? help | q or ctrl+q quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}

#[cfg(test)]
mod tests {
    use super::{
        DOUBLE_CLICK_WINDOW, InternalEvent, KeyAction, ViewData, apply_command, card_regions,
        cell_at, grid_regions, handle_key_event, handle_mouse_event, help_overlay_text,
        key_action, pager_text, process_internal_events, screen_areas, sheet_title, status_text,
        tab_at,
    };
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::layout::{Position, Rect};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};
    use tasksheet_app::{
        AppCommand, AppEvent, AppState, BufferEdit, CellState, Direction, Field, LayoutMode,
        Priority, RecordId, TabKind, TaskStatus,
    };
    use tasksheet_testkit::{cell, seeded_state};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(state: &mut AppState, view_data: &mut ViewData, code: KeyCode) -> Vec<AppEvent> {
        let (tx, _rx) = mpsc::channel();
        let mut sink: Vec<AppEvent> = Vec::new();
        handle_key_event(state, &mut sink, view_data, &tx, key(code));
        sink
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn view_data(width: u16, height: u16) -> ViewData {
        ViewData {
            frame_area: Rect::new(0, 0, width, height),
            ..ViewData::default()
        }
    }

    #[test]
    fn arrows_and_vim_keys_navigate_a_selection() {
        let mut state = seeded_state();
        state.dispatch(AppCommand::SelectCell(cell(1, Field::Status)));

        assert_eq!(
            key_action(&state, key(KeyCode::Right)),
            KeyAction::Command(AppCommand::Navigate(Direction::Right))
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Char('j'))),
            KeyAction::Command(AppCommand::Navigate(Direction::Down))
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Char('h'))),
            KeyAction::Command(AppCommand::Navigate(Direction::Left))
        );
    }

    #[test]
    fn arrow_without_selection_selects_first_visible_cell() {
        let mut state = seeded_state();
        assert_eq!(
            key_action(&state, key(KeyCode::Down)),
            KeyAction::Command(AppCommand::SelectCell(cell(1, Field::JobRequest)))
        );

        state.dispatch(AppCommand::ToggleColumn(Field::JobRequest));
        assert_eq!(
            key_action(&state, key(KeyCode::Up)),
            KeyAction::Command(AppCommand::SelectCell(cell(1, Field::Submitted)))
        );
    }

    #[test]
    fn arrows_are_ignored_in_card_layout() {
        let mut state = seeded_state();
        state.dispatch(AppCommand::SetLayout(LayoutMode::Narrow));
        assert_eq!(key_action(&state, key(KeyCode::Down)), KeyAction::Ignore);

        state.dispatch(AppCommand::SelectCell(cell(1, Field::Status)));
        assert_eq!(key_action(&state, key(KeyCode::Char('l'))), KeyAction::Ignore);
        assert_eq!(
            key_action(&state, key(KeyCode::Enter)),
            KeyAction::Command(AppCommand::Confirm)
        );
        let mut view_data = view_data(60, 30);
        let (tx, _rx) = mpsc::channel();
        let mut sink: Vec<AppEvent> = Vec::new();
        handle_key_event(&mut state, &mut sink, &mut view_data, &tx, key(KeyCode::Enter));
        assert_eq!(state.cell, CellState::Selected(cell(1, Field::Status)));
    }

    #[test]
    fn enter_confirms_and_delete_clears() {
        let state = seeded_state();
        assert_eq!(
            key_action(&state, key(KeyCode::Enter)),
            KeyAction::Command(AppCommand::Confirm)
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Delete)),
            KeyAction::Command(AppCommand::ClearCell)
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Tab)),
            KeyAction::Command(AppCommand::Blur)
        );
    }

    #[test]
    fn row_and_column_keys_map_to_commands() {
        let mut state = seeded_state();
        assert_eq!(
            key_action(&state, key(KeyCode::Char('a'))),
            KeyAction::Command(AppCommand::AddRecord)
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Char('D'))),
            KeyAction::Command(AppCommand::DeleteSelected)
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Char('s'))),
            KeyAction::Command(AppCommand::SortByJobRequest)
        );
        assert_eq!(key_action(&state, key(KeyCode::Char('c'))), KeyAction::Ignore);

        state.dispatch(AppCommand::SelectCell(cell(2, Field::DueDate)));
        assert_eq!(
            key_action(&state, key(KeyCode::Char('c'))),
            KeyAction::Command(AppCommand::ToggleColumn(Field::DueDate))
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Char('C'))),
            KeyAction::Command(AppCommand::ShowAllColumns)
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Char(']'))),
            KeyAction::Command(AppCommand::NextPage)
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Char('b'))),
            KeyAction::Command(AppCommand::PrevTab)
        );
    }

    #[test]
    fn digits_quick_set_status_and_priority() {
        let mut state = seeded_state();
        assert_eq!(key_action(&state, key(KeyCode::Char('1'))), KeyAction::Ignore);

        state.dispatch(AppCommand::SelectCell(cell(3, Field::Status)));
        assert_eq!(
            key_action(&state, key(KeyCode::Char('4'))),
            KeyAction::Command(AppCommand::SetStatus(RecordId::new(3), TaskStatus::Blocked))
        );
        assert_eq!(key_action(&state, key(KeyCode::Char('5'))), KeyAction::Ignore);
        assert_eq!(key_action(&state, key(KeyCode::Char('0'))), KeyAction::Ignore);

        state.dispatch(AppCommand::SelectCell(cell(3, Field::Priority)));
        assert_eq!(
            key_action(&state, key(KeyCode::Char('1'))),
            KeyAction::Command(AppCommand::SetPriority(RecordId::new(3), Priority::High))
        );
        assert_eq!(key_action(&state, key(KeyCode::Char('4'))), KeyAction::Ignore);

        state.dispatch(AppCommand::SelectCell(cell(3, Field::Assigned)));
        assert_eq!(key_action(&state, key(KeyCode::Char('1'))), KeyAction::Ignore);
    }

    #[test]
    fn editing_routes_characters_into_the_buffer() {
        let mut state = seeded_state();
        state.dispatch(AppCommand::ActivateCell(cell(1, Field::Assigned)));

        assert_eq!(
            key_action(&state, key(KeyCode::Char('q'))),
            KeyAction::Command(AppCommand::EditBuffer(BufferEdit::Insert('q')))
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Char('D'))),
            KeyAction::Command(AppCommand::EditBuffer(BufferEdit::Insert('D')))
        );
        assert_eq!(
            key_action(&state, key(KeyCode::Backspace)),
            KeyAction::Command(AppCommand::EditBuffer(BufferEdit::Backspace))
        );
        assert_eq!(
            key_action(
                &state,
                KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)
            ),
            KeyAction::Command(AppCommand::EditBuffer(BufferEdit::Replace(String::new())))
        );
        assert_eq!(key_action(&state, key(KeyCode::Down)), KeyAction::Ignore);
        assert_eq!(
            key_action(&state, key(KeyCode::Esc)),
            KeyAction::Command(AppCommand::Cancel)
        );
    }

    #[test]
    fn typing_an_edit_and_pressing_enter_commits_it() {
        let mut state = seeded_state();
        let mut view_data = ViewData::default();
        state.dispatch(AppCommand::SelectCell(cell(2, Field::Assigned)));

        press(&mut state, &mut view_data, KeyCode::Enter);
        press(&mut state, &mut view_data, KeyCode::Backspace);
        press(&mut state, &mut view_data, KeyCode::Char('s'));
        let events = press(&mut state, &mut view_data, KeyCode::Enter);

        assert_eq!(
            events,
            vec![AppEvent::EditCommitted {
                cell: cell(2, Field::Assigned),
                old: "Tejas Pandey".to_owned(),
                new: "Tejas Pandes".to_owned(),
            }]
        );
        assert_eq!(state.cell, CellState::Selected(cell(2, Field::Assigned)));
    }

    #[test]
    fn quit_keys_exit_outside_edits() {
        let mut state = seeded_state();
        let mut view_data = ViewData::default();
        let (tx, _rx) = mpsc::channel();
        let mut sink: Vec<AppEvent> = Vec::new();

        assert!(handle_key_event(
            &mut state,
            &mut sink,
            &mut view_data,
            &tx,
            key(KeyCode::Char('q')),
        ));
        assert!(handle_key_event(
            &mut state,
            &mut sink,
            &mut view_data,
            &tx,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        ));

        state.dispatch(AppCommand::ActivateCell(cell(1, Field::Submitter)));
        assert!(!handle_key_event(
            &mut state,
            &mut sink,
            &mut view_data,
            &tx,
            key(KeyCode::Char('q')),
        ));
    }

    #[test]
    fn help_overlay_absorbs_keys_until_closed() {
        let mut state = seeded_state();
        let mut view_data = ViewData::default();

        press(&mut state, &mut view_data, KeyCode::Char('?'));
        assert!(view_data.help_visible);

        let events = press(&mut state, &mut view_data, KeyCode::Char('a'));
        assert!(events.is_empty());
        assert_eq!(state.store.len(), 5);

        press(&mut state, &mut view_data, KeyCode::Esc);
        assert!(!view_data.help_visible);
        assert!(help_overlay_text().contains("double-click edit"));
    }

    #[test]
    fn status_updates_arm_a_clear_with_fresh_token() {
        let mut state = seeded_state();
        let mut view_data = ViewData::default();
        let (tx, rx) = mpsc::channel();
        let mut sink: Vec<AppEvent> = Vec::new();

        apply_command(
            &mut state,
            &mut sink,
            &mut view_data,
            &tx,
            AppCommand::AddRecord,
        );
        assert_eq!(view_data.status_token, 1);
        assert_eq!(state.status_line.as_deref(), Some("row 6 added"));

        tx.send(InternalEvent::ClearStatus { token: 0 })
            .expect("send stale token");
        process_internal_events(&mut state, &mut sink, &mut view_data, &tx, &rx);
        assert!(state.status_line.is_some());

        tx.send(InternalEvent::ClearStatus { token: 1 })
            .expect("send current token");
        process_internal_events(&mut state, &mut sink, &mut view_data, &tx, &rx);
        assert_eq!(state.status_line, None);
        assert_eq!(sink.last(), Some(&AppEvent::StatusCleared));
    }

    #[test]
    fn status_bar_reports_selection_edit_and_row_count() {
        let mut state = seeded_state();
        assert!(status_text(&state).starts_with("Ready | 5 rows"));

        state.dispatch(AppCommand::SelectCell(cell(1, Field::Status)));
        assert!(status_text(&state).contains("Selected: 1-status"));

        state.dispatch(AppCommand::Confirm);
        let text = status_text(&state);
        assert!(text.contains("Editing: 1-status"));
        assert!(text.contains("enter commit"));
    }

    #[test]
    fn grid_cells_are_hit_tested_by_position() {
        let state = seeded_state();
        let area = Rect::new(0, 0, 120, 20);
        let [_, body, _] = screen_areas(area);
        let regions = grid_regions(body, &state);
        assert_eq!(regions.len(), 5 * Field::ALL.len());

        let (first, cell_ref) = regions[0];
        assert_eq!(cell_ref, cell(1, Field::JobRequest));
        assert_eq!(first.y, body.y + 2);
        assert_eq!(
            cell_at(body, &state, Position::new(first.x, first.y)),
            Some(cell(1, Field::JobRequest))
        );
        assert_eq!(cell_at(body, &state, Position::new(0, 0)), None);

        let (last, last_ref) = regions[regions.len() - 1];
        assert_eq!(last_ref, cell(5, Field::EstValue));
        assert!(last.right() <= body.right() - 1);
    }

    #[test]
    fn grid_skips_hidden_columns() {
        let mut state = seeded_state();
        state.dispatch(AppCommand::ToggleColumn(Field::SubmitterUrl));
        let [_, body, _] = screen_areas(Rect::new(0, 0, 120, 20));
        let regions = grid_regions(body, &state);
        assert_eq!(regions.len(), 5 * 8);
        assert!(
            regions
                .iter()
                .all(|(_, cell_ref)| cell_ref.field != Field::SubmitterUrl)
        );
        assert_eq!(sheet_title(&state), "Q3 Financial Overview (1 hidden)");
    }

    #[test]
    fn grid_scrolls_to_keep_selection_visible() {
        let mut state = seeded_state();
        for _ in 0..10 {
            state.dispatch(AppCommand::AddRecord);
        }
        state.dispatch(AppCommand::SelectCell(cell(15, Field::Status)));
        let [_, body, _] = screen_areas(Rect::new(0, 0, 120, 14));
        let regions = grid_regions(body, &state);
        assert!(
            regions
                .iter()
                .any(|(_, cell_ref)| cell_ref.record == RecordId::new(15))
        );
        assert!(
            regions
                .iter()
                .all(|(_, cell_ref)| cell_ref.record != RecordId::new(1))
        );
    }

    #[test]
    fn cards_expose_one_region_per_visible_field() {
        let mut state = seeded_state();
        state.dispatch(AppCommand::SetLayout(LayoutMode::Narrow));
        let [_, body, _] = screen_areas(Rect::new(0, 0, 60, 60));
        let regions = card_regions(body, &state);
        assert_eq!(regions.len(), 3 * Field::ALL.len());
        assert_eq!(regions[0].1, cell(1, Field::JobRequest));
        assert_eq!(regions[0].0.y, body.y + 1);
        assert_eq!(pager_text(&state), "[ prev  Page 1 of 2  next ]");

        state.dispatch(AppCommand::NextPage);
        let regions = card_regions(body, &state);
        assert_eq!(regions.len(), 2 * Field::ALL.len());
        assert_eq!(regions[0].1, cell(4, Field::JobRequest));
    }

    #[test]
    fn click_selects_and_double_click_edits() {
        let mut state = seeded_state();
        let mut view_data = view_data(120, 20);
        let (tx, _rx) = mpsc::channel();
        let mut sink: Vec<AppEvent> = Vec::new();
        let [_, body, _] = screen_areas(view_data.frame_area);
        let (target, cell_ref) = grid_regions(body, &state)[2 * Field::ALL.len() + 5];
        assert_eq!(cell_ref, cell(3, Field::Assigned));

        let start = Instant::now();
        handle_mouse_event(
            &mut state,
            &mut sink,
            &mut view_data,
            &tx,
            click(target.x, target.y),
            start,
        );
        assert_eq!(state.cell, CellState::Selected(cell_ref));

        handle_mouse_event(
            &mut state,
            &mut sink,
            &mut view_data,
            &tx,
            click(target.x + 1, target.y),
            start + Duration::from_millis(150),
        );
        assert_eq!(state.cell.editing(), Some((cell_ref, "Rachel Lee")));
    }

    #[test]
    fn slow_second_click_only_reselects() {
        let mut state = seeded_state();
        let mut view_data = view_data(120, 20);
        let (tx, _rx) = mpsc::channel();
        let mut sink: Vec<AppEvent> = Vec::new();
        let [_, body, _] = screen_areas(view_data.frame_area);
        let (target, cell_ref) = grid_regions(body, &state)[0];

        let start = Instant::now();
        for offset in [Duration::ZERO, DOUBLE_CLICK_WINDOW * 2] {
            handle_mouse_event(
                &mut state,
                &mut sink,
                &mut view_data,
                &tx,
                click(target.x, target.y),
                start + offset,
            );
        }
        assert_eq!(state.cell, CellState::Selected(cell_ref));
    }

    #[test]
    fn clicking_outside_cells_commits_open_edit() {
        let mut state = seeded_state();
        let mut view_data = view_data(120, 20);
        let (tx, _rx) = mpsc::channel();
        let mut sink: Vec<AppEvent> = Vec::new();
        state.dispatch(AppCommand::ActivateCell(cell(4, Field::EstValue)));
        state.dispatch(AppCommand::EditBuffer(BufferEdit::Insert('!')));

        handle_mouse_event(
            &mut state,
            &mut sink,
            &mut view_data,
            &tx,
            click(0, 19),
            Instant::now(),
        );
        assert_eq!(state.cell, CellState::Selected(cell(4, Field::EstValue)));
        assert_eq!(
            state
                .store
                .value(RecordId::new(4), Field::EstValue)
                .as_deref(),
            Some("5,800,000 ₹!")
        );
    }

    #[test]
    fn clicking_a_tab_selects_it() {
        let mut state = seeded_state();
        let mut view_data = view_data(120, 20);
        let (tx, _rx) = mpsc::channel();
        let mut sink: Vec<AppEvent> = Vec::new();
        let [header, _, _] = screen_areas(view_data.frame_area);

        // "All Orders" spans columns 2..12, then " │ " before "Pending".
        assert_eq!(tab_at(header, Position::new(2, 1)), Some(TabKind::AllOrders));
        assert_eq!(tab_at(header, Position::new(15, 1)), Some(TabKind::Pending));
        assert_eq!(tab_at(header, Position::new(13, 1)), None);

        handle_mouse_event(
            &mut state,
            &mut sink,
            &mut view_data,
            &tx,
            click(15, 1),
            Instant::now(),
        );
        assert_eq!(state.active_tab, TabKind::Pending);
        assert_eq!(sink, vec![AppEvent::TabChanged(TabKind::Pending)]);
    }
}
