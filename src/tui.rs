use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;

use crate::source::{self, SourceEvent};
use crate::state::*;
use crate::ui::layout::compute_layout;
use crate::ui::palette::{hit_test, PaletteHit};
use crate::ui::step::layout_pane;

const IDLE_POLL: Duration = Duration::from_millis(100);
const SCROLL_STEP: usize = 3;
const PAGE: usize = 10;

pub fn run_tui(mut state: AppState, initial: Option<PathBuf>) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Cannot enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| format!("Cannot enter alternate screen: {}", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("Cannot create terminal: {}", e))?;

    let (source_tx, source_rx) = mpsc::channel::<SourceEvent>();
    if let Some(path) = initial {
        start_load(&mut state, path, &source_tx);
    }

    let result = main_loop(&mut terminal, &mut state, &source_tx, &source_rx);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    source_tx: &mpsc::Sender<SourceEvent>,
    source_rx: &mpsc::Receiver<SourceEvent>,
) -> Result<(), String> {
    loop {
        terminal
            .draw(|f| crate::ui::draw(f, state))
            .map_err(|e| format!("Draw error: {}", e))?;

        if state.should_quit {
            break;
        }

        if event::poll(poll_timeout(state, Instant::now()))
            .map_err(|e| format!("Poll error: {}", e))?
        {
            let size = terminal.size().unwrap_or_default();
            let area = Rect::new(0, 0, size.width, size.height);
            match event::read().map_err(|e| format!("Read error: {}", e))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(key, state, source_tx);
                }
                Event::Mouse(mouse) => handle_mouse(mouse, state, area),
                _ => {}
            }
            state.sync_fields(Instant::now());
            // Store the clamped scroll so the next scroll key starts from what is shown
            state.scroll = layout_pane(state, compute_layout(area).main).scroll;
        }

        while let Ok(ev) = source_rx.try_recv() {
            handle_source(ev, state, source_tx);
        }

        if state.view.tick(Instant::now()) {
            tracing::debug!("palette hidden after blur");
        }
    }

    Ok(())
}

/// Wake up in time for a pending palette hide.
fn poll_timeout(state: &AppState, now: Instant) -> Duration {
    match state.view.pending_deadline() {
        Some(due) => due.saturating_duration_since(now).min(IDLE_POLL),
        None => IDLE_POLL,
    }
}

fn start_load(state: &mut AppState, path: PathBuf, tx: &mpsc::Sender<SourceEvent>) {
    let ticket = state.view.begin_load();
    tracing::info!(path = %path.display(), ?ticket, "loading");
    state.set_status(format!("Loading {}", path.display()), false);
    state.loading = Some(path.clone());
    source::spawn_load(path, ticket, tx.clone());
}

fn handle_source(ev: SourceEvent, state: &mut AppState, tx: &mpsc::Sender<SourceEvent>) {
    match ev {
        SourceEvent::Loaded(load) => state.apply_load(load),
        SourceEvent::Picked(Some(path)) => start_load(state, path, tx),
        SourceEvent::Picked(None) => state.set_status("Open cancelled", false),
        SourceEvent::PickerUnavailable(reason) => {
            tracing::debug!(%reason, "falling back to path prompt");
            open_path_prompt(state);
        }
    }
}

fn open_path_prompt(state: &mut AppState) {
    state.path_input = state
        .current_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    state.input_mode = InputMode::PathInput;
    state.push_dialog(Dialog::OpenFile);
}

fn handle_key(key: KeyEvent, state: &mut AppState, tx: &mpsc::Sender<SourceEvent>) {
    if state.has_dialog() {
        handle_dialog_key(key, state, tx);
        return;
    }

    let now = Instant::now();
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    // Global bindings
    if ctrl {
        match key.code {
            KeyCode::Char('q') => state.push_dialog(Dialog::ConfirmQuit),
            KeyCode::Char('o') => {
                state.blur_field(now);
                state.set_status("Choosing a file…", false);
                source::spawn_pick(tx.clone());
            }
            _ => {}
        }
        return;
    }
    if alt {
        match key.code {
            KeyCode::Left => state.palette.prev_tab(),
            KeyCode::Right => state.palette.next_tab(),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(token) = state.palette.choose(idx) {
                    state.insert_from_palette(&token, now);
                }
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab => state.focus_next(now),
        KeyCode::BackTab => state.focus_prev(now),
        KeyCode::F(1) => state.push_dialog(Dialog::Help),
        _ => match state.input_mode {
            InputMode::Editing => handle_editing_key(key, state, now),
            InputMode::Navigation => handle_nav_key(key, state, now),
            InputMode::PathInput => {}
        },
    }
}

fn handle_editing_key(key: KeyEvent, state: &mut AppState, now: Instant) {
    match key.code {
        KeyCode::Enter => state.convert_focused(),
        KeyCode::Esc => state.blur_field(now),
        KeyCode::Up => state.focus_prev(now),
        KeyCode::Down => state.focus_next(now),
        code => {
            let Some(field) = state.focused_field_mut() else {
                return;
            };
            match code {
                KeyCode::Char(c) => field.insert_char(c),
                KeyCode::Backspace => field.backspace(),
                KeyCode::Delete => field.delete(),
                KeyCode::Left => field.move_left(),
                KeyCode::Right => field.move_right(),
                KeyCode::Home => field.home(),
                KeyCode::End => field.end(),
                _ => {}
            }
        }
    }
}

fn handle_nav_key(key: KeyEvent, state: &mut AppState, now: Instant) {
    match key.code {
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        KeyCode::Enter => state.focus_next(now),
        KeyCode::Up => state.scroll = state.scroll.saturating_sub(1),
        KeyCode::Down => state.scroll = state.scroll.saturating_add(1),
        KeyCode::PageUp => state.scroll = state.scroll.saturating_sub(PAGE),
        KeyCode::PageDown => state.scroll = state.scroll.saturating_add(PAGE),
        KeyCode::Home => state.scroll = 0,
        KeyCode::End => state.scroll = usize::MAX,
        _ => {}
    }
}

fn handle_dialog_key(key: KeyEvent, state: &mut AppState, tx: &mpsc::Sender<SourceEvent>) {
    let dialog = state.top_dialog().cloned();
    match dialog {
        Some(Dialog::OpenFile) => match key.code {
            KeyCode::Enter => {
                let input = std::mem::take(&mut state.path_input);
                state.pop_dialog();
                state.input_mode = InputMode::Navigation;
                match source::resolve_path(&input) {
                    Ok(path) => start_load(state, path, tx),
                    Err(e) => state.set_status(e, true),
                }
            }
            KeyCode::Esc => {
                state.path_input.clear();
                state.pop_dialog();
                state.input_mode = InputMode::Navigation;
            }
            KeyCode::Backspace => {
                state.path_input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.path_input.push(c);
            }
            _ => {}
        },
        Some(Dialog::ConfirmQuit) => match key.code {
            KeyCode::Enter => {
                state.pop_dialog();
                state.should_quit = true;
            }
            KeyCode::Esc => {
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::Help) => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1) => {
                state.pop_dialog();
            }
            _ => {}
        },
        None => {}
    }
}

fn handle_mouse(mouse: MouseEvent, state: &mut AppState, size: Rect) {
    if state.has_dialog() {
        return;
    }

    let now = Instant::now();
    let layout = compute_layout(size);
    let pane = layout_pane(state, layout.main);
    let palette_rect = crate::ui::palette_area(state, layout.main, &pane);
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => state.press_at(layout.main, x, y, now),
        MouseEventKind::Drag(MouseButton::Left) => {
            if state.palette.is_dragging() {
                state.palette.drag_to(x, y);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if state.palette.is_dragging() {
                state.palette.end_drag();
                return;
            }
            if state.palette.pressed().is_some() {
                let over = palette_rect.and_then(|rect| match hit_test(&state.palette, rect, x, y) {
                    Some(PaletteHit::Item(i)) => Some(i),
                    _ => None,
                });
                if let Some(token) = state.palette.release_item(over) {
                    state.insert_from_palette(&token, now);
                }
            }
        }
        MouseEventKind::ScrollUp => {
            state.scroll = pane.scroll.saturating_sub(SCROLL_STEP);
        }
        MouseEventKind::ScrollDown => {
            let max = pane.lines.len().saturating_sub(layout.main.height as usize);
            state.scroll = (pane.scroll + SCROLL_STEP).min(max);
        }
        _ => {}
    }
}
