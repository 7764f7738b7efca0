use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use chrono::{DateTime, Local};
use ratatui::layout::Rect;

use crate::config::Config;
use crate::field::{AutoCommands, ExpressionField};
use crate::palette::SymbolPalette;
use crate::render::MathMlRenderer;
use crate::source::LoadEvent;
use crate::ui::layout::contains;
use crate::ui::palette::{hit_test, PaletteHit};
use crate::ui::palette_area;
use crate::ui::step::{layout_pane, PaneHit};
use crate::view::{LoadOutcome, ProblemView};

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    OpenFile,
    ConfirmQuit,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Navigation,
    Editing,
    PathInput,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub at: DateTime<Local>,
}

pub struct AppState {
    pub view: ProblemView<ExpressionField, MathMlRenderer>,
    pub palette: SymbolPalette,
    pub auto: Rc<AutoCommands>,
    /// Field holding terminal focus. The router's notion of the active field
    /// lags behind this by the blur debounce.
    pub focused: Option<usize>,
    pub input_mode: InputMode,
    pub dialog_stack: Vec<Dialog>,
    pub path_input: String,
    pub status: Option<StatusMessage>,
    pub loading: Option<PathBuf>,
    pub current_file: Option<PathBuf>,
    pub scroll: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            view: ProblemView::new(MathMlRenderer::default(), config.blur_debounce()),
            palette: SymbolPalette::new(config.palette.clone()),
            auto: Rc::new(config.auto_commands()),
            focused: None,
            input_mode: InputMode::Navigation,
            dialog_stack: Vec::new(),
            path_input: String::new(),
            status: None,
            loading: None,
            current_file: None,
            scroll: 0,
            should_quit: false,
        }
    }

    pub fn step_count(&self) -> usize {
        self.view.problem().map_or(0, |p| p.step_count())
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
            at: Local::now(),
        });
    }

    pub fn apply_load(&mut self, event: LoadEvent) {
        if !self.view.is_current(event.ticket) {
            tracing::debug!(path = %event.path.display(), "ignoring superseded load");
            return;
        }
        self.loading = None;

        let outcome = event
            .result
            .and_then(|text| self.view.finish_load(event.ticket, &text));
        match outcome {
            Ok(LoadOutcome::Installed) => {
                self.mount_fields();
                self.focused = None;
                self.input_mode = InputMode::Navigation;
                self.scroll = 0;
                self.palette.reset_position();
                self.set_status(format!("Loaded {}", event.path.display()), false);
                self.current_file = Some(event.path);
            }
            Ok(LoadOutcome::Superseded) => {}
            Err(e) => {
                tracing::warn!(path = %event.path.display(), error = %e, "load failed");
                self.set_status(format!("No problem loaded: {}", e), true);
            }
        }
    }

    fn mount_fields(&mut self) {
        let count = self.step_count();
        for step in 1..=count {
            let field = ExpressionField::new("", Rc::clone(&self.auto));
            self.view.register_handle(step, field);
        }
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut ExpressionField> {
        let step = self.focused?;
        self.view.handle_mut(step)
    }

    pub fn focus_field(&mut self, step: usize, now: Instant) {
        if step == 0 || step > self.step_count() {
            return;
        }
        if self.focused != Some(step) {
            self.blur_field(now);
            self.focused = Some(step);
            self.view.field_focused(step);
        }
        self.input_mode = InputMode::Editing;
    }

    pub fn blur_field(&mut self, now: Instant) {
        if let Some(step) = self.focused.take() {
            self.view.field_blurred(step, now);
        }
        self.input_mode = InputMode::Navigation;
    }

    pub fn focus_next(&mut self, now: Instant) {
        let total = self.step_count();
        if total == 0 {
            return;
        }
        let next = match self.focused {
            Some(step) if step < total => step + 1,
            Some(_) => 1,
            None => self.view.palette_anchor().unwrap_or(1),
        };
        self.focus_field(next, now);
    }

    pub fn focus_prev(&mut self, now: Instant) {
        let total = self.step_count();
        if total == 0 {
            return;
        }
        let prev = match self.focused {
            Some(step) if step > 1 => step - 1,
            Some(_) => total,
            None => self.view.palette_anchor().unwrap_or(total),
        };
        self.focus_field(prev, now);
    }

    pub fn insert_from_palette(&mut self, token: &str, now: Instant) {
        self.view.palette_token_selected(token);
        self.sync_fields(now);
    }

    /// Drain change and focus requests raised by the field widgets.
    pub fn sync_fields(&mut self, now: Instant) {
        let mut changes: Vec<(usize, String)> = Vec::new();
        let mut focus_request: Option<usize> = None;
        for (step, field) in self.view.handles_mut() {
            if let Some(text) = field.take_change() {
                changes.push((step, text));
            }
            if field.take_focus_request() {
                focus_request = Some(step);
            }
        }
        for (step, text) in changes {
            self.view.edit(step, &text);
        }
        if let Some(step) = focus_request {
            self.focus_field(step, now);
        }
    }

    /// Left-button press at (`column`, `row`) with the problem pane laid out
    /// in `main`.
    ///
    /// A press on the palette is reported to the router as a palette press,
    /// never as leaving the field. If the field already lost terminal focus
    /// during the blur window, focus goes back to the palette's field.
    pub fn press_at(&mut self, main: Rect, column: u16, row: u16, now: Instant) {
        let pane = layout_pane(self, main);
        let palette_rect = palette_area(self, main, &pane).filter(|r| contains(*r, column, row));

        if let Some(rect) = palette_rect {
            self.view.palette_pointer_down();
            if self.focused.is_none() {
                if let Some(anchor) = self.view.palette_anchor() {
                    self.focus_field(anchor, now);
                }
            }
            match hit_test(&self.palette, rect, column, row) {
                Some(PaletteHit::TitleBar) => self.palette.begin_drag(column, row),
                Some(PaletteHit::Tab(i)) => self.palette.select_tab(i),
                Some(PaletteHit::Item(i)) => self.palette.press_item(i),
                Some(PaletteHit::Body) | None => {}
            }
            return;
        }

        match pane.hit_test(main, column, row) {
            PaneHit::Field(step) => self.focus_field(step, now),
            PaneHit::Convert(step) => {
                self.blur_field(now);
                self.view.convert(step);
            }
            PaneHit::Nothing => self.blur_field(now),
        }
    }

    pub fn convert_focused(&mut self) {
        if let Some(step) = self.focused {
            self.view.convert(step);
        }
    }

    pub fn has_dialog(&self) -> bool {
        !self.dialog_stack.is_empty()
    }

    pub fn top_dialog(&self) -> Option<&Dialog> {
        self.dialog_stack.last()
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialog_stack.push(dialog);
    }

    pub fn pop_dialog(&mut self) -> Option<Dialog> {
        self.dialog_stack.pop()
    }
}
