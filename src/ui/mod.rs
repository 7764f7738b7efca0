pub mod dialog;
pub mod keybar;
pub mod layout;
pub mod palette;
pub mod statusbar;
pub mod step;
pub mod titlebar;

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::state::AppState;

use self::step::PaneLayout;

/// Where the palette sits on screen, if it is showing.
pub fn palette_area(state: &AppState, main: Rect, pane: &PaneLayout) -> Option<Rect> {
    let anchor = state.view.palette_anchor()?;
    let field = pane.field_rect(main, anchor)?;
    Some(palette::palette_rect(&state.palette, field, main))
}

pub fn draw(f: &mut Frame, state: &AppState) {
    let area = f.area();
    let layout = layout::compute_layout(area);
    let pane = step::layout_pane(state, layout.main);

    titlebar::draw_titlebar(f, layout.titlebar, state);
    step::draw_steps(f, layout.main, &pane);
    if let Some(rect) = palette_area(state, layout.main, &pane) {
        let closing = state.view.pending_deadline().is_some();
        palette::draw_palette(f, rect, &state.palette, closing);
    }
    statusbar::draw_statusbar(f, layout.statusbar, state);
    keybar::draw_keybar(f, layout.keybar, state);

    if state.has_dialog() {
        dialog::draw_dialog(f, area, state);
    }
}
