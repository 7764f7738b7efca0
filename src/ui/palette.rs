use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::palette::SymbolPalette;

use super::layout::contains;

pub const PALETTE_WIDTH: u16 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteHit {
    /// Top border; dragging it moves the palette.
    TitleBar,
    Tab(usize),
    Item(usize),
    Body,
}

fn palette_height(palette: &SymbolPalette) -> u16 {
    let rows = palette
        .groups()
        .iter()
        .map(|g| g.items.len())
        .max()
        .unwrap_or(0);
    rows as u16 + 3
}

/// Place the palette to the right of `field`, shifted by the user's drag
/// offset and kept inside `bounds`.
pub fn palette_rect(palette: &SymbolPalette, field: Rect, bounds: Rect) -> Rect {
    let width = PALETTE_WIDTH.min(bounds.width);
    let height = palette_height(palette).min(bounds.height);
    let (dx, dy) = palette.offset();

    let x = (field.x as i32 + field.width as i32 + 1 + dx).clamp(
        bounds.x as i32,
        (bounds.x + bounds.width - width) as i32,
    );
    let y = (field.y as i32 + dy).clamp(
        bounds.y as i32,
        (bounds.y + bounds.height - height) as i32,
    );
    Rect::new(x as u16, y as u16, width, height)
}

/// Column range of each tab label on the tab row.
fn tab_spans(palette: &SymbolPalette, rect: Rect) -> Vec<(u16, u16)> {
    let inner_end = rect.x + rect.width.saturating_sub(1);
    let mut x = rect.x + 1;
    let mut spans = Vec::new();
    for group in palette.groups() {
        let w = group.title.chars().count() as u16 + 2;
        if x + w > inner_end {
            break;
        }
        spans.push((x, x + w));
        x += w;
    }
    spans
}

pub fn hit_test(palette: &SymbolPalette, rect: Rect, column: u16, row: u16) -> Option<PaletteHit> {
    if !contains(rect, column, row) {
        return None;
    }
    if row == rect.y {
        return Some(PaletteHit::TitleBar);
    }
    if row == rect.y + 1 {
        let tab = tab_spans(palette, rect)
            .iter()
            .position(|&(start, end)| (start..end).contains(&column));
        return Some(tab.map_or(PaletteHit::Body, PaletteHit::Tab));
    }
    let last_row = rect.y + rect.height.saturating_sub(1);
    if row < last_row {
        let idx = (row - rect.y - 2) as usize;
        if idx < palette.current_group().items.len() {
            return Some(PaletteHit::Item(idx));
        }
    }
    Some(PaletteHit::Body)
}

pub fn draw_palette(f: &mut Frame, rect: Rect, palette: &SymbolPalette, closing: bool) {
    let border = if closing {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let mut tab_row: Vec<Span> = Vec::new();
    for (i, _) in tab_spans(palette, rect).iter().enumerate() {
        let title = &palette.groups()[i].title;
        let style = if i == palette.tab() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        tab_row.push(Span::styled(format!(" {} ", title), style));
    }

    let mut lines = vec![Line::from(tab_row)];
    let inner = rect.width.saturating_sub(2) as usize;
    for (i, item) in palette.current_group().items.iter().enumerate() {
        let key = if i < 9 {
            format!("{}", i + 1)
        } else {
            " ".to_string()
        };
        let item_style = if palette.pressed() == Some(i) {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().fg(Color::White)
        };
        let label = format!(" {} {:<6}", key, item.label);
        let pad = inner.saturating_sub(label.chars().count() + item.symbol.chars().count() + 1);
        lines.push(Line::from(vec![
            Span::styled(label, item_style),
            Span::styled(" ".repeat(pad), item_style),
            Span::styled(format!("{} ", item.symbol), item_style.fg(Color::DarkGray)),
        ]));
    }

    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ⠿ Symbols ")
        .border_style(border);
    f.render_widget(Paragraph::new(lines).block(block), rect);
}
