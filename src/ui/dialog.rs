use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::state::{AppState, Dialog};

pub fn draw_dialog(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(dialog) = state.top_dialog() else {
        return;
    };

    match dialog {
        Dialog::OpenFile => draw_open_file(f, area, state),
        Dialog::ConfirmQuit => draw_confirm_quit(f, area),
        Dialog::Help => draw_help(f, area),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_open_file(f: &mut Frame, area: Rect, state: &AppState) {
    let width = area.width.saturating_sub(8).clamp(30, 72);
    let inner = width.saturating_sub(6) as usize;

    // Keep the tail of long paths visible
    let chars: Vec<char> = state.path_input.chars().collect();
    let start = chars.len().saturating_sub(inner.saturating_sub(1));
    let visible: String = chars[start..].iter().collect();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Open problem document",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("   "),
            Span::styled(visible, Style::default().fg(Color::White)),
            Span::styled(" ", Style::default().bg(Color::White)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("   [Enter] Open", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];

    let rect = centered_rect(width, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Open ")
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn draw_confirm_quit(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Quit?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   Answers are not saved."),
        Line::from(""),
        Line::from(vec![
            Span::styled("   [Enter] Confirm", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];

    let rect = centered_rect(38, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Key Bindings",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   Tab/S-Tab  Next/previous answer field"),
        Line::from("   Enter      Convert the focused answer"),
        Line::from("   Esc        Leave the field"),
        Line::from("   Alt+1..9   Insert palette symbol"),
        Line::from("   Alt+←/→    Switch palette tab"),
        Line::from("   arrows     Scroll (outside a field)"),
        Line::from("   PgUp/PgDn  Scroll a page"),
        Line::from("   Ctrl+O     Open a problem"),
        Line::from("   Ctrl+Q     Quit"),
        Line::from("   ?/F1       This help"),
        Line::from(""),
        Line::from("   Typing sqrt, pi, theta, sin … in a field"),
        Line::from("   turns the word into a command."),
        Line::from(""),
        Line::from(Span::styled(
            "        [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    let rect = centered_rect(48, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), rect);
}
