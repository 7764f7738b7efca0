use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::focus::FocusState;
use crate::state::AppState;

pub fn draw_statusbar(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];

    match &state.status {
        Some(msg) => {
            spans.push(Span::styled(
                format!("[{}] ", msg.at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ));
            let color = if msg.is_error { Color::Red } else { Color::Green };
            spans.push(Span::styled(msg.text.clone(), Style::default().fg(color)));
        }
        None => spans.push(Span::styled(
            "Ctrl+O to open a problem",
            Style::default().fg(Color::DarkGray),
        )),
    }

    let palette_text = match state.view.focus_state() {
        FocusState::Active(step) if state.view.pending_deadline().is_some() => {
            format!("palette: part {} (closing)", step)
        }
        FocusState::Active(step) => format!("palette: part {}", step),
        FocusState::Idle => "palette: hidden".to_string(),
    };
    let right = format!("{}   [?] help ", palette_text);

    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let pad = (area.width as usize).saturating_sub(used + right.chars().count());
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(right, Style::default().fg(Color::DarkGray)));

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(30, 30, 30)));
    f.render_widget(widget, area);
}
