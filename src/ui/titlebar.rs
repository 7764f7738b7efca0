use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::AppState;

pub fn draw_titlebar(f: &mut Frame, area: Rect, state: &AppState) {
    let title = state
        .view
        .problem()
        .map_or("No problem loaded", |p| p.title.as_str());

    let right_text = if state.loading.is_some() {
        Span::styled(
            " loading… ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else if let Some(path) = &state.current_file {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Span::styled(format!(" {} ", name), Style::default().fg(Color::Rgb(200, 200, 120)))
    } else {
        Span::raw("")
    };

    let title_text = format!("[ {} ]", title);
    let title_len = title_text.chars().count();
    let right_len = right_text.content.chars().count();

    // Center the title over the full width, right text flush right
    let available = area.width as usize;
    let center_pad = available.saturating_sub(title_len) / 2;
    let right_pad = available.saturating_sub(center_pad + title_len + right_len);

    let line = Line::from(vec![
        Span::raw(" ".repeat(center_pad)),
        Span::styled(
            title_text,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(right_pad)),
        right_text,
    ]);

    let widget = Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
