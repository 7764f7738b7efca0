use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::render::INVALID_EXPRESSION_MARKUP;
use crate::state::AppState;
use crate::view::StepRow;

const FIELD_MAX_WIDTH: u16 = 56;
const FIELD_INDENT: u16 = 2;
const FIELD_HEIGHT: usize = 3;
const CONVERT_LABEL: &str = "[ Convert ]";

/// Answer box position in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBox {
    pub step: usize,
    pub top: usize,
    pub width: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertButton {
    pub step: usize,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneHit {
    Field(usize),
    Convert(usize),
    Nothing,
}

/// Rendered problem pane plus everything needed to map clicks back onto it.
pub struct PaneLayout {
    pub lines: Vec<Line<'static>>,
    pub fields: Vec<FieldBox>,
    pub buttons: Vec<ConvertButton>,
    pub scroll: usize,
}

impl PaneLayout {
    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> PaneHit {
        if !super::layout::contains(area, column, row) {
            return PaneHit::Nothing;
        }
        let line = (row - area.y) as usize + self.scroll;
        let rel_x = column - area.x;

        for b in &self.buttons {
            let start = FIELD_INDENT;
            let end = start + CONVERT_LABEL.chars().count() as u16;
            if b.line == line && (start..end).contains(&rel_x) {
                return PaneHit::Convert(b.step);
            }
        }
        for fb in &self.fields {
            if (fb.top..fb.top + FIELD_HEIGHT).contains(&line)
                && (FIELD_INDENT..FIELD_INDENT + fb.width).contains(&rel_x)
            {
                return PaneHit::Field(fb.step);
            }
        }
        PaneHit::Nothing
    }

    /// On-screen rectangle of a step's answer box, with its row clamped
    /// into the pane when the box is scrolled out of view.
    pub fn field_rect(&self, area: Rect, step: usize) -> Option<Rect> {
        let fb = self.fields.iter().find(|fb| fb.step == step)?;
        let top = fb.top as i64 - self.scroll as i64;
        let max_top = area.height.saturating_sub(1) as i64;
        let y = area.y + top.clamp(0, max_top) as u16;
        Some(Rect::new(
            area.x + FIELD_INDENT,
            y,
            fb.width,
            FIELD_HEIGHT as u16,
        ))
    }
}

pub fn layout_pane(state: &AppState, area: Rect) -> PaneLayout {
    let width = area.width.saturating_sub(1) as usize; // scrollbar column
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut fields = Vec::new();
    let mut buttons = Vec::new();

    let Some(problem) = state.view.problem() else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  No problem loaded. Press Ctrl+O to open one.",
            Style::default().fg(Color::DarkGray),
        )));
        return PaneLayout {
            lines,
            fields,
            buttons,
            scroll: 0,
        };
    };

    lines.push(Line::from(""));
    if !problem.statement.is_empty() {
        // Shown verbatim, like step statements
        for para in problem.statement.lines().map(str::trim) {
            if para.is_empty() {
                lines.push(Line::from(""));
                continue;
            }
            for text in wrap_text(para, width.saturating_sub(2)) {
                lines.push(Line::from(format!("  {}", text)));
            }
        }
        lines.push(Line::from(""));
    }

    let field_width = (width as u16)
        .saturating_sub(FIELD_INDENT * 2)
        .min(FIELD_MAX_WIDTH)
        .max(8);

    for row in state.view.rows() {
        lines.push(Line::from(Span::styled(
            format!("  Part {}", row.step.index),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for text in wrap_text(&row.step.statement, width.saturating_sub(2)) {
            lines.push(Line::from(format!("  {}", text)));
        }

        fields.push(FieldBox {
            step: row.step.index,
            top: lines.len(),
            width: field_width,
        });
        lines.extend(field_lines(state, &row, field_width));

        lines.extend(wrap_styled_line(
            Line::from(vec![
                Span::styled("  LaTeX: ", Style::default().fg(Color::DarkGray)),
                Span::styled(row.expression.to_string(), Style::default().fg(Color::Gray)),
            ]),
            width,
        ));

        buttons.push(ConvertButton {
            step: row.step.index,
            line: lines.len(),
        });
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                CONVERT_LABEL,
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Rgb(50, 50, 50))
                    .add_modifier(Modifier::BOLD),
            ),
        ]));

        lines.extend(markup_lines(row.markup, width));
        lines.push(Line::from(""));
    }

    let scroll = effective_scroll(state, &fields, lines.len(), area.height as usize);
    PaneLayout {
        lines,
        fields,
        buttons,
        scroll,
    }
}

/// Clamp the stored scroll, then pull the focused field into view.
fn effective_scroll(state: &AppState, fields: &[FieldBox], total: usize, height: usize) -> usize {
    let mut scroll = state.scroll.min(total.saturating_sub(height));
    let focused = state
        .focused
        .and_then(|step| fields.iter().find(|fb| fb.step == step));
    if let Some(fb) = focused {
        let bottom = fb.top + FIELD_HEIGHT;
        if fb.top < scroll {
            scroll = fb.top;
        } else if bottom > scroll + height {
            scroll = bottom.saturating_sub(height);
        }
    }
    scroll
}

fn field_lines(state: &AppState, row: &StepRow<'_>, width: u16) -> Vec<Line<'static>> {
    let step = row.step.index;
    let focused = state.focused == Some(step);
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else if row.palette_visible {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let inner = width.saturating_sub(2) as usize;
    let (text, cursor) = match state.view.handle(step) {
        Some(field) => (field.text().to_string(), field.cursor()),
        None => (row.expression.to_string(), row.expression.chars().count()),
    };

    let mut middle: Vec<Span<'static>> = vec![Span::raw("  "), Span::styled("│", border)];
    if text.is_empty() && !focused {
        let placeholder: String = "type an expression".chars().take(inner).collect();
        let pad = inner.saturating_sub(placeholder.chars().count());
        middle.push(Span::styled(placeholder, Style::default().fg(Color::DarkGray)));
        middle.push(Span::raw(" ".repeat(pad)));
    } else {
        middle.extend(field_content(&text, cursor, inner, focused));
    }
    middle.push(Span::styled("│", border));

    vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("┌{}┐", "─".repeat(inner)), border),
        ]),
        Line::from(middle),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("└{}┘", "─".repeat(inner)), border),
        ]),
    ]
}

/// Visible window of the field text, scrolled so the cursor stays inside.
fn field_content(text: &str, cursor: usize, inner: usize, focused: bool) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    let start = if focused && cursor >= inner {
        cursor + 1 - inner
    } else {
        0
    };
    let end = (start + inner).min(chars.len());
    let text_style = Style::default().fg(Color::White);

    let mut spans = Vec::new();
    if focused {
        let cur = cursor.clamp(start, end);
        spans.push(Span::styled(chars[start..cur].iter().collect::<String>(), text_style));
        let under = chars.get(cur).copied().unwrap_or(' ');
        spans.push(Span::styled(
            under.to_string(),
            Style::default().fg(Color::Black).bg(Color::White),
        ));
        let rest_end = end.max(cur + 1).min(chars.len());
        if cur + 1 < rest_end {
            spans.push(Span::styled(
                chars[cur + 1..rest_end].iter().collect::<String>(),
                text_style,
            ));
        }
        let shown = rest_end.max(cur + 1) - start;
        spans.push(Span::raw(" ".repeat(inner.saturating_sub(shown))));
    } else {
        let shown: String = chars[start..end].iter().collect();
        let pad = inner.saturating_sub(end - start);
        spans.push(Span::styled(shown, text_style));
        spans.push(Span::raw(" ".repeat(pad)));
    }
    spans
}

fn markup_lines(markup: Option<&str>, width: usize) -> Vec<Line<'static>> {
    let arrow = Span::styled("  ⇒ ", Style::default().fg(Color::DarkGray));
    match markup {
        None => Vec::new(),
        Some("") => vec![Line::from(vec![
            arrow,
            Span::styled("(empty)", Style::default().fg(Color::DarkGray)),
        ])],
        Some(m) if m == INVALID_EXPRESSION_MARKUP => vec![Line::from(vec![
            arrow,
            Span::styled(
                "Invalid expression",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ])],
        Some(m) => wrap_styled_line(
            Line::from(vec![
                arrow,
                Span::styled(m.to_string(), Style::default().fg(Color::Green)),
            ]),
            width,
        ),
    }
}

pub fn draw_steps(f: &mut Frame, area: Rect, pane: &PaneLayout) {
    let total = pane.lines.len();
    let visible = area.height as usize;
    let display: Vec<Line> = pane
        .lines
        .iter()
        .skip(pane.scroll)
        .take(visible)
        .cloned()
        .collect();
    f.render_widget(Paragraph::new(display), area);

    if total > visible {
        let mut scrollbar_state = ScrollbarState::new(total)
            .position(pane.scroll)
            .viewport_content_length(visible);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn wrap_styled_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line];
    }

    let chars: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |c| (c, span.style)))
        .collect();
    if chars.len() <= width {
        return vec![line];
    }

    let mut result: Vec<Line<'static>> = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        if chars.len() - pos <= width {
            result.push(styled_chars_to_line(&chars[pos..]));
            break;
        }

        let chunk_end = pos + width;
        let break_at = if chars[chunk_end].0 == ' ' {
            chunk_end
        } else {
            match chars[pos..chunk_end].iter().rposition(|(c, _)| *c == ' ') {
                Some(sp) if sp > 0 => pos + sp,
                _ => chunk_end,
            }
        };

        result.push(styled_chars_to_line(&chars[pos..break_at]));
        pos = break_at;
        if pos < chars.len() && chars[pos].0 == ' ' {
            pos += 1;
        }
    }
    result
}

fn styled_chars_to_line(chars: &[(char, Style)]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut current_style = chars.first().map(|&(_, s)| s).unwrap_or_default();

    for &(c, style) in chars {
        if style != current_style && !current.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current), current_style));
        }
        current_style = style;
        current.push(c);
    }
    if !current.is_empty() {
        spans.push(Span::styled(current, current_style));
    }
    Line::from(spans)
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}
