use ratatui::{prelude::*, widgets::*};

use crate::forms::FormRow;
use crate::messages::render::{InputLine, RowTone};
use crate::messages::ui_events::Screen;

/// Renders a one-line input field; the cursor is drawn as a reversed cell
pub fn render_input(input: &InputLine) -> Paragraph<'_> {
    let style = if input.active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(format!(" {} ", input.label));

    let line = if input.active {
        with_cursor(&input.value, input.value[..input.cursor.min(input.value.len())].chars().count())
    } else {
        Line::from(input.value.as_str())
    };
    Paragraph::new(line).block(block)
}

/// Split `value` around char index `cursor` and highlight the cell under it
fn with_cursor(value: &str, cursor: usize) -> Line<'static> {
    let before: String = value.chars().take(cursor).collect();
    let at: String = value.chars().nth(cursor).map(String::from).unwrap_or_else(|| String::from(" "));
    let after: String = value.chars().skip(cursor + 1).collect();
    Line::from(vec![
        Span::raw(before),
        Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(after),
    ])
}

/// Renders form rows as `label: value` lines
pub fn form_lines(rows: &[FormRow]) -> Vec<Line<'static>> {
    let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            let label_style = if row.focused {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if row.focused { "> " } else { "  " };
            let mut spans = vec![
                Span::styled(format!("{}{:<width$} : ", marker, row.label, width = width), label_style),
            ];
            match row.cursor {
                Some(cursor) => spans.extend(with_cursor(&row.value, cursor).spans),
                None => spans.push(Span::raw(row.value.clone())),
            }
            Line::from(spans)
        })
        .collect()
}

/// Renders the screen tabs
pub fn render_tabs(selected: Screen) -> Tabs<'static> {
    let titles: Vec<Line> = Screen::TABS
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!(" {}:{} ", i + 1, s.title())))
        .collect();

    Tabs::new(titles)
        .select(Screen::TABS.iter().position(|s| *s == selected).unwrap_or(0))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
        .divider("|")
}

/// Row color for table emphasis
pub fn tone_style(tone: RowTone) -> Style {
    match tone {
        RowTone::Normal => Style::default(),
        RowTone::Warning => Style::default().fg(Color::Red),
        RowTone::Muted => Style::default().fg(Color::DarkGray),
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_splits_multibyte_text() {
        let line = with_cursor("héllo", 1);
        let parts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["h", "é", "llo"]);

        let line = with_cursor("ab", 2);
        let parts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["ab", " ", ""]);
    }

    #[test]
    fn form_labels_are_aligned() {
        let rows = vec![
            FormRow {
                label: "Name".into(),
                value: "Bread".into(),
                focused: false,
                cursor: None,
            },
            FormRow {
                label: "Price".into(),
                value: "2".into(),
                focused: true,
                cursor: Some(1),
            },
        ];
        let lines = form_lines(&rows);
        assert_eq!(lines[0].spans[0].content, "  Name  : ");
        assert_eq!(lines[1].spans[0].content, "> Price : ");
    }
}
