// Help bar widget: key hints, the filter prompt, or the last status message.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{StatusMessage, ViewState};

pub const HELP_TEXT: &str =
    " ↑↓/jk:Select | PgUp/PgDn | Home/End | /:Filter | e:Export CSV | q:Quit";

/// Render the bottom bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(build_line(state)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Filter prompt while typing, else the status message, else key hints.
pub fn build_line(state: &ViewState) -> Line<'static> {
    if state.filter_mode {
        return Line::from(vec![
            Span::styled(
                " Filter: ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{}_", state.filter_text), Style::default().fg(Color::White)),
            Span::styled(
                "  Enter:Keep | Esc:Clear",
                Style::default().fg(Color::White).add_modifier(Modifier::DIM),
            ),
        ]);
    }

    match &state.status {
        Some(StatusMessage::Info(text)) => Line::from(Span::styled(
            format!(" {text}"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Some(StatusMessage::Error(text)) => Line::from(Span::styled(
            format!(" Error: {text}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            HELP_TEXT,
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_help_by_default() {
        let state = ViewState::default();
        assert_eq!(build_line(&state).to_string(), HELP_TEXT);
    }

    #[test]
    fn shows_filter_prompt() {
        let mut state = ViewState::default();
        state.filter_mode = true;
        state.filter_text = "ri".to_string();
        assert_eq!(build_line(&state).to_string(), " Filter: ri_  Enter:Keep | Esc:Clear");
    }

    #[test]
    fn shows_export_status() {
        let mut state = ViewState::default();
        state.status = Some(StatusMessage::Info("Exported to `Alex_Rivera_stats.csv`".to_string()));
        let line = build_line(&state);
        assert_eq!(line.to_string(), " Exported to `Alex_Rivera_stats.csv`");
        assert_eq!(line.spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn shows_errors_in_red() {
        let mut state = ViewState::default();
        state.status = Some(StatusMessage::Error("disk full".to_string()));
        let line = build_line(&state);
        assert_eq!(line.to_string(), " Error: disk full");
        assert_eq!(line.spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
