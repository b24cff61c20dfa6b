// Status bar widget: school, card title, and roster counts.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the top bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(title_spans(state)))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// " Cushing Academy | Player Stat Card | 5 players"
pub fn title_spans(state: &ViewState) -> Vec<Span<'static>> {
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));
    let mut spans = Vec::new();

    if !state.school.is_empty() {
        spans.push(Span::styled(
            format!(" {}", state.school),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(separator());
    } else {
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(
        "Player Stat Card",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(separator());

    let total = state.players.len();
    let count = if state.filter_text.is_empty() {
        format!("{total} players")
    } else {
        format!("{} of {total} players", state.visible().len())
    };
    spans.push(Span::styled(count, Style::default().fg(Color::White)));
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::fixtures;

    fn text(state: &ViewState) -> String {
        title_spans(state)
            .iter()
            .map(|s| s.content.as_ref())
            .collect()
    }

    #[test]
    fn title_shows_school_and_count() {
        assert_eq!(
            text(&fixtures::state()),
            " Cushing Academy | Player Stat Card | 3 players"
        );
    }

    #[test]
    fn title_counts_filtered_players() {
        let mut state = fixtures::state();
        state.update_filter(|f| f.push('a'));
        assert_eq!(
            text(&state),
            " Cushing Academy | Player Stat Card | 3 of 3 players"
        );
        state.update_filter(|f| f.push_str("lex"));
        assert!(text(&state).ends_with("1 of 3 players"));
    }

    #[test]
    fn title_without_school() {
        let state = ViewState::default();
        assert_eq!(text(&state), " Player Stat Card | 0 players");
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
