// Player list widget: the roster picker.
//
// "#12 Alex Rivera" per row, filtered by name, with the selection
// highlighted. The title shows the filter and the match count.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::stats::PlayerRecord;
use crate::tui::ViewState;

/// Render the player list into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = state.visible();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(build_title(state, visible.len()));

    if visible.is_empty() {
        let text = if state.players.is_empty() {
            "  No players loaded."
        } else {
            "  No matching players."
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|&i| ListItem::new(format_row(&state.players[i])))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// "#12 Alex Rivera", or just the name when the number is blank.
pub fn format_row(player: &PlayerRecord) -> String {
    if player.number.is_empty() {
        player.name.clone()
    } else {
        format!("#{} {}", player.number, player.name)
    }
}

fn build_title(state: &ViewState, shown: usize) -> Line<'static> {
    let total = state.players.len();
    let title = if state.filter_text.is_empty() && !state.filter_mode {
        format!("Players ({total})")
    } else {
        format!("Players /{} ({shown}/{total})", state.filter_text)
    };
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
