// Stat panels widget: the six card panels stacked in display order.
//
// Each panel is a bordered block with one column per stat: label on the
// first row, value on the second. Derived values are yellow and carry the
// derived marker.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::card::{StatEntry, StatPanel, DERIVED_MARK};
use crate::tui::ViewState;

/// Rows per panel: borders plus label and value.
const PANEL_HEIGHT: u16 = 4;

/// Render every panel of the selected card into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(card) = state.selected_card() else {
        let paragraph = Paragraph::new("  No player selected.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Stats"));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut constraints: Vec<Constraint> = card
        .panels
        .iter()
        .map(|_| Constraint::Length(PANEL_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (panel, row) in card.panels.iter().zip(rows.iter()) {
        render_panel(frame, *row, panel);
    }

    if card.has_derived() {
        if let Some(footnote) = rows.last() {
            let note = Paragraph::new(format!(" {DERIVED_MARK} derived from other columns"))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM));
            frame.render_widget(note, *footnote);
        }
    }
}

fn render_panel(frame: &mut Frame, area: Rect, panel: &StatPanel) {
    let block = Block::default().borders(Borders::ALL).title(panel.title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if panel.entries.is_empty() {
        return;
    }
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            panel
                .entries
                .iter()
                .map(|_| Constraint::Ratio(1, panel.entries.len() as u32)),
        )
        .split(inner);

    for (entry, cell) in panel.entries.iter().zip(cells.iter()) {
        let lines = vec![
            Line::styled(entry.label, Style::default().fg(Color::Gray)),
            Line::styled(entry.marked(), value_style(entry)),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), *cell);
    }
}

/// Bold white for column values; yellow for derived ones.
pub fn value_style(entry: &StatEntry) -> Style {
    let color = if entry.is_derived() {
        Color::Yellow
    } else {
        Color::White
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
