// Spray chart widget: the shared field image with its caption.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::widgets::picture;
use crate::tui::ViewState;

pub const TITLE: &str = "Batting Spray Chart";
pub const CAPTION: &str = "Defensive Positions";

/// Render the spray chart column into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title(TITLE);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    picture::render(frame, rows[0], state.image(&state.spray_chart), CAPTION);

    let caption = Paragraph::new(CAPTION)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(caption, rows[1]);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
