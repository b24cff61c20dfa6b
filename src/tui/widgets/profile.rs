// Profile widget: player photo above name, number, school, grade, and
// positions.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::card::{format_positions, Profile};
use crate::tui::widgets::picture;
use crate::tui::ViewState;

/// Render the photo into `photo_area` and the profile text into
/// `details_area`.
pub fn render(frame: &mut Frame, photo_area: Rect, details_area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Player");
    let inner = block.inner(photo_area);
    frame.render_widget(block, photo_area);

    let Some(card) = state.selected_card() else {
        let paragraph = Paragraph::new("  No player selected.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, details_area);
        return;
    };

    picture::render(frame, inner, state.image(&card.profile.photo), "Player photo");

    let paragraph = Paragraph::new(build_profile_lines(&card.profile))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, details_area);
}

/// Name and number, then labelled school, grade, and positions.
pub fn build_profile_lines(profile: &Profile) -> Vec<Line<'static>> {
    let label = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD);
    vec![
        Line::from(Span::styled(
            profile.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("#{}", profile.number),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("School: ", label),
            Span::raw(profile.school.clone()),
        ]),
        Line::from(vec![
            Span::styled("Grade: ", label),
            Span::raw(profile.grade.clone()),
        ]),
        Line::from(vec![
            Span::styled("Positions: ", label),
            Span::raw(format_positions(&profile.positions)),
        ]),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
