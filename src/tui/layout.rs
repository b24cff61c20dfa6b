// Screen layout: panel arrangement and sizing.
//
// +-----------------------------------------------------------------+
// | Title Bar (1 row)                                               |
// +---------+---------------+--------------------+------------------+
// | Players | Photo         | Stat Panels (1.8)  | Spray Chart (1.6)|
// | (fixed) | Profile (1.2) |                    |                  |
// +---------+---------------+--------------------+------------------+
// | Help / Status Bar (1 row)                                       |
// +-----------------------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the player picker column.
pub const PLAYER_LIST_WIDTH: u16 = 24;

/// Rows reserved under the photo for the profile text (with borders).
pub const PROFILE_HEIGHT: u16 = 7;

/// Resolved screen areas for each viewer zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub title_bar: Rect,
    pub player_list: Rect,
    /// Top of the profile column.
    pub photo: Rect,
    /// Name, number, school, grade, positions.
    pub profile: Rect,
    pub stats: Rect,
    pub spray_chart: Rect,
    /// Key hints, filter input, or the last status message.
    pub help_bar: Rect,
}

/// Build the viewer layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(10),   // body
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let title_bar = vertical[0];
    let body = vertical[1];
    let help_bar = vertical[2];

    // Card columns keep a 1.2 : 1.8 : 1.6 ratio.
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(PLAYER_LIST_WIDTH),
            Constraint::Fill(12),
            Constraint::Fill(18),
            Constraint::Fill(16),
        ])
        .split(body);

    let profile_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(PROFILE_HEIGHT)])
        .split(columns[1]);

    AppLayout {
        title_bar,
        player_list: columns[0],
        photo: profile_column[0],
        profile: profile_column[1],
        stats: columns[2],
        spray_chart: columns[3],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
