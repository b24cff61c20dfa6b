// TUI widget modules for each viewer zone.

pub mod help_bar;
pub mod picture;
pub mod player_list;
pub mod profile;
pub mod spray_chart;
pub mod stat_panels;
pub mod status_bar;

/// Flatten a test terminal's buffer into one string per row.
#[cfg(test)]
pub(crate) fn buffer_lines(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

#[cfg(test)]
pub(crate) fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
    buffer_lines(terminal).join("\n")
}
