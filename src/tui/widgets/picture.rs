// Picture widget: draws a decoded image as half-block cells.
//
// Each cell is "▀" with the upper pixel as foreground and the lower pixel as
// background. A missing image falls back to a dim placeholder line.

use image::DynamicImage;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::images::{thumbnail, Thumbnail};

const UPPER_HALF: &str = "▀";

/// Convert a thumbnail into styled lines, one per cell row.
pub fn thumbnail_lines(thumb: &Thumbnail) -> Vec<Line<'static>> {
    thumb
        .rows
        .iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .iter()
                .map(|cell| {
                    let [tr, tg, tb] = cell.top;
                    let [br, bg, bb] = cell.bottom;
                    Span::styled(
                        UPPER_HALF,
                        Style::default()
                            .fg(Color::Rgb(tr, tg, tb))
                            .bg(Color::Rgb(br, bg, bb)),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Render `image` centered in `area`, or `"<label> unavailable"` when there
/// is nothing to draw.
pub fn render(frame: &mut Frame, area: Rect, image: Option<&DynamicImage>, label: &str) {
    let thumb = image
        .map(|img| thumbnail(img, area.width, area.height))
        .unwrap_or_default();

    if thumb.is_empty() {
        render_placeholder(frame, area, label);
        return;
    }

    let x = area.x + (area.width - thumb.width()) / 2;
    let y = area.y + (area.height - thumb.height()) / 2;
    let target = Rect::new(x, y, thumb.width(), thumb.height());
    frame.render_widget(Paragraph::new(thumbnail_lines(&thumb)), target);
}

fn render_placeholder(frame: &mut Frame, area: Rect, label: &str) {
    if area.height == 0 {
        return;
    }
    let target = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    let paragraph = Paragraph::new(format!("[{label} unavailable]"))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        );
    frame.render_widget(paragraph, target);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
