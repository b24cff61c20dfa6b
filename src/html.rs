// Static HTML rendering of a stat card.
//
// Produces one self-contained page: profile column, stat card blocks, and the
// spray chart, with images embedded as PNG data URIs.

use tracing::warn;

use crate::card::{format_positions, StatCard, StatPanel, DERIVED_MARK};
use crate::config::Config;
use crate::export;
use crate::images;
use crate::stats::derive::Origin;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn render_panel(out: &mut String, panel: &StatPanel) {
    out.push_str(&format!(
        "<div class=\"panel\"><h4>{}</h4><div class=\"row\">",
        escape_html(panel.title)
    ));
    for entry in &panel.entries {
        let title = match entry.origin {
            Origin::Derived(formula) => {
                format!(" title=\"derived: {}\"", escape_html(formula))
            }
            _ => String::new(),
        };
        out.push_str(&format!(
            "<div class=\"stat\"{title}><strong>{}</strong><br><span>{}</span></div>",
            escape_html(entry.label),
            escape_html(&entry.marked()),
        ));
    }
    out.push_str("</div></div>\n");
}

fn render_image(out: &mut String, uri: Option<&str>, alt: &str) {
    match uri {
        Some(uri) => out.push_str(&format!("<img src=\"{uri}\" alt=\"{}\">", escape_html(alt))),
        None => out.push_str(&format!(
            "<div class=\"placeholder\">{} unavailable</div>",
            escape_html(alt)
        )),
    }
}

/// Default output name for a player's page, e.g. `Alex_Rivera_card.html`.
pub fn page_file_name(player_name: &str) -> String {
    format!("{}_card.html", export::file_stem(player_name))
}

/// Render a page from already-encoded image URIs.
pub fn render_page(card: &StatCard, photo_uri: Option<&str>, spray_uri: Option<&str>) -> String {
    let p = &card.profile;
    let mut out = String::new();

    out.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Player Stat Card: {}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_html(&p.name),
        STYLE
    ));
    out.push_str("<div class=\"columns\">\n");

    out.push_str("<div class=\"col profile\" style=\"flex:1.2\">");
    render_image(&mut out, photo_uri, "Player photo");
    out.push_str(&format!(
        "<h2>{}</h2><p><strong>#{}</strong></p><p><strong>School:</strong> {}</p>\
         <p><strong>Grade:</strong> {}</p><p><strong>Positions:</strong> {}</p></div>\n",
        escape_html(&p.name),
        escape_html(&p.number),
        escape_html(&p.school),
        escape_html(&p.grade),
        escape_html(&format_positions(&p.positions)),
    ));

    out.push_str("<div class=\"col\" style=\"flex:1.8\">\n");
    for panel in &card.panels {
        render_panel(&mut out, panel);
    }
    if card.has_derived() {
        out.push_str(&format!(
            "<p class=\"note\">{DERIVED_MARK} derived from other columns</p>\n"
        ));
    }
    out.push_str("</div>\n");

    out.push_str("<div class=\"col chart\" style=\"flex:1.6\"><h4>Batting Spray Chart</h4>");
    render_image(&mut out, spray_uri, "Defensive Positions");
    out.push_str("<div class=\"caption\">Defensive Positions</div></div>\n");

    out.push_str("</div>\n</body>\n</html>\n");
    out
}

/// Encode an image for embedding; a failure leaves a placeholder.
fn embed(path: &std::path::Path) -> Option<String> {
    match images::png_data_uri(path) {
        Ok(uri) => Some(uri),
        Err(e) => {
            warn!("image not embedded: {}", e);
            None
        }
    }
}

/// Render a page for a card, loading its photo and the configured spray
/// chart.
pub fn render_card_page(card: &StatCard, config: &Config) -> String {
    let photo = embed(&card.profile.photo);
    let spray = embed(&config.spray_chart_path());
    render_page(card, photo.as_deref(), spray.as_deref())
}

const STYLE: &str = "\
body{font-family:sans-serif;margin:1rem;color:#000}\
.columns{display:flex;gap:1rem}\
.col{min-width:0}\
.col img{width:100%;border-radius:8px}\
.panel{background:#F9F9FF;padding:1rem;border-radius:10px;margin-bottom:1rem}\
.row{display:flex;justify-content:space-between}\
.stat{flex:1;margin:.5rem;padding:.75rem;background:#fff;border:1px solid #ddd;border-radius:8px;text-align:center}\
.chart{background:#f0ffff;padding:1rem;border-radius:10px;text-align:center}\
.caption{font-size:.9rem;color:#555}\
.placeholder{padding:2rem;border:1px dashed #aaa;border-radius:8px;color:#777;text-align:center}\
.note{font-size:.8rem;color:#555}";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{build_panels, Profile};
    use crate::config::DisplayConfig;
    use crate::stats::fixtures::player;
    use std::path::PathBuf;

    fn card(name: &str) -> StatCard {
        let p = player(name, &[("OBP", Some(0.4)), ("SLG", Some(0.5))], &[], &[]);
        StatCard {
            profile: Profile {
                name: p.name.clone(),
                number: "12".to_string(),
                school: p.school.clone(),
                grade: p.grade.clone(),
                positions: vec!["Catcher".to_string()],
                photo: PathBuf::from("/nonexistent/photo.png"),
            },
            panels: build_panels(&p, &DisplayConfig::default()),
        }
    }

    #[test]
    fn escape_html_covers_special_chars() {
        assert_eq!(
            escape_html("<a href=\"x\">O'Neil & co</a>"),
            "&lt;a href=&quot;x&quot;&gt;O&#39;Neil &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn page_file_name_follows_export_naming() {
        assert_eq!(page_file_name("Alex Rivera"), "Alex_Rivera_card.html");
    }

    #[test]
    fn page_contains_profile_and_panels() {
        let html = render_page(&card("Alex Rivera"), None, None);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Alex Rivera</h2>"));
        assert!(html.contains("<strong>#12</strong>"));
        assert!(html.contains("Cushing Academy"));
        assert!(html.contains("Catcher"));
        for title in ["Key Stats", "Batting Breakdown", "Pitching Breakdown", "Fielding Summary"] {
            assert!(html.contains(title), "missing panel {title}");
        }
        assert!(html.contains("Defensive Positions"));
    }

    #[test]
    fn derived_stats_carry_formula_title() {
        let html = render_page(&card("Alex Rivera"), None, None);
        assert!(html.contains("title=\"derived: OBP + SLG\""));
        assert!(html.contains("0.900*"));
        assert!(html.contains("derived from other columns"));
    }

    #[test]
    fn missing_images_render_placeholders() {
        let html = render_page(&card("Alex Rivera"), None, None);
        assert!(html.contains("Player photo unavailable"));
        assert!(html.contains("Defensive Positions unavailable"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn images_embedded_when_present() {
        let html = render_page(
            &card("Alex Rivera"),
            Some("data:image/png;base64,AAAA"),
            Some("data:image/png;base64,BBBB"),
        );
        assert!(html.contains("<img src=\"data:image/png;base64,AAAA\" alt=\"Player photo\">"));
        assert!(html.contains("<img src=\"data:image/png;base64,BBBB\""));
    }

    #[test]
    fn names_are_escaped() {
        let html = render_page(&card("Bo <Script>"), None, None);
        assert!(html.contains("Bo &lt;Script&gt;"));
        assert!(!html.contains("<Script>"));
    }
}
