// Stat card model: player profile plus ordered stat panels.
//
// Shared by every front end (terminal, plain text, JSON, HTML) so the panel
// order, stat order, and rounding stay identical everywhere.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::{Config, DisplayConfig};
use crate::stats::derive::{self, Origin};
use crate::stats::{PlayerRecord, Section};

/// Suffix appended to values computed by a fallback formula.
pub const DERIVED_MARK: &str = "*";

// ---------------------------------------------------------------------------
// Panel definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelKind {
    KeyStats,
    Batting,
    Pitching,
    Fielding,
    Production,
    PitchingDetail,
}

impl PanelKind {
    pub const ALL: [PanelKind; 6] = [
        PanelKind::KeyStats,
        PanelKind::Batting,
        PanelKind::Pitching,
        PanelKind::Fielding,
        PanelKind::Production,
        PanelKind::PitchingDetail,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PanelKind::KeyStats => "Key Stats",
            PanelKind::Batting => "Batting Breakdown",
            PanelKind::Pitching => "Pitching Breakdown",
            PanelKind::Fielding => "Fielding Summary",
            PanelKind::Production => "Production",
            PanelKind::PitchingDetail => "Pitching Detail",
        }
    }

    pub fn stats(self) -> &'static [(Section, &'static str)] {
        use Section::*;
        match self {
            PanelKind::KeyStats => &[
                (Batting, "AVG"),
                (Batting, "OPS"),
                (Pitching, "ERA"),
                (Pitching, "WHIP"),
            ],
            PanelKind::Batting => &[
                (Batting, "AVG"),
                (Batting, "OPS"),
                (Batting, "SLG"),
                (Batting, "OBP"),
            ],
            PanelKind::Pitching => &[
                (Pitching, "IP"),
                (Pitching, "GP"),
                (Pitching, "ERA"),
                (Pitching, "WHIP"),
            ],
            PanelKind::Fielding => &[
                (Fielding, "TC"),
                (Fielding, "FPCT"),
                (Fielding, "Assists"),
                (Fielding, "Errors"),
            ],
            PanelKind::Production => &[
                (Batting, "HR"),
                (Batting, "XBH"),
                (Batting, "RBI"),
                (Batting, "R"),
                (Batting, "SB"),
                (Batting, "SB%"),
            ],
            PanelKind::PitchingDetail => &[(Pitching, "FIP"), (Pitching, "BB/INN")],
        }
    }

    pub fn digits(self, display: &DisplayConfig) -> usize {
        match self {
            PanelKind::KeyStats => display.key_stats,
            PanelKind::Batting => display.batting,
            PanelKind::Pitching => display.pitching,
            PanelKind::Fielding => display.fielding,
            PanelKind::Production => display.production,
            PanelKind::PitchingDetail => display.pitching_detail,
        }
    }
}

// ---------------------------------------------------------------------------
// Card types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StatEntry {
    pub label: &'static str,
    pub section: Section,
    pub value: f64,
    /// Value rounded to the panel's digits, without the derived marker.
    pub display: String,
    pub origin: Origin,
}

impl StatEntry {
    pub fn is_derived(&self) -> bool {
        matches!(self.origin, Origin::Derived(_))
    }

    /// Display text with the derived marker when applicable.
    pub fn marked(&self) -> String {
        if self.is_derived() {
            format!("{}{}", self.display, DERIVED_MARK)
        } else {
            self.display.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatPanel {
    pub kind: PanelKind,
    pub title: &'static str,
    pub entries: Vec<StatEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub name: String,
    pub number: String,
    pub school: String,
    pub grade: String,
    pub positions: Vec<String>,
    pub photo: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatCard {
    pub profile: Profile,
    pub panels: Vec<StatPanel>,
}

impl StatCard {
    pub fn panel(&self, kind: PanelKind) -> Option<&StatPanel> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    pub fn has_derived(&self) -> bool {
        self.panels
            .iter()
            .flat_map(|p| &p.entries)
            .any(StatEntry::is_derived)
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Round a stat for display: fixed decimals, no thousands grouping.
pub fn format_stat(value: f64, digits: usize) -> String {
    format!("{:.*}", digits, value)
}

/// Comma-joined positions, or "-" when none are known.
pub fn format_positions(positions: &[String]) -> String {
    if positions.is_empty() {
        "-".to_string()
    } else {
        positions.join(", ")
    }
}

/// Build the full card for one player.
pub fn build_card(player: &PlayerRecord, config: &Config) -> StatCard {
    let profile = Profile {
        name: player.name.clone(),
        number: player.number.clone(),
        school: player.school.clone(),
        grade: player.grade.clone(),
        positions: player.positions.clone(),
        photo: config.photo_for(&player.name),
    };
    StatCard {
        profile,
        panels: build_panels(player, &config.display),
    }
}

/// Resolve every panel for a player.
pub fn build_panels(player: &PlayerRecord, display: &DisplayConfig) -> Vec<StatPanel> {
    PanelKind::ALL
        .into_iter()
        .map(|kind| {
            let digits = kind.digits(display);
            let entries = kind
                .stats()
                .iter()
                .map(|&(section, label)| {
                    let resolved = derive::resolve(player, section, label);
                    StatEntry {
                        label,
                        section,
                        value: resolved.value,
                        display: format_stat(resolved.value, digits),
                        origin: resolved.origin,
                    }
                })
                .collect();
            StatPanel {
                kind,
                title: kind.title(),
                entries,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Plain-text rendering
// ---------------------------------------------------------------------------

impl fmt::Display for StatCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.profile;
        writeln!(f, "{}  #{}", p.name, p.number)?;
        writeln!(f, "School: {}   Grade: {}", p.school, p.grade)?;
        writeln!(f, "Positions: {}", format_positions(&p.positions))?;

        for panel in &self.panels {
            writeln!(f)?;
            writeln!(f, "{}", panel.title)?;
            let cells: Vec<(String, usize)> = panel
                .entries
                .iter()
                .map(|e| {
                    let value = e.marked();
                    let width = e.label.len().max(value.len()) + 2;
                    (value, width)
                })
                .collect();

            write!(f, " ")?;
            for (entry, (_, width)) in panel.entries.iter().zip(&cells) {
                write!(f, " {:<width$}", entry.label, width = *width)?;
            }
            writeln!(f)?;
            write!(f, " ")?;
            for (value, width) in &cells {
                write!(f, " {:<width$}", value, width = *width)?;
            }
            writeln!(f)?;
        }

        if self.has_derived() {
            writeln!(f)?;
            writeln!(f, "{DERIVED_MARK} derived from other columns")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
