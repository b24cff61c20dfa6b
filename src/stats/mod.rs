// Season stat types shared by ingestion, derivation, and presentation.

pub mod derive;
pub mod season;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// Which block of the season export a column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
    Batting,
    Pitching,
    Fielding,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Batting, Section::Pitching, Section::Fielding];

    pub fn label(self) -> &'static str {
        match self {
            Section::Batting => "Batting",
            Section::Pitching => "Pitching",
            Section::Fielding => "Fielding",
        }
    }

    /// Parse a section label cell ("Batting", " pitching ", ...).
    pub fn from_label(text: &str) -> Option<Section> {
        let t = text.trim();
        Section::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(t))
    }

    /// Columns ingested for this section, in ingestion (and export) order.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Section::Batting => &[
                "AVG", "OBP", "OPS", "SLG", "H", "AB", "HR", "XBH", "2B", "3B", "RBI", "R", "SB",
                "CS", "SB%", "BB",
            ],
            Section::Pitching => &[
                "ERA", "FIP", "GP", "IP", "WHIP", "H", "BB", "SO", "K-L", "BB/INN",
            ],
            Section::Fielding => &["FPCT", "TC", "PO", "A", "Assists", "E", "Errors"],
        }
    }
}

// ---------------------------------------------------------------------------
// StatLine
// ---------------------------------------------------------------------------

/// One ingested column. `value` is `None` when the cell was blank or not a
/// plain unsigned number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCell {
    pub key: String,
    pub value: Option<f64>,
}

impl StatCell {
    /// The value as shown in raw displays and exports: blanks count as zero.
    pub fn coerced(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

/// The columns of one section for one player, in ingestion order.
///
/// A key is *present* when its column existed in the file; a present key is
/// *usable* when its cell held a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatLine {
    cells: Vec<StatCell>,
}

impl StatLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column, replacing an earlier cell with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<f64>) {
        let key = key.into();
        match self.cells.iter_mut().find(|c| c.key == key) {
            Some(cell) => cell.value = value,
            None => self.cells.push(StatCell { key, value }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cells.iter().any(|c| c.key == key)
    }

    /// Usable value for `key`: `None` when the column is absent or blank.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.cells
            .iter()
            .find(|c| c.key == key)
            .and_then(|c| c.value)
    }

    /// Coerced value for a present column; `None` only when absent.
    pub fn raw(&self, key: &str) -> Option<f64> {
        self.cells
            .iter()
            .find(|c| c.key == key)
            .map(StatCell::coerced)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatCell> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PlayerRecord / Roster
// ---------------------------------------------------------------------------

/// Everything loaded for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    /// "First Last".
    pub name: String,
    pub number: String,
    pub school: String,
    pub grade: String,
    pub positions: Vec<String>,
    pub batting: StatLine,
    pub pitching: StatLine,
    pub fielding: StatLine,
}

impl PlayerRecord {
    pub fn line(&self, section: Section) -> &StatLine {
        match section {
            Section::Batting => &self.batting,
            Section::Pitching => &self.pitching,
            Section::Fielding => &self.fielding,
        }
    }

    pub fn line_mut(&mut self, section: Section) -> &mut StatLine {
        match section {
            Section::Batting => &mut self.batting,
            Section::Pitching => &mut self.pitching,
            Section::Fielding => &mut self.fielding,
        }
    }
}

/// All players from one season export, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Roster {
    players: Vec<PlayerRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. A player with the same name is replaced in place and
    /// `false` is returned.
    pub fn upsert(&mut self, player: PlayerRecord) -> bool {
        match self.players.iter_mut().find(|p| p.name == player.name) {
            Some(existing) => {
                *existing = player;
                false
            }
            None => {
                self.players.push(player);
                true
            }
        }
    }

    /// Look a player up by exact name, then case-insensitively.
    pub fn find(&self, name: &str) -> Option<&PlayerRecord> {
        let wanted = name.trim();
        self.players
            .iter()
            .find(|p| p.name == wanted)
            .or_else(|| {
                self.players
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(wanted))
            })
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn into_players(self) -> Vec<PlayerRecord> {
        self.players
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A player with the given name and stat lines, using default profile
    /// fields.
    pub fn player(
        name: &str,
        batting: &[(&str, Option<f64>)],
        pitching: &[(&str, Option<f64>)],
        fielding: &[(&str, Option<f64>)],
    ) -> PlayerRecord {
        let line = |cells: &[(&str, Option<f64>)]| {
            let mut l = StatLine::new();
            for (k, v) in cells {
                l.insert(*k, *v);
            }
            l
        };
        PlayerRecord {
            name: name.to_string(),
            number: "1".to_string(),
            school: "Cushing Academy".to_string(),
            grade: "-".to_string(),
            positions: Vec::new(),
            batting: line(batting),
            pitching: line(pitching),
            fielding: line(fielding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_from_label_is_case_insensitive() {
        assert_eq!(Section::from_label("Batting"), Some(Section::Batting));
        assert_eq!(Section::from_label("  PITCHING "), Some(Section::Pitching));
        assert_eq!(Section::from_label("fielding"), Some(Section::Fielding));
        assert_eq!(Section::from_label("Totals"), None);
        assert_eq!(Section::from_label(""), None);
    }

    #[test]
    fn stat_line_distinguishes_absent_and_blank() {
        let mut line = StatLine::new();
        line.insert("AVG", Some(0.300));
        line.insert("OPS", None);

        assert_eq!(line.get("AVG"), Some(0.300));
        assert_eq!(line.get("OPS"), None);
        assert_eq!(line.get("SLG"), None);

        assert!(line.contains("OPS"));
        assert!(!line.contains("SLG"));
        assert_eq!(line.raw("OPS"), Some(0.0));
        assert_eq!(line.raw("SLG"), None);
    }

    #[test]
    fn stat_line_insert_replaces_and_keeps_order() {
        let mut line = StatLine::new();
        line.insert("AVG", Some(0.1));
        line.insert("OBP", Some(0.2));
        line.insert("AVG", Some(0.3));

        let keys: Vec<&str> = line.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["AVG", "OBP"]);
        assert_eq!(line.get("AVG"), Some(0.3));
        assert_eq!(line.len(), 2);
    }

    #[test]
    fn roster_upsert_replaces_duplicate_in_place() {
        let mut roster = Roster::new();
        assert!(roster.upsert(fixtures::player("A One", &[("AVG", Some(0.1))], &[], &[])));
        assert!(roster.upsert(fixtures::player("B Two", &[], &[], &[])));
        assert!(!roster.upsert(fixtures::player("A One", &[("AVG", Some(0.4))], &[], &[])));

        let names: Vec<&str> = roster.names().collect();
        assert_eq!(names, vec!["A One", "B Two"]);
        assert_eq!(roster.players()[0].batting.get("AVG"), Some(0.4));
    }

    #[test]
    fn roster_find_falls_back_to_case_insensitive() {
        let mut roster = Roster::new();
        roster.upsert(fixtures::player("Alex Rivera", &[], &[], &[]));

        assert!(roster.find("Alex Rivera").is_some());
        assert!(roster.find(" alex rivera ").is_some());
        assert!(roster.find("Alex R").is_none());
    }
}
