// Season CSV ingestion.
//
// Reads the scorekeeping app's season export: a section label row
// (Batting / Pitching / Fielding), a header row of column names, then one
// row per player. Column names repeat across sections (BB, H, GP), so each
// stat is looked up inside its own section's span.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::config::{Config, PlayerOverride};
use crate::stats::{PlayerRecord, Roster, Section, StatLine};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SeasonError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("header row {row} is missing or unreadable")]
    MissingHeader { row: usize },

    #[error("required column `{0}` not found in header")]
    MissingColumn(String),

    #[error("season file produced zero valid player rows")]
    Empty,
}

/// Reader-level failure before a path is attached.
#[derive(Debug)]
enum ReadFailure {
    Io(std::io::Error),
    Season(SeasonError),
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Everything ingestion needs besides the bytes themselves.
#[derive(Debug, Clone)]
pub struct SeasonOptions {
    /// Zero-based row holding column names.
    pub header_row: usize,
    pub school: String,
    pub default_grade: String,
    pub overrides: HashMap<String, PlayerOverride>,
}

impl Default for SeasonOptions {
    fn default() -> Self {
        SeasonOptions {
            header_row: 1,
            school: "Cushing Academy".to_string(),
            default_grade: "-".to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl SeasonOptions {
    pub fn from_config(config: &Config) -> Self {
        SeasonOptions {
            header_row: config.data.header_row,
            school: config.team.school.clone(),
            default_grade: config.team.default_grade.clone(),
            overrides: config.players.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Best-effort numeric coercion: accepts only unsigned decimals ("12",
/// "0.345", ".500"). Blanks, dashes, signs, and anything else yield `None`.
pub fn coerce_number(cell: &str) -> Option<f64> {
    let t = cell.trim();
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in t.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    t.parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Column plan
// ---------------------------------------------------------------------------

/// Resolved column indices for one file.
#[derive(Debug)]
struct ColumnPlan {
    first: usize,
    last: usize,
    number: usize,
    /// Per section, `(key, column index)` in `Section::keys()` order.
    stats: Vec<(Section, Vec<(&'static str, usize)>)>,
    /// A data row must be strictly longer than the largest stat index.
    min_len: usize,
}

/// Assign every header column to the section whose label most recently
/// preceded it.
fn section_spans(labels: Option<&StringRecord>, width: usize) -> Vec<Option<Section>> {
    let mut current = None;
    (0..width)
        .map(|i| {
            if let Some(section) = labels.and_then(|r| r.get(i)).and_then(Section::from_label) {
                current = Some(section);
            }
            current
        })
        .collect()
}

fn find_identity(header: &[String], name: &str) -> Result<usize, SeasonError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| SeasonError::MissingColumn(name.to_string()))
}

impl ColumnPlan {
    fn build(header: &[String], spans: &[Option<Section>]) -> Result<Self, SeasonError> {
        let first = find_identity(header, "First")?;
        let last = find_identity(header, "Last")?;
        let number = find_identity(header, "Number")?;

        // Without any section labels, fall back to the first column of that
        // name anywhere in the header.
        let scoped = spans.iter().any(Option::is_some);

        let mut stats = Vec::new();
        let mut min_len = 0;
        for section in Section::ALL {
            let mut cols = Vec::new();
            for key in section.keys() {
                let found = header
                    .iter()
                    .enumerate()
                    .find(|(i, h)| h.as_str() == *key && (!scoped || spans[*i] == Some(section)))
                    .map(|(i, _)| i);
                if let Some(idx) = found {
                    min_len = min_len.max(idx + 1);
                    cols.push((*key, idx));
                }
            }
            stats.push((section, cols));
        }

        Ok(ColumnPlan {
            first,
            last,
            number,
            stats,
            min_len,
        })
    }
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

/// Split raw bytes into physical rows: one per line outside a quoted field,
/// blank lines included. Trailing `\r` is dropped.
fn physical_rows(data: &[u8]) -> Vec<&[u8]> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, &b) in data.iter().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes => {
                rows.push(&data[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < data.len() {
        rows.push(&data[start..]);
    }
    rows.into_iter()
        .map(|row| row.strip_suffix(b"\r").unwrap_or(row))
        .collect()
}

/// Parse one physical row. A blank line is an empty record.
fn parse_row(builder: &csv::ReaderBuilder, row: &[u8]) -> Result<StringRecord, csv::Error> {
    let mut record = StringRecord::new();
    if !row.is_empty() {
        builder.from_reader(row).read_record(&mut record)?;
    }
    Ok(record)
}

fn load_roster_from_reader<R: Read>(mut rdr: R, opts: &SeasonOptions) -> Result<Roster, ReadFailure> {
    let mut data = Vec::new();
    rdr.read_to_end(&mut data).map_err(ReadFailure::Io)?;

    // The csv reader drops blank lines, so rows are parsed one physical line
    // at a time to keep `header_row` and reported row numbers on file lines.
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true);

    let mut rows: Vec<Option<StringRecord>> = Vec::new();
    for (idx, row) in physical_rows(&data).into_iter().enumerate() {
        match parse_row(&builder, row) {
            Ok(record) => rows.push(Some(record)),
            Err(e) => {
                warn!("skipping unreadable row {}: {}", idx + 1, e);
                rows.push(None);
            }
        }
    }

    let header: Vec<String> = rows
        .get(opts.header_row)
        .and_then(Option::as_ref)
        .map(|r| r.iter().map(|h| h.trim().to_string()).collect())
        .ok_or(ReadFailure::Season(SeasonError::MissingHeader {
            row: opts.header_row,
        }))?;

    let labels = opts
        .header_row
        .checked_sub(1)
        .and_then(|i| rows.get(i))
        .and_then(Option::as_ref);
    let spans = section_spans(labels, header.len());
    let plan = ColumnPlan::build(&header, &spans).map_err(ReadFailure::Season)?;

    let mut roster = Roster::new();
    for (idx, row) in rows.iter().enumerate().skip(opts.header_row + 1) {
        let row_no = idx + 1;
        let Some(row) = row else { continue };
        if row.is_empty() {
            continue;
        }

        if row.len() < plan.min_len {
            warn!(
                "skipping row {}: {} fields, expected at least {}",
                row_no,
                row.len(),
                plan.min_len
            );
            continue;
        }

        let first = row.get(plan.first).unwrap_or("").trim();
        let last = row.get(plan.last).unwrap_or("").trim();
        if first.is_empty() || last.is_empty() {
            warn!("skipping row {}: missing first or last name", row_no);
            continue;
        }

        let name = format!("{first} {last}");
        let overrides = opts.overrides.get(&name);
        let mut player = PlayerRecord {
            number: row.get(plan.number).unwrap_or("").trim().to_string(),
            school: opts.school.clone(),
            grade: overrides
                .and_then(|o| o.grade.clone())
                .unwrap_or_else(|| opts.default_grade.clone()),
            positions: overrides.map(|o| o.positions.clone()).unwrap_or_default(),
            batting: StatLine::new(),
            pitching: StatLine::new(),
            fielding: StatLine::new(),
            name,
        };

        for (section, cols) in &plan.stats {
            let line = player.line_mut(*section);
            for (key, i) in cols {
                line.insert(*key, row.get(*i).and_then(coerce_number));
            }
        }

        let name = player.name.clone();
        if !roster.upsert(player) {
            warn!("duplicate player '{}', using latest row {}", name, row_no);
        }
    }

    Ok(roster)
}

// ---------------------------------------------------------------------------
// Public loaders
// ---------------------------------------------------------------------------

/// Load a roster from any reader. Exposed for callers that already hold the
/// bytes; `path` is only used for error messages.
pub fn load_roster<R: Read>(rdr: R, path: &str, opts: &SeasonOptions) -> Result<Roster, SeasonError> {
    let roster = load_roster_from_reader(rdr, opts).map_err(|f| match f {
        ReadFailure::Io(source) => SeasonError::Io {
            path: path.to_string(),
            source,
        },
        ReadFailure::Season(e) => e,
    })?;
    if roster.is_empty() {
        return Err(SeasonError::Empty);
    }
    Ok(roster)
}

/// Load a roster from a season CSV file.
pub fn load_roster_file(path: &Path, opts: &SeasonOptions) -> Result<Roster, SeasonError> {
    let file = std::fs::File::open(path).map_err(|e| SeasonError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let roster = load_roster(file, &path.display().to_string(), opts)?;
    info!("Loaded {} players from {}", roster.len(), path.display());
    Ok(roster)
}

/// Load the season file named in the config.
pub fn load_season(config: &Config) -> Result<Roster, SeasonError> {
    load_roster_file(&config.season_csv_path(), &SeasonOptions::from_config(config))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &str = ",,,Batting,,,,Pitching,,,,,Fielding,,";
    const HEADER: &str = "Number,Last,First,AVG,OBP,BB,H,ERA,WHIP,BB,H,IP,TC,PO,A";

    fn load(csv_data: &str) -> Roster {
        load_roster(csv_data.as_bytes(), "test.csv", &SeasonOptions::default()).unwrap()
    }

    // -- Numeric coercion --

    #[test]
    fn coerce_accepts_unsigned_decimals() {
        assert_eq!(coerce_number("12"), Some(12.0));
        assert_eq!(coerce_number("0.345"), Some(0.345));
        assert_eq!(coerce_number(".500"), Some(0.5));
        assert_eq!(coerce_number(" 7 "), Some(7.0));
    }

    #[test]
    fn coerce_rejects_everything_else() {
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("-"), None);
        assert_eq!(coerce_number("-1.5"), None);
        assert_eq!(coerce_number("1.2.3"), None);
        assert_eq!(coerce_number("."), None);
        assert_eq!(coerce_number("N/A"), None);
        assert_eq!(coerce_number("1e3"), None);
    }

    // -- Section scoping --

    #[test]
    fn duplicate_column_names_resolve_within_section() {
        let csv_data = format!(
            "{LABELS}\n{HEADER}\n12,Rivera,Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n"
        );
        let roster = load(&csv_data);
        let p = &roster.players()[0];

        assert_eq!(p.batting.get("BB"), Some(7.0));
        assert_eq!(p.batting.get("H"), Some(14.0));
        assert_eq!(p.pitching.get("BB"), Some(3.0));
        assert_eq!(p.pitching.get("H"), Some(8.0));
        assert_eq!(p.pitching.get("IP"), Some(8.1));
        assert_eq!(p.fielding.get("TC"), Some(41.0));
        assert_eq!(p.fielding.get("A"), Some(9.0));
    }

    #[test]
    fn unlabelled_file_uses_first_occurrence() {
        let csv_data = format!(",,\n{HEADER}\n12,Rivera,Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n");
        let roster = load(&csv_data);
        let p = &roster.players()[0];

        // Without labels the first BB / H column wins for both sections.
        assert_eq!(p.batting.get("BB"), Some(7.0));
        assert_eq!(p.pitching.get("BB"), Some(7.0));
        assert_eq!(p.pitching.get("ERA"), Some(2.52));
    }

    #[test]
    fn absent_columns_are_not_present() {
        let csv_data = format!("{LABELS}\n{HEADER}\n12,Rivera,Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n");
        let roster = load(&csv_data);
        let p = &roster.players()[0];

        assert!(!p.batting.contains("OPS"));
        assert!(!p.fielding.contains("FPCT"));
        assert!(!p.pitching.contains("FIP"));
    }

    #[test]
    fn ingestion_order_follows_section_keys() {
        let csv_data = format!("{LABELS}\n{HEADER}\n12,Rivera,Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n");
        let roster = load(&csv_data);
        let keys: Vec<&str> = roster.players()[0]
            .pitching
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(keys, vec!["ERA", "IP", "WHIP", "H", "BB"]);
    }

    // -- Row handling --

    #[test]
    fn blank_cells_are_present_but_unusable() {
        let csv_data = format!("{LABELS}\n{HEADER}\n7,Chen,Sam,-,,1,0,-,,10,24,31.2,15,4,10\n");
        let roster = load(&csv_data);
        let p = &roster.players()[0];

        assert!(p.batting.contains("AVG"));
        assert_eq!(p.batting.get("AVG"), None);
        assert_eq!(p.batting.raw("AVG"), Some(0.0));
        assert_eq!(p.pitching.get("WHIP"), None);
        assert_eq!(p.pitching.get("IP"), Some(31.2));
    }

    #[test]
    fn short_rows_skipped() {
        let csv_data = format!(
            "{LABELS}\n{HEADER}\n9,Short,Row,1,2\n12,Rivera,Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n"
        );
        let roster = load(&csv_data);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.players()[0].name, "Alex Rivera");
    }

    #[test]
    fn rows_without_names_skipped() {
        let csv_data = format!(
            "{LABELS}\n{HEADER}\n1,,Solo,0.1,0.2,1,1,1,1,1,1,1,1,1,1\n2, ,  ,0.1,0.2,1,1,1,1,1,1,1,1,1,1\n3,Last,First,0.1,0.2,1,1,1,1,1,1,1,1,1,1\n"
        );
        let roster = load(&csv_data);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.players()[0].name, "First Last");
    }

    #[test]
    fn names_and_number_trimmed() {
        let csv_data = format!("{LABELS}\n{HEADER}\n 12 , Rivera ,  Alex ,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n");
        let roster = load(&csv_data);
        let p = &roster.players()[0];
        assert_eq!(p.name, "Alex Rivera");
        assert_eq!(p.number, "12");
    }

    #[test]
    fn duplicate_player_replaced_in_place() {
        let csv_data = format!(
            "{LABELS}\n{HEADER}\n\
12,Rivera,Alex,0.100,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n\
15,Novak,Eli,0.276,0.364,4,8,3.50,1.25,4,11,12.0,20,14,5\n\
12,Rivera,Alex,0.400,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n"
        );
        let roster = load(&csv_data);
        let names: Vec<&str> = roster.names().collect();
        assert_eq!(names, vec!["Alex Rivera", "Eli Novak"]);
        assert_eq!(roster.players()[0].batting.get("AVG"), Some(0.4));
    }

    #[test]
    fn profile_fields_come_from_options() {
        let mut opts = SeasonOptions {
            school: "Test Prep".to_string(),
            ..SeasonOptions::default()
        };
        opts.overrides.insert(
            "Alex Rivera".to_string(),
            PlayerOverride {
                grade: Some("11".to_string()),
                positions: vec!["Catcher".to_string()],
                photo: None,
            },
        );
        let csv_data = format!(
            "{LABELS}\n{HEADER}\n\
12,Rivera,Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n\
15,Novak,Eli,0.276,0.364,4,8,3.50,1.25,4,11,12.0,20,14,5\n"
        );
        let roster = load_roster(csv_data.as_bytes(), "test.csv", &opts).unwrap();

        let rivera = roster.find("Alex Rivera").unwrap();
        assert_eq!(rivera.school, "Test Prep");
        assert_eq!(rivera.grade, "11");
        assert_eq!(rivera.positions, vec!["Catcher"]);

        let novak = roster.find("Eli Novak").unwrap();
        assert_eq!(novak.grade, "-");
        assert!(novak.positions.is_empty());
    }

    #[test]
    fn custom_header_row() {
        let csv_data = format!(
            "Season Export\n{LABELS}\n{HEADER}\n12,Rivera,Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n"
        );
        let opts = SeasonOptions {
            header_row: 2,
            ..SeasonOptions::default()
        };
        let roster = load_roster(csv_data.as_bytes(), "test.csv", &opts).unwrap();
        assert_eq!(roster.players()[0].pitching.get("BB"), Some(3.0));
    }

    #[test]
    fn header_row_zero_has_no_labels() {
        let csv_data = format!("{HEADER}\n12,Rivera,Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n");
        let opts = SeasonOptions {
            header_row: 0,
            ..SeasonOptions::default()
        };
        let roster = load_roster(csv_data.as_bytes(), "test.csv", &opts).unwrap();
        assert_eq!(roster.players()[0].batting.get("AVG"), Some(0.318));
    }

    // -- Physical rows --

    #[test]
    fn physical_rows_keep_blank_lines() {
        let rows = physical_rows(b"labels\n\nheader\r\n\"Rivera\nJr\",Alex\nlast");
        assert_eq!(
            rows,
            vec![
                &b"labels"[..],
                &b""[..],
                &b"header"[..],
                &b"\"Rivera\nJr\",Alex"[..],
                &b"last"[..],
            ]
        );
    }

    #[test]
    fn physical_rows_ignore_final_newline() {
        assert_eq!(physical_rows(b"a\nb\n").len(), 2);
        assert!(physical_rows(b"").is_empty());
    }

    #[test]
    fn leading_blank_line_takes_label_row_slot() {
        let csv_data = "\nNumber,Last,First,AVG\n12,Rivera,Alex,0.318\n";
        let roster = load(csv_data);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.players()[0].name, "Alex Rivera");
        assert_eq!(roster.players()[0].batting.get("AVG"), Some(0.318));
    }

    #[test]
    fn blank_lines_between_data_rows_are_skipped() {
        let csv_data = format!(
            "{LABELS}\n{HEADER}\n\n\
12,Rivera,Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n\r\n\n\
15,Novak,Eli,0.276,0.364,4,8,3.50,1.25,4,11,12.0,20,14,5\n\n"
        );
        let roster = load(&csv_data);
        let names: Vec<&str> = roster.names().collect();
        assert_eq!(names, vec!["Alex Rivera", "Eli Novak"]);
    }

    #[test]
    fn row_numbers_follow_file_lines() {
        // Warnings report `index + 1`; a short row after three blank lines is
        // line 6 of the file.
        let csv_data = format!("{LABELS}\n{HEADER}\n\n\n\n9,Short,Row,1\n");
        let rows = physical_rows(csv_data.as_bytes());
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[5], &b"9,Short,Row,1"[..]);
    }

    #[test]
    fn quoted_newline_stays_in_one_row() {
        let csv_data = format!(
            "{LABELS}\n{HEADER}\n12,\"Rivera\nJr\",Alex,0.318,0.404,7,14,2.52,1.32,3,8,8.1,41,30,9\n"
        );
        let roster = load(&csv_data);
        assert_eq!(roster.players()[0].name, "Alex Rivera\nJr");
    }

    // -- Errors --

    #[test]
    fn missing_identity_column_is_error() {
        let csv_data = format!("{LABELS}\nNumber,Surname,First,AVG\n1,A,B,0.1\n");
        let err = load_roster(csv_data.as_bytes(), "test.csv", &SeasonOptions::default()).unwrap_err();
        match err {
            SeasonError::MissingColumn(col) => assert_eq!(col, "Last"),
            other => panic!("expected MissingColumn, got: {other}"),
        }
    }

    #[test]
    fn missing_header_row_is_error() {
        let err = load_roster("only one row\n".as_bytes(), "test.csv", &SeasonOptions::default())
            .unwrap_err();
        assert!(matches!(err, SeasonError::MissingHeader { row: 1 }));
    }

    #[test]
    fn no_players_is_error() {
        let csv_data = format!("{LABELS}\n{HEADER}\n");
        let err = load_roster(csv_data.as_bytes(), "test.csv", &SeasonOptions::default()).unwrap_err();
        assert!(matches!(err, SeasonError::Empty));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_roster_file(Path::new("/nonexistent/season.csv"), &SeasonOptions::default())
            .unwrap_err();
        assert!(matches!(err, SeasonError::Io { .. }));
    }
}
