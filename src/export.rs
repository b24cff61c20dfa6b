// Per-player CSV export.
//
// Writes the selected player's raw ingested columns as a one-row CSV:
// Name, then batting, pitching, and fielding columns in ingestion order.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::stats::{PlayerRecord, Section};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Player name made safe for a file name: spaces and path separators become
/// underscores.
pub fn file_stem(player_name: &str) -> String {
    player_name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

/// File name for a player's export, e.g. `Alex_Rivera_stats.csv`.
pub fn export_file_name(player_name: &str) -> String {
    format!("{}_stats.csv", file_stem(player_name))
}

/// Header/value pairs for the export row. A column name that already
/// appeared is qualified with its section ("Pitching:BB").
pub fn export_columns(player: &PlayerRecord) -> Vec<(String, f64)> {
    let mut seen: HashSet<String> = HashSet::from(["Name".to_string()]);
    let mut columns = Vec::new();
    for section in Section::ALL {
        for cell in player.line(section).iter() {
            let header = if seen.contains(&cell.key) {
                format!("{}:{}", section.label(), cell.key)
            } else {
                cell.key.clone()
            };
            seen.insert(header.clone());
            columns.push((header, cell.coerced()));
        }
    }
    columns
}

fn write_player<W: Write>(wtr: W, player: &PlayerRecord) -> Result<(), csv::Error> {
    let columns = export_columns(player);
    let mut writer = csv::Writer::from_writer(wtr);

    let mut header = vec!["Name".to_string()];
    header.extend(columns.iter().map(|(h, _)| h.clone()));
    writer.write_record(&header)?;

    let mut row = vec![player.name.clone()];
    row.extend(columns.iter().map(|(_, v)| v.to_string()));
    writer.write_record(&row)?;

    writer.flush()?;
    Ok(())
}

/// Export one player into `dir`, creating it if needed. Returns the path
/// written.
pub fn export_player(player: &PlayerRecord, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::CreateDir {
        path: dir.display().to_string(),
        source: e,
    })?;

    let path = dir.join(export_file_name(&player.name));
    let file = std::fs::File::create(&path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    write_player(file, player).map_err(|e| ExportError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    info!("Exported {} to {}", player.name, path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
