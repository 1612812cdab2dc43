use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::{SessionRecord, Theme};
use crate::utils::{GameError, GameResult};

pub const HEADER: [&str; 6] = ["Total Jump", "Score", "Level", "Time Played", "Final Speed", "Theme"];

/// Append-only CSV of completed sessions.
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header row when it does not exist yet. An
    /// existing file is never truncated.
    pub async fn ensure_header(&self) -> GameResult<()> {
        if self.exists().await? {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| GameError::results_log(format!("Failed to create results directory: {}", e)))?;
        }

        let opened = fs::OpenOptions::new().write(true).create_new(true).open(&self.path).await;
        let mut file = match opened {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(GameError::results_log(format!("Failed to create results file: {}", e))),
        };
        file.write_all(format!("{}\n", HEADER.join(",")).as_bytes())
            .await
            .map_err(|e| GameError::results_log(format!("Failed to write results header: {}", e)))?;
        file.flush().await?;

        info!("Created results log at {:?}", self.path);
        Ok(())
    }

    async fn exists(&self) -> GameResult<bool> {
        fs::try_exists(&self.path)
            .await
            .map_err(|e| GameError::results_log(format!("Cannot inspect {:?}: {}", self.path, e)))
    }

    /// Appends one session row. The file is opened, written and closed within this call.
    pub async fn append(&self, record: &SessionRecord) -> GameResult<()> {
        self.ensure_header().await?;

        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| GameError::results_log(format!("Failed to open results file: {}", e)))?;

        let row = format_row(record);
        file.write_all(row.as_bytes())
            .await
            .map_err(|e| GameError::results_log(format!("Failed to write results row: {}", e)))?;
        file.flush().await?;

        debug!("Appended results row: {}", row.trim_end());
        Ok(())
    }

    /// Reads every parseable row. Malformed rows are skipped with a warning.
    pub async fn load_records(&self) -> GameResult<Vec<SessionRecord>> {
        if !self.exists().await? {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| GameError::results_log(format!("Failed to read results file: {}", e)))?;

        let mut records = Vec::new();
        for (line_no, line) in content.lines().enumerate().skip(1) {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping results row {}: {}", line_no + 1, e),
            }
        }

        Ok(records)
    }
}

pub fn format_row(record: &SessionRecord) -> String {
    format!(
        "{},{},{},{:.2},{},{}\n",
        record.total_jump,
        record.score,
        record.level,
        record.time_played,
        record.final_speed,
        record.theme.id()
    )
}

pub fn parse_row(line: &str) -> GameResult<SessionRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != HEADER.len() {
        return Err(GameError::results_log(format!(
            "expected {} fields, found {}",
            HEADER.len(),
            fields.len()
        )));
    }

    let number = |index: usize| -> GameResult<u32> {
        fields[index].parse::<u32>().map_err(|e| {
            GameError::results_log(format!("invalid {} '{}': {}", HEADER[index], fields[index], e))
        })
    };

    let time_played = fields[3]
        .parse::<f64>()
        .map_err(|e| GameError::results_log(format!("invalid Time Played '{}': {}", fields[3], e)))?;

    Ok(SessionRecord {
        total_jump: number(0)?,
        score: number(1)?,
        level: number(2)?,
        time_played,
        final_speed: number(4)?,
        theme: Theme::from_id(fields[5])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn record(score: u32, theme: Theme) -> SessionRecord {
        SessionRecord {
            total_jump: score + 2,
            score,
            level: 1 + score / 11,
            time_played: 12.5,
            final_speed: 5 + score / 11,
            theme,
        }
    }

    #[test]
    fn test_format_row() {
        let row = format_row(&record(3, Theme::EscapingT));
        assert_eq!(row, "5,3,1,12.50,5,Escaping T\n");
    }

    #[test]
    fn test_parse_row_rejects_bad_input() {
        assert!(parse_row("1,2,3").is_err());
        assert!(parse_row("a,2,3,4.0,5,Escaping F").is_err());
        assert!(parse_row("1,2,3,4.0,5,Escaping Z").is_err());
    }

    #[tokio::test]
    async fn test_ensure_header_creates_file_once() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("game_results.csv");
        let log = ResultsLog::new(&path);

        log.ensure_header().await.unwrap();
        log.ensure_header().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Total Jump,Score,Level,Time Played,Final Speed,Theme\n");
    }

    #[tokio::test]
    async fn test_uninspectable_path_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let log = ResultsLog::new(blocker.join("game_results.csv"));
        assert!(matches!(log.ensure_header().await, Err(GameError::ResultsLog { .. })));
        assert!(matches!(log.load_records().await, Err(GameError::ResultsLog { .. })));
        assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "not a directory");
    }

    #[tokio::test]
    async fn test_append_one_row_per_call() {
        let temp_dir = tempdir().unwrap();
        let log = ResultsLog::new(temp_dir.path().join("game_results.csv"));

        log.append(&record(3, Theme::EscapingF)).await.unwrap();
        log.append(&record(12, Theme::RescuingG)).await.unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 3);

        let records = log.load_records().await.unwrap();
        assert_eq!(records, vec![record(3, Theme::EscapingF), record(12, Theme::RescuingG)]);
    }

    #[tokio::test]
    async fn test_load_skips_malformed_rows() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("game_results.csv");
        std::fs::write(
            &path,
            "Total Jump,Score,Level,Time Played,Final Speed,Theme\r\n4,2,1,3.5,5,Escaping F\r\nbroken\r\n\r\n",
        )
        .unwrap();

        let records = ResultsLog::new(&path).load_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time_played, 3.5);
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let temp_dir = tempdir().unwrap();
        let log = ResultsLog::new(temp_dir.path().join("absent.csv"));
        assert!(log.load_records().await.unwrap().is_empty());
    }
}
