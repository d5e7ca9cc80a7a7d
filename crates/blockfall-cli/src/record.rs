use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufRead as _, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use blockfall_engine::{GameSession, PieceSeed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final result of one game, stored as a single JSON line in the score log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// When the game ended (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    pub score: usize,
    pub cleared_lines: usize,
    pub completed_pieces: usize,
    /// Play time in seconds, from the first tick to the top-out
    pub duration_secs: f64,
    /// Seed of the session the game was played in
    pub seed: PieceSeed,
}

impl ScoreRecord {
    pub fn from_session(session: &GameSession) -> Self {
        let stats = session.stats();
        Self {
            recorded_at: Utc::now(),
            score: stats.score(),
            cleared_lines: stats.total_cleared_lines(),
            completed_pieces: stats.completed_pieces(),
            duration_secs: stats.duration().as_secs_f64(),
            seed: session.seed(),
        }
    }
}

/// Append-only JSON Lines file of [`ScoreRecord`]s.
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    pub const DEFAULT_PATH: &'static str = "./data/scores.jsonl";

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record`, creating the file and its directory if needed.
    pub fn append(&self, record: &ScoreRecord) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open score log: {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, record)
            .with_context(|| format!("Failed to write JSON to {}", self.path.display()))?;
        writeln!(writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to flush output to {}", self.path.display()))?;

        Ok(())
    }

    /// Reads every record. A missing file is an empty log.
    pub fn read_all(&self) -> anyhow::Result<Vec<ScoreRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to open score log: {}", self.path.display())
                });
            }
        };

        let mut records = vec![];
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("Failed to read score log: {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).with_context(|| {
                format!(
                    "Failed to parse line {} of score log: {}",
                    index + 1,
                    self.path.display()
                )
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Returns up to `limit` records, highest score first. Ties go to the
    /// earlier game.
    pub fn best(&self, limit: usize) -> anyhow::Result<Vec<ScoreRecord>> {
        let mut records = self.read_all()?;
        records.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.recorded_at.cmp(&b.recorded_at))
        });
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use chrono::TimeZone as _;

    use super::*;

    struct TempLog(ScoreLog);

    impl TempLog {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("blockfall-{}-{name}", std::process::id()));
            let _ = fs::remove_dir_all(&dir);
            Self(ScoreLog::new(dir.join("scores.jsonl")))
        }
    }

    impl Drop for TempLog {
        fn drop(&mut self) {
            if let Some(dir) = self.0.path().parent() {
                let _ = fs::remove_dir_all(dir);
            }
        }
    }

    fn record(score: usize, minute: u32) -> ScoreRecord {
        ScoreRecord {
            recorded_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, minute, 0).unwrap(),
            score,
            cleared_lines: score,
            completed_pieces: 10 + score,
            duration_secs: 42.5,
            seed: "000102030405060708090a0b0c0d0e0f".parse().unwrap(),
        }
    }

    #[test]
    fn test_missing_log_is_empty() {
        let log = TempLog::new("missing");
        assert!(log.0.read_all().unwrap().is_empty());
        assert!(log.0.best(5).unwrap().is_empty());
    }

    #[test]
    fn test_append_creates_directory_and_keeps_order() {
        let log = TempLog::new("append");
        log.0.append(&record(3, 0)).unwrap();
        log.0.append(&record(1, 1)).unwrap();

        let records = log.0.read_all().unwrap();
        assert_eq!(records, vec![record(3, 0), record(1, 1)]);

        let contents = fs::read_to_string(log.0.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains(r#""seed":"000102030405060708090a0b0c0d0e0f""#));
    }

    #[test]
    fn test_best_sorts_by_score_then_date() {
        let log = TempLog::new("best");
        for rec in [record(2, 0), record(5, 1), record(2, 2), record(7, 3)] {
            log.0.append(&rec).unwrap();
        }

        let best = log.0.best(3).unwrap();
        assert_eq!(best, vec![record(7, 3), record(5, 1), record(2, 0)]);
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let log = TempLog::new("corrupt");
        log.0.append(&record(1, 0)).unwrap();
        let mut file = OpenOptions::new().append(true).open(log.0.path()).unwrap();
        writeln!(file, "not json").unwrap();

        let err = log.0.read_all().unwrap_err();
        assert!(format!("{err}").contains("line 2"));
    }
}
