use std::path::PathBuf;

use crate::record::{ScoreLog, ScoreRecord};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// Score log written by `play`
    #[clap(long, default_value = ScoreLog::DEFAULT_PATH)]
    scores_file: PathBuf,
    /// Number of scores to show
    #[clap(long, default_value_t = 10)]
    limit: usize,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let ScoresArg { scores_file, limit } = arg;

    let score_log = ScoreLog::new(scores_file.clone());
    let best = score_log.best(*limit)?;
    if best.is_empty() {
        println!("No scores recorded in {}", score_log.path().display());
        return Ok(());
    }

    println!(
        "{:>4}  {:>6}  {:>6}  {:>6}  {:>8}  {:<16}  SEED",
        "RANK", "SCORE", "LINES", "PIECES", "TIME", "DATE"
    );
    for (rank, record) in best.iter().enumerate() {
        println!("{}", format_row(rank + 1, record));
    }
    Ok(())
}

fn format_row(rank: usize, record: &ScoreRecord) -> String {
    format!(
        "{rank:>4}  {:>6}  {:>6}  {:>6}  {:>7.1}s  {:<16}  {}",
        record.score,
        record.cleared_lines,
        record.completed_pieces,
        record.duration_secs,
        record.recorded_at.format("%Y-%m-%d %H:%M"),
        record.seed,
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    #[test]
    fn test_format_row() {
        let record = ScoreRecord {
            recorded_at: Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap(),
            score: 12,
            cleared_lines: 12,
            completed_pieces: 40,
            duration_secs: 95.5,
            seed: "000102030405060708090a0b0c0d0e0f".parse().unwrap(),
        };
        assert_eq!(
            format_row(1, &record),
            "   1      12      12      40     95.5s  2025-03-04 05:06  000102030405060708090a0b0c0d0e0f"
        );
    }
}
