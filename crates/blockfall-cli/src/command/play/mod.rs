use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use blockfall_engine::{GameConfig, GameSession, PieceSeed};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};

use crate::{record::ScoreLog, tui::Tui, util};

use self::app::PlayApp;

mod app;
mod input;

const DEFAULT_TICK_RATE: f64 = 20.0;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Game config file (JSON); flags below override its values
    #[clap(long)]
    config: Option<PathBuf>,
    /// Board width in cells
    #[clap(long)]
    cols: Option<u16>,
    /// Board height in cells
    #[clap(long)]
    rows: Option<u16>,
    /// Simulation ticks per second [default: 20]
    #[clap(long)]
    tick_rate: Option<f64>,
    /// Seed for the piece sequence, as 32 hex digits
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// File the final score of every game is appended to
    #[clap(long)]
    scores_file: Option<PathBuf>,
    /// Do not record scores
    #[clap(long)]
    no_save: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        config,
        cols,
        rows,
        tick_rate,
        seed,
        scores_file,
        no_save,
    } = arg;

    let config = load_config(config.as_deref(), *cols, *rows)?;
    let tick_interval = tick_interval(tick_rate.unwrap_or(DEFAULT_TICK_RATE))?;

    let session = match seed {
        Some(seed) => GameSession::with_seed(config, *seed),
        None => GameSession::new(config),
    }
    .context("Invalid game config")?;

    let score_log = (!no_save).then(|| {
        ScoreLog::new(
            scores_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(ScoreLog::DEFAULT_PATH)),
        )
    });

    let track_release = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
    if track_release {
        execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .context("Failed to enable key release events")?;
    }

    let mut app = PlayApp::new(session, tick_interval, track_release, score_log.clone());
    let result = Tui::new().run(&mut app);

    if track_release {
        execute!(io::stdout(), PopKeyboardEnhancementFlags)
            .context("Failed to restore keyboard mode")?;
    }
    result?;
    let summary = app.finish()?;

    println!(
        "Score: {} ({} lines, {} pieces)",
        summary.score, summary.cleared_lines, summary.completed_pieces
    );
    if let Some(score_log) = &score_log
        && summary.recorded_games > 0
    {
        println!(
            "Recorded {} game(s) to {}",
            summary.recorded_games,
            score_log.path().display()
        );
    }

    Ok(())
}

/// Converts ticks per second into the event loop's tick interval.
fn tick_interval(tick_rate: f64) -> anyhow::Result<Duration> {
    (tick_rate.is_finite() && tick_rate > 0.0)
        .then(|| Duration::try_from_secs_f64(1.0 / tick_rate).ok())
        .flatten()
        .filter(|interval| !interval.is_zero())
        .with_context(|| {
            format!("tick rate must be a positive number of ticks per second (got {tick_rate})")
        })
}

fn load_config(
    path: Option<&Path>,
    cols: Option<u16>,
    rows: Option<u16>,
) -> anyhow::Result<GameConfig> {
    let mut config = match path {
        Some(path) => util::read_json_file::<GameConfig, _>("game config", path)?,
        None => GameConfig::default(),
    };
    if let Some(cols) = cols {
        config.cols = cols;
    }
    if let Some(rows) = rows {
        config.rows = rows;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_load_config_defaults_without_file() {
        let config = load_config(None, None, None).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join(format!(
            "blockfall-config-{}-override.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "cols": 12, "rows": 20, "lock_delay_secs": 0.5 }"#).unwrap();

        let config = load_config(Some(&path), None, Some(24)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.cols, 12);
        assert_eq!(config.rows, 24);
        assert!((config.lock_delay_secs - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tick_interval() {
        assert_eq!(tick_interval(20.0).unwrap(), Duration::from_millis(50));
        assert_eq!(tick_interval(0.5).unwrap(), Duration::from_secs(2));

        for rate in [0.0, -20.0, f64::NAN, f64::INFINITY, 1e-300, 1e300] {
            let err = tick_interval(rate).unwrap_err();
            assert!(err.to_string().contains("tick rate"), "{rate}");
        }
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let path = std::env::temp_dir().join("blockfall-config-does-not-exist.json");
        let err = load_config(Some(&path), None, None).unwrap_err();
        assert!(err.to_string().contains("game config"));
    }
}
