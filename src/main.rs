//! Rift Pulse headless runner
//!
//! Drives one level at 60 Hz from a tap script and records best progress.
//!
//! Usage: `rift-pulse [level-id] [--seed N] [--taps t1,t2,...] [--best PATH] [--tuning PATH]`

use std::path::PathBuf;
use std::process::ExitCode;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use rift_pulse::consts::{FRAME_DT, MAX_ATTEMPTS};
use rift_pulse::levels;
use rift_pulse::sim::{Game, RunOutcome, SimEvent, TickInput, tick};
use rift_pulse::{BestProgress, Tuning};

const USAGE: &str =
    "usage: rift-pulse [level-id] [--seed N] [--taps t1,t2,...] [--best PATH] [--tuning PATH]";

/// Parsed command line
#[derive(Debug)]
struct Args {
    level_id: String,
    seed: u64,
    taps: Option<Vec<f32>>,
    best_path: PathBuf,
    tuning_path: Option<PathBuf>,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut args = Self {
            level_id: "l1".to_string(),
            seed: 0,
            taps: None,
            best_path: PathBuf::from("rift_pulse_best.json"),
            tuning_path: None,
        };
        while let Some(arg) = raw.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = raw.next().ok_or("--seed needs a value")?;
                    args.seed = value.parse().map_err(|_| format!("bad seed: {value}"))?;
                }
                "--taps" => {
                    let value = raw.next().ok_or("--taps needs a value")?;
                    let mut taps = value
                        .split(',')
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| s.trim().parse::<f32>().map_err(|_| format!("bad tap time: {s}")))
                        .collect::<Result<Vec<_>, _>>()?;
                    taps.sort_by(f32::total_cmp);
                    args.taps = Some(taps);
                }
                "--best" => {
                    args.best_path = raw.next().ok_or("--best needs a path")?.into();
                }
                "--tuning" => {
                    args.tuning_path = Some(raw.next().ok_or("--tuning needs a path")?.into());
                }
                flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
                id => args.level_id = id.to_string(),
            }
        }
        Ok(args)
    }
}

/// When to tap, in seconds since the current attempt began
enum TapScript {
    /// Same schedule replayed on every attempt
    Fixed { times: Vec<f32>, next: usize },
    /// Random gaps drawn from a seeded generator
    Random { rng: Pcg32, next_at: f32 },
}

impl TapScript {
    fn random(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_at = rng.random_range(0.3..1.2);
        Self::Random { rng, next_at }
    }

    /// Rewind for a new attempt
    fn restart(&mut self) {
        match self {
            Self::Fixed { next, .. } => *next = 0,
            Self::Random { rng, next_at } => *next_at = rng.random_range(0.3..1.2),
        }
    }

    /// Whether a tap is due at `elapsed` seconds
    fn poll(&mut self, elapsed: f32) -> bool {
        match self {
            Self::Fixed { times, next } => {
                let mut due = false;
                while *next < times.len() && times[*next] <= elapsed {
                    *next += 1;
                    due = true;
                }
                due
            }
            Self::Random { rng, next_at } => {
                if elapsed < *next_at {
                    return false;
                }
                *next_at = elapsed + rng.random_range(0.25..1.1);
                true
            }
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut level = levels::find(&args.level_id)
        .ok_or_else(|| format!("unknown level id: {}", args.level_id))?;
    if let Some(path) = &args.tuning_path {
        level = level.with_tuning(Tuning::load(path));
    }
    let mut best = BestProgress::load(&args.best_path);
    log::info!("Best so far on {}: {}%", level.id, best.percent(&level.id));

    let level_id = level.id.clone();
    let mut game = Game::with_level(level)?;
    game.start()?;

    let mut script = match args.taps {
        Some(times) => TapScript::Fixed { times, next: 0 },
        None => TapScript::random(args.seed),
    };

    let mut furthest: f32 = 0.0;
    let mut frames: u64 = 0;
    while game.outcome() != RunOutcome::Idle {
        let elapsed = (game.run().elapsed_ms / 1000.0) as f32;
        let tap = game.outcome() == RunOutcome::Running && script.poll(elapsed);
        let events = tick(&mut game, &TickInput { tap, pause: false }, FRAME_DT);
        frames += 1;
        furthest = furthest.max(game.progress());

        for event in events {
            log::debug!("frame {frames}: {event:?}");
            match event {
                SimEvent::Completed { progress } => {
                    if best.record(&level_id, progress) {
                        log::info!("New best on {level_id}: {}%", best.percent(&level_id));
                        best.save(&args.best_path)?;
                    }
                }
                SimEvent::Restarted { attempt } => {
                    script.restart();
                    if attempt > MAX_ATTEMPTS {
                        log::warn!("Giving up after {MAX_ATTEMPTS} attempts");
                        game.return_to_idle();
                    }
                }
                _ => {}
            }
        }
    }

    println!(
        "{level_id}: furthest {:.0}%, best {}%, {frames} frames",
        furthest * 100.0,
        best.percent(&level_id)
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Rift Pulse (headless) starting...");

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.level_id, "l1");
        assert_eq!(args.seed, 0);
        assert!(args.taps.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&[
            "l3", "--seed", "42", "--taps", "1.5, 0.5,2", "--best", "b.json",
        ])
        .unwrap();
        assert_eq!(args.level_id, "l3");
        assert_eq!(args.seed, 42);
        assert_eq!(args.taps, Some(vec![0.5, 1.5, 2.0]));
        assert_eq!(args.best_path, PathBuf::from("b.json"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--seed"]).is_err());
        assert!(parse(&["--seed", "x"]).is_err());
        assert!(parse(&["--taps", "1,a"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }

    #[test]
    fn test_fixed_script_replays_each_attempt() {
        let mut script = TapScript::Fixed {
            times: vec![0.5, 1.0],
            next: 0,
        };
        assert!(!script.poll(0.4));
        assert!(script.poll(0.5));
        assert!(!script.poll(0.6));
        assert!(script.poll(1.2));
        assert!(!script.poll(5.0));
        script.restart();
        assert!(script.poll(0.5));
    }

    #[test]
    fn test_random_script_is_seeded() {
        let taps = |seed| {
            let mut script = TapScript::random(seed);
            (0..600)
                .map(|i| script.poll(i as f32 / 60.0))
                .collect::<Vec<_>>()
        };
        assert_eq!(taps(7), taps(7));
        assert!(taps(7).iter().any(|&t| t));
    }
}
