use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use xd_dribble::XdConfig;
use xd_dribble::batch::{self, DribbleEvent, EventScore};
use xd_dribble::fake_frame;

const FAKE_TEAMMATES: usize = 10;
const FAKE_OPPONENTS: usize = 11;

#[derive(Debug, Default)]
struct Args {
    path: Option<PathBuf>,
    fake: Option<usize>,
    seed: Option<u64>,
    pretty: bool,
    summary: bool,
    verbose: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = parse_args(std::env::args().skip(1).collect())?;

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let cfg = XdConfig::from_env();
    let events = load_input(&args)?;
    info!(
        "scoring {} dribble events on {} threads",
        events.len(),
        cfg.batch_threads
    );

    for score in batch::score_events(&events, &cfg) {
        if args.summary {
            println!("{}", summary_line(&score));
        } else {
            let value = score_json(&score)?;
            let line = if args.pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            println!("{line}");
        }
    }

    Ok(())
}

fn load_input(args: &Args) -> Result<Vec<DribbleEvent>> {
    if let Some(n) = args.fake {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        return Ok((0..n)
            .map(|_| fake_frame::random_event(&mut rng, FAKE_TEAMMATES, FAKE_OPPONENTS))
            .collect());
    }
    let path = args
        .path
        .as_ref()
        .context("usage: xd_calc <events.json> | --fake N [--seed S] [--pretty] [--summary]")?;
    batch::load_events(path)
}

fn score_json(score: &EventScore) -> Result<serde_json::Value> {
    Ok(match &score.result {
        Ok(res) => {
            let mut value = serde_json::to_value(res).context("serialize xD result")?;
            if let (Some(id), Some(obj)) = (&score.id, value.as_object_mut()) {
                obj.insert("id".to_string(), json!(id));
            }
            value
        }
        Err(err) => json!({ "id": score.id, "error": err.to_string() }),
    })
}

fn summary_line(score: &EventScore) -> String {
    let id = score.id.as_deref().unwrap_or("-");
    match &score.result {
        Ok(res) => format!(
            "{id}  xD {:>6}  A {:.4}  D {:.4}  X {:.4}",
            res.xd_percentage, res.components.attack, res.components.defense, res.components.context
        ),
        Err(err) => format!("{id}  error: {err}"),
    }
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut args = Args::default();
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--pretty" => args.pretty = true,
            "--summary" => args.summary = true,
            "-v" | "--verbose" => args.verbose = true,
            "--fake" => {
                let n = iter.next().ok_or_else(|| anyhow!("--fake needs a count"))?;
                args.fake = Some(n.trim().parse().context("--fake expects a number")?);
            }
            "--seed" => {
                let s = iter.next().ok_or_else(|| anyhow!("--seed needs a value"))?;
                args.seed = Some(s.trim().parse().context("--seed expects a number")?);
            }
            other if other.starts_with("--fake=") || other.starts_with("--seed=") => {
                let (flag, value) = other.split_once('=').unwrap_or((other, ""));
                if flag == "--fake" {
                    args.fake = Some(value.trim().parse().context("--fake expects a number")?);
                } else {
                    args.seed = Some(value.trim().parse().context("--seed expects a number")?);
                }
            }
            other if other.starts_with('-') => return Err(anyhow!("unknown flag {other}")),
            other => args.path = Some(PathBuf::from(other)),
        }
    }
    Ok(args)
}
