use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::XdConfig;
use crate::error::XdError;
use crate::freeze_frame::PlayerRecord;
use crate::xd_model::{MatchContext, XdResult, calculate_xd_with};

/// One dribble attempt as it appears in an input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DribbleEvent {
    #[serde(default)]
    pub id: Option<String>,
    pub velocity: f64,
    pub angle: f64,
    pub freeze_frame: Vec<PlayerRecord>,
    #[serde(default = "default_minutes")]
    pub minute: f64,
    #[serde(default = "default_minutes")]
    pub attacker_minutes_played: f64,
    #[serde(default = "default_minutes")]
    pub defender_minutes_played: f64,
    #[serde(default)]
    pub goal_difference: i32,
}

fn default_minutes() -> f64 {
    45.0
}

impl DribbleEvent {
    pub fn context(&self) -> MatchContext {
        MatchContext {
            minute: self.minute,
            attacker_minutes_played: self.attacker_minutes_played,
            defender_minutes_played: self.defender_minutes_played,
            goal_difference: self.goal_difference,
        }
    }

    pub fn score(&self, cfg: &XdConfig) -> Result<XdResult, XdError> {
        calculate_xd_with(self.velocity, self.angle, &self.freeze_frame, self.context(), cfg)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventScore {
    pub id: Option<String>,
    pub result: Result<XdResult, XdError>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventDocument {
    Many(Vec<DribbleEvent>),
    One(Box<DribbleEvent>),
}

/// Accepts a single event object or an array of events. `null` is empty.
pub fn parse_events_json(raw: &str) -> Result<Vec<DribbleEvent>> {
    let doc: Option<EventDocument> =
        serde_json::from_str(raw).context("invalid dribble event json")?;
    Ok(match doc {
        None => Vec::new(),
        Some(EventDocument::Many(events)) => events,
        Some(EventDocument::One(event)) => vec![*event],
    })
}

pub fn load_events(path: &Path) -> Result<Vec<DribbleEvent>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read events file {}", path.display()))?;
    parse_events_json(&raw).with_context(|| format!("parse events file {}", path.display()))
}

/// Score every event independently. Output order follows input order.
pub fn score_events(events: &[DribbleEvent], cfg: &XdConfig) -> Vec<EventScore> {
    with_batch_pool(cfg.batch_threads, || {
        events
            .par_iter()
            .map(|event| {
                let result = event.score(cfg);
                if let Err(err) = &result {
                    warn!(
                        "event {} failed: {err}",
                        event.id.as_deref().unwrap_or("<unnamed>")
                    );
                }
                EventScore {
                    id: event.id.clone(),
                    result,
                }
            })
            .collect()
    })
}

fn with_batch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}
