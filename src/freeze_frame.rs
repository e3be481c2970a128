use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::XdConfig;
use crate::error::XdError;

// Band upper bounds; each band is half-open [previous, bound).
const TEAMMATE_CLOSE: f64 = 3.0;
const TEAMMATE_MEDIUM: f64 = 5.0;
const TEAMMATE_FAR: f64 = 10.0;
const DEFENDER_VERY_CLOSE: f64 = 2.0;
const DEFENDER_CLOSE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Location) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One player in a freeze frame.
///
/// Deserializes from either `{"x":..,"y":..}` or a paired `{"location":[x,y]}`;
/// when both are present the pair wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlayerRecord")]
pub struct PlayerRecord {
    pub x: f64,
    pub y: f64,
    pub teammate: bool,
    pub actor: bool,
}

impl PlayerRecord {
    pub fn new(x: f64, y: f64, teammate: bool, actor: bool) -> Self {
        Self {
            x,
            y,
            teammate,
            actor,
        }
    }

    pub fn actor(x: f64, y: f64) -> Self {
        Self::new(x, y, true, true)
    }

    pub fn teammate(x: f64, y: f64) -> Self {
        Self::new(x, y, true, false)
    }

    pub fn opponent(x: f64, y: f64) -> Self {
        Self::new(x, y, false, false)
    }

    pub fn location(&self) -> Location {
        Location::new(self.x, self.y)
    }
}

#[derive(Debug, Deserialize)]
struct RawPlayerRecord {
    actor: bool,
    teammate: bool,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    location: Option<Vec<f64>>,
}

impl TryFrom<RawPlayerRecord> for PlayerRecord {
    type Error = String;

    fn try_from(raw: RawPlayerRecord) -> Result<Self, Self::Error> {
        let (x, y) = match (raw.location.as_deref(), raw.x, raw.y) {
            (Some([x, y, ..]), _, _) => (*x, *y),
            (Some(other), _, _) => {
                return Err(format!(
                    "location must hold at least 2 coordinates, got {}",
                    other.len()
                ));
            }
            (None, Some(x), Some(y)) => (x, y),
            (None, _, _) => {
                return Err("player record needs `location` or both `x` and `y`".into());
            }
        };
        Ok(PlayerRecord::new(x, y, raw.teammate, raw.actor))
    }
}

/// Distance bands around the dribbler. Counts are mutually exclusive per side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceStats {
    pub teammates_close: usize,
    pub teammates_medium: usize,
    pub teammates_far: usize,
    pub closest_defender_distance: f64,
    pub defenders_very_close: usize,
    pub defenders_close: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSummary {
    pub dribbler_location: Location,
    pub stats: DistanceStats,
}

/// Reduce a freeze frame to distance statistics relative to the actor.
///
/// The first record flagged `actor` is the reference point; any further actor
/// records are ignored entirely. The input slice is never modified.
pub fn process_freeze_frame(
    frame: &[PlayerRecord],
    cfg: &XdConfig,
) -> Result<DistanceSummary, XdError> {
    let mut actors = frame.iter().filter(|p| p.actor);
    let Some(actor) = actors.next() else {
        return Err(XdError::MissingActor);
    };
    let extra_actors = actors.count();
    if extra_actors > 0 {
        warn!("freeze frame flags {} actors; using the first", extra_actors + 1);
    }

    let origin = actor.location();
    let mut stats = DistanceStats {
        teammates_close: 0,
        teammates_medium: 0,
        teammates_far: 0,
        closest_defender_distance: cfg.no_defender_distance,
        defenders_very_close: 0,
        defenders_close: 0,
    };
    let mut closest: Option<f64> = None;

    for player in frame {
        if player.actor {
            continue;
        }
        let dist = origin.distance_to(&player.location());
        if player.teammate {
            if dist < TEAMMATE_CLOSE {
                stats.teammates_close += 1;
            } else if dist < TEAMMATE_MEDIUM {
                stats.teammates_medium += 1;
            } else if dist < TEAMMATE_FAR {
                stats.teammates_far += 1;
            }
        } else {
            if dist < DEFENDER_VERY_CLOSE {
                stats.defenders_very_close += 1;
            } else if dist < DEFENDER_CLOSE {
                stats.defenders_close += 1;
            }
            // NaN distances are skipped unless every opponent is NaN.
            closest = Some(closest.map_or(dist, |c| c.min(dist)));
        }
    }

    if let Some(c) = closest {
        stats.closest_defender_distance = c;
    }

    debug!(
        "freeze frame: {} players, dribbler at ({:.1}, {:.1}), stats {:?}",
        frame.len(),
        origin.x,
        origin.y,
        stats
    );

    Ok(DistanceSummary {
        dribbler_location: origin,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarize(frame: &[PlayerRecord]) -> DistanceSummary {
        process_freeze_frame(frame, &XdConfig::default()).unwrap()
    }

    #[test]
    fn missing_actor_is_an_error() {
        let frame = vec![
            PlayerRecord::teammate(10.0, 10.0),
            PlayerRecord::opponent(12.0, 10.0),
        ];
        let err = process_freeze_frame(&frame, &XdConfig::default()).unwrap_err();
        assert_eq!(err, XdError::MissingActor);
    }

    #[test]
    fn empty_frame_is_missing_actor() {
        let err = process_freeze_frame(&[], &XdConfig::default()).unwrap_err();
        assert_eq!(err, XdError::MissingActor);
    }

    #[test]
    fn teammate_bands_are_half_open() {
        let frame = vec![
            PlayerRecord::actor(50.0, 40.0),
            PlayerRecord::teammate(52.9, 40.0),
            PlayerRecord::teammate(53.0, 40.0),
            PlayerRecord::teammate(50.0, 44.9),
            PlayerRecord::teammate(55.0, 40.0),
            PlayerRecord::teammate(59.9, 40.0),
            PlayerRecord::teammate(60.0, 40.0),
        ];
        let s = summarize(&frame).stats;
        assert_eq!(s.teammates_close, 1);
        assert_eq!(s.teammates_medium, 2);
        assert_eq!(s.teammates_far, 2);
    }

    #[test]
    fn defender_bands_and_closest() {
        let frame = vec![
            PlayerRecord::opponent(51.0, 40.0),
            PlayerRecord::actor(50.0, 40.0),
            PlayerRecord::opponent(50.0, 42.0),
            PlayerRecord::opponent(54.0, 43.0),
            PlayerRecord::opponent(80.0, 40.0),
        ];
        let s = summarize(&frame).stats;
        assert_eq!(s.defenders_very_close, 1);
        assert_eq!(s.defenders_close, 1);
        assert!((s.closest_defender_distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn far_only_opponent_still_sets_closest_distance() {
        let frame = vec![PlayerRecord::actor(0.0, 0.0), PlayerRecord::opponent(30.0, 40.0)];
        let s = summarize(&frame).stats;
        assert_eq!(s.defenders_very_close + s.defenders_close, 0);
        assert!((s.closest_defender_distance - 50.0).abs() < 1e-12);
    }

    #[test]
    fn no_opponents_uses_configured_sentinel() {
        let frame = vec![PlayerRecord::actor(30.0, 40.0), PlayerRecord::teammate(31.0, 40.0)];
        assert_eq!(summarize(&frame).stats.closest_defender_distance, 10.0);

        let cfg = XdConfig {
            no_defender_distance: 15.0,
            ..XdConfig::default()
        };
        let s = process_freeze_frame(&frame, &cfg).unwrap();
        assert_eq!(s.stats.closest_defender_distance, 15.0);
    }

    #[test]
    fn first_actor_wins_and_others_are_skipped() {
        let frame = vec![
            PlayerRecord::actor(10.0, 10.0),
            PlayerRecord::actor(11.0, 10.0),
            PlayerRecord::opponent(12.0, 10.0),
        ];
        let s = summarize(&frame);
        assert_eq!(s.dribbler_location, Location::new(10.0, 10.0));
        assert_eq!(s.stats.teammates_close, 0);
        assert_eq!(s.stats.defenders_close, 1);
    }

    #[test]
    fn nan_opponent_does_not_depend_on_frame_order() {
        let actor = PlayerRecord::actor(0.0, 0.0);
        let near = PlayerRecord::opponent(3.0, 0.0);
        let broken = PlayerRecord::opponent(f64::NAN, 0.0);

        let nan_last = summarize(&[actor, near, broken]).stats;
        let nan_first = summarize(&[actor, broken, near]).stats;
        assert_eq!(nan_last, nan_first);
        assert_eq!(nan_last.closest_defender_distance, 3.0);
        assert_eq!(nan_last.defenders_close, 1);
    }

    #[test]
    fn only_nan_opponents_leave_closest_nan() {
        let frame = [PlayerRecord::actor(0.0, 0.0), PlayerRecord::opponent(f64::NAN, 0.0)];
        assert!(summarize(&frame).stats.closest_defender_distance.is_nan());
    }

    #[test]
    fn record_parses_location_pair() {
        let rec: PlayerRecord = serde_json::from_str(
            r#"{"location":[61.2,33.5],"teammate":false,"actor":false,"keeper":true}"#,
        )
        .unwrap();
        assert_eq!(rec, PlayerRecord::opponent(61.2, 33.5));
    }

    #[test]
    fn record_prefers_location_over_xy() {
        let rec: PlayerRecord = serde_json::from_str(
            r#"{"x":1.0,"y":2.0,"location":[3.0,4.0],"teammate":true,"actor":true}"#,
        )
        .unwrap();
        assert_eq!(rec.location(), Location::new(3.0, 4.0));
    }

    #[test]
    fn record_without_coordinates_is_rejected() {
        let res =
            serde_json::from_str::<PlayerRecord>(r#"{"x":1.0,"teammate":true,"actor":false}"#);
        assert!(res.is_err());
        let res = serde_json::from_str::<PlayerRecord>(
            r#"{"location":[1.0],"teammate":true,"actor":false}"#,
        );
        assert!(res.is_err());
    }
}
