//! Expected Dribble value (xD).
//!
//! xD = A * (1 - D) * X, clamped to [0, 1], where
//! - A (attack) = field value * velocity * teammate support * movement direction
//! - D (defense) = pressure * coverage * physical mismatch
//! - X (context) = 0.99 * time pressure * score pressure
//!
//! Every factor is unbounded on its own; only the final value is clamped.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::XdConfig;
use crate::error::XdError;
use crate::freeze_frame::{
    DistanceStats, DistanceSummary, Location, PlayerRecord, process_freeze_frame,
};

const MAX_SPEED_KMH: f64 = 36.0;
const PITCH_CENTER_Y: f64 = 40.0;
const CONTEXT_BASE: f64 = 0.99;
const LATE_GAME_MINUTE: f64 = 75.0;
const FULL_MATCH_MINUTES: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DribbleKinematics {
    pub velocity: f64,
    /// Degrees, relative to the attacking direction.
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchContext {
    pub minute: f64,
    pub attacker_minutes_played: f64,
    pub defender_minutes_played: f64,
    pub goal_difference: i32,
}

impl Default for MatchContext {
    fn default() -> Self {
        Self {
            minute: 45.0,
            attacker_minutes_played: 45.0,
            defender_minutes_played: 45.0,
            goal_difference: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XdComponents {
    pub attack: f64,
    pub defense: f64,
    pub context: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XdFactors {
    pub z_campo: f64,
    pub velocity: f64,
    pub teammates: f64,
    pub direction: f64,
    pub pressure: f64,
    pub coverage: f64,
    pub physical: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XdResult {
    #[serde(rename = "xD")]
    pub xd: f64,
    #[serde(rename = "xD_percentage")]
    pub xd_percentage: String,
    pub location: Location,
    pub components: XdComponents,
    pub factors: XdFactors,
    pub distances: DistanceStats,
}

/// Score a dribble straight from a freeze frame with the default sentinel distance.
pub fn calculate_xd(
    velocity: f64,
    angle: f64,
    freeze_frame: &[PlayerRecord],
    context: MatchContext,
) -> Result<XdResult, XdError> {
    calculate_xd_with(velocity, angle, freeze_frame, context, &XdConfig::default())
}

pub fn calculate_xd_with(
    velocity: f64,
    angle: f64,
    freeze_frame: &[PlayerRecord],
    context: MatchContext,
    cfg: &XdConfig,
) -> Result<XdResult, XdError> {
    let summary = process_freeze_frame(freeze_frame, cfg)?;
    score_dribble(&DribbleKinematics { velocity, angle }, &context, &summary)
}

/// Combine the distance summary with kinematics and match context.
pub fn score_dribble(
    kinematics: &DribbleKinematics,
    context: &MatchContext,
    summary: &DistanceSummary,
) -> Result<XdResult, XdError> {
    let Location { x, y } = summary.dribbler_location;
    let d = &summary.stats;

    let factors = XdFactors {
        z_campo: field_value(x),
        velocity: velocity_factor(kinematics.velocity),
        teammates: teammate_support(d.teammates_close, d.teammates_medium, d.teammates_far),
        direction: direction_factor(kinematics.angle, y),
        pressure: pressure_factor(d.closest_defender_distance),
        coverage: coverage_factor(d.defenders_very_close, d.defenders_close),
        physical: physical_mismatch(
            context.attacker_minutes_played,
            context.defender_minutes_played,
        ),
    };
    trace!("xD factors: {factors:?}");

    let components = XdComponents {
        attack: factors.z_campo * factors.velocity * factors.teammates * factors.direction,
        defense: factors.pressure * factors.coverage * factors.physical,
        context: CONTEXT_BASE * time_factor(context.minute) * score_factor(context.goal_difference),
    };

    let raw = components.attack * (1.0 - components.defense) * components.context;
    if raw.is_nan() {
        return Err(XdError::NanScore { stage: "final product" });
    }
    // `+ 0.0` turns a -0.0 product into 0.0.
    let xd = raw.clamp(0.0, 1.0) + 0.0;
    debug!(
        "xD {:.4} (raw {:.4}) A={:.4} D={:.4} X={:.4}",
        xd, raw, components.attack, components.defense, components.context
    );

    Ok(XdResult {
        xd,
        xd_percentage: format_percentage(xd),
        location: summary.dribbler_location,
        components,
        factors,
        distances: *d,
    })
}

pub fn format_percentage(xd: f64) -> String {
    format!("{:.1}%", xd * 100.0)
}

/// Field-position value. The two halves are not continuous at x = 60; the
/// own-half branch evaluates higher there. Kept as-is.
pub fn field_value(x: f64) -> f64 {
    if x < 60.0 {
        0.09 * (0.027 * x).exp()
    } else {
        0.09 * (0.021 * x).exp() + 0.008 * (x - 60.0)
    }
}

pub fn velocity_factor(velocity: f64) -> f64 {
    0.5 + 0.3 * (velocity / MAX_SPEED_KMH)
}

pub fn teammate_support(close: usize, medium: usize, far: usize) -> f64 {
    (1.0 + 0.06 * close as f64) * (1.0 + 0.03 * medium as f64) * (1.0 + 0.015 * far as f64)
}

pub fn direction_factor(angle_deg: f64, y: f64) -> f64 {
    let angle_rad = angle_deg.to_radians();
    let y_factor = 1.0 - ((y - PITCH_CENTER_Y).abs() / 40.0) * 0.3;
    0.725 - 0.125 * angle_rad.cos() * y_factor
}

pub fn pressure_factor(closest_defender_distance: f64) -> f64 {
    let norm = closest_defender_distance / 10.0;
    0.3 + 0.4 * (1.0 - norm).powi(2)
}

pub fn coverage_factor(very_close: usize, close: usize) -> f64 {
    0.7 + 0.15 * very_close as f64 + 0.10 * close as f64
}

pub fn fatigue(minutes_played: f64) -> f64 {
    1.0 - (minutes_played / FULL_MATCH_MINUTES) * 0.15
}

pub fn physical_mismatch(attacker_minutes_played: f64, defender_minutes_played: f64) -> f64 {
    0.33 + 0.67 * (fatigue(attacker_minutes_played) / fatigue(defender_minutes_played))
}

pub fn time_factor(minute: f64) -> f64 {
    if minute <= LATE_GAME_MINUTE {
        1.0
    } else {
        1.0 + 0.02 * (minute - LATE_GAME_MINUTE)
    }
}

pub fn score_factor(goal_difference: i32) -> f64 {
    match goal_difference {
        0 => 1.0,
        d if d > 0 => 0.95,
        _ => 1.05,
    }
}
