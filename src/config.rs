use std::env;

/// Closest-defender distance reported when a freeze frame has no opponents.
/// Policy default, not a measurement.
pub const NO_DEFENDER_DISTANCE: f64 = 10.0;

const DEFAULT_BATCH_THREADS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XdConfig {
    pub no_defender_distance: f64,
    pub batch_threads: usize,
}

impl Default for XdConfig {
    fn default() -> Self {
        Self {
            no_defender_distance: NO_DEFENDER_DISTANCE,
            batch_threads: DEFAULT_BATCH_THREADS,
        }
    }
}

impl XdConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            no_defender_distance: env::var("XD_NO_DEFENDER_DISTANCE")
                .ok()
                .and_then(|val| parse_distance(&val))
                .unwrap_or(d.no_defender_distance),
            batch_threads: env::var("XD_BATCH_THREADS")
                .ok()
                .and_then(|val| val.trim().parse::<usize>().ok())
                .unwrap_or(d.batch_threads)
                .clamp(1, 32),
        }
    }
}

fn parse_distance(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 { Some(v) } else { None }
}
