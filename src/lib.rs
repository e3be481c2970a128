pub mod batch;
pub mod config;
pub mod error;
pub mod fake_frame;
pub mod freeze_frame;
pub mod xd_model;

pub use config::XdConfig;
pub use error::XdError;
pub use freeze_frame::{
    DistanceStats, DistanceSummary, Location, PlayerRecord, process_freeze_frame,
};
pub use xd_model::{
    DribbleKinematics, MatchContext, XdComponents, XdFactors, XdResult, calculate_xd,
    calculate_xd_with, score_dribble,
};
