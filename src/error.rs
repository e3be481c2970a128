use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XdError {
    #[error("no actor found in freeze frame")]
    MissingActor,

    #[error("xD computation produced NaN at {stage}")]
    NanScore { stage: &'static str },
}

impl XdError {
    pub fn is_missing_actor(&self) -> bool {
        matches!(self, XdError::MissingActor)
    }
}
