use thiserror::Error;

#[derive(Error, Debug)]
pub enum PracticeError {
    #[error("player {0} is not tracked")]
    UnknownPlayer(crate::host::PlayerId),

    #[error("practice index {index} out of range (have {count})")]
    UnknownPractice { index: usize, count: usize },

    #[error("practice {0} is incompatible with a running drill")]
    Incompatible(String),

    #[error("practice {0} has no targets")]
    NoTargets(String),

    #[error("map {0} has no practices")]
    MapNotAvailable(String),

    #[error("server is busy: drills are running")]
    ServerBusy,

    #[error("invalid setting value: {0}")]
    InvalidSetting(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("locale error: {0}")]
    Locale(String),
}

pub type Result<T> = std::result::Result<T, PracticeError>;
