use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid tick: dt must be finite and non-negative, got {dt}")]
    InvalidTick { dt: f64 },

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SimError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(msg.into())
    }

    /// A bad timestamp only spoils one frame; everything else needs caller action.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimError::InvalidTick { .. } => true,
            SimError::Io(_) => true,
            SimError::InvalidConfiguration(_) => false,
            SimError::Scenario(_) => false,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
