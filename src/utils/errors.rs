use thiserror::Error;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Unknown theme: {theme_id}")]
    Theme { theme_id: String },

    #[error("Invalid asset table: {message}")]
    Asset { message: String },

    #[error("Results log error: {message}")]
    ResultsLog { message: String },

    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl GameError {
    pub fn theme<S: Into<String>>(theme_id: S) -> Self {
        Self::Theme {
            theme_id: theme_id.into(),
        }
    }

    pub fn asset<S: Into<String>>(message: S) -> Self {
        Self::Asset {
            message: message.into(),
        }
    }

    pub fn results_log<S: Into<String>>(message: S) -> Self {
        Self::ResultsLog {
            message: message.into(),
        }
    }

    pub fn terminal<S: Into<String>>(message: S) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
