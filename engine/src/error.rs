use shared::shared_wheel_game::ConfigError;

#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Storage(String),
    Renderer(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(err) => write!(f, "invalid wheel configuration: {}", err),
            Error::Storage(msg) => write!(f, "storage error: {}", msg),
            Error::Renderer(msg) => write!(f, "renderer error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
