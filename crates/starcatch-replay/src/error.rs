use std::path::PathBuf;

use starcatch::config::ConfigError;

#[derive(Debug)]
pub enum ScenarioError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(String),
    Invalid(String),
    /// The game refused the configuration the scenario selected.
    Config(ConfigError),
    /// A step referred to a star or bomb that does not exist in the live scene.
    MissingEntity(String),
    Expectation(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "reading {}: {source}", path.display()),
            Self::Parse(m) => write!(f, "scenario parse error: {m}"),
            Self::Invalid(m) => write!(f, "invalid scenario: {m}"),
            Self::Config(e) => write!(f, "game config rejected: {e}"),
            Self::MissingEntity(m) => write!(f, "missing entity: {m}"),
            Self::Expectation(m) => write!(f, "expectation failed: {m}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ScenarioError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<ConfigError> for ScenarioError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn config_error_is_wrapped_with_source() {
        let err =
            ScenarioError::from(ConfigError::Invalid("hazards.max_speed_x must be >= 0".into()));
        assert_eq!(
            err.to_string(),
            "game config rejected: invalid config: hazards.max_speed_x must be >= 0"
        );
        assert!(err.source().is_some());
    }
}
