use std::fmt;
use std::io;

/// Errors raised while loading parameters or writing run reports.
///
/// The stepper itself never fails; these only come from the edges of the
/// crate (files, TOML, JSON, preset lookup).
#[derive(Debug)]
pub enum SimError {
    Io(io::Error),
    Toml(toml::de::Error),
    TomlWrite(toml::ser::Error),
    Json(serde_json::Error),
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Toml(e) => write!(f, "invalid parameter file: {e}"),
            Self::TomlWrite(e) => write!(f, "could not write parameters as toml: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::UnknownPreset(name) => write!(
                f,
                "unknown preset '{name}' (expected one of: {})",
                crate::params::presets::NAMES.join(", ")
            ),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::TomlWrite(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::UnknownPreset(_) => None,
        }
    }
}

impl From<io::Error> for SimError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

impl From<toml::ser::Error> for SimError {
    fn from(e: toml::ser::Error) -> Self {
        Self::TomlWrite(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_preset_lists_known_names() {
        let msg = SimError::UnknownPreset("pd".into()).to_string();
        assert!(msg.contains("'pd'"));
        assert!(msg.contains("pid-ungated"));
    }

    #[test]
    fn toml_write_error_converts() {
        // a bare float is not a TOML document
        let err: SimError = toml::to_string(&1.5_f64).unwrap_err().into();
        assert!(matches!(err, SimError::TomlWrite(_)));
        assert!(err.to_string().starts_with("could not write parameters as toml"));
    }

    #[test]
    fn toml_error_keeps_source() {
        let err: SimError = toml::from_str::<toml::Value>("kp = = 1").unwrap_err().into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
