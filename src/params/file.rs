use std::path::Path;

use super::Params;
use crate::error::Result;

/// Environment variable naming a TOML parameter file.
pub const CONFIG_ENV: &str = "PID_CART_SIM_CONFIG";
/// Fallback location checked when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/cart.toml";

impl Params {
    /// Parse parameters from TOML. Missing sections and keys keep their defaults.
    ///
    /// ```toml
    /// [pid]
    /// kp = 0.2
    /// integral_threshold = inf
    ///
    /// [constants]
    /// dt = 0.05
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load from `$PID_CART_SIM_CONFIG`, then `config/cart.toml`, falling back
    /// to the built-in defaults.
    pub fn load_or_default() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            match Self::load(&path) {
                Ok(params) => return params,
                Err(e) => tracing::warn!(%path, error = %e, "ignoring parameter file named by PID_CART_SIM_CONFIG"),
            }
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            match Self::load(DEFAULT_CONFIG_PATH) {
                Ok(params) => return params,
                Err(e) => tracing::warn!(path = DEFAULT_CONFIG_PATH, error = %e, "ignoring parameter file"),
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BodyParams, GoalParams};
    use std::path::PathBuf;
    use std::sync::Mutex;

    // load_or_default reads process-wide state
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pid-cart-sim-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let p = Params::from_toml_str(
            r#"
            [pid]
            kp = 0.25
            kd = 0.0

            [constants]
            dt = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(p.pid.kp, 0.25);
        assert_eq!(p.pid.kd, 0.0);
        assert_eq!(p.pid.integral_threshold, 15.0);
        assert_eq!(p.constants.dt, 0.05);
        assert_eq!(p.constants.gravity, 9.8);
        assert_eq!(p.body, BodyParams::default());
        assert_eq!(p.goal, GoalParams::default());
    }

    #[test]
    fn infinite_threshold_parses() {
        let p = Params::from_toml_str("[pid]\nintegral_threshold = inf\n").unwrap();
        assert!(p.pid.integral_threshold.is_infinite());
    }

    #[test]
    fn toml_round_trip() {
        let mut p = Params::default();
        p.goal.offset = 120.0;
        p.body.max_jerk = 2.5;
        let back = Params::from_toml_str(&p.to_toml_string().unwrap()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let p = Params::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/cart.toml")).unwrap();
        assert_eq!(p, Params::default());
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(Params::from_toml_str("[pid]\nkp = \"fast\"\n").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Params::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, crate::error::SimError::Io(_)));
    }

    #[test]
    fn env_var_file_is_used() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = scratch_file("valid.toml", "[pid]\nkp = 0.42\n\n[goal]\noffset = 80.0\n");
        std::env::set_var(CONFIG_ENV, &path);
        let p = Params::load_or_default();
        std::env::remove_var(CONFIG_ENV);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(p.pid.kp, 0.42);
        assert_eq!(p.goal_position(), 420.0);
        assert_eq!(p.body, BodyParams::default());
    }

    #[test]
    fn unparsable_env_var_file_falls_through() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = scratch_file("broken.toml", "[pid\nkp = \n");
        std::env::set_var(CONFIG_ENV, &path);
        let p = Params::load_or_default();
        std::env::remove_var(CONFIG_ENV);
        std::fs::remove_file(&path).unwrap();

        // tests run from the crate root, where the shipped file holds the defaults
        assert_eq!(p, Params::default());
    }

    #[test]
    fn missing_env_var_file_falls_through() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var(CONFIG_ENV, "does/not/exist.toml");
        let p = Params::load_or_default();
        std::env::remove_var(CONFIG_ENV);
        assert_eq!(p, Params::default());
    }

    #[test]
    fn unset_env_var_uses_shipped_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var(CONFIG_ENV);
        assert_eq!(Params::load_or_default(), Params::default());
    }
}
