//! Storage-root resolution
//!
//! Precedence: explicit flag, then `RANKMERGE_ROOT`, then `~/.rankmerge`.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable overriding the default storage root
pub const ROOT_ENV_VAR: &str = "RANKMERGE_ROOT";

const DEFAULT_ROOT_DIR: &str = ".rankmerge";

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory the backlog and membership stores live under
    pub root: PathBuf,
}

impl Config {
    /// Resolve the storage root from an optional explicit override
    pub fn resolve(root_flag: Option<PathBuf>) -> Result<Self> {
        let root = match root_flag {
            Some(root) => root,
            None => match std::env::var_os(ROOT_ENV_VAR) {
                Some(root) => PathBuf::from(root),
                None => dirs::home_dir()
                    .ok_or_else(|| Error::storage("could not determine home directory"))?
                    .join(DEFAULT_ROOT_DIR),
            },
        };
        Ok(Self { root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flag_beats_environment_and_default() {
        // env manipulation stays inside this single test
        std::env::set_var(ROOT_ENV_VAR, "/tmp/from-env");

        let config = Config::resolve(Some(PathBuf::from("/tmp/explicit"))).unwrap();
        assert_eq!(config.root, PathBuf::from("/tmp/explicit"));

        let config = Config::resolve(None).unwrap();
        assert_eq!(config.root, PathBuf::from("/tmp/from-env"));

        std::env::remove_var(ROOT_ENV_VAR);
    }
}
