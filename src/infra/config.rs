use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STATE_DIR_ENV: &str = "CALLTALLY_STATE_DIR";
pub const DB_PATH_ENV: &str = "CALLTALLY_DB";
pub const LOG_FILTER_ENV: &str = "CALLTALLY_LOG";

const DB_FILE_NAME: &str = "state.db";

#[derive(Debug, Error)]
pub enum ResolveStateDirError {
    #[error("home directory not found")]
    HomeDirNotFound,
}

/// `--state-dir`, then `CALLTALLY_STATE_DIR`, then `~/.calltally`.
pub fn resolve_state_dir(explicit: Option<&Path>) -> Result<PathBuf, ResolveStateDirError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env_path(STATE_DIR_ENV) {
        return Ok(path);
    }
    let Some(home) = dirs::home_dir() else {
        return Err(ResolveStateDirError::HomeDirNotFound);
    };
    Ok(home.join(".calltally"))
}

pub fn resolve_db_path(state_dir: &Path) -> PathBuf {
    env_path(DB_PATH_ENV).unwrap_or_else(|| state_dir.join(DB_FILE_NAME))
}

fn env_path(name: &str) -> Option<PathBuf> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_state_dir_wins() {
        let dir = resolve_state_dir(Some(Path::new("/tmp/calls"))).expect("dir");
        assert_eq!(dir, PathBuf::from("/tmp/calls"));
    }
}
