use crate::model::PersistedState;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "sonicbrowse";
const STATE_FILE: &str = "state.json";
const CONFIG_DIR_ENV: &str = "SONICBROWSE_CONFIG_DIR";

pub fn config_root() -> Result<PathBuf> {
    if let Ok(override_dir) = env::var(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(override_dir));
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .context("neither HOME nor USERPROFILE is set")?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}

pub fn state_path() -> Result<PathBuf> {
    Ok(config_root()?.join(STATE_FILE))
}

pub fn load_state() -> Result<PersistedState> {
    read_state_file(&state_path()?)
}

pub fn save_state(state: &PersistedState) -> Result<()> {
    write_state_file(&state_path()?, state)
}

/// A missing file means nothing has been browsed yet.
pub fn read_state_file(path: &Path) -> Result<PersistedState> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(PersistedState::default()),
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to read playlist browser state {}", path.display())
            });
        }
    };
    serde_json::from_str(&raw).with_context(|| {
        format!(
            "playlist browser state {} is not valid JSON (source path and saved search)",
            path.display()
        )
    })
}

pub fn write_state_file(path: &Path, state: &PersistedState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(state).context("failed to encode browser state")?;
    fs::write(path, json).with_context(|| {
        format!("failed to save playlist browser state to {}", path.display())
    })
}
