use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use vocab_core::PracticeSettings;

/// Read practice settings from a TOML file. A missing file means defaults.
pub fn load_settings(path: Option<&Path>) -> Result<PracticeSettings> {
    let settings = match path {
        Some(path) if path.exists() => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str::<PracticeSettings>(&raw)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        Some(path) => {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            PracticeSettings::default()
        }
        None => PracticeSettings::default(),
    };
    Ok(settings.validate()?)
}

/// Turn a bare or relative path into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:"
        || trimmed.starts_with("sqlite://")
        || trimmed.starts_with("sqlite:file:")
    {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its directory so the pool can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        // In-memory URLs need no file.
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database URL: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}
