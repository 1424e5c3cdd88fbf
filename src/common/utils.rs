//! Small helpers shared across modules.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Render a path for display with the home directory collapsed to `~`.
///
/// Logs and notifications are often pasted into bug reports, so user names
/// embedded in absolute paths are hidden.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}

/// Expand a leading `~` or `~/` in a user-provided path.
pub fn expand_tilde(raw: &str) -> PathBuf {
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw));
    }
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// Open a file with the desktop's default handler.
///
/// The child is not awaited; a missing `xdg-open` is reported as an error.
pub fn open_in_desktop(path: &Path) -> Result<()> {
    std::process::Command::new("xdg-open")
        .arg(path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to open {}", private_path(path)))?;
    Ok(())
}
