use anyhow::Result;
use std::path::{Path, PathBuf};

pub const LOG_FOLDER_NAME: &str = "Report_Assistant_Log";

/// Resolve deployment folder (absolute path)
pub fn resolve_deployment_folder() -> Result<PathBuf> {
    // Prefer the folder where the executable lives
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(dir) = exe_path.parent() {
            return Ok(dir.to_path_buf());
        }
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    Ok(cwd)
}

/// Resolve log folder (absolute path)
///
/// Order: the configured folder, an existing `Report_Assistant_Log/` found walking up from the
/// working directory, a new one next to the workspace `Cargo.lock`, else next to the executable.
pub fn resolve_log_folder(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = configured {
        std::fs::create_dir_all(dir)
            .map_err(|e| anyhow::anyhow!("Failed to create log folder {:?}: {}", dir, e))?;
        return Ok(dir.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(found) = find_log_folder_from(&cwd)? {
            return Ok(found);
        }
    }

    let base = resolve_deployment_folder()?;
    let log_dir = base.join(LOG_FOLDER_NAME);
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create log folder: {}", e))?;
    Ok(log_dir)
}

/// Walk up from `start` (at most 12 levels) looking for an existing log folder, or a
/// workspace root marker under which one is created.
fn find_log_folder_from(start: &Path) -> Result<Option<PathBuf>> {
    let mut dir = start.to_path_buf();
    for _ in 0..12 {
        let candidate = dir.join(LOG_FOLDER_NAME);
        if candidate.exists() {
            return Ok(Some(candidate));
        }

        if dir.join("Cargo.lock").exists() {
            std::fs::create_dir_all(&candidate)
                .map_err(|e| anyhow::anyhow!("Failed to create log folder: {}", e))?;
            return Ok(Some(candidate));
        }

        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => break,
        }
    }
    Ok(None)
}
