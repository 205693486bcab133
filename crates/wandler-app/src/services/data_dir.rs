// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = base_dir(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .join("wandler");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), error = %e, "could not create data directory");
    }
    dir
}

fn base_dir(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    // XDG data dir, then ~/.local/share
    if let Some(xdg) = xdg_data_home.filter(|p| !p.as_os_str().is_empty()) {
        return xdg;
    }
    if let Some(home) = home {
        return home.join(".local").join("share");
    }
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_data_home_wins() {
        let dir = base_dir(Some("/xdg".into()), Some("/home/ada".into()));
        assert_eq!(dir, PathBuf::from("/xdg"));
    }

    #[test]
    fn home_fallback_uses_local_share() {
        let dir = base_dir(Some(PathBuf::new()), Some("/home/ada".into()));
        assert_eq!(dir, PathBuf::from("/home/ada/.local/share"));
        assert_eq!(base_dir(None, Some("/h".into())), PathBuf::from("/h/.local/share"));
    }
}
