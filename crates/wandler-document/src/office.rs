// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External office suite — headless LibreOffice conversion to PDF.
//
// The suite writes `<stem>.pdf` into its `--outdir`. Wandler points it at a
// private scratch directory and moves the result into place afterwards, so
// an existing `<stem>.pdf` next to the source is never overwritten.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};
use wandler_core::AppConfig;
use wandler_core::error::{Result, WandlerError};

/// Executable names probed on `PATH`, in order.
const CANDIDATES: [&str; 2] = ["soffice", "libreoffice"];

/// How often a running conversion is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A located office suite executable.
#[derive(Debug, Clone)]
pub struct OfficeSuite {
    command: PathBuf,
    timeout: Duration,
}

impl OfficeSuite {
    /// Resolve the executable from the configuration: the explicit
    /// `office_command` when set, otherwise the first candidate on `PATH`.
    /// `None` when the suite is disabled or cannot be found.
    pub fn locate(config: &AppConfig) -> Option<Self> {
        if !config.use_office_suite {
            debug!("Office suite disabled in settings");
            return None;
        }

        let command = match config.office_command.as_deref() {
            Some(explicit) if !explicit.trim().is_empty() => {
                let path = PathBuf::from(explicit.trim());
                if path.components().count() > 1 && !path.exists() {
                    warn!(path = %path.display(), "Configured office command does not exist");
                    return None;
                }
                path
            }
            _ => CANDIDATES.iter().find_map(|name| find_on_path(name))?,
        };

        debug!(command = %command.display(), "Office suite located");
        Some(Self {
            command,
            timeout: Duration::from_secs(config.office_timeout_secs.max(1)),
        })
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Convert `input` to PDF, writing the result to `output`.
    #[instrument(skip(self), fields(command = %self.command.display()))]
    pub fn convert_to_pdf(&self, input: &Path, output: &Path) -> Result<()> {
        let scratch = std::env::temp_dir().join(format!("wandler-office-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&scratch)?;

        let result = self.run(input, &scratch, output);
        if let Err(err) = std::fs::remove_dir_all(&scratch) {
            warn!(%err, "Failed to remove office scratch directory");
        }
        result
    }

    fn run(&self, input: &Path, scratch: &Path, output: &Path) -> Result<()> {
        info!(input = %input.display(), "Running office suite conversion");
        let mut child = Command::new(&self.command)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(scratch)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                WandlerError::OfficeSuite(format!(
                    "failed to run {}: {err}",
                    self.command.display()
                ))
            })?;

        let started = Instant::now();
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if started.elapsed() >= self.timeout => {
                    if let Err(err) = child.kill() {
                        warn!(%err, "Failed to kill timed-out office suite");
                    }
                    let _ = child.wait();
                    return Err(WandlerError::OfficeSuite(format!(
                        "timed out after {} s",
                        self.timeout.as_secs()
                    )));
                }
                None => std::thread::sleep(POLL_INTERVAL),
            }
        };

        if !status.success() {
            return Err(WandlerError::OfficeSuite(format!("exited with {status}")));
        }

        let stem = input
            .file_stem()
            .ok_or_else(|| WandlerError::OfficeSuite("input has no file name".into()))?;
        let produced = scratch.join(format!("{}.pdf", stem.to_string_lossy()));
        if !produced.is_file() {
            return Err(WandlerError::OfficeSuite(
                "finished without producing a PDF".into(),
            ));
        }

        std::fs::copy(&produced, output)?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Office suite conversion finished"
        );
        Ok(())
    }
}

/// First executable called `name` in the `PATH` directories.
fn find_on_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_suite_is_never_located() {
        let config = AppConfig {
            use_office_suite: false,
            office_command: Some("soffice".into()),
            ..AppConfig::default()
        };
        assert!(OfficeSuite::locate(&config).is_none());
    }

    #[test]
    fn missing_explicit_path_is_not_located() {
        let config = AppConfig {
            office_command: Some("/definitely/not/here/soffice".into()),
            ..AppConfig::default()
        };
        assert!(OfficeSuite::locate(&config).is_none());
    }

    #[test]
    fn explicit_bare_command_is_used_as_given() {
        let config = AppConfig {
            office_command: Some("my-office".into()),
            office_timeout_secs: 5,
            ..AppConfig::default()
        };
        let suite = OfficeSuite::locate(&config).unwrap();
        assert_eq!(suite.command(), Path::new("my-office"));
    }

    #[test]
    fn unrunnable_command_reports_office_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.docx");
        std::fs::write(&input, b"x").unwrap();

        let config = AppConfig {
            office_command: Some("wandler-no-such-office-binary".into()),
            ..AppConfig::default()
        };
        let suite = OfficeSuite::locate(&config).unwrap();
        let err = suite
            .convert_to_pdf(&input, &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, WandlerError::OfficeSuite(_)));
    }
}
