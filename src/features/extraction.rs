use crate::PhotoLocatorError;
use crate::features::coordinates::{Coordinates, parse_dms};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

pub const DEFAULT_EXIFTOOL: &str = "exiftool";

/// Source of the textual metadata report for a photo.
pub trait MetadataReader {
    fn read(&self, path: &Path) -> impl Future<Output = Result<String, PhotoLocatorError>> + Send;
}

/// Runs the `exiftool` executable as a child process, one process per photo.
#[derive(Debug, Clone)]
pub struct ExifToolCli {
    program: PathBuf,
}

impl ExifToolCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for ExifToolCli {
    fn default() -> Self {
        Self::new(DEFAULT_EXIFTOOL)
    }
}

impl MetadataReader for ExifToolCli {
    async fn read(&self, path: &Path) -> Result<String, PhotoLocatorError> {
        // An absolute path can never be mistaken for an exiftool option.
        let target = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        debug!(tool = %self.program.display(), file = %target.display(), "running metadata tool");

        let output = Command::new(&self.program)
            .arg(&target)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => PhotoLocatorError::ToolNotFound {
                    tool: self.program.clone(),
                },
                _ => PhotoLocatorError::ExtractionFailed {
                    reason: format!("could not start {}: {e}", self.program.display()),
                },
            })?;

        if !output.status.success() {
            return Err(PhotoLocatorError::ExtractionFailed {
                reason: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        Ok(String::from_utf8(combined)?)
    }
}

/// Which coordinate a metadata line carries, judged by its label.
fn classify_label(line: &str) -> Option<bool> {
    let label = line.split(':').next().unwrap_or_default();
    if label.contains("Ref") {
        return None;
    }
    if label.contains("GPS Latitude") {
        Some(true)
    } else if label.contains("GPS Longitude") {
        Some(false)
    } else {
        None
    }
}

/// Scans an exiftool report for the GPS latitude and longitude lines.
///
/// When a field occurs more than once, the last parseable line wins. Lines whose value
/// fails to parse are skipped, so a photo with only malformed values has no GPS data.
pub fn parse_gps_output(output: &str) -> Result<Coordinates, PhotoLocatorError> {
    let mut latitude = None;
    let mut longitude = None;

    for line in output.lines() {
        let Some(is_latitude) = classify_label(line) else {
            continue;
        };
        match parse_dms(line) {
            Ok(value) if is_latitude => latitude = Some(value),
            Ok(value) => longitude = Some(value),
            Err(e) => warn!(line = line.trim(), "ignoring GPS line: {e}"),
        }
    }

    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        return Err(PhotoLocatorError::NoGpsData);
    };
    Coordinates::new(latitude, longitude)
}
