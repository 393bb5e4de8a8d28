//! Input script replay
//!
//! One record per line: a comma-separated list of held action names followed
//! by the number of ticks they stay held, e.g. `right,jump,12`. A record with
//! only a tick count (or the action `none`) holds nothing. Blank lines and
//! lines starting with `#` are skipped.

use scroll_engine::input::Actions;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Script loading errors
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read
    #[error("Failed to read input script {path}: {source}")]
    Io {
        /// Script path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A record is malformed
    #[error("Input script line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },
}

/// A replayable sequence of held-action segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    segments: Vec<(Actions, u32)>,
}

impl InputScript {
    /// Parse script text
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut segments = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let error = |message: String| ScriptError::Parse {
                line: index + 1,
                message,
            };

            let mut fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let count = fields.pop().unwrap_or_default();
            let ticks: u32 = count
                .parse()
                .map_err(|_| error(format!("'{}' is not a tick count", count)))?;

            let mut held = Actions::empty();
            for name in fields {
                if name.eq_ignore_ascii_case("none") {
                    continue;
                }
                held |= Actions::from_action_name(name).ok_or_else(|| error(format!("unknown action '{}'", name)))?;
            }

            if ticks > 0 {
                segments.push((held, ticks));
            }
        }

        Ok(Self { segments })
    }

    /// Read and parse a script file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Actions held on a given tick; nothing once the script has run out
    pub fn actions_at(&self, tick: u64) -> Actions {
        let mut start = 0u64;
        for (held, ticks) in &self.segments {
            let end = start + u64::from(*ticks);
            if tick < end {
                return *held;
            }
            start = end;
        }
        Actions::empty()
    }

    /// Number of ticks the script covers
    pub fn len_ticks(&self) -> u64 {
        self.segments.iter().map(|(_, ticks)| u64::from(*ticks)).sum()
    }

    /// Whether the script holds no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
