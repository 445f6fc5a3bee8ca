//! Recorded fix log replay
//!
//! Accepts either a document `{"fixes": [...]}` or a bare JSON array of
//! fixes, using the provider field names (`latitude`, `longitude`,
//! `accuracy`, `speed`, `timestamp`).

use crate::core::PositionFix;
use crate::source::{FixSource, SourceError, SourceResult, SourceStatus};
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize)]
#[serde(untagged)]
enum FixLog {
    Document { fixes: Vec<PositionFix> },
    List(Vec<PositionFix>),
}

impl FixLog {
    fn into_fixes(self) -> Vec<PositionFix> {
        match self {
            FixLog::Document { fixes } => fixes,
            FixLog::List(fixes) => fixes,
        }
    }
}

/// Fix source that yields a recorded log in file order
pub struct ReplaySource {
    id: u8,
    fixes: VecDeque<PositionFix>,
    status: SourceStatus,
}

impl ReplaySource {
    pub fn from_fixes(id: u8, fixes: Vec<PositionFix>) -> Self {
        Self {
            id,
            fixes: fixes.into(),
            status: SourceStatus::new(id),
        }
    }

    pub fn from_json_str(id: u8, json: &str) -> SourceResult<Self> {
        let log: FixLog = serde_json::from_str(json).map_err(|e| SourceError::Parse {
            message: e.to_string(),
        })?;
        Ok(Self::from_fixes(id, log.into_fixes()))
    }

    pub fn from_file<P: AsRef<Path>>(id: u8, path: P) -> SourceResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|e| SourceError::Io {
            message: format!("failed to read fix log '{}': {}", path_str, e),
        })?;

        let source = Self::from_json_str(id, &content).map_err(|e| match e {
            SourceError::Parse { message } => SourceError::Parse {
                message: format!("'{}': {}", path_str, message),
            },
            other => other,
        })?;
        debug!(path = %path_str, fixes = source.remaining(), "fix log loaded");
        Ok(source)
    }

    pub fn remaining(&self) -> usize {
        self.fixes.len()
    }
}

impl FixSource for ReplaySource {
    fn poll_fix(&mut self) -> SourceResult<Option<PositionFix>> {
        let fix = self.fixes.pop_front();
        if let Some(fix) = &fix {
            self.status.record(fix);
        }
        Ok(fix)
    }

    fn is_exhausted(&self) -> bool {
        self.fixes.is_empty()
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn id(&self) -> u8 {
        self.id
    }

    fn name(&self) -> &str {
        "replay"
    }

    fn status(&self) -> SourceStatus {
        self.status.clone()
    }
}
