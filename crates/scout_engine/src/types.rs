use std::fmt;

use scout_core::{JobId, MarketplaceId, QueueError};
use thiserror::Error;

/// Name of the browser window a navigation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowTarget {
    Marketplace(MarketplaceId),
    /// A new instance of the application itself, carrying a continuation.
    HandOff,
}

impl fmt::Display for WindowTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowTarget::Marketplace(id) => write!(f, "{id}"),
            WindowTarget::HandOff => write!(f, "_blank"),
        }
    }
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("navigation to {url} was blocked")]
    Blocked { url: String },
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl NavigationError {
    pub fn url(&self) -> Option<&str> {
        match self {
            NavigationError::Blocked { url } => Some(url),
            NavigationError::Launch { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Opened {
        target: WindowTarget,
        url: String,
    },
    Blocked {
        url: String,
    },
    /// A scheduled job fired; `remaining` jobs are still queued.
    JobFired {
        job_id: JobId,
        remaining: usize,
    },
    ScheduleIdle,
    HandOffCompleted {
        navigate_to: String,
    },
    ScheduleRejected(QueueError),
}
