use std::process::Stdio;
use std::sync::{mpsc, Arc, Mutex};

use scout_logging::{scout_debug, scout_info};
use tokio::process::Command;

use crate::{NavigationError, WindowTarget};

/// Opens browsing contexts. Implementations run on the engine's runtime and
/// must not block it.
#[async_trait::async_trait]
pub trait Navigator: Send + Sync {
    /// Opens `url` in a new browsing context named after `target`.
    async fn open_new_context(&self, url: &str, target: &WindowTarget)
        -> Result<(), NavigationError>;

    /// Moves the current browsing context to `url`.
    async fn navigate_current(&self, url: &str) -> Result<(), NavigationError>;
}

/// Hands URLs to the operating system's default browser.
#[derive(Debug, Clone)]
pub struct SystemBrowser {
    program: String,
    args: Vec<String>,
}

impl Default for SystemBrowser {
    fn default() -> Self {
        if cfg!(target_os = "windows") {
            Self::with_opener("cmd", ["/C", "start", ""])
        } else if cfg!(target_os = "macos") {
            Self::with_opener("open", [] as [&str; 0])
        } else {
            Self::with_opener("xdg-open", [] as [&str; 0])
        }
    }
}

impl SystemBrowser {
    pub fn with_opener<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    async fn launch(&self, url: &str) -> Result<(), NavigationError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| NavigationError::Launch {
                program: self.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            scout_debug!("{} exited with {} for {}", self.program, status, url);
            Err(NavigationError::Blocked {
                url: url.to_string(),
            })
        }
    }
}

#[async_trait::async_trait]
impl Navigator for SystemBrowser {
    async fn open_new_context(
        &self,
        url: &str,
        target: &WindowTarget,
    ) -> Result<(), NavigationError> {
        scout_info!("Opening {} in window {}", url, target);
        self.launch(url).await
    }

    // A terminal has no page of its own to move, so the current context is
    // another browser tab.
    async fn navigate_current(&self, url: &str) -> Result<(), NavigationError> {
        scout_info!("Navigating to {}", url);
        self.launch(url).await
    }
}

/// Sends marketplace navigations to `browser` and turns hand-off contexts
/// into new instances of the application.
///
/// A hand-off address is queued on the `contexts` channel for the caller to
/// load into a fresh session. With `rehearse` set, the hand-off also passes
/// through `browser` first, so a recording navigator lists it and can
/// refuse it.
pub struct ContextRelay {
    browser: Arc<dyn Navigator>,
    contexts: mpsc::Sender<String>,
    rehearse: bool,
}

impl ContextRelay {
    pub fn new(browser: Arc<dyn Navigator>, contexts: mpsc::Sender<String>) -> Self {
        Self {
            browser,
            contexts,
            rehearse: false,
        }
    }

    pub fn rehearsing(mut self, rehearse: bool) -> Self {
        self.rehearse = rehearse;
        self
    }
}

#[async_trait::async_trait]
impl Navigator for ContextRelay {
    async fn open_new_context(
        &self,
        url: &str,
        target: &WindowTarget,
    ) -> Result<(), NavigationError> {
        match target {
            WindowTarget::Marketplace(_) => self.browser.open_new_context(url, target).await,
            WindowTarget::HandOff => {
                if self.rehearse {
                    self.browser.open_new_context(url, target).await?;
                }
                scout_debug!("Queued new context for {}", url);
                self.contexts
                    .send(url.to_string())
                    .map_err(|_| NavigationError::Blocked {
                        url: url.to_string(),
                    })
            }
        }
    }

    async fn navigate_current(&self, url: &str) -> Result<(), NavigationError> {
        self.browser.navigate_current(url).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    NewContext { url: String, target: WindowTarget },
    Current { url: String },
}

impl Navigation {
    pub fn url(&self) -> &str {
        match self {
            Navigation::NewContext { url, .. } | Navigation::Current { url } => url,
        }
    }
}

/// Records navigations instead of performing them. Backs `--dry-run`.
///
/// URLs starting with one of the `blocked` prefixes are refused, which lets
/// callers rehearse a pop-up blocker.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    log: Arc<Mutex<Vec<Navigation>>>,
    blocked: Vec<String>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocking(prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            log: Arc::default(),
            blocked: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        match self.log.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, navigation: Navigation) -> Result<(), NavigationError> {
        let url = navigation.url().to_string();
        if self.blocked.iter().any(|prefix| url.starts_with(prefix)) {
            return Err(NavigationError::Blocked { url });
        }
        scout_info!("[dry-run] {:?}", navigation);
        match self.log.lock() {
            Ok(mut log) => log.push(navigation),
            Err(poisoned) => poisoned.into_inner().push(navigation),
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Navigator for RecordingNavigator {
    async fn open_new_context(
        &self,
        url: &str,
        target: &WindowTarget,
    ) -> Result<(), NavigationError> {
        self.record(Navigation::NewContext {
            url: url.to_string(),
            target: target.clone(),
        })
    }

    async fn navigate_current(&self, url: &str) -> Result<(), NavigationError> {
        self.record(Navigation::Current {
            url: url.to_string(),
        })
    }
}
