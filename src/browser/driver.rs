use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::browser::locator::Locator;
use crate::browser::session::BrowserSession;
use crate::error::Result;

/// Page readiness signals, named as Playwright names them on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    #[serde(rename = "load")]
    Load,
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    #[serde(rename = "networkidle")]
    NetworkIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Everything the driver needs to open a browser, context and page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOptions {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: String,
    /// Default budget for every page operation
    pub default_timeout_ms: u64,
}

impl LaunchOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_ms = duration_ms(timeout);
        self
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            user_agent: "JourneyRunner/0.1 (+headless)".to_string(),
            default_timeout_ms: 15_000,
        }
    }
}

/// The page operations a journey run needs.
///
/// Every call blocks until the browser reports completion or the given
/// budget elapses. Click and fill act on the first element matching the
/// locator; with no match they fail.
pub trait PageDriver {
    fn navigate(&mut self, url: &str, wait_until: LoadState, timeout: Duration) -> Result<()>;

    fn current_url(&mut self) -> Result<String>;

    fn title(&mut self) -> Result<String>;

    fn count(&mut self, locator: &Locator) -> Result<u32>;

    fn click(&mut self, locator: &Locator) -> Result<()>;

    fn fill(&mut self, locator: &Locator, value: &str) -> Result<()>;

    fn wait_for_load_state(&mut self, state: LoadState, timeout: Duration) -> Result<()>;

    fn screenshot(&mut self, path: &Path) -> Result<()>;

    /// Release the browser. Calling it more than once is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// Produces a fresh, exclusively owned driver per run.
pub trait BrowserLauncher {
    fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageDriver>>;
}

/// Launches `browser_server.js` under Node.js.
#[derive(Debug, Clone)]
pub struct NodeLauncher {
    pub node_binary: String,
    pub script: PathBuf,
}

impl NodeLauncher {
    pub fn new(node_binary: &str, script: impl Into<PathBuf>) -> Self {
        Self {
            node_binary: node_binary.to_string(),
            script: script.into(),
        }
    }
}

impl BrowserLauncher for NodeLauncher {
    fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageDriver>> {
        let session = BrowserSession::launch(&self.node_binary, &self.script, options)?;
        Ok(Box::new(session))
    }
}

pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
