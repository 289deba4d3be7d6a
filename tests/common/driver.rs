use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use journey_runner::browser::driver::{BrowserLauncher, LaunchOptions, LoadState, PageDriver};
use journey_runner::browser::locator::Locator;
use journey_runner::error::{JourneyError, Result};

/// In-memory page: a URL, a title and the set of elements that exist.
///
/// Failures are keyed by call, e.g. `click text="Pay"`, `navigate <url>`,
/// `wait networkidle`, `fill input, textarea`, `title`. Panics use the same keys.
/// Dropping a driver logs `drop`.
#[derive(Clone, Default)]
pub struct ScriptedDriver {
    pub url: String,
    pub title: String,
    pub present: Vec<Locator>,
    pub failures: HashMap<String, String>,
    /// Clicking the locator (by Display) moves the page to this URL
    pub click_targets: HashMap<String, String>,
    pub fail_screenshots: bool,
    pub panics: Vec<String>,
    pub log: Rc<RefCell<Vec<String>>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        let mut driver = Self::default();
        driver.url = "about:blank".to_string();
        driver.title = "Test Shop".to_string();
        driver
    }

    pub fn with(mut self, locator: Locator) -> Self {
        self.present.push(locator);
        self
    }

    pub fn failing(mut self, call: &str, message: &str) -> Self {
        self.failures.insert(call.to_string(), message.to_string());
        self
    }

    pub fn panicking(mut self, call: &str) -> Self {
        self.panics.push(call.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    fn record(&self, call: String) {
        self.log.borrow_mut().push(call);
    }

    fn check(&self, key: &str, command: &str) -> Result<()> {
        if self.panics.iter().any(|p| p == key) {
            panic!("scripted driver panicked on {}", key);
        }
        match self.failures.get(key) {
            Some(message) => Err(JourneyError::SessionProtocol {
                command: command.to_string(),
                error: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn state_name(state: LoadState) -> &'static str {
    match state {
        LoadState::Load => "load",
        LoadState::DomContentLoaded => "domcontentloaded",
        LoadState::NetworkIdle => "networkidle",
    }
}

impl PageDriver for ScriptedDriver {
    fn navigate(&mut self, url: &str, _wait_until: LoadState, timeout: Duration) -> Result<()> {
        self.record(format!("navigate {} {}", url, timeout.as_millis()));
        self.check(&format!("navigate {}", url), "navigate")?;
        self.url = url.to_string();
        Ok(())
    }

    fn current_url(&mut self) -> Result<String> {
        Ok(self.url.clone())
    }

    fn title(&mut self) -> Result<String> {
        self.check("title", "title")?;
        Ok(self.title.clone())
    }

    fn count(&mut self, locator: &Locator) -> Result<u32> {
        Ok(self.present.iter().filter(|l| *l == locator).count() as u32)
    }

    fn click(&mut self, locator: &Locator) -> Result<()> {
        self.record(format!("click {}", locator));
        self.check(&format!("click {}", locator), "click")?;
        if let Some(target) = self.click_targets.get(&locator.to_string()) {
            self.url = target.clone();
        }
        Ok(())
    }

    fn fill(&mut self, locator: &Locator, value: &str) -> Result<()> {
        self.record(format!("fill {} = {}", locator, value));
        self.check(&format!("fill {}", locator), "fill")?;
        if !self.present.contains(locator) {
            return Err(JourneyError::ElementNotFound {
                element: locator.to_string(),
                context: "fill".to_string(),
            });
        }
        Ok(())
    }

    fn wait_for_load_state(&mut self, state: LoadState, timeout: Duration) -> Result<()> {
        self.record(format!("wait {} {}", state_name(state), timeout.as_millis()));
        self.check(&format!("wait {}", state_name(state)), "wait_for_load_state")
    }

    fn screenshot(&mut self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.record(format!("screenshot {}", name));
        if self.fail_screenshots {
            return Err(JourneyError::SessionIO("screenshot refused".into()));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.record("close".to_string());
        Ok(())
    }
}

impl Drop for ScriptedDriver {
    fn drop(&mut self) {
        self.log.borrow_mut().push("drop".to_string());
    }
}

/// Hands out clones of one scripted driver; the call log is shared.
pub struct ScriptedLauncher {
    pub driver: ScriptedDriver,
    pub launch_error: Option<String>,
    pub launched_with: RefCell<Vec<LaunchOptions>>,
}

impl ScriptedLauncher {
    pub fn new(driver: ScriptedDriver) -> Self {
        Self {
            driver,
            launch_error: None,
            launched_with: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            driver: ScriptedDriver::new(),
            launch_error: Some(message.to_string()),
            launched_with: RefCell::new(Vec::new()),
        }
    }

    pub fn launches(&self) -> usize {
        self.launched_with.borrow().len()
    }
}

impl BrowserLauncher for ScriptedLauncher {
    fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageDriver>> {
        self.launched_with.borrow_mut().push(options.clone());
        if let Some(message) = &self.launch_error {
            return Err(JourneyError::SessionIO(message.clone()));
        }
        Ok(Box::new(self.driver.clone()))
    }
}
