use std::path::PathBuf;
use std::time::Duration;

use crate::browser::driver::PageDriver;
use crate::journey::evidence::EvidenceCapturer;

/// Run-scoped state threaded through login and step execution.
pub struct RunContext<'a> {
    pub driver: &'a mut dyn PageDriver,
    pub evidence: EvidenceCapturer,
    /// Effective timeout after persona scaling
    pub timeout: Duration,
    pub base_url: String,
    pub capture_before_steps: bool,
}

impl<'a> RunContext<'a> {
    pub fn new(
        driver: &'a mut dyn PageDriver,
        evidence: EvidenceCapturer,
        timeout: Duration,
        base_url: &str,
    ) -> Self {
        Self {
            driver,
            evidence,
            timeout,
            base_url: base_url.to_string(),
            capture_before_steps: false,
        }
    }

    pub fn capture(&mut self, name: &str) -> Option<PathBuf> {
        self.evidence.capture(&mut *self.driver, name)
    }

    /// Current page URL, or "unknown" when the browser cannot say.
    pub fn url_or_unknown(&mut self) -> String {
        self.driver
            .current_url()
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Resolve a step route against the base URL; absolute URLs pass through.
    pub fn route_url(&self, route: &str) -> String {
        if route.contains("://") {
            return route.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if route.starts_with('/') {
            format!("{}{}", base, route)
        } else {
            format!("{}/{}", base, route)
        }
    }
}
