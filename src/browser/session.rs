use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::browser::driver::{LaunchOptions, LoadState, PageDriver, duration_ms};
use crate::browser::locator::Locator;
use crate::error::{JourneyError, Result};

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
        #[serde(rename = "waitUntil")]
        wait_until: LoadState,
        #[serde(rename = "timeoutMs")]
        timeout_ms: u64,
    },
    CurrentUrl {
        cmd: &'static str,
    },
    Title {
        cmd: &'static str,
    },
    Count {
        cmd: &'static str,
        locator: Locator,
    },
    Click {
        cmd: &'static str,
        locator: Locator,
    },
    Fill {
        cmd: &'static str,
        locator: Locator,
        value: String,
    },
    WaitForLoadState {
        cmd: &'static str,
        state: LoadState,
        #[serde(rename = "timeoutMs")]
        timeout_ms: u64,
    },
    Screenshot {
        cmd: &'static str,
        path: String,
        #[serde(rename = "fullPage")]
        full_page: bool,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str, wait_until: LoadState, timeout: Duration) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
            wait_until,
            timeout_ms: duration_ms(timeout),
        }
    }

    pub fn current_url() -> Self {
        BrowserRequest::CurrentUrl { cmd: "current_url" }
    }

    pub fn title() -> Self {
        BrowserRequest::Title { cmd: "title" }
    }

    pub fn count(locator: &Locator) -> Self {
        BrowserRequest::Count {
            cmd: "count",
            locator: locator.clone(),
        }
    }

    pub fn click(locator: &Locator) -> Self {
        BrowserRequest::Click {
            cmd: "click",
            locator: locator.clone(),
        }
    }

    pub fn fill(locator: &Locator, value: &str) -> Self {
        BrowserRequest::Fill {
            cmd: "fill",
            locator: locator.clone(),
            value: value.to_string(),
        }
    }

    pub fn wait_for_load_state(state: LoadState, timeout: Duration) -> Self {
        BrowserRequest::WaitForLoadState {
            cmd: "wait_for_load_state",
            state,
            timeout_ms: duration_ms(timeout),
        }
    }

    pub fn screenshot(path: &str) -> Self {
        BrowserRequest::Screenshot {
            cmd: "screenshot",
            path: path.to_string(),
            full_page: true,
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// A browser, context and page owned by one journey run.
///
/// Backed by a long-lived Node.js process running browser_server.js, which
/// keeps a Playwright Chromium instance open. Commands are NDJSON over stdin,
/// responses come back one line each on stdout. The driver's stderr is
/// inherited so its diagnostics land in our log channel.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    closed: bool,
}

impl BrowserSession {
    /// Spawn the driver and wait until it reports the page is ready.
    pub fn launch(node_binary: &str, script: &Path, options: &LaunchOptions) -> Result<Self> {
        let script_name = script.display().to_string();
        let options_json =
            serde_json::to_string(options).map_err(|e| JourneyError::JsonSerialize {
                context: "LaunchOptions".into(),
                source: e,
            })?;

        let mut child = Command::new(node_binary)
            .arg(script)
            .arg(&options_json)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| JourneyError::SubprocessSpawn {
                script: script_name.clone(),
                source: e,
            })?;

        let stdin = match child.stdin.take() {
            Some(stdin) => stdin,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(JourneyError::SessionIO(format!(
                    "Failed to capture stdin of {}",
                    script_name
                )));
            }
        };
        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(JourneyError::SessionIO(format!(
                    "Failed to capture stdout of {}",
                    script_name
                )));
            }
        };

        // From here on Drop owns teardown.
        let mut session = BrowserSession {
            child,
            stdin,
            reader: BufReader::new(stdout),
            closed: false,
        };

        let response = session.read_response("ready signal")?;
        if !response.ok || response.ready != Some(true) {
            return Err(JourneyError::SessionProtocol {
                command: "launch".into(),
                error: response
                    .error
                    .unwrap_or_else(|| "Did not receive ready signal from driver".into()),
            });
        }

        debug!(script = %script_name, "browser session ready");
        Ok(session)
    }

    fn read_response(&mut self, context: &str) -> Result<BrowserResponse> {
        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            JourneyError::SessionIO(format!("Failed to read {} from driver: {}", context, e))
        })?;

        if line.trim().is_empty() {
            return Err(JourneyError::SessionIO(format!(
                "Empty {} from driver (process may have died)",
                context
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| JourneyError::JsonParse {
            context: format!("driver {}", context),
            source: e,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse> {
        if self.closed {
            return Err(JourneyError::SessionIO("Browser session already closed".into()));
        }

        let json = serde_json::to_string(request).map_err(|e| JourneyError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            JourneyError::SessionIO(format!("Failed to write to driver stdin: {}", e))
        })?;
        self.stdin.flush().map_err(|e| {
            JourneyError::SessionIO(format!("Failed to flush driver stdin: {}", e))
        })?;

        self.read_response("response")
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest, command_name: &str) -> Result<BrowserResponse> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(JourneyError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }
}

impl PageDriver for BrowserSession {
    fn navigate(&mut self, url: &str, wait_until: LoadState, timeout: Duration) -> Result<()> {
        self.send_ok(&BrowserRequest::navigate(url, wait_until, timeout), "navigate")?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String> {
        let response = self.send_ok(&BrowserRequest::current_url(), "current_url")?;
        response.url.ok_or_else(|| JourneyError::SessionProtocol {
            command: "current_url".into(),
            error: "No URL in current_url response".into(),
        })
    }

    fn title(&mut self) -> Result<String> {
        let response = self.send_ok(&BrowserRequest::title(), "title")?;
        Ok(response.title.unwrap_or_default())
    }

    fn count(&mut self, locator: &Locator) -> Result<u32> {
        let response = self.send_ok(&BrowserRequest::count(locator), "count")?;
        Ok(response.count.unwrap_or(0))
    }

    fn click(&mut self, locator: &Locator) -> Result<()> {
        self.send_ok(&BrowserRequest::click(locator), "click")?;
        Ok(())
    }

    fn fill(&mut self, locator: &Locator, value: &str) -> Result<()> {
        self.send_ok(&BrowserRequest::fill(locator, value), "fill")?;
        Ok(())
    }

    fn wait_for_load_state(&mut self, state: LoadState, timeout: Duration) -> Result<()> {
        self.send_ok(&BrowserRequest::wait_for_load_state(state, timeout), "wait_for_load_state")?;
        Ok(())
    }

    fn screenshot(&mut self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.send_ok(&BrowserRequest::screenshot(&path), "screenshot")?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        // Best-effort quit, then make sure the process is gone either way.
        if let Err(e) = self.send(&BrowserRequest::quit()) {
            warn!(error = %e, "driver did not acknowledge quit; killing it");
            let _ = self.child.kill();
        }
        self.closed = true;
        self.child.wait().map_err(|e| JourneyError::Io {
            context: "waiting for browser driver to exit".into(),
            source: e,
        })?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
