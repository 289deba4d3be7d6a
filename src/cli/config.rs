use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::browser::driver::{LaunchOptions, Viewport};
use crate::journey::engine::EngineSettings;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "journey-runner",
    version,
    about = "Persona-driven user journey tests in a headless browser"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: journey-runner.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one journey for one persona and print the result as JSON
    Run(RunArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Session whose persona store to use
    #[arg(long)]
    pub session: Option<String>,

    /// Journey identifier
    #[arg(long)]
    pub journey: Option<String>,

    /// Persona identifier
    #[arg(long)]
    pub persona: Option<String>,

    /// URL of the application under test
    #[arg(long)]
    pub base_url: Option<String>,

    /// Journey file (JSON or YAML) instead of the journeys directory
    #[arg(long, conflicts_with = "journey_json")]
    pub journey_file: Option<String>,

    /// Inline journey JSON (step list or object with "steps")
    #[arg(long)]
    pub journey_json: Option<String>,

    /// Persona file (JSON or YAML) instead of the session store
    #[arg(long, conflicts_with = "persona_json")]
    pub persona_file: Option<String>,

    /// Inline persona JSON
    #[arg(long)]
    pub persona_json: Option<String>,

    /// Run identifier (default: UTC timestamp)
    #[arg(long)]
    pub run_id: Option<String>,

    /// Base timeout in milliseconds before persona scaling
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Directory holding <session>-personas files
    #[arg(long)]
    pub personas_dir: Option<String>,

    /// Directory holding <journey>.json / .yaml files
    #[arg(long)]
    pub journeys_dir: Option<String>,

    /// Root directory for screenshots
    #[arg(long)]
    pub screenshots_dir: Option<String>,

    /// Also write the JSON result to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write a JUnit XML report to this file
    #[arg(long)]
    pub junit: Option<String>,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `journey-runner.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_node")]
    pub node_binary: String,

    #[serde(default = "default_driver_script")]
    pub driver_script: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            node_binary: default_node(),
            driver_script: default_driver_script(),
            headless: true,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_base_timeout_ms")]
    pub base_timeout_ms: u64,

    #[serde(default = "default_personas_dir")]
    pub personas_dir: String,

    #[serde(default = "default_journeys_dir")]
    pub journeys_dir: String,

    #[serde(default = "default_screenshots_dir")]
    pub screenshots_dir: String,

    #[serde(default)]
    pub capture_before_steps: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_timeout_ms: default_base_timeout_ms(),
            personas_dir: default_personas_dir(),
            journeys_dir: default_journeys_dir(),
            screenshots_dir: default_screenshots_dir(),
            capture_before_steps: false,
        }
    }
}

// Serde default helpers
fn default_node() -> String { "node".to_string() }
fn default_driver_script() -> String { "node/journey-driver/browser_server.js".to_string() }
fn default_true() -> bool { true }
fn default_viewport_width() -> u32 { 1280 }
fn default_viewport_height() -> u32 { 720 }
fn default_user_agent() -> String { "JourneyRunner/0.1 (+headless)".to_string() }
fn default_base_timeout_ms() -> u64 { 15_000 }
fn default_personas_dir() -> String { ".sessions".to_string() }
fn default_journeys_dir() -> String { "journeys".to_string() }
fn default_screenshots_dir() -> String { "test-results/screenshots".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Missing file gives defaults; a malformed
/// one gives defaults and a warning.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("journey-runner.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "ignoring malformed config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build engine settings from the config file, with CLI overrides applied.
pub fn build_engine_settings(config: &AppConfig, args: &RunArgs) -> EngineSettings {
    let screenshots_dir = args
        .screenshots_dir
        .clone()
        .unwrap_or_else(|| config.run.screenshots_dir.clone());

    EngineSettings {
        launch: LaunchOptions {
            headless: config.browser.headless,
            viewport: Viewport {
                width: config.browser.viewport_width,
                height: config.browser.viewport_height,
            },
            user_agent: config.browser.user_agent.clone(),
            default_timeout_ms: config.run.base_timeout_ms,
        },
        screenshots_dir: PathBuf::from(screenshots_dir),
        capture_before_steps: config.run.capture_before_steps,
    }
}
