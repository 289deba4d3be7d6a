use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::browser::driver::NodeLauncher;
use crate::cli::config::{AppConfig, RunArgs, build_engine_settings};
use crate::documents::parse_json;
use crate::error::{JourneyError, Result};
use crate::journey::engine::{JourneyEngine, JourneyRequest, default_run_id};
use crate::journey::journey_model::JourneySource;
use crate::journey::result_model::{Issue, JourneyTestResult, LoginStatus, OverallStatus};
use crate::persona::persona_model::PersonaRecord;
use crate::persona::store::PersonaSource;
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;

// ============================================================================
// run subcommand
// ============================================================================

/// Run one journey. Input errors come back as `Err` before any browser is
/// launched; everything after that is encoded in the returned result.
pub fn cmd_run(args: &RunArgs, config: &AppConfig) -> Result<JourneyTestResult> {
    let request = build_request(args, config)?;
    let settings = build_engine_settings(config, args);
    let launcher = NodeLauncher::new(&config.browser.node_binary, &config.browser.driver_script);

    let result = JourneyEngine::new(&launcher, settings).run(&request);

    eprint!("{}", format_console_report(&result));

    if let Some(path) = &args.output {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => write_artifact(path, &json, "result"),
            Err(e) => warn!(error = %e, "could not serialize result for --output"),
        }
    }
    if let Some(path) = &args.junit {
        write_artifact(path, &generate_junit_xml(&result), "JUnit report");
    }

    Ok(result)
}

/// Validate the invocation and turn it into a `JourneyRequest`.
pub fn build_request(args: &RunArgs, config: &AppConfig) -> Result<JourneyRequest> {
    let session = required(&args.session, "--session")?;
    let journey = required(&args.journey, "--journey")?;
    let persona = required(&args.persona, "--persona")?;
    let base_url = required(&args.base_url, "--base-url")?;

    let mut request = JourneyRequest::new(session, journey, persona, base_url);

    request.journey = if let Some(json) = &args.journey_json {
        JourneySource::from_json(json).map_err(as_input_error)?
    } else if let Some(path) = &args.journey_file {
        JourneySource::File(PathBuf::from(path))
    } else {
        JourneySource::Store {
            dir: PathBuf::from(
                args.journeys_dir
                    .as_deref()
                    .unwrap_or(&config.run.journeys_dir),
            ),
        }
    };

    request.persona = if let Some(json) = &args.persona_json {
        let record: PersonaRecord = parse_json(json, "inline persona").map_err(as_input_error)?;
        PersonaSource::Inline(record)
    } else if let Some(path) = &args.persona_file {
        PersonaSource::File(PathBuf::from(path))
    } else {
        PersonaSource::Store {
            dir: PathBuf::from(
                args.personas_dir
                    .as_deref()
                    .unwrap_or(&config.run.personas_dir),
            ),
        }
    };

    if let Some(run_id) = args.run_id.as_deref().filter(|r| !r.trim().is_empty()) {
        request.run_id = run_id.to_string();
    }

    let timeout_ms = args.timeout_ms.unwrap_or(config.run.base_timeout_ms);
    if timeout_ms == 0 {
        return Err(JourneyError::InvalidInput("--timeout-ms must be positive".into()));
    }
    request.base_timeout = Duration::from_millis(timeout_ms);

    info!(run_id = %request.run_id, "journey request validated");
    Ok(request)
}

/// Run `run`, turning a panic into a failing fallback result. The browser
/// owned by the run is released while the panic unwinds.
pub fn run_guarded<F>(args: &RunArgs, run: F) -> Result<JourneyTestResult>
where
    F: FnOnce() -> Result<JourneyTestResult>,
{
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(outcome) => outcome,
        Err(panic) => {
            let message = panic_message(&*panic);
            error!(%message, "journey run aborted unexpectedly");
            Ok(fallback_result(args, &message))
        }
    }
}

/// The minimal result printed when a run dies in an unexpected way, so
/// callers still get parseable output.
pub fn fallback_result(args: &RunArgs, message: &str) -> JourneyTestResult {
    let base_url = args.base_url.clone().unwrap_or_default();
    JourneyTestResult {
        journey_id: args.journey.clone().unwrap_or_default(),
        persona_id: args.persona.clone().unwrap_or_default(),
        base_url: base_url.clone(),
        run_id: args.run_id.clone().unwrap_or_else(default_run_id),
        overall_status: OverallStatus::Fail,
        login_status: LoginStatus::Skip,
        login_notes: "Login not attempted".to_string(),
        steps_passed: 0,
        steps_failed: 0,
        steps_skipped: 0,
        step_results: Vec::new(),
        issues_found: vec![Issue {
            step_number: 0,
            step_name: "Setup".to_string(),
            description: message.to_string(),
            url: base_url,
        }],
        screenshots_count: 0,
        executed_at: Utc::now(),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn required<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| JourneyError::InvalidInput(format!("missing required {}", flag)))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "journey run panicked".to_string())
}

fn as_input_error(e: JourneyError) -> JourneyError {
    JourneyError::InvalidInput(e.to_string())
}

fn write_artifact(path: &str, content: &str, what: &str) {
    match std::fs::write(path, content) {
        Ok(()) => info!(path, "wrote {}", what),
        Err(e) => warn!(path, error = %e, "could not write {}", what),
    }
}
