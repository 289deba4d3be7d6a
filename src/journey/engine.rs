use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::browser::driver::{BrowserLauncher, LaunchOptions, LoadState};
use crate::error::Result;
use crate::journey::aggregator::{StepCounts, overall_status};
use crate::journey::context::RunContext;
use crate::journey::evidence::EvidenceCapturer;
use crate::journey::intent::{IntentPolicy, KeywordIntentPolicy};
use crate::journey::interpreter::{StepInterpreter, StepRun};
use crate::journey::journey_model::{JourneySource, JourneyStep, resolve_steps};
use crate::journey::login::attempt_login;
use crate::journey::result_model::{Issue, JourneyTestResult, LoginOutcome};
use crate::persona::persona_model::PersonaRecord;
use crate::persona::store::{PersonaSource, resolve_persona};
use crate::persona::timeout::{DEFAULT_BASE_TIMEOUT, effective_timeout};

/// Everything that identifies and parameterises one journey run.
#[derive(Debug, Clone)]
pub struct JourneyRequest {
    pub session_id: String,
    pub journey_id: String,
    pub persona_id: String,
    pub base_url: String,
    pub journey: JourneySource,
    pub persona: PersonaSource,
    pub run_id: String,
    pub base_timeout: Duration,
}

impl JourneyRequest {
    pub fn new(session_id: &str, journey_id: &str, persona_id: &str, base_url: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            journey_id: journey_id.to_string(),
            persona_id: persona_id.to_string(),
            base_url: base_url.to_string(),
            journey: JourneySource::Store {
                dir: PathBuf::from("journeys"),
            },
            persona: PersonaSource::Store {
                dir: PathBuf::from(".sessions"),
            },
            run_id: default_run_id(),
            base_timeout: DEFAULT_BASE_TIMEOUT,
        }
    }
}

/// Timestamp-derived run id, e.g. `20261016-142501`.
pub fn default_run_id() -> String {
    Utc::now().format("%Y%m%d-%H%M%S").to_string()
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Viewport, user agent and headless mode; the timeout is set per run
    pub launch: LaunchOptions,
    /// Screenshots land in `<screenshots_dir>/<run id>/`
    pub screenshots_dir: PathBuf,
    pub capture_before_steps: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            launch: LaunchOptions::default(),
            screenshots_dir: PathBuf::from("test-results/screenshots"),
            capture_before_steps: false,
        }
    }
}

/// Runs one journey for one persona in a browser it owns for the duration.
pub struct JourneyEngine<'l> {
    launcher: &'l dyn BrowserLauncher,
    settings: EngineSettings,
    policy: Box<dyn IntentPolicy>,
}

impl<'l> JourneyEngine<'l> {
    pub fn new(launcher: &'l dyn BrowserLauncher, settings: EngineSettings) -> Self {
        Self {
            launcher,
            settings,
            policy: Box::new(KeywordIntentPolicy),
        }
    }

    /// Swap the action classifier.
    pub fn with_policy(mut self, policy: Box<dyn IntentPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Run a journey. Every failure mode ends up in the returned result.
    pub fn run(&self, request: &JourneyRequest) -> JourneyTestResult {
        let report = ReportHeader::new(request);

        let persona = match resolve_persona(&request.persona, &request.session_id, &request.persona_id) {
            Ok(persona) => persona,
            Err(e) => return report.setup_failure(e.to_string(), &request.base_url, 0),
        };
        let steps = match resolve_steps(&request.journey, &request.journey_id) {
            Ok(steps) => steps,
            Err(e) => return report.setup_failure(e.to_string(), &request.base_url, 0),
        };

        let timeout = effective_timeout(request.base_timeout, persona.patience());
        info!(
            journey = %request.journey_id,
            persona = %persona.id,
            run_id = %request.run_id,
            timeout_ms = timeout.as_millis() as u64,
            steps = steps.len(),
            "starting journey run"
        );

        let launch = self.settings.launch.clone().with_timeout(timeout);
        let mut driver = match self.launcher.launch(&launch) {
            Ok(driver) => driver,
            Err(e) => return report.setup_failure(e.to_string(), &request.base_url, 0),
        };

        let evidence = EvidenceCapturer::new(&self.settings.screenshots_dir, &request.run_id);
        let mut ctx = RunContext::new(driver.as_mut(), evidence, timeout, &request.base_url);
        ctx.capture_before_steps = self.settings.capture_before_steps;

        let result = match self.drive(&mut ctx, &persona, &steps) {
            Ok((login, run)) => report.finish(login, run, None, ctx.evidence.count()),
            Err(e) => {
                warn!(error = %e, "journey run aborted");
                let url = ctx.url_or_unknown();
                ctx.capture("error");
                report.setup_failure(e.to_string(), &url, ctx.evidence.count())
            }
        };
        drop(ctx);

        if let Err(e) = driver.close() {
            warn!(error = %e, "browser teardown failed");
        }

        info!(
            status = ?result.overall_status,
            passed = result.steps_passed,
            failed = result.steps_failed,
            "journey run finished"
        );
        result
    }

    /// Open the base URL, log in if asked to, then run the steps.
    /// Only a failure to load the base URL escapes.
    fn drive(
        &self,
        ctx: &mut RunContext<'_>,
        persona: &PersonaRecord,
        steps: &[JourneyStep],
    ) -> Result<(LoginOutcome, StepRun)> {
        let base_url = ctx.base_url.clone();
        ctx.driver
            .navigate(&base_url, LoadState::NetworkIdle, ctx.timeout * 2)?;
        ctx.capture("00-initial");

        let login = attempt_login(ctx, persona);
        info!(status = ?login.status, notes = %login.notes, "login stage done");
        ctx.capture("01-after-login");

        let run = StepInterpreter::new(self.policy.as_ref()).run(ctx, steps);
        Ok((login, run))
    }
}

/// The identifying fields every result carries, fixed at the start of a run.
struct ReportHeader {
    journey_id: String,
    persona_id: String,
    base_url: String,
    run_id: String,
    executed_at: DateTime<Utc>,
}

impl ReportHeader {
    fn new(request: &JourneyRequest) -> Self {
        Self {
            journey_id: request.journey_id.clone(),
            persona_id: request.persona_id.clone(),
            base_url: request.base_url.clone(),
            run_id: request.run_id.clone(),
            executed_at: Utc::now(),
        }
    }

    fn setup_failure(self, message: String, url: &str, screenshots: usize) -> JourneyTestResult {
        warn!(error = %message, "journey setup failed");
        let issue = Issue {
            step_number: 0,
            step_name: "Setup".to_string(),
            description: message,
            url: url.to_string(),
        };
        let login = LoginOutcome::skip("Login not attempted: run failed during setup");
        self.finish(login, StepRun::default(), Some(issue), screenshots)
    }

    fn finish(
        self,
        login: LoginOutcome,
        run: StepRun,
        setup_issue: Option<Issue>,
        screenshots: usize,
    ) -> JourneyTestResult {
        let counts = StepCounts::tally(&run.results);
        let overall = overall_status(setup_issue.is_some(), login.status, counts);

        let mut issues: Vec<Issue> = setup_issue.into_iter().collect();
        issues.extend(run.issues);

        JourneyTestResult {
            journey_id: self.journey_id,
            persona_id: self.persona_id,
            base_url: self.base_url,
            run_id: self.run_id,
            overall_status: overall,
            login_status: login.status,
            login_notes: login.notes,
            steps_passed: counts.passed,
            steps_failed: counts.failed,
            steps_skipped: counts.skipped,
            step_results: run.results,
            issues_found: issues,
            screenshots_count: screenshots,
            executed_at: self.executed_at,
        }
    }
}
