use tracing::{debug, info, warn};

use crate::browser::driver::LoadState;
use crate::browser::locator::{Locator, LocatorChain};
use crate::error::Result;
use crate::journey::context::RunContext;
use crate::journey::evidence::step_shot_name;
use crate::journey::intent::{IntentPolicy, StepIntent, quoted_label};
use crate::journey::journey_model::JourneyStep;
use crate::journey::result_model::{Issue, StepResult};

/// Typed into the first field when a fill step carries no test value.
pub const PLACEHOLDER_FILL_VALUE: &str = "test input";

/// Step results and the issues raised by the failing ones, both in step order.
#[derive(Debug, Default)]
pub struct StepRun {
    pub results: Vec<StepResult>,
    pub issues: Vec<Issue>,
}

/// Executes journey steps one after another against the run's page.
pub struct StepInterpreter<'p> {
    policy: &'p dyn IntentPolicy,
}

impl<'p> StepInterpreter<'p> {
    pub fn new(policy: &'p dyn IntentPolicy) -> Self {
        Self { policy }
    }

    /// Run every step in order. A failed step is recorded and the next one
    /// runs against whatever the page looks like now.
    pub fn run(&self, ctx: &mut RunContext<'_>, steps: &[JourneyStep]) -> StepRun {
        if steps.is_empty() {
            return Self::page_loads_check(ctx);
        }

        let mut run = StepRun::default();
        for step in steps {
            let number = step.number();
            let pending = StepResult::pending(number, &step.step_name);

            if ctx.capture_before_steps {
                ctx.capture(&format!("{}-before", step_shot_name(number)));
            }

            let result = match self.execute(ctx, step) {
                Ok(url) => {
                    info!(step = number, name = %step.step_name, "step passed");
                    pending.pass(format!("Completed; now at {}", url))
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(step = number, name = %step.step_name, error = %message, "step failed");
                    run.issues.push(Issue {
                        step_number: number,
                        step_name: step.step_name.clone(),
                        description: message.clone(),
                        url: ctx.url_or_unknown(),
                    });
                    pending.fail(message)
                }
            };
            run.results.push(result);

            ctx.capture(&step_shot_name(number));
        }
        run
    }

    /// Navigate, interact, wait for the DOM; returns the resulting URL.
    fn execute(&self, ctx: &mut RunContext<'_>, step: &JourneyStep) -> Result<String> {
        if let Some(route) = step.ui_page_route.as_deref().filter(|r| !r.is_empty()) {
            let current = ctx.driver.current_url()?;
            if !current.contains(route) {
                let target = ctx.route_url(route);
                debug!(%target, "navigating to step route");
                ctx.driver.navigate(&target, LoadState::NetworkIdle, ctx.timeout)?;
            }
        }

        if let Some(action) = step.user_action.as_deref() {
            match self.policy.classify(action) {
                StepIntent::Click => Self::click(ctx, step, action)?,
                StepIntent::Fill => Self::fill(ctx, step)?,
                StepIntent::None => debug!(action, "no recognised intent; nothing to do"),
            }
        }

        ctx.driver
            .wait_for_load_state(LoadState::DomContentLoaded, ctx.timeout)?;
        ctx.driver.current_url()
    }

    /// Click the best match for the step's label. Nothing to click is not an error.
    fn click(ctx: &mut RunContext<'_>, step: &JourneyStep, action: &str) -> Result<()> {
        let label = step
            .ui_component_name
            .as_deref()
            .filter(|l| !l.is_empty())
            .or_else(|| quoted_label(action));

        let Some(label) = label else {
            debug!(action, "click step names no target");
            return Ok(());
        };

        let Some(target) = LocatorChain::clickable(label).resolve(&mut *ctx.driver)? else {
            debug!(label, "no element matches click target");
            return Ok(());
        };

        ctx.driver.click(&target)?;

        // The click itself is what counts; a page that never goes idle is fine.
        if let Err(e) = ctx
            .driver
            .wait_for_load_state(LoadState::NetworkIdle, ctx.timeout / 2)
        {
            debug!(error = %e, "network did not settle after click");
        }
        Ok(())
    }

    fn fill(ctx: &mut RunContext<'_>, step: &JourneyStep) -> Result<()> {
        let value = step
            .test_value
            .as_deref()
            .unwrap_or(PLACEHOLDER_FILL_VALUE);
        ctx.driver.fill(&Locator::css("input, textarea"), value)
    }

    /// With no scripted steps, reading the title proves the target loads.
    fn page_loads_check(ctx: &mut RunContext<'_>) -> StepRun {
        let pending = StepResult::pending(1, "Page loads");
        let mut run = StepRun::default();

        let result = match ctx.driver.title() {
            Ok(title) => pending.pass(format!("Page title read successfully: \"{}\"", title)),
            Err(e) => {
                let message = e.to_string();
                run.issues.push(Issue {
                    step_number: 1,
                    step_name: "Page loads".to_string(),
                    description: message.clone(),
                    url: ctx.url_or_unknown(),
                });
                pending.fail(message)
            }
        };
        run.results.push(result);
        run
    }
}
