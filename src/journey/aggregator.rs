use crate::journey::result_model::{LoginStatus, OverallStatus, StepResult, StepStatus};

/// Step outcome tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl StepCounts {
    pub fn tally(results: &[StepResult]) -> Self {
        results
            .iter()
            .fold(StepCounts::default(), |mut counts, r| {
                match r.status {
                    StepStatus::Pass => counts.passed += 1,
                    StepStatus::Fail => counts.failed += 1,
                    StepStatus::Pending => counts.skipped += 1,
                }
                counts
            })
    }
}

/// Fold setup, step and login outcomes into the verdict.
///
/// Priority: setup failure, then step failures (partial when something
/// passed), then a failed login, then pass.
pub fn overall_status(setup_failed: bool, login: LoginStatus, counts: StepCounts) -> OverallStatus {
    if setup_failed {
        return OverallStatus::Fail;
    }
    if counts.failed > 0 {
        return if counts.passed > 0 {
            OverallStatus::Partial
        } else {
            OverallStatus::Fail
        };
    }
    if login == LoginStatus::Fail {
        return OverallStatus::Fail;
    }
    OverallStatus::Pass
}
