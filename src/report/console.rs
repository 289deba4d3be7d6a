use crate::journey::result_model::{JourneyTestResult, LoginStatus, OverallStatus, StepStatus};

// ============================================================================
// Console reporter: human-readable run summary
// ============================================================================

/// Format a journey result for the terminal.
///
/// Produces output like:
/// ```text
/// === Journey: checkout (persona: bargain-hunter, run 20261016-142501) ===
///
/// Login: SKIP  No login form detected; continuing unauthenticated
///
/// ✓ PASS  1. Open cart — Completed; now at https://shop.test/cart
/// ✗ FAIL  2. Apply coupon — Element 'coupon' not found
///
/// Issues:
///     [step 2] Element 'coupon' not found (https://shop.test/cart)
///
/// === Result: PARTIAL — 1 passed, 1 failed, 3 screenshots ===
/// ```
pub fn format_console_report(result: &JourneyTestResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Journey: {} (persona: {}, run {}) ===\n\n",
        result.journey_id, result.persona_id, result.run_id
    ));

    out.push_str(&format!(
        "Login: {}  {}\n\n",
        login_label(result.login_status),
        result.login_notes
    ));

    for step in &result.step_results {
        let marker = match step.status {
            StepStatus::Pass => "\u{2713} PASS",
            StepStatus::Fail => "\u{2717} FAIL",
            StepStatus::Pending => "- SKIP",
        };
        out.push_str(&format!(
            "{}  {}. {} \u{2014} {}\n",
            marker, step.step_number, step.step_name, step.observation
        ));
    }

    if !result.issues_found.is_empty() {
        out.push_str("\nIssues:\n");
        for issue in &result.issues_found {
            let scope = if issue.step_number == 0 {
                "setup".to_string()
            } else {
                format!("step {}", issue.step_number)
            };
            out.push_str(&format!(
                "    [{}] {} ({})\n",
                scope, issue.description, issue.url
            ));
        }
    }

    out.push_str(&format!(
        "\n=== Result: {} \u{2014} {} passed, {} failed, {} screenshots ===\n",
        status_label(result.overall_status),
        result.steps_passed,
        result.steps_failed,
        result.screenshots_count
    ));

    out
}

fn status_label(status: OverallStatus) -> &'static str {
    match status {
        OverallStatus::Pass => "PASS",
        OverallStatus::Partial => "PARTIAL",
        OverallStatus::Fail => "FAIL",
    }
}

fn login_label(status: LoginStatus) -> &'static str {
    match status {
        LoginStatus::Pass => "PASS",
        LoginStatus::Fail => "FAIL",
        LoginStatus::Skip => "SKIP",
    }
}
