use crate::journey::result_model::{JourneyTestResult, LoginStatus, StepStatus};

// ============================================================================
// JUnit XML reporter: standard CI integration format
// ============================================================================

/// Generate a JUnit XML report for one journey run.
///
/// One `<testcase>` per step, plus a `login` case when login failed and a
/// `setup` case when the run never reached its steps:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="checkout [bargain-hunter]" tests="2" failures="1" timestamp="...">
///   <testcase name="1. Open cart" classname="journey-runner.checkout" />
///   <testcase name="2. Apply coupon" classname="journey-runner.checkout">
///     <failure message="Element 'coupon' not found" type="StepFailure">https://shop.test/cart</failure>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(result: &JourneyTestResult) -> String {
    let classname = format!("journey-runner.{}", result.journey_id);
    let mut cases = String::new();
    let mut tests = 0;
    let mut failures = 0;

    for issue in result.setup_issues() {
        tests += 1;
        failures += 1;
        cases.push_str(&failed_case("setup", &classname, &issue.description, "SetupFailure", &issue.url));
    }

    if result.login_status == LoginStatus::Fail {
        tests += 1;
        failures += 1;
        cases.push_str(&failed_case("login", &classname, &result.login_notes, "LoginFailure", &result.base_url));
    }

    // Step issues follow the setup issues, one per failed step, in step order.
    let mut step_issues = result.issues_found.iter().filter(|i| i.step_number != 0);

    for step in &result.step_results {
        tests += 1;
        let name = format!("{}. {}", step.step_number, step.step_name);
        match step.status {
            StepStatus::Fail => {
                failures += 1;
                let url = step_issues
                    .next()
                    .filter(|i| i.step_number == step.step_number)
                    .map(|i| i.url.as_str())
                    .unwrap_or("");
                cases.push_str(&failed_case(&name, &classname, &step.observation, "StepFailure", url));
            }
            StepStatus::Pending => {
                cases.push_str(&format!(
                    "  <testcase name=\"{}\" classname=\"{}\">\n    <skipped />\n  </testcase>\n",
                    escape_xml(&name),
                    escape_xml(&classname)
                ));
            }
            StepStatus::Pass => {
                cases.push_str(&format!(
                    "  <testcase name=\"{}\" classname=\"{}\" />\n",
                    escape_xml(&name),
                    escape_xml(&classname)
                ));
            }
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" timestamp=\"{timestamp}\">\n{cases}</testsuite>\n",
        name = escape_xml(&format!("{} [{}]", result.journey_id, result.persona_id)),
        tests = tests,
        failures = failures,
        timestamp = result.executed_at.to_rfc3339(),
        cases = cases,
    )
}

fn failed_case(name: &str, classname: &str, message: &str, kind: &str, body: &str) -> String {
    format!(
        "  <testcase name=\"{name}\" classname=\"{classname}\">\n    <failure message=\"{message}\" type=\"{kind}\">{body}</failure>\n  </testcase>\n",
        name = escape_xml(name),
        classname = escape_xml(classname),
        message = escape_xml(message),
        kind = kind,
        body = escape_xml(body),
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
