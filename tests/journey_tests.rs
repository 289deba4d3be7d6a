use std::fs;

use journey_runner::error::JourneyError;
use journey_runner::journey::aggregator::{StepCounts, overall_status};
use journey_runner::journey::intent::{IntentPolicy, KeywordIntentPolicy, StepIntent, quoted_label};
use journey_runner::journey::journey_model::{
    JourneySource, JourneyStep, normalize_steps, resolve_steps,
};
use journey_runner::journey::result_model::{
    LoginStatus, OverallStatus, StepResult, StepStatus,
};

// =========================================================================
// Journey documents
// =========================================================================

#[test]
fn steps_parse_from_camel_case_json() {
    let source = JourneySource::from_json(
        r#"[
            {"stepNumber": 1, "stepName": "Open cart", "uiPageRoute": "/cart",
             "userAction": "Click \"Checkout\"", "uiComponentName": "checkout"},
            {"stepName": "Coupon", "userAction": "Enter coupon", "testValue": "SAVE10"}
        ]"#,
    )
    .unwrap();

    let steps = resolve_steps(&source, "checkout").unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].ui_page_route.as_deref(), Some("/cart"));
    assert_eq!(steps[0].ui_component_name.as_deref(), Some("checkout"));
    assert_eq!(steps[1].step_number, Some(2));
    assert_eq!(steps[1].test_value.as_deref(), Some("SAVE10"));
}

#[test]
fn journey_object_with_steps_is_accepted() {
    let source = JourneySource::from_json(
        r#"{"id": "signup", "name": "Sign up", "steps": [{"stepName": "Start"}]}"#,
    )
    .unwrap();
    let steps = resolve_steps(&source, "signup").unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].step_name, "Start");
}

#[test]
fn inline_json_that_is_not_a_journey_is_rejected() {
    let err = JourneySource::from_json(r#"{"name": "no steps here"}"#).unwrap_err();
    assert!(matches!(err, JourneyError::Parse { .. }));
}

#[test]
fn normalize_fills_missing_numbers_and_names() {
    let steps = normalize_steps(vec![
        JourneyStep::default(),
        JourneyStep {
            step_number: Some(0),
            step_name: "Zero".into(),
            ..Default::default()
        },
        JourneyStep {
            step_number: Some(7),
            ..Default::default()
        },
    ]);

    let numbers: Vec<Option<u32>> = steps.iter().map(|s| s.step_number).collect();
    assert_eq!(numbers, vec![Some(1), Some(2), Some(7)]);
    assert_eq!(steps[0].step_name, "Step 1");
    assert_eq!(steps[1].step_name, "Zero");
    assert_eq!(steps[2].step_name, "Step 7");
}

#[test]
fn journey_store_reads_yaml_by_id() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("onboarding.yaml"),
        "steps:\n  - stepName: Welcome\n    userAction: Click \"Get started\"\n",
    )
    .unwrap();

    let source = JourneySource::Store {
        dir: dir.path().to_path_buf(),
    };
    let steps = resolve_steps(&source, "onboarding").unwrap();
    assert_eq!(steps[0].user_action.as_deref(), Some("Click \"Get started\""));
    assert_eq!(steps[0].step_number, Some(1));
}

#[test]
fn missing_journey_is_journey_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let source = JourneySource::Store {
        dir: dir.path().to_path_buf(),
    };
    let err = resolve_steps(&source, "nowhere").unwrap_err();
    assert!(matches!(err, JourneyError::JourneyNotFound { .. }));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn journey_file_may_be_a_bare_json_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("j.json");
    fs::write(&path, r#"[{"stepName": "A"}, {"stepName": "B"}]"#).unwrap();

    let steps = resolve_steps(&JourneySource::File(path), "ignored").unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].step_number, Some(2));
}

// =========================================================================
// Intent classification
// =========================================================================

#[test]
fn keyword_policy_recognises_click_and_fill() {
    let policy = KeywordIntentPolicy;
    assert_eq!(policy.classify("Click 'Submit'"), StepIntent::Click);
    assert_eq!(policy.classify("CLICK the logo"), StepIntent::Click);
    assert_eq!(policy.classify("Fill in the form"), StepIntent::Fill);
    assert_eq!(policy.classify("Enter your postcode"), StepIntent::Fill);
    assert_eq!(policy.classify("Type a message"), StepIntent::Fill);
    assert_eq!(policy.classify("Scroll to the footer"), StepIntent::None);
}

#[test]
fn click_wins_when_several_keywords_appear() {
    let policy = KeywordIntentPolicy;
    assert_eq!(policy.classify("Type the name, then click Save"), StepIntent::Click);
}

#[test]
fn quoted_label_takes_first_double_quoted_text() {
    assert_eq!(quoted_label(r#"Click "Add to cart" then "Pay""#), Some("Add to cart"));
    assert_eq!(quoted_label("Click 'Submit'"), None);
    assert_eq!(quoted_label(r#"Click "" please"#), None);
    assert_eq!(quoted_label(r#"Click "unterminated"#), None);
}

// =========================================================================
// Aggregation
// =========================================================================

fn counts(passed: usize, failed: usize) -> StepCounts {
    StepCounts {
        passed,
        failed,
        skipped: 0,
    }
}

#[test]
fn setup_failure_dominates_everything() {
    assert_eq!(overall_status(true, LoginStatus::Pass, counts(3, 0)), OverallStatus::Fail);
}

#[test]
fn mixed_steps_are_partial_even_after_failed_login() {
    assert_eq!(overall_status(false, LoginStatus::Fail, counts(2, 1)), OverallStatus::Partial);
}

#[test]
fn all_steps_failed_is_fail() {
    assert_eq!(overall_status(false, LoginStatus::Skip, counts(0, 2)), OverallStatus::Fail);
}

#[test]
fn failed_login_outweighs_clean_steps() {
    assert_eq!(overall_status(false, LoginStatus::Fail, counts(4, 0)), OverallStatus::Fail);
}

#[test]
fn clean_run_passes() {
    assert_eq!(overall_status(false, LoginStatus::Skip, counts(4, 0)), OverallStatus::Pass);
    assert_eq!(overall_status(false, LoginStatus::Pass, counts(1, 0)), OverallStatus::Pass);
}

#[test]
fn aggregation_is_idempotent() {
    for setup in [false, true] {
        for login in [LoginStatus::Pass, LoginStatus::Fail, LoginStatus::Skip] {
            for c in [counts(0, 0), counts(1, 0), counts(0, 1), counts(2, 3)] {
                assert_eq!(overall_status(setup, login, c), overall_status(setup, login, c));
            }
        }
    }
}

#[test]
fn tally_counts_each_status() {
    let results = vec![
        StepResult::pending(1, "a").pass("ok"),
        StepResult::pending(2, "b").fail("boom"),
        StepResult::pending(3, "c").pass("ok"),
        StepResult::pending(4, "d"),
    ];
    let tally = StepCounts::tally(&results);
    assert_eq!(tally, StepCounts { passed: 2, failed: 1, skipped: 1 });
    assert_eq!(results[3].status, StepStatus::Pending);
}
