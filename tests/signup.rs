//! Full-workflow tests against the simulated sign-up page
//!
//! All tests run on the paused tokio clock, so polling waits complete
//! instantly and observed timings are exact.

use std::time::Duration;

use test_case::test_case;

use signup_e2e::page::selectors::REGISTRANT_ITEM;
use signup_e2e::{
    HarnessError, Page, Registrant, SimConfig, SimPage, WorkflowDriver, WorkflowState,
};

fn quiet_page() -> SimPage {
    // No jitter: delays are exactly the configured base values
    SimPage::new(SimConfig {
        max_jitter: Duration::ZERO,
        ..Default::default()
    })
}

#[tokio::test(start_paused = true)]
async fn adds_person_to_course() {
    let mut driver = WorkflowDriver::new(quiet_page());

    driver.initialize(true).await.unwrap();
    assert_eq!(driver.state(), WorkflowState::Loaded);

    driver
        .fill_identity("Some Name", "some@email.com")
        .await
        .unwrap();
    assert_eq!(driver.state(), WorkflowState::FormFilled);

    driver.select_department("core").await.unwrap();
    assert_eq!(driver.state(), WorkflowState::DepartmentSelected);

    let options = driver.await_course_options("git-it").await.unwrap();
    assert_eq!(driver.state(), WorkflowState::CoursesReady);
    assert!(!options.is_empty());
    assert!(options.iter().any(|o| o == "git-it"));

    driver.select_course("git-it").await.unwrap();
    driver.submit().await.unwrap();
    driver.await_saved().await.unwrap();
    assert_eq!(driver.state(), WorkflowState::Saved);

    let expected = Registrant::new("Some Name", "some@email.com", "core", "git-it");
    driver.assert_registered(&expected).await.unwrap();
    assert_eq!(driver.state(), WorkflowState::Verified);

    // Exactly one matching entry rendered
    let entries = driver.page().item_texts(REGISTRANT_ITEM).await.unwrap();
    let matching = entries
        .iter()
        .filter(|e| *e == "Some Name - some@email.com - core - git-it")
        .count();
    assert_eq!(matching, 1, "expected one entry, saw {entries:?}");
}

#[test_case("Some Name", "some@email.com", "core", "git-it")]
#[test_case("Ada Lovelace", "ada@example.com", "electives", "tech-writing")]
#[test_case("Grace Hopper", "grace@example.com", "core", "node-fundamentals")]
#[tokio::test(start_paused = true)]
async fn run_registers_valid_tuple(name: &str, email: &str, department: &str, course: &str) {
    let registrant = Registrant::new(name, email, department, course);
    let mut driver = WorkflowDriver::new(quiet_page());

    let report = driver.run(&registrant, true).await;
    assert!(report.success, "workflow failed: {:?}", report.error);
    assert_eq!(report.steps.len(), 8);
    assert!(report.steps.iter().all(|s| s.success));

    let entries = driver.page().item_texts(REGISTRANT_ITEM).await.unwrap();
    assert_eq!(
        entries.iter().filter(|e| **e == registrant.to_string()).count(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn registrant_list_is_append_only_across_runs() {
    let mut driver = WorkflowDriver::new(quiet_page());

    let first = Registrant::new("Some Name", "some@email.com", "core", "git-it");
    let report = driver.run(&first, true).await;
    assert!(report.success, "first run failed: {:?}", report.error);

    // Second run reloads without clearing storage; the first entry persists
    let second = Registrant::new("Ada Lovelace", "ada@example.com", "electives", "tech-writing");
    let report = driver.run(&second, false).await;
    assert!(report.success, "second run failed: {:?}", report.error);

    let entries = driver.page().item_texts(REGISTRANT_ITEM).await.unwrap();
    assert!(entries.contains(&first.to_string()), "lost first entry: {entries:?}");
    assert!(entries.contains(&second.to_string()));
}

#[tokio::test(start_paused = true)]
async fn seeded_initialize_is_idempotent() {
    let mut driver = WorkflowDriver::new(quiet_page());

    // Leave a persisted registrant behind
    let registrant = Registrant::new("Some Name", "some@email.com", "core", "git-it");
    let report = driver.run(&registrant, true).await;
    assert!(report.success, "seed run failed: {:?}", report.error);

    driver.initialize(true).await.unwrap();
    assert_eq!(driver.state(), WorkflowState::Loaded);
    assert!(driver.page().item_texts(REGISTRANT_ITEM).await.unwrap().is_empty());

    driver.initialize(true).await.unwrap();
    assert_eq!(driver.state(), WorkflowState::Loaded);
    assert!(driver.page().item_texts(REGISTRANT_ITEM).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn out_of_order_steps_are_rejected() {
    let mut driver = WorkflowDriver::new(quiet_page());
    driver.initialize(true).await.unwrap();

    // CoursesReady was never reached
    let err = driver.select_course("git-it").await.unwrap_err();
    assert!(
        matches!(
            err,
            HarnessError::StepOrder {
                expected: WorkflowState::CoursesReady,
                ..
            }
        ),
        "unexpected error: {err}"
    );

    // No department selected yet either
    let err = driver.await_course_options("git-it").await.unwrap_err();
    assert!(matches!(err, HarnessError::StepOrder { .. }));

    // And submitting straight after load must fail
    let err = driver.submit().await.unwrap_err();
    assert!(matches!(err, HarnessError::StepOrder { .. }));

    // The failed calls did not move the state machine
    assert_eq!(driver.state(), WorkflowState::Loaded);
}
