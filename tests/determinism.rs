//! Seeded runs must reproduce observed timing exactly

use signup_e2e::{Registrant, SimConfig, SimPage, WorkflowDriver};

/// Runs the full workflow on a fresh simulated page with jitter enabled and
/// returns the observed per-step timings.
async fn timed_run(registrant: &Registrant) -> Vec<(String, u64)> {
    // Default SimConfig keeps its random jitter; the seed is what pins it
    let mut driver = WorkflowDriver::new(SimPage::new(SimConfig::default()));
    let report = driver.run(registrant, true).await;
    assert!(report.success, "workflow failed: {:?}", report.error);
    report
        .steps
        .into_iter()
        .map(|s| (s.step, s.duration_ms))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn identical_seeds_reproduce_identical_timings() {
    let registrant = Registrant::new("Some Name", "some@email.com", "core", "git-it");

    let first = timed_run(&registrant).await;
    let second = timed_run(&registrant).await;

    assert_eq!(
        first, second,
        "two seeded runs observed different step timings"
    );

    // The jittered waits actually took time; this is not a degenerate run
    let course_wait = first
        .iter()
        .find(|(step, _)| step == "await_course_options")
        .map(|(_, ms)| *ms)
        .unwrap();
    assert!(course_wait > 0);
}
