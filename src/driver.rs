//! Workflow driver: executes the sign-up flow and fails loudly on deviation

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::page::selectors::{
    COURSE_SELECT, DEPARTMENT_SELECT, EMAIL_INPUT, LOADING_INDICATOR, NAME_INPUT, REGISTRANT_ITEM,
    SUBMIT_CONTROL,
};
use crate::page::{LoadOptions, Page, SUBMIT_SAVED, SUBMIT_SAVING};

/// Seed injected by `initialize(true)`. The page under test stubs its
/// randomness source with this value, so delay jitter is reproducible.
pub const DEFAULT_SEED: u64 = 0;

/// The person record submitted through the form. Immutable once submitted;
/// the rendered list entry is exactly the `Display` rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    pub name: String,
    pub email: String,
    pub department: String,
    pub course: String,
}

impl Registrant {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
        course: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            department: department.into(),
            course: course.into(),
        }
    }
}

impl fmt::Display for Registrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}",
            self.name, self.email, self.department, self.course
        )
    }
}

/// Workflow progress. Every driver call corresponds to exactly one arrow;
/// no transition may be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    Idle,
    Loaded,
    FormFilled,
    DepartmentSelected,
    CoursesReady,
    CourseSelected,
    Submitted,
    Saved,
    Verified,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Idle => "Idle",
            WorkflowState::Loaded => "Loaded",
            WorkflowState::FormFilled => "FormFilled",
            WorkflowState::DepartmentSelected => "DepartmentSelected",
            WorkflowState::CoursesReady => "CoursesReady",
            WorkflowState::CourseSelected => "CourseSelected",
            WorkflowState::Submitted => "Submitted",
            WorkflowState::Saved => "Saved",
            WorkflowState::Verified => "Verified",
        };
        f.write_str(name)
    }
}

/// Outcome of a single driver call within a full run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub step: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Outcome of running the whole workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReport {
    pub registrant: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepReport>,
    pub error: Option<String>,
}

impl WorkflowReport {
    /// Write the report as pretty JSON
    pub fn write_json(&self, path: &Path) -> HarnessResult<PathBuf> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(path.to_path_buf())
    }
}

/// Drives one sign-up workflow against one page instance.
///
/// All asynchronous page behavior (course population, save completion, list
/// rendering) is observed through bounded-timeout polling; a timeout cancels
/// only the current wait and surfaces a typed error. The driver never
/// retries a failed step.
pub struct WorkflowDriver<P: Page> {
    page: P,
    config: HarnessConfig,
    state: WorkflowState,
}

impl<P: Page> WorkflowDriver<P> {
    /// Create a driver with default timeouts
    pub fn new(page: P) -> Self {
        Self::with_config(page, HarnessConfig::default())
    }

    /// Create a driver with custom timeouts
    pub fn with_config(page: P, config: HarnessConfig) -> Self {
        Self {
            page,
            config,
            state: WorkflowState::Idle,
        }
    }

    /// Current position in the workflow state machine
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Navigate to the application entry point and wait until the form is
    /// fully interactive.
    ///
    /// With `seed_deterministic` the page's randomness source is fixed to
    /// [`DEFAULT_SEED`] and persisted client-side state is cleared before
    /// load. May be called from any state; resets the workflow to `Loaded`.
    pub async fn initialize(&mut self, seed_deterministic: bool) -> HarnessResult<()> {
        self.state = WorkflowState::Idle;

        let opts = LoadOptions {
            seed: seed_deterministic.then_some(DEFAULT_SEED),
            clear_storage: seed_deterministic,
        };
        self.page.goto(&opts).await?;

        let start = Instant::now();
        loop {
            if self.form_interactive().await? {
                break;
            }
            let elapsed = start.elapsed();
            if elapsed >= self.config.load_timeout() {
                return Err(HarnessError::LoadTimeout { elapsed });
            }
            sleep(self.config.poll_interval()).await;
        }

        debug!("form interactive after {:?}", start.elapsed());
        self.state = WorkflowState::Loaded;
        Ok(())
    }

    /// Interactive marker: loading indicator gone (when configured) and all
    /// required controls present and enabled. The course select is excluded;
    /// it only appears once a department triggers the async load.
    async fn form_interactive(&self) -> HarnessResult<bool> {
        if self.config.wait_for_loading_indicator && self.page.exists(LOADING_INDICATOR).await? {
            return Ok(false);
        }
        for selector in [NAME_INPUT, EMAIL_INPUT, DEPARTMENT_SELECT, SUBMIT_CONTROL] {
            if !self.page.exists(selector).await? || !self.page.is_enabled(selector).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Focus and fill the name and email inputs with literal text
    pub async fn fill_identity(&mut self, name: &str, email: &str) -> HarnessResult<()> {
        self.require("fill_identity", WorkflowState::Loaded)?;

        for (selector, text) in [(NAME_INPUT, name), (EMAIL_INPUT, email)] {
            if !self.page.exists(selector).await? {
                return Err(HarnessError::ElementNotFound(selector.to_string()));
            }
            self.page.click(selector).await?;
            self.page.type_text(selector, text).await?;
        }

        self.state = WorkflowState::FormFilled;
        Ok(())
    }

    /// Set the department selector. Side effect on the page: triggers the
    /// asynchronous course load (opaque latency).
    pub async fn select_department(&mut self, department: &str) -> HarnessResult<()> {
        self.require("select_department", WorkflowState::FormFilled)?;

        if !self.page.exists(DEPARTMENT_SELECT).await? {
            return Err(HarnessError::ElementNotFound(DEPARTMENT_SELECT.to_string()));
        }
        self.page.select_value(DEPARTMENT_SELECT, department).await?;

        self.state = WorkflowState::DepartmentSelected;
        Ok(())
    }

    /// Poll the course selector until it holds at least one option and
    /// `expected_course` is among them, re-reading the options on every
    /// attempt. Returns the full option list observed on success.
    pub async fn await_course_options(
        &mut self,
        expected_course: &str,
    ) -> HarnessResult<Vec<String>> {
        self.require("await_course_options", WorkflowState::DepartmentSelected)?;

        let start = Instant::now();
        loop {
            // Fresh snapshot per attempt; the select itself may not exist yet
            if self.page.exists(COURSE_SELECT).await? {
                let options = self.page.option_values(COURSE_SELECT).await?;
                if !options.is_empty() && options.iter().any(|o| o == expected_course) {
                    debug!(
                        "course '{}' available after {:?} ({} options)",
                        expected_course,
                        start.elapsed(),
                        options.len()
                    );
                    self.state = WorkflowState::CoursesReady;
                    return Ok(options);
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= self.config.course_timeout() {
                return Err(HarnessError::Timeout {
                    context: format!("course option '{expected_course}'"),
                    elapsed,
                });
            }
            sleep(self.config.poll_interval()).await;
        }
    }

    /// Set the course selector to the given value. Should be unreachable
    /// with a missing option when `await_course_options` succeeded first.
    pub async fn select_course(&mut self, course: &str) -> HarnessResult<()> {
        self.require("select_course", WorkflowState::CoursesReady)?;

        if !self.page.exists(COURSE_SELECT).await? {
            return Err(HarnessError::ElementNotFound(COURSE_SELECT.to_string()));
        }
        let options = self.page.option_values(COURSE_SELECT).await?;
        if !options.iter().any(|o| o == course) {
            return Err(HarnessError::ValueNotAvailable {
                selector: COURSE_SELECT.to_string(),
                value: course.to_string(),
            });
        }
        self.page.select_value(COURSE_SELECT, course).await?;

        self.state = WorkflowState::CourseSelected;
        Ok(())
    }

    /// Trigger form submission. Does not wait for completion.
    pub async fn submit(&mut self) -> HarnessResult<()> {
        self.require("submit", WorkflowState::CourseSelected)?;

        if !self.page.exists(SUBMIT_CONTROL).await? {
            return Err(HarnessError::ElementNotFound(SUBMIT_CONTROL.to_string()));
        }
        self.page.click(SUBMIT_CONTROL).await?;

        self.state = WorkflowState::Submitted;
        Ok(())
    }

    /// Poll the submit control until its value is exactly the completion
    /// literal. The transient `Saving...` value must keep the wait going:
    /// matching on "anything but the idle label" would accept it too.
    pub async fn await_saved(&mut self) -> HarnessResult<()> {
        self.require("await_saved", WorkflowState::Submitted)?;

        let start = Instant::now();
        loop {
            let label = self.page.control_value(SUBMIT_CONTROL).await?;
            if label == SUBMIT_SAVED {
                debug!("save completed after {:?}", start.elapsed());
                self.state = WorkflowState::Saved;
                return Ok(());
            }
            if label == SUBMIT_SAVING {
                debug!("save still in flight");
            }

            let elapsed = start.elapsed();
            if elapsed >= self.config.save_timeout() {
                return Err(HarnessError::Timeout {
                    context: format!("save completion (last label {label:?})"),
                    elapsed,
                });
            }
            sleep(self.config.poll_interval()).await;
        }
    }

    /// Poll the rendered registrant list until an entry matching the
    /// expected formatted string is present
    pub async fn assert_registered(&mut self, expected: &Registrant) -> HarnessResult<()> {
        self.require("assert_registered", WorkflowState::Saved)?;

        let wanted = expected.to_string();
        let start = Instant::now();
        let mut last_seen: Vec<String>;
        loop {
            last_seen = self.page.item_texts(REGISTRANT_ITEM).await?;
            if last_seen.iter().any(|entry| entry == &wanted) {
                info!("registrant verified: {}", wanted);
                self.state = WorkflowState::Verified;
                return Ok(());
            }

            if start.elapsed() >= self.config.verify_timeout() {
                return Err(HarnessError::AssertionFailure {
                    expected: wanted,
                    actual: last_seen.join(" | "),
                });
            }
            sleep(self.config.poll_interval()).await;
        }
    }

    /// Execute the whole workflow for one registrant, stopping at the first
    /// failing step. Per-step durations land in the returned report; the
    /// report is diagnostic output, not a retry mechanism.
    pub async fn run(&mut self, registrant: &Registrant, seed_deterministic: bool) -> WorkflowReport {
        let run_start = Instant::now();
        let mut report = WorkflowReport {
            registrant: registrant.to_string(),
            success: true,
            duration_ms: 0,
            steps: Vec::new(),
            error: None,
        };

        macro_rules! step {
            ($name:literal, $call:expr) => {{
                let started = Instant::now();
                let result = $call.await;
                let duration_ms = started.elapsed().as_millis() as u64;
                match result {
                    Ok(_) => {
                        debug!("step {} ok ({} ms)", $name, duration_ms);
                        report.steps.push(StepReport {
                            step: $name.to_string(),
                            success: true,
                            duration_ms,
                            error: None,
                        });
                    }
                    Err(e) => {
                        let message = e.to_string();
                        report.steps.push(StepReport {
                            step: $name.to_string(),
                            success: false,
                            duration_ms,
                            error: Some(message.clone()),
                        });
                        report.success = false;
                        report.error = Some(message);
                        report.duration_ms = run_start.elapsed().as_millis() as u64;
                        return report;
                    }
                }
            }};
        }

        step!("initialize", self.initialize(seed_deterministic));
        step!(
            "fill_identity",
            self.fill_identity(&registrant.name, &registrant.email)
        );
        step!(
            "select_department",
            self.select_department(&registrant.department)
        );
        step!(
            "await_course_options",
            self.await_course_options(&registrant.course)
        );
        step!("select_course", self.select_course(&registrant.course));
        step!("submit", self.submit());
        step!("await_saved", self.await_saved());
        step!("assert_registered", self.assert_registered(registrant));

        report.duration_ms = run_start.elapsed().as_millis() as u64;
        report
    }

    fn require(&self, step: &'static str, expected: WorkflowState) -> HarnessResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(HarnessError::StepOrder {
                step,
                expected,
                actual: self.state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrant_list_format() {
        let r = Registrant::new("Some Name", "some@email.com", "core", "git-it");
        assert_eq!(r.to_string(), "Some Name - some@email.com - core - git-it");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(WorkflowState::CoursesReady.to_string(), "CoursesReady");
        assert_eq!(WorkflowState::Saved.to_string(), "Saved");
    }
}
