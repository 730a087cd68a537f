//! Deterministic in-process stand-in for the sign-up page
//!
//! The integration tests need a page to drive without a browser. `SimPage`
//! reproduces the observable behavior of the application under test: an
//! initial loading indicator, a course list that populates some time after
//! the department is chosen, a submit control whose value cycles
//! `Submit -> Saving... -> Saved!`, and a persisted registrant list.
//!
//! Every delay is a deadline relative to `tokio::time::Instant`, so nothing
//! runs in the background and the paused test clock makes runs exact.
//! Delay jitter comes from a `StdRng` seeded through
//! [`LoadOptions::seed`](crate::page::LoadOptions); an unseeded load draws
//! from entropy, which is what makes unseeded runs vary like a real network.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};
use crate::page::selectors::{
    COURSE_SELECT, DEPARTMENT_SELECT, EMAIL_INPUT, LOADING_INDICATOR, NAME_INPUT, REGISTRANT_ITEM,
    SUBMIT_CONTROL,
};
use crate::page::{LoadOptions, Page, SUBMIT_IDLE, SUBMIT_SAVED, SUBMIT_SAVING};

/// Latency profile and course catalog for the simulated page
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// How long the loading indicator stays up after navigation
    pub initial_load_delay: Duration,

    /// Base delay between department selection and course options appearing
    pub course_load_delay: Duration,

    /// Base delay between submit and save completion
    pub save_delay: Duration,

    /// Upper bound on the random extra delay added to the course load and
    /// the save (drawn per event from the seeded rng)
    pub max_jitter: Duration,

    /// Department value -> course option values
    pub catalog: BTreeMap<String, Vec<String>>,
}

impl Default for SimConfig {
    fn default() -> Self {
        let mut catalog = BTreeMap::new();
        catalog.insert(
            "core".to_string(),
            vec![
                "git-it".to_string(),
                "node-fundamentals".to_string(),
                "testing-basics".to_string(),
            ],
        );
        catalog.insert(
            "electives".to_string(),
            vec!["public-speaking".to_string(), "tech-writing".to_string()],
        );

        Self {
            initial_load_delay: Duration::from_millis(200),
            course_load_delay: Duration::from_millis(800),
            save_delay: Duration::from_millis(600),
            max_jitter: Duration::from_millis(400),
            catalog,
        }
    }
}

/// Simulated sign-up page
pub struct SimPage {
    config: SimConfig,
    rng: StdRng,

    interactive_at: Option<Instant>,
    storage: Vec<String>,

    name_value: String,
    email_value: String,
    department: Option<String>,
    course_options: Vec<String>,
    courses_ready_at: Option<Instant>,
    course: Option<String>,
    save_done_at: Option<Instant>,
    pending_entry: Option<String>,
}

impl SimPage {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
            interactive_at: None,
            storage: Vec::new(),
            name_value: String::new(),
            email_value: String::new(),
            department: None,
            course_options: Vec::new(),
            courses_ready_at: None,
            course: None,
            save_done_at: None,
            pending_entry: None,
        }
    }

    fn loaded(&self) -> bool {
        self.interactive_at
            .map(|at| Instant::now() >= at)
            .unwrap_or(false)
    }

    fn courses_loaded(&self) -> bool {
        self.courses_ready_at
            .map(|at| Instant::now() >= at)
            .unwrap_or(false)
    }

    fn save_completed(&self) -> bool {
        self.save_done_at
            .map(|at| Instant::now() >= at)
            .unwrap_or(false)
    }

    fn visible_entries(&self) -> Vec<String> {
        let mut entries = self.storage.clone();
        if self.save_completed() {
            if let Some(entry) = &self.pending_entry {
                entries.push(entry.clone());
            }
        }
        entries
    }

    /// A completed save belongs in storage, like the real page persisting
    /// the registrant. An in-flight save is lost on navigation.
    fn flush_saved(&mut self) {
        if self.save_completed() {
            if let Some(entry) = self.pending_entry.take() {
                self.storage.push(entry);
            }
        }
    }

    fn jitter(&mut self) -> Duration {
        let max_ms = self.config.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(self.rng.gen_range(0..=max_ms))
        }
    }

    fn require(&self, present: bool, selector: &str) -> HarnessResult<()> {
        if present {
            Ok(())
        } else {
            Err(HarnessError::ElementNotFound(selector.to_string()))
        }
    }
}

impl Default for SimPage {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

#[async_trait]
impl Page for SimPage {
    async fn goto(&mut self, opts: &LoadOptions) -> HarnessResult<()> {
        self.flush_saved();
        if opts.clear_storage {
            self.storage.clear();
        }
        self.rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let now = Instant::now();
        self.interactive_at = Some(now + self.config.initial_load_delay);
        self.name_value.clear();
        self.email_value.clear();
        self.department = None;
        self.course_options.clear();
        self.courses_ready_at = None;
        self.course = None;
        self.save_done_at = None;
        self.pending_entry = None;

        debug!(seed = ?opts.seed, clear_storage = opts.clear_storage, "sim page loaded");
        Ok(())
    }

    async fn exists(&self, selector: &str) -> HarnessResult<bool> {
        Ok(match selector {
            LOADING_INDICATOR => self.interactive_at.is_some() && !self.loaded(),
            NAME_INPUT | EMAIL_INPUT | DEPARTMENT_SELECT | SUBMIT_CONTROL => self.loaded(),
            COURSE_SELECT => self.courses_loaded(),
            REGISTRANT_ITEM => self.loaded() && !self.visible_entries().is_empty(),
            _ => false,
        })
    }

    async fn is_enabled(&self, selector: &str) -> HarnessResult<bool> {
        self.require(self.exists(selector).await?, selector)?;
        Ok(true)
    }

    async fn click(&mut self, selector: &str) -> HarnessResult<()> {
        self.require(self.exists(selector).await?, selector)?;

        if selector == SUBMIT_CONTROL {
            // Repeated clicks while a save is in flight (or finished) are
            // ignored, as is a click on an incomplete form.
            if self.save_done_at.is_some()
                || self.name_value.is_empty()
                || self.email_value.is_empty()
                || self.department.is_none()
                || self.course.is_none()
            {
                return Ok(());
            }

            let delay = self.config.save_delay + self.jitter();
            self.save_done_at = Some(Instant::now() + delay);
            self.pending_entry = Some(format!(
                "{} - {} - {} - {}",
                self.name_value,
                self.email_value,
                self.department.as_deref().unwrap_or_default(),
                self.course.as_deref().unwrap_or_default(),
            ));
            debug!(?delay, "save scheduled");
        }

        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> HarnessResult<()> {
        self.require(self.exists(selector).await?, selector)?;
        match selector {
            NAME_INPUT => self.name_value = text.to_string(),
            EMAIL_INPUT => self.email_value = text.to_string(),
            _ => return Err(HarnessError::ElementNotFound(selector.to_string())),
        }
        Ok(())
    }

    async fn select_value(&mut self, selector: &str, value: &str) -> HarnessResult<()> {
        self.require(self.exists(selector).await?, selector)?;
        match selector {
            DEPARTMENT_SELECT => {
                let courses = self.config.catalog.get(value).cloned().ok_or_else(|| {
                    HarnessError::ValueNotAvailable {
                        selector: selector.to_string(),
                        value: value.to_string(),
                    }
                })?;

                let delay = self.config.course_load_delay + self.jitter();
                self.department = Some(value.to_string());
                self.course_options = courses;
                self.courses_ready_at = Some(Instant::now() + delay);
                self.course = None;
                debug!(department = value, ?delay, "course load scheduled");
            }
            COURSE_SELECT => {
                if !self.course_options.iter().any(|o| o == value) {
                    return Err(HarnessError::ValueNotAvailable {
                        selector: selector.to_string(),
                        value: value.to_string(),
                    });
                }
                self.course = Some(value.to_string());
            }
            _ => return Err(HarnessError::ElementNotFound(selector.to_string())),
        }
        Ok(())
    }

    async fn option_values(&self, selector: &str) -> HarnessResult<Vec<String>> {
        self.require(self.exists(selector).await?, selector)?;
        if selector == COURSE_SELECT {
            Ok(self.course_options.clone())
        } else {
            Err(HarnessError::ElementNotFound(selector.to_string()))
        }
    }

    async fn control_value(&self, selector: &str) -> HarnessResult<String> {
        self.require(self.exists(selector).await?, selector)?;
        if selector == SUBMIT_CONTROL {
            let label = match self.save_done_at {
                None => SUBMIT_IDLE,
                Some(at) if Instant::now() < at => SUBMIT_SAVING,
                Some(_) => SUBMIT_SAVED,
            };
            Ok(label.to_string())
        } else {
            Err(HarnessError::ElementNotFound(selector.to_string()))
        }
    }

    async fn item_texts(&self, selector: &str) -> HarnessResult<Vec<String>> {
        if selector == REGISTRANT_ITEM {
            Ok(self.visible_entries())
        } else {
            Err(HarnessError::ElementNotFound(selector.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, sleep};

    fn seeded() -> LoadOptions {
        LoadOptions {
            seed: Some(0),
            clear_storage: true,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_indicator_lifecycle() {
        let mut page = SimPage::default();
        page.goto(&seeded()).await.unwrap();

        assert!(page.exists(LOADING_INDICATOR).await.unwrap());
        assert!(!page.exists(NAME_INPUT).await.unwrap());

        sleep(Duration::from_millis(250)).await;

        assert!(!page.exists(LOADING_INDICATOR).await.unwrap());
        assert!(page.exists(NAME_INPUT).await.unwrap());
        assert!(page.exists(SUBMIT_CONTROL).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_course_select_appears_after_delay() {
        let mut page = SimPage::new(SimConfig {
            max_jitter: Duration::ZERO,
            ..Default::default()
        });
        page.goto(&seeded()).await.unwrap();
        sleep(Duration::from_millis(250)).await;

        page.type_text(NAME_INPUT, "n").await.unwrap();
        page.select_value(DEPARTMENT_SELECT, "core").await.unwrap();
        assert!(!page.exists(COURSE_SELECT).await.unwrap());

        advance(Duration::from_millis(800)).await;
        assert!(page.exists(COURSE_SELECT).await.unwrap());
        let options = page.option_values(COURSE_SELECT).await.unwrap();
        assert!(options.iter().any(|o| o == "git-it"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_department_is_rejected() {
        let mut page = SimPage::default();
        page.goto(&seeded()).await.unwrap();
        sleep(Duration::from_millis(250)).await;

        let err = page
            .select_value(DEPARTMENT_SELECT, "underwater-basketweaving")
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::ValueNotAvailable { .. }));
    }
}
