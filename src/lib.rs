//! Sign-up workflow E2E harness
//!
//! This crate provides a deterministic test-assertion harness for one
//! browser workflow: fill a sign-up form, wait for asynchronously loaded
//! course options, submit, wait for save completion, and assert the
//! rendered registrant list. Every asynchronous page behavior is observed
//! through bounded-timeout polling, never callbacks, and every failure is a
//! typed error carrying the context needed to tell flakiness from a real
//! regression.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   WorkflowDriver<P: Page>                    │
//! ├──────────────────────────────────────────────────────────────┤
//! │  initialize(seed)         -> Loaded        (LoadTimeout)     │
//! │  fill_identity(name, ..)  -> FormFilled    (ElementNotFound) │
//! │  select_department(d)     -> DeptSelected                    │
//! │  await_course_options(c)  -> CoursesReady  (Timeout)         │
//! │  select_course(c)         -> CourseSelected (ValueNotAvail.) │
//! │  submit()                 -> Submitted                       │
//! │  await_saved()            -> Saved         (Timeout)         │
//! │  assert_registered(r)     -> Verified      (AssertionFail.)  │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Page trait: goto / exists / click / type / select /         │
//! │              option_values / control_value / item_texts      │
//! │    └── SimPage: deterministic in-process page under test     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The harness owns no application state; it only observes the page. Retry
//! of a whole failed workflow is the invoking test runner's policy, never
//! this crate's.

pub mod config;
pub mod driver;
pub mod error;
pub mod page;
pub mod sim;

pub use config::HarnessConfig;
pub use driver::{Registrant, WorkflowDriver, WorkflowReport, WorkflowState, DEFAULT_SEED};
pub use error::{HarnessError, HarnessResult};
pub use page::{LoadOptions, Page};
pub use sim::{SimConfig, SimPage};
