//! The page boundary: selector contract and element-query trait
//!
//! The harness never touches application internals; everything it knows
//! about the page under test flows through [`Page`], a small vocabulary of
//! element queries against the fixed selectors in [`selectors`].

use async_trait::async_trait;

use crate::error::HarnessResult;

/// Selector contract for the sign-up page
pub mod selectors {
    /// Name text input
    pub const NAME_INPUT: &str = r#"input[name="name"]"#;
    /// Email text input
    pub const EMAIL_INPUT: &str = r#"input[name="email"]"#;
    /// Department selector; changing it triggers the async course load
    pub const DEPARTMENT_SELECT: &str = r#"select[name="department"]"#;
    /// Course selector, populated asynchronously after department selection
    pub const COURSE_SELECT: &str = r#"select[name="course"]"#;
    /// Submit control; its value cycles `Submit` -> `Saving...` -> `Saved!`
    pub const SUBMIT_CONTROL: &str = r#"input[type="submit"]"#;
    /// Rendered registrant list entries
    pub const REGISTRANT_ITEM: &str = "li";
    /// Optional indicator shown while initial data is loading
    pub const LOADING_INDICATOR: &str = r#"img[alt="loading"]"#;
}

/// Submit control value while idle
pub const SUBMIT_IDLE: &str = "Submit";
/// Submit control value while the save is in flight
pub const SUBMIT_SAVING: &str = "Saving...";
/// Submit control value once the save has completed
pub const SUBMIT_SAVED: &str = "Saved!";

/// Options for navigating to the application entry point
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Fixed seed for any randomness source the page uses; `None` leaves
    /// the page's randomness unseeded
    pub seed: Option<u64>,

    /// Clear persisted client-side state before load
    pub clear_storage: bool,
}

/// Element queries against a live sign-up page.
///
/// Implementations back this with whatever actually renders the page; the
/// driver only ever observes it through these calls. Query methods must
/// return a fresh snapshot on every call rather than caching state, since
/// the driver polls them while the page mutates itself asynchronously.
#[async_trait]
pub trait Page: Send {
    /// Navigate to the application entry point
    async fn goto(&mut self, opts: &LoadOptions) -> HarnessResult<()>;

    /// Whether an element matching `selector` is currently present
    async fn exists(&self, selector: &str) -> HarnessResult<bool>;

    /// Whether the element is enabled; `ElementNotFound` if absent
    async fn is_enabled(&self, selector: &str) -> HarnessResult<bool>;

    /// Click the element (focus for inputs, activation for buttons)
    async fn click(&mut self, selector: &str) -> HarnessResult<()>;

    /// Write literal text into a focused input
    async fn type_text(&mut self, selector: &str, text: &str) -> HarnessResult<()>;

    /// Set a select element to the option with the given value
    async fn select_value(&mut self, selector: &str, value: &str) -> HarnessResult<()>;

    /// Values of the child options of a select element
    async fn option_values(&self, selector: &str) -> HarnessResult<Vec<String>>;

    /// Current value of a control (the submit label, for this page)
    async fn control_value(&self, selector: &str) -> HarnessResult<String>;

    /// Text contents of every element matching `selector`, in DOM order
    async fn item_texts(&self, selector: &str) -> HarnessResult<Vec<String>>;
}
