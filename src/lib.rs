//! Page enhancer for the course registration portal.
//!
//! The enhancer decorates server-rendered pages: entrance animations, required
//! field validation, confirmation prompts for enrollment decisions, alert and
//! notification lifecycles, table row animation, table search and live grade
//! checks. It runs against [`Page`], a deterministic headless document with a
//! virtual clock, so every behaviour can be driven and observed from Rust.
//!
//! ```no_run
//! use portal_enhancer::Page;
//!
//! # fn main() -> portal_enhancer::Result<()> {
//! let mut page = Page::from_html(r#"
//!   <form action="/admin/enrollments/7/approve" method="post">
//!     <button id="approve" type="submit" class="btn btn-primary">Approve</button>
//!   </form>
//! "#)?;
//! page.boot()?;
//! page.enqueue_confirm_response(false);
//! page.click("#approve")?;
//! assert!(page.take_form_submissions().is_empty());
//! # Ok(())
//! # }
//! ```

mod assertions;
mod config;
mod dom;
mod enhancer;
mod events;
mod html;
mod page;
mod scheduler;
mod selector;
mod trace;
mod viewport;

pub use config::{EnhancerConfig, Timings};
pub use enhancer::{ENHANCER_STYLESHEET, Severity};
pub use page::{ConsoleEntry, FormSubmission, Notification, Page};
pub use scheduler::PendingTimer;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    #[error("page runtime error: {0}")]
    Runtime(String),
    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
