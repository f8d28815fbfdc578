//! webharness: browser test harness with recorded evidence.
//!
//! Wraps WebDriver session lifecycle, multi-window and multi-session
//! switching, and per-case orchestration. Each case can be recorded by
//! [`webharness_capture`], with test steps annotated onto the video as
//! they run.

pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod runner;
pub mod session;
pub mod util;
pub mod window;

// Re-export common types at crate root
pub use config::HarnessConfig;
pub use error::{Error, Result};
pub use logging::LogHandle;
pub use registry::{ManagedSession, SessionRegistry};
pub use runner::{CaseContext, CaseRunner};
pub use session::Session;
pub use window::WindowTarget;

/// Registry specialized to live browser sessions.
pub type BrowserRegistry = SessionRegistry<Session>;
