//! Session module for the interactive command loop
//!
//! # Components
//!
//! - `Console`: prompt/read/print abstraction over stdin and stdout
//! - `InteractiveSession`: reads URLs, runs the retry runner, shows and
//!   saves results, and counts successful runs

mod console;
mod interactive;

// Re-export main types
pub use console::{Console, StdConsole};
pub use interactive::{
    InteractiveSession, PreviewSettings, SessionState, SessionSummary, TerminationReason,
    EXAMPLE_URL, EXIT_COMMAND, PROMPT,
};
