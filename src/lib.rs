//! # Failure Catalog
//!
//! Runnable catalog of common failure categories. Each operation has a
//! minimal trigger, every failure is classified into a [`FailureKind`], and
//! a single [`Dispatcher`] turns it into one report line without ending
//! the process.
//!
//! ## Layout
//!
//! 1. **Kinds** - the closed taxonomy and how std errors map onto it
//! 2. **Signals** - the failure record and the `OperationResult` alias
//! 3. **Dispatch** - the one handling layer, writing to any `io::Write`
//! 4. **Operations** - twelve independent triggers
//! 5. **Scenarios** - the fixed-order table the CLI drives
//!
//! ## Running
//!
//! ```bash
//! cargo run --bin failure-catalog
//! cargo run --bin failure-catalog -- --only divide --only parse-integer
//! cargo run --bin failure-catalog -- --format json -v
//! ```
//!
//! ## Key Dependencies
//!
//! - `thiserror` - derive `Error` for signals and setup errors
//! - `tracing` / `tracing-subscriber` - diagnostics on stderr
//! - `toml` / `serde` - optional configuration file
//! - `colored` - highlighted report labels

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod kind;
pub mod logging;
pub mod operations;
pub mod scenarios;
pub mod signal;

pub use config::Config;
pub use dispatch::{Dispatcher, HandledOutcome, ReportFormat};
pub use error::CatalogError;
pub use kind::FailureKind;
pub use signal::{FailureSignal, OperationResult};
