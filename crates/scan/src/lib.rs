//! # gtd-scan
//!
//! Pure classification core for project markdown files: decides whether a
//! document has an open task tagged with a "next step" or a "waiting for"
//! marker, and whether a path is a tracked project file at all.
//!
//! ## Pipeline
//!
//! ```text
//! Document text
//!     │
//!     ├──> Line Scanner (fenced code blocks excluded)
//!     │      └─> Logical lines
//!     │
//!     └──> Task Classifier (compiled tag patterns)
//!            └─> TaskStatus { next_step, waiting_for }
//! ```
//!
//! ## Example
//!
//! ```
//! use gtd_scan::{classify, TagConfig, TagPatterns};
//!
//! let config = TagConfig::default();
//! let patterns = TagPatterns::compile(&config).unwrap();
//!
//! let status = classify("- [ ] call the vendor #next-step", &patterns);
//! assert!(status.next_step);
//! assert!(!status.waiting_for);
//! ```

mod classify;
mod error;
mod filter;
mod lines;
mod tags;

pub use classify::{classify, is_open_task, TaskStatus};
pub use error::{Result, ScanError};
pub use filter::is_project_file;
pub use lines::{logical_lines, non_fenced_lines, NonFencedLines};
pub use tags::{
    TagConfig, TagPatterns, DEFAULT_NEXT_STEP_TAG, DEFAULT_PROJECTS_FOLDER_PREFIX,
    DEFAULT_WAITING_FOR_TAG,
};
