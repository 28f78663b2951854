//! Tag configuration and the line patterns derived from it.

use crate::error::{Result, ScanError};
use regex::Regex;

pub const DEFAULT_PROJECTS_FOLDER_PREFIX: &str = "Projects/";
pub const DEFAULT_NEXT_STEP_TAG: &str = "#next-step";
pub const DEFAULT_WAITING_FOR_TAG: &str = "#waiting-for";

/// The three user-configurable strings driving classification and tracking.
///
/// Tag strings are opaque: both bare-word (`next`) and `#`-prefixed
/// (`#next-step`) conventions work, and they are always matched literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfig {
    /// Folder prefix under which files are tracked, e.g. `"Projects/"`.
    pub projects_folder_prefix: String,

    /// Tag marking an open task as having a defined next action.
    pub next_step_tag: String,

    /// Tag marking an open task as blocked on an external party.
    pub waiting_for_tag: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            projects_folder_prefix: DEFAULT_PROJECTS_FOLDER_PREFIX.to_string(),
            next_step_tag: DEFAULT_NEXT_STEP_TAG.to_string(),
            waiting_for_tag: DEFAULT_WAITING_FOR_TAG.to_string(),
        }
    }
}

impl TagConfig {
    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.next_step_tag.trim().is_empty() {
            return Err("next-step tag must not be empty".to_string());
        }
        if self.waiting_for_tag.trim().is_empty() {
            return Err("waiting-for tag must not be empty".to_string());
        }
        Ok(())
    }

    /// Shorthand for [`crate::is_project_file`] with this configuration.
    #[must_use]
    pub fn is_project_file(&self, path: &str) -> bool {
        crate::is_project_file(&self.projects_folder_prefix, path)
    }
}

/// The two compiled line patterns, derived once per configuration load.
pub struct TagPatterns {
    next_step: Regex,
    waiting_for: Regex,
}

impl TagPatterns {
    pub fn compile(config: &TagConfig) -> Result<Self> {
        Ok(Self {
            next_step: tag_pattern(&config.next_step_tag)?,
            waiting_for: tag_pattern(&config.waiting_for_tag)?,
        })
    }

    pub(crate) fn next_step_matches(&self, line: &str) -> bool {
        self.next_step.is_match(line)
    }

    pub(crate) fn waiting_for_matches(&self, line: &str) -> bool {
        self.waiting_for.is_match(line)
    }
}

/// Matches a line holding an open checklist item whose text contains the tag
/// token followed by a non-word character or the end of the line: optional
/// leading whitespace, dash, one-two spaces, `[ ]`, space, arbitrary text,
/// tag.
fn tag_pattern(tag: &str) -> Result<Regex> {
    if tag.trim().is_empty() {
        return Err(ScanError::EmptyTag);
    }
    let pattern = format!(r"^\s*-\s{{1,2}}\[ \]\s.*{}(?:\W|$)", regex::escape(tag));
    Regex::new(&pattern).map_err(|source| ScanError::InvalidTagPattern {
        tag: tag.to_string(),
        source,
    })
}
