//! Badge model: the three-state visual classification and the repaint
//! messages the engine hands to the presentation layer.

use gtd_scan::TaskStatus;
use std::fmt;

/// Mutually exclusive visual states for a file's browser entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeState {
    /// No next-step and no waiting-for tag present.
    NeedsNextStep,
    /// A waiting-for tag is present, regardless of next-step.
    WaitingFor,
    /// A next-step tag without waiting-for, or the file is untracked.
    Clear,
}

impl BadgeState {
    #[must_use]
    pub fn from_flags(flags: TaskStatus) -> Self {
        if flags.waiting_for {
            BadgeState::WaitingFor
        } else if flags.next_step {
            BadgeState::Clear
        } else {
            BadgeState::NeedsNextStep
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BadgeState::NeedsNextStep => "needs-next-step",
            BadgeState::WaitingFor => "waiting-for",
            BadgeState::Clear => "clear",
        }
    }

    /// CSS class a browser-style surface would apply; `Clear` removes both.
    #[must_use]
    pub const fn css_class(self) -> Option<&'static str> {
        match self {
            BadgeState::NeedsNextStep => Some("gtd-no-next-step"),
            BadgeState::WaitingFor => Some("gtd-waiting-for"),
            BadgeState::Clear => None,
        }
    }
}

impl fmt::Display for BadgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Deferred repaint message. The engine enqueues these; the host drains them
/// on its next tick and applies them to whatever surface exists by then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepaintRequest {
    /// Set the badge for a tracked file from its computed status.
    Status { path: String, state: BadgeState },
    /// Force the untracked/clear state unconditionally.
    Clear { path: String },
}

impl RepaintRequest {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            RepaintRequest::Status { path, .. } | RepaintRequest::Clear { path } => path,
        }
    }
}

/// The external badge surface, consumed by the engine's host.
pub trait BadgeSurface {
    fn repaint(&mut self, path: &str, state: BadgeState);
    fn clear(&mut self, path: &str);
}

/// Apply drained repaint requests to a surface. A `None` surface (not yet
/// constructed) skips everything silently; the next event or reconciliation
/// corrects any missed paint.
pub fn apply_repaints(surface: Option<&mut dyn BadgeSurface>, requests: &[RepaintRequest]) {
    let Some(surface) = surface else {
        return;
    };
    for request in requests {
        match request {
            RepaintRequest::Status { path, state } => surface.repaint(path, *state),
            RepaintRequest::Clear { path } => surface.clear(path),
        }
    }
}
