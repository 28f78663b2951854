//! Single-pass task classification over a document.

use crate::lines::non_fenced_lines;
use crate::tags::TagPatterns;
use once_cell::sync::Lazy;
use regex::Regex;

/// Open checklist marker: optional leading whitespace, dash, one-two spaces,
/// a bracket pair containing a single space, then a space.
static OPEN_TASK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s{1,2}\[ \]\s").expect("open checklist pattern is valid"));

/// Whether a line is a candidate task line (an incomplete checklist item).
#[must_use]
pub fn is_open_task(line: &str) -> bool {
    OPEN_TASK.is_match(line)
}

/// Outcome of classifying one content snapshot. Both flags always come from
/// the same scan pass, so they are never stale relative to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStatus {
    /// An open task carrying the next-step tag exists.
    pub next_step: bool,
    /// An open task carrying the waiting-for tag exists.
    pub waiting_for: bool,
}

/// Scan the document's non-fenced lines for tagged open tasks.
///
/// A waiting-for match ends the scan immediately (waiting-for takes absolute
/// priority); `next_step` then reflects only the lines seen up to that point.
/// A next-step match is recorded and the scan continues, since a later line
/// may still carry the waiting-for tag.
#[must_use]
pub fn classify(text: &str, patterns: &TagPatterns) -> TaskStatus {
    let mut status = TaskStatus::default();
    for line in non_fenced_lines(text) {
        if !is_open_task(line) {
            continue;
        }
        if patterns.waiting_for_matches(line) {
            status.waiting_for = true;
            return status;
        }
        if patterns.next_step_matches(line) {
            status.next_step = true;
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagConfig;
    use pretty_assertions::assert_eq;

    fn classify_default(text: &str) -> TaskStatus {
        let patterns = TagPatterns::compile(&TagConfig::default()).unwrap();
        classify(text, &patterns)
    }

    fn status(next_step: bool, waiting_for: bool) -> TaskStatus {
        TaskStatus {
            next_step,
            waiting_for,
        }
    }

    #[test]
    fn next_step_task_sets_the_flag() {
        assert_eq!(
            classify_default("- [ ] do thing #next-step"),
            status(true, false)
        );
    }

    #[test]
    fn waiting_for_task_sets_the_flag() {
        assert_eq!(
            classify_default("- [ ] ping vendor #waiting-for"),
            status(false, true)
        );
    }

    #[test]
    fn no_open_tasks_means_both_false() {
        assert_eq!(
            classify_default("# Heading\n\njust prose, no checklists"),
            status(false, false)
        );
    }

    #[test]
    fn waiting_for_wins_regardless_of_position() {
        let after = "- [ ] plan #next-step\n- [ ] vendor #waiting-for";
        assert_eq!(classify_default(after), status(true, true));

        let before = "- [ ] vendor #waiting-for\n- [ ] plan #next-step";
        assert!(classify_default(before).waiting_for);
    }

    #[test]
    fn waiting_for_short_circuits_the_scan() {
        // The next-step line after the waiting-for match is never reached.
        let text = "- [ ] vendor #waiting-for\n- [ ] plan #next-step";
        assert_eq!(classify_default(text), status(false, true));
    }

    #[test]
    fn closed_items_with_tag_text_are_ignored() {
        let text = "- [x] shipped #next-step\n- [x] asked #waiting-for";
        assert_eq!(classify_default(text), status(false, false));
    }

    #[test]
    fn tag_outside_a_checklist_is_ignored() {
        let text = "#next-step is the tag we use\n#waiting-for too";
        assert_eq!(classify_default(text), status(false, false));
    }

    #[test]
    fn fenced_tasks_are_ignored() {
        let text = "```\n- [ ] hidden #next-step\n```\nprose";
        assert_eq!(classify_default(text), status(false, false));
    }

    #[test]
    fn fence_exclusion_holds_with_exact_length_fences() {
        let text = "````\n```\n- [ ] hidden #next-step\n````\n- [ ] real #next-step";
        assert_eq!(classify_default(text), status(true, false));
    }

    #[test]
    fn task_after_a_closed_fence_counts() {
        let text = "```\ncode\n```\n- [ ] real #waiting-for";
        assert_eq!(classify_default(text), status(false, true));
    }
}
