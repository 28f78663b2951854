//! Line-oriented view of a document, with fenced code blocks excluded.

/// Logical lines of a document: split on newline, no trailing-newline
/// artifact. Lazy and restartable (call again to restart).
pub fn logical_lines(text: &str) -> std::str::Lines<'_> {
    text.lines()
}

/// Logical lines with everything belonging to a fenced code block removed,
/// fence delimiter lines included.
pub fn non_fenced_lines(text: &str) -> NonFencedLines<'_> {
    NonFencedLines {
        lines: text.lines(),
        open_fence: None,
    }
}

/// Iterator returned by [`non_fenced_lines`].
///
/// A fence opens on a line beginning with three or more backticks while no
/// fence is open, and closes only on a line beginning with exactly the same
/// backtick run-length. A differently-sized inner marker does not close the
/// fence. Not a full CommonMark fence grammar.
pub struct NonFencedLines<'a> {
    lines: std::str::Lines<'a>,
    open_fence: Option<usize>,
}

fn fence_run(line: &str) -> Option<usize> {
    let run = line.bytes().take_while(|&b| b == b'`').count();
    (run >= 3).then_some(run)
}

impl<'a> Iterator for NonFencedLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let line = self.lines.next()?;
            match self.open_fence {
                Some(open) => {
                    if fence_run(line) == Some(open) {
                        self.open_fence = None;
                    }
                }
                None => match fence_run(line) {
                    Some(run) => self.open_fence = Some(run),
                    None => return Some(line),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(text: &str) -> Vec<&str> {
        non_fenced_lines(text).collect()
    }

    #[test]
    fn lines_have_no_trailing_artifact() {
        let lines: Vec<&str> = logical_lines("a\nb\n").collect();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(collect("a\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn excludes_fenced_content_and_delimiters() {
        let text = "before\n```\n- [ ] hidden\n```\nafter";
        assert_eq!(collect(text), vec!["before", "after"]);
    }

    #[test]
    fn fence_closes_only_on_exact_run_length() {
        // The inner ``` does not close the ```` fence; everything up to the
        // matching ```` stays excluded.
        let text = "start\n````\ninside\n```\nstill inside\n````\nend";
        assert_eq!(collect(text), vec!["start", "end"]);
    }

    #[test]
    fn longer_run_does_not_close_shorter_fence() {
        let text = "a\n```\nx\n````\ny\n```\nb";
        assert_eq!(collect(text), vec!["a", "b"]);
    }

    #[test]
    fn unterminated_fence_swallows_the_rest() {
        let text = "a\n```\nb\nc";
        assert_eq!(collect(text), vec!["a"]);
    }

    #[test]
    fn indented_backticks_do_not_open_a_fence() {
        let text = "a\n  ```\nb";
        assert_eq!(collect(text), vec!["a", "  ```", "b"]);
    }

    #[test]
    fn restartable() {
        let text = "a\n```\nb\n```\nc";
        assert_eq!(collect(text), collect(text));
    }
}
