//! Fenced code block tracking.
//!
//! Directive lines quoted inside ``` or ~~~ fences are documentation of the
//! syntax, not requests for a table, and must pass through untouched.

/// Open fence: marker character and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

/// Line-by-line fence state.
///
/// A fence line is indented by at most three spaces; deeper lines are
/// indented code. A fence closes on a line of the same marker at least as
/// long as the opening run, with nothing but whitespace after it.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the last line fed left us inside a fence.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` if the line opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > 3 {
            return false;
        }
        let Some(run) = fence_run(&line[indent..]) else {
            return false;
        };

        match self.open {
            None => {
                self.open = Some(run.fence);
                true
            }
            Some(open) if run.fence.marker == open.marker
                && run.fence.len >= open.len
                && run.rest.trim().is_empty() =>
            {
                self.open = None;
                true
            }
            Some(_) => false,
        }
    }
}

struct FenceRun<'a> {
    fence: Fence,
    rest: &'a str,
}

/// Leading run of three or more backticks or tildes.
fn fence_run(trimmed: &str) -> Option<FenceRun<'_>> {
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    (len >= 3).then(|| FenceRun {
        fence: Fence { marker, len },
        rest: &trimmed[len..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_outside() {
        assert!(!FenceTracker::new().in_fence());
    }

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("```markdown"));
        assert!(tracker.in_fence());
        assert!(!tracker.update("!docdantic: app.Model"));
        assert!(tracker.in_fence());
        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_closing_must_match_marker_and_length() {
        let mut tracker = FenceTracker::new();
        tracker.update("````");
        assert!(!tracker.update("```"));
        assert!(!tracker.update("~~~~"));
        assert!(tracker.in_fence());
        assert!(tracker.update("`````"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_closing_with_info_string_does_not_close() {
        let mut tracker = FenceTracker::new();
        tracker.update("~~~");
        assert!(!tracker.update("~~~ rust"));
        assert!(tracker.in_fence());
        assert!(tracker.update("  ~~~  "));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_indented_code_is_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("    ```"));
        assert!(!tracker.update("\t```"));
        assert!(!tracker.in_fence());

        assert!(tracker.update("   ```"));
        assert!(!tracker.update("    ```"));
        assert!(tracker.in_fence());
        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_short_runs_ignored() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("``inline``"));
        assert!(!tracker.in_fence());
    }
}
