//! IME composition state machine.
//!
//! Pure transition logic: one step takes the previous state plus the commit
//! and preedit text of an input-method update, and yields the composition
//! events to dispatch and the next state. Runs identically regardless of
//! which process initiated the text, with no input-method backend attached.

/// Whether a composition is currently open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImeState {
    #[default]
    Idle,
    Composing,
}

impl ImeState {
    pub fn is_composing(self) -> bool {
        self == Self::Composing
    }
}

/// Text range attached to a composition change while the composition stays
/// open, so the editor can highlight the raw preedit input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

/// Events emitted by one machine step, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImeEvent {
    CompositionStart,
    CompositionChange {
        text: String,
        /// Present only while the composition stays open.
        range: Option<TextRange>,
    },
    /// Input/edit notification following a composition change.
    Input { composing: bool },
    CompositionEnd,
}

/// Advance the machine by one input-method update.
///
/// A non-empty commit closes the composition out explicitly even when the
/// preedit logic alone would not have ended it.
pub fn step(state: ImeState, commit: &str, preedit: &str) -> (ImeState, Vec<ImeEvent>) {
    let composing = state.is_composing();
    let mut start = !composing && commit.is_empty() && !preedit.is_empty();
    let mut change = composing && commit.is_empty() && !preedit.is_empty();
    let mut end = composing && preedit.is_empty();

    let next_composing = start || change;
    let text = if preedit.is_empty() { commit } else { preedit };

    if !commit.is_empty() && !end {
        start = true;
        change = true;
        end = true;
    }

    let mut events = Vec::new();
    if start {
        events.push(ImeEvent::CompositionStart);
    }
    if start || change || end {
        let range = (!end).then(|| TextRange {
            start: 0,
            end: text.chars().count() as u32,
        });
        events.push(ImeEvent::CompositionChange {
            text: text.to_owned(),
            range,
        });
        events.push(ImeEvent::Input {
            composing: next_composing,
        });
    }
    if end {
        events.push(ImeEvent::CompositionEnd);
    }

    let next = if next_composing {
        ImeState::Composing
    } else {
        ImeState::Idle
    };
    (next, events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(events: &[ImeEvent]) -> Vec<&'static str> {
        events
            .iter()
            .map(|e| match e {
                ImeEvent::CompositionStart => "start",
                ImeEvent::CompositionChange { .. } => "change",
                ImeEvent::Input { .. } => "input",
                ImeEvent::CompositionEnd => "end",
            })
            .collect()
    }

    #[test]
    fn preedit_from_idle_starts_composition() {
        let (state, events) = step(ImeState::Idle, "", "ab");
        assert_eq!(state, ImeState::Composing);
        assert_eq!(names(&events), ["start", "change", "input"]);
        match &events[1] {
            ImeEvent::CompositionChange { text, range } => {
                assert_eq!(text, "ab");
                assert_eq!(*range, Some(TextRange { start: 0, end: 2 }));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn empty_update_while_composing_ends() {
        let (state, events) = step(ImeState::Composing, "", "");
        assert_eq!(state, ImeState::Idle);
        assert_eq!(names(&events), ["change", "input", "end"]);
    }

    #[test]
    fn commit_from_idle_forces_full_cycle() {
        let (state, events) = step(ImeState::Idle, "x", "");
        assert_eq!(state, ImeState::Idle);
        assert_eq!(names(&events), ["start", "change", "input", "end"]);
        match &events[1] {
            ImeEvent::CompositionChange { text, range } => {
                assert_eq!(text, "x");
                assert_eq!(*range, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn spec_sequence() {
        // ("", "ab") from Idle -> {Start, Change}, Composing
        let (state, events) = step(ImeState::Idle, "", "ab");
        assert_eq!(state, ImeState::Composing);
        assert!(matches!(events[0], ImeEvent::CompositionStart));
        assert!(matches!(events[1], ImeEvent::CompositionChange { .. }));
        assert!(!events.iter().any(|e| matches!(e, ImeEvent::CompositionEnd)));

        // then ("", "") -> {End}, Idle
        let (state, events) = step(state, "", "");
        assert_eq!(state, ImeState::Idle);
        assert!(matches!(events.last(), Some(ImeEvent::CompositionEnd)));
        assert!(!events.iter().any(|e| matches!(e, ImeEvent::CompositionStart)));

        // then ("x", "") from Idle -> {Start, Change, End}, Idle
        let (state, events) = step(state, "x", "");
        assert_eq!(state, ImeState::Idle);
        assert!(matches!(events[0], ImeEvent::CompositionStart));
        assert!(matches!(events.last(), Some(ImeEvent::CompositionEnd)));
    }

    #[test]
    fn preedit_change_keeps_composing() {
        let (state, events) = step(ImeState::Composing, "", "abc");
        assert_eq!(state, ImeState::Composing);
        assert_eq!(names(&events), ["change", "input"]);
        match &events[0] {
            ImeEvent::CompositionChange { range, .. } => {
                assert_eq!(*range, Some(TextRange { start: 0, end: 3 }));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn commit_while_composing_ends_without_restart() {
        // Commit with empty preedit while composing: plain end, no forced
        // restart (the end flag was already set).
        let (state, events) = step(ImeState::Composing, "x", "");
        assert_eq!(state, ImeState::Idle);
        assert_eq!(names(&events), ["change", "input", "end"]);
        match &events[0] {
            ImeEvent::CompositionChange { text, .. } => assert_eq!(text, "x"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn commit_with_preedit_while_composing_forces_close() {
        let (state, events) = step(ImeState::Composing, "x", "ab");
        assert_eq!(state, ImeState::Idle);
        assert_eq!(names(&events), ["start", "change", "input", "end"]);
        match &events[1] {
            ImeEvent::CompositionChange { text, range } => {
                assert_eq!(text, "ab");
                assert_eq!(*range, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn idle_empty_update_is_silent() {
        let (state, events) = step(ImeState::Idle, "", "");
        assert_eq!(state, ImeState::Idle);
        assert!(events.is_empty());
    }

    #[test]
    fn input_notification_reflects_next_state() {
        let (_, events) = step(ImeState::Idle, "", "a");
        assert!(events
            .iter()
            .any(|e| matches!(e, ImeEvent::Input { composing: true })));

        let (_, events) = step(ImeState::Composing, "", "");
        assert!(events
            .iter()
            .any(|e| matches!(e, ImeEvent::Input { composing: false })));
    }

    #[test]
    fn range_counts_chars_not_bytes() {
        let (_, events) = step(ImeState::Idle, "", "あい");
        match &events[1] {
            ImeEvent::CompositionChange { range, .. } => {
                assert_eq!(*range, Some(TextRange { start: 0, end: 2 }));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
