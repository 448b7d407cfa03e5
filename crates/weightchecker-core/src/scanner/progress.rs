//! Scan events: messages sent from the scan thread to the UI thread via a
//! crossbeam channel.
//!
//! Every message carries the [`SessionId`] of the scan that produced it so
//! the consumer can drop output from a superseded scan that is still
//! winding down.

use crate::model::Entry;
use std::fmt;
use std::time::Duration;

/// Identifies one scan run within a presenter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl SessionId {
    /// The id following this one.
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tagged event on the scan channel.
#[derive(Debug, Clone)]
pub struct ScanMessage {
    pub session: SessionId,
    pub event: ScanEvent,
}

/// What happened in the scan.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// One file or folder passed the filters and was sized.
    Item(Entry),
    /// Running counters. `total` is the pre-counted estimate, `None` when
    /// pre-counting was disabled or cancelled.
    Progress { processed: u64, total: Option<u64> },
    /// Traversal finished normally.
    Finished { items: u64, duration: Duration },
    /// Traversal stopped because the cancel token was set.
    Cancelled,
    /// Traversal aborted; the text is meant for the user.
    Error(String),
}

impl ScanEvent {
    /// `true` for the last event a session sends.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Cancelled | Self::Error(_))
    }
}

/// Progress as a fraction in `[0, 1]`, or `None` when the total is unknown.
///
/// The pre-count is only an estimate, so a processed count above it is
/// clamped rather than trusted.
pub fn progress_fraction(processed: u64, total: Option<u64>) -> Option<f32> {
    match total {
        Some(0) => Some(1.0),
        Some(total) => Some((processed as f64 / total as f64).clamp(0.0, 1.0) as f32),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(progress_fraction(0, Some(10)), Some(0.0));
        assert_eq!(progress_fraction(5, Some(10)), Some(0.5));
        assert_eq!(progress_fraction(12, Some(10)), Some(1.0));
        assert_eq!(progress_fraction(3, Some(0)), Some(1.0));
        assert_eq!(progress_fraction(3, None), None);
    }

    #[test]
    fn terminal_events() {
        assert!(ScanEvent::Cancelled.is_terminal());
        assert!(ScanEvent::Error("x".into()).is_terminal());
        assert!(!ScanEvent::Progress {
            processed: 1,
            total: None
        }
        .is_terminal());
    }
}
