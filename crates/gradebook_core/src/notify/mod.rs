//! Transient user feedback.
//!
//! # Responsibility
//! - Define the `Notifier` collaborator contract used by store and service.
//! - Model the single overwrite-on-write notification slot and its timing.
//!
//! # Invariants
//! - A slot holds at most one notice; showing a new one restarts the clock.
//! - Phase transitions depend only on elapsed time, never on a queue.

use std::time::{Duration, Instant};

/// Default time a notice stays fully visible.
pub const DEFAULT_DISPLAY: Duration = Duration::from_millis(3000);
/// Default fade-out time after the display interval.
pub const DEFAULT_FADE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// One message destined for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn new(message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Transient feedback channel.
///
/// Implementations must not block the caller while a notice is on screen.
pub trait Notifier {
    fn notify(&mut self, message: &str, kind: NoticeKind);
}

/// Display and fade durations for a notification slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeTiming {
    pub display: Duration,
    pub fade: Duration,
}

impl Default for NoticeTiming {
    fn default() -> Self {
        Self {
            display: DEFAULT_DISPLAY,
            fade: DEFAULT_FADE,
        }
    }
}

/// Where a shown notice is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticePhase {
    Visible,
    Fading,
    Hidden,
}

/// Single display slot with a restartable dismissal timer.
///
/// Time is passed in by the caller, so the slot never sleeps or spawns.
#[derive(Debug, Clone, Default)]
pub struct NotificationSlot {
    timing: NoticeTiming,
    current: Option<(Notice, Instant)>,
}

impl NotificationSlot {
    pub fn new(timing: NoticeTiming) -> Self {
        Self {
            timing,
            current: None,
        }
    }

    /// Replaces whatever is shown and restarts the timer at `now`.
    pub fn show(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now));
    }

    /// Returns the phase of the current notice at `now`.
    pub fn phase(&self, now: Instant) -> NoticePhase {
        let Some((_, shown_at)) = &self.current else {
            return NoticePhase::Hidden;
        };

        let elapsed = now.saturating_duration_since(*shown_at);
        if elapsed < self.timing.display {
            NoticePhase::Visible
        } else if elapsed < self.timing.display + self.timing.fade {
            NoticePhase::Fading
        } else {
            NoticePhase::Hidden
        }
    }

    /// Returns the notice if it is still visible or fading at `now`.
    pub fn active_notice(&self, now: Instant) -> Option<&Notice> {
        match self.phase(now) {
            NoticePhase::Hidden => None,
            NoticePhase::Visible | NoticePhase::Fading => {
                self.current.as_ref().map(|(notice, _)| notice)
            }
        }
    }

    /// Drops the notice once it is fully hidden.
    pub fn prune(&mut self, now: Instant) {
        if self.phase(now) == NoticePhase::Hidden {
            self.current = None;
        }
    }
}
