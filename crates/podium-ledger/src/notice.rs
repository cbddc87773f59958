use std::fmt;
use std::sync::Mutex;

/// Severity of an outcome notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Human-readable outcome of a ledger operation, for display only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receiver of advisory notices emitted by the ledger.
///
/// Notices are not part of the state contract: a sink may drop them.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Discards every notice.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNotices;

impl NoticeSink for SilentNotices {
    fn notify(&self, _notice: Notice) {}
}

/// Buffers notices in memory until drained.
#[derive(Debug, Default)]
pub struct CollectingNotices {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingNotices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every buffered notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl NoticeSink for CollectingNotices {
    fn notify(&self, notice: Notice) {
        if let Ok(mut guard) = self.notices.lock() {
            guard.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_drains_in_order() {
        let sink = CollectingNotices::new();
        sink.notify(Notice::success("first"));
        sink.notify(Notice::error("second"));

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NoticeLevel::Success);
        assert_eq!(drained[1].level, NoticeLevel::Error);
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn silent_sink_accepts_anything() {
        SilentNotices.notify(Notice::info("ignored"));
    }

    #[test]
    fn display_is_message() {
        assert_eq!(Notice::info("Scores published!").to_string(), "Scores published!");
    }
}
