//! Notifications sent from a running operation to whoever presents it.
//!
//! The engine never prints. It pushes [`OrganizerEvent`]s into an
//! [`EventSink`] backed by a crossbeam channel, and the front end drains the
//! receiver on its own schedule. Every log line is mirrored to `tracing` so
//! the audit log sees the same messages as the user.

use crate::analytics::AnalyticsSnapshot;
use crossbeam_channel::{Receiver, Sender};

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A human-readable message with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub severity: Severity,
    pub message: String,
}

/// Everything a front end needs to follow an organize or undo run.
#[derive(Debug, Clone)]
pub enum OrganizerEvent {
    /// Append a line to the activity log.
    Log(LogLine),
    /// One more directory entry was handled.
    Progress { handled: usize, total: usize },
    /// Final analytics of an organize run.
    Dashboard(AnalyticsSnapshot),
    /// An organize run ended. `moved_any` gates the undo control.
    Finished { dry_run: bool, moved_any: bool },
    /// An undo pass ended.
    UndoFinished { restored: usize, failed: usize },
}

/// Sending half of the notification channel.
///
/// A sink created with [`EventSink::discard`] only logs to `tracing`.
/// Sending never fails the caller: if the receiver is gone the event is
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<OrganizerEvent>>,
}

impl EventSink {
    /// Creates a connected sink and its receiver.
    pub fn channel() -> (Self, Receiver<OrganizerEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that forwards log lines to `tracing` only.
    pub fn discard() -> Self {
        Self::default()
    }

    pub fn send(&self, event: OrganizerEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
        self.send(OrganizerEvent::Log(LogLine { severity, message }));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }
}

/// Collects the log lines from drained events. Mostly useful in tests.
pub fn log_lines(events: impl IntoIterator<Item = OrganizerEvent>) -> Vec<LogLine> {
    events
        .into_iter()
        .filter_map(|event| match event {
            OrganizerEvent::Log(line) => Some(line),
            _ => None,
        })
        .collect()
}
