//! Operator notification channel.
//!
//! Failures that never reach an interactive caller (import jobs, saga cleanup)
//! are reported here. Reporting is fire-and-forget and must not block.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::error;

/// A single failure reported to operators.
#[derive(Debug, Clone)]
pub struct OperatorReport {
    /// Where the failure happened, e.g. `"import"` or `"create_production"`.
    pub context: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

pub trait Notifier: Send + Sync {
    fn report(&self, context: &str, err: &(dyn std::error::Error + 'static));
}

/// Emits every report as an error-level log event.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn report(&self, context: &str, err: &(dyn std::error::Error + 'static)) {
        error!(context, error = %err, "Operator report");
    }
}

/// Forwards reports into an unbounded channel drained elsewhere.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<OperatorReport>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OperatorReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn report(&self, context: &str, err: &(dyn std::error::Error + 'static)) {
        let report = OperatorReport {
            context: context.to_string(),
            message: err.to_string(),
            timestamp: Utc::now(),
        };
        // Receiver gone means nobody is listening anymore; keep the log trail.
        if self.tx.send(report).is_err() {
            error!(context, error = %err, "Operator channel closed, report dropped");
        }
    }
}

/// Spawn a task that logs every report arriving on `rx`.
pub fn spawn_reporter(
    mut rx: mpsc::UnboundedReceiver<OperatorReport>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(report) = rx.recv().await {
            error!(
                context = %report.context,
                timestamp = %report.timestamp,
                "{}",
                report.message
            );
        }
    })
}
