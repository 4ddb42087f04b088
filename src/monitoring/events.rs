/*!
 * Notification Events
 * Suspension/recovery announcements handed to an external pub/sub collaborator
 */

use crate::core::types::{Cycle, ProcessId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Process lifecycle notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic")]
pub enum Notification {
    #[serde(rename = "process.suspended")]
    ProcessSuspended {
        id: ProcessId,
        name: String,
        reason: String,
        consecutive_errors: u32,
        permanent: bool,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        resume_at_cycle: Option<Cycle>,
    },

    #[serde(rename = "process.recovered")]
    ProcessRecovered {
        id: ProcessId,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        previous_reason: Option<String>,
        consecutive_errors: u32,
        manual: bool,
    },
}

impl Notification {
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::ProcessSuspended { .. } => "process.suspended",
            Self::ProcessRecovered { .. } => "process.recovered",
        }
    }

    pub fn process_id(&self) -> &ProcessId {
        match self {
            Self::ProcessSuspended { id, .. } | Self::ProcessRecovered { id, .. } => id,
        }
    }
}

/// Consumer of kernel notifications
pub trait NotificationSink {
    fn publish(&mut self, notification: Notification);
}

/// Default sink: notifications only reach the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn publish(&mut self, notification: Notification) {
        debug!(
            topic = notification.topic(),
            process = %notification.process_id(),
            "Notification published"
        );
    }
}

/// In-memory sink; clones share one log
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().clone()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl NotificationSink for RecordingSink {
    fn publish(&mut self, notification: Notification) {
        self.events.lock().push(notification);
    }
}

/// Channel-backed sink for subscribers outside the kernel
impl NotificationSink for flume::Sender<Notification> {
    fn publish(&mut self, notification: Notification) {
        if let Err(err) = self.send(notification) {
            warn!(
                topic = err.0.topic(),
                "Notification dropped, no subscriber listening"
            );
        }
    }
}
