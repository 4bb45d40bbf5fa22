//! Recording mailer for deterministic testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use foundry_core::{Item, Mailer};

/// A recorded notification: (lost item id, found item id, score).
pub type RecordedNotification = (Uuid, Uuid, f32);

/// Mailer that records every notification instead of delivering it.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<RecordedNotification>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send report failure (while still recording it).
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// All notifications recorded so far.
    pub fn sent(&self) -> Vec<RecordedNotification> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of notifications recorded.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_match_notification(&self, lost: &Item, found: &Item, score: f32) -> bool {
        self.sent.lock().unwrap().push((lost.id, found.id, score));
        !self.fail
    }
}
