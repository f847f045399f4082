use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use super::push_client::{PushError, PushMessage, PushProvider, PushTicket};

/// Push provider that records every batch and answers with `ok` tickets, or
/// fails every batch while `failing` is set.
#[derive(Default)]
pub struct RecordingPushProvider {
    pub batches: Mutex<Vec<Vec<PushMessage>>>,
    pub failing: AtomicBool,
}

impl RecordingPushProvider {
    pub fn failing() -> Self {
        let provider = Self::default();
        provider.failing.store(true, Ordering::SeqCst);
        provider
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl PushProvider for RecordingPushProvider {
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        self.batches.lock().unwrap().push(messages.to_vec());
        if self.failing.load(Ordering::SeqCst) {
            return Err(PushError::Rejected("provider unavailable".into()));
        }
        Ok(messages
            .iter()
            .enumerate()
            .map(|(i, _)| PushTicket::Ok {
                id: format!("ticket-{}", i),
            })
            .collect())
    }
}
