use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{
    push_client::{PushMessage, PushProvider, PushTicket, MAX_BATCH_SIZE},
    push_token::is_expo_push_token,
};
use crate::task::{Task, TaskStore};

/// Outcome counts of one dispatch pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Turns due tasks into push messages and records successful deliveries.
#[derive(Clone)]
pub struct NotificationDispatcher {
    store: Arc<dyn TaskStore>,
    push: Arc<dyn PushProvider>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn TaskStore>, push: Arc<dyn PushProvider>) -> Self {
        Self { store, push }
    }

    pub async fn dispatch(&self, tasks: Vec<Task>) -> DispatchReport {
        let mut report = DispatchReport::default();

        let mut eligible = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.device_token.as_deref() {
                Some(token) if is_expo_push_token(token) => eligible.push(task),
                _ => {
                    debug!("Skipping task {} without a valid device token", task.id);
                    report.skipped += 1;
                }
            }
        }

        for batch in eligible.chunks(MAX_BATCH_SIZE) {
            let messages: Vec<PushMessage> =
                batch.iter().filter_map(PushMessage::reminder).collect();

            let tickets = match self.push.send(&messages).await {
                Ok(tickets) => tickets,
                Err(e) => {
                    error!("Error sending notifications for {} tasks: {:?}", batch.len(), e);
                    report.failed += batch.len();
                    continue;
                }
            };
            report.sent += messages.len();
            log_tickets(batch, &tickets);

            for task in batch {
                match self.store.mark_completed(task.id, task.updated_at).await {
                    Ok(true) => {
                        report.completed += 1;
                        info!("Notification sent for task: {}", task.title);
                    }
                    Ok(false) => warn!(
                        "Task {} changed during the sweep, leaving it open",
                        task.id
                    ),
                    Err(e) => error!("Error marking task {} completed: {:?}", task.id, e),
                }
            }
        }

        report
    }
}

fn log_tickets(batch: &[Task], tickets: &[PushTicket]) {
    for (task, ticket) in batch.iter().zip(tickets) {
        match ticket {
            PushTicket::Ok { id } => debug!("Push ticket {} for task {}", id, task.id),
            PushTicket::Error { message, details } => warn!(
                "Push ticket error for task {}: {} {:?}",
                task.id, message, details
            ),
        }
    }
}
