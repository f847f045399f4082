pub mod notification_service;
pub mod push_client;
pub mod push_token;
pub mod reminder_scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use notification_service::NotificationDispatcher;
pub use push_client::ExpoPushClient;
pub use reminder_scheduler::{ReminderScheduler, ReminderSweep};
