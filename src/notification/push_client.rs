use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::task::Task;

/// Largest number of messages the Expo push API accepts in one request.
pub const MAX_BATCH_SIZE: usize = 100;

const SEND_PATH: &str = "/--/api/v2/push/send";

#[derive(Error, Debug)]
pub enum PushError {
    #[error("Push request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Push provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Push provider rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderData {
    pub task_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub sound: &'static str,
    pub title: String,
    pub body: String,
    pub data: ReminderData,
}

impl PushMessage {
    /// `None` when the task has no device token to address.
    pub fn reminder(task: &Task) -> Option<Self> {
        Some(Self {
            to: task.device_token.clone()?,
            sound: "default",
            title: format!("Reminder: {}", task.title),
            body: task.description.clone(),
            data: ReminderData { task_id: task.id },
        })
    }
}

/// Per-message delivery receipt returned by the provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PushTicket {
    Ok {
        id: String,
    },
    Error {
        message: String,
        #[serde(default)]
        details: Option<serde_json::Value>,
    },
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    data: Vec<PushTicket>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Submits one batch of push messages.
#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError>;
}

#[derive(Clone)]
pub struct ExpoPushClient {
    http: reqwest::Client,
    send_url: String,
    access_token: Option<String>,
}

impl ExpoPushClient {
    pub fn new(
        base_url: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PushError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            send_url: format!("{}{}", base_url.trim_end_matches('/'), SEND_PATH),
            access_token,
        })
    }
}

#[async_trait]
impl PushProvider for ExpoPushClient {
    async fn send(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        let mut request = self
            .http
            .post(&self.send_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(messages);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SendResponse = response.json().await?;
        if let Some(err) = parsed.errors.first() {
            return Err(PushError::Rejected(match &err.code {
                Some(code) => format!("{}: {}", code, err.message),
                None => err.message.clone(),
            }));
        }

        Ok(parsed.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> PushMessage {
        PushMessage {
            to: "ExponentPushToken[abc]".into(),
            sound: "default",
            title: "Reminder: Stretch".into(),
            body: "Five minutes".into(),
            data: ReminderData {
                task_id: Uuid::nil(),
            },
        }
    }

    fn client(server: &MockServer, token: Option<&str>) -> ExpoPushClient {
        ExpoPushClient::new(
            &server.uri(),
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_reminder_message_shape() {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: "Stretch".into(),
            description: "Five minutes".into(),
            due_at: now,
            device_token: Some("ExpoPushToken[t]".into()),
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let msg = PushMessage::reminder(&task).unwrap();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["to"], "ExpoPushToken[t]");
        assert_eq!(json["title"], "Reminder: Stretch");
        assert_eq!(json["body"], "Five minutes");
        assert_eq!(json["sound"], "default");
        assert_eq!(json["data"]["taskId"], task.id.to_string());

        let tokenless = Task {
            device_token: None,
            ..task
        };
        assert!(PushMessage::reminder(&tokenless).is_none());
    }

    #[tokio::test]
    async fn test_send_returns_tickets() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/--/api/v2/push/send"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"status": "ok", "id": "ticket-1"},
                    {"status": "error", "message": "not registered",
                     "details": {"error": "DeviceNotRegistered"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tickets = client(&server, Some("secret"))
            .send(&[message(), message()])
            .await
            .unwrap();

        assert_eq!(
            tickets[0],
            PushTicket::Ok {
                id: "ticket-1".into()
            }
        );
        assert!(matches!(
            &tickets[1],
            PushTicket::Error { message, .. } if message == "not registered"
        ));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = client(&server, None).send(&[message()]).await.unwrap_err();
        assert!(matches!(err, PushError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_request_level_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{"code": "PUSH_TOO_MANY_EXPERIENCE_IDS", "message": "mixed projects"}]
            })))
            .mount(&server)
            .await;

        let err = client(&server, None).send(&[message()]).await.unwrap_err();
        assert!(matches!(err, PushError::Rejected(msg) if msg.contains("mixed projects")));
    }
}
