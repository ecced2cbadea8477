use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::Serialize;
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::services::NotificationSender;

/// Writes administrator alerts to the log when no delivery endpoint is set.
pub struct LogNotifier;

#[async_trait]
impl NotificationSender for LogNotifier {
    async fn send_admin_alert(&self, title: &str, assigned_to: &str) -> AppResult<()> {
        warn!(%title, %assigned_to, "high priority ticket raised");
        Ok(())
    }
}

pub struct WebhookNotifier {
    http: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl NotificationSender for WebhookNotifier {
    async fn send_admin_alert(&self, title: &str, assigned_to: &str) -> AppResult<()> {
        let response = self
            .http
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&AdminAlert { title, assigned_to })
            .send()
            .await
            .map_err(|err| AppError::Notification(format!("failed to call webhook: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Notification(format!(
                "webhook responded with {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct AdminAlert<'a> {
    title: &'a str,
    assigned_to: &'a str,
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    use super::*;

    /// Answers a single request with `status_line` and `body`, returning the URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            let response = format!(
                "{status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/alerts")
    }

    fn read_request(stream: &mut TcpStream) {
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = stream.read(&mut chunk).unwrap();
            if read == 0 {
                return;
            }
            request.extend_from_slice(&chunk[..read]);
            if let Some(end) = request.windows(4).position(|window| window == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..end]).to_lowercase();
                let body_len = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    #[test]
    fn serializes_alert_payload() {
        let payload = serde_json::to_value(AdminAlert {
            title: "Crash on login",
            assigned_to: "alee",
        })
        .unwrap();
        assert_eq!(
            payload,
            serde_json::json!({ "title": "Crash on login", "assigned_to": "alee" })
        );
    }

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        assert!(LogNotifier.send_admin_alert("foo", "bar").await.is_ok());
    }

    #[tokio::test]
    async fn delivers_alert_to_webhook() {
        let notifier = WebhookNotifier::new(serve_once("HTTP/1.1 204 No Content", ""));
        assert!(notifier.send_admin_alert("foo", "bar").await.is_ok());
    }

    #[tokio::test]
    async fn error_status_is_a_notification_error() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error", "boom");
        let err = WebhookNotifier::new(url)
            .send_admin_alert("foo", "bar")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Notification(_)));
        assert_eq!(
            err.to_string(),
            "notification error: webhook responded with 500 Internal Server Error: boom"
        );
    }

    #[tokio::test]
    async fn unreachable_webhook_is_a_notification_error() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/alerts".to_string());
        let err = notifier.send_admin_alert("foo", "bar").await.unwrap_err();
        assert!(matches!(err, AppError::Notification(_)));
    }
}
