use std::sync::Arc;

use chrono::NaiveDate;
use futures_util::StreamExt;
use reqwest::{
    cookie::{CookieStore, Jar},
    Client, RequestBuilder, Response, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{
    LeaveRequest, LoggedInUser, Notification, Task, TimesheetPayload, TimesheetRecord, WeekCheck,
};
use crate::TimeflowUrl;

const REFRESH_COOKIE: &str = "refresh_token";
const BANK_HOLIDAYS_URL: &str = "https://www.gov.uk/bank-holidays.json";

#[derive(Error, Debug)]
pub enum TimeflowError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ResponseError: {0}")]
    Response(String),
    #[error("ParsingError: {0}")]
    Parsing(String),
    #[error("{0}")]
    Validation(String),
}

/// Responses that wrap their payload in `{ message, data }`.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    access: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct BankHolidayFeed {
    #[serde(rename = "england-and-wales")]
    england_and_wales: BankHolidayDivision,
}

#[derive(Debug, Deserialize)]
struct BankHolidayDivision {
    events: Vec<BankHolidayEvent>,
}

#[derive(Debug, Deserialize)]
struct BankHolidayEvent {
    date: NaiveDate,
}

/// HTTP client for the TimeFlow backend. The refresh token travels as an
/// HttpOnly-style cookie held in a shared jar so that `refresh` works
/// without a bearer token; the access token is attached per request.
#[derive(Debug, Clone)]
pub struct TimeflowClient {
    client: Client,
    base_url: TimeflowUrl,
    cookie_url: Url,
    jar: Arc<Jar>,
    access_token: Option<String>,
}

impl TimeflowClient {
    pub fn new(base_url: &str, refresh_cookie: Option<&str>) -> Result<Self, TimeflowError> {
        let cookie_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| TimeflowError::Response(format!("Invalid API URL {base_url}: {e}")))?;
        let jar = Arc::new(Jar::default());

        if let Some(value) = refresh_cookie {
            jar.add_cookie_str(&format!("{}={}; Path=/", REFRESH_COOKIE, value), &cookie_url);
        }

        let client = Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .map_err(|e| TimeflowError::Response(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: TimeflowUrl::new(base_url),
            cookie_url,
            jar,
            access_token: None,
        })
    }

    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    pub fn clear_access_token(&mut self) {
        self.access_token = None;
    }

    /// Current refresh cookie value from the jar, for persistence between
    /// runs.
    pub fn refresh_cookie(&self) -> Option<String> {
        let header = self.jar.cookies(&self.cookie_url)?;
        let header = header.to_str().ok()?;
        header.split(';').find_map(|segment| {
            let mut parts = segment.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(REFRESH_COOKIE), Some(value)) => Some(value.to_string()),
                _ => None,
            }
        })
    }

    fn endpoint(&self, path: &str) -> TimeflowUrl {
        self.base_url.append_path(path)
    }

    fn with_bearer(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, TimeflowError> {
        let response = request
            .send()
            .await
            .map_err(|e| TimeflowError::Response(format!("{call_name}: {e}")))?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(TimeflowError::Unauthorized);
        }

        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: impl AsRef<str>,
        call_name: &str,
    ) -> Result<T, TimeflowError> {
        let request = self.with_bearer(self.client.get(url.as_ref()));
        let response = self.send(request, call_name).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimeflowError::Response(format!("{call_name} returned {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TimeflowError::Parsing(format!("{call_name}: {e}")))
    }

    /// POST /api/auth/refresh. Credentialed via the refresh cookie; never
    /// carries a bearer token.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<String, TimeflowError> {
        let url = self.endpoint("/api/auth/refresh");
        let response = self
            .send(self.client.post(url.as_ref()), "POST /api/auth/refresh")
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimeflowError::Response(format!(
                "POST /api/auth/refresh returned {status}"
            )));
        }

        let body: AccessResponse = response
            .json()
            .await
            .map_err(|e| TimeflowError::Parsing(format!("POST /api/auth/refresh: {e}")))?;
        Ok(body.access)
    }

    /// POST /api/auth/login. The refresh token lands in the cookie jar as a
    /// side effect; the access token is returned.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, TimeflowError> {
        let url = self.endpoint("/api/auth/login");
        let response = self
            .send(
                self.client
                    .post(url.as_ref())
                    .json(&LoginRequest { username, password }),
                "POST /api/auth/login",
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimeflowError::Response(format!(
                "POST /api/auth/login returned {status}"
            )));
        }

        let body: AccessResponse = response
            .json()
            .await
            .map_err(|e| TimeflowError::Parsing(format!("POST /api/auth/login: {e}")))?;
        Ok(body.access)
    }

    pub async fn logged_in_user(&self) -> Result<LoggedInUser, TimeflowError> {
        self.fetch(self.endpoint("/api/auth/loggedinuser"), "GET /api/auth/loggedinuser")
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn check_week(&self, week_start: NaiveDate) -> Result<WeekCheck, TimeflowError> {
        let url = self
            .endpoint("/api/timesheet/check")
            .with_week_start(&week_start);
        self.fetch(url, "GET /api/timesheet/check").await
    }

    pub async fn create_timesheet(&self, payload: &TimesheetPayload) -> Result<(), TimeflowError> {
        let url = self.endpoint("/api/timesheet/create");
        let request = self.with_bearer(self.client.post(url.as_ref()).json(payload));
        let response = self.send(request, "POST /api/timesheet/create").await?;
        Self::check_submission_response(response, "POST /api/timesheet/create").await
    }

    pub async fn update_timesheet(
        &self,
        id: i64,
        payload: &TimesheetPayload,
    ) -> Result<(), TimeflowError> {
        let url = self.endpoint(&format!("/api/timesheet/update/{id}"));
        let request = self.with_bearer(self.client.put(url.as_ref()).json(payload));
        let response = self.send(request, "PUT /api/timesheet/update").await?;
        Self::check_submission_response(response, "PUT /api/timesheet/update").await
    }

    /// Map a submission response to `Ok` or a `Validation` error carrying
    /// the server's own message when one is present.
    async fn check_submission_response(
        response: Response,
        call_name: &str,
    ) -> Result<(), TimeflowError> {
        let status = response.status();
        if status.is_success() {
            let _ = response.bytes().await;
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            if let Some(message) = extract_server_message(&body) {
                return Err(TimeflowError::Validation(message));
            }
        }
        tracing::warn!(%status, body, "{call_name} failed");
        Err(TimeflowError::Response(format!("{call_name} returned {status}")))
    }

    pub async fn list_timesheets(&self) -> Result<Vec<TimesheetRecord>, TimeflowError> {
        let envelope: DataEnvelope<Vec<TimesheetRecord>> = self
            .fetch(self.endpoint("/api/timesheet/list"), "GET /api/timesheet/list")
            .await?;
        Ok(envelope.data)
    }

    pub async fn assigned_tasks(&self) -> Result<Vec<Task>, TimeflowError> {
        self.fetch(
            self.endpoint("/api/task/get_assigned_tasks"),
            "GET /api/task/get_assigned_tasks",
        )
        .await
    }

    pub async fn leave_requests(&self) -> Result<Vec<LeaveRequest>, TimeflowError> {
        self.fetch(self.endpoint("/api/leave/track"), "GET /api/leave/track")
            .await
    }

    /// England & Wales bank holidays from the public gov.uk feed. No
    /// bearer token leaves the backend's origin.
    pub async fn bank_holidays(&self) -> Result<Vec<NaiveDate>, TimeflowError> {
        let response = self
            .send(self.client.get(BANK_HOLIDAYS_URL), "GET bank-holidays")
            .await?;
        let feed: BankHolidayFeed = response
            .json()
            .await
            .map_err(|e| TimeflowError::Parsing(format!("GET bank-holidays: {e}")))?;
        Ok(feed
            .england_and_wales
            .events
            .into_iter()
            .map(|event| event.date)
            .collect())
    }

    /// Consume the one-way notification stream, forwarding each message
    /// into `tx`. Returns when the stream ends or the receiver is dropped.
    /// Messages arrive as newline-delimited JSON objects.
    pub async fn stream_notifications(
        &self,
        tx: UnboundedSender<Notification>,
    ) -> Result<(), TimeflowError> {
        let url = self.endpoint("/api/notifications/stream");
        let request = self.with_bearer(self.client.get(url.as_ref()));
        let response = self.send(request, "GET /api/notifications/stream").await?;

        forward_notification_lines(response.bytes_stream(), &tx).await
    }
}

/// Split a byte stream on newlines and forward each JSON message. A final
/// message without a trailing newline is still delivered when the stream
/// closes.
async fn forward_notification_lines<S, C, E>(
    mut stream: S,
    tx: &UnboundedSender<Notification>,
) -> Result<(), TimeflowError>
where
    S: futures_util::Stream<Item = Result<C, E>> + Unpin,
    C: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut buffer = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| TimeflowError::Response(format!("notification stream: {e}")))?;
        buffer.extend_from_slice(chunk.as_ref());

        while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            if !forward_notification_line(&line[..line.len() - 1], tx) {
                return Ok(());
            }
        }
    }

    forward_notification_line(&buffer, tx);
    Ok(())
}

/// Returns false when the receiver is gone.
fn forward_notification_line(line: &[u8], tx: &UnboundedSender<Notification>) -> bool {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    if line.is_empty() {
        return true;
    }
    match serde_json::from_str::<Notification>(line) {
        Ok(notification) => tx.send(notification).is_ok(),
        Err(e) => {
            tracing::debug!(%e, line, "skipping malformed notification");
            true
        }
    }
}

/// Pull a human-readable message out of a validation error body. The
/// backend reports either DRF-style `non_field_errors` or a plain
/// `message` field.
fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value
        .get("non_field_errors")
        .and_then(|errors| errors.get(0))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }

    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_non_field_errors_first() {
        let body = r#"{"non_field_errors": ["Week already submitted"], "message": "other"}"#;
        assert_eq!(
            extract_server_message(body).as_deref(),
            Some("Week already submitted")
        );
    }

    #[test]
    fn falls_back_to_message_field() {
        let body = r#"{"message": "Timesheet not found."}"#;
        assert_eq!(
            extract_server_message(body).as_deref(),
            Some("Timesheet not found.")
        );
    }

    #[test]
    fn non_json_body_yields_none() {
        assert_eq!(extract_server_message("<html>502</html>"), None);
    }

    #[tokio::test]
    async fn notification_stream_delivers_a_final_line_without_newline() {
        let chunks: Vec<Result<&[u8], std::convert::Infallible>> = vec![
            Ok(br#"{"message": "Timesheet app"#),
            Ok(b"roved\", \"status\": \"approved\"}\n"),
            Ok(br#"{"message": "Timesheet rejected", "status": "rejected"}"#),
        ];
        let stream = futures_util::stream::iter(chunks);

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        forward_notification_lines(stream, &tx).await.unwrap();
        drop(tx);

        assert_eq!(rx.recv().await.unwrap().message, "Timesheet approved");
        let last = rx.recv().await.unwrap();
        assert_eq!(last.message, "Timesheet rejected");
        assert_eq!(last.status.as_deref(), Some("rejected"));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn refresh_cookie_round_trips_through_jar() {
        let client = TimeflowClient::new("http://localhost:8000", Some("abc123")).unwrap();
        assert_eq!(client.refresh_cookie().as_deref(), Some("abc123"));

        let client = TimeflowClient::new("http://localhost:8000", None).unwrap();
        assert_eq!(client.refresh_cookie(), None);
    }
}
