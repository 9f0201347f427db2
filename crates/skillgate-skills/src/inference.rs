//! Remote inference skill backed by the sports service
//!
//! Posts `{"query": ...}` to the resolved endpoint and hands the response
//! body back untouched.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use skillgate_types::InferenceRequest;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Result, SkillError};
use crate::skill::SkillHandler;

/// Environment variable overriding the sports service endpoint
pub const SPORTS_SERVICE_URL_ENV: &str = "SPORTS_SERVICE_URL";

/// Endpoint used when no override is configured
pub const DEFAULT_SPORTS_SERVICE_URL: &str =
    "https://baseball-agent.wittycliff-2af5d188.australiaeast.azurecontainerapps.io/inference";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const JSON_MIME_TYPE: &str = "application/json; charset=utf-8";

/// Resolved upstream endpoint. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    url: String,
}

impl EndpointConfig {
    /// Use `override_url` when present and non-empty, the default endpoint otherwise
    pub fn resolve(override_url: Option<&str>) -> Self {
        let url = override_url
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_SPORTS_SERVICE_URL);
        Self {
            url: url.to_string(),
        }
    }

    /// Resolve from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::resolve(lookup(SPORTS_SERVICE_URL_ENV).as_deref())
    }

    /// Resolved URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}

/// Skill answering natural-language questions through an HTTP inference service
#[derive(Debug, Clone)]
pub struct RemoteInferenceSkill {
    client: reqwest::Client,
    endpoint: EndpointConfig,
    timeout: Duration,
}

impl RemoteInferenceSkill {
    /// Create the skill around a shared client
    ///
    /// `reqwest::Client` is a handle to a connection pool; pass clones of a
    /// single process-wide client rather than building one per skill.
    pub fn new(client: reqwest::Client, endpoint: EndpointConfig) -> Self {
        Self {
            client,
            endpoint,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Endpoint every call of this skill targets
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Post `query` upstream and return the raw response body
    pub async fn answer(&self, query: &str) -> Result<String> {
        self.answer_with_cancel(query, &CancellationToken::new())
            .await
    }

    /// Like [`answer`](Self::answer), giving up as soon as `cancel` fires
    pub async fn answer_with_cancel(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        info!(query = %query, "Sending baseball query");

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SkillError::Transport("request cancelled".into())),
            result = self.post_query(query) => result,
        };

        if let Ok(body) = &result {
            info!(result = %body, "Baseball stats");
        }
        result
    }

    async fn post_query(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint.url())
            .header(reqwest::header::CONTENT_TYPE, JSON_MIME_TYPE)
            .timeout(self.timeout)
            .body(serde_json::to_vec(&InferenceRequest::new(query))?)
            .send()
            .await
            .map_err(|e| SkillError::from_transport(&e))?;

        let status = response.status();
        debug!(%status, url = %self.endpoint.url(), "Sports service response received");

        if !status.is_success() {
            return Err(SkillError::Upstream {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SkillError::from_transport(&e))
    }
}

/// Pull the question out of the orchestrator payload
///
/// Accepts a bare JSON string or an object carrying `question` or `query`.
fn question_from(argument: &Value) -> Option<&str> {
    match argument {
        Value::String(question) => Some(question.as_str()),
        Value::Object(fields) => fields
            .get("question")
            .or_else(|| fields.get("query"))
            .and_then(Value::as_str),
        _ => None,
    }
}

#[async_trait]
impl SkillHandler for RemoteInferenceSkill {
    async fn call(&self, argument: Value, cancel: &CancellationToken) -> Result<Value> {
        let question = question_from(&argument).ok_or_else(|| SkillError::InvalidArgument {
            skill: skillgate_types::GET_BASEBALL_STATS.to_string(),
            reason: "expected a question string".to_string(),
        })?;

        let answer = self.answer_with_cancel(question, cancel).await?;
        Ok(Value::String(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn skill_for(server: &mockito::ServerGuard) -> RemoteInferenceSkill {
        let url = format!("{}/inference", server.url());
        let endpoint = EndpointConfig::resolve(Some(url.as_str()));
        RemoteInferenceSkill::new(reqwest::Client::new(), endpoint)
    }

    /// Listener that accepts connections but never answers
    async fn silent_listener() -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });
        (addr, hold)
    }

    #[test]
    fn test_endpoint_falls_back_to_default() {
        assert_eq!(EndpointConfig::resolve(None).url(), DEFAULT_SPORTS_SERVICE_URL);
        assert_eq!(EndpointConfig::resolve(Some("")).url(), DEFAULT_SPORTS_SERVICE_URL);
        assert_eq!(EndpointConfig::default().url(), DEFAULT_SPORTS_SERVICE_URL);
        assert_eq!(
            EndpointConfig::from_lookup(|_| None).url(),
            DEFAULT_SPORTS_SERVICE_URL
        );
    }

    #[test]
    fn test_endpoint_override_is_used_verbatim() {
        let endpoint = EndpointConfig::from_lookup(|key| {
            (key == SPORTS_SERVICE_URL_ENV).then(|| "http://example.test/x".to_string())
        });
        assert_eq!(endpoint.url(), "http://example.test/x");
    }

    #[test]
    fn test_endpoint_from_process_env() {
        // Only test in this crate touching SPORTS_SERVICE_URL
        std::env::set_var(SPORTS_SERVICE_URL_ENV, "http://example.test/x");
        let skill = RemoteInferenceSkill::new(reqwest::Client::new(), EndpointConfig::from_env());
        assert_eq!(skill.endpoint().url(), "http://example.test/x");

        std::env::remove_var(SPORTS_SERVICE_URL_ENV);
        assert_eq!(EndpointConfig::from_env().url(), DEFAULT_SPORTS_SERVICE_URL);
    }

    #[test]
    fn test_question_from_payloads() {
        assert_eq!(question_from(&json!("Who won?")), Some("Who won?"));
        assert_eq!(question_from(&json!("")), Some(""));
        assert_eq!(question_from(&json!({ "question": "Q1" })), Some("Q1"));
        assert_eq!(question_from(&json!({ "query": "Q2" })), Some("Q2"));
        assert_eq!(question_from(&json!(42)), None);
        assert_eq!(question_from(&json!({ "question": 1 })), None);
    }

    #[tokio::test]
    async fn test_answer_posts_single_json_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/inference")
            .match_header("content-type", Matcher::Regex("^application/json".into()))
            .match_body(Matcher::Json(json!({ "query": "Who played in 1933?" })))
            .with_status(200)
            .with_body("Lou Gehrig and Babe Ruth")
            .expect(1)
            .create_async()
            .await;

        let answer = skill_for(&server).answer("Who played in 1933?").await.unwrap();

        assert_eq!(answer, "Lou Gehrig and Babe Ruth");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_answer_returns_body_unmodified() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/inference")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("  {\"response\": \"Babe Ruth\"}\n")
            .create_async()
            .await;

        let answer = skill_for(&server).answer("Best hitter?").await.unwrap();
        assert_eq!(answer, "  {\"response\": \"Babe Ruth\"}\n");
    }

    #[tokio::test]
    async fn test_empty_query_is_forwarded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/inference")
            .match_body(Matcher::Json(json!({ "query": "" })))
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        assert_eq!(skill_for(&server).answer("").await.unwrap(), "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/inference")
            .with_status(500)
            .with_body("{\"detail\": \"database unavailable\"}")
            .create_async()
            .await;

        let err = skill_for(&server).answer("Who won?").await.unwrap_err();
        assert!(matches!(err, SkillError::Upstream { status: 500 }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let skill = RemoteInferenceSkill::new(
            reqwest::Client::new(),
            EndpointConfig::resolve(Some(format!("http://{addr}/inference").as_str())),
        );

        let err = skill.answer("Who won?").await.unwrap_err();
        assert!(matches!(err, SkillError::Transport(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let (addr, hold) = silent_listener().await;

        let skill = RemoteInferenceSkill::new(
            reqwest::Client::new(),
            EndpointConfig::resolve(Some(format!("http://{addr}/inference").as_str())),
        )
        .with_timeout(Duration::from_millis(200));

        let err = skill.answer("Who won?").await.unwrap_err();
        assert!(matches!(err, SkillError::Transport(ref msg) if msg.contains("timed out")));
        hold.abort();
    }

    #[tokio::test]
    async fn test_cancelled_call_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/inference")
            .expect(0)
            .create_async()
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = skill_for(&server)
            .answer_with_cancel("Who won?", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, SkillError::Transport(ref msg) if msg == "request cancelled"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_request() {
        let (addr, hold) = silent_listener().await;
        let skill = RemoteInferenceSkill::new(
            reqwest::Client::new(),
            EndpointConfig::resolve(Some(format!("http://{addr}/inference").as_str())),
        )
        .with_timeout(Duration::from_secs(60));

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let err = skill.answer_with_cancel("Who won?", &cancel).await.unwrap_err();

        assert!(matches!(err, SkillError::Transport(ref msg) if msg == "request cancelled"));
        assert!(started.elapsed() < Duration::from_secs(5));
        hold.abort();
    }

    #[tokio::test]
    async fn test_handler_rejects_non_string_argument() {
        let server = mockito::Server::new_async().await;
        let err = skill_for(&server)
            .call(json!([1, 2, 3]), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SkillError::InvalidArgument { ref skill, .. } if skill == "GetBaseballStats"
        ));
    }

    #[tokio::test]
    async fn test_handler_wraps_answer_as_json_string() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/inference")
            .match_body(Matcher::Json(json!({ "query": "Cubs stadium in 2015?" })))
            .with_status(200)
            .with_body("Wrigley Field")
            .create_async()
            .await;

        let out = skill_for(&server)
            .call(json!({ "question": "Cubs stadium in 2015?" }), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out, json!("Wrigley Field"));
    }
}
