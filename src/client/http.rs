//! reqwest-backed [`RequestClient`].

use std::time::Duration;

use reqwest::header::{COOKIE, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use super::{DispatchError, RequestClient, TargetError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub target: Url,
    pub timeout: Duration,
    /// Session token, sent as the `token` cookie the interpreter expects.
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(target: Url) -> Self {
        Self {
            target,
            timeout: DEFAULT_TIMEOUT,
            token: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base: Url,
    cookie: Option<HeaderValue>,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, DispatchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cgql/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DispatchError::Transport(format!("failed to build HTTP client: {e}")))?;

        let cookie = match config.token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("token={token}")).map_err(|_| {
                    DispatchError::Transport("session token is not a valid header value".into())
                })?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        Ok(Self {
            http,
            base: config.target,
            cookie,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve path segments below the base URL, percent-encoding each one.
    pub fn endpoint(&self, path: &[&str]) -> Result<Url, DispatchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| TargetError::MissingHost(self.base.to_string()))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    fn prepare(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.cookie {
            Some(cookie) => builder.header(COOKIE, cookie.clone()),
            None => builder,
        }
    }

    async fn finish(response: reqwest::Response) -> Result<Value, DispatchError> {
        let status = response.status();
        let text = response.text().await.map_err(transport)?;
        trace!(status = status.as_u16(), bytes = text.len(), "response received");
        classify(status, text)
    }
}

/// Map a status and raw body onto the dispatcher result. Bodies that are not
/// JSON come back as a string; empty ones as null.
fn classify(status: reqwest::StatusCode, text: String) -> Result<Value, DispatchError> {
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text))
    };

    if status.is_success() {
        Ok(body)
    } else {
        Err(DispatchError::Interpreter {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport(err: reqwest::Error) -> DispatchError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    DispatchError::Transport(format!("{kind}: {err}"))
}

impl RequestClient for HttpClient {
    async fn get(&self, path: &[&str]) -> Result<Value, DispatchError> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self
            .prepare(self.http.get(url))
            .send()
            .await
            .map_err(transport)?;
        Self::finish(response).await
    }

    async fn post<B>(&self, path: &[&str], body: &B) -> Result<Value, DispatchError>
    where
        B: Serialize + Sync,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .prepare(self.http.post(url).json(body))
            .send()
            .await
            .map_err(transport)?;
        Self::finish(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{endpoint, parse_target};
    use reqwest::StatusCode;
    use serde_json::json;

    fn client(target: &str) -> HttpClient {
        HttpClient::new(ClientConfig::new(parse_target(target).unwrap())).unwrap()
    }

    fn rejected(result: Result<Value, DispatchError>) -> (u16, Value) {
        match result {
            Err(DispatchError::Interpreter { status, body }) => (status, body),
            other => panic!("expected interpreter error, got {other:?}"),
        }
    }

    #[test]
    fn classify_success_passes_error_status_through() {
        let body = r#"{"status":"error","message":"no such vertex"}"#;
        assert_eq!(
            classify(StatusCode::OK, body.into()).unwrap(),
            json!({"status": "error", "message": "no such vertex"})
        );
    }

    #[test]
    fn classify_non_2xx_keeps_json_body() {
        let (status, body) =
            rejected(classify(StatusCode::UNAUTHORIZED, r#"{"status":"error"}"#.into()));
        assert_eq!(status, 401);
        assert_eq!(body, json!({"status": "error"}));
    }

    #[test]
    fn classify_non_json_body_is_string() {
        let (status, body) = rejected(classify(StatusCode::BAD_GATEWAY, "upstream down".into()));
        assert_eq!(status, 502);
        assert_eq!(body, Value::String("upstream down".into()));
        assert_eq!(
            classify(StatusCode::OK, "pong".into()).unwrap(),
            Value::String("pong".into())
        );
    }

    #[test]
    fn classify_empty_body_is_null() {
        assert_eq!(classify(StatusCode::OK, "  \n".into()).unwrap(), Value::Null);
        let (status, body) = rejected(classify(StatusCode::INTERNAL_SERVER_ERROR, String::new()));
        assert_eq!(status, 500);
        assert_eq!(body, Value::Null);
    }

    #[test]
    fn endpoint_joins_segments() {
        let c = client("http://127.0.0.1:8000");
        assert_eq!(
            c.endpoint(endpoint::EXECUTE).unwrap().as_str(),
            "http://127.0.0.1:8000/execute"
        );
        assert_eq!(
            c.endpoint(endpoint::BIBFS).unwrap().as_str(),
            "http://127.0.0.1:8000/bibfs/query"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let c = client("https://cg.example/api/");
        assert_eq!(
            c.endpoint(endpoint::GRAPH_STATS).unwrap().as_str(),
            "https://cg.example/api/graph/stats"
        );
    }

    #[test]
    fn endpoint_escapes_node_ids() {
        let c = client("http://h:1");
        let url = c.endpoint(&["graph", "node", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://h:1/graph/node/a%2Fb%20c");
    }

    #[test]
    fn token_becomes_cookie() {
        let cfg = ClientConfig::new(parse_target("http://h:1").unwrap())
            .with_token(Some("abc".into()));
        let c = HttpClient::new(cfg).unwrap();
        assert_eq!(c.cookie.as_ref().unwrap().to_str().unwrap(), "token=abc");

        let cfg = ClientConfig::new(parse_target("http://h:1").unwrap()).with_token(Some("".into()));
        assert!(HttpClient::new(cfg).unwrap().cookie.is_none());
    }

    #[test]
    fn invalid_token_rejected() {
        let cfg = ClientConfig::new(parse_target("http://h:1").unwrap())
            .with_token(Some("bad\nvalue".into()));
        assert!(matches!(
            HttpClient::new(cfg),
            Err(DispatchError::Transport(_))
        ));
    }
}
