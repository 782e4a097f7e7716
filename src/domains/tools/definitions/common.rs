//! Common utilities shared across upstream-backed tools.
//!
//! Every tool follows the same contract: look up the credential, validate
//! arguments, build the upstream request, run it against the caller's
//! cancellation token, then shape the answer. The helpers here cover the
//! steps that do not depend on the upstream.

use reqwest::{RequestBuilder, StatusCode};
use rmcp::model::{CallToolResult, Content};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::secrets::SecretsProvider;
use crate::domains::tools::ToolError;

/// Upstream error bodies are cut to this many characters.
pub const ERROR_BODY_LIMIT: usize = 500;

/// Marker appended to a truncated body.
const ELLIPSIS: char = '…';

/// Outcome of one tool invocation: the success JSON text, or the error.
pub type ToolOutcome = Result<String, ToolError>;

/// Cut `text` to at most `max` characters, appending an ellipsis if anything
/// was removed.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
            out.push_str(&text[..cut]);
            out.push(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}

/// Fetch a required secret, treating blank values as missing.
pub fn require_secret(secrets: &dyn SecretsProvider, name: &str) -> Result<String, ToolError> {
    match secrets.secret(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => {
            warn!("{} is not set", name);
            Err(ToolError::missing_credential(name))
        }
    }
}

/// Status and body of a completed upstream exchange.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamReply {
    /// The body on a 2xx status, an [`ToolError::UpstreamStatus`] otherwise.
    pub fn into_success_body(self) -> Result<String, ToolError> {
        if self.status.is_success() {
            Ok(self.body)
        } else {
            warn!("Upstream answered HTTP {}", self.status.as_u16());
            Err(ToolError::upstream_status(self.status.as_u16(), &self.body))
        }
    }
}

/// Send one request and read its body, giving up when `ct` is cancelled.
///
/// Cancellation and client timeouts map to [`ToolError::Timeout`]; any other
/// transport fault is reported as unexpected in `tool`.
pub async fn exchange(
    request: RequestBuilder,
    ct: &CancellationToken,
    tool: &str,
) -> Result<UpstreamReply, ToolError> {
    let call = async {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok::<_, reqwest::Error>(UpstreamReply { status, body })
    };

    tokio::select! {
        biased;
        _ = ct.cancelled() => {
            warn!("{} cancelled while waiting for upstream", tool);
            Err(ToolError::Timeout)
        }
        result = call => match result {
            Ok(reply) => {
                debug!("Upstream replied HTTP {} ({} bytes)", reply.status.as_u16(), reply.body.len());
                Ok(reply)
            }
            Err(e) if e.is_timeout() => {
                warn!("{} timed out: {}", tool, e);
                Err(ToolError::Timeout)
            }
            Err(e) => Err(ToolError::unexpected(tool, e.to_string())),
        },
    }
}

/// Wrap a tool outcome as an MCP result carrying the JSON text.
pub fn into_call_result(outcome: ToolOutcome) -> CallToolResult {
    match outcome {
        Ok(json) => CallToolResult::success(vec![Content::text(json)]),
        Err(e) => CallToolResult::error(vec![Content::text(e.to_payload())]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::secrets::StaticSecrets;
    use rmcp::model::RawContent;
    use std::time::{Duration, Instant};

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("Service Unavailable", ERROR_BODY_LIMIT), "Service Unavailable");
        assert_eq!(truncate("", ERROR_BODY_LIMIT), "");
    }

    #[test]
    fn test_truncate_exact_limit_untouched() {
        let body = "a".repeat(ERROR_BODY_LIMIT);
        assert_eq!(truncate(&body, ERROR_BODY_LIMIT), body);
    }

    #[test]
    fn test_truncate_counts_characters() {
        let body = "é".repeat(501);
        let cut = truncate(&body, ERROR_BODY_LIMIT);
        assert_eq!(cut.chars().count(), 501);
        assert!(cut.ends_with('…'));
        assert!(cut.starts_with(&"é".repeat(500)));
    }

    #[test]
    fn test_require_secret_present() {
        let secrets = StaticSecrets::new().with("Meteosource_Api_Key", "k");
        assert_eq!(require_secret(&secrets, "Meteosource_Api_Key").unwrap(), "k");
    }

    #[test]
    fn test_require_secret_blank_is_missing() {
        let secrets = StaticSecrets::new().with("AstronomyAPI_key", "   ");
        assert_eq!(
            require_secret(&secrets, "AstronomyAPI_key"),
            Err(ToolError::missing_credential("AstronomyAPI_key"))
        );
    }

    #[test]
    fn test_into_success_body_rejects_server_error() {
        let reply = UpstreamReply {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "down".to_string(),
        };
        assert_eq!(
            reply.into_success_body().unwrap_err().to_string(),
            "HTTP 503: down"
        );
    }

    #[test]
    fn test_into_call_result_marks_errors() {
        let result = into_call_result(Err(ToolError::Timeout));
        assert_eq!(result.is_error, Some(true));
        match &result.content[0].raw {
            RawContent::Text(text) => assert_eq!(text.text, r#"{"error":"Request timeout"}"#),
            _ => panic!("expected text content"),
        }
    }

    #[test]
    fn test_into_call_result_success_passes_text() {
        let result = into_call_result(Ok(r#"{"ok":1}"#.to_string()));
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_exchange_cancelled_before_send() {
        let ct = CancellationToken::new();
        ct.cancel();
        let request = reqwest::Client::new().get("http://127.0.0.1:9/never");
        let err = exchange(request, &ct, "get_weather").await.unwrap_err();
        assert_eq!(err, ToolError::Timeout);
    }

    #[tokio::test]
    async fn test_exchange_cancelled_while_waiting() {
        // Accepts the connection but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _hold = tokio::spawn(async move {
            let _conn = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let ct = CancellationToken::new();
        let canceller = ct.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            canceller.cancel();
        });

        let request = reqwest::Client::new().get(format!("http://{}/point", addr));
        let started = Instant::now();
        let err = exchange(request, &ct, "get_weather").await.unwrap_err();

        assert_eq!(err.to_payload(), r#"{"error":"Request timeout"}"#);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
