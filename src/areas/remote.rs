//! HTTP client for the remote repository service
//!
//! All endpoints live under `{url}/api/repositories/{repository_id}/` and
//! exchange JSON. Requests are sent one at a time and never retried. No
//! request timeout is configured.

use crate::artifacts::sync::transfer::{
    CloneResponse, PullRequest, PullResponse, PushRequest, PushResponse,
};
use crate::errors::RemoteError;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub struct RemoteClient {
    http_client: reqwest::Client,
    base_url: Url,
    repository_id: String,
    token: Option<String>,
}

impl RemoteClient {
    pub fn new(url: &str, repository_id: &str, token: Option<String>) -> Result<Self, RemoteError> {
        let base_url = Url::parse(url)
            .map_err(|error| RemoteError::Request(format!("invalid remote URL '{url}': {error}")))?;

        Ok(RemoteClient {
            http_client: reqwest::Client::new(),
            base_url,
            repository_id: repository_id.to_string(),
            token,
        })
    }

    /// Full snapshot: every branch and every commit, oldest first
    pub async fn fetch_snapshot(&self) -> Result<CloneResponse, RemoteError> {
        self.request::<(), _>(Method::GET, "clone", None).await
    }

    pub async fn push(&self, request: &PushRequest) -> Result<PushResponse, RemoteError> {
        self.request(Method::POST, "push", Some(request)).await
    }

    pub async fn pull(&self, request: &PullRequest) -> Result<PullResponse, RemoteError> {
        self.request(Method::POST, "pull", Some(request)).await
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/api/repositories/{}/{action}",
            self.base_url.as_str().trim_end_matches('/'),
            self.repository_id
        )
    }

    async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        action: &str,
        body: Option<&B>,
    ) -> Result<T, RemoteError> {
        let url = self.endpoint(action);
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.http_client.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::from_status(
                status.as_u16(),
                Self::error_message(status, &body),
            ));
        }

        Ok(response.json().await?)
    }

    /// The server's own message when it sent one, else the status reason
    fn error_message(status: StatusCode, body: &str) -> String {
        let from_json = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["error", "message"]
                    .iter()
                    .find_map(|key| value.get(key)?.as_str().map(str::to_string))
            });

        match from_json {
            Some(message) => message,
            None if !body.trim().is_empty() => body.trim().to_string(),
            None => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoint_joins_base_url_without_double_slash() {
        let client = RemoteClient::new("http://localhost:3000/", "repo-1", None).unwrap();

        assert_eq!(
            client.endpoint("clone"),
            "http://localhost:3000/api/repositories/repo-1/clone"
        );
    }

    #[test]
    fn malformed_url_is_a_request_error() {
        let error = RemoteClient::new("not a url", "repo-1", None).err().unwrap();

        assert!(matches!(error, RemoteError::Request(_)));
    }

    #[test]
    fn error_message_prefers_json_error_field() {
        let message = RemoteClient::error_message(
            StatusCode::NOT_FOUND,
            r#"{"error":"Repository not found"}"#,
        );

        assert_eq!(message, "Repository not found");
    }

    #[test]
    fn error_message_falls_back_to_status_reason() {
        let message = RemoteClient::error_message(StatusCode::UNAUTHORIZED, "");

        assert_eq!(message, "Unauthorized");
    }

    #[tokio::test]
    async fn unauthorized_response_is_classified_with_hint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/repositories/repo-1/pull")
            .match_header("authorization", "Bearer secret")
            .with_status(401)
            .with_body(r#"{"message":"invalid token"}"#)
            .create_async()
            .await;
        let client = RemoteClient::new(&server.url(), "repo-1", Some("secret".to_string())).unwrap();

        let error = client
            .pull(&PullRequest::new("main".to_string(), None, "jane@example.com".to_string()))
            .await
            .err()
            .unwrap();

        mock.assert_async().await;
        match error {
            RemoteError::Status { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid token");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        // bind then drop a listener to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let client = RemoteClient::new(&format!("http://127.0.0.1:{port}"), "repo-1", None).unwrap();

        let error = client.fetch_snapshot().await.err().unwrap();

        assert!(matches!(error, RemoteError::Unreachable { .. }));
    }
}
