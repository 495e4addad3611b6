//! Backend commit client.
//!
//! `POST {endpoint}?postid={post_id}` with a small JSON body. The response
//! status is logged and otherwise ignored.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::traits::{CommitClient, StorageError, StorageResult};

/// JSON body of a commit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPayload {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "originalname")]
    pub original_name: String,
    #[serde(rename = "filemime")]
    pub file_mime: String,
}

#[derive(Clone, Debug)]
pub struct HttpCommitClient {
    client: Client,
    endpoint: String,
}

impl HttpCommitClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CommitClient for HttpCommitClient {
    #[tracing::instrument(skip(self, file_mime))]
    async fn commit(
        &self,
        post_id: &str,
        remote_url: &str,
        original_name: &str,
        file_mime: &str,
    ) -> StorageResult<()> {
        let payload = CommitPayload {
            url: remote_url.to_string(),
            original_name: original_name.to_string(),
            file_mime: file_mime.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("postid", post_id)])
            .json(&payload)
            .send()
            .await
            .map_err(|e| StorageError::CommitFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Commit accepted");
        } else {
            tracing::warn!(
                status = status.as_u16(),
                post_id = %post_id,
                "Commit endpoint returned a non-success status"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_payload_wire_names() {
        let payload = CommitPayload {
            url: "https://x.test/a.webp".to_string(),
            original_name: "a.png".to_string(),
            file_mime: "application/octet-stream".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "URL": "https://x.test/a.webp",
                "originalname": "a.png",
                "filemime": "application/octet-stream"
            })
        );
    }

    #[tokio::test]
    async fn test_commit_posts_json_with_post_id_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/uploads/commit")
            .match_query(Matcher::UrlEncoded("postid".into(), "post 42".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "URL": "https://x.test/a.webp",
                "originalname": "a.png",
                "filemime": "application/octet-stream"
            })))
            .with_status(200)
            .create_async()
            .await;

        let client = HttpCommitClient::new(
            Client::new(),
            format!("{}/uploads/commit", server.url()),
        );
        client
            .commit(
                "post 42",
                "https://x.test/a.webp",
                "a.png",
                "application/octet-stream",
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_commit_ignores_error_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/commit")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = HttpCommitClient::new(Client::new(), format!("{}/commit", server.url()));
        let result = client
            .commit("p", "https://x.test/a", "a", "application/octet-stream")
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_commit_transport_failure() {
        let client = HttpCommitClient::new(Client::new(), "http://127.0.0.1:9/commit");
        let result = client
            .commit("p", "https://x.test/a", "a", "application/octet-stream")
            .await;

        assert!(matches!(result, Err(StorageError::CommitFailed(_))));
    }
}
