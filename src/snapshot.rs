//! Client for the Snapshot governance hub's GraphQL API.
//!
//! The hub exposes a single GraphQL endpoint. This client sends the two
//! query documents the pipeline needs (proposal by ID, space by ID) and
//! decodes the responses into [`crate::domain`] types. All failures,
//! including GraphQL-level errors and missing objects, surface as
//! [`BackendError::SnapshotUnavailable`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::{Proposal, Space};
use crate::error::BackendError;

const PROPOSAL_QUERY: &str = include_str!("text_templates/queries/proposal.graphql");
const SPACE_QUERY: &str = include_str!("text_templates/queries/space.graphql");

/// Snapshot hub GraphQL client.
///
/// Holds a shared [`reqwest::Client`] and the hub endpoint URL. Cheap to
/// clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct SnapshotClient {
    http: reqwest::Client,
    graphql_url: String,
}

/// GraphQL response envelope: either `data` or a non-empty `errors` array.
#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProposalData {
    proposal: Option<Proposal>,
}

#[derive(Debug, Deserialize)]
struct SpaceData {
    space: Option<Space>,
}

impl SnapshotClient {
    /// Creates a client for the hub at `graphql_url`.
    #[must_use]
    pub fn new(http: reqwest::Client, graphql_url: String) -> Self {
        Self { http, graphql_url }
    }

    /// Fetches a proposal by its hub identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::SnapshotUnavailable`] if the hub cannot be
    /// reached, rejects the query, or knows no proposal with this ID.
    pub async fn fetch_proposal(&self, proposal_id: &str) -> Result<Proposal, BackendError> {
        let data: ProposalData = self
            .execute(PROPOSAL_QUERY, json!({ "id": proposal_id }))
            .await?;
        data.proposal.ok_or_else(|| {
            BackendError::SnapshotUnavailable(format!("proposal `{proposal_id}` not found on hub"))
        })
    }

    /// Fetches a space by its identifier (e.g. `aave.eth`).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::SnapshotUnavailable`] if the hub cannot be
    /// reached, rejects the query, or knows no space with this ID.
    pub async fn fetch_space(&self, space_id: &str) -> Result<Space, BackendError> {
        let data: SpaceData = self
            .execute(SPACE_QUERY, json!({ "id": space_id }))
            .await?;
        data.space.ok_or_else(|| {
            BackendError::SnapshotUnavailable(format!("space `{space_id}` not found on hub"))
        })
    }

    /// Sends one GraphQL request and decodes the `data` payload.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, BackendError> {
        let payload = json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .http
            .post(&self.graphql_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BackendError::SnapshotUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::SnapshotUnavailable(format!(
                "hub returned HTTP {status}"
            )));
        }

        let envelope: GraphqlResponse<T> = response
            .json()
            .await
            .map_err(|e| BackendError::SnapshotUnavailable(format!("undecodable response: {e}")))?;

        if let Some(error) = envelope.errors.first() {
            return Err(BackendError::SnapshotUnavailable(format!(
                "hub rejected query: {}",
                error.message
            )));
        }

        envelope.data.ok_or_else(|| {
            BackendError::SnapshotUnavailable("response carried neither data nor errors".to_string())
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> SnapshotClient {
        SnapshotClient::new(reqwest::Client::new(), server.url())
    }

    #[tokio::test]
    async fn fetch_proposal_decodes_hub_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":{"proposal":{"id":"0xabc","title":"Raise the cap","body":"Full text.","space":{"id":"aave.eth"}}}}"#,
            )
            .create_async()
            .await;

        let result = client_for(&server).fetch_proposal("0xabc").await;
        let Ok(proposal) = result else {
            panic!("expected proposal, got {result:?}");
        };
        assert_eq!(proposal.id, "0xabc");
        assert_eq!(proposal.title, "Raise the cap");
        assert_eq!(proposal.space.id, "aave.eth");
    }

    #[tokio::test]
    async fn fetch_space_decodes_missing_about() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"space":{"id":"aave.eth","about":null}}}"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch_space("aave.eth").await;
        let Ok(space) = result else {
            panic!("expected space, got {result:?}");
        };
        assert_eq!(space.id, "aave.eth");
        assert!(space.about.is_none());
    }

    #[tokio::test]
    async fn unknown_proposal_maps_to_snapshot_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"proposal":null}}"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch_proposal("0xmissing").await;
        assert!(matches!(
            result,
            Err(BackendError::SnapshotUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn graphql_errors_map_to_snapshot_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"errors":[{"message":"syntax error"}]}"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch_proposal("0xabc").await;
        let Err(BackendError::SnapshotUnavailable(message)) = result else {
            panic!("expected SnapshotUnavailable, got {result:?}");
        };
        assert!(message.contains("syntax error"));
    }

    #[tokio::test]
    async fn http_failure_maps_to_snapshot_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(502)
            .create_async()
            .await;

        let result = client_for(&server).fetch_proposal("0xabc").await;
        assert!(matches!(
            result,
            Err(BackendError::SnapshotUnavailable(_))
        ));
    }
}
