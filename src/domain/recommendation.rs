//! Recommendation aggregate persisted by the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated voting recommendation for one member and one proposal.
///
/// Rows are append-only. Replayed webhooks create additional rows rather
/// than overwriting earlier ones, so the history of what each member was
/// told is preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Database row identifier.
    pub id: i64,

    /// Account the recommendation belongs to.
    pub account_id: Uuid,

    /// Profile the prompt was built from at generation time.
    pub profile_id: i64,

    /// Snapshot of the proposal the recommendation addresses.
    pub proposal: ProposalSummary,

    /// The model-generated recommendation text.
    pub recommendation: String,

    /// Token accounting reported by the completion provider.
    pub usage: TokenUsage,

    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Denormalized proposal snapshot stored alongside each recommendation.
///
/// Proposals on the hub are mutable until they close; storing the title
/// and body at generation time keeps the row meaningful even after the
/// upstream proposal changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalSummary {
    /// Proposal title at generation time.
    pub title: String,

    /// Proposal body at generation time.
    pub body: String,
}

/// Token usage reported by the completion provider for one request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,

    /// Tokens generated in the completion.
    pub completion_tokens: u32,

    /// Provider-reported total.
    pub total_tokens: u32,
}
