//! Recommendation DTOs for the read surface.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Recommendation;

/// A stored recommendation as exposed over the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationDto {
    /// Row identifier.
    pub id: i64,
    /// Owning account.
    pub account_id: Uuid,
    /// Profile the prompt was built from.
    pub profile_id: i64,
    /// Proposal snapshot taken at generation time.
    pub proposal: ProposalSummaryDto,
    /// Generated recommendation text.
    pub recommendation: String,
    /// Token accounting for the generation request.
    pub usage: TokenUsageDto,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Embedded proposal projection.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProposalSummaryDto {
    /// Proposal title at generation time.
    pub title: String,
    /// Proposal body at generation time.
    pub body: String,
}

/// Token usage breakdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenUsageDto {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated in the completion.
    pub completion_tokens: u32,
    /// Provider-reported total.
    pub total_tokens: u32,
}

impl From<Recommendation> for RecommendationDto {
    fn from(rec: Recommendation) -> Self {
        Self {
            id: rec.id,
            account_id: rec.account_id,
            profile_id: rec.profile_id,
            proposal: ProposalSummaryDto {
                title: rec.proposal.title,
                body: rec.proposal.body,
            },
            recommendation: rec.recommendation,
            usage: TokenUsageDto {
                prompt_tokens: rec.usage.prompt_tokens,
                completion_tokens: rec.usage.completion_tokens,
                total_tokens: rec.usage.total_tokens,
            },
            created_at: rec.created_at,
        }
    }
}
