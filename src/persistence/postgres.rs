//! PostgreSQL implementation of the persistence layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::EligibleMember;
use crate::domain::{
    Account, LanguageModel, Profile, ProposalSummary, Recommendation, TokenUsage,
};
use crate::error::BackendError;

type RecommendationRow = (
    i64,
    Uuid,
    i64,
    serde_json::Value,
    String,
    serde_json::Value,
    DateTime<Utc>,
);

const RECOMMENDATION_COLUMNS: &str =
    "id, account_id, profile_id, proposal, recommendation, usage, created_at";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads every profile with a non-empty bio, joined with the owning
    /// account's email.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError::Persistence`] on database failure or when
    /// a stored language-model string no longer parses.
    pub async fn load_eligible_members(&self) -> Result<Vec<EligibleMember>, BackendError> {
        let rows = sqlx::query_as::<_, (i64, Uuid, Option<String>, Option<String>, Option<String>, bool, String, String)>(
            "SELECT p.id, p.account_id, p.first_name, p.last_name, p.bio, \
                    p.subscribed_to_emails, p.language_model, a.email \
             FROM profiles p JOIN accounts a ON a.id = p.account_id \
             WHERE p.bio IS NOT NULL AND p.bio <> '' \
             ORDER BY p.id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BackendError::Persistence(e.to_string()))?;

        rows.into_iter()
            .map(
                |(
                    id,
                    account_id,
                    first_name,
                    last_name,
                    bio,
                    subscribed_to_emails,
                    language_model,
                    email,
                )| {
                    let language_model = parse_language_model(&language_model)?;
                    Ok(EligibleMember {
                        profile: Profile {
                            id,
                            account_id,
                            first_name,
                            last_name,
                            bio,
                            subscribed_to_emails,
                            language_model,
                        },
                        email,
                    })
                },
            )
            .collect()
    }

    /// Inserts a recommendation row and returns the full stored record.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError::Persistence`] on database failure or if
    /// the aggregate cannot be encoded as JSON.
    pub async fn insert_recommendation(
        &self,
        account_id: Uuid,
        profile_id: i64,
        proposal: &ProposalSummary,
        recommendation: &str,
        usage: &TokenUsage,
    ) -> Result<Recommendation, BackendError> {
        let proposal_json = serde_json::to_value(proposal)
            .map_err(|e| BackendError::Persistence(e.to_string()))?;
        let usage_json =
            serde_json::to_value(usage).map_err(|e| BackendError::Persistence(e.to_string()))?;

        let (id, created_at) = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
            "INSERT INTO recommendations (account_id, profile_id, proposal, recommendation, usage) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id, created_at",
        )
        .bind(account_id)
        .bind(profile_id)
        .bind(&proposal_json)
        .bind(recommendation)
        .bind(&usage_json)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| BackendError::Persistence(e.to_string()))?;

        Ok(Recommendation {
            id,
            account_id,
            profile_id,
            proposal: proposal.clone(),
            recommendation: recommendation.to_string(),
            usage: *usage,
            created_at,
        })
    }

    /// Lists recommendations visible to the given account.
    ///
    /// Superusers see every row; anyone else sees only their own, newest
    /// first in both cases.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError::Persistence`] on database failure.
    pub async fn list_recommendations(
        &self,
        account_id: Uuid,
        is_superuser: bool,
    ) -> Result<Vec<Recommendation>, BackendError> {
        let rows = if is_superuser {
            sqlx::query_as::<_, RecommendationRow>(&format!(
                "SELECT {RECOMMENDATION_COLUMNS} FROM recommendations ORDER BY created_at DESC",
            ))
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, RecommendationRow>(&format!(
                "SELECT {RECOMMENDATION_COLUMNS} FROM recommendations \
                 WHERE account_id = $1 ORDER BY created_at DESC",
            ))
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| BackendError::Persistence(e.to_string()))?;

        rows.into_iter().map(decode_recommendation).collect()
    }

    /// Loads one recommendation by ID, scoped to the caller's visibility.
    ///
    /// Returns `None` both when the row does not exist and when it is
    /// owned by a different, non-superuser caller, so the API cannot leak
    /// row existence.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError::Persistence`] on database failure.
    pub async fn find_recommendation(
        &self,
        id: i64,
        account_id: Uuid,
        is_superuser: bool,
    ) -> Result<Option<Recommendation>, BackendError> {
        let row = if is_superuser {
            sqlx::query_as::<_, RecommendationRow>(&format!(
                "SELECT {RECOMMENDATION_COLUMNS} FROM recommendations WHERE id = $1",
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, RecommendationRow>(&format!(
                "SELECT {RECOMMENDATION_COLUMNS} FROM recommendations \
                 WHERE id = $1 AND account_id = $2",
            ))
            .bind(id)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
        }
        .map_err(|e| BackendError::Persistence(e.to_string()))?;

        row.map(decode_recommendation).transpose()
    }

    /// Loads an account by its identifier (the token `sub` claim).
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError::Persistence`] on database failure.
    pub async fn find_account(&self, id: Uuid) -> Result<Option<Account>, BackendError> {
        let row = sqlx::query_as::<_, (Uuid, String, String, bool, bool, bool, DateTime<Utc>)>(
            "SELECT id, email, username, is_staff, is_active, is_superuser, created_at \
             FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BackendError::Persistence(e.to_string()))?;

        Ok(row.map(
            |(id, email, username, is_staff, is_active, is_superuser, created_at)| Account {
                id,
                email,
                username,
                is_staff,
                is_active,
                is_superuser,
                created_at,
            },
        ))
    }
}

fn parse_language_model(stored: &str) -> Result<LanguageModel, BackendError> {
    stored
        .parse()
        .map_err(|e: String| BackendError::Persistence(e))
}

fn decode_recommendation(row: RecommendationRow) -> Result<Recommendation, BackendError> {
    let (id, account_id, profile_id, proposal, recommendation, usage, created_at) = row;
    let proposal: ProposalSummary =
        serde_json::from_value(proposal).map_err(|e| BackendError::Persistence(e.to_string()))?;
    let usage: TokenUsage =
        serde_json::from_value(usage).map_err(|e| BackendError::Persistence(e.to_string()))?;
    Ok(Recommendation {
        id,
        account_id,
        profile_id,
        proposal,
        recommendation,
        usage,
        created_at,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn decode_recommendation_maps_json_columns() {
        let account_id = Uuid::new_v4();
        let row: RecommendationRow = (
            7,
            account_id,
            3,
            serde_json::json!({"title": "Raise the cap", "body": "Full text."}),
            "Vote for it.".to_string(),
            serde_json::json!({"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}),
            Utc::now(),
        );
        let Ok(decoded) = decode_recommendation(row) else {
            panic!("decode failed");
        };
        assert_eq!(decoded.id, 7);
        assert_eq!(decoded.account_id, account_id);
        assert_eq!(decoded.proposal.title, "Raise the cap");
        assert_eq!(decoded.usage.total_tokens, 15);
    }

    #[test]
    fn decode_recommendation_rejects_malformed_usage() {
        let row: RecommendationRow = (
            1,
            Uuid::new_v4(),
            1,
            serde_json::json!({"title": "t", "body": "b"}),
            "text".to_string(),
            serde_json::json!({"prompt_tokens": "not-a-number"}),
            Utc::now(),
        );
        assert!(matches!(
            decode_recommendation(row),
            Err(BackendError::Persistence(_))
        ));
    }

    #[test]
    fn stored_language_model_round_trips() {
        let Ok(model) = parse_language_model("gpt-4") else {
            panic!("parse failed");
        };
        assert_eq!(model, LanguageModel::Gpt4);
        assert!(parse_language_model("gpt-5").is_err());
    }
}
