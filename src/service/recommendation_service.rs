//! Recommendation pipeline: webhook event to stored rows and emails.

use tracing::{error, info, warn};

use crate::completions::{CompletionRequest, CompletionRouter};
use crate::domain::ProposalSummary;
use crate::error::BackendError;
use crate::mailer::Mailer;
use crate::persistence::{EligibleMember, PostgresStore};
use crate::prompt;
use crate::snapshot::SnapshotClient;

/// Per-invocation outcome counts for one webhook event.
///
/// A member is *succeeded* once their row is durably inserted (even if
/// the follow-up email fails), *skipped* when their chosen model has no
/// wired provider, and *failed* on any other per-member error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Members whose recommendation row was inserted.
    pub succeeded: usize,

    /// Members skipped because their model has no provider.
    pub skipped: usize,

    /// Members whose completion or insert failed.
    pub failed: usize,
}

/// Orchestrates the webhook-to-email pipeline.
///
/// Stateless coordinator: owns the Snapshot client for proposal data,
/// the completion router for model dispatch, the store for durable rows,
/// and the mailer for the post-insert summary. Per-member failures are
/// contained; only up-front failures (bad payload, unreachable hub)
/// abort the whole invocation.
#[derive(Debug)]
pub struct RecommendationService {
    snapshot: SnapshotClient,
    router: CompletionRouter,
    store: PostgresStore,
    mailer: Mailer,
}

impl RecommendationService {
    /// Creates a new `RecommendationService`.
    #[must_use]
    pub fn new(
        snapshot: SnapshotClient,
        router: CompletionRouter,
        store: PostgresStore,
        mailer: Mailer,
    ) -> Self {
        Self {
            snapshot,
            router,
            store,
            mailer,
        }
    }

    /// Runs the pipeline for one webhook event.
    ///
    /// Strips the `proposal/` prefix, fetches the proposal and its space
    /// once up front, then processes every eligible member inside an
    /// isolated failure boundary.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidWebhook`] for a malformed event ID,
    /// [`BackendError::SnapshotUnavailable`] when the up-front fetches
    /// fail, and [`BackendError::Persistence`] when the member list
    /// cannot be loaded. Per-member failures are counted, not returned.
    pub async fn process_webhook(&self, webhook_id: &str) -> Result<BatchSummary, BackendError> {
        let proposal_id = parse_webhook_id(webhook_id)?;

        let proposal = self.snapshot.fetch_proposal(proposal_id).await?;
        let space = self.snapshot.fetch_space(&proposal.space.id).await?;
        let members = self.store.load_eligible_members().await?;

        let about_statement = prompt::about_statement(space.about.as_deref());
        let proposal_statement = prompt::proposal_statement(&proposal);
        let stored_proposal = ProposalSummary {
            title: proposal.title,
            body: proposal.body,
        };

        let mut summary = BatchSummary::default();
        for member in &members {
            let outcome = self
                .process_member(member, &about_statement, &proposal_statement, &stored_proposal)
                .await;
            record_outcome(&mut summary, member.profile.id, outcome);
        }

        info!(
            proposal_id,
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            failed = summary.failed,
            "webhook processed"
        );
        Ok(summary)
    }

    /// Generates, persists, and mails one member's recommendation.
    ///
    /// The email is sent only after the insert returns; a mail failure is
    /// logged and swallowed, the durable row is the source of truth.
    async fn process_member(
        &self,
        member: &EligibleMember,
        about_statement: &str,
        proposal_statement: &str,
        proposal: &ProposalSummary,
    ) -> Result<(), BackendError> {
        let request = CompletionRequest {
            model: member.profile.language_model,
            about_statement: about_statement.to_string(),
            proposal_statement: proposal_statement.to_string(),
            personal_statement: prompt::personal_statement(&member.profile),
        };

        let response = self.router.complete(&request).await?;

        let stored = self
            .store
            .insert_recommendation(
                member.profile.account_id,
                member.profile.id,
                proposal,
                &response.completion,
                &response.usage,
            )
            .await?;

        if let Err(e) = self
            .mailer
            .send_recommendation_summary(
                &member.email,
                &stored.proposal,
                &stored.recommendation,
                stored.usage.total_tokens,
            )
            .await
        {
            warn!(
                recommendation_id = stored.id,
                error = %e,
                "summary email failed, recommendation row kept"
            );
        }

        Ok(())
    }
}

/// Folds one member's outcome into the batch summary.
///
/// Skips are expected while providers are unwired, so they log at warn;
/// every other failure logs at error.
fn record_outcome(summary: &mut BatchSummary, profile_id: i64, outcome: Result<(), BackendError>) {
    match outcome {
        Ok(()) => summary.succeeded += 1,
        Err(BackendError::ProviderUnimplemented(model)) => {
            warn!(
                profile_id,
                model, "no provider wired for member's model, skipping"
            );
            summary.skipped += 1;
        }
        Err(e) => {
            error!(profile_id, error = %e, "member failed");
            summary.failed += 1;
        }
    }
}

/// Extracts the hub proposal ID from a webhook event ID.
fn parse_webhook_id(webhook_id: &str) -> Result<&str, BackendError> {
    match webhook_id.strip_prefix("proposal/") {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(BackendError::InvalidWebhook(format!(
            "id `{webhook_id}` does not carry the `proposal/` prefix"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn webhook_id_prefix_is_stripped() {
        let Ok(id) = parse_webhook_id("proposal/0xabc123") else {
            panic!("expected id");
        };
        assert_eq!(id, "0xabc123");
    }

    #[test]
    fn missing_prefix_is_invalid() {
        let result = parse_webhook_id("0xabc123");
        assert!(matches!(result, Err(BackendError::InvalidWebhook(_))));
    }

    #[test]
    fn bare_prefix_is_invalid() {
        let result = parse_webhook_id("proposal/");
        assert!(matches!(result, Err(BackendError::InvalidWebhook(_))));
    }

    #[test]
    fn summary_starts_at_zero() {
        let summary = BatchSummary::default();
        assert_eq!(summary, BatchSummary {
            succeeded: 0,
            skipped: 0,
            failed: 0
        });
    }

    #[test]
    fn outcomes_fold_into_the_summary() {
        let mut summary = BatchSummary::default();
        record_outcome(&mut summary, 1, Ok(()));
        record_outcome(&mut summary, 2, Err(BackendError::ProviderUnimplemented("llama2")));
        record_outcome(&mut summary, 3, Err(BackendError::Completion("boom".to_string())));
        assert_eq!(summary, BatchSummary {
            succeeded: 1,
            skipped: 1,
            failed: 1
        });
    }
}
