//! Recommendation summary emails over async SMTP.
//!
//! After a recommendation row is durably created, the pipeline hands the
//! stored fields to [`Mailer::send_recommendation_summary`]. The body is
//! rendered from a shipped text template; an HTML alternative is derived
//! from the same rendered text with a markdown pass, so members with
//! plain-text clients read the exact same content.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config::AppConfig;
use crate::domain::ProposalSummary;
use crate::error::BackendError;

const SUMMARY_TEMPLATE: &str =
    include_str!("text_templates/emails/recommendation_summary.txt");

/// Async SMTP mailer for recommendation summaries.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer").field("from", &self.from).finish()
    }
}

impl Mailer {
    /// Builds the mailer from the loaded configuration.
    ///
    /// Uses STARTTLS against the configured relay; credentials are
    /// attached only when both username and password are set.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError::Mail`] if the relay host or sender
    /// address is malformed.
    pub fn from_config(config: &AppConfig) -> Result<Self, BackendError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| BackendError::Mail(e.to_string()))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) =
            (config.smtp_username.clone(), config.smtp_password.clone())
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        let from = config
            .email_from
            .parse::<Mailbox>()
            .map_err(|e| BackendError::Mail(format!("invalid sender address: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Renders and sends the summary for one stored recommendation.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError::Mail`] if the recipient address is
    /// malformed, the template fails to render, or the relay rejects the
    /// message. The caller decides whether that failure matters; the
    /// recommendation row is already durable by the time this runs.
    pub async fn send_recommendation_summary(
        &self,
        recipient: &str,
        proposal: &ProposalSummary,
        recommendation: &str,
        total_tokens: u32,
    ) -> Result<(), BackendError> {
        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| BackendError::Mail(format!("invalid recipient address: {e}")))?;

        let body = render_summary_body(proposal, recommendation, total_tokens)?;
        let html = markdown_to_html(&body);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(summary_subject(proposal))
            .multipart(MultiPart::alternative_plain_html(body, html))
            .map_err(|e| BackendError::Mail(e.to_string()))?;

        debug!(%recipient, "sending recommendation summary");
        self.transport
            .send(message)
            .await
            .map_err(|e| BackendError::Mail(e.to_string()))?;
        Ok(())
    }
}

/// Builds the summary subject line for a proposal.
#[must_use]
pub fn summary_subject(proposal: &ProposalSummary) -> String {
    format!(
        "Diplomat proposal recommendation for {}",
        proposal.title
    )
}

/// Renders the plain-text summary body from the shipped template.
fn render_summary_body(
    proposal: &ProposalSummary,
    recommendation: &str,
    total_tokens: u32,
) -> Result<String, BackendError> {
    let env = minijinja::Environment::new();
    env.render_str(
        SUMMARY_TEMPLATE,
        minijinja::context! {
            proposal_title => proposal.title,
            proposal_body => proposal.body,
            diplomat_recommendation => recommendation,
            total_tokens => total_tokens,
        },
    )
    .map_err(|e| BackendError::Mail(format!("email template render failed: {e}")))
}

/// Derives the HTML alternative from the rendered plain-text body.
fn markdown_to_html(body: &str) -> String {
    let parser = pulldown_cmark::Parser::new(body);
    let mut html = String::with_capacity(body.len() * 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn proposal() -> ProposalSummary {
        ProposalSummary {
            title: "Raise the borrow cap".to_string(),
            body: "We propose raising the cap to 2M.".to_string(),
        }
    }

    #[test]
    fn subject_embeds_proposal_title() {
        assert_eq!(
            summary_subject(&proposal()),
            "Diplomat proposal recommendation for Raise the borrow cap"
        );
    }

    #[test]
    fn body_embeds_all_stored_fields() {
        let body = render_summary_body(&proposal(), "Vote for it.", 154);
        let Ok(body) = body else {
            panic!("render failed");
        };
        assert!(body.contains("Raise the borrow cap"));
        assert!(body.contains("We propose raising the cap to 2M."));
        assert!(body.contains("Vote for it."));
        assert!(body.contains("154 tokens"));
    }

    #[test]
    fn html_alternative_renders_headings() {
        let body = render_summary_body(&proposal(), "Vote for it.", 10);
        let Ok(body) = body else {
            panic!("render failed");
        };
        let html = markdown_to_html(&body);
        assert!(html.contains("<h1>"));
        assert!(html.contains("<h2>"));
        assert!(html.contains("Vote for it."));
    }
}
