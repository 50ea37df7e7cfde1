//! Member profile and language-model preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Language model a member has chosen for their recommendations.
///
/// Stored as the wire identifier string (`gpt-4`, `llama2`) in both the
/// database and JSON payloads. Adding a variant here forces the completion
/// router's `match` to be extended before the crate compiles again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageModel {
    /// OpenAI GPT-4 via the chat-completions API.
    #[serde(rename = "gpt-4")]
    Gpt4,

    /// Meta Llama 2. Selectable, but no provider is wired up yet.
    #[serde(rename = "llama2")]
    Llama2,
}

impl LanguageModel {
    /// Returns the wire identifier for this model.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt4 => "gpt-4",
            Self::Llama2 => "llama2",
        }
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gpt-4" => Ok(Self::Gpt4),
            "llama2" => Ok(Self::Llama2),
            other => Err(format!("unknown language model: {other}")),
        }
    }
}

/// Per-account profile holding the personal data the prompt builder reads.
///
/// One row per account. A member is eligible for recommendations only when
/// [`Self::bio`] is present and non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Profile row identifier.
    pub id: i64,

    /// Owning account.
    pub account_id: Uuid,

    /// Optional given name, woven into the personal statement.
    pub first_name: Option<String>,

    /// Optional family name.
    pub last_name: Option<String>,

    /// Free-text self-description. Empty or absent bios exclude the member
    /// from the recommendation pipeline.
    pub bio: Option<String>,

    /// Whether the member opted into summary emails.
    pub subscribed_to_emails: bool,

    /// The model used to generate this member's recommendations.
    pub language_model: LanguageModel,
}

impl Profile {
    /// Whether this profile qualifies for the recommendation pipeline.
    ///
    /// Mirrors the eligibility query in the persistence layer: the bio must
    /// be present and non-empty.
    #[must_use]
    pub fn has_bio(&self) -> bool {
        self.bio.as_deref().is_some_and(|bio| !bio.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn profile_with_bio(bio: Option<&str>) -> Profile {
        Profile {
            id: 1,
            account_id: Uuid::new_v4(),
            first_name: None,
            last_name: None,
            bio: bio.map(str::to_string),
            subscribed_to_emails: true,
            language_model: LanguageModel::Gpt4,
        }
    }

    #[test]
    fn model_round_trips_through_str() {
        for model in [LanguageModel::Gpt4, LanguageModel::Llama2] {
            let Ok(parsed) = model.as_str().parse::<LanguageModel>() else {
                panic!("round trip failed for {model}");
            };
            assert_eq!(parsed, model);
        }
    }

    #[test]
    fn unknown_model_is_rejected() {
        let result = "gpt-5".parse::<LanguageModel>();
        assert!(result.is_err());
    }

    #[test]
    fn model_serializes_as_wire_identifier() {
        let json = serde_json::to_string(&LanguageModel::Gpt4).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"gpt-4\"");
    }

    #[test]
    fn missing_bio_is_not_eligible() {
        assert!(!profile_with_bio(None).has_bio());
    }

    #[test]
    fn empty_bio_is_not_eligible() {
        assert!(!profile_with_bio(Some("")).has_bio());
    }

    #[test]
    fn non_empty_bio_is_eligible() {
        assert!(profile_with_bio(Some("on-chain governance nerd")).has_bio());
    }
}
