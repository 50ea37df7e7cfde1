//! Pure builders for the three prompt statements.
//!
//! The completion providers assemble their prompts from three statements:
//! what the organization is about, what the proposal says, and who the
//! member is. These builders are pure string functions so that every
//! provider shares identical phrasing and the tests can pin it down.

use crate::domain::{Profile, Proposal};

/// Builds the organization statement from a space's `about` text.
///
/// Returns the empty string when the space has no description (absent or
/// empty), so the statement can be interpolated unconditionally.
#[must_use]
pub fn about_statement(space_about: Option<&str>) -> String {
    match space_about {
        Some(about) if !about.is_empty() => {
            format!("The point of the organization is {about}")
        }
        _ => String::new(),
    }
}

/// Builds the proposal statement: title and body separated by a blank line.
#[must_use]
pub fn proposal_statement(proposal: &Proposal) -> String {
    format!("{}\n\n{}", proposal.title, proposal.body)
}

/// Builds the personal statement from a profile.
///
/// Each fragment is appended only when the underlying field is present and
/// non-empty. A profile with no name still yields a bio-only statement; a
/// profile with nothing set yields the empty string.
#[must_use]
pub fn personal_statement(profile: &Profile) -> String {
    let mut statement = String::new();
    if let Some(first_name) = non_empty(profile.first_name.as_deref()) {
        statement.push_str(&format!("The user's name is {first_name} "));
    }
    if let Some(last_name) = non_empty(profile.last_name.as_deref()) {
        statement.push_str(&format!("{last_name}. "));
    }
    if let Some(bio) = non_empty(profile.bio.as_deref()) {
        statement.push_str(&format!("Here is their bio: {bio}"));
    }
    statement
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{LanguageModel, SpaceRef};

    fn proposal() -> Proposal {
        Proposal {
            id: "0xabc".to_string(),
            title: "Raise the borrow cap".to_string(),
            body: "We propose raising the cap to 2M.".to_string(),
            space: SpaceRef {
                id: "aave.eth".to_string(),
            },
        }
    }

    fn profile(first: Option<&str>, last: Option<&str>, bio: Option<&str>) -> Profile {
        Profile {
            id: 1,
            account_id: uuid::Uuid::new_v4(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            bio: bio.map(str::to_string),
            subscribed_to_emails: true,
            language_model: LanguageModel::Gpt4,
        }
    }

    #[test]
    fn about_statement_wraps_description() {
        let statement = about_statement(Some("decentralized lending"));
        assert_eq!(
            statement,
            "The point of the organization is decentralized lending"
        );
    }

    #[test]
    fn about_statement_is_empty_without_description() {
        assert_eq!(about_statement(None), "");
        assert_eq!(about_statement(Some("")), "");
    }

    #[test]
    fn proposal_statement_joins_title_and_body() {
        let statement = proposal_statement(&proposal());
        assert_eq!(
            statement,
            "Raise the borrow cap\n\nWe propose raising the cap to 2M."
        );
    }

    #[test]
    fn personal_statement_with_full_profile() {
        let statement = personal_statement(&profile(
            Some("Ada"),
            Some("Lovelace"),
            Some("Votes on risk parameters."),
        ));
        assert_eq!(
            statement,
            "The user's name is Ada Lovelace. Here is their bio: Votes on risk parameters."
        );
    }

    #[test]
    fn personal_statement_skips_missing_name_parts() {
        let statement = personal_statement(&profile(None, None, Some("Just a bio.")));
        assert_eq!(statement, "Here is their bio: Just a bio.");
    }

    #[test]
    fn personal_statement_with_first_name_only() {
        let statement = personal_statement(&profile(Some("Ada"), None, Some("Bio.")));
        assert_eq!(statement, "The user's name is Ada Here is their bio: Bio.");
    }

    #[test]
    fn personal_statement_empty_for_blank_profile() {
        assert_eq!(personal_statement(&profile(None, None, None)), "");
    }
}
