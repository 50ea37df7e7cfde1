//! Row aggregates produced by persistence queries.

use crate::domain::Profile;

/// A member eligible for the recommendation pipeline.
///
/// Joins the profile row with the owning account's email so the pipeline
/// can both build the prompt and address the summary email without a
/// second lookup.
#[derive(Debug, Clone)]
pub struct EligibleMember {
    /// The member's profile (bio guaranteed non-empty by the query).
    pub profile: Profile,

    /// The owning account's contact address.
    pub email: String,
}
