//! Persistence layer: PostgreSQL storage for accounts, profiles, and
//! recommendations.
//!
//! The concrete implementation uses `sqlx::PgPool` for async PostgreSQL
//! access. Row decoding maps stored strings and JSONB columns back into
//! [`crate::domain`] types.

pub mod models;
pub mod postgres;

pub use models::EligibleMember;
pub use postgres::PostgresStore;
