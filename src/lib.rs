//! # diplomat-backend
//!
//! Webhook-driven backend that turns Snapshot governance proposals into
//! per-member AI voting recommendations.
//!
//! A Snapshot webhook delivers a proposal event; the service fetches the
//! proposal and its space from the hub, then for every member with a
//! non-empty bio builds a prompt, asks the member's chosen language
//! model for a recommendation, stores the result, and emails a summary.
//! An authenticated read surface exposes the stored recommendations.
//!
//! ## Architecture
//!
//! ```text
//! Snapshot webhook / Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── RecommendationService (service/)
//!     │       ├── SnapshotClient (snapshot)
//!     │       ├── prompt builders (prompt)
//!     │       ├── CompletionRouter (completions/)
//!     │       └── Mailer (mailer)
//!     │
//!     └── PostgreSQL Persistence (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod completions;
pub mod config;
pub mod domain;
pub mod error;
pub mod mailer;
pub mod persistence;
pub mod prompt;
pub mod service;
pub mod snapshot;
