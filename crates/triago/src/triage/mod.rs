//! Triage data module.
//!
//! Read-only datasets behind the history and admin dashboard pages.

mod data;
mod models;

pub use data::{admin_stats, sample_history};
pub use models::*;
