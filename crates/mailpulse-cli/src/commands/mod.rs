//! Command handlers grouped by route family.

pub(crate) mod accounts;
pub(crate) mod analytics;
pub(crate) mod auth;
pub(crate) mod billing;
pub(crate) mod reviews;
pub(crate) mod settings;
