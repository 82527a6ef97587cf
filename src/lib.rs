//! bugdeck - unified bug dashboard
//!
//! One queryable view over the bug reports scattered across Slack, Zendesk
//! and Shortcut. An out-of-process ingestion tier normalizes upstream items
//! into a key-value store hourly; bugdeck reads them back through a thin
//! HTTP query gateway, merges the per-source results, and renders a
//! filterable table plus flow/resolution analytics.
//!
//! The dashboard is read-only with one exception: the manual link
//! operation, which asserts that an old and a new ticket identifier refer
//! to the same issue.

pub mod api;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod filter;
pub mod gui;
pub mod metrics;

pub use domain::*;
