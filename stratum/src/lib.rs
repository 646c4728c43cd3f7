//! # Stratum - Hierarchical Document Settings Store
//!
//! Stratum lets a host entity expose one or more JSON-valued fields as
//! hierarchical key/value settings stores, with default-value overlay,
//! dot-path access, validation hooks and write-through persistence.
//!
//! ## Key Features
//!
//! - **Nested documents**: settings are trees of key-value pairs, addressed
//!   by dot paths (`"notify.sms"`)
//! - **Default overlay**: reads see the stored document recursively overlaid
//!   onto a read-only default document; defaults are never persisted
//! - **Flatten / unflatten**: any document converts to and from a flat
//!   dot-path mapping
//! - **Pluggable validation**: a [validation::Validator] is injected where
//!   stores are acquired and consulted before every commit
//! - **Pluggable persistence**: a [store::SettingsSink] commits whole
//!   document snapshots through a [store::SettingsHost] capability trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stratum::common::atomic;
//! use stratum::doc;
//! use stratum::store::{MemoryHost, SettingsHost, SettingsRegistry};
//! use stratum::common::Atomic;
//! use stratum::validation::RuleValidator;
//!
//! # fn main() -> stratum::errors::SettingsResult<()> {
//! let host = MemoryHost::new()
//!     .with_field(
//!         "preferences",
//!         doc!{ theme: "light", notify: { email: true, sms: false } },
//!         doc!{ theme: "in:light,dark" },
//!     )
//!     .default_field("preferences");
//!
//! let shared: Atomic<dyn SettingsHost + Send + Sync> = atomic(host);
//! let registry = SettingsRegistry::new(shared, Arc::new(RuleValidator));
//!
//! let mut store = registry.default_store()?;
//! store.set("notify.sms", true)?;
//! assert_eq!(store.get("theme")?.as_str(), Some("light"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Stratum is synchronous and performs no internal locking beyond guarding
//! individual host calls. If a host is shared across concurrent writers,
//! whole-document last-writer-wins races are possible; callers needing
//! atomicity must serialize access themselves.
//!
//! ## Module Organization
//!
//! - [`common`] - Constants and shared-state utilities
//! - [`document`] - Documents, values, dot-path operations, flattening
//! - [`errors`] - Error types and result definitions
//! - [`store`] - Settings stores, registry, host and sink contracts
//! - [`validation`] - Validation capability and the built-in rule interpreter

pub mod common;
pub mod document;
pub mod errors;
pub mod store;
pub mod validation;
