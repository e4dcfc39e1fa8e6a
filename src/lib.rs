//! Sahaay: conversation core for a neighbourhood chat assistant, built for a
//! strictly linted crate.
//!
//! The crate owns the append-only conversation store, the send pipeline that
//! turns one user input into stored messages, the consent-gated enrichment
//! signals, and the canned fallback path used when the response service is
//! unreachable. Rendering and the real AI back-end stay behind traits.

// No dangerous or non-idiomatic practices
#![deny(warnings)] // All warnings are treated as errors
#![deny(unsafe_code)] // Unsafe code is forbidden
#![deny(missing_docs)] // Every public item must be documented
#![deny(dead_code)] // Unused code is forbidden
#![deny(non_camel_case_types)]
// Extra options so nothing slips through
#![deny(unused_imports)]
#![deny(unused_variables)]
#![deny(unused_must_use)] // Result and Option must be handled explicitly
#![deny(non_snake_case)]
#![deny(non_upper_case_globals)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]
// Clippy for strict discipline
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::module_inception)]
#![deny(clippy::redundant_clone)]
#![deny(clippy::shadow_unrelated)]
// Safety and robustness
#![deny(overflowing_literals)]
// Tests use plain asserts and fixtures
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

/// Chat data model: identifiers, messages, events, errors, consents.
pub mod chat;
/// Runtime configuration with environment overrides.
pub mod config;
/// Consent-gated enrichment signals (mood, locality).
pub mod enrichment;
/// Remote text-generation collaborator and its Ollama implementation.
pub mod llm;
/// User-facing transient notifications.
pub mod notify;
/// Send pipeline orchestration, fallback selection, attachment intake.
pub mod pipeline;
/// Entry helpers to start the Sahaay terminal chat.
#[allow(clippy::print_stdout)]
pub mod start_sahaay;
/// Persistent conversation storage (key-value log, chat directory).
pub mod storage;
