//! Multivendor Core - Shared value types.
//!
//! This crate provides the value types used by the storefront and its tests:
//! - `storefront` - The shopper-facing front end and its resource clients
//! - `integration-tests` - Fake backend services and end-to-end flows
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! Wire models that mirror a particular backend payload live in the
//! storefront crate; the types here are the ones whose rules hold no matter
//! which service a value came from.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, roles, statuses and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
