//! Core types and logic for the borelog geotechnical record store.
//!
//! This crate has no HTTP or database dependencies. It
//! holds the entity model, the field validator, the display serializer, the
//! paginator, the profile aggregator and the [`store::LogStore`] trait that
//! storage backends implement.

// Native `async fn` in traits; the store trait spells out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod decimal;
pub mod model;
pub mod paginate;
pub mod profile;
pub mod record;
pub mod sketch;
pub mod store;
pub mod validate;

pub use decimal::Decimal;
pub use sketch::{DataUri, DataUriError};
pub use validate::{EntityKind, ValidationError};
