//! # Pratik Core
//!
//! The domain layer of the Pratik blog client.
//! This crate contains the client-side logic with zero infrastructure
//! dependencies: the paginated feed, authoring, the featured carousel, the
//! theme preference and text-to-speech playback. Everything external is
//! reached through the traits in [`ports`].

pub mod authoring;
pub mod carousel;
pub mod domain;
pub mod error;
pub mod feed;
pub mod pcm;
pub mod playback;
pub mod ports;
pub mod speech;
pub mod theme;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{DomainError, StoreError};
