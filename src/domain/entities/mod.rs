//! Core domain entities.
//!
//! - [`Mapping`] - a stored short path and its destination
//! - [`NewMapping`] - input for inserting a mapping

pub mod mapping;

pub use mapping::{Mapping, NewMapping, STALENESS_WINDOW_DAYS, staleness_cutoff};
