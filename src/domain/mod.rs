//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - The [`entities::Mapping`] record and the staleness window
//! - [`repositories`] - Data access trait definitions
//! - [`clock`] - Substitutable time source
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business rules live in [`crate::application::services`].

pub mod clock;
pub mod entities;
pub mod repositories;
