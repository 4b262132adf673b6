//! Utility functions for code generation, URL validation and error classification.
//!
//! - [`code_generator`] - Short path generation and shape validation
//! - [`url_validator`] - Destination URL validation and host denylist
//! - [`db_error`] - Recognizing short path collisions in database errors

pub mod code_generator;
pub mod db_error;
pub mod url_validator;
