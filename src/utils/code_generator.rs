//! Short path generation and shape validation.
//!
//! Codes are drawn uniformly from the 62-character alphanumeric alphabet.
//! They are not security tokens: a thread-local PRNG is sufficient, and
//! collisions are handled by the allocator rather than prevented here.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// Length of generated short paths.
pub const SHORT_PATH_LENGTH: usize = 7;

/// Alphabet for generated short paths: `a-z`, `A-Z`, `0-9`.
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a random alphanumeric short path of `length` characters.
///
/// # Errors
///
/// Returns [`AppError::InvalidLength`] if `length <= 0`.
///
/// # Examples
///
/// ```ignore
/// let code = generate_short_path(7)?;
/// assert_eq!(code.len(), 7);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_short_path(length: i64) -> Result<String, AppError> {
    if length <= 0 {
        return Err(AppError::InvalidLength { length });
    }

    let mut rng = rand::rng();

    Ok((0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect())
}

/// Checks that a short path is exactly [`SHORT_PATH_LENGTH`] ASCII alphanumerics.
///
/// # Errors
///
/// Returns [`AppError::InvalidLength`] for a wrong length and
/// [`AppError::MalformedRequest`] for a non-alphanumeric character.
pub fn validate_short_path(short_path: &str) -> Result<(), AppError> {
    if short_path.len() != SHORT_PATH_LENGTH {
        return Err(AppError::InvalidLength {
            length: short_path.len() as i64,
        });
    }

    if !short_path.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::malformed_request(
            "The shortened path should contain only alphanumeric characters",
            json!({ "short_path": short_path }),
        ));
    }

    Ok(())
}
