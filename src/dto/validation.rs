//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::state::{couple::is_encodable_name, room_code::is_valid_room_code};

/// Validates a join code: exactly four ASCII letters, any case.
///
/// # Examples
///
/// ```ignore
/// validate_room_code("QZXW") // Ok
/// validate_room_code("qzxw") // Ok - normalized later
/// validate_room_code("QZX1") // Err - digit
/// ```
pub fn validate_room_code(code: &str) -> Result<(), ValidationError> {
    if is_valid_room_code(&code.to_ascii_uppercase()) {
        return Ok(());
    }

    let mut err = ValidationError::new("room_code_format");
    err.message = Some(format!("Room code must be 4 letters (got `{code}`)").into());
    Err(err)
}

/// Validates a player display name: not blank once trimmed.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("display_name_empty");
        err.message = Some("Display name must not be empty".into());
        return Err(err);
    }

    Ok(())
}

/// Validates one side of a guessed couple. Empty is allowed (no guess).
pub fn validate_guess_name(name: &str) -> Result<(), ValidationError> {
    if !is_encodable_name(name) {
        let mut err = ValidationError::new("guess_name_separator");
        err.message = Some(format!("Name `{name}` must not contain ` & `").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_room_code() {
        assert!(validate_room_code("ABCD").is_ok());
        assert!(validate_room_code("abcd").is_ok());
        assert!(validate_room_code("ABC").is_err()); // too short
        assert!(validate_room_code("ABCDE").is_err()); // too long
        assert!(validate_room_code("AB1D").is_err()); // digit
        assert!(validate_room_code("").is_err());
    }

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("Alice").is_ok());
        assert!(validate_display_name("  Bob ").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
    }

    #[test]
    fn test_validate_guess_name() {
        assert!(validate_guess_name("Halle Berry").is_ok());
        assert!(validate_guess_name("").is_ok());
        assert!(validate_guess_name("Tom & Jerry").is_err());
    }
}
