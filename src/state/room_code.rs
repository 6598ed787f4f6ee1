//! Human-shareable room join codes.

use rand::Rng;

const ROOM_CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Number of characters in a join code.
pub const ROOM_CODE_LENGTH: usize = 4;

/// Draw a fresh code, each character chosen uniformly from `A-Z`.
///
/// Uniqueness is not checked; collisions across 26^4 codes are accepted.
pub fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| ROOM_CODE_CHARS[rng.random_range(0..ROOM_CODE_CHARS.len())] as char)
        .collect()
}

/// Whether `code` is exactly four uppercase ASCII letters.
pub fn is_valid_room_code(code: &str) -> bool {
    code.len() == ROOM_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Trim and uppercase user input so lookups are case-insensitive.
pub fn normalize_room_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_four_uppercase_letters() {
        for _ in 0..1000 {
            let code = generate_room_code();
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()), "{code}");
            assert!(is_valid_room_code(&code));
        }
    }

    #[test]
    fn validates_code_shape() {
        assert!(is_valid_room_code("ABCD"));
        assert!(!is_valid_room_code("abcd"));
        assert!(!is_valid_room_code("ABC"));
        assert!(!is_valid_room_code("ABCDE"));
        assert!(!is_valid_room_code("AB1D"));
        assert!(!is_valid_room_code("ÄBCD"));
    }

    #[test]
    fn normalizes_user_input() {
        assert_eq!(normalize_room_code("  abcd "), "ABCD");
        assert_eq!(normalize_room_code("XyZw"), "XYZW");
    }
}
