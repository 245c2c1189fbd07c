//! Short code generation and custom alias validation.
//!
//! Generated codes are drawn uniformly from a 36-symbol URL-safe alphabet;
//! collisions are the uniqueness resolver's problem, not this module's.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Length of generated short codes.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Lowercase alphanumerics. Codes are stored lower-cased, so generating from
/// a case-folded alphabet keeps the draw uniform.
const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Route names that a user alias must never shadow.
const RESERVED_ALIASES: &[&str] = &[
    "shorten",
    "bulk-shorten",
    "stats",
    "health",
    "qr",
    "api",
    "admin",
    "dashboard",
    "static",
    "assets",
    "metrics",
    "docs",
];

/// Format rule for caller-chosen aliases.
static ALIAS_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,30}$").unwrap());

/// Generates a random short code of the requested length.
///
/// Uniform over [`CODE_ALPHABET`]; with the default length the keyspace is
/// 36^7, so a handful of existence-check retries absorbs any realistic
/// collision rate.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Case-insensitive membership in the reserved route-name set.
pub fn is_reserved(alias: &str) -> bool {
    RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
}

/// Whether the alias matches `^[A-Za-z0-9_-]{3,30}$`.
pub fn validate_format(alias: &str) -> bool {
    ALIAS_FORMAT.is_match(alias)
}

/// Validates a caller-chosen alias.
///
/// The reserved check runs before the format check so callers get a
/// deterministic error for inputs that fail both.
///
/// # Errors
///
/// [`AppError::ReservedAlias`] or [`AppError::InvalidAliasFormat`].
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if is_reserved(alias) {
        return Err(AppError::ReservedAlias {
            alias: alias.to_string(),
        });
    }

    if !validate_format(alias) {
        return Err(AppError::InvalidAliasFormat {
            alias: alias.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_requested_length() {
        assert_eq!(generate_code(DEFAULT_CODE_LENGTH).len(), 7);
        assert_eq!(generate_code(12).len(), 12);
    }

    #[test]
    fn test_generate_code_alphabet_membership() {
        let code = generate_code(64);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let mut codes = HashSet::new();
        for _ in 0..1000 {
            codes.insert(generate_code(DEFAULT_CODE_LENGTH));
        }
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_code_covers_full_alphabet() {
        // 1000 draws of 7 chars each; the chance of any alphabet symbol
        // never appearing is vanishingly small.
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            seen.extend(generate_code(DEFAULT_CODE_LENGTH).chars());
        }
        assert_eq!(seen.len(), CODE_ALPHABET.len());
    }

    #[test]
    fn test_validate_format_bounds() {
        assert!(validate_format("abc"));
        assert!(validate_format(&"a".repeat(30)));
        assert!(!validate_format("ab"));
        assert!(!validate_format(&"a".repeat(31)));
    }

    #[test]
    fn test_validate_format_charset() {
        assert!(validate_format("My-Link_2025"));
        assert!(!validate_format("my link"));
        assert!(!validate_format("my/link"));
        assert!(!validate_format("mylink!"));
    }

    #[test]
    fn test_reserved_is_case_insensitive() {
        assert!(is_reserved("stats"));
        assert!(is_reserved("STATS"));
        assert!(is_reserved("Health"));
        assert!(!is_reserved("statistics"));
    }

    #[test]
    fn test_reserved_checked_before_format() {
        // "qr" fails the format rule too; the reserved error must win.
        let err = validate_custom_alias("qr").unwrap_err();
        assert!(matches!(err, AppError::ReservedAlias { .. }));
    }

    #[test]
    fn test_custom_alias_format_error() {
        let err = validate_custom_alias("ab").unwrap_err();
        assert!(matches!(err, AppError::InvalidAliasFormat { .. }));

        let err = validate_custom_alias("spaces not ok").unwrap_err();
        assert!(matches!(err, AppError::InvalidAliasFormat { .. }));
    }

    #[test]
    fn test_custom_alias_accepts_valid() {
        assert!(validate_custom_alias("promo-2025").is_ok());
        assert!(validate_custom_alias("My_Link").is_ok());
    }

    #[test]
    fn test_all_reserved_aliases_rejected() {
        for &reserved in RESERVED_ALIASES {
            assert!(
                validate_custom_alias(reserved).is_err(),
                "reserved alias '{}' should be rejected",
                reserved
            );
        }
    }
}
