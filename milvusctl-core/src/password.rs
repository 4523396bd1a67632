//! Password strength policy for newly created project users.
//!
//! Milvus accepts weak passwords; this module enforces a stricter fixed rule
//! set before any account is created or rotated. Rules are checked in a fixed
//! order and the first violation wins; callers always see the earliest
//! failing rule, never an aggregate.

use crate::error::{MilvusCtlError, Result};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Special characters accepted by rule 5 of the policy.
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()-+";

/// The specific policy rule a candidate password failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordViolation {
    /// Rule 1: fewer than [`PASSWORD_MIN_LENGTH`] characters
    TooShort,
    /// Rule 2: no uppercase letter
    MissingUppercase,
    /// Rule 3: no lowercase letter
    MissingLowercase,
    /// Rule 4: no digit
    MissingDigit,
    /// Rule 5: no character from [`PASSWORD_SPECIAL_CHARS`]
    MissingSpecial,
}

impl std::fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort => write!(
                f,
                "Password must be at least {} characters long",
                PASSWORD_MIN_LENGTH
            ),
            Self::MissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            Self::MissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            Self::MissingDigit => write!(f, "Password must contain at least one digit"),
            Self::MissingSpecial => {
                write!(f, "Password must contain at least one special character")
            }
        }
    }
}

/// Checks a candidate password against the fixed strength policy.
///
/// Pure and deterministic: the same input always yields the same verdict and
/// nothing is logged. Rule order is part of the contract: a password failing
/// several rules reports only the first one.
///
/// # Errors
/// Returns [`MilvusCtlError::PasswordPolicy`] carrying the first violated rule.
pub fn check_password_strength(password: &str) -> Result<()> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(MilvusCtlError::password_policy(PasswordViolation::TooShort));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(MilvusCtlError::password_policy(
            PasswordViolation::MissingUppercase,
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(MilvusCtlError::password_policy(
            PasswordViolation::MissingLowercase,
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(MilvusCtlError::password_policy(
            PasswordViolation::MissingDigit,
        ));
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(MilvusCtlError::password_policy(
            PasswordViolation::MissingSpecial,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation_of(password: &str) -> PasswordViolation {
        match check_password_strength(password) {
            Err(MilvusCtlError::PasswordPolicy { violation }) => violation,
            other => panic!("expected a policy violation, got {:?}", other),
        }
    }

    #[test]
    fn test_strong_passwords_pass() {
        assert!(check_password_strength("Password123!").is_ok());
        assert!(check_password_strength("StrongP@ss1").is_ok());
    }

    #[test]
    fn test_length_violation_wins_over_later_rules() {
        // "Ab1!" also lacks nothing else, but short passwords must always
        // report the length rule first
        assert_eq!(violation_of("Ab1!"), PasswordViolation::TooShort);
        assert_eq!(violation_of("ab1!"), PasswordViolation::TooShort);
        assert_eq!(violation_of(""), PasswordViolation::TooShort);
    }

    #[test]
    fn test_uppercase_violation_before_digit_and_special() {
        // Long enough, missing uppercase, digits and specials: rule 2 wins
        assert_eq!(
            violation_of("lowercaseonly"),
            PasswordViolation::MissingUppercase
        );
        assert_eq!(
            violation_of("password123!"),
            PasswordViolation::MissingUppercase
        );
    }

    #[test]
    fn test_lowercase_violation() {
        assert_eq!(
            violation_of("PASSWORD123!"),
            PasswordViolation::MissingLowercase
        );
    }

    #[test]
    fn test_digit_violation() {
        assert_eq!(violation_of("Password!"), PasswordViolation::MissingDigit);
    }

    #[test]
    fn test_special_violation() {
        assert_eq!(violation_of("Password123"), PasswordViolation::MissingSpecial);
    }

    #[test]
    fn test_every_listed_special_character_accepted() {
        for special in PASSWORD_SPECIAL_CHARS.chars() {
            let password = format!("Passw0rd{}", special);
            assert!(
                check_password_strength(&password).is_ok(),
                "special character {:?} should satisfy rule 5",
                special
            );
        }
    }

    #[test]
    fn test_violation_messages() {
        assert_eq!(
            PasswordViolation::TooShort.to_string(),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            PasswordViolation::MissingSpecial.to_string(),
            "Password must contain at least one special character"
        );
    }
}
