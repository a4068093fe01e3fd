//! Two-factor code format checks.
//!
//! Only the shape of a code is validated here; matching it against an
//! enrolled secret is out of scope.

use thiserror::Error;

pub const VERIFICATION_CODE_LEN: usize = 6;
pub const BACKUP_CODE_LEN: usize = 10;

/// Reason a submitted code was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TwoFactorError {
    #[error("Verification code must be 6 digits")]
    VerificationCodeLength,
    #[error("Verification code must contain only numbers")]
    VerificationCodeNotNumeric,
    #[error("Backup code must be 10 characters")]
    InvalidBackupCode,
}

/// Accepts exactly six ASCII digits.
pub fn validate_verification_code(code: &str) -> Result<(), TwoFactorError> {
    if code.chars().count() != VERIFICATION_CODE_LEN {
        return Err(TwoFactorError::VerificationCodeLength);
    }
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TwoFactorError::VerificationCodeNotNumeric);
    }
    Ok(())
}

/// Accepts any code of exactly ten characters.
pub fn validate_backup_code(code: &str) -> Result<(), TwoFactorError> {
    if code.chars().count() == BACKUP_CODE_LEN {
        Ok(())
    } else {
        Err(TwoFactorError::InvalidBackupCode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digit_code_accepted() {
        assert_eq!(validate_verification_code("123456"), Ok(()));
        assert_eq!(validate_verification_code("000000"), Ok(()));
    }

    #[test]
    fn wrong_length_code_rejected() {
        let err = validate_verification_code("12345").unwrap_err();
        assert_eq!(err.to_string(), "Verification code must be 6 digits");
        assert_eq!(
            validate_verification_code("1234567"),
            Err(TwoFactorError::VerificationCodeLength)
        );
        assert_eq!(
            validate_verification_code(""),
            Err(TwoFactorError::VerificationCodeLength)
        );
    }

    #[test]
    fn non_numeric_code_rejected() {
        let err = validate_verification_code("12a456").unwrap_err();
        assert_eq!(err.to_string(), "Verification code must contain only numbers");
        assert_eq!(
            validate_verification_code("１２３４５６"),
            Err(TwoFactorError::VerificationCodeNotNumeric)
        );
    }

    #[test]
    fn backup_codes() {
        assert_eq!(validate_backup_code("AB12CD34EF"), Ok(()));
        let err = validate_backup_code("AB12CD34E").unwrap_err();
        assert_eq!(err.to_string(), "Backup code must be 10 characters");
        assert!(validate_backup_code("AB12CD34EF0").is_err());
        assert!(validate_backup_code("").is_err());
    }

    #[test]
    fn backup_code_length_is_the_only_rule() {
        assert_eq!(validate_backup_code("AB12-D34EF"), Ok(()));
        assert_eq!(validate_backup_code("ab cd ef g"), Ok(()));
        assert_eq!(validate_backup_code("ÄÖÜäöüßéèê"), Ok(()));
    }
}
