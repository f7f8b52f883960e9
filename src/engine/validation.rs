//! Pure input validation
//!
//! Everything here runs before any lock is taken, so a rejection has zero
//! side effects and the caller can resubmit with a fresh token.

use super::error::LedgerError;
use rust_decimal::Decimal;

/// Maximum fractional digits an amount may carry (NUMERIC(19,4) storage)
pub const AMOUNT_SCALE: u32 = 4;

/// Reject non-positive amounts and amounts finer than the storage scale
pub fn positive_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}

/// Reject empty or blank idempotency tokens
pub fn idempotency_token(token: &str) -> Result<(), LedgerError> {
    if token.trim().is_empty() {
        return Err(LedgerError::InvalidIdempotencyKey);
    }
    Ok(())
}

/// Normalize a currency code to uppercase, rejecting malformed ones.
///
/// ISO 4217 codes are 3 chars; crypto tickers may run longer, so 3-10 is
/// accepted. The code is immutable once the wallet exists.
pub fn currency_code(code: &str) -> Result<String, LedgerError> {
    let trimmed = code.trim();
    if trimmed.len() < 3 || trimmed.len() > 10 || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(LedgerError::InvalidCurrency(code.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_positive_amount_accepts() {
        assert!(positive_amount(dec("0.0001")).is_ok());
        assert!(positive_amount(dec("100.00")).is_ok());
        assert!(positive_amount(dec("999999999999999.9999")).is_ok());
    }

    #[test]
    fn test_positive_amount_rejects_zero_and_negative() {
        assert_eq!(positive_amount(dec("0")).unwrap_err().code(), "INVALID_AMOUNT");
        assert_eq!(
            positive_amount(dec("-0.01")).unwrap_err().code(),
            "INVALID_AMOUNT"
        );
    }

    #[test]
    fn test_positive_amount_rejects_sub_scale() {
        // Finer than 4 decimal places cannot be represented in NUMERIC(19,4)
        assert_eq!(
            positive_amount(dec("0.00001")).unwrap_err().code(),
            "INVALID_AMOUNT"
        );
        // Trailing zeros beyond scale 4 are fine after normalization
        assert!(positive_amount(dec("1.230000")).is_ok());
    }

    #[test]
    fn test_idempotency_token() {
        assert!(idempotency_token("D1").is_ok());
        assert_eq!(
            idempotency_token("").unwrap_err().code(),
            "INVALID_IDEMPOTENCY_KEY"
        );
        assert_eq!(
            idempotency_token("   ").unwrap_err().code(),
            "INVALID_IDEMPOTENCY_KEY"
        );
    }

    #[test]
    fn test_currency_code_normalizes() {
        assert_eq!(currency_code("usd").unwrap(), "USD");
        assert_eq!(currency_code(" eur ").unwrap(), "EUR");
        assert_eq!(currency_code("USDT").unwrap(), "USDT");
    }

    #[test]
    fn test_currency_code_rejects() {
        assert_eq!(currency_code("us").unwrap_err().code(), "INVALID_CURRENCY");
        assert_eq!(
            currency_code("VERYLONGCODE").unwrap_err().code(),
            "INVALID_CURRENCY"
        );
        assert_eq!(currency_code("U$D").unwrap_err().code(), "INVALID_CURRENCY");
    }
}
