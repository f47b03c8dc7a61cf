use thiserror::Error;

use crate::domain::CardDetails;

pub const CARD_NUMBER_LEN: usize = 16;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardValidationError {
    #[error("Card number must be 16 digits")]
    CardNumberInvalid,

    #[error("CVC must be 3 or 4 digits")]
    CvcInvalid,

    #[error("Expiration month must be between 01 and 12")]
    ExpMonthInvalid,

    #[error("Expiration year must be 2 or 4 digits")]
    ExpYearInvalid,

    #[error("Card holder is required")]
    CardHolderRequired,
}

impl CardValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            CardValidationError::CardNumberInvalid => "CARD_NUMBER_INVALID",
            CardValidationError::CvcInvalid => "CVC_INVALID",
            CardValidationError::ExpMonthInvalid => "EXP_MONTH_INVALID",
            CardValidationError::ExpYearInvalid => "EXP_YEAR_INVALID",
            CardValidationError::CardHolderRequired => "CARD_HOLDER_REQUIRED",
        }
    }
}

pub type CardValidationResult = Result<(), CardValidationError>;

fn is_digits(value: &str, lengths: &[usize]) -> bool {
    lengths.contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_card_number(number: &str) -> CardValidationResult {
    if !is_digits(number, &[CARD_NUMBER_LEN]) {
        return Err(CardValidationError::CardNumberInvalid);
    }
    Ok(())
}

pub fn validate_cvc(cvc: &str) -> CardValidationResult {
    if !is_digits(cvc, &[3, 4]) {
        return Err(CardValidationError::CvcInvalid);
    }
    Ok(())
}

/// Accepts `01` through `12`, always two digits.
pub fn validate_exp_month(exp_month: &str) -> CardValidationResult {
    let valid = is_digits(exp_month, &[2])
        && matches!(exp_month.parse::<u8>(), Ok(month) if (1..=12).contains(&month));
    if !valid {
        return Err(CardValidationError::ExpMonthInvalid);
    }
    Ok(())
}

pub fn validate_exp_year(exp_year: &str) -> CardValidationResult {
    if !is_digits(exp_year, &[2, 4]) {
        return Err(CardValidationError::ExpYearInvalid);
    }
    Ok(())
}

pub fn validate_card_holder(card_holder: &str) -> CardValidationResult {
    if card_holder.is_empty() {
        return Err(CardValidationError::CardHolderRequired);
    }
    Ok(())
}

/// Checks card fields in a fixed order and reports only the first failure.
pub fn validate_card(card: &CardDetails) -> CardValidationResult {
    validate_card_number(&card.number)?;
    validate_cvc(&card.cvc)?;
    validate_exp_month(&card.exp_month)?;
    validate_exp_year(&card.exp_year)?;
    validate_card_holder(&card.card_holder)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_card() -> CardDetails {
        CardDetails {
            number: "4242424242424242".to_string(),
            cvc: "123".to_string(),
            exp_month: "08".to_string(),
            exp_year: "28".to_string(),
            card_holder: "José Pérez".to_string(),
        }
    }

    #[test]
    fn accepts_valid_card() {
        assert!(validate_card(&valid_card()).is_ok());
    }

    #[test]
    fn validates_card_number() {
        assert!(validate_card_number("4242424242424242").is_ok());
        assert_eq!(
            validate_card_number("123"),
            Err(CardValidationError::CardNumberInvalid)
        );
        assert!(validate_card_number("4242 4242 4242 4242").is_err());
        assert!(validate_card_number("42424242424242420").is_err());
        assert!(validate_card_number("424242424242424a").is_err());
    }

    #[test]
    fn validates_cvc() {
        assert!(validate_cvc("123").is_ok());
        assert!(validate_cvc("1234").is_ok());
        assert!(validate_cvc("12").is_err());
        assert!(validate_cvc("12345").is_err());
        assert!(validate_cvc("12a").is_err());
    }

    #[test]
    fn validates_exp_month() {
        for month in ["01", "09", "10", "12"] {
            assert!(validate_exp_month(month).is_ok(), "{}", month);
        }
        for month in ["00", "13", "1", "012", "ab", ""] {
            assert_eq!(
                validate_exp_month(month),
                Err(CardValidationError::ExpMonthInvalid),
                "{}",
                month
            );
        }
    }

    #[test]
    fn validates_exp_year() {
        assert!(validate_exp_year("28").is_ok());
        assert!(validate_exp_year("2028").is_ok());
        assert!(validate_exp_year("202").is_err());
        assert!(validate_exp_year("2").is_err());
    }

    #[test]
    fn requires_card_holder() {
        let card = CardDetails {
            card_holder: String::new(),
            ..valid_card()
        };
        assert_eq!(
            validate_card(&card),
            Err(CardValidationError::CardHolderRequired)
        );
    }

    #[test]
    fn reports_first_failure_only() {
        let card = CardDetails {
            number: "123".to_string(),
            cvc: "1".to_string(),
            exp_month: "13".to_string(),
            ..valid_card()
        };
        assert_eq!(
            validate_card(&card),
            Err(CardValidationError::CardNumberInvalid)
        );

        let card = CardDetails {
            exp_month: "13".to_string(),
            exp_year: "1".to_string(),
            ..valid_card()
        };
        assert_eq!(validate_card(&card), Err(CardValidationError::ExpMonthInvalid));
    }
}
