use serde::Deserialize;
use std::fmt;

/// Raw card input. Lives only for the duration of a tokenization request.
#[derive(Clone, Deserialize)]
pub struct CardDetails {
    pub number: String,
    pub cvc: String,
    pub exp_month: String,
    pub exp_year: String,
    pub card_holder: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4 = self
            .number
            .get(self.number.len().saturating_sub(4)..)
            .unwrap_or("");
        f.debug_struct("CardDetails")
            .field("number", &format!("****{}", last4))
            .field("cvc", &"***")
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("card_holder", &self.card_holder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_masks_number_and_cvc() {
        let card = CardDetails {
            number: "4242424242424242".to_string(),
            cvc: "123".to_string(),
            exp_month: "08".to_string(),
            exp_year: "28".to_string(),
            card_holder: "Jane Doe".to_string(),
        };
        let rendered = format!("{:?}", card);
        assert!(rendered.contains("****4242"));
        assert!(!rendered.contains("4242424242424242"));
        assert!(!rendered.contains("123"));
    }
}
