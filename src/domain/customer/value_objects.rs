use serde::{Deserialize, Serialize};

// ============================================================================
// Customer Value Objects
// ============================================================================

/// Customer phone number, kept as entered (trimmed).
///
/// Format is not checked here; the SMS gateway is the authority on which
/// numbers it can reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// `None` for a blank number
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_number_is_trimmed() {
        let number = PhoneNumber::parse("  +254100716916 ").unwrap();
        assert_eq!(number.into_inner(), "+254100716916");
    }

    #[test]
    fn test_blank_phone_number_is_rejected() {
        assert!(PhoneNumber::parse("   ").is_none());
        assert!(PhoneNumber::parse("").is_none());
    }
}
