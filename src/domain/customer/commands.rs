use serde::Deserialize;

use super::errors::CustomerError;
use super::value_objects::PhoneNumber;

// ============================================================================
// Customer Commands
// ============================================================================

/// Raw POST /customers body; every field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub code: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterCustomer {
    pub name: String,
    pub code: String,
    pub number: PhoneNumber,
}

impl TryFrom<CustomerPayload> for RegisterCustomer {
    type Error = CustomerError;

    fn try_from(payload: CustomerPayload) -> Result<Self, Self::Error> {
        let name = non_blank(payload.name);
        let code = non_blank(payload.code);
        let number = payload.number.as_deref().and_then(PhoneNumber::parse);

        match (name, code, number) {
            (Some(name), Some(code), Some(number)) => Ok(Self { name, code, number }),
            _ => Err(CustomerError::MissingFields),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CustomerPayload {
        CustomerPayload {
            name: Some("John Doe".to_string()),
            code: Some("JD123".to_string()),
            number: Some("+254100716916".to_string()),
        }
    }

    #[test]
    fn test_complete_payload_is_accepted() {
        let command = RegisterCustomer::try_from(payload()).unwrap();
        assert_eq!(command.name, "John Doe");
        assert_eq!(command.code, "JD123");
        assert_eq!(command.number.into_inner(), "+254100716916");
    }

    #[test]
    fn test_each_missing_field_is_rejected() {
        let cases = [
            CustomerPayload { name: None, ..payload() },
            CustomerPayload { code: None, ..payload() },
            CustomerPayload { number: None, ..payload() },
            CustomerPayload { name: Some("  ".to_string()), ..payload() },
        ];

        for case in cases {
            assert!(matches!(
                RegisterCustomer::try_from(case),
                Err(CustomerError::MissingFields)
            ));
        }
    }
}
