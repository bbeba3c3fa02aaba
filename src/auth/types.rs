use serde::{Deserialize, Serialize};

/// JWT claims identifying the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialization_uses_wire_names() {
        let claims = Claims {
            user_id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            exp: 1234567890,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["user_id"], 7);
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["email"], "alice@example.com");
        assert_eq!(value["exp"], 1234567890);

        let deserialized: Claims = serde_json::from_value(value).unwrap();
        assert_eq!(deserialized, claims);
    }
}
