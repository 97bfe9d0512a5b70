use serde::{Deserialize, Serialize};

/// Customer dimension row (`clientes.csv`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "customer_id", alias = "cliente_id")]
    pub customer_id: i64,

    #[serde(rename = "nombre")]
    pub first_name: String,

    #[serde(rename = "apellido")]
    pub last_name: String,

    #[serde(rename = "nombre_completo")]
    pub full_name: String,

    #[serde(rename = "email")]
    pub email: String,
}

impl Customer {
    /// Build a customer, deriving `nombre_completo` from the name parts
    pub fn new(customer_id: i64, first_name: String, last_name: String, email: String) -> Self {
        let full_name = format!("{} {}", first_name, last_name);
        Self {
            customer_id,
            first_name,
            last_name,
            full_name,
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_is_concatenation() {
        let c = Customer::new(
            1000,
            "María".to_string(),
            "López".to_string(),
            "maria.lopez@gmail.com".to_string(),
        );
        assert_eq!(c.full_name, "María López");
    }

    #[test]
    fn test_accepts_legacy_id_column() {
        let json = r#"{"cliente_id":1001,"nombre":"a","apellido":"b","nombre_completo":"a b","email":"a@b.mx"}"#;
        let c: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(c.customer_id, 1001);
    }
}
