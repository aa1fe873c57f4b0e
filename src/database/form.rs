use std::collections::HashMap;

use serde_json::Value;

use super::error::TypeError;

pub type FormData = HashMap<String, Value>;

/// JSON request body with typed field lookups.
///
/// `get_*` fail when the key is missing, `get_optional_*` treat a missing
/// key or `null` as absent. Both fail on a value of the wrong type.
pub struct Form {
    inner: HashMap<String, Value>,
}

impl Form {
    pub fn from_data(data: FormData) -> Self {
        Self { inner: data }
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.inner.get(key).filter(|value| !value.is_null())
    }

    pub fn get_str(&self, key: &str) -> Result<String, TypeError> {
        self.get_optional_str(key)?
            .ok_or_else(|| TypeError::new(&format!("Missing field: {key}")))
    }

    pub fn get_optional_str(&self, key: &str) -> Result<Option<String>, TypeError> {
        match self.present(key) {
            Some(Value::String(v)) => Ok(Some(v.to_owned())),
            Some(_) => Err(TypeError::new(&format!("Invalid type for field: {key}"))),
            None => Ok(None),
        }
    }

    pub fn get_quantity(&self, key: &str) -> Result<String, TypeError> {
        self.get_optional_quantity(key)?
            .ok_or_else(|| TypeError::new(&format!("Missing field: {key}")))
    }

    /// Like `get_optional_str`, but a bare number such as `5` is taken as `"5"`.
    pub fn get_optional_quantity(&self, key: &str) -> Result<Option<String>, TypeError> {
        match self.present(key) {
            Some(Value::Number(v)) => Ok(Some(v.to_string())),
            _ => self.get_optional_str(key),
        }
    }

    pub fn get_id(&self, key: &str) -> Result<i64, TypeError> {
        self.get_optional_id(key)?
            .ok_or_else(|| TypeError::new(&format!("Missing field: {key}")))
    }

    pub fn get_optional_id(&self, key: &str) -> Result<Option<i64>, TypeError> {
        match self.present(key) {
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| TypeError::new(&format!("Invalid type for field: {key}"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form(value: Value) -> Form {
        Form::from_data(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn required_fields() {
        let form = form(json!({ "name": "Cake", "category_id": 3 }));

        assert_eq!(form.get_str("name").unwrap(), "Cake");
        assert_eq!(form.get_id("category_id").unwrap(), 3);
        assert!(form.get_str("description").is_err());
    }

    #[test]
    fn null_is_absent() {
        let form = form(json!({ "description": null }));

        assert_eq!(form.get_optional_str("description").unwrap(), None);
        assert!(form.get_str("description").is_err());
    }

    #[test]
    fn wrong_types_are_rejected() {
        let form = form(json!({ "name": ["x"], "category_id": "1", "user_id": 1.5 }));

        assert!(form.get_optional_str("name").is_err());
        assert!(form.get_optional_id("category_id").is_err());
        assert!(form.get_optional_id("user_id").is_err());
    }

    #[test]
    fn numeric_quantity_is_a_string() {
        let form = form(json!({ "quantity": 5, "name": 5 }));

        assert_eq!(form.get_quantity("quantity").unwrap(), "5");
        assert!(form.get_str("name").is_err());
        assert!(form.get_optional_quantity("missing").unwrap().is_none());
    }
}
