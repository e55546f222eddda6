use serde_json::Value;
use std::collections::HashMap;

/// Claims from a validated access token.
///
/// Scopes are read from the `scp` claim (a space separated string, as issued
/// for delegated user access) and from the `roles` claim (an array of
/// strings, as issued for application access).
#[derive(Clone, Debug, PartialEq)]
pub struct Claims(HashMap<String, Value>);

impl From<HashMap<String, Value>> for Claims {
    fn from(claims: HashMap<String, Value>) -> Self {
        Self(claims)
    }
}

impl Claims {
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    pub fn scopes(&self) -> Vec<&str> {
        let delegated = self
            .0
            .get("scp")
            .and_then(Value::as_str)
            .map(str::split_whitespace)
            .into_iter()
            .flatten();

        let application = self
            .0
            .get("roles")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str);

        delegated.chain(application).collect()
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().contains(&scope)
    }

    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }
}
