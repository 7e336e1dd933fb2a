//! MCP tool request types with JSON schemas

use crate::error::{Error, FieldError};
use crate::monobank::types::StatementQuery;
use schemars::JsonSchema;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// Tool 1: get_client_info
// ============================================================================

/// Request for get_client_info tool (takes no arguments)
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetClientInfoRequest {}

// Response: ClientInfo (from monobank/types.rs)

// ============================================================================
// Tool 2: get_statement
// ============================================================================

/// Request for get_statement tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct GetStatementRequest {
    #[serde(deserialize_with = "deserialize_account_id")]
    #[schemars(with = "String", description = "Account ID, or \"0\" for the default account")]
    pub account_id: String,

    #[serde(deserialize_with = "deserialize_unix_seconds")]
    #[schemars(
        with = "i64",
        description = "Start of the period (inclusive), Unix time in seconds"
    )]
    pub from_timestamp: i64,

    #[serde(deserialize_with = "deserialize_unix_seconds")]
    #[schemars(
        with = "i64",
        description = "End of the period, Unix time in seconds (0 means now)"
    )]
    pub to_timestamp: i64,
}

type FieldCheck = fn(Value) -> Result<(), serde_json::Error>;

// Same deserializers as the derive, run one field at a time for diagnostics.
const STATEMENT_FIELDS: [(&str, FieldCheck); 3] = [
    ("account_id", |v| deserialize_account_id(v).map(drop)),
    ("from_timestamp", |v| deserialize_unix_seconds(v).map(drop)),
    ("to_timestamp", |v| deserialize_unix_seconds(v).map(drop)),
];

impl GetStatementRequest {
    /// Parse raw tool arguments, naming every invalid field on failure.
    pub fn from_arguments(arguments: Option<&Map<String, Value>>) -> Result<Self, Error> {
        let arguments = arguments.cloned().unwrap_or_default();

        serde_json::from_value(Value::Object(arguments.clone()))
            .map_err(|e| Error::Validation(field_errors(&arguments, &e)))
    }

    /// Resolve into an upstream query; a zero end time means `now`.
    pub fn into_query(self, now: i64) -> StatementQuery {
        let to = if self.to_timestamp == 0 {
            now
        } else {
            self.to_timestamp
        };

        StatementQuery {
            account_id: self.account_id,
            from: self.from_timestamp,
            to,
        }
    }
}

fn field_errors(arguments: &Map<String, Value>, error: &serde_json::Error) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = STATEMENT_FIELDS
        .iter()
        .filter_map(|(field, check)| {
            let problem = match arguments.get(*field) {
                None => "is required".to_string(),
                Some(value) => check(value.clone()).err()?.to_string(),
            };
            Some(FieldError::new(*field, problem))
        })
        .collect();

    if errors.is_empty() {
        errors.push(FieldError::new("arguments", error.to_string()));
    }
    errors
}

/// Account id spliced into the request path: non-empty, no `/`, `?` or `#`.
fn deserialize_account_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct AccountIdVisitor;

    impl<'de> Visitor<'de> for AccountIdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a non-empty account id without '/', '?' or '#'")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            if v.is_empty() || v.contains(['/', '?', '#']) {
                return Err(E::invalid_value(Unexpected::Str(v), &self));
            }
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_str(AccountIdVisitor)
}

/// Whole, non-negative Unix seconds that fit in an `i64`. `1700000000.0` is accepted.
fn deserialize_unix_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct UnixSecondsVisitor;

    impl UnixSecondsVisitor {
        fn out_of_range<E: de::Error>(v: impl fmt::Display) -> E {
            E::custom(format!("{} is out of range (max {})", v, i64::MAX))
        }
    }

    impl<'de> Visitor<'de> for UnixSecondsVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a whole, non-negative number of Unix seconds")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            if v < 0 {
                return Err(E::invalid_value(Unexpected::Signed(v), &self));
            }
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v).map_err(|_| Self::out_of_range(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.fract() != 0.0 || v < 0.0 {
                return Err(E::invalid_value(Unexpected::Float(v), &self));
            }
            if v >= i64::MAX as f64 {
                return Err(Self::out_of_range(v));
            }
            Ok(v as i64)
        }
    }

    deserializer.deserialize_any(UnixSecondsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn get_statement_request_parses() {
        let arguments = args(json!({
            "account_id": "0",
            "from_timestamp": 1700000000,
            "to_timestamp": 1700003600
        }));

        let request = GetStatementRequest::from_arguments(Some(&arguments)).unwrap();

        assert_eq!(request.account_id, "0");
        assert_eq!(request.from_timestamp, 1_700_000_000);
        assert_eq!(request.to_timestamp, 1_700_003_600);
    }

    #[test]
    fn get_statement_request_deserializes_directly() {
        let json = r#"{"account_id": "abc", "from_timestamp": 1, "to_timestamp": 0}"#;
        let request: GetStatementRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.account_id, "abc");
        assert_eq!(request.to_timestamp, 0);
    }

    #[test]
    fn get_statement_request_accepts_integral_floats() {
        let arguments = args(json!({
            "account_id": "abc",
            "from_timestamp": 1700000000.0,
            "to_timestamp": 0
        }));

        let request = GetStatementRequest::from_arguments(Some(&arguments)).unwrap();
        assert_eq!(request.from_timestamp, 1_700_000_000);
    }

    #[test]
    fn get_statement_request_ignores_extra_keys() {
        let arguments = args(json!({
            "account_id": "0",
            "from_timestamp": 1,
            "to_timestamp": 2,
            "verbose": true
        }));

        assert!(GetStatementRequest::from_arguments(Some(&arguments)).is_ok());
    }

    #[test]
    fn missing_from_timestamp_is_named() {
        let arguments = args(json!({ "account_id": "0", "to_timestamp": 0 }));

        let error = GetStatementRequest::from_arguments(Some(&arguments)).unwrap_err();

        assert_eq!(error.invalid_fields(), vec!["from_timestamp"]);
        assert!(error.to_string().contains("from_timestamp: is required"));
    }

    #[test]
    fn every_bad_field_is_reported() {
        let arguments = args(json!({
            "account_id": 42,
            "from_timestamp": "yesterday",
            "to_timestamp": null
        }));

        let error = GetStatementRequest::from_arguments(Some(&arguments)).unwrap_err();

        assert_eq!(
            error.invalid_fields(),
            vec!["account_id", "from_timestamp", "to_timestamp"]
        );
        let message = error.to_string();
        assert!(message.contains("account_id: invalid type: integer `42`"));
        assert!(message.contains("from_timestamp: invalid type: string \"yesterday\""));
        assert!(message.contains("to_timestamp: invalid type: null"));
    }

    #[test]
    fn no_arguments_reports_all_fields_missing() {
        let error = GetStatementRequest::from_arguments(None).unwrap_err();
        assert_eq!(
            error.invalid_fields(),
            vec!["account_id", "from_timestamp", "to_timestamp"]
        );
    }

    #[test]
    fn fractional_and_negative_timestamps_are_rejected() {
        let arguments = args(json!({
            "account_id": "0",
            "from_timestamp": 1700000000.5,
            "to_timestamp": -1
        }));

        let error = GetStatementRequest::from_arguments(Some(&arguments)).unwrap_err();
        let message = error.to_string();

        assert!(message.contains("from_timestamp: invalid value: floating point `1700000000.5`"));
        assert!(message.contains("to_timestamp: invalid value: integer `-1`"));
    }

    #[test]
    fn timestamp_beyond_i64_is_out_of_range() {
        let arguments = args(json!({
            "account_id": "0",
            "from_timestamp": u64::MAX,
            "to_timestamp": 1e19
        }));

        let error = GetStatementRequest::from_arguments(Some(&arguments)).unwrap_err();
        let message = error.to_string();

        assert_eq!(error.invalid_fields(), vec!["from_timestamp", "to_timestamp"]);
        assert!(message.contains("from_timestamp: 18446744073709551615 is out of range"));
        assert!(message.contains("to_timestamp: 10000000000000000000 is out of range"));
    }

    #[test]
    fn account_id_must_be_a_path_segment() {
        for bad in ["", "a/b", "a?b", "a#b"] {
            let arguments = args(json!({
                "account_id": bad,
                "from_timestamp": 1,
                "to_timestamp": 2
            }));

            let error = GetStatementRequest::from_arguments(Some(&arguments)).unwrap_err();
            assert_eq!(error.invalid_fields(), vec!["account_id"], "input {:?}", bad);
        }
    }

    #[test]
    fn zero_end_time_resolves_to_now() {
        let request = GetStatementRequest {
            account_id: "0".to_string(),
            from_timestamp: 100,
            to_timestamp: 0,
        };

        let query = request.into_query(5_000);

        assert_eq!(query.from, 100);
        assert_eq!(query.to, 5_000);
    }

    #[test]
    fn explicit_end_time_is_kept() {
        let request = GetStatementRequest {
            account_id: "acc".to_string(),
            from_timestamp: 100,
            to_timestamp: 200,
        };

        let query = request.into_query(5_000);

        assert_eq!(query.account_id, "acc");
        assert_eq!(query.to, 200);
    }
}
