//! MCP tool catalog
//!
//! The closed set of tools this server advertises, with their descriptions
//! and argument schemas. Execution lives in `mcp::server`.

pub mod types;

pub use types::*;

use crate::error::Error;
use crate::monobank::types::{DEFAULT_ACCOUNT, StatementQuery};
use rmcp::model::{JsonObject, Tool};
use schemars::{JsonSchema, schema_for};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetClientInfo,
    GetStatement,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::GetClientInfo, ToolName::GetStatement];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetClientInfo => "get_client_info",
            ToolName::GetStatement => "get_statement",
        }
    }

    pub fn description(self) -> String {
        match self {
            ToolName::GetClientInfo => "Get Monobank client information: name, webhook, \
                 permissions, accounts (balances and credit limits in minor units) and jars."
                .to_string(),
            ToolName::GetStatement => format!(
                "Get the transaction statement for an account over a period. Use account_id \
                 \"{}\" for the default account. Amounts are returned in major currency units \
                 and times as ISO-8601 UTC. The Monobank API allows one request per {} seconds \
                 and a period of at most {} seconds (31 days + 1 hour).",
                DEFAULT_ACCOUNT,
                StatementQuery::MIN_INTERVAL_SECONDS,
                StatementQuery::MAX_PERIOD_SECONDS,
            ),
        }
    }

    pub fn input_schema(self) -> Arc<JsonObject> {
        let schema = match self {
            ToolName::GetClientInfo => schema_object::<GetClientInfoRequest>(),
            ToolName::GetStatement => schema_object::<GetStatementRequest>(),
        };
        Arc::new(schema)
    }

    pub fn to_tool(self) -> Tool {
        Tool::new(self.as_str(), self.description(), self.input_schema())
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Error> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| Error::UnknownOperation(name.to_string()))
    }
}

fn schema_object<T: JsonSchema>() -> JsonObject {
    match serde_json::to_value(schema_for!(T)) {
        Ok(Value::Object(mut schema)) => {
            schema.entry("properties").or_insert_with(|| Value::Object(JsonObject::new()));
            schema
        }
        _ => JsonObject::new(),
    }
}

/// Every tool the server advertises, in a stable order.
pub fn catalog() -> Vec<Tool> {
    ToolName::ALL.into_iter().map(ToolName::to_tool).collect()
}
