use crate::error::Error;
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Minor currency units per major unit (kopiykas per hryvnia, cents per dollar).
pub const MINOR_UNITS_PER_MAJOR: f64 = 100.0;

/// Sentinel account identifier for the client's default account.
pub const DEFAULT_ACCOUNT: &str = "0";

pub fn to_major_units(minor: i64) -> f64 {
    minor as f64 / MINOR_UNITS_PER_MAJOR
}

// Entities
//
// Client profile types mirror the upstream JSON losslessly: beyond the
// identifiers every field may be absent or null, and unmodelled keys are
// kept in `extra` so the profile re-serializes field-for-field.

/// Upstream field that is absent (`None`), null (`Some(None)`) or set.
pub type Nullable<T> = Option<Option<T>>;

fn present<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_id: String,
    pub name: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub web_hook_url: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub permissions: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub accounts: Nullable<Vec<Account>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub jars: Nullable<Vec<Jar>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClientInfo {
    pub fn accounts(&self) -> &[Account] {
        self.accounts.as_ref().and_then(Option::as_deref).unwrap_or_default()
    }

    pub fn jars(&self) -> &[Jar] {
        self.jars.as_ref().and_then(Option::as_deref).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub send_id: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub balance: Nullable<i64>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub credit_limit: Nullable<i64>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub currency_code: Nullable<i32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub cashback_type: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub masked_pan: Nullable<Vec<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub iban: Nullable<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Jar {
    pub id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub send_id: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub currency_code: Nullable<i32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub balance: Nullable<i64>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub goal: Nullable<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Statement entry as returned by the upstream API. Amounts are in minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementItem {
    pub id: String,
    pub time: i64,
    pub description: String,
    pub mcc: i32,
    pub original_mcc: i32,
    pub hold: bool,
    pub amount: i64,
    pub operation_amount: i64,
    pub currency_code: i32,
    pub commission_rate: i64,
    pub cashback_amount: i64,
    pub balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_edrpou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_name: Option<String>,
}

/// Statement entry handed back to the caller: ISO-8601 time, major-unit amounts,
/// no transaction/invoice ids and no counterparty EDRPOU/IBAN.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStatementItem {
    pub time: String,
    pub description: String,
    pub mcc: i32,
    pub original_mcc: i32,
    pub hold: bool,
    pub amount: f64,
    pub operation_amount: f64,
    pub currency_code: i32,
    pub commission_rate: f64,
    pub cashback_amount: f64,
    pub balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_name: Option<String>,
}

impl TryFrom<StatementItem> for NormalizedStatementItem {
    type Error = Error;

    fn try_from(item: StatementItem) -> Result<Self, Error> {
        Ok(Self {
            time: format_unix_time(item.time)?,
            description: item.description,
            mcc: item.mcc,
            original_mcc: item.original_mcc,
            hold: item.hold,
            amount: to_major_units(item.amount),
            operation_amount: to_major_units(item.operation_amount),
            currency_code: item.currency_code,
            commission_rate: to_major_units(item.commission_rate),
            cashback_amount: to_major_units(item.cashback_amount),
            balance: to_major_units(item.balance),
            comment: item.comment,
            receipt_id: item.receipt_id,
            counter_name: item.counter_name,
        })
    }
}

/// Render Unix seconds as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn format_unix_time(seconds: i64) -> Result<String, Error> {
    DateTime::from_timestamp(seconds, 0)
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or(Error::InvalidTimestamp(seconds))
}

/// Normalize a whole statement, keeping upstream order. Fails as a unit.
pub fn normalize_statement(items: Vec<StatementItem>) -> Result<Vec<NormalizedStatementItem>, Error> {
    items
        .into_iter()
        .map(NormalizedStatementItem::try_from)
        .collect()
}

// Request types

/// Resolved statement request: `to` already defaulted to "now" when zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementQuery {
    pub account_id: String,
    pub from: i64,
    pub to: i64,
}

impl StatementQuery {
    /// Upstream rate limit for the statement endpoint.
    pub const MIN_INTERVAL_SECONDS: u64 = 60;
    /// Longest period the upstream accepts in one request (31 days + 1 hour).
    pub const MAX_PERIOD_SECONDS: i64 = 31 * 24 * 60 * 60 + 60 * 60;

    pub fn path(&self) -> String {
        format!(
            "/personal/statement/{}/{}/{}",
            self.account_id, self.from, self.to
        )
    }
}
