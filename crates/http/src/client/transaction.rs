//! Transaction detail

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::debug;

use super::CrmClient;
use super::error::RequestError;

/// Placeholder shown for a transaction without a reference number
pub const MISSING_REFERENCE: &str = "N/A";

/// Settlement state of a transaction
///
/// The backend stores free text; the three known states get their own
/// variant and anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Overdue,
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::Other(status) => status,
        }
    }

    /// Style class for the status badge, if the status is a known one
    pub const fn css_class(&self) -> Option<&'static str> {
        match self {
            Self::Pending => Some("status-pending"),
            Self::Completed => Some("status-completed"),
            Self::Overdue => Some("status-overdue"),
            Self::Other(_) => None,
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "overdue" => Self::Overdue,
            _ => Self::Other(status),
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single invoice, payment, refund or credit note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub transaction_type: String,
    pub transaction_type_display: String,
    /// Decimal amount as sent by the server, e.g. `"1500.00"`
    #[serde(deserialize_with = "decimal_text")]
    pub amount: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub reference_number: Option<String>,
    pub account_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deal_name: Option<String>,
}

impl Transaction {
    /// Amount prefixed with the currency sign
    pub fn amount_label(&self) -> String {
        format!("${}", self.amount)
    }

    pub fn reference_label(&self) -> &str {
        non_empty(self.reference_number.as_deref()).unwrap_or(MISSING_REFERENCE)
    }

    /// Description, when there is one worth showing
    pub fn description_text(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    /// Linked deal, when there is one
    pub fn deal_label(&self) -> Option<&str> {
        non_empty(self.deal_name.as_deref())
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.is_empty())
}

/// Accept a decimal serialized either as a string or as a JSON number
fn decimal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Decimal::deserialize(deserializer)? {
        Decimal::Text(text) => text,
        Decimal::Number(number) => number.to_string(),
    })
}

impl CrmClient {
    /// Fetch one transaction
    ///
    /// # Errors
    ///
    /// Returns the notified request failure or an unexpected body shape
    pub async fn transaction(&self, id: i64) -> Result<Transaction, RequestError> {
        debug!(transaction_id = id, "Loading transaction");
        self.get(&format!("transactions/{id}/"))
            .await?
            .deserialize()
    }
}
