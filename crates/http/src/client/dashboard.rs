//! Dashboard widgets
//!
//! The backend's `dashboard/` summary is not scoped to the signed-in user, so
//! the widgets are rebuilt on the client: every collection is narrowed to
//! records under the user's manager that are unassigned or assigned to the
//! user, and tasks to those assigned to the user.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use super::CrmClient;
use crate::types::CurrentUser;

/// Number of leads shown in the "recent leads" widget
pub const RECENT_LEADS_LIMIT: usize = 5;

/// Everything the dashboard page renders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub leads_count: usize,
    pub contacts_count: usize,
    pub accounts_count: usize,
    pub deals_count: usize,
    pub recent_leads: Vec<JsonValue>,
    pub recent_deals: Vec<JsonValue>,
    pub upcoming_tasks: Vec<JsonValue>,
}

/// Whose records the dashboard shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub manager_username: String,
    pub user_id: i64,
    pub username: String,
}

impl Owner {
    pub fn new(manager_username: impl Into<String>, user: &CurrentUser) -> Self {
        Self {
            manager_username: manager_username.into(),
            user_id: user.id,
            username: user.username.clone(),
        }
    }

    fn manages(&self, record: &JsonValue) -> bool {
        record.get("manager_username").and_then(JsonValue::as_str)
            == Some(self.manager_username.as_str())
    }

    fn is_user(&self, assignee: &JsonValue) -> bool {
        assignee.as_i64() == Some(self.user_id)
            || assignee.get("id").and_then(JsonValue::as_i64) == Some(self.user_id)
    }

    /// Record is under this manager and either unassigned or assigned to the user
    pub fn owns(&self, record: &JsonValue) -> bool {
        if !self.manages(record) {
            return false;
        }
        match record.get("assigned_to") {
            None | Some(JsonValue::Null) => true,
            Some(JsonValue::String(text)) if text.is_empty() => true,
            Some(assignee) => self.is_user(assignee),
        }
    }

    /// Task is under this manager and assigned to the user by name or id
    pub fn is_assigned_task(&self, task: &JsonValue) -> bool {
        if !self.manages(task) {
            return false;
        }
        task.get("assigned_to").is_some_and(|assignee| {
            assignee.as_str() == Some(self.username.as_str()) || self.is_user(assignee)
        })
    }
}

/// Records of a list response, which is either paginated or a bare array
pub fn collection_records(body: &JsonValue) -> Option<&[JsonValue]> {
    if let Some(results) = body.get("results").and_then(JsonValue::as_array) {
        return Some(results);
    }
    body.as_array().map(Vec::as_slice)
}

/// Records the owner can see
pub fn owned(records: &[JsonValue], owner: &Owner) -> Vec<JsonValue> {
    records
        .iter()
        .filter(|record| owner.owns(record))
        .cloned()
        .collect()
}

/// Tasks assigned to the owner
pub fn assigned_tasks(tasks: &[JsonValue], owner: &Owner) -> Vec<JsonValue> {
    tasks
        .iter()
        .filter(|task| owner.is_assigned_task(task))
        .cloned()
        .collect()
}

/// Milliseconds since the epoch for a date field; missing or unparseable is 0
fn timestamp(value: Option<&JsonValue>) -> i64 {
    match value {
        Some(JsonValue::String(text)) => parse_timestamp(text).unwrap_or(0),
        Some(JsonValue::Number(number)) => number.as_i64().unwrap_or(0),
        _ => 0,
    }
}

fn parse_timestamp(text: &str) -> Option<i64> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.timestamp_millis());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

/// First non-empty value among `fields`
fn first_present<'a>(record: &'a JsonValue, fields: &[&str]) -> Option<&'a JsonValue> {
    fields.iter().find_map(|field| {
        record.get(*field).filter(|value| match value {
            JsonValue::Null => false,
            JsonValue::String(text) => !text.is_empty(),
            _ => true,
        })
    })
}

/// Newest first by `created_at`, falling back to `date`
pub fn sort_newest_first(records: &mut [JsonValue]) {
    records.sort_by_key(|record| {
        std::cmp::Reverse(timestamp(first_present(record, &["created_at", "date"])))
    });
}

/// Closest `due_date` first
pub fn sort_by_due_date(tasks: &mut [JsonValue]) {
    tasks.sort_by_key(|task| timestamp(first_present(task, &["due_date"])));
}

/// Non-empty array field of the dashboard summary
fn summary_list<'a>(dashboard: Option<&'a JsonValue>, field: &str) -> Option<&'a [JsonValue]> {
    dashboard
        .and_then(|summary| summary.get(field))
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
}

/// Assemble the widgets from already-fetched responses
///
/// Each argument is `None` when the corresponding fetch failed.
pub fn summarize(
    owner: &Owner,
    dashboard: Option<&JsonValue>,
    leads: Option<&JsonValue>,
    contacts: Option<&JsonValue>,
    accounts: Option<&JsonValue>,
    deals: Option<&JsonValue>,
    tasks: Option<&JsonValue>,
) -> DashboardSummary {
    let filter = |body: Option<&JsonValue>| {
        body.and_then(collection_records)
            .map(|records| owned(records, owner))
            .unwrap_or_default()
    };

    let leads = filter(leads);
    let contacts = filter(contacts);
    let accounts = filter(accounts);
    let deals = filter(deals);

    let mut recent_leads = match summary_list(dashboard, "recent_leads") {
        Some(recent) if !recent.is_empty() => owned(recent, owner),
        _ => leads.clone(),
    };
    sort_newest_first(&mut recent_leads);
    recent_leads.truncate(RECENT_LEADS_LIMIT);

    let recent_deals = match summary_list(dashboard, "recent_deals") {
        Some(recent) if !recent.is_empty() => owned(recent, owner),
        _ => deals.clone(),
    };

    let mut upcoming_tasks = match tasks.and_then(collection_records) {
        Some(records) => assigned_tasks(records, owner),
        None => summary_list(dashboard, "upcoming_tasks")
            .map(|upcoming| assigned_tasks(upcoming, owner))
            .unwrap_or_default(),
    };
    sort_by_due_date(&mut upcoming_tasks);

    DashboardSummary {
        leads_count: leads.len(),
        contacts_count: contacts.len(),
        accounts_count: accounts.len(),
        deals_count: deals.len(),
        recent_leads,
        recent_deals,
        upcoming_tasks,
    }
}

impl CrmClient {
    /// Load every dashboard widget for the signed-in user
    ///
    /// Without a profile manager or a cached user the dashboard is empty.
    /// Individual fetch failures are already notified and count as empty
    /// collections.
    pub async fn load_dashboard(&self) -> DashboardSummary {
        let manager = self
            .profile()
            .await
            .ok()
            .and_then(|profile| profile.manager_username)
            .filter(|manager| !manager.is_empty());

        let (Some(manager), Some(user)) = (manager, self.current_user()) else {
            debug!("No manager or cached user, showing empty dashboard");
            return DashboardSummary::default();
        };

        let owner = Owner::new(manager, &user);
        let query: String =
            url::form_urlencoded::byte_serialize(owner.manager_username.as_bytes()).collect();
        let query = format!("?manager_username={query}");

        let dashboard = self.fetch_json(&format!("dashboard/{query}")).await;
        let leads = self.fetch_json(&format!("leads/{query}")).await;
        let contacts = self.fetch_json(&format!("contacts/{query}")).await;
        let accounts = self.fetch_json(&format!("accounts/{query}")).await;
        let deals = self.fetch_json(&format!("deals/{query}")).await;
        let tasks = self.fetch_json(&format!("tasks/{query}")).await;

        let summary = summarize(
            &owner,
            dashboard.as_ref(),
            leads.as_ref(),
            contacts.as_ref(),
            accounts.as_ref(),
            deals.as_ref(),
            tasks.as_ref(),
        );

        info!(
            manager = %owner.manager_username,
            leads = summary.leads_count,
            contacts = summary.contacts_count,
            accounts = summary.accounts_count,
            deals = summary.deals_count,
            tasks = summary.upcoming_tasks.len(),
            "Dashboard loaded"
        );
        summary
    }

    async fn fetch_json(&self, endpoint: &str) -> Option<JsonValue> {
        self.get(endpoint).await.ok().and_then(|body| body.into_json())
    }
}
