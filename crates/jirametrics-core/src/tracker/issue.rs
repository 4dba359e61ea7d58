use serde::Deserialize;
use serde_json::Value;

/// One page of `GET /rest/api/3/search?expand=changelog`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// An issue with its expanded change history.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub changelog: Changelog,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changelog {
    /// Newest first, as delivered by the tracker.
    #[serde(default)]
    pub histories: Vec<ChangelogEntry>,
}

/// One audit record: a timestamp and the field changes made at that moment.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangelogEntry {
    pub created: String,
    #[serde(default)]
    pub items: Vec<ChangeItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeItem {
    pub field: String,
    /// Kept raw: for `status` changes this must be a string, and that is
    /// checked where it is read instead of being coerced here.
    #[serde(rename = "fromString", default)]
    pub from_string: Value,
}

impl ChangeItem {
    pub fn is_status_change(&self) -> bool {
        self.field == "status"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueFields {
    pub created: String,
    #[serde(default)]
    pub status: StatusField,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default)]
    pub priority: Option<Named>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub issuetype: Option<Named>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusField {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "statusCategory", default)]
    pub status_category: Named,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub key: String,
}

impl Issue {
    pub fn project_key(&self) -> &str {
        self.fields.project.as_ref().map(|p| p.key.as_str()).unwrap_or("")
    }

    pub fn priority_name(&self) -> &str {
        self.fields.priority.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    /// Email when visible, else account id, else empty (unassigned).
    pub fn assignee_id(&self) -> &str {
        match &self.fields.assignee {
            Some(a) => a
                .email_address
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(a.account_id.as_deref())
                .unwrap_or(""),
            None => "",
        }
    }

    pub fn issue_type_name(&self) -> &str {
        self.fields.issuetype.as_ref().map(|t| t.name.as_str()).unwrap_or("")
    }

    pub fn status_name(&self) -> &str {
        &self.fields.status.name
    }

    pub fn status_category_name(&self) -> &str {
        &self.fields.status.status_category.name
    }
}
