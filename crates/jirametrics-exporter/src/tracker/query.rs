/// Issue search JQL for the refresh window.
///
/// Generates: `updated >= -90d AND project in (OPS, "MY-PROJ")`
pub fn build_issue_search_jql(project_keys: &[String], lookback_days: u32) -> String {
    format!("updated >= -{lookback_days}d AND {}", project_in_clause(project_keys))
}

fn project_in_clause(keys: &[String]) -> String {
    let escaped: Vec<String> = keys.iter().map(|k| escape_jql_value(k)).collect();
    format!("project in ({})", escaped.join(", "))
}

/// Quote a JQL value unless it is a plain identifier.
fn escape_jql_value(value: &str) -> String {
    if value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
