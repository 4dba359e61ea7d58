//! Operational HTTP endpoints.
//!
//! - `/liveness`  : process is up
//! - `/readiness` : the tracker accepts our credentials (500 otherwise)
//! - `/metrics`   : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::config::RefreshMode;

pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.tracker().myself().await {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(kind = e.kind().as_str(), error = %e, "readiness probe failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "tracker unreachable")
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let refresher = state.refresher();

    if state.cfg().exporter.refresh_mode == RefreshMode::Scrape {
        if let Err(e) = refresher.refresh().await {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("refresh failed: {e}\n"),
            )
                .into_response();
        }
    }

    let mut body = String::new();
    refresher.current().render(&mut body);
    state.exporter_metrics().render(&mut body);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;

    use super::*;
    use crate::config::{ExporterConfig, ExporterSection, JiraSection};
    use crate::tracker::fake::{finished_issue, FakeTracker};
    use jirametrics_core::error::ExporterError;

    fn cfg(mode: RefreshMode) -> ExporterConfig {
        ExporterConfig {
            jira: JiraSection {
                url: "https://example.atlassian.net".into(),
                user: "bot@example.com".into(),
                api_token: "token".into(),
                projects: vec!["OPS".into()],
                analyze_period_days: 90,
                request_timeout_secs: 30,
            },
            exporter: ExporterSection {
                listen: "127.0.0.1:0".into(),
                data_refresh_period: "5m".into(),
                refresh_mode: mode,
            },
        }
    }

    fn tracker() -> FakeTracker {
        FakeTracker::default()
            .with_statuses(&[
                ("Open", "To Do"),
                ("In Progress", "In Progress"),
                ("Done", "Done"),
            ])
            .with_pages(vec![vec![finished_issue("OPS-1")]])
    }

    async fn body_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn liveness_is_always_ok() {
        let resp = liveness().await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_tracker_auth() {
        let ok = AppState::with_tracker(cfg(RefreshMode::Interval), Arc::new(tracker()));
        let resp = readiness(State(ok)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let denied = tracker().failing_myself(ExporterError::Fetch("HTTP 401".into()));
        let bad = AppState::with_tracker(cfg(RefreshMode::Interval), Arc::new(denied));
        let resp = readiness(State(bad)).await.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn interval_mode_serves_latest_snapshot() {
        let state = AppState::with_tracker(cfg(RefreshMode::Interval), Arc::new(tracker()));

        // nothing refreshed yet: only exporter self-metrics
        let body = body_text(metrics(State(state.clone())).await).await;
        assert!(!body.contains("jira_issue_count{"), "{body}");
        assert!(body.contains("jira_exporter_last_refresh_issues 0"), "{body}");

        state.refresher().refresh().await.unwrap();
        let resp = metrics(State(state)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            METRICS_CONTENT_TYPE
        );
        let body = body_text(resp).await;
        assert!(body.contains("jira_issue_count{"), "{body}");
        assert!(body.contains("jira_issue_time_in_status_hours_sum{"), "{body}");
    }

    #[tokio::test]
    async fn scrape_mode_refreshes_per_request() {
        let state = AppState::with_tracker(cfg(RefreshMode::Scrape), Arc::new(tracker()));
        let body = body_text(metrics(State(state)).await).await;
        assert!(body.contains("jira_issue_count{"), "{body}");
        assert!(
            body.contains("jira_exporter_refreshes_total{outcome=\"success\"} 1"),
            "{body}"
        );
    }

    #[tokio::test]
    async fn scrape_mode_failure_is_500() {
        let broken = tracker().failing_statuses(ExporterError::Fetch("HTTP 503".into()));
        let state = AppState::with_tracker(cfg(RefreshMode::Scrape), Arc::new(broken));
        let resp = metrics(State(state)).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
