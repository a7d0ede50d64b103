//! Library API for ringlens.
//!
//! The CLI commands print and return exit codes; these functions return
//! `Result`s for callers embedding the dashboard engine.
//!
//! # Example
//!
//! ```no_run
//! use ringlens::{ClusterSelection, Config, FilterState, connect, summary};
//!
//! # async fn run() -> Result<(), ringlens::RingLensError> {
//! let client = connect(&Config::default())?;
//! let widgets = summary(&client, ClusterSelection::All, &FilterState::default()).await?;
//! println!("{} entities in scope", widgets.histogram.entity_count);
//! # Ok(())
//! # }
//! ```

use crate::config::{Config, ConfigError};
use crate::fetch::{ApiClient, DataSource, FetchError};
use crate::filter::FilterState;
use crate::health::SystemStatus;
use crate::layout::{ForceParams, NetworkLayout};
use crate::model::NetworkGraph;
use crate::selection::ClusterSelection;
use crate::widgets::{self, DashboardWidgets, SuspectFilter, SuspectRow};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RingLensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The backend knows no network around this account.
    #[error("No network data found for '{0}'")]
    SuspectNotFound(String),
}

/// HTTP client for the configured backend.
pub fn connect(config: &Config) -> Result<ApiClient, RingLensError> {
    Ok(ApiClient::new(&config.api.base_url, config.api.timeout)?)
}

/// Fetch the latest analysis and derive the dashboard widgets for one scope.
pub async fn summary(
    source: &dyn DataSource,
    selection: ClusterSelection,
    filters: &FilterState,
) -> Result<DashboardWidgets, RingLensError> {
    let payload = source.analysis().await?;
    Ok(widgets::dashboard_widgets(&payload, selection, filters))
}

/// Fetch the suspect list and apply the sidebar filter.
pub async fn suspects(
    source: &dyn DataSource,
    filter: &SuspectFilter,
) -> Result<Vec<SuspectRow>, RingLensError> {
    let list = source.suspects().await?;
    Ok(widgets::suspect_rows(&list, filter, None))
}

/// Run the force layout for `focus` until it settles or `max_ticks` elapse.
pub fn layout_network(
    focus: &str,
    graph: &NetworkGraph,
    params: ForceParams,
    max_ticks: usize,
) -> NetworkLayout {
    let mut layout = NetworkLayout::new(focus, graph, params);
    layout.run_until_rest(max_ticks);
    layout
}

/// Fetch and lay out a suspect's ego network centred on a `width` × `height` canvas.
pub async fn network(
    source: &dyn DataSource,
    suspect_id: &str,
    (width, height): (f64, f64),
    max_ticks: usize,
) -> Result<NetworkLayout, RingLensError> {
    let graph = source.network(suspect_id).await?;
    if graph.is_empty() {
        return Err(RingLensError::SuspectNotFound(suspect_id.to_string()));
    }
    Ok(layout_network(
        suspect_id,
        &graph,
        ForceParams::centered(width, height),
        max_ticks,
    ))
}

/// One readiness probe. Failures degrade to a `Warning` status instead of erroring.
pub async fn health(source: &dyn DataSource) -> SystemStatus {
    match source.health().await {
        Ok(report) => SystemStatus::from_report(&report),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            SystemStatus::default().degraded()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::mock::MockSource;
    use crate::health::Readiness;
    use crate::model::{NetworkGroup, NetworkLink, NetworkNode, PatternTag, Suspect};

    #[tokio::test]
    async fn test_summary_of_unavailable_backend() {
        let source = MockSource::default();
        let err = summary(&source, ClusterSelection::All, &FilterState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RingLensError::Fetch(FetchError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_suspects_applies_filter() {
        let source = MockSource::default();
        source.set_suspects(vec![
            Suspect::new("0xAAA").with_patterns(&[PatternTag::Circular]),
            Suspect::new("0xBBB").with_patterns(&[PatternTag::Smurfing]),
        ]);
        let filter = SuspectFilter {
            circular: false,
            ..SuspectFilter::default()
        };
        let rows = suspects(&source, &filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "0xBBB");
    }

    #[tokio::test]
    async fn test_empty_network_is_not_found() {
        let source = MockSource::default();
        let err = network(&source, "0xGHOST", (800.0, 600.0), 100).await.unwrap_err();
        assert!(matches!(err, RingLensError::SuspectNotFound(id) if id == "0xGHOST"));
    }

    #[tokio::test]
    async fn test_network_settles() {
        let source = MockSource::default();
        source.set_network(
            "0xA",
            NetworkGraph {
                nodes: vec![
                    NetworkNode::new("0xA", NetworkGroup::Suspected),
                    NetworkNode::new("0xB", NetworkGroup::Related),
                ],
                links: vec![NetworkLink::new("0xA", "0xB")],
            },
        );
        let layout = network(&source, "0xA", (800.0, 600.0), 1000).await.unwrap();
        assert!(!layout.needs_tick());
        assert_eq!(layout.focus(), "0xA");
    }

    #[tokio::test]
    async fn test_health_failure_degrades() {
        let status = health(&MockSource::default()).await;
        assert_eq!(status.readiness, Readiness::Warning);
    }
}
