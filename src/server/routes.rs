use super::assets::INDEX_HTML;
use crate::controller::{Canvas, Controller, Effect, UiEvent, UiSnapshot, ViewState};
use crate::fetch::DataSource;
use crate::health::{self, SystemStatus};
use crate::layout::{NetworkPhase, PackTooltip, PositionFrame, cluster_tabs};
use crate::render::svg::{network_scene, pack_scene};
use crate::task::TaskHandle;
use crate::widgets::{DashboardWidgets, SuspectRow, fan_window_labels};
use axum::{
    Json, Router,
    extract::State,
    response::{
        Html, IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::{Arc, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, broadcast, watch};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

/// Simulation step interval while a network is on screen.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);
const EVENT_CAPACITY: usize = 64;

/// Pushed to connected pages over `/api/events`.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    Tick(PositionFrame),
    /// View state changed outside a request; the page should refetch.
    Changed,
}

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub port: u16,
    pub open_browser: bool,
    pub canvas: Canvas,
    pub health_interval: Duration,
}

/// Application state shared across handlers
pub struct AppState {
    pub controller: Mutex<Controller>,
    pub source: Arc<dyn DataSource>,
    pub events: broadcast::Sender<StreamEvent>,
    pub health: watch::Receiver<SystemStatus>,
    ticker: std::sync::Mutex<Option<TaskHandle>>,
    _health_task: TaskHandle,
}

impl AppState {
    /// Must be called inside a tokio runtime; the health poll starts immediately.
    pub fn new(
        source: Arc<dyn DataSource>,
        canvas: Canvas,
        health_interval: Duration,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (health_task, health) = health::spawn_monitor(source.clone(), health_interval);
        Arc::new(Self {
            controller: Mutex::new(Controller::new(canvas)),
            source,
            events,
            health,
            ticker: std::sync::Mutex::new(None),
            _health_task: health_task,
        })
    }

    fn notify(&self) {
        // No subscribers is fine.
        let _ = self.events.send(StreamEvent::Changed);
    }

    /// Whether a simulation ticker is currently alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }
}

/// Carry out controller effects. Fetches run as detached tasks and feed their
/// results back through the controller.
pub fn run_effects(state: &Arc<AppState>, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::LoadAnalysis => {
                let state = state.clone();
                tokio::spawn(async move {
                    let result = state.source.analysis().await;
                    if let Err(err) = &result {
                        warn!(error = %err, "analysis fetch failed");
                    }
                    state.controller.lock().await.apply_analysis(result);
                    state.notify();
                });
            }
            Effect::LoadSuspects => {
                let state = state.clone();
                tokio::spawn(async move {
                    let result = state.source.suspects().await;
                    if let Err(err) = &result {
                        warn!(error = %err, "suspect fetch failed");
                    }
                    let next = state.controller.lock().await.apply_suspects(result);
                    run_effects(&state, next);
                    state.notify();
                });
            }
            Effect::LoadNetwork(ticket) => {
                let state = state.clone();
                tokio::spawn(async move {
                    let result = state.source.network(&ticket.suspect).await;
                    let next = state.controller.lock().await.apply_network(&ticket, result);
                    run_effects(&state, next);
                    state.notify();
                });
            }
            Effect::StartTicker => start_ticker(state),
            Effect::StopTicker => stop_ticker(state),
        }
    }
}

fn start_ticker(state: &Arc<AppState>) {
    // The task holds a weak reference so the state owning it can still drop.
    let weak: Weak<AppState> = Arc::downgrade(state);
    let handle = TaskHandle::spawn("network-ticker", async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let Some(state) = weak.upgrade() else {
                break;
            };
            let frame = state.controller.lock().await.tick();
            if let Some(frame) = frame {
                let _ = state.events.send(StreamEvent::Tick(frame));
            }
        }
    });
    let mut slot = state.ticker.lock().unwrap_or_else(PoisonError::into_inner);
    // Replacing the handle aborts the previous ticker.
    *slot = Some(handle);
}

fn stop_ticker(state: &AppState) {
    let mut slot = state.ticker.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(mut handle) = slot.take() {
        handle.cancel();
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/state", get(state_handler))
        .route("/api/event", post(event_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/investigation", get(investigation_handler))
        .route("/api/health", get(health_handler))
        .route("/api/events", get(events_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the dashboard server and block until Ctrl+C.
pub async fn serve(
    source: Arc<dyn DataSource>,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(source, options.canvas, options.health_interval);
    let app = router(state);

    let addr = format!("127.0.0.1:{}", options.port);
    let url = format!("http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "dashboard listening");
    println!("Starting ringlens dashboard...");
    println!("Open in browser: {}", crate::style::url(&url));
    println!("Press Ctrl+C to stop");

    if options.open_browser {
        if let Err(e) = open::that(&url) {
            crate::style::warning(&format!("Could not open browser: {}", e));
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn state_handler(State(state): State<Arc<AppState>>) -> Json<UiSnapshot> {
    Json(state.controller.lock().await.snapshot())
}

async fn event_handler(
    State(state): State<Arc<AppState>>,
    Json(event): Json<UiEvent>,
) -> Json<UiSnapshot> {
    debug!(?event, "ui event");
    let (effects, snapshot) = {
        let mut controller = state.controller.lock().await;
        let effects = controller.handle(event);
        (effects, controller.snapshot())
    };
    run_effects(&state, effects);
    Json(snapshot)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTab {
    pub label: &'static str,
    pub value: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub analysis: ViewState<()>,
    pub svg: Option<String>,
    pub scope: usize,
    pub tabs: Vec<ClusterTab>,
    pub fan_window_labels: [&'static str; 3],
    pub widgets: Option<DashboardWidgets>,
    pub tooltip: Option<PackTooltip>,
}

async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Json<DashboardResponse> {
    let controller = state.controller.lock().await;
    let selection = controller.selection().selected_cluster;
    let tabs = cluster_tabs()
        .into_iter()
        .map(|(label, value)| ClusterTab {
            label,
            value: value.as_str().to_string(),
            active: value == selection,
        })
        .collect();
    Json(DashboardResponse {
        analysis: controller.analysis().map(|_| ()),
        svg: controller
            .pack()
            .map(|pack| pack_scene(pack, selection, controller.hovered())),
        scope: controller.pack().map_or(0, |pack| pack.scope()),
        tabs,
        fan_window_labels: fan_window_labels(),
        widgets: controller.widgets(),
        tooltip: controller.tooltip(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationResponse {
    pub suspects: ViewState<Vec<SuspectRow>>,
    pub focus: Option<String>,
    pub network: &'static str,
    pub error: Option<String>,
    pub generation: u64,
    pub svg: String,
}

async fn investigation_handler(
    State(state): State<Arc<AppState>>,
) -> Json<InvestigationResponse> {
    let controller = state.controller.lock().await;
    let canvas = controller.canvas();
    let view = controller.network();
    let (network, error) = match view.phase() {
        NetworkPhase::Idle => ("idle", None),
        NetworkPhase::Loading => ("loading", None),
        NetworkPhase::Empty => ("empty", None),
        NetworkPhase::Failed(msg) => ("failed", Some(msg.clone())),
        NetworkPhase::Ready(_) => ("ready", None),
    };
    Json(InvestigationResponse {
        suspects: controller.suspect_rows(),
        focus: controller.selection().selected_suspect_id.clone(),
        network,
        error,
        generation: view.generation(),
        svg: network_scene(view, canvas.width, canvas.height),
    })
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    Json(state.health.borrow().clone())
}

async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(|msg| match msg {
        Ok(StreamEvent::Tick(frame)) => serde_json::to_string(&frame)
            .ok()
            .map(|json| Ok(Event::default().event("tick").data(json))),
        Ok(StreamEvent::Changed) => Some(Ok(Event::default().event("refresh").data("{}"))),
        // Lagged receivers just skip ahead.
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)).text("ping"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Page;
    use crate::fetch::mock::MockSource;
    use crate::model::{
        AnalysisPayload, Category, Entity, NetworkGraph, NetworkGroup, NetworkLink, NetworkNode,
        Suspect,
    };

    fn source() -> Arc<MockSource> {
        let source = MockSource::default();
        let mut payload = AnalysisPayload::default();
        payload.clusters.push(Entity::new("0xMULE", Category::Mule));
        source.set_analysis(payload);
        source.set_suspects(vec![Suspect::new("0xA"), Suspect::new("0xB")]);
        source.set_network(
            "0xA",
            NetworkGraph {
                nodes: vec![
                    NetworkNode::new("0xA", NetworkGroup::Suspected),
                    NetworkNode::new("0xC", NetworkGroup::Related),
                ],
                links: vec![NetworkLink::new("0xA", "0xC")],
            },
        );
        Arc::new(source)
    }

    async fn spawn_server(state: Arc<AppState>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn wait_for<F>(state: &Arc<AppState>, mut done: F)
    where
        F: FnMut(&Controller) -> bool,
    {
        for _ in 0..200 {
            if done(&*state.controller.lock().await) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("controller never reached the expected state");
    }

    #[tokio::test]
    async fn test_navigate_loads_dashboard() {
        let state = AppState::new(source(), Canvas::default(), Duration::from_secs(60));
        let base = spawn_server(state.clone()).await;
        let client = reqwest::Client::new();

        let snapshot: serde_json::Value = client
            .post(format!("{base}/api/event"))
            .json(&serde_json::json!({"type": "navigate", "page": "dashboard"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(snapshot["page"], "dashboard");

        wait_for(&state, |c| c.analysis().ready().is_some()).await;

        let dashboard: serde_json::Value = client
            .get(format!("{base}/api/dashboard"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(dashboard["analysis"]["state"], "ready");
        assert_eq!(dashboard["scope"], 1);
        assert!(dashboard["svg"].as_str().unwrap().starts_with("<svg"));
        assert_eq!(dashboard["tabs"][0]["active"], true);
    }

    #[tokio::test]
    async fn test_investigation_selects_first_suspect_and_ticks() {
        let state = AppState::new(source(), Canvas::default(), Duration::from_secs(60));
        let mut events = state.events.subscribe();

        let effects = state.controller.lock().await.handle(UiEvent::Navigate {
            page: Page::Investigation,
        });
        run_effects(&state, effects);

        wait_for(&state, |c| c.network().layout().is_some()).await;
        assert!(state.is_ticking());

        let frame = loop {
            match events.recv().await.unwrap() {
                StreamEvent::Tick(frame) => break frame,
                StreamEvent::Changed => continue,
            }
        };
        assert_eq!(frame.nodes.len(), 2);

        let effects = state.controller.lock().await.handle(UiEvent::Navigate {
            page: Page::Dashboard,
        });
        run_effects(&state, effects);
        assert!(!state.is_ticking());
    }

    #[tokio::test]
    async fn test_empty_network_never_starts_ticker() {
        let state = AppState::new(source(), Canvas::default(), Duration::from_secs(60));
        let effects = {
            let mut controller = state.controller.lock().await;
            controller.handle(UiEvent::Navigate {
                page: Page::Investigation,
            });
            controller.handle(UiEvent::SelectSuspect { id: "0xB".into() })
        };
        run_effects(&state, effects);

        wait_for(&state, |c| matches!(c.network().phase(), NetworkPhase::Empty)).await;
        assert!(!state.is_ticking());
    }
}
