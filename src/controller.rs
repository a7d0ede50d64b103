//! Single owner of UI state. Every interaction arrives as a [`UiEvent`];
//! anything that needs I/O is handed back to the caller as an [`Effect`].

use crate::filter::{FanWindow, FilterState};
use crate::layout::{
    ClusterPackView, DragPhase, ForceParams, NetworkTicket, NetworkView, PackTooltip,
    PositionFrame,
};
use crate::model::{AnalysisPayload, NetworkGraph, PatternTag, Suspect};
use crate::selection::{ClusterSelection, SelectionState};
use crate::widgets::{self, DashboardWidgets, SuspectFilter, SuspectRow};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Ingestion,
    Dashboard,
    Investigation,
}

/// Lifecycle of anything backed by a fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Empty,
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(value) => ViewState::Ready(f(value)),
            ViewState::Empty => ViewState::Empty,
            ViewState::Failed(msg) => ViewState::Failed(msg.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    Navigate { page: Page },
    AnalysisComplete,
    Refresh,
    SelectCluster { cluster: ClusterSelection },
    /// Click on the pack canvas, in screen coordinates.
    PackClick { x: f64, y: f64 },
    PackHover { x: f64, y: f64 },
    PackLeave,
    ZoomIn,
    ZoomOut,
    Wheel { factor: f64, x: f64, y: f64 },
    Pan { dx: f64, dy: f64 },
    SetFanWindow { window: FanWindow },
    SetCommissionRetention { enabled: bool },
    SearchSuspects { term: String },
    TogglePattern { tag: PatternTag, enabled: bool },
    SelectSuspect { id: String },
    Drag {
        phase: DragPhase,
        node: String,
        x: f64,
        y: f64,
    },
}

/// Work the owner of the controller must perform on its behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadAnalysis,
    LoadSuspects,
    LoadNetwork(NetworkTicket),
    StartTicker,
    StopTicker,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: ClusterPackView::default_height(960.0),
            padding: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    pub page: Page,
    pub selection: SelectionState,
    pub filters: FilterState,
    pub suspect_filter: SuspectFilter,
}

#[derive(Debug)]
pub struct Controller {
    canvas: Canvas,
    page: Page,
    selection: SelectionState,
    filters: FilterState,
    suspect_filter: SuspectFilter,
    analysis: ViewState<AnalysisPayload>,
    pack: Option<ClusterPackView>,
    hovered: Option<usize>,
    suspects: ViewState<Vec<Suspect>>,
    network: NetworkView,
}

impl Controller {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            page: Page::Ingestion,
            selection: SelectionState::default(),
            filters: FilterState::default(),
            suspect_filter: SuspectFilter::default(),
            analysis: ViewState::Loading,
            pack: None,
            hovered: None,
            suspects: ViewState::Loading,
            network: NetworkView::new(ForceParams::centered(canvas.width, canvas.height)),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn suspect_filter(&self) -> &SuspectFilter {
        &self.suspect_filter
    }

    pub fn analysis(&self) -> &ViewState<AnalysisPayload> {
        &self.analysis
    }

    pub fn pack(&self) -> Option<&ClusterPackView> {
        self.pack.as_ref()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn suspects(&self) -> &ViewState<Vec<Suspect>> {
        &self.suspects
    }

    pub fn network(&self) -> &NetworkView {
        &self.network
    }

    pub fn snapshot(&self) -> UiSnapshot {
        UiSnapshot {
            page: self.page,
            selection: self.selection.clone(),
            filters: self.filters,
            suspect_filter: self.suspect_filter.clone(),
        }
    }

    pub fn handle(&mut self, event: UiEvent) -> Vec<Effect> {
        debug!(?event, "ui event");
        match event {
            UiEvent::Navigate { page } => self.navigate(page),
            UiEvent::AnalysisComplete => {
                let mut effects = self.navigate(Page::Dashboard);
                if !effects.contains(&Effect::LoadAnalysis) {
                    self.analysis = ViewState::Loading;
                    effects.push(Effect::LoadAnalysis);
                }
                effects
            }
            UiEvent::Refresh => self.refresh(),
            UiEvent::SelectCluster { cluster } => {
                self.select_cluster(cluster);
                Vec::new()
            }
            UiEvent::PackClick { x, y } => {
                if let Some(selection) = self.pack.as_ref().and_then(|p| p.click_at(x, y)) {
                    self.select_cluster(selection);
                }
                Vec::new()
            }
            UiEvent::PackHover { x, y } => {
                let selection = self.selection.selected_cluster;
                self.hovered = self
                    .pack
                    .as_ref()
                    .and_then(|p| p.node_at(x, y).filter(|&i| p.is_hoverable(i, selection)));
                Vec::new()
            }
            UiEvent::PackLeave => {
                self.hovered = None;
                Vec::new()
            }
            UiEvent::ZoomIn => self.with_pack(ClusterPackView::zoom_in),
            UiEvent::ZoomOut => self.with_pack(ClusterPackView::zoom_out),
            UiEvent::Wheel { factor, x, y } => self.with_pack(|p| p.wheel(factor, (x, y))),
            UiEvent::Pan { dx, dy } => self.with_pack(|p| p.pan(dx, dy)),
            UiEvent::SetFanWindow { window } => {
                self.filters.fan_window = window;
                Vec::new()
            }
            UiEvent::SetCommissionRetention { enabled } => {
                self.filters.commission_retention = enabled;
                Vec::new()
            }
            UiEvent::SearchSuspects { term } => {
                self.suspect_filter.search = term;
                Vec::new()
            }
            UiEvent::TogglePattern { tag, enabled } => {
                self.suspect_filter.set(tag, enabled);
                Vec::new()
            }
            UiEvent::SelectSuspect { id } => self.select_suspect(id),
            UiEvent::Drag { phase, node, x, y } => {
                if self.network.drag(phase, &node, x, y) && phase == DragPhase::Start {
                    vec![Effect::StartTicker]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn with_pack(&mut self, f: impl FnOnce(&mut ClusterPackView)) -> Vec<Effect> {
        if let Some(pack) = self.pack.as_mut() {
            f(pack);
        }
        Vec::new()
    }

    fn select_cluster(&mut self, selection: ClusterSelection) {
        if self.selection.selected_cluster != selection {
            info!(cluster = %selection, "cluster selected");
        }
        self.selection.select_cluster(selection);
        // A leaf hovered under the old selection may be dimmed now.
        if let (Some(index), Some(pack)) = (self.hovered, self.pack.as_ref()) {
            if !pack.is_hoverable(index, selection) {
                self.hovered = None;
            }
        }
    }

    fn navigate(&mut self, page: Page) -> Vec<Effect> {
        if page == self.page {
            return Vec::new();
        }
        info!(from = ?self.page, to = ?page, "navigate");
        let mut effects = Vec::new();

        match self.page {
            Page::Investigation => {
                self.network.clear();
                self.selection.clear_suspect();
                self.suspect_filter = SuspectFilter::default();
                effects.push(Effect::StopTicker);
            }
            Page::Dashboard => {
                self.selection.select_cluster(ClusterSelection::All);
                self.filters = FilterState::default();
                self.hovered = None;
                if let Some(pack) = self.pack.as_mut() {
                    pack.reset_zoom();
                }
            }
            Page::Ingestion => {}
        }

        self.page = page;
        match page {
            Page::Dashboard => {
                self.analysis = ViewState::Loading;
                self.pack = None;
                effects.push(Effect::LoadAnalysis);
            }
            Page::Investigation => {
                self.suspects = ViewState::Loading;
                effects.push(Effect::LoadSuspects);
            }
            Page::Ingestion => {}
        }
        effects
    }

    fn refresh(&mut self) -> Vec<Effect> {
        match self.page {
            Page::Dashboard => {
                self.analysis = ViewState::Loading;
                vec![Effect::LoadAnalysis]
            }
            Page::Investigation => {
                self.suspects = ViewState::Loading;
                let mut effects = vec![Effect::LoadSuspects];
                if let Some(id) = self.selection.selected_suspect_id.clone() {
                    effects.push(Effect::StopTicker);
                    effects.push(Effect::LoadNetwork(self.network.request(id)));
                }
                effects
            }
            Page::Ingestion => Vec::new(),
        }
    }

    fn select_suspect(&mut self, id: String) -> Vec<Effect> {
        if id.is_empty() || !self.selection.select_suspect(id.clone()) {
            return Vec::new();
        }
        info!(suspect = %id, "suspect selected");
        let ticket = self.network.request(id);
        vec![Effect::StopTicker, Effect::LoadNetwork(ticket)]
    }

    pub fn apply_analysis<E: fmt::Display>(&mut self, result: Result<AnalysisPayload, E>) {
        if self.page != Page::Dashboard {
            debug!("analysis arrived after leaving the dashboard");
            return;
        }
        match result {
            Ok(payload) => {
                let canvas = self.canvas;
                self.pack = Some(ClusterPackView::new(
                    &payload.clusters,
                    canvas.width,
                    canvas.height,
                    canvas.padding,
                ));
                self.hovered = None;
                self.analysis = if payload.clusters.is_empty() && payload.rings.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::Ready(payload)
                };
            }
            Err(err) => {
                self.pack = None;
                self.analysis = ViewState::Failed(err.to_string());
            }
        }
    }

    /// Store the suspect list. Selects the first suspect when nothing is
    /// focused yet.
    pub fn apply_suspects<E: fmt::Display>(
        &mut self,
        result: Result<Vec<Suspect>, E>,
    ) -> Vec<Effect> {
        if self.page != Page::Investigation {
            debug!("suspects arrived after leaving the investigation page");
            return Vec::new();
        }
        match result {
            Ok(list) if list.is_empty() => {
                self.suspects = ViewState::Empty;
                Vec::new()
            }
            Ok(list) => {
                let first = list.first().map(|s| s.id.clone());
                self.suspects = ViewState::Ready(list);
                match first {
                    Some(id) if self.selection.selected_suspect_id.is_none() => {
                        self.select_suspect(id)
                    }
                    _ => Vec::new(),
                }
            }
            Err(err) => {
                self.suspects = ViewState::Failed(err.to_string());
                Vec::new()
            }
        }
    }

    pub fn apply_network<E: fmt::Display>(
        &mut self,
        ticket: &NetworkTicket,
        result: Result<NetworkGraph, E>,
    ) -> Vec<Effect> {
        if self.network.resolve(ticket, result) && self.network.layout().is_some() {
            vec![Effect::StartTicker]
        } else {
            Vec::new()
        }
    }

    pub fn is_current(&self, ticket: &NetworkTicket) -> bool {
        self.network.is_current(ticket)
    }

    pub fn needs_tick(&self) -> bool {
        self.network.needs_tick()
    }

    pub fn tick(&mut self) -> Option<PositionFrame> {
        self.network.tick()
    }

    pub fn tooltip(&self) -> Option<PackTooltip> {
        let index = self.hovered?;
        self.pack.as_ref()?.hover(index, self.selection.selected_cluster)
    }

    pub fn widgets(&self) -> Option<DashboardWidgets> {
        let payload = self.analysis.ready()?;
        Some(widgets::dashboard_widgets(
            payload,
            self.selection.selected_cluster,
            &self.filters,
        ))
    }

    pub fn suspect_rows(&self) -> ViewState<Vec<SuspectRow>> {
        self.suspects.map(|list| {
            widgets::suspect_rows(
                list,
                &self.suspect_filter,
                self.selection.selected_suspect_id.as_deref(),
            )
        })
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Canvas::default())
    }
}
