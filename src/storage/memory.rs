// src/storage/memory.rs
use dashmap::DashMap;
use log::debug;
use parking_lot::RwLock;
use serde::Serialize;

use crate::models::cycle::PollSummary;
use crate::models::endpoint::Endpoint;
use crate::models::status::ServerStatus;
use crate::view::{ EndpointView, SummaryView, ViewSink };

/// In-memory stand-in for the dashboard page: one card per configured
/// endpoint plus the aggregate panel. Cards exist only for endpoints known
/// at construction.
pub struct StatusBoard {
    order: Vec<String>,
    cards: DashMap<String, EndpointView>,
    summary: RwLock<SummaryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub servers: Vec<EndpointView>,
    pub summary: SummaryView,
}

impl StatusBoard {
    pub fn new(endpoints: &[Endpoint]) -> Self {
        let cards = DashMap::new();
        for endpoint in endpoints {
            cards.insert(endpoint.id.clone(), EndpointView::pending(&endpoint.id, &endpoint.display_name));
        }
        Self {
            order: endpoints.iter().map(|e| e.id.clone()).collect(),
            cards,
            summary: RwLock::new(SummaryView {
                total_servers: endpoints.len(),
                ..SummaryView::default()
            }),
        }
    }

    pub fn card(&self, endpoint_id: &str) -> Option<EndpointView> {
        self.cards.get(endpoint_id).map(|r| r.value().clone())
    }

    pub fn summary(&self) -> SummaryView {
        self.summary.read().clone()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            servers: self.order.iter().filter_map(|id| self.card(id)).collect(),
            summary: self.summary(),
        }
    }
}

impl ViewSink for StatusBoard {
    fn render_loading(&self, endpoint_id: &str) {
        match self.cards.get_mut(endpoint_id) {
            Some(mut card) => card.set_loading(),
            None => debug!("No card for {}, loading state dropped", endpoint_id),
        }
    }

    fn render_endpoint(&self, endpoint_id: &str, status: &ServerStatus) {
        match self.cards.get_mut(endpoint_id) {
            Some(mut card) => card.apply(status),
            None => debug!("No card for {}, status dropped", endpoint_id),
        }
    }

    fn render_summary(&self, summary: &PollSummary) {
        *self.summary.write() = SummaryView::from(summary);
    }
}
