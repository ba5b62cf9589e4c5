use crate::config::Config;
use crate::dom::{Document, NodeId};
use crate::endpoint::FavoriteEndpoint;
use crate::errors::AppError;
use crate::event::ClickEvent;
use crate::favorite::{FavDisplay, FavoriteController, PendingToggle, Phase, Settled};
use crate::models::{FavIntbool, PageSnapshot, SetFavoriteResponse};
use crate::notice::Notices;
use crate::panel::toggle_panel;
use crate::text_reveal::{collapse, reveal};
use crate::ui::{
    DATA_ENTRY_ID, DATA_FAV, ENTRY_TITLE, SET_FAV_BTN, TEXT_CONTAINER, TEXT_TOGGLE, render_page,
};
use chrono::{DateTime, Local};
use tracing::info;

/// A rendered archive page with its click behaviors bound.
pub struct Page {
    doc: Document,
    snapshot: PageSnapshot,
    favorites: FavoriteController,
    notices: Notices,
}

impl Page {
    pub fn new(snapshot: PageSnapshot, config: &Config) -> Self {
        let doc = render_page(&snapshot);
        let mut favorites = FavoriteController::new(config.rollback_on_app_error);
        if let Some(display) = FavDisplay::attach(&doc) {
            favorites.subscribe(Box::new(display));
        }
        Self {
            doc,
            snapshot,
            favorites,
            notices: Notices::new(config.notice_ttl),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn favorite_phase(&self, entry_id: &str) -> Phase {
        self.favorites.phase(entry_id)
    }

    pub fn favorite_button(&self, entry_id: &str) -> Option<NodeId> {
        self.doc
            .find(self.doc.root(), SET_FAV_BTN)
            .into_iter()
            .find(|button| self.doc.data(*button, DATA_ENTRY_ID) == Some(entry_id))
    }

    pub fn is_favorited(&self, entry_id: &str) -> Option<bool> {
        let button = self.favorite_button(entry_id)?;
        Some(FavIntbool::parse(self.doc.data(button, DATA_FAV)).is_favorited())
    }

    /// Runs every bound behavior on the path from the click target up to the
    /// root, innermost first.
    pub fn dispatch_click(&mut self, event: &mut ClickEvent) -> Vec<PendingToggle> {
        let mut pending = Vec::new();
        for node in self.doc.ancestors_inclusive(event.target) {
            if self.doc.has_class(node, ENTRY_TITLE) {
                toggle_panel(&mut self.doc, node, event);
            }
            if self.doc.has_class(node, SET_FAV_BTN) {
                pending.extend(self.favorites.activate(&mut self.doc, node, event));
            }
            if self.doc.has_class(node, TEXT_TOGGLE) {
                reveal(&mut self.doc, node);
            }
            if self.doc.has_class(node, TEXT_CONTAINER) {
                collapse(&mut self.doc, node, event);
            }
        }
        pending
    }

    pub fn settle(
        &mut self,
        pending: &PendingToggle,
        outcome: Result<SetFavoriteResponse, AppError>,
    ) -> Settled {
        self.settle_at(pending, outcome, Local::now())
    }

    pub fn settle_at(
        &mut self,
        pending: &PendingToggle,
        outcome: Result<SetFavoriteResponse, AppError>,
        now: DateTime<Local>,
    ) -> Settled {
        let settled = self.favorites.settle(&mut self.doc, pending, outcome);
        match &settled {
            Settled::RolledBack { .. }
            | Settled::Rejected {
                rolled_back: true, ..
            } => {
                self.notices.push("Failed to update favorite, change was undone!", now);
            }
            Settled::Confirmed => {
                info!(entry_id = %pending.request.entry_id, "favorite change saved");
            }
            Settled::Rejected { .. } | Settled::Stale => {}
        }
        self.notices.prune(now);
        settled
    }

    /// Dispatches the click and waits for every favorite request it started.
    pub async fn click_and_settle<E: FavoriteEndpoint>(
        &mut self,
        event: &mut ClickEvent,
        endpoint: &E,
    ) -> Vec<Settled> {
        let pending = self.dispatch_click(event);
        let mut settled = Vec::with_capacity(pending.len());
        for toggle in &pending {
            let outcome = endpoint.set_favorite(&toggle.request).await;
            settled.push(self.settle(toggle, outcome));
        }
        settled
    }

    /// Clicks the favorite button of `entry_id` and settles the request.
    pub async fn toggle_favorite<E: FavoriteEndpoint>(
        &mut self,
        entry_id: &str,
        endpoint: &E,
    ) -> Result<Vec<Settled>, AppError> {
        let button = self
            .favorite_button(entry_id)
            .ok_or_else(|| AppError::UnknownEntry(entry_id.to_string()))?;
        let mut event = ClickEvent::new(button);
        Ok(self.click_and_settle(&mut event, endpoint).await)
    }

    /// The page as the server holds it: rendered favorites, overridden by
    /// whatever settled answers reported since. Optimistic state left on
    /// screen after a refusal is not included.
    pub fn snapshot(&self) -> PageSnapshot {
        let mut snapshot = self.snapshot.clone();
        for entry in &mut snapshot.entries {
            if let Some(stored) = self.favorites.stored_state(&entry.id) {
                entry.favorite = stored.is_favorited();
            }
        }
        snapshot
    }
}
