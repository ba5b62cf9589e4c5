//! Favorite toggling with optimistic feedback.
//!
//! A click flips the entry's visuals and stored `favIntbool` right away and
//! yields a [`PendingToggle`] carrying the pre-click value for the server.
//! When the answer arrives, [`FavoriteController::settle`] either confirms
//! (`1 - original`), keeps the optimistic state on an application error, or
//! rolls back when the request itself failed. Only one toggle per entry is
//! in flight at a time; clicks on a pending entry are dropped.

use crate::dom::{Document, NodeId};
use crate::errors::AppError;
use crate::event::ClickEvent;
use crate::models::{FavIntbool, SetFavoriteRequest, SetFavoriteResponse};
use crate::ui::{
    DATA_ENTRY_ID, DATA_FAV, ENTRY_CONTAINER, FAV_DISPLAY_ID, HEART, HIDDEN, HOLLOW, RIBBON,
    SOLID, TITLE_FAVORITE, TITLE_UNFAVORITE, VISIBLE,
};
use std::collections::HashMap;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteChanged {
    pub entry_id: String,
    pub favorited: bool,
}

pub trait FavoriteObserver {
    fn favorite_changed(&mut self, doc: &mut Document, change: &FavoriteChanged);
}

/// The page-level `#fav-display` heart. It mirrors the last toggle the way the
/// button does, as the next available action: hollow once favorited.
#[derive(Debug, Clone, Copy)]
pub struct FavDisplay {
    icon: NodeId,
}

impl FavDisplay {
    pub fn attach(doc: &Document) -> Option<Self> {
        let display = doc.by_id(FAV_DISPLAY_ID)?;
        let icon = doc.find_by_tag(display, "i").into_iter().next()?;
        Some(Self { icon })
    }
}

impl FavoriteObserver for FavDisplay {
    fn favorite_changed(&mut self, doc: &mut Document, change: &FavoriteChanged) {
        if change.favorited {
            doc.swap_class(self.icon, SOLID, HOLLOW);
        } else {
            doc.swap_class(self.icon, HOLLOW, SOLID);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending(Ticket),
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    pub ticket: Ticket,
    pub button: NodeId,
    pub request: SetFavoriteRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Confirmed,
    /// The server answered with an `error` field.
    Rejected { message: String, rolled_back: bool },
    /// The request failed; the optimistic change was undone.
    RolledBack { message: String },
    /// No toggle with this ticket is in flight.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: Ticket,
    button: NodeId,
    original: FavIntbool,
}

#[derive(Default)]
pub struct FavoriteController {
    rollback_on_app_error: bool,
    next_ticket: u64,
    in_flight: HashMap<String, InFlight>,
    phases: HashMap<String, Phase>,
    stored: HashMap<String, FavIntbool>,
    last_activated: Option<String>,
    observers: Vec<Box<dyn FavoriteObserver>>,
}

impl FavoriteController {
    pub fn new(rollback_on_app_error: bool) -> Self {
        Self {
            rollback_on_app_error,
            ..Self::default()
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn FavoriteObserver>) {
        self.observers.push(observer);
    }

    pub fn phase(&self, entry_id: &str) -> Phase {
        self.phases.get(entry_id).copied().unwrap_or(Phase::Idle)
    }

    pub fn is_pending(&self, entry_id: &str) -> bool {
        self.in_flight.contains_key(entry_id)
    }

    /// The value the server is known to hold after the last settled toggle,
    /// `None` when no answer has told us anything yet.
    pub fn stored_state(&self, entry_id: &str) -> Option<FavIntbool> {
        self.stored.get(entry_id).copied()
    }

    /// Handles a click on a `.set-fav-btn`.
    pub fn activate(
        &mut self,
        doc: &mut Document,
        button: NodeId,
        event: &mut ClickEvent,
    ) -> Option<PendingToggle> {
        event.prevent_default();

        let Some(entry_id) = doc.data(button, DATA_ENTRY_ID).map(str::to_string) else {
            warn!("favorite button without an entry id");
            return None;
        };
        if self.in_flight.contains_key(&entry_id) {
            debug!(entry_id = %entry_id, "favorite toggle already pending, ignoring click");
            return None;
        }

        let original = FavIntbool::parse(doc.data(button, DATA_FAV));
        let predicted = original.flipped();
        apply_visuals(doc, button, predicted);
        self.publish(doc, &entry_id, predicted);

        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.in_flight.insert(
            entry_id.clone(),
            InFlight {
                ticket,
                button,
                original,
            },
        );
        self.phases.insert(entry_id.clone(), Phase::Pending(ticket));
        self.last_activated = Some(entry_id.clone());
        debug!(
            entry_id = %entry_id,
            favorited = predicted.is_favorited(),
            "favorite toggled optimistically"
        );

        Some(PendingToggle {
            ticket,
            button,
            request: SetFavoriteRequest {
                entry_id,
                fav_intbool: original,
            },
        })
    }

    /// Applies the server's answer to a toggle started by [`Self::activate`].
    pub fn settle(
        &mut self,
        doc: &mut Document,
        pending: &PendingToggle,
        outcome: Result<SetFavoriteResponse, AppError>,
    ) -> Settled {
        let entry_id = pending.request.entry_id.as_str();
        let flight = match self.in_flight.get(entry_id) {
            Some(flight) if flight.ticket == pending.ticket => *flight,
            _ => return Settled::Stale,
        };
        self.in_flight.remove(entry_id);

        match outcome {
            Ok(SetFavoriteResponse { error: None }) => {
                let confirmed = flight.original.flipped();
                let shown = FavIntbool::parse(doc.data(flight.button, DATA_FAV));
                apply_visuals(doc, flight.button, confirmed);
                if shown != confirmed {
                    self.publish_if_latest(doc, entry_id, confirmed);
                }
                self.stored.insert(entry_id.to_string(), confirmed);
                self.phases.insert(entry_id.to_string(), Phase::Confirmed);
                Settled::Confirmed
            }
            Ok(SetFavoriteResponse {
                error: Some(message),
            }) => {
                warn!(entry_id, "server rejected favorite change: {message}");
                if self.rollback_on_app_error {
                    self.restore(doc, entry_id, flight);
                }
                // refused, so the server still holds the pre-click value
                self.stored.insert(entry_id.to_string(), flight.original);
                self.phases.insert(entry_id.to_string(), Phase::Failed);
                Settled::Rejected {
                    message,
                    rolled_back: self.rollback_on_app_error,
                }
            }
            Err(err) => {
                if err.is_transport() {
                    error!(entry_id, "favorite request failed: {err}");
                } else {
                    error!(entry_id, "favorite request could not be sent: {err}");
                }
                self.restore(doc, entry_id, flight);
                self.phases.insert(entry_id.to_string(), Phase::Failed);
                Settled::RolledBack {
                    message: err.to_string(),
                }
            }
        }
    }

    fn restore(&mut self, doc: &mut Document, entry_id: &str, flight: InFlight) {
        apply_visuals(doc, flight.button, flight.original);
        self.publish_if_latest(doc, entry_id, flight.original);
    }

    /// Late answers only reach observers while their entry is still the one
    /// last toggled.
    fn publish_if_latest(&mut self, doc: &mut Document, entry_id: &str, state: FavIntbool) {
        if self.last_activated.as_deref() == Some(entry_id) {
            self.publish(doc, entry_id, state);
        } else {
            debug!(entry_id, "newer toggle owns the display, not notifying");
        }
    }

    fn publish(&mut self, doc: &mut Document, entry_id: &str, state: FavIntbool) {
        let change = FavoriteChanged {
            entry_id: entry_id.to_string(),
            favorited: state.is_favorited(),
        };
        for observer in &mut self.observers {
            observer.favorite_changed(doc, &change);
        }
    }
}

/// Writes `state` into the button's data, tooltip and heart, and the entry's ribbon.
fn apply_visuals(doc: &mut Document, button: NodeId, state: FavIntbool) {
    let ribbons = doc
        .closest_ancestor(button, ENTRY_CONTAINER)
        .map(|container| doc.find(container, RIBBON))
        .unwrap_or_default();
    let icons = doc.find(button, HEART);

    let (ribbon_from, ribbon_to, icon_from, icon_to, tooltip) = if state.is_favorited() {
        (HIDDEN, VISIBLE, HOLLOW, SOLID, TITLE_UNFAVORITE)
    } else {
        (VISIBLE, HIDDEN, SOLID, HOLLOW, TITLE_FAVORITE)
    };
    for ribbon in ribbons {
        doc.swap_class(ribbon, ribbon_from, ribbon_to);
    }
    for icon in icons {
        doc.swap_class(icon, icon_from, icon_to);
    }
    doc.set_data(button, DATA_FAV, state.as_data());
    doc.set_title(button, tooltip);
}
