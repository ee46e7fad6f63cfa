//! Discovery controller actor.
//!
//! Coordinates four coupled asynchronous resources:
//!
//! | Resource  | Trigger                         | Effect on `ViewState`                         |
//! |-----------|---------------------------------|-----------------------------------------------|
//! | location  | spawn                           | `location_fix` or `location_error`            |
//! | categories| spawn (parallel with location)  | `categories`; first load auto-selects         |
//! | selection | `select_category` / auto-select | issues a places fetch                         |
//! | places    | each selection change           | replaces `places`; failure keeps the old list |
//!
//! The actor (`DiscoveryTask`) is the only writer of `ViewState`. All I/O
//! runs in spawned tasks that report back through the mailbox, so the actor
//! keeps processing user input while requests are in flight.
//!
//! # Last-request-wins
//!
//! Every request is tagged with a [`Ticket`] from the resource's
//! [`RequestTracker`]. When a response arrives with a ticket that is no
//! longer current, it is dropped. Responses therefore apply in the order
//! requests were issued, regardless of the order they complete in.

use std::sync::Arc;

use nearby_api::{CategoryRepository, FetchResult, PlaceRepository};
use nearby_core::{Category, CategoryId, LocationFix, Place};
use nearby_location::{LocationProvider, LocationResult};
use nearby_telemetry::Metrics;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::collaborators::{Alert, AlertKind, Navigator, Notifier};
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::generation::{RequestTracker, Ticket};
use crate::state::{MapSpan, ViewState};

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Mailbox capacity for user commands and I/O completions.
    pub mailbox_capacity: usize,
    /// Map region forwarded to the presenter.
    pub map_span: MapSpan,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 64,
            map_span: MapSpan::default(),
        }
    }
}

/// Collaborators the controller drives.
#[derive(Clone)]
pub struct DiscoveryDeps {
    pub location: LocationProvider,
    pub categories: Arc<dyn CategoryRepository>,
    pub places: Arc<dyn PlaceRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

// ============================================================================
// DiscoveryMsg
// ============================================================================

/// Messages for the discovery actor.
#[derive(Debug)]
enum DiscoveryMsg {
    /// User picked a category (raw id from the picker).
    SelectCategory(String),

    /// Manual location retry after a failure.
    RetryLocation,

    /// Manual category reload.
    ReloadCategories,

    /// Re-fetch places for the current selection.
    RefreshPlaces,

    /// A marker's detail affordance was activated.
    OpenPlace(String),

    /// Reply once every earlier message has been processed.
    Flush(oneshot::Sender<()>),

    LocationResolved {
        ticket: Ticket,
        result: LocationResult<LocationFix>,
    },

    CategoriesLoaded {
        ticket: Ticket,
        result: FetchResult<Vec<Category>>,
    },

    PlacesLoaded {
        ticket: Ticket,
        category: CategoryId,
        result: FetchResult<Vec<Place>>,
    },

    Shutdown,
}

// ============================================================================
// DiscoveryTask
// ============================================================================

/// Discovery actor task.
///
/// Processes messages sequentially; owns the authoritative `ViewState`.
struct DiscoveryTask {
    rx: mpsc::Receiver<DiscoveryMsg>,
    /// Weak so the mailbox closes once every handle is dropped and no
    /// request is in flight.
    tx: mpsc::WeakSender<DiscoveryMsg>,
    deps: DiscoveryDeps,
    view: ViewState,
    view_tx: watch::Sender<ViewState>,
    location_requests: RequestTracker,
    category_requests: RequestTracker,
    place_requests: RequestTracker,
}

impl DiscoveryTask {
    /// Run the discovery actor.
    ///
    /// Starts the location request and the category load, then processes
    /// messages until shutdown.
    async fn run(mut self) {
        info!("Discovery controller started");

        self.request_location();
        self.request_categories();

        while let Some(msg) = self.rx.recv().await {
            match msg {
                DiscoveryMsg::Shutdown => {
                    debug!("Discovery controller shutting down");
                    break;
                }
                msg => self.handle_message(msg),
            }
        }

        info!("Discovery controller stopped");
    }

    fn handle_message(&mut self, msg: DiscoveryMsg) {
        match msg {
            DiscoveryMsg::SelectCategory(id) => self.on_select_category(id),
            DiscoveryMsg::RetryLocation => self.on_retry_location(),
            DiscoveryMsg::ReloadCategories => self.request_categories(),
            DiscoveryMsg::RefreshPlaces => self.on_refresh_places(),
            DiscoveryMsg::OpenPlace(id) => self.on_open_place(&id),
            DiscoveryMsg::Flush(reply) => {
                let _ = reply.send(());
            }
            DiscoveryMsg::LocationResolved { ticket, result } => {
                self.on_location_resolved(ticket, result)
            }
            DiscoveryMsg::CategoriesLoaded { ticket, result } => {
                self.on_categories_loaded(ticket, result)
            }
            DiscoveryMsg::PlacesLoaded {
                ticket,
                category,
                result,
            } => self.on_places_loaded(ticket, category, result),
            DiscoveryMsg::Shutdown => {}
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.view.clone());
    }

    fn alert(&self, kind: AlertKind, detail: String) {
        Metrics::alert_raised(kind.as_str());
        self.deps.notifier.notify(&Alert::new(kind, detail));
    }

    // === Location ===

    fn request_location(&mut self) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        let ticket = self.location_requests.issue();

        self.view.is_location_loading = true;
        self.view.location_error = None;
        self.publish();

        let provider = self.deps.location.clone();
        tokio::spawn(async move {
            let result = provider.request_location().await;
            let _ = tx
                .send(DiscoveryMsg::LocationResolved { ticket, result })
                .await;
        });
    }

    fn on_retry_location(&mut self) {
        if self.view.is_location_loading || self.view.location_fix.is_some() {
            debug!("Location retry ignored: request in flight or fix present");
            return;
        }
        info!("Retrying location request");
        self.request_location();
    }

    fn on_location_resolved(&mut self, ticket: Ticket, result: LocationResult<LocationFix>) {
        if !self.location_requests.is_current(ticket) {
            debug!(generation = ticket.generation(), "Discarding stale location result");
            Metrics::stale_response("location");
            return;
        }

        self.view.is_location_loading = false;
        match result {
            Ok(fix) => {
                Metrics::location_outcome("fix");
                self.view.location_fix = Some(fix);
                self.view.location_error = None;
            }
            Err(e) => {
                Metrics::location_outcome(e.outcome_label());
                warn!(error = %e, "Location request failed");
                self.view.location_fix = None;
                self.view.location_error = Some(e.clone());
                self.alert(AlertKind::Location, e.to_string());
            }
        }
        self.publish();
    }

    // === Categories ===

    fn request_categories(&mut self) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        let ticket = self.category_requests.issue();

        self.view.is_categories_loading = true;
        self.publish();

        let repo = Arc::clone(&self.deps.categories);
        tokio::spawn(async move {
            let result = repo.list_categories().await;
            let _ = tx
                .send(DiscoveryMsg::CategoriesLoaded { ticket, result })
                .await;
        });
    }

    fn on_categories_loaded(&mut self, ticket: Ticket, result: FetchResult<Vec<Category>>) {
        if !self.category_requests.is_current(ticket) {
            debug!(generation = ticket.generation(), "Discarding stale categories");
            Metrics::stale_response("categories");
            return;
        }

        self.view.is_categories_loading = false;

        let categories = match result {
            Ok(categories) => categories,
            Err(e) => {
                // Previous list stays; on first load that means empty.
                self.alert(AlertKind::Categories, e.to_string());
                self.publish();
                return;
            }
        };

        info!(count = categories.len(), "Categories loaded");
        self.view.categories = categories;

        let still_valid = self
            .view
            .selected_category_id
            .as_ref()
            .is_some_and(|id| self.view.categories.iter().any(|c| &c.id == id));

        if still_valid {
            self.publish();
            return;
        }

        match self.view.categories.first().map(|c| c.id.clone()) {
            Some(first) => {
                debug!(category = %first, "Auto-selecting first category");
                self.apply_selection(first);
            }
            None => {
                // Supersede any places request still in flight.
                self.place_requests.issue();
                self.view.selected_category_id = None;
                self.view.is_places_loading = false;
                self.publish();
            }
        }
    }

    // === Selection & places ===

    fn on_select_category(&mut self, raw: String) {
        let Ok(id) = CategoryId::new(raw) else {
            debug!("Empty category selection ignored");
            return;
        };

        if !self.view.categories.iter().any(|c| c.id == id) {
            warn!(category = %id, "Ignoring selection of unknown category");
            return;
        }

        if self.view.selected_category_id.as_ref() == Some(&id) {
            debug!(category = %id, "Category already selected");
            return;
        }

        self.apply_selection(id);
    }

    fn apply_selection(&mut self, id: CategoryId) {
        info!(category = %id, "Category selected");
        self.view.selected_category_id = Some(id.clone());
        self.request_places(id);
    }

    fn on_refresh_places(&mut self) {
        match self.view.selected_category_id.clone() {
            Some(id) => self.request_places(id),
            None => debug!("Places refresh ignored: no category selected"),
        }
    }

    fn request_places(&mut self, category: CategoryId) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        let ticket = self.place_requests.issue();
        debug!(%category, generation = ticket.generation(), "Fetching places");

        self.view.is_places_loading = true;
        self.publish();

        let repo = Arc::clone(&self.deps.places);
        tokio::spawn(async move {
            let result = repo.list_places(&category).await;
            let _ = tx
                .send(DiscoveryMsg::PlacesLoaded {
                    ticket,
                    category,
                    result,
                })
                .await;
        });
    }

    fn on_places_loaded(
        &mut self,
        ticket: Ticket,
        category: CategoryId,
        result: FetchResult<Vec<Place>>,
    ) {
        if !self.place_requests.is_current(ticket) {
            debug!(
                %category,
                generation = ticket.generation(),
                "Discarding places for superseded request"
            );
            Metrics::stale_response("places");
            return;
        }

        self.view.is_places_loading = false;
        match result {
            Ok(places) => {
                info!(%category, count = places.len(), "Places loaded");
                self.view.places = places;
            }
            Err(e) => {
                // Stale-but-present beats blank.
                self.alert(AlertKind::Places, e.to_string());
            }
        }
        self.publish();
    }

    fn on_open_place(&self, raw: &str) {
        match self.view.place(raw) {
            Some(place) => {
                info!(place_id = %place.id, "Opening place detail");
                self.deps.navigator.navigate_to_detail(&place.id);
            }
            None => warn!(place_id = raw, "Ignoring detail request for unknown place"),
        }
    }
}

// ============================================================================
// DiscoveryHandle
// ============================================================================

/// Handle for interacting with the discovery controller.
///
/// Cheap to clone. The controller stops once every handle is dropped (or
/// [`shutdown`](Self::shutdown) is called).
#[derive(Clone)]
pub struct DiscoveryHandle {
    tx: mpsc::Sender<DiscoveryMsg>,
    view_rx: watch::Receiver<ViewState>,
    map_span: MapSpan,
}

impl DiscoveryHandle {
    async fn send(&self, msg: DiscoveryMsg) -> DiscoveryResult<()> {
        self.tx.send(msg).await.map_err(|_| DiscoveryError::Closed)
    }

    fn try_send(&self, msg: DiscoveryMsg) -> DiscoveryResult<()> {
        self.tx.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DiscoveryError::MailboxFull,
            mpsc::error::TrySendError::Closed(_) => DiscoveryError::Closed,
        })
    }

    /// Select a category. Empty ids are a no-op; unknown ids are ignored.
    pub async fn select_category(&self, id: impl Into<String>) -> DiscoveryResult<()> {
        self.send(DiscoveryMsg::SelectCategory(id.into())).await
    }

    /// Non-blocking variant of [`select_category`](Self::select_category)
    /// for synchronous UI callbacks.
    pub fn try_select_category(&self, id: impl Into<String>) -> DiscoveryResult<()> {
        self.try_send(DiscoveryMsg::SelectCategory(id.into()))
    }

    /// Open the detail view for a place currently on screen.
    pub async fn open_place(&self, place_id: impl Into<String>) -> DiscoveryResult<()> {
        self.send(DiscoveryMsg::OpenPlace(place_id.into())).await
    }

    /// Non-blocking variant of [`open_place`](Self::open_place).
    pub fn try_open_place(&self, place_id: impl Into<String>) -> DiscoveryResult<()> {
        self.try_send(DiscoveryMsg::OpenPlace(place_id.into()))
    }

    /// Request the location again after a failure.
    ///
    /// Ignored while a request is in flight or once a fix exists.
    pub async fn retry_location(&self) -> DiscoveryResult<()> {
        self.send(DiscoveryMsg::RetryLocation).await
    }

    /// Re-fetch the category list.
    pub async fn reload_categories(&self) -> DiscoveryResult<()> {
        self.send(DiscoveryMsg::ReloadCategories).await
    }

    /// Re-fetch places for the current selection.
    pub async fn refresh_places(&self) -> DiscoveryResult<()> {
        self.send(DiscoveryMsg::RefreshPlaces).await
    }

    /// Wait until every message sent before this call has been processed.
    pub async fn flush(&self) -> DiscoveryResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(DiscoveryMsg::Flush(reply_tx)).await?;
        reply_rx.await.map_err(|_| DiscoveryError::Closed)
    }

    /// Stop the controller. In-flight responses are dropped.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(DiscoveryMsg::Shutdown).await;
    }

    /// Current snapshot.
    pub fn view(&self) -> ViewState {
        self.view_rx.borrow().clone()
    }

    /// Receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view_rx.clone()
    }

    /// Map region configured for this session.
    pub fn map_span(&self) -> MapSpan {
        self.map_span
    }

    /// Wait for the first snapshot satisfying `predicate`.
    pub async fn wait_until(
        &self,
        mut predicate: impl FnMut(&ViewState) -> bool,
    ) -> DiscoveryResult<ViewState> {
        let mut rx = self.subscribe();
        let view = rx
            .wait_for(|view| predicate(view))
            .await
            .map_err(|_| DiscoveryError::Closed)?;
        Ok(view.clone())
    }
}

/// Spawn the discovery controller.
///
/// Location and categories start loading immediately.
pub fn spawn_discovery(
    deps: DiscoveryDeps,
    config: DiscoveryConfig,
) -> (DiscoveryHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(config.mailbox_capacity);
    let (view_tx, view_rx) = watch::channel(ViewState::mounting());

    let task = DiscoveryTask {
        rx,
        tx: tx.downgrade(),
        deps,
        view: ViewState::mounting(),
        view_tx,
        location_requests: RequestTracker::new(),
        category_requests: RequestTracker::new(),
        place_requests: RequestTracker::new(),
    };

    let handle = DiscoveryHandle {
        tx,
        view_rx,
        map_span: config.map_span,
    };

    let join_handle = tokio::spawn(task.run());

    (handle, join_handle)
}

// ============================================================================
// Tests
// ============================================================================
