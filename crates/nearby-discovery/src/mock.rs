//! In-memory collaborators for controller tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use nearby_api::{CategoryRepository, FetchError, FetchErrorKind, FetchResult, PlaceRepository, Resource};
use nearby_core::{BoxFuture, Category, CategoryId, Place, PlaceId};
use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};

use crate::collaborators::{Alert, CategoryPicker, MapPresenter, Navigator, Notifier};
use crate::state::MapFrame;

pub fn category(id: &str) -> Category {
    Category::new(CategoryId::new(id).unwrap(), format!("Category {id}"))
}

pub fn place(id: &str, latitude: f64, longitude: f64) -> Place {
    Place::new(PlaceId::new(id).unwrap(), format!("Place {id}")).with_position(latitude, longitude)
}

pub fn fetch_error(resource: Resource) -> FetchError {
    FetchError::new(
        resource,
        FetchErrorKind::Status {
            status: 500,
            body: "boom".to_string(),
        },
    )
}

/// Category repository answering from a queue of scripted results.
///
/// Once the queue is empty every call returns an empty list.
#[derive(Default)]
pub struct ScriptedCategories {
    results: Mutex<VecDeque<FetchResult<Vec<Category>>>>,
    calls: Mutex<usize>,
}

impl ScriptedCategories {
    pub fn new(results: Vec<FetchResult<Vec<Category>>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl CategoryRepository for ScriptedCategories {
    fn list_categories(&self) -> BoxFuture<'_, FetchResult<Vec<Category>>> {
        *self.calls.lock() += 1;
        let result = self.results.lock().pop_front().unwrap_or(Ok(Vec::new()));
        Box::pin(async move { result })
    }
}

/// Place repository whose responses can be held back and released in any
/// order.
///
/// In gated mode each call parks until [`MockPlaces::resolve`] is called
/// for its category. Otherwise calls answer immediately from the preset
/// responses (empty list by default).
pub struct MockPlaces {
    gated: bool,
    responses: Mutex<HashMap<String, FetchResult<Vec<Place>>>>,
    pending: Mutex<HashMap<String, VecDeque<oneshot::Sender<FetchResult<Vec<Place>>>>>>,
    calls: watch::Sender<Vec<String>>,
}

impl MockPlaces {
    pub fn immediate() -> Self {
        Self::with_mode(false)
    }

    pub fn gated() -> Self {
        Self::with_mode(true)
    }

    fn with_mode(gated: bool) -> Self {
        let (calls, _) = watch::channel(Vec::new());
        Self {
            gated,
            responses: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            calls,
        }
    }

    pub fn respond(&self, category: &str, result: FetchResult<Vec<Place>>) {
        self.responses.lock().insert(category.to_string(), result);
    }

    /// Release the oldest parked call for `category`.
    pub fn resolve(&self, category: &str, result: FetchResult<Vec<Place>>) {
        let sender = self
            .pending
            .lock()
            .get_mut(category)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no pending places call for {category}"));
        let _ = sender.send(result);
    }

    /// Categories requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Wait until at least `n` calls have been made.
    pub async fn wait_for_calls(&self, n: usize) {
        let mut rx = self.calls.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|calls| calls.len() >= n))
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for {n} places calls"))
            .unwrap();
    }
}

impl PlaceRepository for MockPlaces {
    fn list_places<'a>(
        &'a self,
        category: &'a CategoryId,
    ) -> BoxFuture<'a, FetchResult<Vec<Place>>> {
        let key = category.as_str().to_string();
        self.calls.send_modify(|calls| calls.push(key.clone()));

        if !self.gated {
            let result = self
                .responses
                .lock()
                .get(&key)
                .cloned()
                .unwrap_or(Ok(Vec::new()));
            return Box::pin(async move { result });
        }

        let (tx, rx) = oneshot::channel();
        self.pending.lock().entry(key).or_default().push_back(tx);
        Box::pin(async move {
            rx.await.unwrap_or_else(|_| {
                Err(FetchError::new(
                    Resource::Places,
                    FetchErrorKind::Transport("mock dropped".to_string()),
                ))
            })
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, alert: &Alert) {
        self.alerts.lock().push(alert.clone());
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to_detail(&self, place_id: &PlaceId) {
        self.opened.lock().push(place_id.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Loading,
    Unavailable(String),
    Map { markers: usize },
}

#[derive(Default)]
pub struct RecordingMap {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingMap {
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }
}

impl MapPresenter for RecordingMap {
    fn render_loading(&self) {
        self.calls.lock().push(RenderCall::Loading);
    }

    fn render_unavailable(&self, message: &str) {
        self.calls
            .lock()
            .push(RenderCall::Unavailable(message.to_string()));
    }

    fn render_map(&self, frame: &MapFrame) {
        self.calls.lock().push(RenderCall::Map {
            markers: frame.markers.len(),
        });
    }
}

/// Records `(category count, selected id)` per render.
#[derive(Default)]
pub struct RecordingPicker {
    renders: Mutex<Vec<(usize, Option<String>)>>,
}

impl RecordingPicker {
    pub fn renders(&self) -> Vec<(usize, Option<String>)> {
        self.renders.lock().clone()
    }
}

impl CategoryPicker for RecordingPicker {
    fn render(&self, categories: &[Category], selected: Option<&CategoryId>) {
        self.renders
            .lock()
            .push((categories.len(), selected.map(ToString::to_string)));
    }
}
