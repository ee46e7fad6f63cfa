//! Session orchestration.
//!
//! Builds the discovery controller from configuration, lets it settle,
//! replays the requested user actions and reports the final screen.

use crate::config::AppConfig;
use crate::console::{ConsoleMap, ConsoleNavigator, ConsoleNotifier, ConsolePicker};
use crate::error::{AppError, AppResult};
use nearby_api::{ApiClient, HttpCategoryRepository, HttpPlaceRepository};
use nearby_discovery::{
    drive_screen, spawn_discovery, Alert, DiscoveryConfig, DiscoveryDeps, DiscoveryHandle,
    Screen, ViewState,
};
use nearby_location::LocationProvider;
use nearby_telemetry::Metrics;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// User actions to replay once the screen has settled.
#[derive(Debug, Clone, Default)]
pub struct SessionPlan {
    /// Category ids to select, in order.
    pub categories: Vec<String>,
    /// Place whose detail view to open at the end.
    pub open: Option<String>,
}

/// Outcome of one session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub view: ViewState,
    pub screen: Screen,
    /// Detail routes opened, in order.
    pub routes: Vec<String>,
    pub alerts: Vec<Alert>,
}

impl SessionReport {
    /// Final screen as pretty JSON.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.screen)?)
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.screen {
            Screen::Loading => writeln!(f, "Location: loading")?,
            Screen::LocationUnavailable { message } => writeln!(f, "Location: {message}")?,
            Screen::Ready(frame) => {
                writeln!(f, "Location: {}", frame.center)?;

                writeln!(f, "Categories:")?;
                for category in &frame.categories {
                    let mark = if frame.selected_category_id.as_ref() == Some(&category.id) {
                        '*'
                    } else {
                        ' '
                    };
                    writeln!(f, "  {mark} {}  {}", category.id, category.name)?;
                }

                writeln!(
                    f,
                    "Places ({}, {} on map):",
                    frame.places.len(),
                    frame.markers.len()
                )?;
                for place in &frame.places {
                    writeln!(f, "    {}  {}  {}", place.id, place.name, place.address)?;
                }
            }
        }

        for route in &self.routes {
            writeln!(f, "Opened: {route}")?;
        }
        for alert in &self.alerts {
            writeln!(f, "Alert: {alert}")?;
        }
        Ok(())
    }
}

/// Prometheus text exposition of every metric recorded so far.
pub fn metrics_snapshot() -> AppResult<String> {
    Ok(Metrics::render()?)
}

/// Main application.
pub struct Application {
    config: AppConfig,
    client: Arc<ApiClient>,
}

impl Application {
    /// Create a new application.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let client = Arc::new(ApiClient::new(&config.api.base_url, config.api.timeout())?);
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn location_provider(&self) -> LocationProvider {
        let provider = LocationProvider::new(Arc::new(self.config.location.geolocation()));
        match self.config.location.fix_timeout() {
            Some(limit) => provider.with_fix_timeout(limit),
            None => provider,
        }
    }

    /// Run one discovery session to completion.
    pub async fn run_session(&self, plan: &SessionPlan) -> AppResult<SessionReport> {
        let notifier = Arc::new(ConsoleNotifier::default());
        let navigator = Arc::new(ConsoleNavigator::default());
        let span = self.config.map;

        let deps = DiscoveryDeps {
            location: self.location_provider(),
            categories: Arc::new(HttpCategoryRepository::new(Arc::clone(&self.client))),
            places: Arc::new(HttpPlaceRepository::new(Arc::clone(&self.client))),
            notifier: notifier.clone(),
            navigator: navigator.clone(),
        };
        let config = DiscoveryConfig {
            map_span: span,
            ..Default::default()
        };

        info!(base_url = %self.client.base_url(), "Starting discovery session");
        let (handle, controller) = spawn_discovery(deps, config);
        let map = Arc::new(ConsoleMap::default());
        let driver = tokio::spawn(drive_screen(
            handle.subscribe(),
            span,
            map.clone(),
            Arc::new(ConsolePicker),
        ));

        let outcome = self.replay(&handle, plan).await;

        handle.shutdown().await;
        let _ = controller.await;
        let _ = driver.await;
        debug!(renders = map.renders(), "Session finished");

        let view = outcome?;
        Ok(SessionReport {
            screen: view.screen(span),
            view,
            routes: navigator.routes(),
            alerts: notifier.alerts(),
        })
    }

    async fn replay(&self, handle: &DiscoveryHandle, plan: &SessionPlan) -> AppResult<ViewState> {
        let view = self.settle(handle).await?;
        info!(
            categories = view.categories.len(),
            places = view.places.len(),
            located = view.location_fix.is_some(),
            "Screen settled"
        );

        for category in &plan.categories {
            handle.select_category(category.as_str()).await?;
            handle.flush().await?;
            self.settle(handle).await?;
        }

        if let Some(place) = &plan.open {
            handle.open_place(place.as_str()).await?;
            handle.flush().await?;
        }

        Ok(handle.view())
    }

    /// Wait until no request is in flight.
    async fn settle(&self, handle: &DiscoveryHandle) -> AppResult<ViewState> {
        let limit = self.config.session.settle_timeout();
        tokio::time::timeout(limit, handle.wait_until(ViewState::is_settled))
            .await
            .map_err(|_| AppError::SettleTimeout(self.config.session.settle_timeout_ms))?
            .map_err(AppError::from)
    }
}
