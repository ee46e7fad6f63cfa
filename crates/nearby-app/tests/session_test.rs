//! End-to-end session tests.
//!
//! Each test runs a full session: simulated location, HTTP repositories
//! against the fixture service, discovery controller and console
//! collaborators.

mod integration;
use integration::common::fixture_api::FixtureApi;

use nearby_app::{metrics_snapshot, AppConfig, AppError, Application, SessionPlan};
use nearby_discovery::{AlertKind, Screen};
use nearby_location::PermissionStatus;

fn config_for(api: &FixtureApi) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.base_url = api.url();
    config.api.timeout_ms = 2_000;
    config.location.latitude = Some(-23.561187);
    config.location.longitude = Some(-46.656451);
    config.session.settle_timeout_ms = 5_000;
    config
}

fn selected(report: &nearby_app::SessionReport) -> Option<&str> {
    report
        .view
        .selected_category_id
        .as_ref()
        .map(|id| id.as_str())
}

#[tokio::test]
async fn test_session_auto_selects_first_category() {
    let api = FixtureApi::start().await;
    let app = Application::new(config_for(&api)).unwrap();

    let report = app.run_session(&SessionPlan::default()).await.unwrap();

    assert_eq!(selected(&report), Some("food"));
    assert_eq!(report.view.categories.len(), 3);
    let Screen::Ready(frame) = &report.screen else {
        panic!("expected ready screen, got {:?}", report.screen);
    };
    assert_eq!(frame.places.len(), 2);
    assert_eq!(frame.markers.len(), 1);
    assert_eq!(frame.markers[0].title, "Sabor Grill");
    assert!(report.alerts.is_empty());

    let metrics = metrics_snapshot().unwrap();
    assert!(metrics.contains(r#"nearby_fetch_requests_total{resource="categories"}"#));
    assert!(metrics.contains(r#"nearby_fetch_requests_total{resource="places"}"#));
    assert!(metrics.contains(r#"nearby_location_requests_total{outcome="fix"}"#));

    api.shutdown();
}

#[tokio::test]
async fn test_session_replays_selection_and_opens_place() {
    let api = FixtureApi::start().await;
    let app = Application::new(config_for(&api)).unwrap();

    let plan = SessionPlan {
        categories: vec!["empty".to_string(), "bars".to_string()],
        open: Some("b-1".to_string()),
    };
    let report = app.run_session(&plan).await.unwrap();

    assert_eq!(selected(&report), Some("bars"));
    let ids: Vec<&str> = report.view.places.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b-1"]);
    assert_eq!(report.routes, vec!["/market/b-1"]);

    let text = report.to_string();
    assert!(text.contains("* bars  Bars"));
    assert!(text.contains("Opened: /market/b-1"));

    api.shutdown();
}

#[tokio::test]
async fn test_session_ignores_unknown_place_and_category() {
    let api = FixtureApi::start().await;
    let app = Application::new(config_for(&api)).unwrap();

    let plan = SessionPlan {
        categories: vec!["nope".to_string()],
        open: Some("b-1".to_string()),
    };
    let report = app.run_session(&plan).await.unwrap();

    // Still on the auto-selected category; b-1 is not on screen.
    assert_eq!(selected(&report), Some("food"));
    assert!(report.routes.is_empty());

    api.shutdown();
}

#[tokio::test]
async fn test_session_places_failure_keeps_previous_list() {
    let api = FixtureApi::start().await;
    api.fail_places("bars");
    let app = Application::new(config_for(&api)).unwrap();

    let plan = SessionPlan {
        categories: vec!["bars".to_string()],
        open: None,
    };
    let report = app.run_session(&plan).await.unwrap();

    assert_eq!(selected(&report), Some("bars"));
    assert_eq!(report.view.places.len(), 2);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].kind, AlertKind::Places);

    api.shutdown();
}

#[tokio::test]
async fn test_session_categories_failure_alerts() {
    let api = FixtureApi::start().await;
    api.fail_categories();
    let app = Application::new(config_for(&api)).unwrap();

    let report = app.run_session(&SessionPlan::default()).await.unwrap();

    assert!(report.view.categories.is_empty());
    assert!(report.view.selected_category_id.is_none());
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].kind, AlertKind::Categories);

    api.shutdown();
}

#[tokio::test]
async fn test_session_permission_denied() {
    let api = FixtureApi::start().await;
    let mut config = config_for(&api);
    config.location.permission = PermissionStatus::Denied;
    let app = Application::new(config).unwrap();

    let report = app.run_session(&SessionPlan::default()).await.unwrap();

    assert!(report.view.location_fix.is_none());
    assert!(matches!(report.screen, Screen::LocationUnavailable { .. }));
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].kind, AlertKind::Location);
    assert_eq!(
        report.to_string(),
        "Location: Location permission was denied.\nAlert: Location: Unable to get your location.\n"
    );

    api.shutdown();
}

#[tokio::test]
async fn test_session_times_out_when_location_never_settles() {
    let api = FixtureApi::start().await;
    let mut config = config_for(&api);
    config.location.delay_ms = 5_000;
    config.location.fix_timeout_ms = 0;
    config.session.settle_timeout_ms = 100;
    let app = Application::new(config).unwrap();

    let err = app.run_session(&SessionPlan::default()).await.unwrap_err();
    assert!(matches!(err, AppError::SettleTimeout(100)));

    api.shutdown();
}
