//! End-to-end navigation through the form views against a mock backend.

mod common;

use serde_json::json;
use stoplight_client::app::{App, DESTINATION_FORM, GPX_FORM, LANDING_PAGE, NOT_FOUND, SIMULATE_FORM};
use stoplight_client::model::{Stoplight, StoplightGroup};
use stoplight_client::routing::NavigationTarget;
use stoplight_client::views::{DestinationFormView, GpxFormView, ViewError};
use stoplight_client::{AppError, StoplightState};

use common::{config_for, start_programmable_backend, MockResponse};

const TRACK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg>
    <trkpt lat="45.5017" lon="-73.5673"/>
    <trkpt lat="45.5088" lon="-73.5540"/>
  </trkseg></trk>
</gpx>"#;

async fn backend() -> (std::net::SocketAddr, common::RequestLog) {
    start_programmable_backend(|request| async move {
        if request.path.ends_with("/route/") {
            MockResponse::json(200, json!({"message": "Stoplights found"}))
        } else {
            MockResponse::json(
                200,
                json!({"stoplight_groups": [
                    {"groupID": 1, "lat": 45.5017, "lng": -73.5673},
                    {"groupID": 2, "lat": 45.5088, "lng": -73.5540}
                ]}),
            )
        }
    })
    .await
}

#[tokio::test]
async fn test_each_path_mounts_its_view() {
    let (addr, _log) = backend().await;
    let app = App::new(config_for(addr, None)).unwrap();

    for (path, name, view) in [
        ("/", LANDING_PAGE, "LandingPageView"),
        ("/route", GPX_FORM, "GpxFormView"),
        ("/destination", DESTINATION_FORM, "DestinationFormView"),
        ("/simulate", SIMULATE_FORM, "SimulateFormView"),
    ] {
        let active = app.navigate(path).await.unwrap();
        assert_eq!(active.name, name);
        assert_eq!(active.view_name(), view);
    }
}

#[tokio::test]
async fn test_unregistered_path_shows_not_found() {
    let (addr, log) = backend().await;
    let app = App::new(config_for(addr, None)).unwrap();

    let active = app.navigate("/stoplights/42").await.unwrap();
    assert_eq!(active.name, NOT_FOUND);
    assert_eq!(active.view_name(), "NotFoundView");
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_gpx_submission_then_destination_reuses_store() {
    let (addr, log) = backend().await;
    let app = App::new(config_for(addr, None)).unwrap();
    let ctx = app.context();

    app.navigate(NavigationTarget::named(GPX_FORM)).await.unwrap();
    let groups = GpxFormView.submit_gpx(ctx, TRACK).await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(ctx.store.stoplight_groups().as_slice(), groups.as_slice());

    {
        let requests = log.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(
            requests[0].json(),
            json!({"coordinates": [[45.5017, -73.5673], [45.5088, -73.5540]]})
        );
        assert_eq!(requests[1].method, "GET");
    }

    app.navigate("/destination").await.unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(DestinationFormView.stoplight_groups(ctx).len(), 2);
}

#[tokio::test]
async fn test_destination_fetches_when_store_empty() {
    let (addr, log) = backend().await;
    let app = App::new(config_for(addr, None)).unwrap();

    app.navigate("/destination").await.unwrap();

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/stoplights/");
    assert_eq!(app.context().store.stoplight_groups().len(), 2);
}

#[tokio::test]
async fn test_landing_clears_previous_flow() {
    let (addr, _log) = backend().await;
    let app = App::new(config_for(addr, None)).unwrap();
    let ctx = app.context();

    ctx.store
        .set_stoplight_groups(vec![StoplightGroup::new(1, 45.5, -73.6)]);
    ctx.store.set_stoplights(vec![Stoplight::with_id(1)]);

    app.navigate("/").await.unwrap();
    assert!(ctx.store.snapshot().is_empty());
}

#[tokio::test]
async fn test_stoplights_for_group() {
    let (addr, _log) = backend().await;
    let app = App::new(config_for(addr, None)).unwrap();
    let ctx = app.context();

    let in_group = |id, group| Stoplight {
        group: Some(group),
        ..Stoplight::with_id(id)
    };
    ctx.store
        .set_stoplights(vec![in_group(1, 7), in_group(2, 8), in_group(3, 7)]);

    let ids: Vec<u64> = DestinationFormView
        .stoplights_for_group(ctx, 7)
        .iter()
        .map(|light| light.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_empty_track_rejected_before_request() {
    let (addr, log) = backend().await;
    let app = App::new(config_for(addr, None)).unwrap();

    let err = GpxFormView
        .submit_coordinates(app.context(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::InvalidInput(_)));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_entry_failure_keeps_committed_route() {
    let (addr, _log) = start_programmable_backend(|_| async {
        MockResponse::json(500, json!({"error": "database unavailable"}))
    })
    .await;
    let app = App::new(config_for(addr, None)).unwrap();
    app.navigate("/").await.unwrap();

    let err = app.navigate("/destination").await.unwrap_err();
    assert!(matches!(err, AppError::View(ViewError::Api(_))), "unexpected error: {err}");
    assert_eq!(app.router().current().unwrap().name, DESTINATION_FORM);

    let history = app.router().history();
    assert_eq!(history.len(), 2);
    assert_eq!(history.current().unwrap().path(), "/destination");
    assert_eq!(app.back().await.unwrap().name, LANDING_PAGE);
}
