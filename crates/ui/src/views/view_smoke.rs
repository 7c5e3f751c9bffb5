use roadmap_core::model::Stream;
use services::{Endpoint, LaunchRoute};

use super::test_harness::{
    LOGIN_REDIRECT_MARKER, ViewKind, setup_view_harness, sign_in_with_stream,
};

#[tokio::test(flavor = "current_thread")]
async fn landing_view_lists_streams_and_entry_points() {
    let mut harness = setup_view_harness(ViewKind::Landing);
    harness.rebuild();
    let html = harness.render();
    for expected in ["Get Started", "Science", "Commerce", "Arts"] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_renders_form_without_requests() {
    let mut harness = setup_view_harness(ViewKind::Login);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Log In"), "missing submit button in {html}");
    assert!(html.contains("type=\"password\""), "missing password field in {html}");
    assert_eq!(harness.api.total_requests(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn register_view_renders_sign_up() {
    let mut harness = setup_view_harness(ViewKind::Register);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Sign Up"), "missing submit button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn stream_select_offers_three_streams() {
    let mut harness = setup_view_harness(ViewKind::StreamSelect);
    harness.rebuild();
    let html = harness.render();
    assert_eq!(html.matches("class=\"stream-option\"").count(), 3, "{html}");
    assert!(html.contains("Continue"), "missing continue in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_renders_cards_for_chosen_stream() {
    let mut harness = setup_view_harness(ViewKind::Dashboard);
    sign_in_with_stream(&harness.app, Stream::Commerce).await;

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Hello, Priya!"), "missing greeting in {html}");
    assert!(html.contains("Commerce Stream"), "missing stream badge in {html}");
    assert!(html.contains("Chartered Accountant"), "missing card in {html}");
    assert!(!html.contains("Full Stack Developer"), "other stream leaked into {html}");
    assert!(html.contains("Not started"), "missing card status in {html}");
    assert_eq!(harness.api.request_count(Endpoint::ListRoadmaps), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_without_session_redirects_to_login() {
    let mut harness = setup_view_harness(ViewKind::Dashboard);
    harness.settle().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains(LOGIN_REDIRECT_MARKER), "no login redirect in {html}");
    assert_eq!(harness.api.total_requests(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn roadmap_with_rejected_token_clears_session_and_redirects() {
    let mut harness =
        setup_view_harness(ViewKind::Roadmap("commerce-chartered-accountant".into()));
    sign_in_with_stream(&harness.app, Stream::Commerce).await;
    let session = harness.app.session();
    let token = session.token().await.unwrap().unwrap();
    harness.api.revoke_token(&token);

    harness.settle().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains(LOGIN_REDIRECT_MARKER), "no login redirect in {html}");
    assert_eq!(session.token().await.unwrap(), None);
    assert_eq!(harness.app.bootstrap().resolve().await, LaunchRoute::Landing);
}

#[tokio::test(flavor = "current_thread")]
async fn roadmap_view_renders_steps_and_resources() {
    let mut harness =
        setup_view_harness(ViewKind::Roadmap("commerce-chartered-accountant".into()));
    sign_in_with_stream(&harness.app, Stream::Commerce).await;

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Chartered Accountant"), "missing title in {html}");
    assert!(html.contains("Mark as complete"), "missing toggle in {html}");
    assert!(html.contains("CA Coaching Institutes"), "missing label resource in {html}");
    assert!(html.contains("0% complete"), "missing progress summary in {html}");
    assert!(harness.opener.opened.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn roadmap_view_follows_career_id_changes() {
    let mut harness = setup_view_harness(ViewKind::RoadmapSwitch {
        from: "science-full-stack-developer".into(),
        to: "science-data-scientist".into(),
    });
    sign_in_with_stream(&harness.app, Stream::Science).await;

    harness.settle().await;
    for _ in 0..3 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(html.contains("Data Scientist"), "roadmap did not switch in {html}");
    assert!(html.contains("Python Programming"), "missing new steps in {html}");
    assert!(!html.contains("Learn HTML"), "old roadmap still shown in {html}");
}
