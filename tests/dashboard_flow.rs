//! End-to-end: fetch from a live endpoint, aggregate, render, retry.

mod common;

use legaldesk::dashboard::{view, Dashboard, LoadState};
use legaldesk::feed::{ComplianceFeed, LoadError};
use legaldesk::metrics::{chart_data_for_category, ComplianceSummary};
use legaldesk::risk::RiskLevel;
use legaldesk::state::Config;

fn feed_for(url: String) -> ComplianceFeed {
    let cfg = Config {
        endpoint: url,
        ..Config::default()
    };
    ComplianceFeed::new(&cfg).unwrap()
}

#[tokio::test]
async fn scenario_summary_from_endpoint() {
    let feed = feed_for(common::serve(vec![(200, common::SCENARIO_BODY.to_string())]));
    let mut dashboard = Dashboard::new();
    let state = dashboard.refresh(&feed).await;
    let snap = state.snapshot().expect("ready");

    let summary = ComplianceSummary::from_records(snap.records());
    assert_eq!(summary.category_count, 2);
    assert_eq!(summary.overall_score, 6);
    assert_eq!(summary.high, 1);
    assert_eq!(summary.medium, 1);
    assert_eq!(summary.low, 1);

    let gdpr = chart_data_for_category(snap.records(), "gdpr");
    assert_eq!(gdpr.value, 4);
    assert!((gdpr.filled_percent - 66.666_666_666).abs() < 1e-6);
    assert!((gdpr.filled_percent + gdpr.empty_percent - 100.0).abs() < 1e-9);
    assert_eq!(
        legaldesk::metrics::count_by_level(snap.records(), RiskLevel::Unknown),
        0
    );
}

#[tokio::test]
async fn http_500_shows_error_then_retry_recovers() {
    let feed = feed_for(common::serve(vec![
        (500, String::new()),
        (200, common::SCENARIO_BODY.to_string()),
    ]));
    let mut dashboard = Dashboard::new();

    let state = dashboard.refresh(&feed).await;
    assert_eq!(state, &LoadState::Failed(LoadError::Http { status: 500 }));
    let text = view::render(state);
    assert!(text.contains(view::ERROR_TITLE));
    assert!(text.contains(view::RETRY_HINT));

    let ticket = dashboard.retry();
    assert!(dashboard.state().is_loading());
    assert!(dashboard.state().error().is_none());
    assert_eq!(ticket.seq(), dashboard.current_seq());

    assert_eq!(view::render(dashboard.state()), format!("{}\n", view::LOADING_TEXT));

    let state = dashboard.load_with(ticket, &feed).await;
    assert_eq!(state.snapshot().map(|s| s.len()), Some(3));
    assert!(view::render(state).contains("Overall Risk Score"));
    assert_eq!(dashboard.current_seq(), ticket.seq());
}

#[tokio::test]
async fn empty_collection_renders_empty_view() {
    let feed = feed_for(common::serve(vec![(200, "[]".to_string())]));
    let mut dashboard = Dashboard::new();
    let state = dashboard.refresh(&feed).await;
    assert_eq!(view::render(state), format!("{}\n", view::EMPTY_TEXT));
}
