mod common;

use legaldesk::feed::{load, ComplianceFeed, LoadError, RecordSource};
use legaldesk::state::Config;

#[tokio::test]
async fn bare_array_body_is_the_collection() {
    let url = common::serve(vec![(200, common::SCENARIO_BODY.to_string())]);
    let records = load(&url).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].category.as_deref(), Some("GDPR"));
    assert_eq!(records[0].id.as_deref(), Some("c-1"));
    assert_eq!(records[2].severity.as_deref(), Some("Mild"));
}

#[tokio::test]
async fn wrapped_body_uses_compliance_field() {
    let body = format!(r#"{{"compliance": {}, "generated": "today"}}"#, common::SCENARIO_BODY);
    let url = common::serve(vec![(200, body)]);
    let records = load(&url).await.unwrap();
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn custom_collection_field() {
    let body = format!(r#"{{"items": {}}}"#, common::SCENARIO_BODY);
    let url = common::serve(vec![(200, body)]);
    let cfg = Config {
        endpoint: url,
        collection_field: "items".to_string(),
        ..Config::default()
    };
    let feed = ComplianceFeed::new(&cfg).unwrap();
    assert_eq!(feed.load().await.unwrap().len(), 3);
}

#[tokio::test]
async fn unrecognised_shape_is_empty() {
    let url = common::serve(vec![(200, r#"{"status": "ok"}"#.to_string())]);
    let records = load(&url).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn server_error_is_http_error() {
    let url = common::serve(vec![(500, r#"{"error": "boom"}"#.to_string())]);
    let err = load(&url).await.unwrap_err();
    assert_eq!(err, LoadError::Http { status: 500 });
}

#[tokio::test]
async fn not_found_is_http_error() {
    let url = common::serve(vec![(404, String::new())]);
    let err = load(&url).await.unwrap_err();
    assert_eq!(err, LoadError::Http { status: 404 });
}

#[tokio::test]
async fn invalid_json_is_transport_error() {
    let url = common::serve(vec![(200, "<html>not json</html>".to_string())]);
    let err = load(&url).await.unwrap_err();
    assert!(matches!(err, LoadError::Transport { .. }), "got {:?}", err);
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let err = load(&common::dead_endpoint()).await.unwrap_err();
    match err {
        LoadError::Transport { message } => assert!(!message.is_empty()),
        other => panic!("expected transport error, got {:?}", other),
    }
}
