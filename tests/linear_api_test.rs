use std::time::Duration;

use anyhow::Result;
use arc_flow::linear::models::{CreateIssueInput, UpdateIssueInput};
use arc_flow::linear::{LinearClient, LinearError};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> LinearClient {
    LinearClient::new("lin_api_test", server.uri(), Duration::from_secs(5))
        .expect("client construction")
}

fn issue_json(identifier: &str, title: &str) -> serde_json::Value {
    json!({
        "id": format!("id-{identifier}"),
        "identifier": identifier,
        "title": title,
        "description": null,
        "url": format!("https://linear.app/arc/issue/{identifier}"),
        "state": {"id": "state-1", "name": "Todo", "type": "unstarted"},
        "assignee": null,
        "createdAt": "2026-02-01T10:00:00.000Z",
        "updatedAt": "2026-02-01T10:00:00.000Z"
    })
}

#[tokio::test]
async fn test_list_teams_sends_raw_api_key_header() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("authorization", "lin_api_test"))
        .and(header("content-type", "application/json"))
        .and(body_string_contains("query Teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"teams": {"nodes": [
                {"id": "t1", "key": "PROJ", "name": "Product"},
                {"id": "t2", "key": "OPS", "name": "Operations"}
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let teams = client_for(&server).list_teams().await?;
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0].key, "PROJ");
    Ok(())
}

#[tokio::test]
async fn test_get_team_by_key_returns_none_for_empty_nodes() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("TeamByKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"teams": {"nodes": []}}
        })))
        .mount(&server)
        .await;

    let team = client_for(&server).get_team_by_key("GHOST").await?;
    assert!(team.is_none());
    Ok(())
}

#[tokio::test]
async fn test_create_issue_resolves_team_id_first() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("TeamByKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"teams": {"nodes": [{"id": "team-42", "key": "PROJ", "name": "Product"}]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("CreateIssue"))
        .and(body_string_contains("team-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"issueCreate": {
                "success": true,
                "issue": issue_json("PROJ-7", "Add search")
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = CreateIssueInput {
        team: "PROJ".to_string(),
        title: "Add search".to_string(),
        ..Default::default()
    };
    let issue = client_for(&server).create_issue(&input).await?;
    assert_eq!(issue.identifier, "PROJ-7");
    Ok(())
}

#[tokio::test]
async fn test_create_issue_unknown_team_is_not_found() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("TeamByKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"teams": {"nodes": []}}
        })))
        .mount(&server)
        .await;

    let input = CreateIssueInput {
        team: "GHOST".to_string(),
        title: "Add search".to_string(),
        ..Default::default()
    };
    let err = client_for(&server).create_issue(&input).await.unwrap_err();
    assert!(matches!(err, LinearError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_list_issues_applies_default_limit() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query Issues"))
        .and(body_string_contains("\"first\":50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"issues": {"nodes": [issue_json("PROJ-1", "First")]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let issues = client_for(&server).list_issues("PROJ", None, None).await?;
    assert_eq!(issues.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_list_issues_with_state_filter() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query Issues"))
        .and(body_string_contains("In Progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"issues": {"nodes": []}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let issues = client_for(&server)
        .list_issues("PROJ", Some("In Progress"), Some(10))
        .await?;
    assert!(issues.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_get_issue_not_found_when_null() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query Issue("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"issue": null}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_issue("PROJ-999").await.unwrap_err();
    assert!(matches!(err, LinearError::NotFound(_)));
    assert!(err.to_string().contains("PROJ-999"));
    Ok(())
}

#[tokio::test]
async fn test_update_issue_resolves_identifier_to_id() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query Issue("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"issue": issue_json("PROJ-7", "Old title")}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("UpdateIssue"))
        .and(body_string_contains("id-PROJ-7"))
        .and(body_string_contains("New title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"issueUpdate": {
                "success": true,
                "issue": issue_json("PROJ-7", "New title")
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = UpdateIssueInput {
        title: Some("New title".to_string()),
        ..Default::default()
    };
    let issue = client_for(&server).update_issue("PROJ-7", &input).await?;
    assert_eq!(issue.title, "New title");
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_failed() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_teams().await.unwrap_err();
    assert!(matches!(err, LinearError::AuthFailed(_)));
    Ok(())
}

#[tokio::test]
async fn test_graphql_errors_surface_first_message() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [
                {"message": "Field 'teams' is missing required arguments"},
                {"message": "secondary error"}
            ]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).list_teams().await.unwrap_err();
    match err {
        LinearError::Api(message) => {
            assert!(message.contains("missing required arguments"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_teams().await.unwrap_err();
    match err {
        LinearError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_resolve_state_id_matches_case_insensitively() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("workflowStates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"workflowStates": {"nodes": [
                {"id": "state-1", "name": "Todo", "type": "unstarted"},
                {"id": "state-2", "name": "In Progress", "type": "started"}
            ]}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = client.resolve_state_id("PROJ", "in progress").await?;
    assert_eq!(id, "state-2");

    let err = client.resolve_state_id("PROJ", "Shipped").await.unwrap_err();
    assert!(err.to_string().contains("Available: Todo, In Progress"));
    Ok(())
}

#[tokio::test]
async fn test_resolve_label_ids_rejects_unknown_names() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("issueLabels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"issueLabels": {"nodes": [
                {"id": "label-1", "name": "Bug", "color": "#ff0000"},
                {"id": "label-2", "name": "Backend", "color": "#00ff00"}
            ]}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids = client
        .resolve_label_ids("PROJ", &["bug".to_string(), "backend".to_string()])
        .await?;
    assert_eq!(ids, vec!["label-1", "label-2"]);

    let err = client
        .resolve_label_ids("PROJ", &["frontend".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, LinearError::NotFound(_)));
    Ok(())
}
