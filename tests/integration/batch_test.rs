// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use apitable::domain::models::execution_outcome::OutcomeStatus;
use apitable::domain::models::field_type::ResolvedType;
use apitable::domain::services::definition_registry::DefinitionRegistry;
use apitable::domain::services::result_projection::{project, sort_rows, Cell};
use apitable::execution::cancellation::CancellationToken;
use apitable::utils::errors::ConfigurationError;
use std::time::Instant;

use super::helpers::mock_server::{start_mock_server, SLOW_RESPONSE};
use super::helpers::{
    executor, expense_definition, id_only_definition, leave_definition, permission_definition,
};

#[tokio::test]
async fn test_heterogeneous_batch_merges_into_one_table() {
    let base_url = start_mock_server().await;
    let registry = DefinitionRegistry::new(vec![
        expense_definition(&base_url),
        leave_definition(&base_url),
        permission_definition(&base_url),
    ])
    .unwrap();

    let mut progress = Vec::new();
    let batch = executor()
        .run_batch(&registry.enabled_snapshot(), &CancellationToken::new(), |p| {
            progress.push((p.completed, p.outcome.api_id.clone()));
        })
        .await
        .unwrap();

    assert_eq!(batch.summary().success, 3);
    assert_eq!(progress.len(), 3);
    assert_eq!(progress.last().unwrap().0, 3);

    let ids: Vec<_> = batch.outcomes().iter().map(|o| o.api_id.as_str()).collect();
    assert_eq!(ids, vec!["expense_api", "leave_api", "permission_api"]);

    let schema = registry.merged_fields();
    let labels: Vec<_> = schema.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["ID", "Status", "Amount", "Created", "Days", "Start", "Role", "First approver"]
    );
    assert_eq!(schema[0].contributing_api_ids.len(), 3);

    let rows = project(schema, &batch);
    let text = |row: usize, column: usize| rows[row].cells[column].display_text().to_string();

    assert_eq!(text(0, 0), "A-001");
    assert_eq!(text(0, 1), "Submitted");
    assert_eq!(text(0, 2), "15000 JPY");
    assert_eq!(text(0, 3), "2025-01-10T09:00:00+09:00");
    assert_eq!(text(0, 4), "-");

    assert_eq!(text(1, 0), "B-001");
    assert_eq!(text(1, 1), "-");
    assert_eq!(text(1, 4), "5");
    assert_eq!(text(1, 5), "2025-08-10");

    assert_eq!(text(2, 6), "ADMIN");
    assert_eq!(text(2, 7), "Ito Kenta");
    assert!(rows.iter().all(|r| r.cells.iter().all(|c| !c.is_mismatch())));
}

#[tokio::test]
async fn test_failures_are_contained_per_api() {
    let base_url = start_mock_server().await;
    let definitions = vec![
        expense_definition(&base_url),
        id_only_definition(
            "slow_api",
            format!("{}/applications/slow", base_url),
            0.2,
        ),
        id_only_definition("text_api", format!("{}/text", base_url), 5.0),
        id_only_definition(
            "error_api",
            format!("{}/applications/error", base_url),
            5.0,
        ),
    ];

    let started = Instant::now();
    let batch = executor()
        .run_batch(&definitions, &CancellationToken::new(), |_| {})
        .await
        .unwrap();

    assert!(started.elapsed() < SLOW_RESPONSE);
    assert_eq!(batch.len(), 4);

    let expense = batch.get("expense_api").unwrap();
    assert_eq!(expense.status, OutcomeStatus::Success);
    assert_eq!(expense.field("ID").unwrap().display_text(None), "A-001");

    let slow = batch.get("slow_api").unwrap();
    assert_eq!(slow.status, OutcomeStatus::Timeout);
    assert!(slow.field("ID").unwrap().is_absent());

    let text = batch.get("text_api").unwrap();
    assert_eq!(text.status, OutcomeStatus::ParseError);
    assert_eq!(text.http_status_code, Some(200));
    assert!(text.field("ID").unwrap().is_absent());

    let error = batch.get("error_api").unwrap();
    assert_eq!(error.status, OutcomeStatus::HttpError);
    assert_eq!(error.http_status_code, Some(500));
    assert_eq!(error.field("ID").unwrap().display_text(None), "E-001");
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let batch = executor()
        .run_batch(
            &[id_only_definition("gone", format!("http://{}/x", addr), 5.0)],
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(batch.outcomes()[0].status, OutcomeStatus::NetworkError);
    assert!(batch.outcomes()[0].error_detail.is_some());
}

#[tokio::test]
async fn test_cancel_after_first_completion() {
    let base_url = start_mock_server().await;
    let definitions = vec![
        id_only_definition(
            "slow_api",
            format!("{}/applications/slow", base_url),
            30.0,
        ),
        expense_definition(&base_url),
    ];
    let token = CancellationToken::new();
    let trigger = token.clone();

    let started = Instant::now();
    let batch = executor()
        .run_batch(&definitions, &token, move |p| {
            if p.outcome.status.is_success() {
                trigger.cancel();
            }
        })
        .await
        .unwrap();

    assert!(started.elapsed() < SLOW_RESPONSE);
    assert_eq!(batch.outcomes()[0].status, OutcomeStatus::Cancelled);
    assert_eq!(batch.outcomes()[1].status, OutcomeStatus::Success);
    assert_eq!(batch.summary().cancelled, 1);
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let result = executor()
        .run_batch(&[], &CancellationToken::new(), |_| {})
        .await;
    assert!(matches!(result, Err(ConfigurationError::NoEnabledDefinitions)));
}

#[tokio::test]
async fn test_mixed_column_flags_other_kinds() {
    let base_url = start_mock_server().await;
    // "Amount" is a number for expenses but a free-text title for leave requests.
    let leave = id_only_definition(
        "leave_api",
        format!("{}/applications/type-b", base_url),
        5.0,
    )
    .with_field(
        apitable::domain::models::api_definition::ApiFieldDefinition::new(
            "Amount",
            "applications.0.title",
            apitable::domain::models::field_type::FieldType::String,
        ),
    );
    let registry = DefinitionRegistry::new(vec![expense_definition(&base_url), leave]).unwrap();

    let amount = registry
        .merged_fields()
        .iter()
        .position(|f| f.label == "Amount")
        .unwrap();
    assert_eq!(registry.merged_fields()[amount].resolved_type, ResolvedType::Mixed);

    let batch = executor()
        .run_batch(&registry.enabled_snapshot(), &CancellationToken::new(), |_| {})
        .await
        .unwrap();

    let mut rows = project(registry.merged_fields(), &batch);
    assert!(!rows[0].cells[amount].is_mismatch());
    assert!(rows[1].cells[amount].is_mismatch());
    assert_eq!(rows[1].cells[amount].display_text(), "Summer leave");

    sort_rows(&mut rows, 0, true);
    assert_eq!(rows[0].api_id, "leave_api");
    assert!(matches!(rows[0].cells[0], Cell::Value { .. }));
}
