// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use apitable::domain::models::api_definition::HttpMethod;
use apitable::domain::models::execution_outcome::OutcomeStatus;
use apitable::utils::errors::ConfigurationError;
use serde_json::json;

use super::helpers::mock_server::start_mock_server;
use super::helpers::{executor, expense_definition, permission_definition};

#[tokio::test]
async fn test_single_definition_round() {
    let base_url = start_mock_server().await;

    let outcome = executor()
        .test_single(&permission_definition(&base_url))
        .await
        .unwrap();

    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(outcome.api_name, "Permission");
    assert_eq!(outcome.field("Role").unwrap().display_text(None), "ADMIN");
    assert_eq!(
        outcome.field("First approver").unwrap().display_text(None),
        "Ito Kenta"
    );
}

#[tokio::test]
async fn test_single_post_with_body() {
    let base_url = start_mock_server().await;
    let definition = expense_definition(&base_url)
        .with_method(HttpMethod::Post)
        .with_body(json!({"status": "SUBMITTED", "amount_max": 10000}));

    let outcome = executor().test_single(&definition).await.unwrap();
    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(outcome.field("Amount").unwrap().display_text(Some("{value} JPY")), "15000 JPY");
}

#[tokio::test]
async fn test_single_rejects_invalid_definitions() {
    let base_url = start_mock_server().await;
    let executor = executor();

    let disabled = expense_definition(&base_url).with_enabled(false);
    assert!(matches!(
        executor.test_single(&disabled).await,
        Err(ConfigurationError::DefinitionDisabled(_))
    ));

    let bad_scheme = expense_definition("ftp://localhost");
    assert!(matches!(
        executor.test_single(&bad_scheme).await,
        Err(ConfigurationError::InvalidUrl { .. })
    ));
}
