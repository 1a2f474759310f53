// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use apitable::config::settings::Settings;
use apitable::domain::models::execution_outcome::OutcomeStatus;
use apitable::execution::cancellation::CancellationToken;
use std::io::Write;

use super::helpers::executor;
use super::helpers::mock_server::start_mock_server;

#[tokio::test]
async fn test_batch_from_configuration_file() {
    let base_url = start_mock_server().await;
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        r#"
apis:
  - id: expense_api
    name: Expense
    url_template: "{base}/applications/{{kind}}"
    params:
      kind: type-a
    fields:
      - label: ID
        path: applications.1.id
  - id: permission_api
    name: Permission
    url_template: "{base}/applications/type-c"
    enabled: false
    fields:
      - label: ID
        path: applications.0.id
"#,
        base = base_url
    )
    .unwrap();

    let settings = Settings::from_file(file.path()).unwrap();
    let registry = settings.registry().unwrap();
    let definitions = registry.enabled_snapshot();
    assert_eq!(definitions.len(), 1);

    let batch = executor()
        .run_batch(&definitions, &CancellationToken::new(), |_| {})
        .await
        .unwrap();
    let outcome = &batch.outcomes()[0];
    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(outcome.field("ID").unwrap().display_text(None), "A-002");
}
