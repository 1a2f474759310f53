// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use apitable::config::settings::Settings;
use apitable::domain::services::result_projection::project;
use apitable::execution::api_client::ApiClient;
use apitable::execution::api_executor::ApiExecutor;
use apitable::execution::cancellation::CancellationToken;
use apitable::utils::telemetry;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// 主函数
///
/// 加载API定义，执行一个批次并以制表符分隔的表格输出结果。
/// 第一个参数可指定配置文件，否则按默认层级加载配置。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting apitable...");

    // 2. Load configuration
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new()?,
    };
    let registry = settings.registry()?;
    info!("Configuration loaded");

    // 3. Build client and executor
    let client = Arc::new(ApiClient::new(&settings.http)?);
    let executor = ApiExecutor::new(client, &settings.executor);

    // 4. Ctrl-C cancels the running batch
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Cancellation requested");
                    cancel.cancel();
                }
                Err(err) => error!("Unable to listen for shutdown signal: {}", err),
            }
        });
    }

    // 5. Run the batch
    let definitions = registry.enabled_snapshot();
    let batch = executor
        .run_batch(&definitions, &cancel, |progress| {
            info!(
                "[{}/{}] {}: {}",
                progress.completed, progress.total, progress.outcome.api_id, progress.outcome.status
            );
        })
        .await?;

    // 6. Print the merged table
    let schema = registry.merged_fields();
    let mut header = vec!["API".to_string(), "Status".to_string(), "HTTP".to_string()];
    header.extend(schema.iter().map(|f| format!("{} ({})", f.label, f.display_type)));
    println!("{}", header.join("\t"));

    for row in project(schema, &batch) {
        let mut line = vec![
            row.api_name.clone(),
            row.status.to_string(),
            row.http_status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ];
        line.extend(row.cells.iter().map(|c| c.display_text().to_string()));
        println!("{}", line.join("\t"));
    }

    let summary = batch.summary();
    info!(
        "Done: {}/{} succeeded in {}ms",
        summary.success, summary.total, batch.elapsed_ms
    );
    Ok(())
}
