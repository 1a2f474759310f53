// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{http::StatusCode, response::IntoResponse, routing::any, Json, Router};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;

/// `/applications/slow` 的响应延迟
pub const SLOW_RESPONSE: Duration = Duration::from_secs(2);

/// 启动模拟申请服务器，返回基础URL
///
/// 三种申请类型的响应形态各不相同，另有错误、慢响应和非JSON端点
pub async fn start_mock_server() -> String {
    let app = Router::new()
        .route(
            "/applications/type-a",
            any(|| async {
                Json(json!({
                    "type": "A",
                    "count": 2,
                    "applications": [
                        {
                            "id": "A-001",
                            "title": "Taxi to client",
                            "status": "SUBMITTED",
                            "applicant": {"id": "u101", "name": "Yamada Taro"},
                            "createdAt": "2025-01-10T09:00:00+09:00",
                            "amount": 15000,
                            "currency": "JPY",
                            "expenseCategory": "TRANSPORT"
                        },
                        {
                            "id": "A-002",
                            "title": "Team lunch",
                            "status": "APPROVED",
                            "applicant": {"id": "u102", "name": "Sato Hanako"},
                            "createdAt": "2025-01-11T12:30:00+09:00",
                            "amount": 4200,
                            "currency": "JPY",
                            "expenseCategory": "MEAL"
                        }
                    ]
                }))
            }),
        )
        .route(
            "/applications/type-b",
            any(|| async {
                Json(json!({
                    "type": "B",
                    "count": 1,
                    "applications": [{
                        "id": "B-001",
                        "title": "Summer leave",
                        "status": "APPROVED",
                        "applicant": {"id": "u201", "name": "Suzuki Ichiro"},
                        "createdAt": "2025-02-01T10:00:00+09:00",
                        "startDate": "2025-08-10",
                        "endDate": "2025-08-14",
                        "days": "5"
                    }]
                }))
            }),
        )
        .route(
            "/applications/type-c",
            any(|| async {
                Json(json!({
                    "type": "C",
                    "count": 1,
                    "applications": [{
                        "id": "C-001",
                        "title": "Admin access",
                        "status": "IN_REVIEW",
                        "applicant": {"id": "u301", "name": "Takahashi Misaki"},
                        "createdAt": "2025-03-05T15:45:00+09:00",
                        "requestedRole": "ADMIN",
                        "approvalFlow": [
                            {"step": 1, "approver": {"id": "u900", "name": "Ito Kenta"}, "status": "APPROVED"},
                            {"step": 2, "approver": {"id": "u901", "name": "Kato Yuko"}, "status": "PENDING"}
                        ]
                    }]
                }))
            }),
        )
        .route(
            "/applications/error",
            any(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "database unavailable",
                        "applications": [{"id": "E-001"}]
                    })),
                )
                    .into_response()
            }),
        )
        .route(
            "/applications/slow",
            any(|| async {
                tokio::time::sleep(SLOW_RESPONSE).await;
                Json(json!({"applications": [{"id": "S-001"}]}))
            }),
        )
        .route("/text", any(|| async { "plain text, not json" }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
