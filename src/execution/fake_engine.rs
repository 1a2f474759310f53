// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::engines::traits::{ApiRequest, ApiResponse, EngineError, HttpEngine};

/// 预设的响应
#[derive(Debug, Clone)]
pub enum Reply {
    Body(u16, String),
    Refused,
}

/// 内存中的HTTP引擎，按URL返回预设响应，延迟基于tokio时钟
#[derive(Default)]
pub struct FakeEngine {
    routes: HashMap<String, (Duration, Reply)>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, delay: Duration, reply: Reply) -> Self {
        self.routes.insert(url.to_string(), (delay, reply));
        self
    }

    pub fn json(self, url: &str, delay_ms: u64, status: u16, body: &str) -> Self {
        self.route(
            url,
            Duration::from_millis(delay_ms),
            Reply::Body(status, body.to_string()),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpEngine for FakeEngine {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let (delay, reply) = self
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::Refused));
        tokio::time::sleep(delay).await;

        match reply {
            Reply::Body(status_code, body) => Ok(ApiResponse { status_code, body }),
            Reply::Refused => Err(EngineError::Connect("connection refused".to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
