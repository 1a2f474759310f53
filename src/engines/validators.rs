// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

use crate::utils::errors::ConfigurationError;

/// 验证解析后的API URL
///
/// 要求为带主机名的绝对 http/https 地址
pub fn validate_url(api_id: &str, url_str: &str) -> Result<Url, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidUrl {
        api_id: api_id.to_string(),
        reason,
    };

    let url_str = url_str.trim();
    if url_str.is_empty() {
        return Err(invalid("URL is empty".to_string()));
    }

    let url = Url::parse(url_str).map_err(|e| invalid(format!("{}: {}", url_str, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(invalid(format!(
                "unsupported scheme '{}', expected http or https",
                other
            )))
        }
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(invalid(format!("{}: missing host", url_str))),
    }

    Ok(url)
}
