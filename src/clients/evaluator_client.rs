//! 评估服务客户端
//!
//! 封装与远程评估服务的 HTTP 交互
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::EvaluationRecord;
use crate::utils::logging::truncate_text;

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    idea: &'a str,
}

#[derive(Debug, Deserialize)]
struct EvaluateResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    evaluation: Option<EvaluationRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

/// 健康检查结果
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// 评估服务客户端
pub struct EvaluatorClient {
    http: reqwest::Client,
    api_base_url: String,
}

impl EvaluatorClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::request_failed(config.api_base_url.clone(), e))?;
        Ok(Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path)
    }

    /// 提交创意并获取评估结果
    ///
    /// 空白创意在本地直接拒绝，不发出请求。
    pub async fn evaluate(&self, idea: &str) -> Result<EvaluationRecord, ApiError> {
        let idea = validate_idea(idea)?;
        let endpoint = self.endpoint("evaluate");
        info!("📨 提交创意评估: {}", truncate_text(idea, 60));

        let response = self
            .http
            .post(&endpoint)
            .json(&EvaluateRequest { idea })
            .send()
            .await
            .map_err(|e| {
                warn!("评估请求失败: {}", e);
                ApiError::request_failed(&endpoint, e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::request_failed(&endpoint, e))?;
        debug!("评估服务响应: status={}, {} 字节", status, body.len());

        parse_evaluate_body(&endpoint, status.as_u16(), status.is_success(), &body)
    }

    /// 健康检查
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let endpoint = self.endpoint("health");
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(&endpoint, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::request_failed(&endpoint, e))?;
        if !status.is_success() {
            return Err(ApiError::BadResponse {
                endpoint,
                status: status.as_u16(),
                message: truncate_text(&body, 200),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn validate_idea(idea: &str) -> Result<&str, ApiError> {
    let trimmed = idea.trim();
    if trimmed.is_empty() {
        return Err(ApiError::EmptyIdea);
    }
    Ok(trimmed)
}

/// 解析 /evaluate 响应体
fn parse_evaluate_body(
    endpoint: &str,
    status: u16,
    is_success: bool,
    body: &str,
) -> Result<EvaluationRecord, ApiError> {
    if !is_success {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_else(|| "Failed to evaluate startup idea".to_string());
        return Err(ApiError::BadResponse {
            endpoint: endpoint.to_string(),
            status,
            message,
        });
    }

    let parsed: EvaluateResponse = serde_json::from_str(body)?;
    match parsed {
        EvaluateResponse {
            success: true,
            evaluation: Some(record),
        } => Ok(record),
        _ => Err(ApiError::InvalidResponse {
            endpoint: endpoint.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    const ENDPOINT: &str = "http://localhost:5000/evaluate";

    #[test]
    fn test_validate_idea() {
        assert!(matches!(validate_idea("   \n"), Err(ApiError::EmptyIdea)));
        assert_eq!(validate_idea("  farm app  ").unwrap(), "farm app");
    }

    #[test]
    fn test_parse_success_body() {
        let record = assert_ok!(parse_evaluate_body(
            ENDPOINT,
            200,
            true,
            r#"{"success": true, "evaluation": {"feasibility_score": 82, "strengths": ["a"]}}"#,
        ));
        assert_eq!(record.feasibility_score, Some(82));
    }

    #[test]
    fn test_parse_error_body() {
        let err = assert_err!(parse_evaluate_body(
            ENDPOINT,
            400,
            false,
            r#"{"error": "Idea text cannot be empty"}"#,
        ));
        match err {
            ApiError::BadResponse { status, message, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Idea text cannot be empty");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = assert_err!(parse_evaluate_body(ENDPOINT, 500, false, "<html>oops</html>"));
        assert!(err.to_string().contains("Failed to evaluate startup idea"));
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(matches!(
            parse_evaluate_body(ENDPOINT, 200, true, r#"{"success": false}"#),
            Err(ApiError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_evaluate_body(ENDPOINT, 200, true, "not json"),
            Err(ApiError::JsonParseFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_idea_rejected_without_request() {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let client = EvaluatorClient::new(&config).unwrap();
        assert!(matches!(client.evaluate("  ").await, Err(ApiError::EmptyIdea)));
    }
}
