//! REST 트랜스포트
//!
//! 모든 체인 응답은 `{status, result}` 형태의 [`ApiResponse`]로
//! 정규화된다. HTTP 에러 상태 코드도 응답으로 취급하며, `Err`는
//! 전송 계층 실패(연결/타임아웃)에서만 발생한다.

use crate::errors::UndResult;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// 정규화된 체인 응답
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP 상태 코드. 전송 실패로 만들어진 에러 응답은 0.
    pub status: u16,
    pub result: Value,
}

impl ApiResponse {
    /// 에러 형태의 응답 생성
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        ApiResponse {
            status,
            result: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 클라이언트
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// 새로운 HTTP 클라이언트 생성
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> UndResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn normalize(response: reqwest::Response) -> UndResult<ApiResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        // 본문이 JSON이 아니면 에러 필드로 감싼다
        let result = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "error": text }));
        Ok(ApiResponse { status, result })
    }

    /// GET 요청
    pub async fn get(&self, path: &str) -> UndResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        Self::normalize(response).await
    }

    /// JSON 본문 POST 요청
    pub async fn post_json(&self, path: &str, body: &Value) -> UndResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;
        Self::normalize(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let response = ApiResponse::error(400, "must include at least one filter");
        assert_eq!(response.status, 400);
        assert_eq!(response.result["error"], "must include at least one filter");
        assert!(!response.is_success());
    }

    #[test]
    fn test_success_range() {
        let response = ApiResponse {
            status: 200,
            result: json!({}),
        };
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // 닫힌 포트로의 연결은 Err로 돌아와야 한다
        let client = HttpClient::new("http://127.0.0.1:1", 1_000).unwrap();
        let err = client.get("/node_info").await.unwrap_err();
        assert!(err.is_network_error());
    }
}
