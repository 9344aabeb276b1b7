// ==========================================
// 纺纱工艺顾问 - Gemini 生成服务适配器
// ==========================================
// 协议: HTTP + JSON, POST {endpoint}/v1beta/models/{model}:generateContent
// 凭证: 仅放在 x-goog-api-key 请求头,不进入 URL 与错误文本
// 红线: 单次调用,不重试；返回文本不做结构假设
// ==========================================

use crate::generation::client::{Credentials, GenerationClient, GenerationError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// 错误消息中保留的响应体长度
const ERROR_BODY_MAX_CHARS: usize = 320;

const API_KEY_HEADER: &str = "x-goog-api-key";

// ==========================================
// GeminiClient
// ==========================================
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
}

impl GeminiClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - endpoint: 服务根地址或完整的 :generateContent 地址
    /// - timeout: 单次请求超时（超时按传输失败处理）
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport(format!("HTTP 客户端构建失败: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        credentials: &Credentials,
    ) -> Result<String, GenerationError> {
        let url = resolve_gemini_endpoint(&self.endpoint, model_id)?;

        let payload = json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        debug!(model_id = %model_id, prompt_chars = prompt.len(), "发送生成请求");

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, credentials.api_key())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                GenerationError::Transport(format!("gemini 请求失败: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, model_id = %model_id, "生成服务返回错误状态");
            return Err(classify_status(status, &body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| {
                GenerationError::Transport(format!("gemini 响应无法解析: {}", e.without_url()))
            })?;

        let text = extract_candidate_text(&body);
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse {
                model_id: model_id.to_string(),
            });
        }

        Ok(text)
    }
}

/// 按 HTTP 状态区分认证失败与传输失败
fn classify_status(status: StatusCode, body: &str) -> GenerationError {
    let detail = format!("gemini 错误 {}: {}", status, truncate(body, ERROR_BODY_MAX_CHARS));
    let key_rejected = status == StatusCode::BAD_REQUEST && body.contains("API_KEY_INVALID");

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || key_rejected {
        GenerationError::Auth(detail)
    } else {
        GenerationError::Transport(detail)
    }
}

fn resolve_gemini_endpoint(endpoint: &str, model: &str) -> Result<Url, GenerationError> {
    let mut url = if endpoint.contains(":generateContent") {
        Url::parse(endpoint).map_err(|e| {
            GenerationError::Transport(format!("gemini 地址无效 {}: {}", endpoint, e))
        })?
    } else {
        let base = endpoint.trim_end_matches('/');
        let model = model.trim().trim_start_matches("models/");
        let generated = format!("{}/v1beta/models/{}:generateContent", base, model);
        Url::parse(&generated).map_err(|e| {
            GenerationError::Transport(format!("gemini 地址无效 {}: {}", generated, e))
        })?
    };

    // 配置里残留的 ?key= 一律剥离
    if url.query_pairs().any(|(k, _)| k == "key") {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "key")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Ok(url)
}

/// 拼接首个候选的全部文本片段
fn extract_candidate_text(body: &Value) -> String {
    body["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}
