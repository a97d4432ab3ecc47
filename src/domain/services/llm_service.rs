// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use std::time::Duration;
use tracing::debug;

use crate::config::settings::LlmSettings;
use crate::domain::models::bill::Bill;

/// 问答模式下放入上下文的最大法案数
pub const MAX_CONTEXT_BILLS: usize = 5;

const SUMMARIZE_SYSTEM_PROMPT: &str =
    "You are an expert at summarizing, and identifying key points in text.";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn system(content: String) -> Self {
        Self {
            role: "system".to_string(),
            content,
        }
    }

    fn user(content: String) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// 生成模式
#[derive(Debug, Clone, Copy)]
pub enum GenerationMode<'a> {
    /// 将输入文本概括为三句话
    Summarize,
    /// 基于给定法案回答问题
    Answer { bills: &'a [Bill] },
}

/// 构建发送给模型的对话消息
///
/// 问答模式最多使用前 [`MAX_CONTEXT_BILLS`] 条法案作为上下文
pub fn build_messages(query: &str, mode: GenerationMode<'_>) -> Vec<ChatMessage> {
    match mode {
        GenerationMode::Summarize => vec![
            ChatMessage::system(SUMMARIZE_SYSTEM_PROMPT.to_string()),
            ChatMessage::user(format!(
                "Summarize this text: ''' {} ''', making sure to capture only the key points and using only 3 sentences.",
                query
            )),
        ],
        GenerationMode::Answer { bills } => {
            let context = bills
                .iter()
                .take(MAX_CONTEXT_BILLS)
                .map(Bill::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                ChatMessage::system(format!(
                    "You have a JD degree from Yale law school and a PhD in Computer Science from MIT, \
                    and you are tasked with answering a question about the following bills: [{}]. \
                    What is the question? Answer the question based on the bill summaries.",
                    context
                )),
                ChatMessage::user(format!(
                    "Answer the question based on the bill summaries: {}",
                    query
                )),
            ]
        }
    }
}

#[async_trait]
pub trait LLMServiceTrait: Send + Sync {
    /// 按模式生成文本
    async fn generate(&self, query: &str, mode: GenerationMode<'_>) -> Result<String>;

    /// 概括详情页正文
    async fn summarize(&self, text: &str) -> Result<String> {
        self.generate(text, GenerationMode::Summarize).await
    }

    /// 基于法案上下文回答问题
    async fn answer(&self, question: &str, bills: &[Bill]) -> Result<String> {
        self.generate(question, GenerationMode::Answer { bills }).await
    }
}

/// LLM服务 - 处理与LLM提供商的交互
///
/// # 功能
///
/// 调用OpenAI兼容的 `chat/completions` 接口，支持摘要和问答两种模式。
/// 返回去除首尾空白后的模型输出，不做其他校验。
///
/// # 配置
///
/// - `llm.api_key` - API密钥，未配置时读取 `OPENAI_API_KEY`
/// - `llm.model` - 模型名称（默认为 gpt-4o）
/// - `llm.api_base_url` - API基础URL
pub struct LLMService {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
}

#[async_trait]
impl LLMServiceTrait for LLMService {
    async fn generate(&self, query: &str, mode: GenerationMode<'_>) -> Result<String> {
        LLMService::generate(self, query, mode).await
    }
}

impl LLMService {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build LLM HTTP client")?;

        Ok(Self {
            client,
            api_key: settings
                .api_key
                .clone()
                .or_else(|| env::var("OPENAI_API_KEY").ok()),
            model: settings.model.clone(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn new_with_config(api_key: String, model: String, api_base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: Some(api_key),
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 调用模型生成文本
    ///
    /// # 参数
    /// * `query` - 摘要模式下为正文，问答模式下为用户问题
    /// * `mode` - 生成模式
    ///
    /// # 错误
    /// * 当LLM API密钥未配置时返回错误
    /// * 当LLM服务调用失败或响应格式不符时返回错误
    pub async fn generate(&self, query: &str, mode: GenerationMode<'_>) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("LLM API key not configured"))?;

        let request_body = json!({
            "model": self.model,
            "messages": build_messages(query, mode),
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .context("Failed to send request to LLM API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "LLM API returned error: {} - {}",
                status,
                error_text
            ));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse LLM API response")?;

        if let Some(usage_val) = body.get("usage") {
            let usage = TokenUsage {
                prompt_tokens: usage_val["prompt_tokens"].as_u64().unwrap_or(0) as u32,
                completion_tokens: usage_val["completion_tokens"].as_u64().unwrap_or(0) as u32,
                total_tokens: usage_val["total_tokens"].as_u64().unwrap_or(0) as u32,
            };
            debug!(model = %self.model, ?usage, "LLM completion received");
        }

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|content| content.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("Invalid response format from LLM API"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(id: i32) -> Bill {
        Bill {
            id,
            name: format!("Bill {}", id),
            summary: format!("Summary {}", id),
        }
    }

    #[test]
    fn test_summarize_messages() {
        let messages = build_messages("Body text", GenerationMode::Summarize);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SUMMARIZE_SYSTEM_PROMPT);
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("''' Body text '''"));
        assert!(messages[1].content.contains("only 3 sentences"));
    }

    #[test]
    fn test_answer_messages_cap_context() {
        let bills = (1..=8).map(bill).collect::<Vec<_>>();
        let messages = build_messages("What changed?", GenerationMode::Answer { bills: &bills });

        let system = &messages[0].content;
        assert_eq!(system.matches("Bill(id=").count(), MAX_CONTEXT_BILLS);
        assert!(system.contains("Bill(id=5, name=Bill 5, summary=Summary 5)"));
        assert!(!system.contains("Bill 6"));
        assert!(messages[1].content.ends_with("What changed?"));
    }

    #[test]
    fn test_answer_messages_with_empty_store() {
        let messages = build_messages("Anything?", GenerationMode::Answer { bills: &[] });
        assert!(messages[0].content.contains("following bills: []"));
    }

    #[tokio::test]
    async fn test_generate_without_api_key_fails() {
        let service = LLMService {
            client: reqwest::Client::new(),
            api_key: None,
            model: "gpt-4o".to_string(),
            api_base_url: "http://127.0.0.1:9".to_string(),
        };

        let err = service.summarize("text").await.unwrap_err();
        assert!(err.to_string().contains("LLM API key not configured"));
    }
}
