// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node, Selector};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::EngineError;

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r]*\n[\s]*").unwrap());

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// 提取错误类型
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// 详情页获取失败
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: EngineError,
    },
    /// 页面缺少 `<title>` 元素
    #[error("Page has no <title> element: {url}")]
    MissingTitle { url: String },
}

/// 详情页提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// 标题中第一个 `|` 之前的部分
    pub name: String,
    /// 去除标签并合并换行后的正文
    pub body_text: String,
}

/// 详情页提取特质
#[async_trait]
pub trait DetailExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractedPage, ExtractionError>;
}

/// 从标题中取出法案名称
///
/// `"EU AI Act | TechPolicy Press"` → `"EU AI Act"`
pub fn bill_name_from_title(title: &str) -> String {
    title.split('|').next().unwrap_or_default().trim().to_string()
}

/// 去除标签后得到的扁平文本，换行及其两侧空白合并为一个空格
pub fn flatten_text(document: &Html) -> String {
    let mut raw = String::new();
    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let inside_non_content = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name()))
            .is_some_and(|name| NON_CONTENT_TAGS.contains(&name));
        if !inside_non_content {
            raw.push_str(text);
        }
    }
    LINE_BREAKS.replace_all(&raw, " ").trim().to_string()
}

/// 解析详情页HTML
///
/// # 错误
///
/// 页面没有 `<title>` 时返回 `ExtractionError::MissingTitle`
pub fn parse_detail_page(url: &str, html: &str) -> Result<ExtractedPage, ExtractionError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| ExtractionError::MissingTitle {
            url: url.to_string(),
        })?;

    Ok(ExtractedPage {
        name: bill_name_from_title(&title),
        body_text: flatten_text(&document),
    })
}

/// 提取服务
///
/// 通过普通HTTP请求获取静态详情页，并从中提取名称和正文
pub struct ExtractionService {
    engine: ReqwestEngine,
}

impl ExtractionService {
    pub fn new(engine: ReqwestEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl DetailExtractor for ExtractionService {
    #[instrument(level = "info", skip(self))]
    async fn extract(&self, url: &str) -> Result<ExtractedPage, ExtractionError> {
        let html = self
            .engine
            .fetch_html(url)
            .await
            .map_err(|source| ExtractionError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let page = parse_detail_page(url, &html)?;
        debug!(name = %page.name, bytes = page.body_text.len(), "Extracted detail page");
        Ok(page)
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
