// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::bill::NewBill;
use crate::domain::repositories::bill_repository::BillRepository;
use crate::domain::services::extraction_service::{DetailExtractor, ExtractionError};
use crate::domain::services::llm_service::LLMServiceTrait;
use crate::engines::traits::{BrowserLauncher, BrowserSession, EngineError, LinkNavigator};
use crate::utils::errors::RepositoryError;

/// 采集错误类型
///
/// 任何一种错误都会中止本次采集，且不提交任何记录
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Navigation failed: {0}")]
    Navigation(#[from] EngineError),
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Summarization failed for {url}: {source}")]
    Summarization {
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Invalid bill from {url}: {source}")]
    InvalidBill {
        url: String,
        #[source]
        source: validator::ValidationErrors,
    },
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 采集结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionOutcome {
    /// 仓库非空，未执行采集
    Skipped { existing: u64 },
    /// 已有采集在运行
    AlreadyRunning,
    /// 采集完成并提交
    Completed { committed: usize },
}

/// 采集服务
///
/// 串联导航、提取、摘要和持久化：导航得到候选链接，逐条提取并摘要，
/// 全部成功后在一个事务中提交。浏览器会话由本服务独占，在每条退出路径上释放。
pub struct IngestionService {
    bill_repository: Arc<dyn BillRepository>,
    launcher: Arc<dyn BrowserLauncher>,
    navigator: Arc<dyn LinkNavigator>,
    extractor: Arc<dyn DetailExtractor>,
    llm: Arc<dyn LLMServiceTrait>,
    // Single-flight guard around check-then-fetch-then-commit.
    running: Mutex<()>,
}

impl IngestionService {
    pub fn new(
        bill_repository: Arc<dyn BillRepository>,
        launcher: Arc<dyn BrowserLauncher>,
        navigator: Arc<dyn LinkNavigator>,
        extractor: Arc<dyn DetailExtractor>,
        llm: Arc<dyn LLMServiceTrait>,
    ) -> Self {
        Self {
            bill_repository,
            launcher,
            navigator,
            extractor,
            llm,
            running: Mutex::new(()),
        }
    }

    /// 执行一次采集
    ///
    /// 仓库已有记录时直接跳过；同一时刻只允许一次采集运行
    #[instrument(level = "info", skip_all)]
    pub async fn run_ingestion(&self) -> Result<IngestionOutcome, IngestionError> {
        let Ok(_guard) = self.running.try_lock() else {
            info!("Ingestion already in progress; ignoring trigger");
            return Ok(IngestionOutcome::AlreadyRunning);
        };

        let existing = self.bill_repository.count().await?;
        if existing > 0 {
            debug!(existing, "Bill store is not empty; skipping ingestion");
            return Ok(IngestionOutcome::Skipped { existing });
        }

        let start = Instant::now();
        let mut session = self.launcher.launch().await?;
        let collected = self.collect_bills(session.as_mut()).await;
        if let Err(e) = session.close().await {
            warn!(error = %e, "Failed to release browser session");
        }

        let bills = collected?;
        let committed = self.bill_repository.save_batch(bills).await?;

        info!(
            committed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Ingestion completed"
        );
        Ok(IngestionOutcome::Completed { committed })
    }

    async fn collect_bills(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Vec<NewBill>, IngestionError> {
        let links = self.navigator.discover_links(session).await?;

        let mut pending = Vec::with_capacity(links.len());
        for url in links {
            let page = self.extractor.extract(&url).await?;
            let summary = self
                .llm
                .summarize(&page.body_text)
                .await
                .map_err(|source| IngestionError::Summarization {
                    url: url.clone(),
                    source,
                })?;
            let bill = NewBill::new(page.name, summary)
                .map_err(|source| IngestionError::InvalidBill {
                    url: url.clone(),
                    source,
                })?;

            debug!(%url, name = %bill.name, "Bill summarized");
            pending.push(bill);
        }
        Ok(pending)
    }
}

#[cfg(test)]
#[path = "ingestion_service_test.rs"]
mod tests;
