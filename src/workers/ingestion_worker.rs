// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::ingestion_service::{IngestionOutcome, IngestionService};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// 定时采集工作器
///
/// 按固定间隔触发一次采集。仓库非空时采集服务会直接跳过，
/// 所以只有清空仓库后才会重新抓取。
pub struct IngestionWorker {
    service: Arc<IngestionService>,
    interval: Duration,
}

impl IngestionWorker {
    pub fn new(service: Arc<IngestionService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// 运行工作器
    pub async fn run(&self) {
        info!(interval_secs = self.interval.as_secs(), "Ingestion worker started");

        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            self.run_once().await;
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 触发一次采集并记录结果
    pub async fn run_once(&self) -> Option<IngestionOutcome> {
        match self.service.run_ingestion().await {
            Ok(outcome) => {
                match &outcome {
                    IngestionOutcome::Completed { committed } => {
                        info!(committed, "Scheduled ingestion committed bills")
                    }
                    IngestionOutcome::Skipped { existing } => {
                        debug!(existing, "Scheduled ingestion skipped")
                    }
                    IngestionOutcome::AlreadyRunning => {
                        debug!("Scheduled ingestion overlapped a running one")
                    }
                }
                Some(outcome)
            }
            Err(e) => {
                error!(error = %e, "Scheduled ingestion failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "ingestion_worker_test.rs"]
mod tests;
