// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::domain::repositories::bill_repository::BillRepository;
use crate::domain::services::llm_service::{LLMServiceTrait, MAX_CONTEXT_BILLS};

/// 问答服务
///
/// 读取前几条已存储的法案作为上下文，交给模型以问答模式作答。
/// 只读，不记录问题本身。
pub struct QueryService {
    bill_repository: Arc<dyn BillRepository>,
    llm: Arc<dyn LLMServiceTrait>,
}

impl QueryService {
    pub fn new(bill_repository: Arc<dyn BillRepository>, llm: Arc<dyn LLMServiceTrait>) -> Self {
        Self {
            bill_repository,
            llm,
        }
    }

    /// 回答用户问题，原样返回模型输出
    #[instrument(level = "info", skip_all)]
    pub async fn answer_question(&self, question: &str) -> Result<String> {
        let bills = self
            .bill_repository
            .find_first(MAX_CONTEXT_BILLS as u64)
            .await?;
        debug!(context_bills = bills.len(), "Answering question");

        self.llm.answer(question, &bills).await
    }
}
