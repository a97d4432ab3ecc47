// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, response::Html};
use chrono::{Datelike, Utc};
use std::sync::Arc;

use crate::domain::repositories::bill_repository::BillRepository;
use crate::domain::services::llm_service::MAX_CONTEXT_BILLS;
use crate::presentation::errors::AppError;
use crate::presentation::views;

/// 首页，展示前几条法案和订阅表单
pub async fn index(
    Extension(bill_repo): Extension<Arc<dyn BillRepository>>,
) -> Result<Html<String>, AppError> {
    let bills = bill_repo.find_first(MAX_CONTEXT_BILLS as u64).await?;
    Ok(Html(views::index_page(&bills, Utc::now().year())))
}

/// 问答页
pub async fn interact(
    Extension(bill_repo): Extension<Arc<dyn BillRepository>>,
) -> Result<Html<String>, AppError> {
    let bills = bill_repo.find_first(MAX_CONTEXT_BILLS as u64).await?;
    Ok(Html(views::interact_page(&bills)))
}
