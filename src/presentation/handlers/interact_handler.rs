// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::info;

use crate::application::dto::interact_request::InteractRequestDto;
use crate::domain::repositories::user_query_repository::UserQueryRepository;
use crate::domain::services::query_service::QueryService;
use crate::presentation::errors::AppError;

/// 处理问答请求
///
/// 先记录用户问题，再交给问答服务。响应体是JSON字符串形式的回答。
///
/// # 错误
///
/// - 问题记录失败
/// - 模型调用失败
pub async fn interact_json(
    Extension(user_query_repo): Extension<Arc<dyn UserQueryRepository>>,
    Extension(query_service): Extension<Arc<QueryService>>,
    Json(payload): Json<InteractRequestDto>,
) -> Result<Json<String>, AppError> {
    let query = user_query_repo.save(&payload.message).await?;
    info!(query_id = query.id, "User question recorded");

    let answer = query_service.answer_question(&payload.message).await?;
    Ok(Json(answer))
}
