// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::application::dto::subscribe_request::SubscribeFormDto;
use crate::domain::services::newsletter_service::NewsletterService;
use crate::presentation::errors::AppError;

/// 处理订阅表单
///
/// 成功后重定向到问答页；缺少邮箱时返回 400
pub async fn subscribe(
    Extension(newsletter): Extension<Arc<NewsletterService>>,
    Form(form): Form<SubscribeFormDto>,
) -> Result<Response, AppError> {
    let Some(request) = form.into_request() else {
        return Ok((StatusCode::BAD_REQUEST, "Subscription failed").into_response());
    };

    newsletter.subscribe(request).await?;
    Ok(Redirect::to("/interact").into_response())
}
