// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::models::bill::Bill;
use crate::domain::models::subscription::Subscription;
use crate::domain::repositories::bill_repository::BillRepository;
use crate::domain::repositories::subscription_repository::SubscriptionRepository;
use crate::domain::services::llm_service::MAX_CONTEXT_BILLS;
use crate::infrastructure::mailer::Mailer;

pub const NEWSLETTER_SUBJECT: &str = "Your AI policy briefing";

/// 渲染简报邮件HTML
pub fn render_newsletter(bills: &[Bill], year: i32) -> String {
    let items = bills
        .iter()
        .map(|bill| {
            format!(
                "<li><h3>{}</h3><p>{}</p></li>",
                html_escape::encode_text(&bill.name),
                html_escape::encode_text(&bill.summary)
            )
        })
        .collect::<String>();

    format!(
        "<html><body><h1>AI Policy Briefing</h1><ul>{}</ul>\
        <footer>&copy; {} BillBrief</footer></body></html>",
        items, year
    )
}

/// 订阅请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email, length(max = 120))]
    pub email: String,
}

/// 简报服务
///
/// 保存订阅邮箱，并把渲染好的简报邮件交给邮件发送器
pub struct NewsletterService {
    bill_repository: Arc<dyn BillRepository>,
    subscription_repository: Arc<dyn SubscriptionRepository>,
    mailer: Arc<dyn Mailer>,
}

impl NewsletterService {
    pub fn new(
        bill_repository: Arc<dyn BillRepository>,
        subscription_repository: Arc<dyn SubscriptionRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            bill_repository,
            subscription_repository,
            mailer,
        }
    }

    /// 订阅并立即发送当前简报
    ///
    /// # 错误
    ///
    /// * 邮箱格式不合法时返回 `validator::ValidationErrors`
    /// * 启用唯一性约束且邮箱已存在时返回 `RepositoryError::AlreadyExists`
    #[instrument(level = "info", skip_all)]
    pub async fn subscribe(&self, request: SubscribeRequest) -> Result<Subscription> {
        request.validate()?;
        let subscription = self.subscription_repository.save(&request.email).await?;

        let html = self.render_email().await?;
        self.mailer
            .send(&subscription.email, NEWSLETTER_SUBJECT, &html)
            .await?;

        info!(subscription_id = subscription.id, "Subscription recorded");
        Ok(subscription)
    }

    /// 渲染简报邮件正文
    pub async fn render_email(&self) -> Result<String> {
        let bills = self
            .bill_repository
            .find_first(MAX_CONTEXT_BILLS as u64)
            .await?;
        Ok(render_newsletter(&bills, Utc::now().year()))
    }
}
