// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use tracing::info;

/// 邮件发送特质
///
/// 简报邮件的投递通道。SMTP 投递不在本服务内实现
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

/// 仅记录日志的邮件发送器
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        info!(
            recipient = %to,
            subject = %subject,
            bytes = html_body.len(),
            "Newsletter email handed to log mailer"
        );
        Ok(())
    }
}
