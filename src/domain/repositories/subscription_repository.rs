// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::subscription::Subscription;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;

/// 订阅仓库特质
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// 保存订阅邮箱
    ///
    /// 启用唯一性约束时，重复邮箱返回 `RepositoryError::AlreadyExists`
    async fn save(&self, email: &str) -> Result<Subscription, RepositoryError>;
}
