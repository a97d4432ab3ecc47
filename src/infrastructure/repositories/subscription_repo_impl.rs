// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::subscription::Subscription;
use crate::domain::repositories::subscription_repository::SubscriptionRepository;
use crate::infrastructure::database::entities::subscription as subscription_entity;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;

/// 订阅仓库实现
pub struct SubscriptionRepositoryImpl {
    db: Arc<DatabaseConnection>,
    /// 是否拒绝重复邮箱
    unique_email: bool,
}

impl SubscriptionRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>, unique_email: bool) -> Self {
        Self { db, unique_email }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionRepositoryImpl {
    async fn save(&self, email: &str) -> Result<Subscription, RepositoryError> {
        if self.unique_email {
            let existing = subscription_entity::Entity::find()
                .filter(subscription_entity::Column::Email.eq(email))
                .one(self.db.as_ref())
                .await?;
            if existing.is_some() {
                return Err(RepositoryError::AlreadyExists(email.to_string()));
            }
        }

        let model = subscription_entity::ActiveModel {
            email: Set(email.to_string()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(Subscription {
            id: model.id,
            email: model.email,
        })
    }
}
