// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user_query::UserQuery;
use crate::domain::repositories::user_query_repository::UserQueryRepository;
use crate::infrastructure::database::entities::user_query as user_query_entity;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;

/// 用户提问仓库实现
pub struct UserQueryRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl UserQueryRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserQueryRepository for UserQueryRepositoryImpl {
    async fn save(&self, query_text: &str) -> Result<UserQuery, RepositoryError> {
        let model = user_query_entity::ActiveModel {
            query_text: Set(query_text.to_string()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(UserQuery {
            id: model.id,
            query_text: model.query_text,
        })
    }
}
