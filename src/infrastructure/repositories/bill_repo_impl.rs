// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::bill::{Bill, NewBill};
use crate::domain::repositories::bill_repository::BillRepository;
use crate::infrastructure::database::entities::bill as bill_entity;
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use tracing::debug;

/// 法案仓库实现
pub struct BillRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl BillRepositoryImpl {
    /// 创建新的法案仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<bill_entity::Model> for Bill {
    fn from(m: bill_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            summary: m.summary,
        }
    }
}

#[async_trait]
impl BillRepository for BillRepositoryImpl {
    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(bill_entity::Entity::find().count(self.db.as_ref()).await?)
    }

    async fn find_first(&self, limit: u64) -> Result<Vec<Bill>, RepositoryError> {
        let models = bill_entity::Entity::find()
            .order_by_asc(bill_entity::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Bill::from).collect())
    }

    async fn save_batch(&self, bills: Vec<NewBill>) -> Result<usize, RepositoryError> {
        if bills.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await?;
        let total = bills.len();
        for bill in bills {
            let active_model = bill_entity::ActiveModel {
                name: Set(bill.name),
                summary: Set(bill.summary),
                ..Default::default()
            };
            // Dropping `txn` on an early return rolls the batch back.
            active_model.insert(&txn).await?;
        }
        txn.commit().await?;

        debug!(count = total, "Committed bill batch");
        Ok(total)
    }
}
