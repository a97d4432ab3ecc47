// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::bill::{Bill, NewBill};
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;

/// 法案仓库特质
///
/// 定义法案数据访问接口
#[async_trait]
pub trait BillRepository: Send + Sync {
    /// 统计已存储的法案数量
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// 按主键顺序读取前 `limit` 条法案
    async fn find_first(&self, limit: u64) -> Result<Vec<Bill>, RepositoryError>;

    /// 在单个事务中提交整批法案，返回写入的条数
    ///
    /// 任一条写入失败时整批回滚
    async fn save_batch(&self, bills: Vec<NewBill>) -> Result<usize, RepositoryError>;
}
