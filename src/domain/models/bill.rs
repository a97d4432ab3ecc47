// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// 法案实体
///
/// 由采集流程从追踪站点的详情页生成：`name` 取自页面标题，
/// `summary` 由模型生成。两个字段都必须非空，记录只创建不更新。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// 自增主键
    pub id: i32,
    /// 法案简称
    pub name: String,
    /// 模型生成的摘要
    pub summary: String,
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bill(id={}, name={}, summary={})",
            self.id, self.name, self.summary
        )
    }
}

/// 法案名称的最大字符数，与 `bills.name` 列宽一致
pub const MAX_NAME_CHARS: usize = 255;

/// 待提交的法案
///
/// 采集过程中在内存中构建，整批在一个事务内提交后才获得 `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewBill {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub summary: String,
}

impl NewBill {
    /// 创建并校验一条待提交的法案
    ///
    /// # 错误
    ///
    /// 名称或摘要为空（去除空白后）时返回校验错误。
    /// 超过 [`MAX_NAME_CHARS`] 的名称会被截断而不是拒绝
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let name: String = name.into();
        let name = name.trim();
        let name = match name.char_indices().nth(MAX_NAME_CHARS) {
            Some((cut, _)) => name[..cut].trim_end(),
            None => name,
        };
        let bill = Self {
            name: name.to_string(),
            summary: summary.into().trim().to_string(),
        };
        bill.validate()?;
        Ok(bill)
    }
}
