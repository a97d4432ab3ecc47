// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::domain::services::newsletter_service::SubscribeRequest;

/// 订阅表单
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubscribeFormDto {
    pub email: Option<String>,
}

impl SubscribeFormDto {
    /// 转换为订阅请求，缺少或为空白的邮箱返回 `None`
    pub fn into_request(self) -> Option<SubscribeRequest> {
        self.email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .map(|email| SubscribeRequest { email })
    }
}
