// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 法案（bill）：采集流程产出的持久化记录
/// - 订阅（subscription）：简报订阅邮箱
/// - 用户提问（user_query）：问答接口收到的问题
pub mod bill;
pub mod subscription;
pub mod user_query;
