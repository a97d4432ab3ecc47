// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义持久化抽象，具体实现位于 `infrastructure::repositories`
pub mod bill_repository;
pub mod subscription_repository;
pub mod user_query_repository;
