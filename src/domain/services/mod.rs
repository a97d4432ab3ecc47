// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 提取服务（extraction_service）：获取详情页并提取名称和正文
/// - 采集服务（ingestion_service）：串联导航、提取、摘要和持久化
/// - LLM服务（llm_service）：摘要和问答两种模式的模型调用
/// - 简报服务（newsletter_service）：订阅和简报邮件
/// - 问答服务（query_service）：基于已存储法案回答问题
pub mod extraction_service;
pub mod ingestion_service;
pub mod llm_service;
pub mod newsletter_service;
pub mod query_service;
