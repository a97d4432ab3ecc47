// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// Web层请求与领域服务之间的数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// 浏览器会话、静态页面获取和追踪站点导航
pub mod engines;

/// 基础设施模块
///
/// 提供数据库、仓库实现和邮件发送
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和页面渲染
pub mod presentation;

/// 工具模块
///
/// 提供通用的错误类型和遥测初始化
pub mod utils;

/// 工作器模块
///
/// 定时采集等后台任务
pub mod workers;
