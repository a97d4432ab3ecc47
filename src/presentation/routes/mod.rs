// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    routing::{get, post},
    Router,
};

use crate::presentation::handlers::{interact_handler, page_handler, subscribe_handler};

/// 创建应用路由
///
/// 处理器依赖通过 `Extension` 层注入，由调用方添加
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let site_routes = Router::new()
        .route("/", get(page_handler::index))
        .route("/interact", get(page_handler::interact))
        .route("/interact_json", post(interact_handler::interact_json))
        .route("/subscribe", post(subscribe_handler::subscribe));

    Router::new().merge(public_routes).merge(site_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
