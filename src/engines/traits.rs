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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 元素在等待时间内未就绪（不存在或不可交互）
    #[error("Timed out after {waited:?} waiting for element: {locator}")]
    Timeout { locator: String, waited: Duration },
    /// 元素在查找与使用之间已从 DOM 中移除
    #[error("Stale element reference: {locator}")]
    StaleElement { locator: String },
    /// 浏览器驱动错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否为超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, EngineError::Timeout { .. })
    }

    /// 判断错误是否为元素失效
    pub fn is_stale(&self) -> bool {
        matches!(self, EngineError::StaleElement { .. })
    }
}

/// 浏览器会话特质
///
/// 对一个已打开的无头浏览器页面的最小操作集合。元素均通过 XPath 定位，
/// 等待上限由调用方传入。
#[async_trait]
pub trait BrowserSession: Send {
    /// 打开URL并等待页面加载
    async fn open(&mut self, url: &str) -> Result<(), EngineError>;

    /// 等待元素可交互后滚动到可视区域并点击
    ///
    /// # 错误
    ///
    /// * `EngineError::Timeout` - 等待时间内元素未变为可交互
    /// * `EngineError::StaleElement` - 元素在点击前已被替换
    async fn click(&mut self, xpath: &str, wait: Duration) -> Result<(), EngineError>;

    /// 等待元素出现后读取其链接地址（已解析为绝对地址）
    async fn link_href(&mut self, xpath: &str, wait: Duration) -> Result<Option<String>, EngineError>;

    /// 获取当前页面源码
    async fn page_source(&mut self) -> Result<String, EngineError>;

    /// 关闭会话并释放浏览器
    async fn close(&mut self) -> Result<(), EngineError>;
}

/// 浏览器启动器特质
///
/// 每次调用获取一个新的、独占的浏览器会话
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError>;
}

/// 链接发现特质
///
/// 在给定会话中完成列表页导航与筛选，返回有序的详情页链接
#[async_trait]
pub trait LinkNavigator: Send + Sync {
    async fn discover_links(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Vec<String>, EngineError>;
}
