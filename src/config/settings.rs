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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

/// 每次采集读取的结果行数上限
pub const MAX_TRACKER_LINKS: usize = 5;

/// 应用程序配置设置
///
/// 包含数据库、服务器、LLM、追踪站点导航、抓取、采集调度和订阅等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// LLM配置
    pub llm: LlmSettings,
    /// 追踪站点导航配置
    pub tracker: TrackerSettings,
    /// 详情页抓取配置
    pub fetch: FetchSettings,
    /// 采集调度配置
    pub ingestion: IngestionSettings,
    /// 订阅配置
    pub subscriptions: SubscriptionSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// LLM配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// API密钥，未设置时回退到 `OPENAI_API_KEY` 环境变量
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// OpenAI兼容接口的基础URL
    pub api_base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 追踪站点导航配置
///
/// 结构定位器（XPath）直接依赖于目标站点的页面结构，站点改版时需要同步更新
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TrackerSettings {
    /// 列表页URL
    pub listing_url: String,
    /// 主题筛选按钮定位器
    pub topic_button_xpath: String,
    /// 主题条目定位器
    pub topic_entry_xpath: String,
    /// 结果行链接定位器模板，`{index}` 会被替换为从1开始的行号
    pub row_link_xpath: String,
    /// 读取的最大行数，不超过 [`MAX_TRACKER_LINKS`]
    #[validate(range(min = 1, max = 5))]
    pub max_links: usize,
    /// 单个元素等待上限（毫秒），不超过 2000
    #[validate(range(min = 1, max = 2000))]
    pub element_wait_ms: u64,
    /// 浏览器窗口宽度
    pub window_width: u32,
    /// 浏览器窗口高度
    pub window_height: u32,
    /// 远程 DevTools 地址，设置后连接已有浏览器而不是本地启动
    pub remote_debugging_url: Option<String>,
}

impl TrackerSettings {
    pub fn element_wait(&self) -> Duration {
        Duration::from_millis(self.element_wait_ms)
    }
}

/// 详情页抓取配置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// User-Agent
    pub user_agent: String,
}

/// 采集调度配置
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionSettings {
    /// 启动时是否执行一次采集
    pub run_on_startup: bool,
    /// 周期采集间隔（秒），未设置时不启动后台工作器
    pub interval_secs: Option<u64>,
}

/// 订阅配置
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionSettings {
    /// 是否拒绝重复的订阅邮箱
    pub unique_email: bool,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载代码默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `BILLBRIEF__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("BILLBRIEF").separator("__"))
            .build()
            .and_then(Self::load)
    }

    /// 仅使用代码默认值构建配置，不读取文件和环境变量
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build().and_then(Self::load)
    }

    /// 反序列化并校验取值范围
    ///
    /// # 错误
    ///
    /// `tracker.max_links` 或 `tracker.element_wait_ms` 超出范围时返回 `ConfigError::Message`
    fn load(config: Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings
            .tracker
            .validate()
            .map_err(|e| ConfigError::Message(format!("Invalid tracker settings: {}", e)))?;
        Ok(settings)
    }

    fn builder() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError>
    {
        Config::builder()
            // Server
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            // Database
            .set_default("database.url", "sqlite://billbrief.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // LLM
            .set_default("llm.model", "gpt-4o")?
            .set_default("llm.api_base_url", "https://api.openai.com/v1")?
            .set_default("llm.timeout_secs", 120)?
            // Tracker navigation
            .set_default("tracker.listing_url", "https://techpolicy.press/tracker/")?
            .set_default("tracker.topic_button_xpath", r#"//*[@id="topics-button"]"#)?
            .set_default(
                "tracker.topic_entry_xpath",
                r#"//*[@id="topics-menu"]/div[3]/ul/li[3]"#,
            )?
            .set_default(
                "tracker.row_link_xpath",
                r#"//*[@id="main"]/div/div/section/div[3]/div[1]/table/tbody/tr[{index}]/td[1]/div/a"#,
            )?
            .set_default("tracker.max_links", 5)?
            .set_default("tracker.element_wait_ms", 2000)?
            .set_default("tracker.window_width", 1189)?
            .set_default("tracker.window_height", 813)?
            // Detail page fetch
            .set_default("fetch.timeout_secs", 30)?
            .set_default(
                "fetch.user_agent",
                "Mozilla/5.0 (compatible; billbrief/0.1; +https://techpolicy.press/tracker/)",
            )?
            // Ingestion
            .set_default("ingestion.run_on_startup", true)?
            // Subscriptions
            .set_default("subscriptions.unique_email", false)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
