// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::TrackerSettings;
use crate::engines::traits::{BrowserLauncher, BrowserSession, EngineError};
use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

// Attached, rendered with a non-empty box and not disabled.
const INTERACTABLE_JS: &str = r#"function() {
    if (!this.isConnected) { return false; }
    const style = window.getComputedStyle(this);
    if (style.visibility === 'hidden' || style.display === 'none') { return false; }
    const rect = this.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0 && !this.disabled;
}"#;

// DevTools messages reported when a resolved node no longer belongs to the live DOM.
const STALE_NODE_MESSAGES: &[&str] = &[
    "Could not find node with given id",
    "No node with given id found",
    "Node is detached from document",
    "Node does not have a layout object",
    "Could not compute content quads",
    "Cannot find context with specified id",
];

/// 判断浏览器错误信息是否表示元素已失效
pub fn is_stale_node_error(message: &str) -> bool {
    STALE_NODE_MESSAGES
        .iter()
        .any(|needle| message.contains(needle))
}

fn element_error(locator: &str, err: impl std::fmt::Display) -> EngineError {
    let message = err.to_string();
    if is_stale_node_error(&message) {
        EngineError::StaleElement {
            locator: locator.to_string(),
        }
    } else {
        EngineError::Browser(format!("{}: {}", locator, message))
    }
}

/// Chromium启动器
///
/// 基于chromiumoxide启动无头Chromium，或连接到已配置的远程 DevTools 地址。
/// 每次 `launch` 都返回一个独立的会话，会话之间不共享浏览器实例。
pub struct ChromiumLauncher {
    settings: TrackerSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: TrackerSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> Result<BrowserConfig, EngineError> {
        BrowserConfig::builder()
            .no_sandbox()
            .window_size(self.settings.window_width, self.settings.window_height)
            .request_timeout(Duration::from_secs(30))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(EngineError::Browser)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        let (browser, mut handler, remote) = match &self.settings.remote_debugging_url {
            Some(url) => {
                info!("Connecting to remote Chrome instance at: {}", url);
                let (browser, handler) = Browser::connect(url.as_str()).await.map_err(|e| {
                    EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                })?;
                (browser, handler, true)
            }
            None => {
                let (browser, handler) = Browser::launch(self.browser_config()?)
                    .await
                    .map_err(|e| EngineError::Browser(format!("Failed to launch Chrome: {}", e)))?;
                (browser, handler, false)
            }
        };

        // The handler drives the CDP connection and must be polled for the session's lifetime.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!(remote, "Browser session acquired");
        Ok(Box::new(ChromiumSession {
            browser,
            page: None,
            handler_task: Some(handler_task),
            remote,
        }))
    }
}

/// Chromium会话
///
/// 持有一个浏览器实例及其当前页面
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
    remote: bool,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, EngineError> {
        self.page
            .as_ref()
            .ok_or_else(|| EngineError::Browser("No page has been opened".to_string()))
    }

    async fn is_interactable(element: &Element) -> bool {
        match element.call_js_fn(INTERACTABLE_JS, false).await {
            Ok(ret) => ret
                .result
                .value
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            // A node that vanished mid-check is simply not ready yet.
            Err(_) => false,
        }
    }

    /// 在等待上限内轮询元素
    ///
    /// `interactable` 为 true 时要求元素可交互，否则只要求元素存在
    async fn wait_for_element(
        &self,
        xpath: &str,
        wait: Duration,
        interactable: bool,
    ) -> Result<Element, EngineError> {
        let page = self.page()?;
        let poll = async {
            loop {
                if let Ok(element) = page.find_xpath(xpath).await {
                    if !interactable || Self::is_interactable(&element).await {
                        return element;
                    }
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(wait, poll)
            .await
            .map_err(|_| EngineError::Timeout {
                locator: xpath.to_string(),
                waited: wait,
            })
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn open(&mut self, url: &str) -> Result<(), EngineError> {
        match &self.page {
            Some(page) => {
                page.goto(url)
                    .await
                    .map_err(|e| EngineError::Browser(e.to_string()))?;
            }
            None => {
                let page = self
                    .browser
                    .new_page(url)
                    .await
                    .map_err(|e| EngineError::Browser(e.to_string()))?;
                self.page = Some(page);
            }
        }
        debug!(%url, "Page opened");
        Ok(())
    }

    async fn click(&mut self, xpath: &str, wait: Duration) -> Result<(), EngineError> {
        let element = self.wait_for_element(xpath, wait, true).await?;
        element
            .scroll_into_view()
            .await
            .map_err(|e| element_error(xpath, e))?;
        element.click().await.map_err(|e| element_error(xpath, e))?;
        Ok(())
    }

    async fn link_href(&mut self, xpath: &str, wait: Duration) -> Result<Option<String>, EngineError> {
        let element = self.wait_for_element(xpath, wait, false).await?;
        // The DOM property is already resolved against the document base URL.
        let href = element
            .property("href")
            .await
            .map_err(|e| element_error(xpath, e))?;
        Ok(href.and_then(|v| v.as_str().map(str::to_string)))
    }

    async fn page_source(&mut self) -> Result<String, EngineError> {
        self.page()?
            .content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), EngineError> {
        let result = if self.remote {
            // Only the page belongs to this session on a shared remote browser.
            match self.page.take() {
                Some(page) => page
                    .close()
                    .await
                    .map_err(|e| EngineError::Browser(e.to_string())),
                None => Ok(()),
            }
        } else {
            self.page = None;
            match self.browser.close().await {
                Ok(_) => {
                    if let Err(e) = self.browser.wait().await {
                        warn!(error = %e, "Browser process did not exit cleanly");
                    }
                    Ok(())
                }
                Err(e) => Err(EngineError::Browser(e.to_string())),
            }
        };

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        debug!("Browser session released");
        result
    }
}
