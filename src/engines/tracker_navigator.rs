// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{TrackerSettings, MAX_TRACKER_LINKS};
use crate::engines::traits::{BrowserSession, EngineError, LinkNavigator};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// 追踪站点导航器
///
/// 在列表页上依次点击主题筛选按钮和主题条目，然后按固定行号读取结果表格
/// 每行第一列的链接。不分页，最多返回 `max_links` 条，且不超过 [`MAX_TRACKER_LINKS`]。
///
/// 定位器全部来自配置，站点改版只需要调整配置。
pub struct TrackerNavigator {
    listing_url: String,
    filter_steps: Vec<String>,
    row_link_xpath: String,
    max_links: usize,
    element_wait: Duration,
}

impl TrackerNavigator {
    pub fn new(settings: &TrackerSettings) -> Self {
        Self {
            listing_url: settings.listing_url.clone(),
            filter_steps: vec![
                settings.topic_button_xpath.clone(),
                settings.topic_entry_xpath.clone(),
            ],
            row_link_xpath: settings.row_link_xpath.clone(),
            max_links: settings.max_links.min(MAX_TRACKER_LINKS),
            element_wait: settings.element_wait(),
        }
    }

    /// 第 `index` 行（从1开始）的链接定位器
    pub fn row_locator(&self, index: usize) -> String {
        self.row_link_xpath.replace("{index}", &index.to_string())
    }

    /// 将行内链接解析为绝对地址，相对链接以列表页为基准
    pub fn resolve_href(&self, href: &str) -> String {
        match Url::parse(&self.listing_url).and_then(|base| base.join(href)) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                warn!(%href, error = %e, "Could not resolve link against listing page");
                href.to_string()
            }
        }
    }

    async fn dump_page(session: &mut dyn BrowserSession, locator: &str) {
        match session.page_source().await {
            Ok(source) => error!(%locator, page_source = %source, "Page source at failure"),
            Err(e) => error!(%locator, error = %e, "Page source unavailable"),
        }
    }

    async fn apply_filter(&self, session: &mut dyn BrowserSession) -> Result<(), EngineError> {
        for locator in &self.filter_steps {
            match session.click(locator, self.element_wait).await {
                Ok(()) => debug!(%locator, "Clicked filter control"),
                // The listing re-renders asynchronously once a filter is applied.
                Err(e) if e.is_stale() => {
                    warn!(%locator, "Filter control went stale before the click; skipping")
                }
                Err(e) => {
                    if e.is_timeout() {
                        Self::dump_page(session, locator).await;
                    }
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    async fn collect_rows(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Vec<String>, EngineError> {
        let mut links = Vec::with_capacity(self.max_links);
        for index in 1..=self.max_links {
            let locator = self.row_locator(index);
            match session.link_href(&locator, self.element_wait).await {
                Ok(Some(href)) => {
                    let href = self.resolve_href(&href);
                    debug!(index, %href, "Found candidate link");
                    links.push(href);
                }
                Ok(None) => warn!(index, %locator, "Row anchor has no href; skipping"),
                Err(e) => {
                    if e.is_timeout() {
                        Self::dump_page(session, &locator).await;
                    }
                    return Err(e);
                }
            }
        }
        Ok(links)
    }
}

#[async_trait]
impl LinkNavigator for TrackerNavigator {
    #[instrument(level = "info", skip_all, fields(listing_url = %self.listing_url))]
    async fn discover_links(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Vec<String>, EngineError> {
        session.open(&self.listing_url).await?;
        self.apply_filter(session).await?;
        let links = self.collect_rows(session).await?;

        info!(count = links.len(), "Discovered candidate links");
        Ok(links)
    }
}

#[cfg(test)]
#[path = "tracker_navigator_test.rs"]
mod tests;
