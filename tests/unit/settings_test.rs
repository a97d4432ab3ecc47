// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use billbrief::config::settings::Settings;
use std::time::Duration;

#[test]
fn defaults_point_at_tracker() {
    let settings = Settings::defaults().unwrap();

    assert_eq!(settings.tracker.listing_url, "https://techpolicy.press/tracker/");
    assert_eq!(settings.tracker.max_links, 5);
    assert_eq!(settings.tracker.element_wait(), Duration::from_secs(2));
    assert!(settings.tracker.row_link_xpath.contains("{index}"));
    assert!(settings.llm.api_key.is_none());
}
