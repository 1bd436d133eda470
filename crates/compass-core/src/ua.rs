//! User-agent classification.
//!
//! Best-effort pattern matching, not a full UA parser: the collector only
//! needs the coarse device class and the family names of browser and OS.
//! Unrecognised strings fall back to `desktop` / `"unknown"`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse device class derived from the user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TABLET_PATTERNS: [&str; 4] = ["tablet", "ipad", "playbook", "silk"];
const MOBILE_PATTERNS: [&str; 7] = [
    "mobile",
    "android",
    "iphone",
    "ipod",
    "blackberry",
    "opera mini",
    "iemobile",
];

/// Classify a user-agent into tablet / mobile / desktop.
///
/// Tablet patterns are checked first: Android tablets advertise `Android`
/// without `Mobi`, and matching the generic mobile list first would
/// misclassify every tablet as a phone.
pub fn classify_device(user_agent: &str) -> DeviceType {
    let ua = user_agent.to_ascii_lowercase();
    if TABLET_PATTERNS.iter().any(|p| ua.contains(p))
        || (ua.contains("android") && !ua.contains("mobi"))
    {
        return DeviceType::Tablet;
    }
    if MOBILE_PATTERNS.iter().any(|p| ua.contains(p)) {
        return DeviceType::Mobile;
    }
    DeviceType::Desktop
}

// Ordered priority lists: first match wins.
const BROWSER_PATTERNS: [(&str, &str); 5] = [
    ("Chrome", "Chrome"),
    ("Safari", "Safari"),
    ("Firefox", "Firefox"),
    ("Edge", "Edge"),
    ("Opera", "Opera"),
];

const OS_PATTERNS: [(&str, &str); 5] = [
    ("Windows", "Windows"),
    ("Mac", "macOS"),
    ("Linux", "Linux"),
    ("Android", "Android"),
    ("iOS", "iOS"),
];

/// Browser family name, `"unknown"` when nothing matches.
pub fn parse_browser(user_agent: &str) -> &'static str {
    BROWSER_PATTERNS
        .iter()
        .find(|(needle, _)| user_agent.contains(needle))
        .map(|(_, name)| *name)
        .unwrap_or("unknown")
}

/// Operating system family name, `"unknown"` when nothing matches.
pub fn parse_os(user_agent: &str) -> &'static str {
    OS_PATTERNS
        .iter()
        .find(|(needle, _)| user_agent.contains(needle))
        .map(|(_, name)| *name)
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPAD_UA: &str =
        "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 Safari/604.1";
    const ANDROID_TABLET_UA: &str =
        "Mozilla/5.0 (Linux; Android 13; SM-X200) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
    const ANDROID_PHONE_UA: &str =
        "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36";
    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148 Safari/604.1";
    const WINDOWS_CHROME_UA: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
    const MAC_FIREFOX_UA: &str =
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:120.0) Gecko/20100101 Firefox/120.0";

    #[test]
    fn tablets_never_classify_as_mobile() {
        for ua in [IPAD_UA, ANDROID_TABLET_UA, "Mozilla/5.0 (PlayBook; U; RIM Tablet OS)"] {
            assert_eq!(classify_device(ua), DeviceType::Tablet, "{ua}");
        }
    }

    #[test]
    fn phones_classify_as_mobile() {
        assert_eq!(classify_device(ANDROID_PHONE_UA), DeviceType::Mobile);
        assert_eq!(classify_device(IPHONE_UA), DeviceType::Mobile);
    }

    #[test]
    fn unrecognised_ua_defaults_to_desktop() {
        assert_eq!(classify_device(WINDOWS_CHROME_UA), DeviceType::Desktop);
        assert_eq!(classify_device(""), DeviceType::Desktop);
    }

    #[test]
    fn browser_priority_first_match_wins() {
        // Chrome UAs also contain "Safari"; Chrome is checked first.
        assert_eq!(parse_browser(WINDOWS_CHROME_UA), "Chrome");
        assert_eq!(parse_browser(IPAD_UA), "Safari");
        assert_eq!(parse_browser(MAC_FIREFOX_UA), "Firefox");
        assert_eq!(parse_browser("curl/8.0"), "unknown");
    }

    #[test]
    fn os_detection() {
        assert_eq!(parse_os(WINDOWS_CHROME_UA), "Windows");
        assert_eq!(parse_os(MAC_FIREFOX_UA), "macOS");
        assert_eq!(parse_os("curl/8.0"), "unknown");
    }

    #[test]
    fn device_type_serializes_lowercase() {
        let json = serde_json::to_string(&DeviceType::Tablet).expect("serialize");
        assert_eq!(json, "\"tablet\"");
    }
}
