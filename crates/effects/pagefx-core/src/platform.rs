//! Browser / OS detection from the user agent.
//!
//! Only the OS family feeds the engine (the iOS scroll quirk). The full
//! [`Client`] is handed back to the page through the wasm `OnVisible.client`
//! getter so scripts can branch on it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Firefox,
    Edge,
    Safari,
    Chrome,
    Ie,
    #[default]
    Other,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Ios,
    Android,
    Mac,
    Windows,
    #[default]
    Other,
}

/// What we know about the client after sniffing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub browser: Browser,
    pub browser_version: f64,
    pub os: Os,
    pub os_version: f64,
    pub mobile: bool,
}

static BROWSERS: Lazy<Vec<(Browser, Regex)>> = Lazy::new(|| {
    [
        (Browser::Firefox, r"Firefox/([0-9.]+)"),
        (Browser::Edge, r"Edge/([0-9.]+)"),
        (Browser::Safari, r"Version/([0-9.]+).+Safari"),
        (Browser::Chrome, r"Chrome/([0-9.]+)"),
        (Browser::Chrome, r"CriOS/([0-9.]+)"),
        (Browser::Ie, r"Trident/.+rv:([0-9]+)"),
    ]
    .into_iter()
    .map(|(b, p)| (b, Regex::new(p).expect("static user agent pattern")))
    .collect()
});

/// OS patterns; the flag marks underscore-separated versions ("13_4_1").
static OSES: Lazy<Vec<(Os, Regex, bool)>> = Lazy::new(|| {
    [
        (Os::Ios, r"([0-9_]+) like Mac OS X", true),
        (Os::Ios, r"CPU like Mac OS X()", false),
        (Os::Ios, r"iPad; CPU()", false),
        (Os::Android, r"Android ([0-9.]+)", false),
        (Os::Mac, r"Macintosh.+Mac OS X ([0-9_]+)", true),
        (Os::Windows, r"Windows NT ([0-9.]+)", false),
    ]
    .into_iter()
    .map(|(o, p, u)| (o, Regex::new(p).expect("static user agent pattern"), u))
    .collect()
});

/// Screen sizes (portrait CSS pixels) of iPads that report a desktop Mac UA.
const IPAD_SCREENS: [(u32, u32); 4] = [(1024, 1366), (834, 1112), (810, 1080), (768, 1024)];

impl Client {
    pub fn detect(user_agent: &str, has_touch: bool, screen_w: u32, screen_h: u32) -> Self {
        let mut client = Client::default();

        if let Some((browser, version)) = BROWSERS.iter().find_map(|(b, re)| {
            re.captures(user_agent)
                .map(|c| (*b, parse_version(c.get(1).map_or("", |m| m.as_str()), false)))
        }) {
            client.browser = browser;
            client.browser_version = version;
        }

        if let Some((os, version)) = OSES.iter().find_map(|(o, re, underscored)| {
            re.captures(user_agent).map(|c| {
                (
                    *o,
                    parse_version(c.get(1).map_or("", |m| m.as_str()), *underscored),
                )
            })
        }) {
            client.os = os;
            client.os_version = version;
        }

        if client.os == Os::Mac && has_touch && IPAD_SCREENS.contains(&(screen_w, screen_h)) {
            client.os = Os::Ios;
        }

        client.mobile = matches!(client.os, Os::Ios | Os::Android);
        client
    }
}

/// Parse a leading "major.minor" number; "13_4_1" reads as 13.41.
fn parse_version(raw: &str, underscored: bool) -> f64 {
    let s = if underscored {
        raw.replacen('_', ".", 1).replacen('_', "", 1)
    } else {
        raw.to_string()
    };
    let mut seen_dot = false;
    let end = s
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().unwrap_or(0.0)
}
