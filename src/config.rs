//! # config — runtime settings from environment variables
//!
//! | Variable              | Default | Description                               |
//! |-----------------------|---------|-------------------------------------------|
//! | `PAGE_HTML_PATH`      | —       | Saved trading page the host reads         |
//! | `PAGE_PATH`           | `/`     | URL path reported to the engine           |
//! | `PAGE_TITLE`          | unset   | Overrides the document `<title>`          |
//! | `SELECTOR_TABLE_PATH` | unset   | JSON provider table (built-in Binance)    |
//! | `CACHE_TTL_MS`        | `2000`  | Node cache entry lifetime                 |
//! | `POLL_INTERVAL_MS`    | `1000`  | Watch cadence                             |
//! | `WATCH`               | `true`  | `false` = extract once, print, exit       |

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::engine::SelectorRegistry;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub page_html_path:      PathBuf,
    pub page_path:           String,
    pub page_title:          Option<String>,
    pub selector_table_path: Option<PathBuf>,
    pub cache_ttl:           Duration,
    pub poll_interval:       Duration,
    pub watch:               bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_html_path = lookup("PAGE_HTML_PATH")
            .context("PAGE_HTML_PATH environment variable is required")?;

        let cache_ttl_ms: u64 = lookup("CACHE_TTL_MS")
            .unwrap_or_else(|| "2000".to_string())
            .parse()
            .context("CACHE_TTL_MS must be a number")?;

        let poll_ms: u64 = lookup("POLL_INTERVAL_MS")
            .unwrap_or_else(|| "1000".to_string())
            .parse()
            .context("POLL_INTERVAL_MS must be a number")?;
        if poll_ms == 0 {
            bail!("POLL_INTERVAL_MS must be greater than 0");
        }

        let watch = match lookup("WATCH").map(|v| v.to_lowercase()).as_deref() {
            None | Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => bail!("Unknown WATCH value: '{other}'. Use 'true' or 'false'"),
        };

        Ok(Self {
            page_html_path:      PathBuf::from(page_html_path),
            page_path:           lookup("PAGE_PATH").unwrap_or_else(|| "/".to_string()),
            page_title:          lookup("PAGE_TITLE"),
            selector_table_path: lookup("SELECTOR_TABLE_PATH").map(PathBuf::from),
            cache_ttl:           Duration::from_millis(cache_ttl_ms),
            poll_interval:       Duration::from_millis(poll_ms),
            watch,
        })
    }

    /// Provider table from `SELECTOR_TABLE_PATH`, or the built-in Binance one.
    pub fn registry(&self) -> anyhow::Result<SelectorRegistry> {
        match &self.selector_table_path {
            Some(path) => SelectorRegistry::from_file(path),
            None => Ok(SelectorRegistry::binance_futures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[("PAGE_HTML_PATH", "page.html")]).unwrap();
        assert_eq!(c.page_html_path, PathBuf::from("page.html"));
        assert_eq!(c.page_path, "/");
        assert_eq!(c.page_title, None);
        assert_eq!(c.cache_ttl, Duration::from_millis(2_000));
        assert_eq!(c.poll_interval, Duration::from_millis(1_000));
        assert!(c.watch);
        assert_eq!(c.registry().unwrap().table().provider, "binance");
    }

    #[test]
    fn overrides() {
        let c = config(&[
            ("PAGE_HTML_PATH", "page.html"),
            ("PAGE_PATH", "/en/futures/ETHUSDT"),
            ("CACHE_TTL_MS", "500"),
            ("WATCH", "FALSE"),
        ])
        .unwrap();
        assert_eq!(c.page_path, "/en/futures/ETHUSDT");
        assert_eq!(c.cache_ttl, Duration::from_millis(500));
        assert!(!c.watch);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config(&[]).is_err());
        assert!(config(&[("PAGE_HTML_PATH", "p"), ("CACHE_TTL_MS", "soon")]).is_err());
        assert!(config(&[("PAGE_HTML_PATH", "p"), ("POLL_INTERVAL_MS", "0")]).is_err());
        assert!(config(&[("PAGE_HTML_PATH", "p"), ("WATCH", "maybe")]).is_err());
    }

    #[test]
    fn missing_table_file_is_an_error() {
        let c = config(&[
            ("PAGE_HTML_PATH", "p"),
            ("SELECTOR_TABLE_PATH", "/nonexistent/table.json"),
        ])
        .unwrap();
        assert!(c.registry().is_err());
    }
}
