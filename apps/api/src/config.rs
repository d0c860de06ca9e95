use anyhow::{bail, Context, Result};

use crate::layout::{OverflowPolicy, ReportConfig, ReportTitles};
use crate::ledger::DEFAULT_CAPACITY;

/// Application configuration loaded from environment variables.
/// Every variable is optional; startup fails only on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON-lines ledger file; `None` keeps the ledger in memory.
    pub ledger_path: Option<String>,
    pub ledger_capacity: usize,
    pub report_title: String,
    pub report_subtitle: String,
    pub overflow_policy: OverflowPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let titles = ReportTitles::default();
        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ledger_path: optional_env("LEDGER_PATH"),
            ledger_capacity: parse_ledger_capacity(optional_env("LEDGER_CAPACITY").as_deref())?,
            report_title: optional_env("REPORT_TITLE").unwrap_or(titles.title),
            report_subtitle: optional_env("REPORT_SUBTITLE").unwrap_or(titles.subtitle),
            overflow_policy: parse_overflow_policy(optional_env("OVERFLOW_POLICY").as_deref())?,
        })
    }

    /// Render settings handed to the layout engine.
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            titles: ReportTitles {
                title: self.report_title.clone(),
                subtitle: self.report_subtitle.clone(),
            },
            overflow_policy: self.overflow_policy,
            ..ReportConfig::default()
        }
    }
}

/// Unset and blank both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_ledger_capacity(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_CAPACITY);
    };
    let capacity = raw
        .trim()
        .parse::<usize>()
        .context("LEDGER_CAPACITY must be a positive integer")?;
    if capacity == 0 {
        bail!("LEDGER_CAPACITY must be a positive integer, got 0");
    }
    Ok(capacity)
}

fn parse_overflow_policy(raw: Option<&str>) -> Result<OverflowPolicy> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("fail") => Ok(OverflowPolicy::Fail),
        Some("force") | Some("force_draw") => Ok(OverflowPolicy::ForceDraw),
        Some(other) => bail!("OVERFLOW_POLICY must be 'fail' or 'force', got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_parsing() {
        assert_eq!(parse_overflow_policy(None).unwrap(), OverflowPolicy::Fail);
        assert_eq!(parse_overflow_policy(Some("fail")).unwrap(), OverflowPolicy::Fail);
        assert_eq!(
            parse_overflow_policy(Some(" FORCE ")).unwrap(),
            OverflowPolicy::ForceDraw
        );
        assert!(parse_overflow_policy(Some("ignore")).is_err());
    }

    #[test]
    fn test_ledger_capacity_parsing() {
        assert_eq!(parse_ledger_capacity(None).unwrap(), DEFAULT_CAPACITY);
        assert_eq!(parse_ledger_capacity(Some(" 250 ")).unwrap(), 250);
        assert!(parse_ledger_capacity(Some("0")).is_err());
        assert!(parse_ledger_capacity(Some("-5")).is_err());
        assert!(parse_ledger_capacity(Some("many")).is_err());
    }

    #[test]
    fn test_report_config_carries_titles_and_policy() {
        let config = Config {
            port: 8080,
            rust_log: "info".to_string(),
            ledger_path: None,
            ledger_capacity: 1000,
            report_title: "SENSUS".to_string(),
            report_subtitle: "RT 01".to_string(),
            overflow_policy: OverflowPolicy::ForceDraw,
        };
        let report = config.report_config();
        assert_eq!(report.titles.title, "SENSUS");
        assert_eq!(report.titles.subtitle, "RT 01");
        assert_eq!(report.overflow_policy, OverflowPolicy::ForceDraw);
        assert_eq!(report.geometry.page_width, 612.0);
    }
}
