use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::analytics::{QueryParams, VisitWindow, DEFAULT_VISIT_THRESHOLD};
use crate::loader::DEFAULT_TIMESTAMP_FORMAT;
use crate::report::OutputFormat;

/// Layout used by `SITESTATS_WINDOW_START` / `SITESTATS_WINDOW_END`,
/// independent of the input timestamp format.
pub const WINDOW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    pub queries: QueryParams,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// chrono format string for the visit log's `ts` column
    pub timestamp_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timestamp_format = var("SITESTATS_TIMESTAMP_FORMAT")
            .unwrap_or_else(|| DEFAULT_TIMESTAMP_FORMAT.to_string());

        let country = var("SITESTATS_COUNTRY").unwrap_or_else(|| "BDV".to_string());

        let start = var("SITESTATS_WINDOW_START")
            .unwrap_or_else(|| "2019-02-03 00:00:00".to_string());
        let end = var("SITESTATS_WINDOW_END")
            .unwrap_or_else(|| "2019-02-04 23:59:59".to_string());
        let window = VisitWindow::new(
            parse_window_bound(&start).context("SITESTATS_WINDOW_START is not a valid timestamp")?,
            parse_window_bound(&end).context("SITESTATS_WINDOW_END is not a valid timestamp")?,
        )?;

        let threshold = match var("SITESTATS_VISIT_THRESHOLD") {
            Some(raw) => raw
                .parse::<u64>()
                .context("SITESTATS_VISIT_THRESHOLD must be a non-negative integer")?,
            None => DEFAULT_VISIT_THRESHOLD,
        };

        let leaderboard_limit = var("SITESTATS_LEADERBOARD_LIMIT")
            .map(|raw| raw.parse::<usize>())
            .transpose()
            .context("SITESTATS_LEADERBOARD_LIMIT must be a non-negative integer")?;

        let format = match var("SITESTATS_OUTPUT")
            .unwrap_or_else(|| "text".to_string())
            .to_lowercase()
            .as_str()
        {
            "text" => OutputFormat::Text,
            "json" => OutputFormat::Json,
            other => {
                tracing::warn!(
                    "Unknown SITESTATS_OUTPUT '{other}', falling back to 'text'. Supported values: text, json"
                );
                OutputFormat::Text
            }
        };

        Ok(Config {
            input: InputConfig { timestamp_format },
            queries: QueryParams {
                country,
                window,
                threshold,
                leaderboard_limit,
            },
            output: OutputConfig { format },
        })
    }
}

pub fn parse_window_bound(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), WINDOW_TIMESTAMP_FORMAT)
}
