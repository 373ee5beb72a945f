//! Immutable result snapshots and their text/JSON rendering.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analytics::{FrequentVisit, Leaders, ProductPopularity, SiteTally, TopSites, VisitWindow};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitReport {
    pub country: String,
    pub unique_visitors: TopSites,
    pub window: VisitWindow,
    pub threshold: u64,
    pub frequent_visitors: Vec<FrequentVisit>,
    pub last_visits: Vec<SiteTally>,
    pub same_site_users: u64,
}

impl VisitReport {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => self.render_text(),
        }
    }

    fn render_text(&self) -> Result<String> {
        let mut out = String::new();

        writeln!(out, "Unique visitors from {}", self.country)?;
        writeln!(out, "\tSites: [{}]", self.unique_visitors.sites.join(", "))?;
        writeln!(out, "\tTotal: {}", self.unique_visitors.max_count)?;
        writeln!(out)?;

        writeln!(
            out,
            "More than {} visits between {} and {} (user_id, site_id, visits)",
            self.threshold,
            self.window.start.format(TIMESTAMP_FORMAT),
            self.window.end.format(TIMESTAMP_FORMAT),
        )?;
        let triples: Vec<String> = self
            .frequent_visitors
            .iter()
            .map(|f| format!("({},{},{})", f.user_id, f.site_id, f.visits))
            .collect();
        writeln!(out, "\t{}", triples.join(" "))?;
        writeln!(out)?;

        writeln!(out, "Last visits (site_id, number_of_users)")?;
        let pairs: Vec<String> = self
            .last_visits
            .iter()
            .map(|t| format!("({},{})", t.site_id, t.users))
            .collect();
        writeln!(out, "\t{}", pairs.join(" "))?;
        writeln!(out)?;

        writeln!(
            out,
            "Users whose first and last visits were to the same site: {}",
            self.same_site_users
        )?;

        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseReport {
    pub popularity: ProductPopularity,
}

impl PurchaseReport {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => {
                let mut out = String::new();
                let Leaders { keys, value } = &self.popularity.by_quantity;
                writeln!(
                    out,
                    "Most popular product(s) by quantity sold: [{}] at {} units",
                    keys.join(", "),
                    value
                )?;
                let Leaders { keys, value } = &self.popularity.by_buyers;
                writeln!(
                    out,
                    "Most popular product(s) by number of purchasers: [{}] at {} unique users",
                    keys.join(", "),
                    value
                )?;
                Ok(out)
            }
        }
    }
}
