//! Report generation for dashboard data.

use crate::engine::AnalyticsEngine;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use traffic_domain::{FilterParams, Table};

/// Snapshot of the dashboard's headline views for one date window.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub top_states: Table,
    pub top_operators: Table,
    pub top_airports: Table,
    pub traffic_variations: Table,
}

impl AnalyticsEngine {
    /// Generate the headline report. Selections in `params` apply to the
    /// network traffic variations only; rankings use the date window.
    pub fn generate_report(&self, params: &FilterParams) -> Result<DashboardReport> {
        let top_states = self.top_ten_states(params)?;
        let top_operators = self.top_ten_operators(params)?;
        let top_airports = self.top_flight_airports(params, &[])?;
        let traffic_variations = self.traffic_variations(params)?;

        Ok(DashboardReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            start_date: params.start_date(),
            end_date: params.end_date(),
            top_states,
            top_operators,
            top_airports,
            traffic_variations,
        })
    }

    /// Generate report as JSON string.
    pub fn generate_report_json(&self, params: &FilterParams) -> Result<String> {
        let report = self.generate_report(params)?;
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Generate Markdown report.
    pub fn generate_report_markdown(&self, params: &FilterParams) -> Result<String> {
        let report = self.generate_report(params)?;

        let mut md = String::new();
        md.push_str("# European Air Traffic Report\n\n");
        md.push_str(&format!("**Generated:** {}\n\n", report.generated_at));
        md.push_str(&format!(
            "**Period:** {} to {}\n\n",
            bound(report.start_date, "first day"),
            bound(report.end_date, "last day")
        ));

        let sections = [
            ("Top States", &report.top_states),
            ("Top Aircraft Operators", &report.top_operators),
            ("Top Airports", &report.top_airports),
            ("Network Traffic Variations", &report.traffic_variations),
        ];
        for (title, table) in sections {
            md.push_str(&format!("## {title}\n\n"));
            if table.is_empty() {
                md.push_str("*No data in this period*\n\n");
            } else {
                md.push_str(&render_markdown(table));
                md.push('\n');
            }
        }

        Ok(md)
    }
}

fn bound(date: Option<NaiveDate>, open: &str) -> String {
    date.map_or_else(|| open.to_string(), |d| d.to_string())
}

/// Render any derived table as a Markdown table. Numbers print with one
/// decimal, nulls as empty cells.
#[must_use]
pub fn render_markdown(table: &Table) -> String {
    let mut md = String::new();
    let header: Vec<String> = table.column_names().map(escape).collect();
    md.push_str(&format!("| {} |\n", header.join(" | ")));
    md.push_str(&format!(
        "|{}\n",
        header.iter().map(|_| "---|").collect::<String>()
    ));
    for row in table.rows() {
        let cells: Vec<String> = row
            .values()
            .iter()
            .map(|value| escape(&value.to_string()))
            .collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    md
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}
