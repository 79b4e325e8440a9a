//! Human-readable overview of a computed plan.

use serde::Serialize;

use super::error::ApiError;
use crate::core::PlanResult;

pub const CURRENCY_SYMBOL: &str = "₹";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub metric: &'static str,
    pub value: String,
}

impl OverviewRow {
    fn new(metric: &'static str, value: String) -> Self {
        Self { metric, value }
    }
}

pub fn overview_rows(result: &PlanResult) -> Vec<OverviewRow> {
    let mut rows = vec![
        OverviewRow::new(
            "Net real return after FI",
            format_percent(result.net_real_post_target_return, 2),
        ),
        OverviewRow::new(
            "Annual expenses at FI",
            format_currency(result.expense_at_target),
        ),
        OverviewRow::new(
            "Required corpus at FI",
            format_currency(result.base_required_corpus),
        ),
        OverviewRow::new(
            "Future value of current investments at FI",
            format_currency(result.future_value_of_existing_assets),
        ),
        OverviewRow::new("Gap to fund", format_currency(result.base_gap)),
        OverviewRow::new(
            "Monthly SIP needed",
            format_currency(result.required_monthly_contribution),
        ),
        OverviewRow::new(
            "Lumpsum needed today",
            format_currency(result.required_lumpsum),
        ),
        OverviewRow::new("Coverage now", format_percent(result.coverage_ratio, 1)),
        OverviewRow::new("Readiness", result.readiness().label().to_string()),
    ];

    if result.inheritance_corpus_component > 0.0 {
        rows.extend([
            OverviewRow::new(
                "Inheritance corpus at FI",
                format_currency(result.inheritance_corpus_component),
            ),
            OverviewRow::new(
                "Required corpus incl. inheritance",
                format_currency(result.displayed_required_corpus),
            ),
            OverviewRow::new(
                "Additional monthly SIP for inheritance",
                format_currency(result.additional_monthly_contribution),
            ),
            OverviewRow::new(
                "Additional lumpsum for inheritance",
                format_currency(result.additional_lumpsum),
            ),
        ]);
    }

    rows
}

pub fn overview_csv(rows: &[OverviewRow]) -> Result<String, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Metric", "Value"])?;
    for row in rows {
        writer.write_record([row.metric, row.value.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ApiError::Io(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Whole currency units with comma digit grouping, e.g. `₹1,234,567`.
pub fn format_currency(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{}", group_thousands(amount))
}

pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

fn group_thousands(amount: f64) -> String {
    let rendered = format!("{amount:.0}");
    let (mut sign, digits) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return rendered;
    }
    if digits.bytes().all(|b| b == b'0') {
        sign = "";
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlanInputs, compute_plan};

    fn sample_result(inheritance_goal: f64) -> PlanResult {
        compute_plan(&PlanInputs {
            current_age: 25,
            target_age: 60,
            life_expectancy_age: 90,
            inflation_rate: 0.05,
            pre_target_return_rate: 0.10,
            post_target_return_rate: 0.07,
            existing_asset_return_rate: 0.08,
            current_monthly_expense: 50_000.0,
            current_annual_expense: 600_000.0,
            current_investments: 1_000_000.0,
            inheritance_goal,
        })
        .expect("valid inputs")
    }

    #[test]
    fn format_currency_groups_digits_and_rounds() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.4), "₹999");
        assert_eq!(format_currency(1_000.0), "₹1,000");
        assert_eq!(format_currency(1_234_567.4), "₹1,234,567");
        assert_eq!(format_currency(76_533_987.087_973_04), "₹76,533,987");
        assert_eq!(format_currency(-61_748_642.79), "₹-61,748,643");
        assert_eq!(format_currency(-0.2), "₹0");
    }

    #[test]
    fn format_percent_uses_requested_precision() {
        assert_eq!(format_percent(0.019_047_619, 2), "1.90%");
        assert_eq!(format_percent(0.193_186_6, 1), "19.3%");
        assert_eq!(format_percent(1.0, 1), "100.0%");
    }

    #[test]
    fn overview_rows_cover_base_metrics_without_inheritance() {
        let rows = overview_rows(&sample_result(0.0));
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0].metric, "Net real return after FI");
        assert_eq!(rows[0].value, "1.90%");
        assert_eq!(rows[2].value, "₹76,533,987");
        assert_eq!(rows[5].value, "₹16,130");
        assert_eq!(rows[7].value, "19.3%");
        assert_eq!(rows[8].value, "Low");
        assert!(rows.iter().all(|row| !row.metric.contains("inheritance")));
    }

    #[test]
    fn overview_rows_append_inheritance_metrics_when_goal_set() {
        let rows = overview_rows(&sample_result(5_000_000.0));
        assert_eq!(rows.len(), 13);
        let metrics: Vec<&str> = rows.iter().map(|row| row.metric).collect();
        assert!(metrics.contains(&"Inheritance corpus at FI"));
        assert!(metrics.contains(&"Additional monthly SIP for inheritance"));
        let extra = rows
            .iter()
            .find(|row| row.metric == "Additional monthly SIP for inheritance")
            .expect("row present");
        assert_eq!(extra.value, "₹172");
    }

    #[test]
    fn overview_csv_quotes_grouped_amounts() {
        let rows = overview_rows(&sample_result(0.0));
        let csv = overview_csv(&rows).expect("csv renders");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Metric,Value"));
        assert_eq!(lines.next(), Some("Net real return after FI,1.90%"));
        assert!(csv.contains("Required corpus at FI,\"₹76,533,987\""));
        assert_eq!(csv.lines().count(), rows.len() + 1);
    }
}
