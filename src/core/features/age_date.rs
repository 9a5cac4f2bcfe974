//! Age and date calculators
//!
//! Age and date-range decomposition use full-year and full-month
//! differences with a `% 12` / `% 30` split. The day component is total
//! days modulo 30, not the remainder after the month component; both
//! calendars display the same decomposition.

use crate::core::features::{unsupported, Feature};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ActionType, CommandItem, ExecuteActionResponse};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use ts_rs::TS;

use super::ethiopian_calendar::{format_ethiopian_date, gregorian_to_ethiopian};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgeBreakdown {
    pub years: i32,
    pub months: i32,
    #[ts(type = "number")]
    pub days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DateOp {
    Add,
    Subtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DateUnit {
    Years,
    Months,
    Days,
}

/// Full calendar years from `from` to `to`
fn full_year_diff(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

/// Full calendar months from `from` to `to`
fn full_month_diff(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut months =
        (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    months
}

/// Age between two dates as years, months, and days
pub fn age_between(birth: NaiveDate, target: NaiveDate) -> AgeBreakdown {
    let years = full_year_diff(birth, target);
    let months = full_month_diff(birth, target) % 12;
    let days = (target - birth).num_days() % 30;
    AgeBreakdown { years, months, days }
}

/// Absolute difference between two dates, same decomposition
pub fn date_diff(a: NaiveDate, b: NaiveDate) -> AgeBreakdown {
    let breakdown = if a <= b { age_between(a, b) } else { age_between(b, a) };
    AgeBreakdown {
        years: breakdown.years.abs(),
        months: breakdown.months.abs(),
        days: breakdown.days.abs(),
    }
}

/// Add or subtract years, months, or days
pub fn date_add(date: NaiveDate, op: DateOp, value: u32, unit: DateUnit) -> AppResult<NaiveDate> {
    let result = match (op, unit) {
        (DateOp::Add, DateUnit::Years) => date.checked_add_months(Months::new(value * 12)),
        (DateOp::Subtract, DateUnit::Years) => date.checked_sub_months(Months::new(value * 12)),
        (DateOp::Add, DateUnit::Months) => date.checked_add_months(Months::new(value)),
        (DateOp::Subtract, DateUnit::Months) => date.checked_sub_months(Months::new(value)),
        (DateOp::Add, DateUnit::Days) => date.checked_add_days(Days::new(value as u64)),
        (DateOp::Subtract, DateUnit::Days) => date.checked_sub_days(Days::new(value as u64)),
    };
    result.ok_or_else(|| AppError::InvalidDate(format!("{} out of range", date)))
}

fn parse_date_param(params: &serde_json::Value, key: &str) -> AppResult<NaiveDate> {
    let raw = params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::InvalidDate(format!("Missing '{}' parameter", key)))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| AppError::InvalidDate(raw.to_string()))
}

#[derive(Clone)]
pub struct AgeDateFeature;

impl Feature for AgeDateFeature {
    fn id(&self) -> &'static str {
        "age_date_calculator"
    }

    fn widget_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "widget_age_calculator".to_string(),
            label: "Age & Date Calculator".to_string(),
            description: Some(
                "Calculate ages and date differences in both calendars".to_string(),
            ),
            action_type: None,
            widget_type: Some("age_calculator".to_string()),
        }]
    }

    fn action_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "calculate_age".to_string(),
            label: "Calculate age between two dates".to_string(),
            description: None,
            action_type: Some(ActionType::CalculateAge),
            widget_type: None,
        }]
    }

    fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        if *action != ActionType::CalculateAge {
            return unsupported();
        }
        let birth = parse_date_param(params, "birth")?;
        let target = parse_date_param(params, "target")?;
        let age = age_between(birth, target);

        let ethiopian_birth = gregorian_to_ethiopian(birth)?;
        let ethiopian_target = gregorian_to_ethiopian(target)?;

        Ok(ExecuteActionResponse {
            result: format!("{}y {}m {}d", age.years, age.months, age.days),
            metadata: Some(json!({
                "years": age.years,
                "months": age.months,
                "days": age.days,
                "ethiopian_birth": format_ethiopian_date(&ethiopian_birth, "PPP")?,
                "ethiopian_target": format_ethiopian_date(&ethiopian_target, "PPP")?,
                "widget": "age_calculator",
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn exact_anniversary() {
        let age = age_between(date(1990, 5, 15), date(2020, 5, 15));
        assert_eq!(age.years, 30);
        assert_eq!(age.months, 0);
        // day component is total days mod 30
        assert_eq!(age.days, (date(2020, 5, 15) - date(1990, 5, 15)).num_days() % 30);
    }

    #[test]
    fn partial_year() {
        let age = age_between(date(2024, 1, 1), date(2024, 2, 15));
        assert_eq!(age, AgeBreakdown { years: 0, months: 1, days: 15 });
    }

    #[test]
    fn day_before_anniversary() {
        let age = age_between(date(2000, 6, 10), date(2024, 6, 9));
        assert_eq!(age.years, 23);
        assert_eq!(age.months, 11);
    }

    #[test]
    fn diff_is_symmetric() {
        let a = date(2020, 3, 1);
        let b = date(2023, 7, 20);
        assert_eq!(date_diff(a, b), date_diff(b, a));
    }

    #[test]
    fn month_arithmetic_clamps_month_end() {
        let result = date_add(date(2024, 1, 31), DateOp::Add, 1, DateUnit::Months).unwrap();
        assert_eq!(result, date(2024, 2, 29));

        let result = date_add(date(2023, 1, 31), DateOp::Add, 1, DateUnit::Months).unwrap();
        assert_eq!(result, date(2023, 2, 28));
    }

    #[test]
    fn year_arithmetic_handles_leap_day() {
        let result = date_add(date(2024, 2, 29), DateOp::Add, 1, DateUnit::Years).unwrap();
        assert_eq!(result, date(2025, 2, 28));
        let result = date_add(date(2024, 2, 29), DateOp::Subtract, 4, DateUnit::Years).unwrap();
        assert_eq!(result, date(2020, 2, 29));
    }

    #[test]
    fn day_arithmetic() {
        let result = date_add(date(2024, 12, 30), DateOp::Add, 3, DateUnit::Days).unwrap();
        assert_eq!(result, date(2025, 1, 2));
        let result = date_add(date(2024, 1, 1), DateOp::Subtract, 1, DateUnit::Days).unwrap();
        assert_eq!(result, date(2023, 12, 31));
    }
}
