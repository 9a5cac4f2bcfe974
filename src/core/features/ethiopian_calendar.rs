//! Ethiopian calendar converter
//!
//! Bidirectional mapping between the Gregorian and Ethiopian (Ge'ez)
//! calendars. The Ethiopian year has 12 months of 30 days plus Pagume, a
//! 13th month of 5 days (6 in a leap year); leap years fall every 4th year
//! (`year % 4 == 3`) with no century exception. Ethiopian New Year lands on
//! Gregorian Sept 11, shifting to Sept 12 in the Gregorian year preceding a
//! Gregorian leap year.
//!
//! Both directions run through the day count since the Common Era, anchored
//! at the Ethiopic epoch (Meskerem 1, year 1 = August 27, 8 CE Gregorian),
//! so the mapping is exact across leap boundaries in either calendar.

use crate::core::features::{unsupported, Feature};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ActionType, CommandItem, ExecuteActionResponse};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use ts_rs::TS;

pub const ETHIOPIAN_MONTHS: [&str; 13] = [
    "Meskerem", "Tikimt", "Hidar", "Tahsas", "Tir", "Yekatit", "Megabit", "Miazia", "Ginbot",
    "Sene", "Hamle", "Nehase", "Pagume",
];

// Sunday first, matching chrono's days-from-Sunday weekday index
pub const ETHIOPIAN_WEEKDAYS: [&str; 7] = [
    "Ehud", "Segno", "Maksegno", "Rebu", "Hamus", "Arb", "Kidame",
];

/// Day count from 0001-01-01 CE (= day 1) to the day before Meskerem 1,
/// year 1 of the Ethiopian calendar.
const ETHIOPIC_EPOCH_OFFSET: i32 = 2795;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EthiopianDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Ethiopian leap year: every 4th year, no century exception
pub fn is_ethiopian_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 3
}

/// Days in an Ethiopian month; Pagume has 5 or 6
pub fn days_in_ethiopian_month(year: i32, month: u32) -> u32 {
    if month == 13 {
        if is_ethiopian_leap_year(year) {
            6
        } else {
            5
        }
    } else {
        30
    }
}

impl EthiopianDate {
    pub fn new(year: i32, month: u32, day: u32) -> AppResult<Self> {
        if year < 1 {
            return Err(AppError::InvalidDate(format!("year {} out of range", year)));
        }
        if !(1..=13).contains(&month) {
            return Err(AppError::InvalidDate(format!("month {} out of range", month)));
        }
        let max_day = days_in_ethiopian_month(year, month);
        if !(1..=max_day).contains(&day) {
            return Err(AppError::InvalidDate(format!(
                "day {} out of range for {} {}",
                day,
                ETHIOPIAN_MONTHS[(month - 1) as usize],
                year
            )));
        }
        Ok(EthiopianDate { year, month, day })
    }

    pub fn month_name(&self) -> &'static str {
        ETHIOPIAN_MONTHS[(self.month - 1) as usize]
    }
}

/// Convert a Gregorian date to its Ethiopian equivalent.
///
/// Dates before the Ethiopic epoch (Meskerem 1, year 1) are `InvalidDate`.
pub fn gregorian_to_ethiopian(date: NaiveDate) -> AppResult<EthiopianDate> {
    // Anchored at Meskerem 1 of (virtual) year 0 so that each 1461-day
    // cycle ends with the leap year's Pagume 6
    let diff = date.num_days_from_ce() - ETHIOPIC_EPOCH_OFFSET + 364;
    let cycle = diff.div_euclid(1461);
    let r = diff.rem_euclid(1461);

    // The last day of a 4-year cycle is Pagume 6 of the leap year; the
    // plain mod-365 split would roll it into the next year.
    let day_of_year = r % 365 + 365 * (r / 1460);
    let year = 4 * cycle + r / 365 - r / 1460;
    if year < 1 {
        return Err(AppError::InvalidDate(format!(
            "{} precedes the Ethiopian calendar epoch",
            date
        )));
    }

    Ok(EthiopianDate {
        year,
        month: (day_of_year / 30 + 1) as u32,
        day: (day_of_year % 30 + 1) as u32,
    })
}

/// Convert an Ethiopian date to its Gregorian equivalent
pub fn ethiopian_to_gregorian(date: &EthiopianDate) -> AppResult<NaiveDate> {
    // Re-validate: the struct is plain data and may come off the wire
    let date = EthiopianDate::new(date.year, date.month, date.day)?;
    let days = ETHIOPIC_EPOCH_OFFSET
        + 365 * (date.year - 1)
        + date.year / 4
        + 30 * (date.month as i32 - 1)
        + date.day as i32;
    NaiveDate::from_num_days_from_ce_opt(days)
        .ok_or_else(|| AppError::InvalidDate(format!("{:?} out of Gregorian range", date)))
}

/// Format an Ethiopian date with the patterns the date pickers use:
/// `"PPP"` (long form), `"yyyy-MM-dd"`, and `"EEEE"`/`"cccc"` (weekday).
/// Unknown patterns fall back to the long form.
pub fn format_ethiopian_date(date: &EthiopianDate, pattern: &str) -> AppResult<String> {
    match pattern {
        "yyyy-MM-dd" => Ok(format!(
            "{:04}-{:02}-{:02}",
            date.year, date.month, date.day
        )),
        "EEEE" | "cccc" => {
            let gregorian = ethiopian_to_gregorian(date)?;
            let index = gregorian.weekday().num_days_from_sunday() as usize;
            Ok(ETHIOPIAN_WEEKDAYS[index].to_string())
        }
        _ => Ok(format!("{} {}, {}", date.month_name(), date.day, date.year)),
    }
}

#[derive(Clone)]
pub struct EthiopianCalendarFeature;

impl Feature for EthiopianCalendarFeature {
    fn id(&self) -> &'static str {
        "ethiopian_calendar"
    }

    fn widget_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "widget_date_converter".to_string(),
            label: "Date Converter".to_string(),
            description: Some("Convert dates between Gregorian and Ethiopian calendars".to_string()),
            action_type: None,
            widget_type: Some("date_converter".to_string()),
        }]
    }

    fn action_commands(&self) -> Vec<CommandItem> {
        vec![
            CommandItem {
                id: "convert_to_ethiopian".to_string(),
                label: "Convert date to Ethiopian calendar".to_string(),
                description: None,
                action_type: Some(ActionType::ToEthiopian),
                widget_type: None,
            },
            CommandItem {
                id: "convert_to_gregorian".to_string(),
                label: "Convert date to Gregorian calendar".to_string(),
                description: None,
                action_type: Some(ActionType::ToGregorian),
                widget_type: None,
            },
        ]
    }

    fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        match action {
            ActionType::ToEthiopian => {
                let raw = params
                    .get("date")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| AppError::InvalidDate("Missing 'date' parameter".to_string()))?;
                let gregorian = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| AppError::InvalidDate(raw.to_string()))?;
                let ethiopian = gregorian_to_ethiopian(gregorian)?;
                let iso = format_ethiopian_date(&ethiopian, "yyyy-MM-dd")?;
                let weekday = format_ethiopian_date(&ethiopian, "EEEE")?;
                Ok(ExecuteActionResponse {
                    result: format_ethiopian_date(&ethiopian, "PPP")?,
                    metadata: Some(json!({
                        "year": ethiopian.year,
                        "month": ethiopian.month,
                        "day": ethiopian.day,
                        "iso": iso,
                        "weekday": weekday,
                        "widget": "date_converter",
                    })),
                })
            }
            ActionType::ToGregorian => {
                let year = params.get("year").and_then(|v| v.as_i64()).ok_or_else(|| {
                    AppError::InvalidDate("Missing 'year' parameter".to_string())
                })? as i32;
                let month = params.get("month").and_then(|v| v.as_u64()).ok_or_else(|| {
                    AppError::InvalidDate("Missing 'month' parameter".to_string())
                })? as u32;
                let day = params.get("day").and_then(|v| v.as_u64()).ok_or_else(|| {
                    AppError::InvalidDate("Missing 'day' parameter".to_string())
                })? as u32;
                let ethiopian = EthiopianDate::new(year, month, day)?;
                let gregorian = ethiopian_to_gregorian(&ethiopian)?;
                Ok(ExecuteActionResponse {
                    result: gregorian.format("%Y-%m-%d").to_string(),
                    metadata: Some(json!({
                        "weekday": gregorian.format("%A").to_string(),
                        "widget": "date_converter",
                    })),
                })
            }
            _ => unsupported(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gdate(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_year_rule_has_no_century_exception() {
        assert!(is_ethiopian_leap_year(2011));
        assert!(is_ethiopian_leap_year(2015));
        assert!(!is_ethiopian_leap_year(2014));
        assert!(!is_ethiopian_leap_year(2016));
        // 1899 % 4 == 3: leap despite the Gregorian-style century position
        assert!(is_ethiopian_leap_year(1899));
    }

    #[test]
    fn new_year_after_ethiopian_leap_year_falls_on_sept_12() {
        // 2015 was an Ethiopian leap year, so the 2016 New Year shifts a day
        let ethiopian = gregorian_to_ethiopian(gdate(2023, 9, 12)).unwrap();
        assert_eq!(ethiopian, EthiopianDate { year: 2016, month: 1, day: 1 });

        // The day before is Pagume 6 of the leap year
        let ethiopian = gregorian_to_ethiopian(gdate(2023, 9, 11)).unwrap();
        assert_eq!(ethiopian, EthiopianDate { year: 2015, month: 13, day: 6 });
    }

    #[test]
    fn new_year_in_a_common_year_falls_on_sept_11() {
        let ethiopian = gregorian_to_ethiopian(gdate(2022, 9, 11)).unwrap();
        assert_eq!(ethiopian, EthiopianDate { year: 2015, month: 1, day: 1 });

        let ethiopian = gregorian_to_ethiopian(gdate(2022, 9, 10)).unwrap();
        assert_eq!(ethiopian, EthiopianDate { year: 2014, month: 13, day: 5 });
    }

    #[test]
    fn ethiopian_christmas_2016() {
        let ethiopian = gregorian_to_ethiopian(gdate(2024, 1, 7)).unwrap();
        assert_eq!(ethiopian, EthiopianDate { year: 2016, month: 4, day: 28 });
    }

    #[test]
    fn round_trip_gregorian_to_ethiopian() {
        let dates = [
            gdate(2023, 9, 11),
            gdate(2023, 9, 12),
            gdate(2024, 2, 29),
            gdate(2000, 1, 1),
            gdate(1900, 3, 1),
            gdate(2024, 12, 31),
        ];
        for date in dates {
            let ethiopian = gregorian_to_ethiopian(date).unwrap();
            let back = ethiopian_to_gregorian(&ethiopian).unwrap();
            assert_eq!(back, date, "via {:?}", ethiopian);
        }
    }

    #[test]
    fn round_trip_ethiopian_to_gregorian() {
        let dates = [
            EthiopianDate::new(2015, 13, 6).unwrap(),
            EthiopianDate::new(2016, 1, 1).unwrap(),
            EthiopianDate::new(2014, 13, 5).unwrap(),
            EthiopianDate::new(1992, 4, 22).unwrap(),
            EthiopianDate::new(2010, 7, 30).unwrap(),
        ];
        for date in dates {
            let gregorian = ethiopian_to_gregorian(&date).unwrap();
            let back = gregorian_to_ethiopian(gregorian).unwrap();
            assert_eq!(back, date, "via {}", gregorian);
        }
    }

    #[test]
    fn pagume_six_requires_a_leap_year() {
        assert!(EthiopianDate::new(2015, 13, 6).is_ok());
        assert!(matches!(
            EthiopianDate::new(2014, 13, 6),
            Err(AppError::InvalidDate(_))
        ));
    }

    #[test]
    fn constructor_rejects_out_of_range_fields() {
        assert!(EthiopianDate::new(2016, 14, 1).is_err());
        assert!(EthiopianDate::new(2016, 0, 1).is_err());
        assert!(EthiopianDate::new(2016, 1, 31).is_err());
        assert!(EthiopianDate::new(2016, 1, 0).is_err());
        assert!(EthiopianDate::new(0, 1, 1).is_err());
    }

    #[test]
    fn dates_before_the_epoch_are_invalid() {
        assert!(matches!(
            gregorian_to_ethiopian(gdate(7, 1, 1)),
            Err(AppError::InvalidDate(_))
        ));
    }

    #[test]
    fn formatting_patterns() {
        let date = EthiopianDate::new(2016, 1, 1).unwrap();
        assert_eq!(format_ethiopian_date(&date, "PPP").unwrap(), "Meskerem 1, 2016");
        assert_eq!(format_ethiopian_date(&date, "yyyy-MM-dd").unwrap(), "2016-01-01");
        // Meskerem 1, 2016 = Tuesday, September 12, 2023
        assert_eq!(format_ethiopian_date(&date, "EEEE").unwrap(), "Maksegno");
        assert_eq!(format_ethiopian_date(&date, "cccc").unwrap(), "Maksegno");
    }
}
