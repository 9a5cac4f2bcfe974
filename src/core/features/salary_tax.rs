//! Ethiopian salary tax engine
//!
//! Progressive employment income tax over six brackets, each a flat rate
//! with a fixed deductible that approximates marginal taxation, plus the
//! 7% pension contribution. The reverse direction (net -> gross) inverts
//! the piecewise-linear net function per bracket; bracket selection happens
//! in net-income space by evaluating the net value at every gross bracket
//! boundary.
//!
//! All monetary values stay in f64 end to end; two-decimal rounding is a
//! presentation concern and never feeds back into the computation.

use crate::core::features::{unsupported, Feature};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ActionType, CommandItem, ExecuteActionResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use ts_rs::TS;

/// Monthly income tax brackets (Birr); rate stored as a percentage
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxBracket {
    pub min: f64,
    pub max: Option<f64>,
    pub rate: f64,
    pub deductible: f64,
}

pub static TAX_BRACKETS: [TaxBracket; 6] = [
    TaxBracket { min: 0.0, max: Some(2000.0), rate: 0.0, deductible: 0.0 },
    TaxBracket { min: 2001.0, max: Some(4000.0), rate: 15.0, deductible: 300.0 },
    TaxBracket { min: 4001.0, max: Some(7000.0), rate: 20.0, deductible: 500.0 },
    TaxBracket { min: 7001.0, max: Some(10000.0), rate: 25.0, deductible: 850.0 },
    TaxBracket { min: 10001.0, max: Some(14000.0), rate: 30.0, deductible: 1350.0 },
    TaxBracket { min: 14001.0, max: None, rate: 35.0, deductible: 2050.0 },
];

/// Employee pension contribution rate
pub const PENSION_RATE: f64 = 0.07;

/// One entry of the calculation breakdown. Structured data, not
/// pre-formatted strings, so the frontend can localize the rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload")]
#[ts(export)]
pub enum TaxStep {
    Income { amount: f64 },
    TaxRate { rate: f64 },
    GrossTax { income: f64, rate: f64, amount: f64 },
    Deductible { amount: f64 },
    FinalTax { gross_tax: f64, deductible: f64, amount: f64 },
    Pension { income: f64, rate: f64, amount: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxBreakdown {
    pub gross: f64,
    pub tax: f64,
    pub pension: f64,
    pub net: f64,
    pub rate: f64,
    pub deductible: f64,
    pub steps: Vec<TaxStep>,
}

impl TaxBreakdown {
    fn zero() -> Self {
        TaxBreakdown {
            gross: 0.0,
            tax: 0.0,
            pension: 0.0,
            net: 0.0,
            rate: 0.0,
            deductible: 0.0,
            steps: vec![],
        }
    }
}

/// The bracket a monthly income falls into.
///
/// Bounded brackets compare against `income.ceil()`; the table's bracket
/// edges leave fractional gaps (2000 -> 2001) and the ceiling bridges them.
/// The open-ended top bracket compares the raw income.
pub fn bracket_for(income: f64) -> Option<&'static TaxBracket> {
    let key = income.ceil();
    TAX_BRACKETS.iter().find(|bracket| match bracket.max {
        Some(max) => key >= bracket.min && key <= max,
        None => income >= bracket.min,
    })
}

/// Forward calculation: tax, pension, and net for a monthly gross income.
/// Non-positive income yields the all-zero breakdown, not an error.
pub fn compute_tax(gross: f64) -> TaxBreakdown {
    if gross <= 0.0 {
        return TaxBreakdown::zero();
    }

    let Some(bracket) = bracket_for(gross) else {
        return TaxBreakdown::zero();
    };

    let gross_tax = gross * bracket.rate / 100.0;
    let tax = (gross_tax - bracket.deductible).max(0.0);
    let pension = gross * PENSION_RATE;
    let net = gross - tax - pension;

    let steps = vec![
        TaxStep::Income { amount: gross },
        TaxStep::TaxRate { rate: bracket.rate },
        TaxStep::GrossTax { income: gross, rate: bracket.rate, amount: gross_tax },
        TaxStep::Deductible { amount: bracket.deductible },
        TaxStep::FinalTax { gross_tax, deductible: bracket.deductible, amount: tax },
        TaxStep::Pension { income: gross, rate: PENSION_RATE, amount: pension },
    ];

    TaxBreakdown {
        gross,
        tax,
        pension,
        net,
        rate: bracket.rate,
        deductible: bracket.deductible,
        steps,
    }
}

fn net_income(gross: f64) -> f64 {
    compute_tax(gross).net
}

/// Reverse calculation: recover the monthly gross income producing `net`.
///
/// Within a bracket, `net = gross·(1 − rate/100 − 0.07) + deductible`, so
/// the inversion is exact once the right bracket is known. Brackets are
/// defined in gross space but the lookup key is a net figure, so each
/// bracket's net range comes from evaluating the net income at its lower
/// gross bound; the first half-open interval containing the target wins,
/// with the open-ended top bracket as the fallback.
pub fn gross_from_net(net: f64) -> f64 {
    if net <= 0.0 {
        return 0.0;
    }

    for (i, bracket) in TAX_BRACKETS.iter().enumerate() {
        let net_at_min = net_income(bracket.min);
        let net_at_next_min = TAX_BRACKETS
            .get(i + 1)
            .map(|next| net_income(next.min))
            .unwrap_or(f64::INFINITY);

        if net >= net_at_min && net < net_at_next_min {
            let rate = bracket.rate / 100.0;
            return (net - bracket.deductible) / (1.0 - rate - PENSION_RATE);
        }
    }

    // Floating-point edge at the open-ended top bracket
    let last = &TAX_BRACKETS[TAX_BRACKETS.len() - 1];
    (net - last.deductible) / (1.0 - last.rate / 100.0 - PENSION_RATE)
}

#[derive(Clone)]
pub struct SalaryTaxFeature;

impl Feature for SalaryTaxFeature {
    fn id(&self) -> &'static str {
        "salary_calculator"
    }

    fn widget_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "widget_salary_calculator".to_string(),
            label: "Salary Calculator".to_string(),
            description: Some("Ethiopian income tax and pension calculations".to_string()),
            action_type: None,
            widget_type: Some("salary_calculator".to_string()),
        }]
    }

    fn action_commands(&self) -> Vec<CommandItem> {
        vec![
            CommandItem {
                id: "compute_tax".to_string(),
                label: "Calculate tax from gross income".to_string(),
                description: None,
                action_type: Some(ActionType::ComputeTax),
                widget_type: None,
            },
            CommandItem {
                id: "gross_from_net".to_string(),
                label: "Calculate gross income from net".to_string(),
                description: None,
                action_type: Some(ActionType::GrossFromNet),
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
            ActionType::ComputeTax => {
                let income = params
                    .get("income")
                    .and_then(|v| v.as_f64())
                    .ok_or_else(|| {
                        AppError::InvalidNumericInput("Missing 'income' parameter".to_string())
                    })?;
                let breakdown = compute_tax(income);
                Ok(ExecuteActionResponse {
                    result: format!("{:.2} Birr", breakdown.net),
                    metadata: Some(serde_json::to_value(&breakdown)?),
                })
            }
            ActionType::GrossFromNet => {
                let net = params.get("net").and_then(|v| v.as_f64()).ok_or_else(|| {
                    AppError::InvalidNumericInput("Missing 'net' parameter".to_string())
                })?;
                let gross = gross_from_net(net);
                Ok(ExecuteActionResponse {
                    result: format!("{:.2} Birr", gross),
                    metadata: Some(json!({
                        "gross": gross,
                        "net": net,
                        "widget": "salary_calculator",
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

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn documented_worked_example() {
        // 10,001 Birr gross: tax 1,650.30, pension 700.07, net 7,650.63
        let breakdown = compute_tax(10001.0);
        assert!(close(breakdown.tax, 1650.30));
        assert!(close(breakdown.pension, 700.07));
        assert!(close(breakdown.net, 7650.63));
        assert_eq!(breakdown.rate, 30.0);
        assert_eq!(breakdown.deductible, 1350.0);
    }

    #[test]
    fn lowest_bracket_pays_no_tax() {
        let breakdown = compute_tax(2000.0);
        assert!(close(breakdown.tax, 0.0));
        assert!(close(breakdown.pension, 140.0));
        assert!(close(breakdown.net, 1860.0));
    }

    #[test]
    fn ceiling_bridges_fractional_bracket_gaps() {
        // 2000.5 sits between the 0% and 15% brackets in gross space; the
        // ceiling comparison places it in the 15% bracket
        let breakdown = compute_tax(2000.5);
        assert_eq!(breakdown.rate, 15.0);
        assert!(close(breakdown.tax, 2000.5 * 0.15 - 300.0));
    }

    #[test]
    fn non_positive_income_is_the_zero_breakdown() {
        for income in [0.0, -1.0, -10000.0] {
            let breakdown = compute_tax(income);
            assert_eq!(breakdown.tax, 0.0);
            assert_eq!(breakdown.pension, 0.0);
            assert_eq!(breakdown.net, 0.0);
            assert!(breakdown.steps.is_empty());
        }
    }

    #[test]
    fn steps_carry_the_full_derivation() {
        let breakdown = compute_tax(10001.0);
        assert_eq!(breakdown.steps.len(), 6);
        assert_eq!(breakdown.steps[0], TaxStep::Income { amount: 10001.0 });
        assert!(matches!(
            breakdown.steps[4],
            TaxStep::FinalTax { amount, .. } if close(amount, 1650.30)
        ));
        assert!(matches!(
            breakdown.steps[5],
            TaxStep::Pension { amount, .. } if close(amount, 700.07)
        ));
    }

    #[test]
    fn net_is_monotonic_in_gross() {
        let mut previous = 0.0;
        let mut gross = 0.0;
        while gross <= 30000.0 {
            let net = compute_tax(gross).net;
            assert!(
                net >= previous - 1e-9,
                "net decreased at gross {}: {} < {}",
                gross,
                net,
                previous
            );
            previous = net;
            gross += 25.0;
        }
    }

    #[test]
    fn inversion_recovers_gross_in_bracket_interiors() {
        for gross in [1500.0, 3000.0, 5500.0, 8200.0, 12000.0, 20000.0, 50000.0] {
            let net = compute_tax(gross).net;
            let recovered = gross_from_net(net);
            assert!(
                (recovered - gross).abs() < 1e-6,
                "gross {} -> net {} -> {}",
                gross,
                net,
                recovered
            );
        }
    }

    #[test]
    fn inversion_of_non_positive_net_is_zero() {
        assert_eq!(gross_from_net(0.0), 0.0);
        assert_eq!(gross_from_net(-500.0), 0.0);
    }

    #[test]
    fn top_bracket_fallback_handles_large_net() {
        let gross = gross_from_net(1_000_000.0);
        assert!((compute_tax(gross).net - 1_000_000.0).abs() < 1e-6);
    }
}
