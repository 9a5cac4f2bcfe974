//! Shoe size converter
//!
//! Sizing systems are piecewise-linear mappings over foot length; the base
//! representation is millimeters. Outputs snap to each system's step.

use crate::core::features::{unsupported, Feature};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ActionType, CommandItem, ExecuteActionResponse};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use ts_rs::TS;

pub struct ShoeSizeSystem {
    pub symbol: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    pub to_mm: fn(f64) -> f64,
    pub from_mm: fn(f64) -> f64,
    pub min_size: f64,
    pub max_size: f64,
    pub step: f64,
}

static SHOE_SIZE_SYSTEMS: &[ShoeSizeSystem] = &[
    ShoeSizeSystem {
        symbol: "US M",
        name: "US Men",
        country: "United States",
        to_mm: |size| (size * 25.4) + 22.86,
        from_mm: |mm| (mm - 22.86) / 25.4,
        min_size: 6.0,
        max_size: 16.0,
        step: 0.5,
    },
    ShoeSizeSystem {
        symbol: "US W",
        name: "US Women",
        country: "United States",
        to_mm: |size| (size * 25.4) + 20.32,
        from_mm: |mm| (mm - 20.32) / 25.4,
        min_size: 5.0,
        max_size: 12.0,
        step: 0.5,
    },
    ShoeSizeSystem {
        symbol: "UK",
        name: "UK",
        country: "United Kingdom",
        to_mm: |size| (size * 25.4) + 25.4,
        from_mm: |mm| (mm - 25.4) / 25.4,
        min_size: 3.0,
        max_size: 13.0,
        step: 0.5,
    },
    ShoeSizeSystem {
        symbol: "EU",
        name: "EU",
        country: "European Union",
        to_mm: |size| (size * 6.67) + 20.32,
        from_mm: |mm| (mm - 20.32) / 6.67,
        min_size: 35.0,
        max_size: 48.0,
        step: 1.0,
    },
    ShoeSizeSystem {
        symbol: "JP",
        name: "JP/CM",
        country: "Japan/China",
        to_mm: |size| size * 10.0,
        from_mm: |mm| mm / 10.0,
        min_size: 22.0,
        max_size: 30.0,
        step: 0.5,
    },
    ShoeSizeSystem {
        symbol: "AU",
        name: "AU",
        country: "Australia",
        to_mm: |size| (size * 25.4) + 25.4,
        from_mm: |mm| (mm - 25.4) / 25.4,
        min_size: 3.0,
        max_size: 13.0,
        step: 0.5,
    },
    ShoeSizeSystem {
        symbol: "MX",
        name: "MX",
        country: "Mexico",
        to_mm: |size| (size * 25.4) + 22.86,
        from_mm: |mm| (mm - 22.86) / 25.4,
        min_size: 6.0,
        max_size: 16.0,
        step: 0.5,
    },
    ShoeSizeSystem {
        symbol: "BR",
        name: "BR",
        country: "Brazil",
        to_mm: |size| (size * 25.4) + 22.86,
        from_mm: |mm| (mm - 22.86) / 25.4,
        min_size: 6.0,
        max_size: 16.0,
        step: 0.5,
    },
];

/// Group conversion result; the UI also shows the underlying foot length
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ShoeSizeConversion {
    pub values: BTreeMap<String, String>,
    pub foot_length_mm: f64,
}

fn find_system(symbol: &str) -> AppResult<&'static ShoeSizeSystem> {
    SHOE_SIZE_SYSTEMS
        .iter()
        .find(|s| s.symbol == symbol)
        .ok_or_else(|| AppError::UnknownUnit(symbol.to_string()))
}

fn snap(size: f64, step: f64) -> f64 {
    (size / step).round() * step
}

fn render(size: f64, step: f64) -> String {
    if step < 1.0 {
        format!("{:.1}", size)
    } else {
        format!("{:.0}", size)
    }
}

/// Convert a size between two systems, snapped to the target step
pub fn convert_shoe_size(value: f64, from_symbol: &str, to_symbol: &str) -> AppResult<f64> {
    let from = find_system(from_symbol)?;
    let to = find_system(to_symbol)?;
    if from_symbol == to_symbol {
        return Ok(value);
    }
    let mm = (from.to_mm)(value);
    Ok(snap((to.from_mm)(mm), to.step))
}

/// Convert a live input against every sizing system
pub fn convert_shoe_size_group(input: &str, from_symbol: &str) -> AppResult<ShoeSizeConversion> {
    let value = super::unit_converter::parse_value(input)?;
    let from = find_system(from_symbol)?;
    let mm = (from.to_mm)(value);

    let mut values = BTreeMap::new();
    for system in SHOE_SIZE_SYSTEMS {
        if system.symbol == from_symbol {
            values.insert(system.symbol.to_string(), input.to_string());
        } else {
            let snapped = snap((system.from_mm)(mm), system.step);
            values.insert(system.symbol.to_string(), render(snapped, system.step));
        }
    }
    Ok(ShoeSizeConversion {
        values,
        foot_length_mm: mm,
    })
}

#[derive(Clone)]
pub struct ShoeSizeFeature;

impl Feature for ShoeSizeFeature {
    fn id(&self) -> &'static str {
        "shoe_size_converter"
    }

    fn widget_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "widget_shoe_size_converter".to_string(),
            label: "Shoe Size Converter".to_string(),
            description: Some("Convert between shoe sizing systems".to_string()),
            action_type: None,
            widget_type: Some("shoe_size_converter".to_string()),
        }]
    }

    fn action_commands(&self) -> Vec<CommandItem> {
        SHOE_SIZE_SYSTEMS
            .iter()
            .map(|system| CommandItem {
                id: format!(
                    "convert_shoe_to_{}",
                    system.symbol.to_lowercase().replace([' ', '/'], "_")
                ),
                label: format!("Convert shoe size to {}", system.name),
                description: Some(system.country.to_string()),
                action_type: Some(ActionType::ConvertShoeSize {
                    target: system.symbol.to_string(),
                }),
                widget_type: None,
            })
            .collect()
    }

    fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        let target = match action {
            ActionType::ConvertShoeSize { target } => target,
            _ => return unsupported(),
        };

        let from_symbol = params
            .get("from")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::InvalidNumericInput("Missing 'from' parameter".to_string()))?;
        let amount = super::unit_converter::read_amount(params)?;

        let from = find_system(from_symbol)?;
        let to = find_system(target)?;
        let converted = convert_shoe_size(amount, from_symbol, target)?;
        Ok(ExecuteActionResponse {
            result: format!("{} {}", render(converted, to.step), to.symbol),
            metadata: Some(json!({
                "from_unit": from_symbol,
                "target_unit": target,
                "foot_length_mm": (from.to_mm)(amount),
                "widget": "shoe_size_converter",
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_men_nine_maps_through_foot_length() {
        let conversion = convert_shoe_size_group("9", "US M").unwrap();
        assert!((conversion.foot_length_mm - 251.46).abs() < 1e-9);
        assert_eq!(conversion.values["US M"], "9");
        assert_eq!(conversion.values["US W"], "9.0");
        assert_eq!(conversion.values["UK"], "9.0");
        assert_eq!(conversion.values["JP"], "25.0");
        // EU snaps to whole sizes
        assert_eq!(conversion.values["EU"], "35");
    }

    #[test]
    fn snapping_respects_step() {
        // JP is a direct cm scale; 25.3 cm snaps to the nearest half size
        let size = convert_shoe_size(25.3, "JP", "JP").unwrap();
        assert!((size - 25.3).abs() < 1e-9); // same system echoes

        let us = convert_shoe_size(25.3, "JP", "US M").unwrap();
        assert_eq!(us % 0.5, 0.0);
    }

    #[test]
    fn mx_and_br_share_the_us_men_last() {
        let mx = convert_shoe_size(9.0, "US M", "MX").unwrap();
        let br = convert_shoe_size(9.0, "US M", "BR").unwrap();
        assert_eq!(mx, 9.0);
        assert_eq!(br, 9.0);
    }

    #[test]
    fn invalid_input_fails_group() {
        assert!(convert_shoe_size_group("", "US M").is_err());
        assert!(convert_shoe_size_group("big", "EU").is_err());
    }
}
