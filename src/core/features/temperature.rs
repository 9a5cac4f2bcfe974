//! Temperature converter
//!
//! Temperature is affine, not multiplicative, so the table carries a
//! `to_celsius`/`from_celsius` function pair per scale instead of a scalar
//! factor. Routing still goes through one canonical base (Celsius).

use crate::core::features::{unsupported, Feature};
use crate::shared::error::{AppError, AppResult};
use crate::shared::format::{FormatBands, Tier};
use crate::shared::types::{ActionType, CommandItem, ConvertGroupResponse, ExecuteActionResponse};
use serde_json::json;
use std::collections::BTreeMap;

pub struct TemperatureScale {
    pub symbol: &'static str,
    pub name: &'static str,
    pub to_celsius: fn(f64) -> f64,
    pub from_celsius: fn(f64) -> f64,
}

static TEMPERATURE_SCALES: &[TemperatureScale] = &[
    TemperatureScale {
        symbol: "°C",
        name: "Celsius",
        to_celsius: |v| v,
        from_celsius: |v| v,
    },
    TemperatureScale {
        symbol: "°F",
        name: "Fahrenheit",
        to_celsius: |v| (v - 32.0) * 5.0 / 9.0,
        from_celsius: |v| (v * 9.0 / 5.0) + 32.0,
    },
    TemperatureScale {
        symbol: "K",
        name: "Kelvin",
        to_celsius: |v| v - 273.15,
        from_celsius: |v| v + 273.15,
    },
    TemperatureScale {
        symbol: "°R",
        name: "Rankine",
        to_celsius: |v| (v - 491.67) * 5.0 / 9.0,
        from_celsius: |v| (v + 273.15) * 9.0 / 5.0,
    },
    TemperatureScale {
        symbol: "°Ré",
        name: "Réaumur",
        to_celsius: |v| v * 5.0 / 4.0,
        from_celsius: |v| v * 4.0 / 5.0,
    },
    TemperatureScale {
        symbol: "°T",
        name: "Triple Point",
        to_celsius: |v| v - 273.16,
        from_celsius: |v| v + 273.16,
    },
];

static TEMPERATURE_BANDS: FormatBands = FormatBands {
    signed: false,
    tiers: &[
        Tier::Fixed { below: 0.01, dp: 6, nonzero_only: true, positive_only: false },
        Tier::Fixed { below: 1.0, dp: 4, nonzero_only: false, positive_only: false },
        Tier::Grouped { at_least: 1000.0, max_dp: 1 },
    ],
    default_dp: 2,
};

fn find_scale(symbol: &str) -> AppResult<&'static TemperatureScale> {
    TEMPERATURE_SCALES
        .iter()
        .find(|s| s.symbol == symbol)
        .ok_or_else(|| AppError::UnknownUnit(symbol.to_string()))
}

/// Convert between two temperature scales via Celsius
pub fn convert_temperature(value: f64, from_symbol: &str, to_symbol: &str) -> AppResult<f64> {
    if from_symbol == to_symbol {
        return Ok(value);
    }
    let from = find_scale(from_symbol)?;
    let to = find_scale(to_symbol)?;
    let celsius = (from.to_celsius)(value);
    Ok((to.from_celsius)(celsius))
}

/// Convert a live input against every scale; invalid input fails the group
pub fn convert_temperature_group(
    input: &str,
    from_symbol: &str,
) -> AppResult<ConvertGroupResponse> {
    let value = super::unit_converter::parse_value(input)?;
    let from = find_scale(from_symbol)?;
    let celsius = (from.to_celsius)(value);

    let mut values = BTreeMap::new();
    for scale in TEMPERATURE_SCALES {
        if scale.symbol == from_symbol {
            values.insert(scale.symbol.to_string(), input.to_string());
        } else {
            let converted = (scale.from_celsius)(celsius);
            values.insert(scale.symbol.to_string(), TEMPERATURE_BANDS.format(converted));
        }
    }
    Ok(ConvertGroupResponse { values })
}

#[derive(Clone)]
pub struct TemperatureFeature;

impl Feature for TemperatureFeature {
    fn id(&self) -> &'static str {
        "temperature_converter"
    }

    fn widget_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "widget_temperature_converter".to_string(),
            label: "Temperature Converter".to_string(),
            description: Some("Convert between temperature scales".to_string()),
            action_type: None,
            widget_type: Some("temperature_converter".to_string()),
        }]
    }

    fn action_commands(&self) -> Vec<CommandItem> {
        TEMPERATURE_SCALES
            .iter()
            .map(|scale| CommandItem {
                id: format!("convert_to_{}", scale.name.to_lowercase().replace(' ', "_")),
                label: format!("Convert to {}", scale.name),
                description: None,
                action_type: Some(ActionType::ConvertTemperature {
                    target: scale.symbol.to_string(),
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
            ActionType::ConvertTemperature { target } => target,
            _ => return unsupported(),
        };

        let from_symbol = params
            .get("from")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::InvalidNumericInput("Missing 'from' parameter".to_string()))?;
        let amount = super::unit_converter::read_amount(params)?;

        let converted = convert_temperature(amount, from_symbol, target)?;
        Ok(ExecuteActionResponse {
            result: format!("{} {}", TEMPERATURE_BANDS.format(converted), target),
            metadata: Some(json!({
                "from_unit": from_symbol,
                "target_unit": target,
                "original_amount": amount,
                "converted_amount": converted,
                "widget": "temperature_converter",
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_fahrenheit_landmarks() {
        assert!((convert_temperature(0.0, "°C", "°F").unwrap() - 32.0).abs() < 1e-9);
        assert!((convert_temperature(100.0, "°C", "°F").unwrap() - 212.0).abs() < 1e-9);
        // -40 is the same on both scales
        assert!((convert_temperature(-40.0, "°C", "°F").unwrap() + 40.0).abs() < 1e-9);
    }

    #[test]
    fn kelvin_round_trip() {
        let k = convert_temperature(25.0, "°C", "K").unwrap();
        assert!((k - 298.15).abs() < 1e-9);
        let back = convert_temperature(k, "K", "°C").unwrap();
        assert!((back - 25.0).abs() < 1e-9);
    }

    #[test]
    fn rankine_absolute_zero() {
        let c = convert_temperature(0.0, "°R", "°C").unwrap();
        assert!((c + 273.15).abs() < 1e-9);
    }

    #[test]
    fn group_uses_temperature_bands() {
        let group = convert_temperature_group("0", "°C").unwrap();
        assert_eq!(group.values["°C"], "0");
        assert_eq!(group.values["°F"], "32.00");
        assert_eq!(group.values["K"], "273.15");
        assert_eq!(group.values["°Ré"], "0.0000");
    }

    #[test]
    fn invalid_input_fails_group() {
        assert!(convert_temperature_group("abc", "°C").is_err());
    }
}
