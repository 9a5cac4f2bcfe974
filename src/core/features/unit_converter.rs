//! Generic unit conversion engine
//!
//! Every linear domain (length, weight, area, speed, time, data storage)
//! shares one engine: a static table of units with a factor to the domain's
//! base unit, conversion routed value -> base -> target, and a per-domain
//! magnitude banding policy for display. Exactly one unit per table has
//! factor 1.0 (the base); conversion never goes unit-to-unit directly.

use crate::core::features::{unsupported, Feature};
use crate::shared::error::{AppError, AppResult};
use crate::shared::format::{FormatBands, Tier};
use crate::shared::types::{
    ActionType, CommandItem, ConvertGroupResponse, ConvertUnitsRequest, ConvertUnitsResponse,
    ExecuteActionResponse, GetUnitsResponse, UnitDto,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use ts_rs::TS;

/// Unit definition with a scalar factor to the domain base unit
#[derive(Debug, Clone)]
pub struct UnitDef {
    pub symbol: &'static str,
    pub name: &'static str,
    pub factor_to_base: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum UnitDomain {
    Length,
    Weight,
    Area,
    Speed,
    Time,
    DataStorage,
}

// Length (base: meters)
static LENGTH_UNITS: &[UnitDef] = &[
    UnitDef { symbol: "m", name: "Meters", factor_to_base: 1.0 },
    UnitDef { symbol: "km", name: "Kilometers", factor_to_base: 1000.0 },
    UnitDef { symbol: "cm", name: "Centimeters", factor_to_base: 0.01 },
    UnitDef { symbol: "mm", name: "Millimeters", factor_to_base: 0.001 },
    UnitDef { symbol: "in", name: "Inches", factor_to_base: 0.0254 },
    UnitDef { symbol: "ft", name: "Feet", factor_to_base: 0.3048 },
    UnitDef { symbol: "yd", name: "Yards", factor_to_base: 0.9144 },
    UnitDef { symbol: "mi", name: "Miles", factor_to_base: 1609.344 },
    UnitDef { symbol: "nmi", name: "Nautical Miles", factor_to_base: 1852.0 },
    UnitDef { symbol: "ly", name: "Light Years", factor_to_base: 9.461e15 },
    UnitDef { symbol: "AU", name: "Astronomical Units", factor_to_base: 1.496e11 },
    UnitDef { symbol: "pc", name: "Parsecs", factor_to_base: 3.086e16 },
];

// Weight (base: grams)
static WEIGHT_UNITS: &[UnitDef] = &[
    UnitDef { symbol: "g", name: "Grams", factor_to_base: 1.0 },
    UnitDef { symbol: "kg", name: "Kilograms", factor_to_base: 1000.0 },
    UnitDef { symbol: "mg", name: "Milligrams", factor_to_base: 0.001 },
    UnitDef { symbol: "µg", name: "Micrograms", factor_to_base: 0.000001 },
    UnitDef { symbol: "lb", name: "Pounds", factor_to_base: 453.59237 },
    UnitDef { symbol: "oz", name: "Ounces", factor_to_base: 28.349523125 },
    UnitDef { symbol: "US ton", name: "Tons (US)", factor_to_base: 907184.74 },
    UnitDef { symbol: "UK ton", name: "Tons (UK)", factor_to_base: 1016046.9088 },
    UnitDef { symbol: "t", name: "Metric Tons", factor_to_base: 1000000.0 },
    UnitDef { symbol: "st", name: "Stones", factor_to_base: 6350.29318 },
    UnitDef { symbol: "ct", name: "Carats", factor_to_base: 0.2 },
    UnitDef { symbol: "gr", name: "Grain", factor_to_base: 0.06479891 },
    UnitDef { symbol: "u", name: "Atomic Mass Unit", factor_to_base: 1.66053907e-24 },
    UnitDef { symbol: "M☉", name: "Solar Mass", factor_to_base: 1.989e33 },
    UnitDef { symbol: "M⊕", name: "Earth Mass", factor_to_base: 5.972e27 },
];

// Area (base: square meters)
static AREA_UNITS: &[UnitDef] = &[
    UnitDef { symbol: "m²", name: "Square Meters", factor_to_base: 1.0 },
    UnitDef { symbol: "km²", name: "Square Kilometers", factor_to_base: 1000000.0 },
    UnitDef { symbol: "cm²", name: "Square Centimeters", factor_to_base: 0.0001 },
    UnitDef { symbol: "mm²", name: "Square Millimeters", factor_to_base: 0.000001 },
    UnitDef { symbol: "ft²", name: "Square Feet", factor_to_base: 0.092903 },
    UnitDef { symbol: "yd²", name: "Square Yards", factor_to_base: 0.836127 },
    UnitDef { symbol: "in²", name: "Square Inches", factor_to_base: 0.00064516 },
    UnitDef { symbol: "mi²", name: "Square Miles", factor_to_base: 2589988.11 },
    UnitDef { symbol: "ac", name: "Acres", factor_to_base: 4046.86 },
    UnitDef { symbol: "ha", name: "Hectares", factor_to_base: 10000.0 },
    UnitDef { symbol: "nmi²", name: "Square Nautical Miles", factor_to_base: 3429904.0 },
    UnitDef { symbol: "AU²", name: "Square Astronomical Units", factor_to_base: 2.237e22 },
    UnitDef { symbol: "ly²", name: "Square Light Years", factor_to_base: 8.95e31 },
];

// Speed (base: meters per second)
static SPEED_UNITS: &[UnitDef] = &[
    UnitDef { symbol: "m/s", name: "Meters per Second", factor_to_base: 1.0 },
    UnitDef { symbol: "km/h", name: "Kilometers per Hour", factor_to_base: 0.277778 },
    UnitDef { symbol: "mph", name: "Miles per Hour", factor_to_base: 0.44704 },
    UnitDef { symbol: "kn", name: "Knots", factor_to_base: 0.514444 },
    UnitDef { symbol: "ft/s", name: "Feet per Second", factor_to_base: 0.3048 },
    UnitDef { symbol: "km/s", name: "Kilometers per Second", factor_to_base: 1000.0 },
    UnitDef { symbol: "cm/s", name: "Centimeters per Second", factor_to_base: 0.01 },
    UnitDef { symbol: "M", name: "Mach Number", factor_to_base: 343.0 },
    UnitDef { symbol: "c", name: "Speed of Light", factor_to_base: 299792458.0 },
    UnitDef { symbol: "vs", name: "Speed of Sound", factor_to_base: 343.0 },
    UnitDef { symbol: "yd/s", name: "Yards per Second", factor_to_base: 0.9144 },
    UnitDef { symbol: "in/s", name: "Inches per Second", factor_to_base: 0.0254 },
    UnitDef { symbol: "mi/s", name: "Miles per Second", factor_to_base: 1609.344 },
    UnitDef { symbol: "nmi/h", name: "Nautical Miles per Hour", factor_to_base: 0.514444 },
    UnitDef { symbol: "fur/ftn", name: "Furlongs per Fortnight", factor_to_base: 0.0001663095 },
    UnitDef { symbol: "beard-s", name: "Beard Seconds", factor_to_base: 5.08e-9 },
];

// Time (base: seconds)
static TIME_UNITS: &[UnitDef] = &[
    UnitDef { symbol: "s", name: "Seconds", factor_to_base: 1.0 },
    UnitDef { symbol: "min", name: "Minutes", factor_to_base: 60.0 },
    UnitDef { symbol: "h", name: "Hours", factor_to_base: 3600.0 },
    UnitDef { symbol: "d", name: "Days", factor_to_base: 86400.0 },
    UnitDef { symbol: "wk", name: "Weeks", factor_to_base: 604800.0 },
    UnitDef { symbol: "mo", name: "Months", factor_to_base: 2592000.0 },
    UnitDef { symbol: "yr", name: "Years", factor_to_base: 31536000.0 },
    UnitDef { symbol: "dec", name: "Decades", factor_to_base: 315360000.0 },
    UnitDef { symbol: "cent", name: "Centuries", factor_to_base: 3153600000.0 },
    UnitDef { symbol: "mill", name: "Millennia", factor_to_base: 31536000000.0 },
    UnitDef { symbol: "ms", name: "Milliseconds", factor_to_base: 0.001 },
    UnitDef { symbol: "μs", name: "Microseconds", factor_to_base: 0.000001 },
    UnitDef { symbol: "ns", name: "Nanoseconds", factor_to_base: 0.000000001 },
    UnitDef { symbol: "ps", name: "Picoseconds", factor_to_base: 0.000000000001 },
    UnitDef { symbol: "fs", name: "Femtoseconds", factor_to_base: 0.000000000000001 },
    UnitDef { symbol: "as", name: "Attoseconds", factor_to_base: 0.000000000000000001 },
    UnitDef { symbol: "tP", name: "Planck Time", factor_to_base: 5.39e-44 },
    UnitDef { symbol: "lunar", name: "Lunar Month", factor_to_base: 2551442.8 },
    UnitDef { symbol: "solar", name: "Solar Year", factor_to_base: 31556925.2 },
    UnitDef { symbol: "sidereal", name: "Sidereal Day", factor_to_base: 86164.1 },
    UnitDef { symbol: "julian", name: "Julian Year", factor_to_base: 31557600.0 },
];

// Data storage (base: bytes)
static DATA_UNITS: &[UnitDef] = &[
    UnitDef { symbol: "B", name: "Bytes", factor_to_base: 1.0 },
    UnitDef { symbol: "KB", name: "Kilobytes", factor_to_base: 1024.0 },
    UnitDef { symbol: "MB", name: "Megabytes", factor_to_base: 1048576.0 },
    UnitDef { symbol: "GB", name: "Gigabytes", factor_to_base: 1073741824.0 },
    UnitDef { symbol: "TB", name: "Terabytes", factor_to_base: 1099511627776.0 },
    UnitDef { symbol: "PB", name: "Petabytes", factor_to_base: 1125899906842624.0 },
    UnitDef { symbol: "EB", name: "Exabytes", factor_to_base: 1152921504606846976.0 },
    UnitDef { symbol: "ZB", name: "Zettabytes", factor_to_base: 1180591620717411303424.0 },
    UnitDef { symbol: "YB", name: "Yottabytes", factor_to_base: 1208925819614629174706176.0 },
    UnitDef { symbol: "KiB", name: "Kibibytes", factor_to_base: 1024.0 },
    UnitDef { symbol: "MiB", name: "Mebibytes", factor_to_base: 1048576.0 },
    UnitDef { symbol: "GiB", name: "Gibibytes", factor_to_base: 1073741824.0 },
    UnitDef { symbol: "TiB", name: "Tebibytes", factor_to_base: 1099511627776.0 },
    UnitDef { symbol: "PiB", name: "Pebibytes", factor_to_base: 1125899906842624.0 },
    UnitDef { symbol: "EiB", name: "Exbibytes", factor_to_base: 1152921504606846976.0 },
    UnitDef { symbol: "ZiB", name: "Zebibytes", factor_to_base: 1180591620717411303424.0 },
    UnitDef { symbol: "YiB", name: "Yobibytes", factor_to_base: 1208925819614629174706176.0 },
    UnitDef { symbol: "b", name: "Bits", factor_to_base: 0.125 },
    UnitDef { symbol: "Kb", name: "Kilobits", factor_to_base: 128.0 },
    UnitDef { symbol: "Mb", name: "Megabits", factor_to_base: 131072.0 },
    UnitDef { symbol: "Gb", name: "Gigabits", factor_to_base: 134217728.0 },
    UnitDef { symbol: "Tb", name: "Terabits", factor_to_base: 137438953472.0 },
    UnitDef { symbol: "Pb", name: "Petabits", factor_to_base: 140737488355328.0 },
    UnitDef { symbol: "word", name: "Words (32-bit)", factor_to_base: 4.0 },
    UnitDef { symbol: "word64", name: "Words (64-bit)", factor_to_base: 8.0 },
    UnitDef { symbol: "nibble", name: "Nibbles", factor_to_base: 0.5 },
];

// Display banding, tuned per domain. The length and data-storage ladders
// compare the signed value; the rest compare the absolute value.
static LENGTH_BANDS: FormatBands = FormatBands {
    signed: true,
    tiers: &[
        Tier::Fixed { below: 0.01, dp: 8, nonzero_only: false, positive_only: true },
        Tier::Fixed { below: 1.0, dp: 6, nonzero_only: false, positive_only: false },
        Tier::Grouped { at_least: 1000.0, max_dp: 2 },
    ],
    default_dp: 3,
};

static WEIGHT_BANDS: FormatBands = FormatBands {
    signed: false,
    tiers: &[
        Tier::Fixed { below: 0.001, dp: 8, nonzero_only: true, positive_only: false },
        Tier::Fixed { below: 1.0, dp: 6, nonzero_only: false, positive_only: false },
        Tier::Grouped { at_least: 1000000.0, max_dp: 1 },
        Tier::Grouped { at_least: 1000.0, max_dp: 2 },
    ],
    default_dp: 3,
};

static AREA_BANDS: FormatBands = FormatBands {
    signed: false,
    tiers: &[
        Tier::Fixed { below: 0.000001, dp: 12, nonzero_only: true, positive_only: false },
        Tier::Fixed { below: 0.001, dp: 9, nonzero_only: true, positive_only: false },
        Tier::Fixed { below: 1.0, dp: 6, nonzero_only: false, positive_only: false },
        Tier::Grouped { at_least: 1000000000.0, max_dp: 1 },
        Tier::Grouped { at_least: 1000000.0, max_dp: 2 },
        Tier::Grouped { at_least: 1000.0, max_dp: 2 },
    ],
    default_dp: 3,
};

static SPEED_BANDS: FormatBands = FormatBands {
    signed: false,
    tiers: &[
        Tier::Fixed { below: 0.000001, dp: 12, nonzero_only: true, positive_only: false },
        Tier::Fixed { below: 0.001, dp: 9, nonzero_only: true, positive_only: false },
        Tier::Fixed { below: 1.0, dp: 6, nonzero_only: false, positive_only: false },
        Tier::Grouped { at_least: 1000000000.0, max_dp: 1 },
        Tier::Grouped { at_least: 1000000.0, max_dp: 2 },
        Tier::Grouped { at_least: 1000.0, max_dp: 2 },
    ],
    default_dp: 3,
};

static TIME_BANDS: FormatBands = FormatBands {
    signed: false,
    tiers: &[
        Tier::Fixed { below: 0.000001, dp: 15, nonzero_only: true, positive_only: false },
        Tier::Fixed { below: 0.001, dp: 9, nonzero_only: true, positive_only: false },
        Tier::Fixed { below: 1.0, dp: 6, nonzero_only: false, positive_only: false },
        Tier::Grouped { at_least: 1000000000.0, max_dp: 1 },
        Tier::Grouped { at_least: 1000000.0, max_dp: 2 },
        Tier::Grouped { at_least: 1000.0, max_dp: 2 },
    ],
    default_dp: 3,
};

static DATA_BANDS: FormatBands = FormatBands {
    signed: true,
    tiers: &[
        Tier::Grouped { at_least: 1000000000000.0, max_dp: 2 },
        Tier::Grouped { at_least: 1000000000.0, max_dp: 3 },
        Tier::Grouped { at_least: 1000000.0, max_dp: 3 },
        Tier::Grouped { at_least: 1000.0, max_dp: 3 },
        Tier::Fixed { below: 1.0, dp: 6, nonzero_only: false, positive_only: false },
    ],
    default_dp: 3,
};

impl UnitDomain {
    pub fn all() -> [UnitDomain; 6] {
        [
            UnitDomain::Length,
            UnitDomain::Weight,
            UnitDomain::Area,
            UnitDomain::Speed,
            UnitDomain::Time,
            UnitDomain::DataStorage,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitDomain::Length => "length",
            UnitDomain::Weight => "weight",
            UnitDomain::Area => "area",
            UnitDomain::Speed => "speed",
            UnitDomain::Time => "time",
            UnitDomain::DataStorage => "data_storage",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UnitDomain::Length => "Length",
            UnitDomain::Weight => "Weight",
            UnitDomain::Area => "Area",
            UnitDomain::Speed => "Speed",
            UnitDomain::Time => "Time",
            UnitDomain::DataStorage => "Data Storage",
        }
    }

    pub fn units(&self) -> &'static [UnitDef] {
        match self {
            UnitDomain::Length => LENGTH_UNITS,
            UnitDomain::Weight => WEIGHT_UNITS,
            UnitDomain::Area => AREA_UNITS,
            UnitDomain::Speed => SPEED_UNITS,
            UnitDomain::Time => TIME_UNITS,
            UnitDomain::DataStorage => DATA_UNITS,
        }
    }

    pub fn bands(&self) -> &'static FormatBands {
        match self {
            UnitDomain::Length => &LENGTH_BANDS,
            UnitDomain::Weight => &WEIGHT_BANDS,
            UnitDomain::Area => &AREA_BANDS,
            UnitDomain::Speed => &SPEED_BANDS,
            UnitDomain::Time => &TIME_BANDS,
            UnitDomain::DataStorage => &DATA_BANDS,
        }
    }
}

/// Symbol index across every linear domain, initialized once. Symbols are
/// globally unique, so the flat map is unambiguous.
static SYMBOL_INDEX: Lazy<HashMap<&'static str, (UnitDomain, &'static UnitDef)>> =
    Lazy::new(|| {
        let mut index = HashMap::new();
        for domain in UnitDomain::all() {
            for unit in domain.units() {
                index.insert(unit.symbol, (domain, unit));
            }
        }
        index
    });

/// Locate a unit symbol across all linear domains
pub fn domain_of(symbol: &str) -> Option<(UnitDomain, &'static UnitDef)> {
    SYMBOL_INDEX.get(symbol).copied()
}

fn find_unit(domain: UnitDomain, symbol: &str) -> AppResult<&'static UnitDef> {
    domain
        .units()
        .iter()
        .find(|u| u.symbol == symbol)
        .ok_or_else(|| AppError::UnknownUnit(symbol.to_string()))
}

/// Parse a live input field. Empty or non-numeric input is a distinct
/// "no result" state, never zero.
pub fn parse_value(input: &str) -> AppResult<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidNumericInput("empty input".to_string()));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| AppError::InvalidNumericInput(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(AppError::InvalidNumericInput(trimmed.to_string()));
    }
    Ok(value)
}

/// Convert a value between two units of one domain via the base unit
pub fn convert(value: f64, from_symbol: &str, to_symbol: &str, domain: UnitDomain) -> AppResult<f64> {
    if from_symbol == to_symbol {
        return Ok(value);
    }
    let from = find_unit(domain, from_symbol)?;
    let to = find_unit(domain, to_symbol)?;
    let base = value * from.factor_to_base;
    Ok(base / to.factor_to_base)
}

/// Convert a live input against every unit in the domain.
///
/// The active unit's entry echoes the raw input; all others carry the
/// domain's banded formatting. Invalid input fails the whole group.
pub fn convert_group(
    input: &str,
    from_symbol: &str,
    domain: UnitDomain,
) -> AppResult<ConvertGroupResponse> {
    let value = parse_value(input)?;
    let from = find_unit(domain, from_symbol)?;
    let base = value * from.factor_to_base;
    let bands = domain.bands();

    let mut values = BTreeMap::new();
    for unit in domain.units() {
        if unit.symbol == from_symbol {
            values.insert(unit.symbol.to_string(), input.to_string());
        } else {
            let converted = base / unit.factor_to_base;
            values.insert(unit.symbol.to_string(), bands.format(converted));
        }
    }
    Ok(ConvertGroupResponse { values })
}

/// Single-pair conversion with formatted output (the widget request path)
pub fn convert_units(request: &ConvertUnitsRequest) -> AppResult<ConvertUnitsResponse> {
    let (domain, _) = domain_of(&request.from_unit)
        .ok_or_else(|| AppError::UnknownUnit(request.from_unit.clone()))?;
    let result = convert(request.amount, &request.from_unit, &request.to_unit, domain)?;
    Ok(ConvertUnitsResponse {
        result,
        formatted_result: domain.bands().format(result),
        from_unit: request.from_unit.clone(),
        to_unit: request.to_unit.clone(),
    })
}

/// Every unit across all linear domains, sorted for frontend pickers
pub fn all_units() -> GetUnitsResponse {
    let mut units: Vec<UnitDto> = UnitDomain::all()
        .iter()
        .flat_map(|domain| {
            domain.units().iter().map(|unit| UnitDto {
                id: unit.symbol.to_string(),
                label: unit.name.to_string(),
                category: domain.as_str().to_string(),
            })
        })
        .collect();
    units.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.label.cmp(&b.label)));
    GetUnitsResponse { units }
}

fn command_id_for(symbol: &str) -> String {
    let slug: String = symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("convert_to_{}", slug)
}

#[derive(Clone)]
pub struct UnitConverterFeature;

impl Feature for UnitConverterFeature {
    fn id(&self) -> &'static str {
        "unit_converter"
    }

    fn widget_commands(&self) -> Vec<CommandItem> {
        UnitDomain::all()
            .iter()
            .map(|domain| CommandItem {
                id: format!("widget_{}_converter", domain.as_str()),
                label: format!("{} Converter", domain.display_name()),
                description: Some(format!(
                    "Convert between {} units",
                    domain.display_name().to_lowercase()
                )),
                action_type: None,
                widget_type: Some(format!("{}_converter", domain.as_str())),
            })
            .collect()
    }

    fn action_commands(&self) -> Vec<CommandItem> {
        UnitDomain::all()
            .iter()
            .flat_map(|domain| domain.units())
            .map(|unit| CommandItem {
                id: command_id_for(unit.symbol),
                label: format!("Convert to {}", unit.name),
                description: None,
                action_type: Some(ActionType::ConvertUnit {
                    target: unit.symbol.to_string(),
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
            ActionType::ConvertUnit { target } => target,
            _ => return unsupported(),
        };

        let (domain, to_unit) = domain_of(target)
            .ok_or_else(|| AppError::UnknownUnit(target.clone()))?;

        let from_symbol = params
            .get("from")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::InvalidNumericInput("Missing 'from' parameter".to_string()))?;
        let amount = read_amount(params)?;

        if domain_of(from_symbol).map(|(d, _)| d) != Some(domain) {
            return Err(AppError::Calculation(format!(
                "Cannot convert from {} to {} (incompatible categories)",
                from_symbol, target
            )));
        }

        let converted = convert(amount, from_symbol, target, domain)?;
        let formatted = domain.bands().format(converted);

        Ok(ExecuteActionResponse {
            result: format!("{} {}", formatted, to_unit.symbol),
            metadata: Some(json!({
                "from_unit": from_symbol,
                "target_unit": target,
                "original_amount": amount,
                "converted_amount": converted,
                "widget": format!("{}_converter", domain.as_str()),
            })),
        })
    }
}

/// Accept the amount either as a JSON number or as the live input string
pub(crate) fn read_amount(params: &serde_json::Value) -> AppResult<f64> {
    match params.get("value") {
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| AppError::InvalidNumericInput(n.to_string())),
        Some(serde_json::Value::String(s)) => parse_value(s),
        _ => Err(AppError::InvalidNumericInput(
            "Missing 'value' parameter".to_string(),
        )),
    }
}
