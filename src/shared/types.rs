use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Single-pair conversion request (the "convert A to B" palette path)
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConvertUnitsRequest {
    pub amount: f64,
    pub from_unit: String,
    pub to_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConvertUnitsResponse {
    pub result: f64,
    pub formatted_result: String,
    pub from_unit: String,
    pub to_unit: String,
}

/// Live group conversion: one input field drives every other unit in the
/// domain. `values` maps unit symbol to display string; the active unit
/// echoes the raw input.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConvertGroupResponse {
    pub values: std::collections::BTreeMap<String, String>,
}

// Rich unit data transfer object for frontend pickers
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UnitDto {
    pub id: String,       // Unit symbol (e.g., "m", "kg")
    pub label: String,    // Display name (e.g., "Meters", "Kilograms")
    pub category: String, // Domain (e.g., "length", "weight")
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GetUnitsResponse {
    pub units: Vec<UnitDto>,
}

// Action types for the command palette and widget actions
// Adjacently tagged for frontend compatibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload")]
#[ts(export)]
pub enum ActionType {
    /// Convert the supplied value to `target`, any linear domain
    ConvertUnit { target: String },
    /// Temperature scale conversion (function pairs, not scalar factors)
    ConvertTemperature { target: String },
    /// Shoe sizing system conversion
    ConvertShoeSize { target: String },
    /// Monthly gross income to tax/pension/net breakdown
    ComputeTax,
    /// Recover monthly gross income from a net figure
    GrossFromNet,
    /// Gregorian date to Ethiopian date
    ToEthiopian,
    /// Ethiopian date to Gregorian date
    ToGregorian,
    /// Age between two Gregorian dates
    CalculateAge,
    /// Body mass index and related metrics
    CalculateBmi,
    /// Generate a password from PasswordOptions params
    GeneratePassword,
    /// Generate one or more UUIDs
    GenerateUuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommandItem {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub action_type: Option<ActionType>,
    pub widget_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExecuteActionRequest {
    pub action_type: ActionType,
    #[ts(type = "any")]
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExecuteActionResponse {
    pub result: String,
    #[ts(type = "any")]
    pub metadata: Option<serde_json::Value>,
}
