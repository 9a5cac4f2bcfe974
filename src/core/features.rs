//! Feature plugin system with enum dispatch
//!
//! Uses enum_dispatch for zero-cost abstraction and static dispatch.
//! Every calculator page is one feature; the registry is the whole
//! in-process API surface the frontend talks to. Execution is synchronous
//! because every feature is a pure computation.

use crate::shared::error::{AppError, AppResult, ERR_UNSUPPORTED_ACTION};
use crate::shared::types::{ActionType, CommandItem, ExecuteActionRequest, ExecuteActionResponse};
use enum_dispatch::enum_dispatch;
use std::sync::OnceLock;

pub mod age_date;
pub mod bmi;
pub mod ethiopian_calendar;
pub mod password;
pub mod salary_tax;
pub mod shoe_size;
pub mod temperature;
pub mod unit_converter;
pub mod uuid_gen;

#[enum_dispatch]
pub trait Feature: Send + Sync {
    /// Unique identifier for this feature
    fn id(&self) -> &'static str;

    /// Widget commands open the feature's page.
    fn widget_commands(&self) -> Vec<CommandItem>;

    /// Action commands perform an immediate computation without opening a
    /// page.
    fn action_commands(&self) -> Vec<CommandItem>;

    /// Execute an action for this feature.
    ///
    /// Returns `AppError::Unknown(ERR_UNSUPPORTED_ACTION)` when the action
    /// belongs to another feature, so the registry walk can continue.
    fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse>;
}

#[enum_dispatch(Feature)]
pub enum AppFeature {
    UnitConverter(unit_converter::UnitConverterFeature),
    Temperature(temperature::TemperatureFeature),
    ShoeSize(shoe_size::ShoeSizeFeature),
    EthiopianCalendar(ethiopian_calendar::EthiopianCalendarFeature),
    SalaryTax(salary_tax::SalaryTaxFeature),
    Bmi(bmi::BmiFeature),
    AgeDate(age_date::AgeDateFeature),
    Password(password::PasswordFeature),
    UuidGen(uuid_gen::UuidGeneratorFeature),
}

impl AppFeature {
    pub fn all() -> Vec<Self> {
        vec![
            AppFeature::UnitConverter(unit_converter::UnitConverterFeature),
            AppFeature::Temperature(temperature::TemperatureFeature),
            AppFeature::ShoeSize(shoe_size::ShoeSizeFeature),
            AppFeature::EthiopianCalendar(ethiopian_calendar::EthiopianCalendarFeature),
            AppFeature::SalaryTax(salary_tax::SalaryTaxFeature),
            AppFeature::Bmi(bmi::BmiFeature),
            AppFeature::AgeDate(age_date::AgeDateFeature),
            AppFeature::Password(password::PasswordFeature),
            AppFeature::UuidGen(uuid_gen::UuidGeneratorFeature),
        ]
    }
}

/// Cached base command items; the command list structure never changes at
/// runtime, so building it once is enough.
static BASE_COMMAND_ITEMS: OnceLock<Vec<CommandItem>> = OnceLock::new();

fn get_base_command_items() -> &'static Vec<CommandItem> {
    BASE_COMMAND_ITEMS.get_or_init(|| {
        let mut items = vec![];
        for feature in AppFeature::all() {
            items.extend(feature.widget_commands());
            items.extend(feature.action_commands());
        }
        items
    })
}

/// Get all command items from all features
pub fn get_all_command_items() -> Vec<CommandItem> {
    get_base_command_items().clone()
}

/// Execute an action across all features
pub fn execute_feature_action(
    request: &ExecuteActionRequest,
) -> AppResult<ExecuteActionResponse> {
    for feature in AppFeature::all() {
        match feature.execute_action(&request.action_type, &request.params) {
            Ok(response) => return Ok(response),
            // "Not my action" keeps the walk going; a real failure from the
            // owning feature stops it.
            Err(AppError::Unknown(msg)) if msg == ERR_UNSUPPORTED_ACTION => continue,
            Err(e) => return Err(e),
        }
    }
    Err(AppError::Unknown("Unknown action type".to_string()))
}

/// Shorthand used by features for actions they do not own
pub(crate) fn unsupported<T>() -> AppResult<T> {
    Err(AppError::Unknown(ERR_UNSUPPORTED_ACTION.to_string()))
}
