//! Utility Hub core library.
//!
//! Pure computation layer behind the Utility Hub frontend: table-driven unit
//! converters, the Ethiopian/Gregorian calendar converter, the Ethiopian
//! salary tax engine, BMI and age calculators, and the password/UUID
//! generators. Every function here is synchronous and side-effect free; the
//! UI layer owns input state, re-rendering, and clipboard access.

pub mod core;
pub mod shared;

pub use crate::core::features::ethiopian_calendar::{
    ethiopian_to_gregorian, format_ethiopian_date, gregorian_to_ethiopian, EthiopianDate,
};
pub use crate::core::features::salary_tax::{compute_tax, gross_from_net, TaxBracket, TaxBreakdown};
pub use crate::core::features::unit_converter::{convert, convert_group, convert_units, UnitDomain};
pub use crate::core::features::{execute_feature_action, AppFeature, Feature};
pub use crate::shared::error::{AppError, AppResult};
