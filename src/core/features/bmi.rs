//! Body metrics calculator
//!
//! BMI with the WHO category bands, body fat estimation via the U.S. Navy
//! circumference method, Robinson ideal weight, and DuBois body surface
//! area. Heights are centimeters, weights kilograms.

use crate::core::features::{unsupported, Feature};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ActionType, CommandItem, ExecuteActionResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct BmiCategory {
    pub range: &'static str,
    pub category: &'static str,
    pub risk: &'static str,
}

static BMI_CATEGORIES: [BmiCategory; 6] = [
    BmiCategory { range: "< 18.5", category: "Underweight", risk: "Low" },
    BmiCategory { range: "18.5 - 24.9", category: "Normal Weight", risk: "Low" },
    BmiCategory { range: "25.0 - 29.9", category: "Overweight", risk: "Moderate" },
    BmiCategory { range: "30.0 - 34.9", category: "Obesity Class I", risk: "High" },
    BmiCategory { range: "35.0 - 39.9", category: "Obesity Class II", risk: "Very High" },
    BmiCategory { range: "≥ 40.0", category: "Obesity Class III", risk: "Extremely High" },
];

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct BodyFatCategory {
    pub range: &'static str,
    pub category: &'static str,
}

static BODY_FAT_CATEGORIES_MALE: [BodyFatCategory; 6] = [
    BodyFatCategory { range: "2-5%", category: "Essential Fat" },
    BodyFatCategory { range: "6-13%", category: "Athletes" },
    BodyFatCategory { range: "14-17%", category: "Fitness" },
    BodyFatCategory { range: "18-24%", category: "Average" },
    BodyFatCategory { range: "25-31%", category: "Above Average" },
    BodyFatCategory { range: "32%+", category: "Obese" },
];

static BODY_FAT_CATEGORIES_FEMALE: [BodyFatCategory; 6] = [
    BodyFatCategory { range: "10-13%", category: "Essential Fat" },
    BodyFatCategory { range: "14-20%", category: "Athletes" },
    BodyFatCategory { range: "21-24%", category: "Fitness" },
    BodyFatCategory { range: "25-31%", category: "Average" },
    BodyFatCategory { range: "32-38%", category: "Above Average" },
    BodyFatCategory { range: "39%+", category: "Obese" },
];

/// Body mass index from weight (kg) and height (cm)
pub fn bmi(weight_kg: f64, height_cm: f64) -> AppResult<f64> {
    if height_cm <= 0.0 {
        return Err(AppError::Calculation("height must be positive".to_string()));
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

pub fn bmi_category(bmi: f64) -> &'static BmiCategory {
    if bmi < 18.5 {
        &BMI_CATEGORIES[0]
    } else if bmi < 25.0 {
        &BMI_CATEGORIES[1]
    } else if bmi < 30.0 {
        &BMI_CATEGORIES[2]
    } else if bmi < 35.0 {
        &BMI_CATEGORIES[3]
    } else if bmi < 40.0 {
        &BMI_CATEGORIES[4]
    } else {
        &BMI_CATEGORIES[5]
    }
}

/// Body fat percentage via the U.S. Navy circumference method.
///
/// Circumferences are centimeters; `hip_cm` only participates in the
/// female formula. The result is clamped at 0.
pub fn body_fat_percentage(
    gender: Gender,
    height_cm: f64,
    neck_cm: f64,
    waist_cm: f64,
    hip_cm: f64,
) -> AppResult<f64> {
    if height_cm <= 0.0 {
        return Err(AppError::Calculation("height must be positive".to_string()));
    }
    let body_fat = match gender {
        Gender::Male => {
            let girth = waist_cm - neck_cm;
            if girth <= 0.0 {
                return Err(AppError::Calculation(
                    "waist must exceed neck circumference".to_string(),
                ));
            }
            495.0 / (1.0324 - 0.19077 * girth.log10() + 0.15456 * height_cm.log10()) - 450.0
        }
        Gender::Female => {
            let girth = waist_cm + hip_cm - neck_cm;
            if girth <= 0.0 {
                return Err(AppError::Calculation(
                    "waist plus hip must exceed neck circumference".to_string(),
                ));
            }
            495.0 / (1.29579 - 0.35004 * girth.log10() + 0.221 * height_cm.log10()) - 450.0
        }
    };
    Ok(body_fat.max(0.0))
}

pub fn body_fat_category(gender: Gender, body_fat: f64) -> &'static BodyFatCategory {
    match gender {
        Gender::Male => {
            let categories = &BODY_FAT_CATEGORIES_MALE;
            if body_fat <= 5.0 {
                &categories[0]
            } else if body_fat <= 13.0 {
                &categories[1]
            } else if body_fat <= 17.0 {
                &categories[2]
            } else if body_fat <= 24.0 {
                &categories[3]
            } else if body_fat <= 31.0 {
                &categories[4]
            } else {
                &categories[5]
            }
        }
        Gender::Female => {
            let categories = &BODY_FAT_CATEGORIES_FEMALE;
            if body_fat <= 13.0 {
                &categories[0]
            } else if body_fat <= 20.0 {
                &categories[1]
            } else if body_fat <= 24.0 {
                &categories[2]
            } else if body_fat <= 31.0 {
                &categories[3]
            } else if body_fat <= 38.0 {
                &categories[4]
            } else {
                &categories[5]
            }
        }
    }
}

/// Robinson formula ideal weight (kg) from height (cm)
pub fn ideal_weight(gender: Gender, height_cm: f64) -> f64 {
    let height_in = height_cm / 2.54;
    let feet = (height_in / 12.0).floor();
    let remaining_in = height_in % 12.0;
    match gender {
        Gender::Male => 52.0 + 1.9 * (feet - 5.0) + 2.3 * remaining_in,
        Gender::Female => 49.0 + 1.7 * (feet - 5.0) + 2.2 * remaining_in,
    }
}

/// DuBois body surface area (m²)
pub fn body_surface_area(weight_kg: f64, height_cm: f64) -> f64 {
    0.007184 * weight_kg.powf(0.425) * height_cm.powf(0.725)
}

#[derive(Clone)]
pub struct BmiFeature;

impl Feature for BmiFeature {
    fn id(&self) -> &'static str {
        "bmi_calculator"
    }

    fn widget_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "widget_bmi_calculator".to_string(),
            label: "BMI Calculator".to_string(),
            description: Some("Body mass index, body fat, and ideal weight".to_string()),
            action_type: None,
            widget_type: Some("bmi_calculator".to_string()),
        }]
    }

    fn action_commands(&self) -> Vec<CommandItem> {
        vec![]
    }

    fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        if *action != ActionType::CalculateBmi {
            return unsupported();
        }
        let weight = params
            .get("weight_kg")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| {
                AppError::InvalidNumericInput("Missing 'weight_kg' parameter".to_string())
            })?;
        let height = params
            .get("height_cm")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| {
                AppError::InvalidNumericInput("Missing 'height_cm' parameter".to_string())
            })?;

        let value = bmi(weight, height)?;
        let category = bmi_category(value);
        Ok(ExecuteActionResponse {
            result: format!("{:.1} ({})", value, category.category),
            metadata: Some(json!({
                "bmi": value,
                "category": category.category,
                "risk": category.risk,
                "body_surface_area": body_surface_area(weight, height),
                "widget": "bmi_calculator",
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_from_metric_inputs() {
        // 70 kg at 170 cm: 70 / 1.7² ≈ 24.22
        let value = bmi(70.0, 170.0).unwrap();
        assert!((value - 24.221453287).abs() < 1e-6);
        assert_eq!(bmi_category(value).category, "Normal Weight");
    }

    #[test]
    fn category_edges() {
        assert_eq!(bmi_category(18.4).category, "Underweight");
        assert_eq!(bmi_category(18.5).category, "Normal Weight");
        assert_eq!(bmi_category(25.0).category, "Overweight");
        assert_eq!(bmi_category(30.0).category, "Obesity Class I");
        assert_eq!(bmi_category(35.0).category, "Obesity Class II");
        assert_eq!(bmi_category(40.0).category, "Obesity Class III");
    }

    #[test]
    fn zero_height_is_an_error() {
        assert!(bmi(70.0, 0.0).is_err());
    }

    #[test]
    fn navy_body_fat_is_clamped_and_guarded() {
        let bf = body_fat_percentage(Gender::Male, 180.0, 38.0, 85.0, 0.0).unwrap();
        assert!(bf > 0.0 && bf < 40.0);

        // Waist below neck would feed log10 a non-positive value
        assert!(body_fat_percentage(Gender::Male, 180.0, 40.0, 35.0, 0.0).is_err());

        let bf = body_fat_percentage(Gender::Female, 165.0, 33.0, 75.0, 95.0).unwrap();
        assert!(bf > 0.0 && bf < 50.0);
    }

    #[test]
    fn body_fat_categories_per_gender() {
        assert_eq!(body_fat_category(Gender::Male, 15.0).category, "Fitness");
        assert_eq!(body_fat_category(Gender::Female, 15.0).category, "Athletes");
        assert_eq!(body_fat_category(Gender::Male, 45.0).category, "Obese");
    }

    #[test]
    fn robinson_ideal_weight() {
        // 177.8 cm = 70 in = 5 ft 10 in
        let male = ideal_weight(Gender::Male, 177.8);
        assert!((male - 75.0).abs() < 1e-9);
        let female = ideal_weight(Gender::Female, 177.8);
        assert!((female - 71.0).abs() < 1e-9);
    }

    #[test]
    fn dubois_body_surface_area() {
        let bsa = body_surface_area(70.0, 170.0);
        assert!((bsa - 1.809708).abs() < 1e-3);
    }
}
