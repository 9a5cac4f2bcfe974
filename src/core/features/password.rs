//! Password generator
//!
//! Builds a charset as the union of the enabled character classes, minus
//! the similar-looking and ambiguous sets when requested, guarantees one
//! character per enabled class (when the length permits), fills the rest
//! uniformly, then shuffles so the guaranteed positions carry no signal.
//! Strength scoring is a separate pure function over the generated string.

use crate::core::features::{unsupported, Feature};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ActionType, CommandItem, ExecuteActionResponse};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use ts_rs::TS;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

const SIMILAR: &str = "il1Lo0O";
const AMBIGUOUS: &str = "{}[]()/\\'\"`~,;:.<>";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct PasswordOptions {
    pub length: usize,
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
    pub exclude_similar: bool,
    pub exclude_ambiguous: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        PasswordOptions {
            length: 16,
            include_uppercase: true,
            include_lowercase: true,
            include_numbers: true,
            include_symbols: true,
            exclude_similar: false,
            exclude_ambiguous: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::VeryWeak => "Very Weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Fair => "Fair",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::VeryStrong => "Very Strong",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Strength {
    pub score: u8,
    pub label: StrengthLabel,
}

fn build_charset(options: &PasswordOptions) -> Vec<char> {
    let mut charset = String::new();
    if options.include_lowercase {
        charset.push_str(LOWERCASE);
    }
    if options.include_uppercase {
        charset.push_str(UPPERCASE);
    }
    if options.include_numbers {
        charset.push_str(NUMBERS);
    }
    if options.include_symbols {
        charset.push_str(SYMBOLS);
    }

    charset
        .chars()
        .filter(|c| !(options.exclude_similar && SIMILAR.contains(*c)))
        .filter(|c| !(options.exclude_ambiguous && AMBIGUOUS.contains(*c)))
        .collect()
}

/// Generate a password for the given options.
///
/// Fails with `EmptyCharset` when every class is disabled (or the
/// exclusions empty the set). When `length` is smaller than the number of
/// enabled classes the per-class guarantee degrades to truncation.
pub fn generate(options: &PasswordOptions) -> AppResult<String> {
    let charset = build_charset(options);
    if charset.is_empty() {
        return Err(AppError::EmptyCharset);
    }

    let mut rng = rand::thread_rng();

    // One guaranteed character per enabled class, taken from the filtered
    // charset so exclusions are honored
    let mut password: Vec<char> = Vec::with_capacity(options.length);
    let classes: [(bool, fn(char) -> bool); 4] = [
        (options.include_lowercase, |c| c.is_ascii_lowercase()),
        (options.include_uppercase, |c| c.is_ascii_uppercase()),
        (options.include_numbers, |c| c.is_ascii_digit()),
        (options.include_symbols, |c| SYMBOLS.contains(c)),
    ];
    for (enabled, is_class) in classes {
        if enabled {
            if let Some(c) = charset.iter().copied().find(|c| is_class(*c)) {
                password.push(c);
            }
        }
    }

    let remaining = options.length.saturating_sub(password.len());
    for _ in 0..remaining {
        let index = rng.gen_range(0..charset.len());
        password.push(charset[index]);
    }

    // Shuffle so the guaranteed characters are not positionally obvious
    password.shuffle(&mut rng);
    password.truncate(options.length);

    Ok(password.into_iter().collect())
}

fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

fn has_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();
    ["123", "abc", "qwe", "asd", "zxc"]
        .iter()
        .any(|p| lower.contains(p))
}

/// Score a password 0..=10 and map it to a discrete label
pub fn strength(password: &str) -> Strength {
    let mut score: i32 = 0;

    // Length scoring
    if password.len() >= 8 {
        score += 1;
    }
    if password.len() >= 12 {
        score += 1;
    }
    if password.len() >= 16 {
        score += 1;
    }
    if password.len() >= 20 {
        score += 1;
    }

    // Character variety scoring
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());
    score += [has_lower, has_upper, has_digit, has_symbol]
        .iter()
        .filter(|b| **b)
        .count() as i32;

    // Bonus for mixed case and letters-plus-numbers
    if has_lower && has_upper {
        score += 1;
    }
    if (has_lower || has_upper) && has_digit {
        score += 1;
    }

    // Penalty for patterns
    if has_repeated_run(password) {
        score -= 1;
    }
    if has_common_pattern(password) {
        score -= 1;
    }

    let score = score.clamp(0, 10) as u8;
    let label = match score {
        0..=2 => StrengthLabel::VeryWeak,
        3..=4 => StrengthLabel::Weak,
        5..=6 => StrengthLabel::Fair,
        7..=8 => StrengthLabel::Strong,
        _ => StrengthLabel::VeryStrong,
    };
    Strength { score, label }
}

#[derive(Clone)]
pub struct PasswordFeature;

impl Feature for PasswordFeature {
    fn id(&self) -> &'static str {
        "password_generator"
    }

    fn widget_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "widget_password_generator".to_string(),
            label: "Password Generator".to_string(),
            description: Some("Generate secure passwords".to_string()),
            action_type: None,
            widget_type: Some("password_generator".to_string()),
        }]
    }

    fn action_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "generate_password".to_string(),
            label: "Generate a password".to_string(),
            description: None,
            action_type: Some(ActionType::GeneratePassword),
            widget_type: None,
        }]
    }

    fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        if *action != ActionType::GeneratePassword {
            return unsupported();
        }
        let options: PasswordOptions = if params.is_object() {
            serde_json::from_value(params.clone())?
        } else {
            PasswordOptions::default()
        };
        let password = generate(&options)?;
        let strength = strength(&password);
        Ok(ExecuteActionResponse {
            result: password,
            metadata: Some(json!({
                "score": strength.score,
                "label": strength.label.as_str(),
                "widget": "password_generator",
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(lower: bool, upper: bool, numbers: bool, symbols: bool) -> PasswordOptions {
        PasswordOptions {
            length: 12,
            include_lowercase: lower,
            include_uppercase: upper,
            include_numbers: numbers,
            include_symbols: symbols,
            exclude_similar: false,
            exclude_ambiguous: false,
        }
    }

    #[test]
    fn default_options_produce_full_variety() {
        let password = generate(&PasswordOptions::default()).unwrap();
        assert_eq!(password.len(), 16);
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert!(password.chars().any(|c| SYMBOLS.contains(c)));
    }

    #[test]
    fn every_enabled_class_appears_for_all_combinations() {
        for bits in 1u8..16 {
            let opts = options(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let password = generate(&opts).unwrap();
            assert_eq!(password.len(), 12);
            if opts.include_lowercase {
                assert!(password.chars().any(|c| c.is_ascii_lowercase()), "{:04b}", bits);
            }
            if opts.include_uppercase {
                assert!(password.chars().any(|c| c.is_ascii_uppercase()), "{:04b}", bits);
            }
            if opts.include_numbers {
                assert!(password.chars().any(|c| c.is_ascii_digit()), "{:04b}", bits);
            }
            if opts.include_symbols {
                assert!(password.chars().any(|c| SYMBOLS.contains(c)), "{:04b}", bits);
            }
        }
    }

    #[test]
    fn all_classes_disabled_is_empty_charset() {
        let opts = options(false, false, false, false);
        assert!(matches!(generate(&opts), Err(AppError::EmptyCharset)));
    }

    #[test]
    fn similar_characters_are_excluded() {
        let opts = PasswordOptions {
            length: 64,
            exclude_similar: true,
            ..PasswordOptions::default()
        };
        let password = generate(&opts).unwrap();
        assert!(!password.chars().any(|c| SIMILAR.contains(c)));
    }

    #[test]
    fn ambiguous_characters_are_excluded() {
        let opts = PasswordOptions {
            length: 64,
            exclude_ambiguous: true,
            ..PasswordOptions::default()
        };
        let password = generate(&opts).unwrap();
        assert!(!password.chars().any(|c| AMBIGUOUS.contains(c)));
    }

    #[test]
    fn short_length_truncates_after_shuffle() {
        let opts = PasswordOptions {
            length: 2,
            ..PasswordOptions::default()
        };
        let password = generate(&opts).unwrap();
        assert_eq!(password.len(), 2);
    }

    #[test]
    fn strength_scoring_matches_rules() {
        assert_eq!(strength("abc").label, StrengthLabel::VeryWeak);
        // 8 chars, lower + digit + letters-with-numbers, minus a run penalty
        let weak = strength("aaaa1111");
        assert_eq!(weak.score, 3);
        assert_eq!(weak.label, StrengthLabel::Weak);
        // 16 chars, all classes, no patterns
        let strong = strength("Tr0ub4dor&9xKplE");
        assert_eq!(strong.score, 9);
        assert_eq!(strong.label, StrengthLabel::VeryStrong);
    }

    #[test]
    fn strength_penalizes_repeated_runs_and_patterns() {
        assert!(has_repeated_run("xxAAAzz"));
        assert!(!has_repeated_run("xxAAzz"));
        assert!(has_common_pattern("myQWErty"));
        assert!(!has_common_pattern("t9$Kp"));
    }
}
