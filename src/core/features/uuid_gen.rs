//! UUID generator
//!
//! Supports the nil UUID, time-based v1, name-based v3 (MD5) and v5
//! (SHA-1), and random v4. Version dispatch is a tagged variant rather
//! than string comparison; the namespace for name-based generation must
//! match the canonical 8-4-4-4-12 grammar before anything is hashed.

use crate::core::features::{unsupported, Feature};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ActionType, CommandItem, ExecuteActionResponse};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use ts_rs::TS;
use uuid::Uuid;

/// Canonical 8-4-4-4-12 hex-with-hyphens grammar
static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("Failed to compile UUID pattern")
});

/// Predefined namespaces for quick selection
pub const PREDEFINED_NAMESPACES: [(&str, &str); 4] = [
    ("DNS", "6ba7b810-9dad-11d1-80b4-00c04fd430c8"),
    ("URL", "6ba7b811-9dad-11d1-80b4-00c04fd430c8"),
    ("OID", "6ba7b812-9dad-11d1-80b4-00c04fd430c8"),
    ("X.500", "6ba7b814-9dad-11d1-80b4-00c04fd430c8"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NameAlgo {
    Md5,
    Sha1,
}

/// Which kind of UUID to produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload")]
#[ts(export)]
pub enum UuidRequestKind {
    Nil,
    Time,
    Name { algo: NameAlgo, namespace: String },
    Random,
}

pub fn is_valid_uuid(input: &str) -> bool {
    !input.is_empty() && UUID_PATTERN.is_match(input)
}

fn parse_namespace(namespace: &str) -> AppResult<Uuid> {
    if !is_valid_uuid(namespace) {
        return Err(AppError::InvalidNamespace(namespace.to_string()));
    }
    Uuid::parse_str(namespace).map_err(|_| AppError::InvalidNamespace(namespace.to_string()))
}

/// Deterministic name-based generation: the same `(name, namespace)` pair
/// always yields the same UUID.
pub fn name_based(algo: NameAlgo, namespace: &str, name: &str) -> AppResult<String> {
    let namespace = parse_namespace(namespace)?;
    let uuid = match algo {
        NameAlgo::Md5 => Uuid::new_v3(&namespace, name.as_bytes()),
        NameAlgo::Sha1 => Uuid::new_v5(&namespace, name.as_bytes()),
    };
    Ok(uuid.to_string())
}

/// Generate `count` UUIDs of the requested kind.
///
/// An invalid namespace fails name-based generation only; nil, time-based,
/// and random kinds never look at it.
pub fn generate(kind: &UuidRequestKind, count: usize) -> AppResult<Vec<String>> {
    let mut rng = rand::thread_rng();
    match kind {
        UuidRequestKind::Nil => Ok(vec![Uuid::nil().to_string(); count]),
        UuidRequestKind::Time => {
            let node_id: [u8; 6] = rng.gen();
            Ok((0..count).map(|_| Uuid::now_v1(&node_id).to_string()).collect())
        }
        UuidRequestKind::Random => Ok((0..count).map(|_| Uuid::new_v4().to_string()).collect()),
        UuidRequestKind::Name { algo, namespace } => {
            // Validate once before generating anything
            parse_namespace(namespace)?;
            let salt = chrono::Utc::now().timestamp_millis();
            (0..count)
                .map(|i| name_based(*algo, namespace, &format!("uuid-{}-{}", i, salt)))
                .collect()
        }
    }
}

#[derive(Clone)]
pub struct UuidGeneratorFeature;

impl Feature for UuidGeneratorFeature {
    fn id(&self) -> &'static str {
        "uuid_generator"
    }

    fn widget_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "widget_uuid_generator".to_string(),
            label: "UUID Generator".to_string(),
            description: Some("Generate UUIDs in various versions".to_string()),
            action_type: None,
            widget_type: Some("uuid_generator".to_string()),
        }]
    }

    fn action_commands(&self) -> Vec<CommandItem> {
        vec![CommandItem {
            id: "generate_uuid".to_string(),
            label: "Generate a UUID".to_string(),
            description: None,
            action_type: Some(ActionType::GenerateUuid),
            widget_type: None,
        }]
    }

    fn execute_action(
        &self,
        action: &ActionType,
        params: &serde_json::Value,
    ) -> AppResult<ExecuteActionResponse> {
        if *action != ActionType::GenerateUuid {
            return unsupported();
        }
        let kind: UuidRequestKind = match params.get("kind") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => UuidRequestKind::Random,
        };
        let count = params.get("count").and_then(|v| v.as_u64()).unwrap_or(1) as usize;

        let uuids = generate(&kind, count)?;
        Ok(ExecuteActionResponse {
            result: uuids.join("\n"),
            metadata: Some(json!({
                "count": uuids.len(),
                "widget": "uuid_generator",
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DNS: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    #[test]
    fn nil_is_all_zeros() {
        let uuids = generate(&UuidRequestKind::Nil, 2).unwrap();
        assert_eq!(uuids, vec![
            "00000000-0000-0000-0000-000000000000".to_string(),
            "00000000-0000-0000-0000-000000000000".to_string(),
        ]);
    }

    #[test]
    fn generated_uuids_match_the_canonical_grammar() {
        for kind in [
            UuidRequestKind::Time,
            UuidRequestKind::Random,
            UuidRequestKind::Name { algo: NameAlgo::Md5, namespace: DNS.to_string() },
            UuidRequestKind::Name { algo: NameAlgo::Sha1, namespace: DNS.to_string() },
        ] {
            for uuid in generate(&kind, 3).unwrap() {
                assert!(is_valid_uuid(&uuid), "{:?} produced {}", kind, uuid);
            }
        }
    }

    #[test]
    fn random_uuids_differ() {
        let uuids = generate(&UuidRequestKind::Random, 2).unwrap();
        assert_ne!(uuids[0], uuids[1]);
    }

    #[test]
    fn time_based_carries_version_one() {
        let uuids = generate(&UuidRequestKind::Time, 1).unwrap();
        let parsed = Uuid::parse_str(&uuids[0]).unwrap();
        assert_eq!(parsed.get_version_num(), 1);
    }

    #[test]
    fn name_based_is_deterministic() {
        let a = name_based(NameAlgo::Sha1, DNS, "www.example.com").unwrap();
        let b = name_based(NameAlgo::Sha1, DNS, "www.example.com").unwrap();
        assert_eq!(a, b);
        // Known RFC 4122 test vector
        assert_eq!(a, "2ed6657d-e927-568b-95e1-2665a8aea6a2");

        let v3 = name_based(NameAlgo::Md5, DNS, "www.example.com").unwrap();
        assert_eq!(v3, "5df41881-3aed-3515-88a7-2f4a814cf09e");
    }

    #[test]
    fn invalid_namespace_fails_name_based_only() {
        let bad = "not-a-uuid";
        assert!(matches!(
            name_based(NameAlgo::Md5, bad, "x"),
            Err(AppError::InvalidNamespace(_))
        ));
        assert!(matches!(
            generate(
                &UuidRequestKind::Name { algo: NameAlgo::Sha1, namespace: bad.to_string() },
                1
            ),
            Err(AppError::InvalidNamespace(_))
        ));
        // Other kinds never touch the namespace
        assert!(generate(&UuidRequestKind::Nil, 1).is_ok());
        assert!(generate(&UuidRequestKind::Random, 1).is_ok());
    }

    #[test]
    fn namespace_grammar_is_case_insensitive_but_strict() {
        assert!(is_valid_uuid(DNS));
        assert!(is_valid_uuid("6BA7B810-9DAD-11D1-80B4-00C04FD430C8"));
        assert!(!is_valid_uuid(""));
        assert!(!is_valid_uuid("6ba7b8109dad11d180b400c04fd430c8"));
        assert!(!is_valid_uuid("{6ba7b810-9dad-11d1-80b4-00c04fd430c8}"));
        assert!(!is_valid_uuid("6ba7b810-9dad-11d1-80b4-00c04fd430c"));
    }

    #[test]
    fn count_is_respected() {
        assert_eq!(generate(&UuidRequestKind::Random, 5).unwrap().len(), 5);
        assert_eq!(generate(&UuidRequestKind::Random, 0).unwrap().len(), 0);
    }

    #[test]
    fn predefined_namespaces_are_valid() {
        for (label, namespace) in PREDEFINED_NAMESPACES {
            assert!(is_valid_uuid(namespace), "{}", label);
        }
    }
}
