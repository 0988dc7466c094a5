//! URL rules and the vendor challenge pattern grammar.
//!
//! Operators author a flat list of [`UrlRule`]s. The vendor challenge endpoint
//! expects an OR-of-AND list of [`Condition`]s. [`translate`] turns every rule
//! into its own single-condition OR-group; AND-groups with more than one
//! condition are never produced.

use serde::{Deserialize, Serialize};

/// Operator the vendor uses for substring matching. Always sent, whatever the
/// rule was authored with.
pub const MATCH_OP: &str = "has";

/// One operator-authored condition the challenge should apply to.
///
/// Accepts both the descriptive keys and the vendor short keys
/// (`k`/`op`/`v`/`sub_k`) so existing rule lists can be pasted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UrlRule {
    #[serde(alias = "k")]
    pub match_key: String,
    #[serde(alias = "op", default = "default_operator")]
    pub operator: String,
    #[serde(alias = "v")]
    pub value: String,
    #[serde(alias = "sub_k", default)]
    pub sub_key: String,
}

fn default_operator() -> String {
    "=".into()
}

/// Atomic vendor match condition, serialized with the vendor wire keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Condition {
    #[serde(rename = "k")]
    pub match_key: String,
    #[serde(rename = "op")]
    pub operator: String,
    #[serde(rename = "v")]
    pub values: Vec<String>,
    #[serde(rename = "sub_k")]
    pub sub_key: String,
}

/// AND-list of conditions.
pub type AndGroup = Vec<Condition>;

/// OR-list of AND-groups, as accepted by the challenge endpoint.
pub type Pattern = Vec<AndGroup>;

impl From<&UrlRule> for Condition {
    fn from(rule: &UrlRule) -> Self {
        // authored operator is replaced, scalar value is wrapped
        Self {
            match_key: rule.match_key.clone(),
            operator: MATCH_OP.to_string(),
            values: vec![rule.value.clone()],
            sub_key: rule.sub_key.clone(),
        }
    }
}

/// Translate rules into the vendor pattern, one OR-group per rule.
pub fn translate(rules: &[UrlRule]) -> Pattern {
    rules.iter().map(|r| vec![Condition::from(r)]).collect()
}

/// Pattern to submit for a challenge switch. Disabling always clears it.
pub fn challenge_pattern(enable: bool, rules: &[UrlRule]) -> Pattern {
    if enable {
        translate(rules)
    } else {
        Vec::new()
    }
}
