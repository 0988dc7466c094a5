//! Rule translation tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use wafgate_core::pattern::{challenge_pattern, translate, UrlRule};

fn rule(value: &str) -> UrlRule {
    UrlRule {
        match_key: "uri".into(),
        operator: "=".into(),
        value: value.into(),
        sub_key: String::new(),
    }
}

#[test]
fn single_rule_becomes_single_or_group() {
    let pattern = translate(&[rule("/accounts/signup")]);
    assert_eq!(
        serde_json::to_value(&pattern).unwrap(),
        json!([[{"k": "uri", "op": "has", "v": ["/accounts/signup"], "sub_k": ""}]])
    );
}

#[test]
fn two_rules_are_never_merged_into_one_and_group() {
    let pattern = translate(&[rule("/api/test"), rule("/accounts/login")]);
    assert_eq!(pattern.len(), 2);
    assert!(pattern.iter().all(|group| group.len() == 1));
    assert_eq!(pattern[0][0].values, vec!["/api/test".to_string()]);
    assert_eq!(pattern[1][0].values, vec!["/accounts/login".to_string()]);
}

#[test]
fn authored_operator_is_always_replaced() {
    let mut r = rule("/x");
    r.operator = "prefix".into();
    r.sub_key = "q".into();
    let pattern = translate(&[r]);
    assert_eq!(pattern[0][0].operator, "has");
    assert_eq!(pattern[0][0].sub_key, "q");
}

#[test]
fn empty_rules_give_empty_pattern() {
    assert!(translate(&[]).is_empty());
}

#[test]
fn disable_always_clears_pattern() {
    let rules = [rule("/accounts/signup"), rule("/api/auth")];
    assert!(challenge_pattern(false, &rules).is_empty());
    assert_eq!(challenge_pattern(true, &rules).len(), 2);
}

#[test]
fn rules_accept_vendor_short_keys() {
    let short: UrlRule =
        serde_json::from_value(json!({"k": "uri", "op": "=", "v": "/accounts/signup", "sub_k": ""}))
            .unwrap();
    let long: UrlRule = serde_json::from_value(json!({
        "match_key": "uri", "operator": "=", "value": "/accounts/signup", "sub_key": ""
    }))
    .unwrap();
    assert_eq!(short, long);
}

#[test]
fn rules_reject_unknown_keys() {
    let res = serde_json::from_value::<UrlRule>(json!({"k": "uri", "v": "/a", "negate": true}));
    assert!(res.is_err());
}
