#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use wafgate_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
auth:
  tokens: ["t"]
groups:
  office:
    - name: waf1
      base_url: https://10.0.0.1/api
      api_tokn: typo # should fail
      site_ids: [1]
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
auth:
  tokens: ["t"]
groups:
  office:
    - name: waf1
      base_url: https://10.0.0.1:9443/api/
      api_token: a
      site_ids: [1, 2]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8000");
    assert_eq!(cfg.auth.header, "token");
    assert_eq!(cfg.vendor.timeout_ms, 30_000);
    assert_eq!(cfg.vendor.max_attempts, 3);
    assert_eq!(cfg.vendor.retry_statuses, vec![429, 500, 502, 503, 504]);
    assert!(cfg.vendor.accept_invalid_certs);

    let desc = cfg.groups["office"][0].descriptor().unwrap();
    assert_eq!(desc.base_url, "https://10.0.0.1:9443/api");
    assert_eq!(desc.site_ids, vec![1, 2]);
    assert!(desc.url_rules.is_empty());
}

#[test]
fn legacy_keys_are_accepted() {
    let legacy = r#"
version: 1
auth:
  tokens: ["t"]
groups:
  office:
    - name: waf1_instance1
      base_url: https://192.168.1.1:9443/api
      api_token: api_token
      id: [1]
      URL:
        - k: uri
          op: "="
          v: /accounts/signup
          sub_k: ""
"#;
    let cfg = config::load_from_str(legacy).unwrap();
    let desc = cfg.groups["office"][0].descriptor().unwrap();
    assert_eq!(desc.site_ids, vec![1]);
    assert_eq!(desc.url_rules[0].value, "/accounts/signup");
}

#[test]
fn empty_tokens_or_groups_are_rejected() {
    let no_tokens = r#"
version: 1
auth:
  tokens: []
groups:
  office: []
"#;
    assert!(config::load_from_str(no_tokens).is_err());

    let no_groups = r#"
version: 1
auth:
  tokens: ["t"]
"#;
    assert!(config::load_from_str(no_groups).is_err());

    let bad_version = r#"
version: 2
auth:
  tokens: ["t"]
groups:
  office: []
"#;
    assert!(config::load_from_str(bad_version).is_err());
}

#[test]
fn vendor_and_listen_ranges() {
    let bad_attempts = r#"
version: 1
auth: { tokens: ["t"] }
vendor: { max_attempts: 0 }
groups: { office: [] }
"#;
    assert!(config::load_from_str(bad_attempts).is_err());

    let bad_listen = r#"
version: 1
server: { listen: "not-an-addr" }
auth: { tokens: ["t"] }
groups: { office: [] }
"#;
    assert!(config::load_from_str(bad_listen).is_err());
}

#[test]
fn incomplete_instance_is_kept_unless_strict() {
    let lenient = r#"
version: 1
auth: { tokens: ["t"] }
groups:
  office:
    - base_url: https://10.0.0.1/api
      api_token: a
      site_ids: [1]
"#;
    let cfg = config::load_from_str(lenient).unwrap();
    let incomplete = cfg.incomplete_instances();
    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].1, "office#0");
    assert!(incomplete[0].2.to_string().contains("name"));

    let strict = format!("{lenient}dispatch: {{ strict_instances: true }}\n");
    let err = config::load_from_str(&strict).unwrap_err();
    assert_eq!(err.client_code().as_str(), "CONFIG");
}

#[test]
fn authorization_is_not_a_token_header() {
    let cfg = r#"
version: 1
auth:
  header: Authorization
  tokens: ["t"]
groups:
  office: []
"#;
    let err = config::load_from_str(cfg).unwrap_err();
    assert_eq!(err.client_code().as_str(), "CONFIG");
    assert!(err.to_string().contains("authorization"));
}

#[test]
fn status_only_instance_is_complete_for_reads() {
    let cfg = r#"
version: 1
auth: { tokens: ["t"] }
groups:
  office:
    - name: reader
      base_url: https://10.0.0.1/api
      api_token: a
      policy_ids: [11]
"#;
    let cfg = config::load_from_str(cfg).unwrap();
    let inst = &cfg.groups["office"][0];
    assert!(inst.descriptor().is_err());
    let desc = inst.status_descriptor().unwrap();
    assert!(desc.site_ids.is_empty());
    assert_eq!(desc.policy_ids, vec![11]);
}
