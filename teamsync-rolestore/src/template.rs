//! Deep placeholder substitution over role-permission templates.
//!
//! A template is an arbitrary JSON tree. Instantiating it for a role walks
//! the tree and replaces [`ROLE_TOKEN`] inside string scalars only — keys,
//! numbers, and booleans pass through untouched, at any nesting depth.

use serde_json::{json, Value};

use teamsync_core::types::RoleName;

/// Marker replaced by the role's name wherever it appears in a string value.
pub const ROLE_TOKEN: &str = "{role}";

/// Instantiate `template` for `role`.
pub fn substitute(template: &Value, role: &RoleName) -> Value {
    match template {
        Value::String(s) => Value::String(s.replace(ROLE_TOKEN, role.as_str())),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute(v, role)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute(v, role)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Minimal read-only permission template used when the operator supplies
/// none: cluster monitoring plus read access to the role's own indices.
pub fn default_role_template() -> Value {
    json!({
        "cluster": ["monitor"],
        "indices": [
            {
                "names": [format!("{ROLE_TOKEN}-*")],
                "privileges": ["read", "view_index_metadata"]
            }
        ]
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_string_scalars_at_any_depth() {
        let template = json!({
            "cluster": ["monitor"],
            "indices": [{"names": ["{role}-*", "shared-{role}"], "privileges": ["read"]}],
            "metadata": {"owner": "{role}"}
        });
        let out = substitute(&template, &RoleName::from("QA"));
        assert_eq!(out["indices"][0]["names"][0], "QA-*");
        assert_eq!(out["indices"][0]["names"][1], "shared-QA");
        assert_eq!(out["metadata"]["owner"], "QA");
    }

    #[test]
    fn non_string_scalars_pass_through() {
        let template = json!({"enabled": true, "priority": 3, "note": null});
        let out = substitute(&template, &RoleName::from("QA"));
        assert_eq!(out, template);
    }

    #[test]
    fn keys_are_never_substituted() {
        let template = json!({"{role}": "{role}"});
        let out = substitute(&template, &RoleName::from("QA"));
        assert_eq!(out, json!({"{role}": "QA"}));
    }

    #[test]
    fn repeated_tokens_in_one_string_all_replaced() {
        let template = json!("{role}/{role}");
        let out = substitute(&template, &RoleName::from("IT"));
        assert_eq!(out, json!("IT/IT"));
    }

    #[test]
    fn default_template_instantiates_to_role_scoped_indices() {
        let out = substitute(&default_role_template(), &RoleName::from("TeamA"));
        assert_eq!(out["indices"][0]["names"][0], "TeamA-*");
    }
}
