// ── Resource keys ──
//
// Cache identity for a query: a resource name plus canonicalized
// parameters. Equality is deep value equality, independent of field
// order, with `null` and absent treated the same.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

/// Identifies one cache entry, e.g. `invoices{organization_id="..",status="paid"}`.
///
/// Parameter values are stored in canonical JSON text (object keys
/// sorted recursively, `null` members removed), so the key can be
/// hashed and compared structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    resource: String,
    params: BTreeMap<String, String>,
}

impl ResourceKey {
    /// A key with no parameters. As an invalidation target this covers
    /// every key of the resource.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add one parameter. `None`/`null` values are dropped, as are values
    /// that fail to serialize.
    pub fn param(mut self, name: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        if !value.is_null() {
            self.params.insert(name.to_owned(), canonical(&value));
        }
        self
    }

    /// Merge every field of a serializable struct (a filter) as parameters.
    pub fn params_from<P: Serialize>(mut self, params: &P) -> Self {
        if let Ok(Value::Object(map)) = serde_json::to_value(params) {
            for (name, value) in map {
                if !value.is_null() {
                    self.params.insert(name, canonical(&value));
                }
            }
        }
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Canonical JSON text of every parameter.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Parameter value, parsed back into JSON.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.params
            .get(name)
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    /// Prefix match: same resource, and every parameter of `self` is
    /// present in `other` with an equal value.
    pub fn covers(&self, other: &Self) -> bool {
        self.resource == other.resource
            && self
                .params
                .iter()
                .all(|(k, v)| other.params.get(k) == Some(v))
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource)?;
        if self.params.is_empty() {
            return Ok(());
        }
        f.write_char('{')?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_char('}')
    }
}

// ── Canonical form ───────────────────────────────────────────────────

fn canonical(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> =
                map.iter().filter(|(_, v)| !v.is_null()).collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(k.clone()).to_string());
                out.push(':');
                write_canonical(v, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    #[test]
    fn deep_equal_params_are_the_same_key() {
        let a = ResourceKey::new("invoices")
            .param("organization_id", "org-1")
            .param("filter", json!({ "status": "paid", "range": { "to": 2, "from": 1 } }));
        let b = ResourceKey::new("invoices")
            .param("filter", json!({ "range": { "from": 1, "to": 2 }, "status": "paid" }))
            .param("organization_id", "org-1");

        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn null_and_absent_are_equivalent() {
        let with_null = ResourceKey::new("invites")
            .param("organization_id", "org-1")
            .param("status", Option::<String>::None)
            .param("nested", json!({ "a": 1, "b": null }));
        let without = ResourceKey::new("invites")
            .param("organization_id", "org-1")
            .param("nested", json!({ "a": 1 }));

        assert_eq!(with_null, without);
    }

    #[test]
    fn different_values_differ() {
        let a = ResourceKey::new("scenes").param("project_id", "p1");
        let b = ResourceKey::new("scenes").param("project_id", "p2");
        let c = ResourceKey::new("characters").param("project_id", "p1");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn params_from_struct_skips_nulls() {
        #[derive(Serialize)]
        struct Filter {
            status: Option<&'static str>,
            project_id: Option<&'static str>,
        }

        let key = ResourceKey::new("invoices").params_from(&Filter {
            status: Some("draft"),
            project_id: None,
        });
        assert_eq!(key.params().len(), 1);
        assert_eq!(key.get("status"), Some(json!("draft")));
    }

    #[test]
    fn covers_is_prefix_match() {
        let all = ResourceKey::new("transactions");
        let org = ResourceKey::new("transactions").param("organization_id", "o1");
        let filtered = org.clone().param("type", "income");
        let other_org = ResourceKey::new("transactions").param("organization_id", "o2");

        assert!(all.covers(&org));
        assert!(all.covers(&filtered));
        assert!(org.covers(&filtered));
        assert!(!filtered.covers(&org));
        assert!(!org.covers(&other_org));
        assert!(!all.covers(&ResourceKey::new("bank_accounts")));
    }

    #[test]
    fn display_is_readable() {
        let key = ResourceKey::new("invoices").param("status", "paid");
        assert_eq!(key.to_string(), r#"invoices{status="paid"}"#);
        assert_eq!(ResourceKey::new("projects").to_string(), "projects");
    }
}
