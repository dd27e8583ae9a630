//! The layered value resolver and its required-variable guard.

use crate::error::ResolveError;
use crate::probe::VariableSourceProbe;
use polvar_values::{Labels, Overrides, Subresource, ValueMap, ValuesDocument};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

pub const REQUEST_OPERATION: &str = "request.operation";
pub const DEFAULT_OPERATION: &str = "CREATE";

/// Values document plus `--set` overrides, fixed for the resolver's lifetime.
///
/// All queries are reads; a `Variables` can be shared across evaluation
/// workers without locking.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: Option<ValuesDocument>,
    overrides: Overrides,
}

/// One guarded lookup: which pair is evaluated and what the policy declares.
#[derive(Debug, Clone, Copy)]
pub struct VariableQuery<'a> {
    pub policy: &'a str,
    pub resource: &'a str,
    pub kind: &'a str,
    /// Kinds for which missing values are an error.
    pub in_scope_kinds: &'a BTreeSet<String>,
    /// Variable names referenced by the policy or its rules.
    pub declared: &'a [String],
}

impl Variables {
    pub fn new(values: Option<ValuesDocument>, overrides: Overrides) -> Self {
        Self { values, overrides }
    }

    pub fn values(&self) -> Option<&ValuesDocument> {
        self.values.as_ref()
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// Whether the document carries an entry for `policy`.
    pub fn has_policy_values(&self, policy: &str) -> bool {
        self.values
            .as_ref()
            .is_some_and(|doc| doc.policies.iter().any(|p| p.name == policy))
    }

    pub fn subresources(&self) -> &[Subresource] {
        self.values
            .as_ref()
            .map(|doc| doc.subresources.as_slice())
            .unwrap_or_default()
    }

    /// Namespace name -> labels, or `None` when nothing was configured.
    pub fn namespace_selectors(&self) -> Option<BTreeMap<String, Labels>> {
        let doc = self.values.as_ref()?;
        let selectors: BTreeMap<String, Labels> = doc
            .namespace_selectors
            .iter()
            .map(|selector| (selector.name.clone(), selector.labels.clone()))
            .collect();
        (!selectors.is_empty()).then_some(selectors)
    }

    /// Flatten every layer for one (policy, resource) pair.
    ///
    /// Always contains `request.operation`.
    pub fn resolve(&self, policy: &str, resource: &str) -> ValueMap {
        with_default_operation(self.layered(policy, resource))
    }

    /// Resolve values for `query`, failing when the policy plainly needs
    /// values and none were supplied.
    pub fn check_variable_for_policy(
        &self,
        query: &VariableQuery<'_>,
        probe: &impl VariableSourceProbe,
    ) -> Result<ValueMap, ResolveError> {
        let resolved = self.layered(query.policy, query.resource);

        // Checked before the request.operation default so an empty layer
        // stack is still visible.
        if query.in_scope_kinds.contains(query.kind)
            && !query.declared.is_empty()
            && resolved.is_empty()
            && probe.has_value_sources()
        {
            tracing::warn!(
                policy = query.policy,
                resource = query.resource,
                kind = query.kind,
                declared = query.declared.len(),
                "no values supplied for policy with variables"
            );
            return Err(ResolveError::MissingVariableValues {
                policy: query.policy.to_string(),
                resource: query.resource.to_string(),
            });
        }

        Ok(with_default_operation(resolved))
    }

    fn layered(&self, policy: &str, resource: &str) -> ValueMap {
        let mut resolved = ValueMap::new();

        if let Some(doc) = &self.values {
            resolved.extend(
                doc.global_values
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );

            let mut matches = 0usize;
            for entry in doc
                .policies
                .iter()
                .filter(|p| p.name == policy)
                .flat_map(|p| p.resources.iter())
                .filter(|r| r.name == resource)
            {
                matches += 1;
                resolved.extend(entry.values.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            if matches > 1 {
                tracing::debug!(
                    policy,
                    resource,
                    matches,
                    "duplicate resource values; last entry wins"
                );
            }
        }

        resolved.extend(
            self.overrides
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string()))),
        );

        tracing::debug!(policy, resource, keys = resolved.len(), "resolved value layers");
        resolved
    }
}

fn with_default_operation(mut resolved: ValueMap) -> ValueMap {
    resolved
        .entry(REQUEST_OPERATION.to_string())
        .or_insert_with(|| Value::String(DEFAULT_OPERATION.to_string()));
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use polvar_values::{NamespaceSelector, PolicyValues, ResourceValues};
    use serde_json::json;

    fn map(pairs: &[(&str, Value)]) -> ValueMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn resource(name: &str, values: ValueMap) -> ResourceValues {
        ResourceValues {
            name: name.to_string(),
            values,
        }
    }

    fn policy(name: &str, resources: Vec<ResourceValues>) -> PolicyValues {
        PolicyValues {
            name: name.to_string(),
            resources,
            rules: Vec::new(),
        }
    }

    fn layered_document() -> ValuesDocument {
        ValuesDocument {
            global_values: map(&[("k", json!("global")), ("only_global", json!(7))]),
            policies: vec![policy(
                "p1",
                vec![resource("r1", map(&[("k", json!("resource")), ("team", json!("a"))]))],
            )],
            ..ValuesDocument::default()
        }
    }

    fn kinds(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn absent_document_yields_default_operation_only() {
        let variables = Variables::default();
        let resolved = variables.resolve("p", "r");
        assert_eq!(resolved, map(&[(REQUEST_OPERATION, json!(DEFAULT_OPERATION))]));
    }

    #[test]
    fn absent_document_keeps_overrides() {
        let overrides = Overrides::parse(["image=nginx"]).expect("valid override");
        let variables = Variables::new(None, overrides);
        let resolved = variables.resolve("p", "r");
        assert_eq!(
            resolved,
            map(&[
                ("image", json!("nginx")),
                (REQUEST_OPERATION, json!(DEFAULT_OPERATION)),
            ])
        );
    }

    #[test]
    fn overrides_beat_resource_values_beat_globals() {
        let variables = Variables::new(Some(layered_document()), Overrides::new());
        assert_eq!(variables.resolve("p1", "r1").get("k"), Some(&json!("resource")));

        let overrides = Overrides::parse(["k=override"]).expect("valid override");
        let variables = Variables::new(Some(layered_document()), overrides);
        let resolved = variables.resolve("p1", "r1");
        assert_eq!(resolved.get("k"), Some(&json!("override")));
        assert_eq!(resolved.get("team"), Some(&json!("a")));
    }

    #[test]
    fn global_only_key_survives() {
        let overrides = Overrides::parse(["other=x"]).expect("valid override");
        let variables = Variables::new(Some(layered_document()), overrides);
        assert_eq!(variables.resolve("p1", "r1").get("only_global"), Some(&json!(7)));
    }

    #[test]
    fn unmatched_names_contribute_nothing() {
        let variables = Variables::new(Some(layered_document()), Overrides::new());
        let resolved = variables.resolve("p1", "unknown");
        assert_eq!(resolved.get("k"), Some(&json!("global")));
        assert!(resolved.get("team").is_none());

        let resolved = variables.resolve("unknown", "r1");
        assert_eq!(resolved.get("k"), Some(&json!("global")));
    }

    #[test]
    fn supplied_operation_is_not_replaced() {
        let overrides = Overrides::parse(["request.operation=DELETE"]).expect("valid override");
        let variables = Variables::new(None, overrides);
        assert_eq!(
            variables.resolve("p", "r").get(REQUEST_OPERATION),
            Some(&json!("DELETE"))
        );

        let doc = ValuesDocument {
            global_values: map(&[(REQUEST_OPERATION, json!("UPDATE"))]),
            ..ValuesDocument::default()
        };
        let variables = Variables::new(Some(doc), Overrides::new());
        assert_eq!(
            variables.resolve("p", "r").get(REQUEST_OPERATION),
            Some(&json!("UPDATE"))
        );
    }

    #[test]
    fn duplicate_entries_last_match_wins() {
        let doc = ValuesDocument {
            policies: vec![
                policy(
                    "p",
                    vec![
                        resource("r", map(&[("a", json!(1)), ("b", json!(1))])),
                        resource("r", map(&[("a", json!(2))])),
                    ],
                ),
                policy("p", vec![resource("r", map(&[("a", json!(3))]))]),
            ],
            ..ValuesDocument::default()
        };
        let variables = Variables::new(Some(doc), Overrides::new());
        let resolved = variables.resolve("p", "r");
        assert_eq!(resolved.get("a"), Some(&json!(3)));
        // Earlier duplicates still contribute keys the later ones lack.
        assert_eq!(resolved.get("b"), Some(&json!(1)));
    }

    #[test]
    fn resolve_leaves_document_untouched() {
        let doc = layered_document();
        let variables = Variables::new(Some(doc.clone()), Overrides::parse(["k=x"]).unwrap());
        let _ = variables.resolve("p1", "r1");
        assert_eq!(variables.values(), Some(&doc));
    }

    #[test]
    fn guard_fires_only_when_all_conditions_hold() {
        let in_scope = kinds(&["Pod"]);
        let declared = vec!["request.object.metadata.name".to_string()];
        let empty = Variables::default();

        let query = VariableQuery {
            policy: "p",
            resource: "r",
            kind: "Pod",
            in_scope_kinds: &in_scope,
            declared: &declared,
        };
        assert_eq!(
            empty.check_variable_for_policy(&query, &true),
            Err(ResolveError::MissingVariableValues {
                policy: "p".to_string(),
                resource: "r".to_string(),
            })
        );

        // kind out of scope
        let other_kind = VariableQuery {
            kind: "Service",
            ..query
        };
        assert!(empty.check_variable_for_policy(&other_kind, &true).is_ok());

        // no declared variables
        let no_declared = VariableQuery {
            declared: &[],
            ..query
        };
        assert!(empty.check_variable_for_policy(&no_declared, &true).is_ok());

        // some value supplied
        let supplied = Variables::new(None, Overrides::parse(["x=1"]).unwrap());
        assert!(supplied.check_variable_for_policy(&query, &true).is_ok());

        // ambient signal off
        assert!(empty.check_variable_for_policy(&query, &false).is_ok());
    }

    #[test]
    fn guard_success_returns_resolved_values() {
        let in_scope = kinds(&["Pod"]);
        let declared = vec!["team".to_string()];
        let variables = Variables::new(Some(layered_document()), Overrides::new());
        let query = VariableQuery {
            policy: "p1",
            resource: "r1",
            kind: "Pod",
            in_scope_kinds: &in_scope,
            declared: &declared,
        };
        let resolved = variables
            .check_variable_for_policy(&query, &true)
            .expect("values were supplied");
        assert_eq!(resolved, variables.resolve("p1", "r1"));
    }

    #[test]
    fn guard_error_message_names_flags() {
        let err = ResolveError::MissingVariableValues {
            policy: "p".to_string(),
            resource: "r".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("`p`"));
        assert!(message.contains("`r`"));
        assert!(message.contains("--set"));
        assert!(message.contains("--values-file"));
    }

    #[test]
    fn document_queries() {
        let mut doc = layered_document();
        doc.namespace_selectors = vec![
            NamespaceSelector {
                name: "prod".to_string(),
                labels: [("env".to_string(), "old".to_string())].into_iter().collect(),
            },
            NamespaceSelector {
                name: "prod".to_string(),
                labels: [("env".to_string(), "production".to_string())]
                    .into_iter()
                    .collect(),
            },
        ];
        let variables = Variables::new(Some(doc), Overrides::new());

        assert!(variables.has_policy_values("p1"));
        assert!(!variables.has_policy_values("p2"));
        assert!(!variables.has_overrides());
        assert!(variables.subresources().is_empty());

        let selectors = variables.namespace_selectors().expect("selectors present");
        assert_eq!(
            selectors["prod"].get("env").map(String::as_str),
            Some("production")
        );
    }

    #[test]
    fn document_queries_without_document() {
        let variables = Variables::default();
        assert!(!variables.has_policy_values("p1"));
        assert!(variables.subresources().is_empty());
        assert!(variables.namespace_selectors().is_none());

        let variables = Variables::new(Some(ValuesDocument::default()), Overrides::new());
        assert!(variables.namespace_selectors().is_none());
    }

    #[test]
    fn variables_are_shareable_across_workers() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Variables>();
    }
}
