//! Publishing per-rule values to the shared registry.
//!
//! Only the rule layer is published. Global and per-resource values reach
//! the evaluator through [`Variables::resolve`] instead.

use crate::variables::Variables;
use polvar_store::{PublishedPolicy, PublishedRule, Registry};

impl Variables {
    /// Per-rule values in registry shape, one entry per document policy.
    pub fn published_policies(&self) -> Vec<PublishedPolicy> {
        let Some(doc) = self.values() else {
            return Vec::new();
        };
        doc.policies
            .iter()
            .map(|policy| PublishedPolicy {
                name: policy.name.clone(),
                rules: policy
                    .rules
                    .iter()
                    .map(|rule| PublishedRule {
                        name: rule.name.clone(),
                        values: rule.values.clone(),
                        foreach_values: rule.foreach_values.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Replace the registry content with this document's rule values.
    ///
    /// Call once before evaluation workers start reading the registry.
    /// Without a document the registry is cleared.
    pub fn publish(&self, registry: &Registry) {
        let policies = self.published_policies();
        tracing::info!(policies = policies.len(), "publishing rule values");
        registry.replace_policies(policies);
    }
}
