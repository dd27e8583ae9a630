//! # polvar-store
//!
//! Registry of per-rule values published before evaluation starts.
//!
//! The registry is an owned object, handed to the publisher and to the
//! evaluation engine. It carries its own synchronization: one writer
//! replaces the whole content, any number of readers take snapshots or
//! look up single rules concurrently.

use polvar_values::{ForeachValues, ValueMap};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

pub const REGISTRY_SCHEMA: u64 = 1;
pub const REGISTRY_KIND: &str = "polvar.rule_values_registry.v1";

/// Published values for one rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedRule {
    pub name: String,
    pub values: ValueMap,
    pub foreach_values: ForeachValues,
}

impl PublishedRule {
    /// Value of foreach variable `name` for iteration `index`.
    pub fn foreach_value(&self, name: &str, index: usize) -> Option<&Value> {
        self.foreach_values.get(name).and_then(|items| items.get(index))
    }
}

/// Published rules for one policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishedPolicy {
    pub name: String,
    pub rules: Vec<PublishedRule>,
}

#[derive(Debug, Default)]
pub struct Registry {
    policies: RwLock<Vec<PublishedPolicy>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire registry content in one step.
    pub fn replace_policies(&self, policies: Vec<PublishedPolicy>) {
        let rule_count: usize = policies.iter().map(|p| p.rules.len()).sum();
        tracing::debug!(
            policies = policies.len(),
            rules = rule_count,
            "replacing registry content"
        );
        let mut guard = self
            .policies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = policies;
    }

    pub fn clear(&self) {
        self.replace_policies(Vec::new());
    }

    /// Snapshot of the published policies.
    pub fn policies(&self) -> Vec<PublishedPolicy> {
        self.read().clone()
    }

    /// Whether any policy values were published.
    pub fn has_policies(&self) -> bool {
        !self.read().is_empty()
    }

    /// Look up one rule of one policy.
    ///
    /// When a policy or rule name was published twice the last entry wins,
    /// matching how the resolver treats duplicate document entries.
    pub fn policy_rule(&self, policy: &str, rule: &str) -> Option<PublishedRule> {
        let policies = self.read();
        policies
            .iter()
            .rev()
            .filter(|p| p.name == policy)
            .find_map(|p| p.rules.iter().rev().find(|r| r.name == rule))
            .cloned()
    }

    pub fn snapshot_json(&self) -> Value {
        json!({
            "schema": REGISTRY_SCHEMA,
            "registryKind": REGISTRY_KIND,
            "policies": self.policies(),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<PublishedPolicy>> {
        self.policies.read().unwrap_or_else(PoisonError::into_inner)
    }
}
