//! Load balancer attributes and their canonical ordering
//!
//! ELBv2 returns attributes in no particular order, and the desired attributes a
//! controller computes come from a map. Comparing the two directly would report
//! drift on every pass, so both sides are put in canonical order (by key, then
//! value) before they are compared element by element.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A single `(key, value)` load balancer attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerAttribute {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl LoadBalancerAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Canonical comparator: key first, value only breaks ties.
///
/// Keys are unique within a well-formed set, so the value tie-break only
/// matters for malformed input; it keeps the ordering total.
pub fn canonical_order(a: &LoadBalancerAttribute, b: &LoadBalancerAttribute) -> Ordering {
    a.key.cmp(&b.key).then_with(|| a.value.cmp(&b.value))
}

/// Return a canonically ordered copy of `items`
pub fn canonicalize(items: &[LoadBalancerAttribute]) -> Vec<LoadBalancerAttribute> {
    let mut sorted = items.to_vec();
    sorted.sort_by(canonical_order);
    sorted
}

/// Ordered collection of load balancer attributes
///
/// Equality is element-wise, so two sets compare equal only once both have been
/// canonicalized. Use [`Attributes::canonical`] on each side before comparing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    items: Vec<LoadBalancerAttribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs; later duplicates replace earlier ones
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut attributes = Self::new();
        for (key, value) in pairs {
            attributes.insert(key, value);
        }
        attributes
    }

    /// Set `key` to `value`, replacing any existing entry for that key.
    ///
    /// Returns the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.items.iter_mut().find(|a| a.key == key) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value)),
            None => {
                self.items.push(LoadBalancerAttribute { key, value });
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoadBalancerAttribute> {
        self.items.iter()
    }

    /// Sort in place into canonical order
    pub fn canonicalize(&mut self) {
        self.items.sort_by(canonical_order);
    }

    /// Consume and return the canonical form
    #[must_use]
    pub fn canonical(mut self) -> Self {
        self.canonicalize();
        self
    }

    pub fn is_canonical(&self) -> bool {
        self.items
            .windows(2)
            .all(|w| canonical_order(&w[0], &w[1]) != Ordering::Greater)
    }

    /// Whether `observed` disagrees with these desired attributes.
    ///
    /// Only the keys present in `self` are considered; the provider reports
    /// every attribute of a load balancer, most of which the controller leaves
    /// at their defaults. Agrees with [`Attributes::changes_from`] by construction.
    pub fn has_drift_from(&self, observed: &Attributes) -> bool {
        !self.changes_from(observed).is_empty()
    }

    /// Desired attributes that are missing from or differ in `observed`, in canonical order.
    ///
    /// A key repeated in `self` counts once with its last value. A key repeated
    /// in `observed` is compared against its first reported value, as [`Attributes::get`] does.
    pub fn changes_from(&self, observed: &Attributes) -> Attributes {
        let desired: BTreeMap<&str, &str> = self
            .items
            .iter()
            .map(|a| (a.key.as_str(), a.value.as_str()))
            .collect();
        desired
            .into_iter()
            .filter(|(key, value)| observed.get(key) != Some(*value))
            .map(|(key, value)| LoadBalancerAttribute::new(key, value))
            .collect()
    }
}

impl From<Vec<LoadBalancerAttribute>> for Attributes {
    fn from(items: Vec<LoadBalancerAttribute>) -> Self {
        Self { items }
    }
}

impl FromIterator<LoadBalancerAttribute> for Attributes {
    fn from_iter<T: IntoIterator<Item = LoadBalancerAttribute>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Attributes {
    type Item = LoadBalancerAttribute;
    type IntoIter = std::vec::IntoIter<LoadBalancerAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a LoadBalancerAttribute;
    type IntoIter = std::slice::Iter<'a, LoadBalancerAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
