// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Enricher discovery from descriptor sources.
//!
//! A descriptor lists one enricher per line: `name` or `name,order` adds it,
//! `!name` removes an entry added earlier. Entries without a numeric order
//! are numbered from 100 upwards in reading order. Lower orders run first.

use crate::domain::enricher::api::{Enricher, EnricherConfig, EnricherContext};
use crate::domain::enricher::standard;
use crate::infrastructure::constants::{DEFAULT_ENRICHER_DESCRIPTOR, DEFAULT_ENRICHER_ORDER};
use crate::shared::error::{ForgeError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub type EnricherFactory = fn(EnricherConfig) -> Box<dyn Enricher>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorEntry {
    pub name: String,
    pub order: i32,
    seq: usize,
}

/// Parses descriptor sources in order, applying removals as they appear.
pub fn parse_descriptors<S: AsRef<str>>(sources: &[S]) -> Vec<DescriptorEntry> {
    let mut entries: Vec<DescriptorEntry> = Vec::new();
    let mut next_default = DEFAULT_ENRICHER_ORDER;
    let mut seq = 0;

    for source in sources {
        for line in source.as_ref().lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.splitn(2, ',');
            let head = parts.next().unwrap_or_default().trim();
            if let Some(name) = head.strip_prefix('!') {
                entries.retain(|e| e.name != name.trim());
                continue;
            }

            let order = match parts.next().and_then(|o| o.trim().parse::<i32>().ok()) {
                Some(order) => order,
                None => {
                    let order = next_default;
                    next_default += 1;
                    order
                }
            };

            entries.retain(|e| e.name != head);
            entries.push(DescriptorEntry {
                name: head.to_string(),
                order,
                seq,
            });
            seq += 1;
        }
    }

    entries.sort_by_key(|e| (e.order, e.seq));
    entries
}

/// Name to constructor mapping consulted when instantiating descriptors.
#[derive(Clone, Default)]
pub struct EnricherRegistry {
    factories: BTreeMap<String, EnricherFactory>,
}

impl EnricherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry knowing the enrichers shipped with the crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, factory) in standard::factories() {
            registry.register(name, factory);
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, factory: EnricherFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiates the descriptor entries in execution order. An entry
    /// without a registered constructor aborts the whole pass.
    pub fn create_enrichers(
        &self,
        entries: &[DescriptorEntry],
        context: Arc<EnricherContext>,
    ) -> Result<Vec<Box<dyn Enricher>>> {
        entries
            .iter()
            .map(|entry| {
                let factory = self
                    .factories
                    .get(&entry.name)
                    .ok_or_else(|| ForgeError::EnricherNotFound(entry.name.clone()))?;
                Ok(factory(EnricherConfig::new(entry.name.clone(), context.clone())))
            })
            .collect()
    }
}

/// Descriptor sources for a pass: the default descriptor, then each extra
/// source. An extra source naming an existing file is read from disk,
/// anything else is taken as inline descriptor text.
pub fn descriptor_sources(extra: &[String]) -> Result<Vec<String>> {
    let mut sources = vec![DEFAULT_ENRICHER_DESCRIPTOR.to_string()];
    for source in extra {
        let path = Path::new(source.trim());
        if !source.contains('\n') && path.is_file() {
            sources.push(std::fs::read_to_string(path)?);
        } else {
            sources.push(source.clone());
        }
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[DescriptorEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_default_orders_count_up() {
        let entries = parse_descriptors(&["a\nb\nc"]);
        assert_eq!(names(&entries), vec!["a", "b", "c"]);
        let orders: Vec<i32> = entries.iter().map(|e| e.order).collect();
        assert_eq!(orders, vec![100, 101, 102]);
    }

    #[test]
    fn test_explicit_order_and_removal() {
        let entries = parse_descriptors(&["a\nb\nc", "!b\nd,50\ne,oops"]);
        assert_eq!(names(&entries), vec!["d", "a", "c", "e"]);
        assert_eq!(entries.last().map(|e| e.order), Some(103));
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let entries = parse_descriptors(&["x,10\ny,10", "z,10"]);
        assert_eq!(names(&entries), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_comments_and_redeclaration() {
        let entries = parse_descriptors(&["# comment\n\na,200\nb", "a,1"]);
        assert_eq!(names(&entries), vec!["a", "b"]);
        assert_eq!(entries[0].order, 1);
    }

    #[test]
    fn test_unknown_enricher_fails() {
        let registry = EnricherRegistry::new();
        let context = Arc::new(EnricherContext::new(
            Default::default(),
            Vec::new(),
            Default::default(),
            Default::default(),
        ));
        let err = registry
            .create_enrichers(&parse_descriptors(&["forge-missing"]), context)
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Enricher forge-missing could not be found");
    }

    #[test]
    fn test_defaults_all_registered() {
        let registry = EnricherRegistry::with_defaults();
        for entry in parse_descriptors(&[DEFAULT_ENRICHER_DESCRIPTOR]) {
            assert!(registry.contains(&entry.name), "{}", entry.name);
        }
    }
}
