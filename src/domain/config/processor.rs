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

//! Include/exclude selection and per-processor settings

use crate::shared::error::{ForgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub trait Named {
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessorConfig {
    /// When set, only these run, in this order
    pub includes: Option<Vec<String>>,
    pub excludes: BTreeSet<String>,
    pub config: BTreeMap<String, BTreeMap<String, String>>,
    /// Extra descriptor sources: inline descriptor text or a file path
    pub descriptors: Vec<String>,
}

impl ProcessorConfig {
    pub fn with_includes<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = Some(includes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_config(
        mut self,
        processor: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.config
            .entry(processor.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    pub fn get_config(&self, processor: &str, key: &str) -> Option<&str> {
        self.config
            .get(processor)
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }

    pub fn config_map(&self, processor: &str) -> BTreeMap<String, String> {
        self.config.get(processor).cloned().unwrap_or_default()
    }

    /// Includes win over excludes; with includes given, anything not listed is skipped.
    pub fn use_name(&self, name: &str) -> bool {
        if let Some(includes) = &self.includes {
            if includes.iter().any(|i| i == name) {
                return true;
            }
        }
        if self.excludes.contains(name) {
            return false;
        }
        self.includes.is_none()
    }

    /// Arranges `named` in include order. Without includes the input order is kept.
    pub fn order<'a, T: Named + ?Sized>(&self, named: &'a [Box<T>], kind: &str) -> Result<Vec<&'a T>> {
        let Some(includes) = &self.includes else {
            return Ok(named.iter().map(|n| &**n).collect());
        };

        let lookup: HashMap<&str, &T> = named.iter().map(|n| (n.name(), &**n)).collect();
        includes
            .iter()
            .map(|inc| {
                lookup
                    .get(inc.as_str())
                    .copied()
                    .ok_or_else(|| ForgeError::unknown_include(kind, inc.clone()))
            })
            .collect()
    }

    /// Ordering followed by include/exclude filtering.
    pub fn prepare<'a, T: Named + ?Sized>(&self, named: &'a [Box<T>], kind: &str) -> Result<Vec<&'a T>> {
        Ok(self
            .order(named, kind)?
            .into_iter()
            .filter(|n| self.use_name(n.name()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(&'static str);

    impl Named for Item {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn items() -> Vec<Box<Item>> {
        vec![Box::new(Item("a")), Box::new(Item("b")), Box::new(Item("c"))]
    }

    #[test]
    fn test_use_without_includes() {
        let config = ProcessorConfig::default().with_excludes(["b"]);
        assert!(config.use_name("a"));
        assert!(!config.use_name("b"));
    }

    #[test]
    fn test_includes_take_precedence() {
        let config = ProcessorConfig::default()
            .with_includes(["b"])
            .with_excludes(["b"]);
        assert!(config.use_name("b"));
        assert!(!config.use_name("a"));
    }

    #[test]
    fn test_order_by_includes() {
        let items = items();
        let config = ProcessorConfig::default().with_includes(["c", "a"]);
        let ordered: Vec<&str> = config
            .order(&items, "enricher")
            .unwrap()
            .iter()
            .map(|i| i.name())
            .collect();
        assert_eq!(ordered, vec!["c", "a"]);
    }

    #[test]
    fn test_order_unknown_include_fails() {
        let items = items();
        let config = ProcessorConfig::default().with_includes(["a", "zz"]);
        let err = config.order(&items, "enricher").err().unwrap();
        assert!(err.to_string().contains("No enricher with name 'zz'"));
    }

    #[test]
    fn test_prepare_applies_excludes() {
        let items = items();
        let config = ProcessorConfig::default().with_excludes(["a"]);
        let names: Vec<&str> = config
            .prepare(&items, "enricher")
            .unwrap()
            .iter()
            .map(|i| i.name())
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}
