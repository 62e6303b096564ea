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

use super::kind::Kind;
use super::resource::Resource;
use crate::infrastructure::constants::API_VERSION_CORE;
use crate::shared::error::Result;
use serde_json::json;

/// Ordered manifest set under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCollection {
    items: Vec<Resource>,
}

impl ResourceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resource: Resource) {
        self.items.push(resource);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Resource> {
        self.items.iter_mut()
    }

    pub fn items(&self) -> &[Resource] {
        &self.items
    }

    pub fn has_kind(&self, kinds: &[Kind]) -> bool {
        self.items.iter().any(|r| kinds.contains(&r.kind()))
    }

    pub fn has_named(&self, kind: Kind, name: &str) -> bool {
        self.find(kind, name).is_some()
    }

    pub fn find(&self, kind: Kind, name: &str) -> Option<&Resource> {
        self.items
            .iter()
            .find(|r| r.kind() == kind && r.name() == Some(name))
    }

    pub fn position(&self, kind: Kind, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|r| r.kind() == kind && r.name() == Some(name))
    }

    pub fn replace(&mut self, index: usize, resource: Resource) {
        if let Some(slot) = self.items.get_mut(index) {
            *slot = resource;
        }
    }

    /// Resources of one kind, in collection order.
    pub fn of_kind(&self, kind: Kind) -> impl Iterator<Item = &Resource> {
        self.items.iter().filter(move |r| r.kind() == kind)
    }

    pub fn of_kind_mut(&mut self, kind: Kind) -> impl Iterator<Item = &mut Resource> {
        self.items.iter_mut().filter(move |r| r.kind() == kind)
    }

    /// The collection as a `v1` `List` manifest.
    pub fn to_list(&self) -> Result<serde_json::Value> {
        let items = self
            .items
            .iter()
            .map(Resource::to_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(json!({
            "apiVersion": API_VERSION_CORE,
            "kind": "List",
            "items": items,
        }))
    }
}

impl FromIterator<Resource> for ResourceCollection {
    fn from_iter<T: IntoIterator<Item = Resource>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResourceCollection {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
