// Copyright 2018-2024 the Deno authors. MIT license.

use indexmap::IndexMap;

use crate::node::NormalizedNode;
use crate::serialize::serialize;
use crate::serialize::SerializedNode;

/// Every registered global keyed by qualified name, in first-registration
/// order. Each name holds its overloads.
#[derive(Debug, Default)]
pub struct GlobalRegistry {
  entries: IndexMap<String, Vec<RegistryEntry>>,
}

#[derive(Debug)]
struct RegistryEntry {
  node: NormalizedNode,
  serialized: SerializedNode,
}

impl GlobalRegistry {
  /// Registers a node under its id.
  ///
  /// Placeholder ids are ignored and a node that serializes identically to
  /// an existing overload is dropped. Returns whether the node was added.
  pub fn save(&mut self, node: NormalizedNode) -> bool {
    if node.is_placeholder() {
      return false;
    }
    let serialized = serialize(&node);
    let overloads = self.entries.entry(node.id.clone()).or_default();
    if overloads.iter().any(|entry| entry.serialized == serialized) {
      log::trace!("Skipping duplicate overload of {}", node.id);
      return false;
    }
    overloads.push(RegistryEntry { node, serialized });
    true
  }

  pub fn get(&self, name: &str) -> Option<Vec<&NormalizedNode>> {
    self
      .entries
      .get(name)
      .map(|entries| entries.iter().map(|entry| &entry.node).collect())
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn overload_count(&self, name: &str) -> usize {
    self.entries.get(name).map(|e| e.len()).unwrap_or(0)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(|k| k.as_str())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// The serialized catalog: qualified name to overloads.
  pub fn to_serialized(&self) -> IndexMap<String, Vec<SerializedNode>> {
    self
      .entries
      .iter()
      .map(|(name, entries)| {
        (
          name.clone(),
          entries.iter().map(|e| e.serialized.clone()).collect(),
        )
      })
      .collect()
  }
}
