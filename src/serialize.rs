// Copyright 2018-2024 the Deno authors. MIT license.

use serde::Deserialize;
use serde::Serialize;

use crate::node::NormalizedNode;

/// The plain, JSON-safe form of a [`NormalizedNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedNode {
  pub id: String,
  pub kind: String,
  pub name: String,
  pub returns: Vec<SerializedNode>,
  pub params: Vec<SerializedNode>,
  pub generics: Vec<SerializedNode>,
  pub text: Option<String>,
  pub meta: Vec<String>,
}

pub fn serialize(node: &NormalizedNode) -> SerializedNode {
  SerializedNode {
    id: node.id.clone(),
    kind: node.kind.as_str().to_string(),
    name: node.name.clone(),
    returns: node.returns.iter().map(serialize).collect(),
    params: node.params.iter().map(serialize).collect(),
    generics: node.generics.iter().map(serialize).collect(),
    text: node.text.clone(),
    // BTreeSet iteration follows the tag declaration order
    meta: node
      .meta
      .iter()
      .filter_map(|tag| tag.as_str())
      .map(|tag| tag.to_string())
      .collect(),
  }
}
