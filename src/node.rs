// Copyright 2018-2024 the Deno authors. MIT license.

use std::collections::BTreeSet;

use crate::meta::MetaTag;
use crate::meta::NodeKind;

/// Ids starting with this prefix mark scratch results that must never be
/// registered as globals.
pub const PLACEHOLDER_ID_PREFIX: &str = "__placeholder";

/// Joins a name onto a dotted prefix. An empty prefix yields the bare name.
pub fn format_name(name: &str, prefix: &str) -> String {
  if prefix.is_empty() {
    name.to_string()
  } else if name.is_empty() {
    prefix.to_string()
  } else {
    format!("{}.{}", prefix, name)
  }
}

/// A resolved declaration or type position.
///
/// Nodes own their children; there is no sharing between trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedNode {
  pub id: String,
  pub kind: NodeKind,
  pub name: String,
  pub returns: Vec<NormalizedNode>,
  pub params: Vec<NormalizedNode>,
  pub generics: Vec<NormalizedNode>,
  pub text: Option<String>,
  pub meta: BTreeSet<MetaTag>,
}

impl NormalizedNode {
  pub fn builder(id: impl Into<String>, kind: NodeKind) -> NodeBuilder {
    NodeBuilder::new(id, kind)
  }

  /// A node that is never registered.
  pub fn placeholder(name: &str) -> Self {
    NodeBuilder::new(
      format!("{}:{}", PLACEHOLDER_ID_PREFIX, name),
      NodeKind::InterfaceDeclaration,
    )
    .build()
  }

  pub fn is_placeholder(&self) -> bool {
    self.id.starts_with(PLACEHOLDER_ID_PREFIX)
  }

  pub fn has_meta(&self, tag: MetaTag) -> bool {
    self.meta.contains(&tag)
  }

  /// Rewrites `from` to `to` at the start of this member's id and name.
  /// Only whole dotted segments are replaced, so `Array` never matches
  /// `ArrayBuffer`. Type positions keep the names they were declared with.
  pub fn change_prefix(&mut self, from: &str, to: &str) {
    if from == to {
      return;
    }
    if let Some(id) = replace_prefix(&self.id, from, to) {
      self.id = id;
    }
    if let Some(name) = replace_prefix(&self.name, from, to) {
      self.name = name;
    }
  }
}

fn replace_prefix(value: &str, from: &str, to: &str) -> Option<String> {
  let rest = value.strip_prefix(from)?;
  if rest.is_empty() || rest.starts_with('.') {
    Some(format!("{}{}", to, rest))
  } else {
    None
  }
}

/// Builds a [`NormalizedNode`] in one expression.
#[derive(Debug)]
pub struct NodeBuilder {
  node: NormalizedNode,
}

impl NodeBuilder {
  pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
    Self {
      node: NormalizedNode {
        id: id.into(),
        kind,
        name: String::new(),
        returns: Vec::new(),
        params: Vec::new(),
        generics: Vec::new(),
        text: None,
        meta: BTreeSet::new(),
      },
    }
  }

  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.node.name = name.into();
    self
  }

  pub fn returns(mut self, returns: Vec<NormalizedNode>) -> Self {
    self.node.returns = returns;
    self
  }

  pub fn maybe_return(mut self, ret: Option<NormalizedNode>) -> Self {
    self.node.returns.extend(ret);
    self
  }

  pub fn params(mut self, params: Vec<NormalizedNode>) -> Self {
    self.node.params = params;
    self
  }

  pub fn generics(mut self, generics: Vec<NormalizedNode>) -> Self {
    self.node.generics = generics;
    self
  }

  pub fn text(mut self, text: impl Into<String>) -> Self {
    self.node.text = Some(text.into());
    self
  }

  pub fn meta(mut self, tag: MetaTag) -> Self {
    self.node.meta.insert(tag);
    self
  }

  pub fn meta_if(self, condition: bool, tag: MetaTag) -> Self {
    if condition {
      self.meta(tag)
    } else {
      self
    }
  }

  pub fn maybe_meta(self, tag: Option<MetaTag>) -> Self {
    match tag {
      Some(tag) => self.meta(tag),
      None => self,
    }
  }

  pub fn build(self) -> NormalizedNode {
    self.node
  }
}

/// Hands out synthetic `_<n>` ids.
///
/// One generator is used per registered member so the same declaration
/// always resolves to the same ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
  next: usize,
}

impl IdGenerator {
  pub fn next_id(&mut self) -> String {
    let id = format!("_{}", self.next);
    self.next += 1;
    id
  }
}
