// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]

mod cache;
mod corpus;
mod meta;
mod node;
mod registry;
mod resolver;
mod serialize;
mod swc_helpers;
mod type_resolver;

use std::path::PathBuf;

use deno_error::JsError;
use indexmap::IndexMap;
use sys_traits::FsRead;
use thiserror::Error;

pub use cache::CachedBinding;
pub use cache::DeclarationCache;
pub use cache::COMPLEX_TYPE_NAME;
pub use corpus::load_corpus;
pub use corpus::DeclarationParser;
pub use corpus::DefaultDeclarationParser;
pub use corpus::FileId;
pub use corpus::LoadError;
pub use corpus::ParseOptions;
pub use corpus::SourceCorpus;
pub use corpus::SourceFile;
pub use deno_ast::MediaType;
pub use deno_ast::ModuleSpecifier;
pub use meta::KeywordKind;
pub use meta::MetaTag;
pub use meta::NodeKind;
pub use node::format_name;
pub use node::NodeBuilder;
pub use node::NormalizedNode;
pub use node::PLACEHOLDER_ID_PREFIX;
pub use registry::GlobalRegistry;
pub use resolver::resolve_member;
pub use resolver::DeclarationResolver;
pub use resolver::GlobalsDiagnostic;
pub use resolver::GlobalsDiagnosticKind;
pub use resolver::InterfaceRole;
pub use resolver::ResolveError;
pub use serialize::serialize;
pub use serialize::SerializedNode;
pub use type_resolver::TypeResolver;

#[derive(Debug, Clone)]
pub struct GlobalsOptions {
  /// Copy `Object`'s members onto every other interface that does not
  /// extend it explicitly.
  pub include_object_heritage: bool,
  /// Register a `ModuleDeclaration` entry for every namespace.
  pub include_namespace_nodes: bool,
}

impl Default for GlobalsOptions {
  fn default() -> Self {
    Self {
      include_object_heritage: true,
      include_namespace_nodes: true,
    }
  }
}

#[derive(Debug, Error, JsError)]
pub enum GlobalsError {
  #[class(inherit)]
  #[error(transparent)]
  Load(#[from] LoadError),
  #[class(inherit)]
  #[error(transparent)]
  Resolve(#[from] ResolveError),
}

/// The resolved globals catalog.
#[derive(Debug)]
pub struct Globals {
  registry: GlobalRegistry,
  diagnostics: Vec<GlobalsDiagnostic>,
}

impl Globals {
  pub fn registry(&self) -> &GlobalRegistry {
    &self.registry
  }

  /// Statements that were skipped because they declare nothing the catalog
  /// can describe.
  pub fn diagnostics(&self) -> &[GlobalsDiagnostic] {
    &self.diagnostics
  }

  pub fn to_serialized(&self) -> IndexMap<String, Vec<SerializedNode>> {
    self.registry.to_serialized()
  }

  pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(self.to_serialized())
  }

  pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&self.to_serialized())
  }
}

/// Builds the catalog for an already parsed corpus.
///
/// The declaration cache is fully populated before any declaration is
/// resolved.
pub fn build_globals(
  corpus: &SourceCorpus,
  options: &GlobalsOptions,
) -> Result<Globals, ResolveError> {
  let cache = DeclarationCache::new(corpus);
  let (registry, diagnostics) =
    DeclarationResolver::new(corpus, &cache, options).resolve_corpus()?;
  log::debug!(
    "Resolved {} globals with {} diagnostics",
    registry.len(),
    diagnostics.len()
  );
  Ok(Globals {
    registry,
    diagnostics,
  })
}

/// Reads and parses `paths` in order, then builds the catalog.
pub fn load_and_build<TSys: FsRead>(
  sys: &TSys,
  paths: &[PathBuf],
  options: &GlobalsOptions,
) -> Result<Globals, GlobalsError> {
  let corpus = load_corpus(sys, paths, &DefaultDeclarationParser)?;
  Ok(build_globals(&corpus, options)?)
}
