// Copyright 2018-2024 the Deno authors. MIT license.

use deno_ast::swc::ast::Decl;
use deno_ast::swc::ast::Pat;
use deno_ast::swc::ast::TsInterfaceDecl;
use deno_ast::swc::ast::TsModuleBlock;
use deno_ast::swc::ast::TsTypeElement;
use deno_ast::ModuleItemRef;
use indexmap::IndexMap;
use indexmap::IndexSet;

use crate::corpus::FileId;
use crate::corpus::SourceCorpus;
use crate::node::format_name;
use crate::swc_helpers::global_augmentation_block;
use crate::swc_helpers::item_decl;
use crate::swc_helpers::module_item_ref;
use crate::swc_helpers::namespace_block;
use crate::swc_helpers::simple_type_name;

/// Recorded as the declared type of bindings whose annotation is not a
/// plain type reference or keyword.
pub const COMPLEX_TYPE_NAME: &str = "__type";

#[derive(Debug, Clone, Copy)]
pub enum ContainerDecl<'a> {
  Interface(&'a TsInterfaceDecl),
  Namespace(&'a TsModuleBlock),
}

/// A container declaration along with the file that declared it.
#[derive(Debug, Clone, Copy)]
pub struct CachedContainer<'a> {
  pub file: FileId,
  pub decl: ContainerDecl<'a>,
}

/// The variable bound to an interface's name or type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedBinding {
  /// Qualified name of the variable.
  pub name: String,
  /// The variable's declared type name, if known.
  pub type_name: Option<String>,
}

/// Cross reference index over the whole corpus.
///
/// It is built by a single pass before any declaration is resolved,
/// because deciding the role of one interface can depend on variables
/// declared in any other file.
#[derive(Debug, Default)]
pub struct DeclarationCache<'a> {
  name_to_type: IndexMap<String, String>,
  type_to_name: IndexMap<String, String>,
  constructor_type_names: IndexSet<String>,
  containers_by_name: IndexMap<String, Vec<CachedContainer<'a>>>,
}

impl<'a> DeclarationCache<'a> {
  pub fn new(corpus: &'a SourceCorpus) -> Self {
    let mut cache = Self::default();
    for file in corpus.files() {
      for item in file.items() {
        cache.visit_item(file.id(), item, "");
      }
    }
    log::debug!(
      "Cached {} bindings and {} containers",
      cache.name_to_type.len(),
      cache.containers_by_name.len()
    );
    cache
  }

  fn visit_item(&mut self, file: FileId, item: ModuleItemRef<'a>, prefix: &str) {
    let Some(decl) = item_decl(item) else {
      return;
    };
    match decl {
      Decl::Fn(fn_decl) => {
        let name = format_name(&fn_decl.ident.sym, prefix);
        if let Some(return_type) = &fn_decl.function.return_type {
          let type_name = simple_type_name(&return_type.type_ann)
            .unwrap_or_else(|| COMPLEX_TYPE_NAME.to_string());
          self.name_to_type.insert(name, type_name);
        }
      }
      Decl::Var(var_decl) => {
        for declarator in &var_decl.decls {
          let Pat::Ident(binding) = &declarator.name else {
            continue;
          };
          let Some(type_ann) = &binding.type_ann else {
            continue;
          };
          let name = format_name(&binding.id.sym, prefix);
          match simple_type_name(&type_ann.type_ann) {
            Some(type_name) => {
              self
                .type_to_name
                .insert(format_name(&type_name, prefix), name.clone());
              self.name_to_type.insert(name, type_name);
            }
            None => {
              self
                .name_to_type
                .insert(name, COMPLEX_TYPE_NAME.to_string());
            }
          }
        }
      }
      Decl::TsInterface(interface) => {
        let name = format_name(&interface.id.sym, prefix);
        let has_construct_signature = interface
          .body
          .body
          .iter()
          .any(|m| matches!(m, TsTypeElement::TsConstructSignatureDecl(_)));
        if has_construct_signature {
          self.constructor_type_names.insert(name.clone());
        }
        self.push_container(name, file, ContainerDecl::Interface(interface));
      }
      Decl::TsModule(module) => {
        if let Some(block) = global_augmentation_block(module) {
          self.visit_block(file, block, prefix);
        } else if let Some(namespace) = namespace_block(module) {
          let name = format_name(&namespace.qualified_name(), prefix);
          self.push_container(
            name.clone(),
            file,
            ContainerDecl::Namespace(namespace.block),
          );
          self.visit_block(file, namespace.block, &name);
        }
      }
      Decl::Class(_)
      | Decl::TsTypeAlias(_)
      | Decl::TsEnum(_)
      | Decl::Using(_) => {}
    }
  }

  fn visit_block(&mut self, file: FileId, block: &'a TsModuleBlock, prefix: &str) {
    for item in &block.body {
      self.visit_item(file, module_item_ref(item), prefix);
    }
  }

  fn push_container(
    &mut self,
    name: String,
    file: FileId,
    decl: ContainerDecl<'a>,
  ) {
    self
      .containers_by_name
      .entry(name)
      .or_default()
      .push(CachedContainer { file, decl });
  }

  /// The declared type name of a variable or function.
  pub fn type_of(&self, name: &str) -> Option<&str> {
    self.name_to_type.get(name).map(|s| s.as_str())
  }

  /// The variable last declared with the given type.
  pub fn name_of_type(&self, type_name: &str) -> Option<&str> {
    self.type_to_name.get(type_name).map(|s| s.as_str())
  }

  pub fn is_known_binding(&self, name: &str) -> bool {
    self.name_to_type.contains_key(name)
  }

  pub fn is_constructor_type(&self, type_name: &str) -> bool {
    self.constructor_type_names.contains(type_name)
  }

  pub fn containers(&self, name: &str) -> &[CachedContainer<'a>] {
    self
      .containers_by_name
      .get(name)
      .map(|c| c.as_slice())
      .unwrap_or(&[])
  }

  /// Every interface declaration merged under the qualified name.
  pub fn interfaces(
    &self,
    name: &str,
  ) -> impl Iterator<Item = (FileId, &'a TsInterfaceDecl)> + '_ {
    self.containers(name).iter().filter_map(|c| match c.decl {
      ContainerDecl::Interface(interface) => Some((c.file, interface)),
      ContainerDecl::Namespace(_) => None,
    })
  }

  pub fn has_interface(&self, name: &str) -> bool {
    self.interfaces(name).next().is_some()
  }

  /// Resolves a type name written inside `scope` to the qualified name of
  /// an interface, searching from the innermost namespace outwards.
  pub fn resolve_interface_name(
    &self,
    name: &str,
    scope: &str,
  ) -> Option<String> {
    let mut scope = scope;
    loop {
      let candidate = format_name(name, scope);
      if self.has_interface(&candidate) {
        return Some(candidate);
      }
      if scope.is_empty() {
        return None;
      }
      scope = match scope.rfind('.') {
        Some(index) => &scope[..index],
        None => "",
      };
    }
  }

  /// The variable an interface describes: a variable with the same
  /// qualified name, otherwise a variable declared with the interface as
  /// its type.
  pub fn binding_for_interface(&self, name: &str) -> Option<CachedBinding> {
    if let Some(type_name) = self.name_to_type.get(name) {
      return Some(CachedBinding {
        name: name.to_string(),
        type_name: Some(type_name.clone()),
      });
    }
    let binding = self.type_to_name.get(name)?;
    Some(CachedBinding {
      name: binding.clone(),
      type_name: self.name_to_type.get(binding).cloned(),
    })
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::corpus::tests::corpus;

  const FROBNICATOR: &str = r#"
interface Frobnicator {
  frobnicate(a: number, b: number): number;
}
interface FrobnicatorConstructor {
  new(x: number): Frobnicator;
}
declare var Frobnicator: FrobnicatorConstructor;
"#;

  #[test]
  fn records_bindings_both_ways() {
    let corpus = corpus(&[("lib.d.ts", FROBNICATOR)]);
    let cache = DeclarationCache::new(&corpus);
    assert_eq!(cache.type_of("Frobnicator"), Some("FrobnicatorConstructor"));
    assert_eq!(
      cache.name_of_type("FrobnicatorConstructor"),
      Some("Frobnicator")
    );
    assert!(cache.is_constructor_type("FrobnicatorConstructor"));
    assert!(!cache.is_constructor_type("Frobnicator"));
    assert_eq!(cache.interfaces("Frobnicator").count(), 1);
  }

  #[test]
  fn merges_containers_across_files() {
    let corpus = corpus(&[
      ("lib.es5.d.ts", "interface Array<T> { length: number; }"),
      ("lib.es2015.d.ts", "interface Array<T> { find(): T; }"),
    ]);
    let cache = DeclarationCache::new(&corpus);
    let files = cache
      .interfaces("Array")
      .map(|(file, _)| file)
      .collect::<Vec<_>>();
    assert_eq!(files, vec![FileId(0), FileId(1)]);
  }

  #[test]
  fn qualifies_namespace_members() {
    let corpus = corpus(&[(
      "lib.d.ts",
      r#"
declare namespace Intl {
  interface Collator { compare(x: string, y: string): number; }
  interface CollatorConstructor { new(): Collator; }
  var Collator: CollatorConstructor;
  function getCanonicalLocales(locale?: string): string[];
}
declare namespace A.B {
  interface C {}
}
"#,
    )]);
    let cache = DeclarationCache::new(&corpus);
    assert_eq!(cache.type_of("Intl.Collator"), Some("CollatorConstructor"));
    assert_eq!(
      cache.name_of_type("Intl.CollatorConstructor"),
      Some("Intl.Collator")
    );
    assert!(cache.is_constructor_type("Intl.CollatorConstructor"));
    assert_eq!(cache.type_of("Intl.getCanonicalLocales"), Some("__type"));
    assert_eq!(cache.containers("Intl").len(), 1);
    assert!(cache.has_interface("A.B.C"));
    assert_eq!(
      cache.resolve_interface_name("CollatorConstructor", "Intl"),
      Some("Intl.CollatorConstructor".to_string())
    );
    assert_eq!(cache.resolve_interface_name("Missing", "Intl"), None);
  }

  #[test]
  fn complex_annotations_stay_out_of_reverse_map() {
    let corpus = corpus(&[(
      "lib.d.ts",
      r#"
declare var AbortController: { prototype: AbortController; new(): AbortController; };
declare var NaN: number;
declare function parseInt(string: string, radix?: number): number;
declare var untyped;
"#,
    )]);
    let cache = DeclarationCache::new(&corpus);
    assert_eq!(cache.type_of("AbortController"), Some(COMPLEX_TYPE_NAME));
    assert_eq!(cache.name_of_type(COMPLEX_TYPE_NAME), None);
    assert_eq!(cache.type_of("NaN"), Some("number"));
    assert_eq!(cache.name_of_type("number"), Some("NaN"));
    // functions never bind a value of their return type
    assert_eq!(cache.type_of("parseInt"), Some("number"));
    assert!(!cache.is_known_binding("untyped"));
  }

  #[test]
  fn finds_bindings_for_interfaces() {
    let corpus = corpus(&[("lib.d.ts", FROBNICATOR)]);
    let cache = DeclarationCache::new(&corpus);
    assert_eq!(
      cache.binding_for_interface("Frobnicator"),
      Some(CachedBinding {
        name: "Frobnicator".to_string(),
        type_name: Some("FrobnicatorConstructor".to_string()),
      })
    );
    assert_eq!(
      cache.binding_for_interface("FrobnicatorConstructor"),
      Some(CachedBinding {
        name: "Frobnicator".to_string(),
        type_name: Some("FrobnicatorConstructor".to_string()),
      })
    );
    assert_eq!(cache.binding_for_interface("Unrelated"), None);
  }
}
