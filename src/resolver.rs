// Copyright 2018-2024 the Deno authors. MIT license.

use std::collections::HashSet;
use std::fmt;

use deno_ast::swc::ast::ClassDecl;
use deno_ast::swc::ast::ClassMember;
use deno_ast::swc::ast::Decl;
use deno_ast::swc::ast::FnDecl;
use deno_ast::swc::ast::MethodKind;
use deno_ast::swc::ast::Pat;
use deno_ast::swc::ast::Stmt;
use deno_ast::swc::ast::TsInterfaceDecl;
use deno_ast::swc::ast::TsModuleBlock;
use deno_ast::swc::ast::TsModuleDecl;
use deno_ast::swc::ast::TsType;
use deno_ast::swc::ast::TsTypeElement;
use deno_ast::swc::ast::VarDecl;
use deno_ast::swc::ast::VarDeclKind;
use deno_ast::LineAndColumnDisplay;
use deno_ast::ModuleItemRef;
use deno_ast::ModuleSpecifier;
use deno_ast::SourcePos;
use deno_ast::SourceRangedForSpanned;
use deno_ast::SourceTextInfo;
use deno_error::JsError;
use indexmap::IndexSet;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::cache::DeclarationCache;
use crate::corpus::SourceCorpus;
use crate::corpus::SourceFile;
use crate::meta::MetaTag;
use crate::meta::NodeKind;
use crate::node::format_name;
use crate::node::NodeBuilder;
use crate::node::NormalizedNode;
use crate::registry::GlobalRegistry;
use crate::swc_helpers::expr_entity_text;
use crate::swc_helpers::global_augmentation_block;
use crate::swc_helpers::item_decl;
use crate::swc_helpers::module_item_ref;
use crate::swc_helpers::namespace_block;
use crate::swc_helpers::prop_name_text;
use crate::swc_helpers::simple_type_name;
use crate::type_resolver::with_meta;
use crate::type_resolver::TypeResolver;
use crate::type_resolver::CONSTRUCT_SIGNATURE_NAME;
use crate::GlobalsOptions;

const OBJECT_INTERFACE: &str = "Object";
const OBJECT_CONSTRUCTOR_INTERFACE: &str = "ObjectConstructor";
const PROTOTYPE: &str = "prototype";

#[derive(Debug, Clone, Error, JsError)]
pub enum ResolveError {
  #[class(type)]
  #[error("Cannot resolve a {kind} without a qualifying name.")]
  MissingPrefix { kind: &'static str },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GlobalsDiagnosticKind {
  UnsupportedStatement,
}

/// A recoverable problem found while resolving the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalsDiagnostic {
  pub kind: GlobalsDiagnosticKind,
  pub specifier: ModuleSpecifier,
  pub line_and_column: LineAndColumnDisplay,
}

impl fmt::Display for GlobalsDiagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let message = match self.kind {
      GlobalsDiagnosticKind::UnsupportedStatement => "Unsupported statement",
    };
    write!(
      f,
      "{} at {}:{}:{}",
      message,
      self.specifier,
      self.line_and_column.line_number,
      self.line_and_column.column_number
    )
  }
}

/// Which facet of a global an interface describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceRole {
  /// The interface is both the binding's name and its type, as in
  /// `declare var Math: Math`. Members live on the binding itself.
  Static,
  /// The interface shares the binding's name. Members live on the
  /// prototype.
  Instance,
  /// The interface is the binding's declared type. Construct and call
  /// signatures make the binding callable.
  Constructor,
}

impl InterfaceRole {
  /// All three names are fully qualified.
  pub fn classify(
    interface_name: &str,
    binding_name: &str,
    type_name: Option<&str>,
  ) -> Option<Self> {
    let is_binding = binding_name == interface_name;
    let is_type = type_name == Some(interface_name);
    match (is_binding, is_type) {
      (true, true) => Some(InterfaceRole::Static),
      (true, false) => Some(InterfaceRole::Instance),
      (false, true) => Some(InterfaceRole::Constructor),
      (false, false) => None,
    }
  }

  pub fn prefix(&self, binding_name: &str) -> String {
    match self {
      InterfaceRole::Instance => format_name(PROTOTYPE, binding_name),
      InterfaceRole::Static | InterfaceRole::Constructor => {
        binding_name.to_string()
      }
    }
  }

  pub fn is_static_side(&self) -> bool {
    !matches!(self, InterfaceRole::Instance)
  }
}

/// Resolves a single interface member under `prefix`.
///
/// Call and construct signatures name themselves after the prefix, so an
/// empty prefix is an error for them.
pub fn resolve_member(
  text_info: &SourceTextInfo,
  element: &TsTypeElement,
  prefix: &str,
  is_static: bool,
) -> Result<NormalizedNode, ResolveError> {
  if prefix.is_empty() {
    match element {
      TsTypeElement::TsCallSignatureDecl(_) => {
        return Err(ResolveError::MissingPrefix {
          kind: "call signature",
        });
      }
      TsTypeElement::TsConstructSignatureDecl(_) => {
        return Err(ResolveError::MissingPrefix {
          kind: "construct signature",
        });
      }
      _ => {}
    }
  }
  let node = TypeResolver::new(text_info).resolve_type_element(element, prefix);
  Ok(if is_static {
    with_meta(node, MetaTag::Static)
  } else {
    node
  })
}

/// Walks every declaration in the corpus and registers the globals it
/// declares.
pub struct DeclarationResolver<'a> {
  corpus: &'a SourceCorpus,
  cache: &'a DeclarationCache<'a>,
  options: &'a GlobalsOptions,
  registry: GlobalRegistry,
  diagnostics: Vec<GlobalsDiagnostic>,
  resolved_interfaces: HashSet<(String, String)>,
}

impl<'a> DeclarationResolver<'a> {
  pub fn new(
    corpus: &'a SourceCorpus,
    cache: &'a DeclarationCache<'a>,
    options: &'a GlobalsOptions,
  ) -> Self {
    Self {
      corpus,
      cache,
      options,
      registry: GlobalRegistry::default(),
      diagnostics: Vec::new(),
      resolved_interfaces: HashSet::new(),
    }
  }

  pub fn resolve_corpus(
    mut self,
  ) -> Result<(GlobalRegistry, Vec<GlobalsDiagnostic>), ResolveError> {
    let corpus = self.corpus;
    for file in corpus.files() {
      log::debug!("Resolving globals in {}", file.specifier());
      for item in file.items() {
        self.resolve_item(file, item, "")?;
      }
    }
    Ok((self.registry, self.diagnostics))
  }

  fn resolve_item(
    &mut self,
    file: &'a SourceFile,
    item: ModuleItemRef<'a>,
    prefix: &str,
  ) -> Result<(), ResolveError> {
    let Some(decl) = item_decl(item) else {
      if !matches!(item, ModuleItemRef::Stmt(Stmt::Empty(_))) {
        self.add_unsupported(file, item_start(item));
      }
      return Ok(());
    };
    match decl {
      Decl::Fn(fn_decl) => {
        self.resolve_function(file, fn_decl, prefix);
        Ok(())
      }
      Decl::Var(var_decl) => self.resolve_variable(file, var_decl, prefix),
      Decl::TsInterface(interface) => {
        self.resolve_interface_statement(interface, prefix)
      }
      Decl::TsModule(module) => self.resolve_module(file, module, prefix),
      Decl::Class(class_decl) => {
        self.resolve_class(file, class_decl, prefix);
        Ok(())
      }
      Decl::TsTypeAlias(alias) => {
        log::debug!("Skipping type alias {}", alias.id.sym);
        Ok(())
      }
      Decl::TsEnum(_) | Decl::Using(_) => {
        self.add_unsupported(file, item_start(item));
        Ok(())
      }
    }
  }

  fn resolve_block(
    &mut self,
    file: &'a SourceFile,
    block: &'a TsModuleBlock,
    prefix: &str,
  ) -> Result<(), ResolveError> {
    for item in &block.body {
      self.resolve_item(file, module_item_ref(item), prefix)?;
    }
    Ok(())
  }

  fn add_unsupported(&mut self, file: &SourceFile, pos: SourcePos) {
    let diagnostic = GlobalsDiagnostic {
      kind: GlobalsDiagnosticKind::UnsupportedStatement,
      specifier: file.specifier().clone(),
      line_and_column: file.line_and_column(pos),
    };
    log::warn!("{}", diagnostic);
    self.diagnostics.push(diagnostic);
  }

  fn resolve_function(
    &mut self,
    file: &SourceFile,
    fn_decl: &FnDecl,
    prefix: &str,
  ) {
    let name = format_name(&fn_decl.ident.sym, prefix);
    if prefix.is_empty() && !self.cache.is_known_binding(&name) {
      log::debug!("Skipping untyped function {}", name);
      return;
    }
    let function = &fn_decl.function;
    let mut resolver = TypeResolver::new(file.text_info());
    let generics = resolver.resolve_type_params(function.type_params.as_deref());
    let params = function
      .params
      .iter()
      .map(|param| resolver.resolve_pat_param(&param.pat))
      .collect();
    let return_type =
      resolver.resolve_type_ann(function.return_type.as_deref());
    self.registry.save(
      NodeBuilder::new(name.clone(), NodeKind::FunctionDeclaration)
        .name(name)
        .generics(generics)
        .params(params)
        .maybe_return(return_type)
        .meta_if(fn_decl.declare, MetaTag::Declare)
        .build(),
    );
  }

  fn resolve_variable(
    &mut self,
    file: &SourceFile,
    var_decl: &VarDecl,
    prefix: &str,
  ) -> Result<(), ResolveError> {
    for declarator in &var_decl.decls {
      let Pat::Ident(ident) = &declarator.name else {
        log::debug!("Skipping destructured variable declaration");
        continue;
      };
      let binding = format_name(&ident.id.sym, prefix);
      let ty = ident.type_ann.as_deref().map(|ann| &*ann.type_ann);
      if self.resolve_variable_interfaces(file, &binding, ty, prefix)? {
        continue;
      }
      let mut resolver = TypeResolver::new(file.text_info());
      let ty = ty.map(|ty| resolver.resolve_type(ty));
      self.registry.save(
        NodeBuilder::new(binding.clone(), NodeKind::VariableDeclaration)
          .name(binding)
          .maybe_return(ty)
          .meta_if(var_decl.kind == VarDeclKind::Const, MetaTag::Readonly)
          .meta_if(var_decl.declare, MetaTag::Declare)
          .build(),
      );
    }
    Ok(())
  }

  /// Resolves the interfaces describing a variable. Returns `false` when
  /// none do, in which case the variable is registered as a leaf.
  fn resolve_variable_interfaces(
    &mut self,
    file: &SourceFile,
    binding: &str,
    ty: Option<&TsType>,
    prefix: &str,
  ) -> Result<bool, ResolveError> {
    let Some(ty) = ty else {
      return Ok(false);
    };
    if matches!(ty, TsType::TsKeywordType(_)) {
      return Ok(false);
    }
    let type_name = simple_type_name(ty);
    let mut resolved = false;

    if self.cache.has_interface(binding) {
      if let Some(role) =
        self.classify(binding, binding, type_name.as_deref())
      {
        self.resolve_interface(binding, role, binding)?;
        resolved = true;
      }
    }

    let type_interface = type_name
      .as_deref()
      .and_then(|type_name| self.cache.resolve_interface_name(type_name, prefix));
    if let Some(type_interface) = &type_interface {
      if type_interface != binding {
        if let Some(role) = self.classify(
          type_interface,
          binding,
          type_name.as_deref(),
        ) {
          self.resolve_interface(type_interface, role, binding)?;
          resolved = true;
        }
      }
      if !self.cache.has_interface(binding)
        && self.cache.is_constructor_type(type_interface)
      {
        for instance in self.constructed_interfaces(type_interface) {
          if instance != binding {
            self.resolve_interface(&instance, InterfaceRole::Instance, binding)?;
          }
        }
      }
    }

    // declare var X: { prototype: X; new(): X; }
    if let TsType::TsTypeLit(literal) = ty {
      for element in &literal.members {
        let node = resolve_member(file.text_info(), element, binding, true)?;
        self.registry.save(node);
      }
      resolved = true;
    }

    Ok(resolved)
  }

  /// Classifies an interface against a binding once the binding's declared
  /// type is qualified from the binding's scope.
  fn classify(
    &self,
    interface_name: &str,
    binding: &str,
    type_name: Option<&str>,
  ) -> Option<InterfaceRole> {
    let type_name = type_name.map(|type_name| {
      self
        .cache
        .resolve_interface_name(type_name, parent_scope(binding))
        .unwrap_or_else(|| type_name.to_string())
    });
    InterfaceRole::classify(interface_name, binding, type_name.as_deref())
  }

  /// Interfaces named as the return type of a constructor interface's
  /// construct signatures.
  fn constructed_interfaces(&self, constructor_interface: &str) -> IndexSet<String> {
    let scope = parent_scope(constructor_interface);
    let mut names = IndexSet::new();
    for (_, interface) in self.cache.interfaces(constructor_interface) {
      for element in &interface.body.body {
        let TsTypeElement::TsConstructSignatureDecl(construct) = element else {
          continue;
        };
        let name = construct
          .type_ann
          .as_deref()
          .and_then(|ann| simple_type_name(&ann.type_ann))
          .and_then(|name| self.cache.resolve_interface_name(&name, scope));
        if let Some(name) = name {
          names.insert(name);
        }
      }
    }
    names
  }

  fn resolve_interface_statement(
    &mut self,
    interface: &TsInterfaceDecl,
    prefix: &str,
  ) -> Result<(), ResolveError> {
    let name = format_name(&interface.id.sym, prefix);
    let Some(binding) = self.cache.binding_for_interface(&name) else {
      log::debug!("Skipping interface {} with no global binding", name);
      return Ok(());
    };
    match self.classify(
      &name,
      &binding.name,
      binding.type_name.as_deref(),
    ) {
      Some(role) => self.resolve_interface(&name, role, &binding.name),
      None => {
        log::debug!("Interface {} does not describe {}", name, binding.name);
        self.registry.save(NormalizedNode::placeholder(&name));
        Ok(())
      }
    }
  }

  /// Registers the members of every declaration of `interface_name`, plus
  /// inherited ones, for the given binding.
  fn resolve_interface(
    &mut self,
    interface_name: &str,
    role: InterfaceRole,
    binding: &str,
  ) -> Result<(), ResolveError> {
    let key = (interface_name.to_string(), binding.to_string());
    if !self.resolved_interfaces.insert(key) {
      return Ok(());
    }
    log::debug!(
      "Resolving interface {} as {:?} side of {}",
      interface_name,
      role,
      binding
    );
    let prefix = role.prefix(binding);
    let mut visited = HashSet::from([interface_name.to_string()]);
    let mut members =
      self.interface_members(interface_name, role, &prefix, &mut visited)?;
    if self.options.include_object_heritage
      && interface_name != OBJECT_INTERFACE
      && interface_name != OBJECT_CONSTRUCTOR_INTERFACE
      && self.cache.has_interface(OBJECT_INTERFACE)
      && visited.insert(OBJECT_INTERFACE.to_string())
    {
      members.extend(self.inherited_members(
        OBJECT_INTERFACE,
        role,
        &prefix,
        &mut visited,
      )?);
    }
    for member in members {
      self.registry.save(member);
    }
    Ok(())
  }

  fn interface_members(
    &self,
    interface_name: &str,
    role: InterfaceRole,
    prefix: &str,
    visited: &mut HashSet<String>,
  ) -> Result<Vec<NormalizedNode>, ResolveError> {
    let scope = parent_scope(interface_name);
    let mut members = Vec::new();
    for (file_id, interface) in self.cache.interfaces(interface_name) {
      let Some(file) = self.corpus.file(file_id) else {
        continue;
      };
      for element in &interface.body.body {
        members.push(resolve_member(
          file.text_info(),
          element,
          prefix,
          role.is_static_side(),
        )?);
      }
      for heritage in &interface.extends {
        let Some(parent) = expr_entity_text(&heritage.expr) else {
          continue;
        };
        let Some(parent) = self.cache.resolve_interface_name(&parent, scope)
        else {
          log::debug!("Unknown parent {} of {}", parent, interface_name);
          continue;
        };
        if visited.insert(parent.clone()) {
          members.extend(self.inherited_members(
            &parent, role, prefix, visited,
          )?);
        }
      }
    }
    Ok(members)
  }

  /// Resolves a parent interface under its own prefix and moves the
  /// results to the child's prefix.
  fn inherited_members(
    &self,
    parent: &str,
    role: InterfaceRole,
    child_prefix: &str,
    visited: &mut HashSet<String>,
  ) -> Result<Vec<NormalizedNode>, ResolveError> {
    let parent_prefix = role.prefix(parent);
    let mut members =
      self.interface_members(parent, role, &parent_prefix, visited)?;
    for member in &mut members {
      member.change_prefix(&parent_prefix, child_prefix);
    }
    Ok(members)
  }

  fn resolve_module(
    &mut self,
    file: &'a SourceFile,
    module: &'a TsModuleDecl,
    prefix: &str,
  ) -> Result<(), ResolveError> {
    if let Some(block) = global_augmentation_block(module) {
      return self.resolve_block(file, block, prefix);
    }
    let Some(namespace) = namespace_block(module) else {
      log::debug!("Skipping ambient module declaration");
      return Ok(());
    };
    let mut name = prefix.to_string();
    for part in &namespace.names {
      name = format_name(part, &name);
      if self.options.include_namespace_nodes {
        self.registry.save(
          NodeBuilder::new(name.clone(), NodeKind::ModuleDeclaration)
            .name(name.clone())
            .meta_if(module.declare, MetaTag::Declare)
            .build(),
        );
      }
    }
    self.resolve_block(file, namespace.block, &name)
  }

  fn resolve_class(
    &mut self,
    file: &SourceFile,
    class_decl: &ClassDecl,
    prefix: &str,
  ) {
    let name = format_name(&class_decl.ident.sym, prefix);
    let class = &class_decl.class;
    let text_info = file.text_info();
    let mut resolver = TypeResolver::new(text_info);
    let generics = resolver.resolve_type_params(class.type_params.as_deref());
    let super_class = class
      .super_class
      .as_deref()
      .and_then(expr_entity_text)
      .map(|super_name| {
        let generics =
          resolver.resolve_type_args(class.super_type_params.as_deref());
        NodeBuilder::new(super_name.clone(), NodeKind::TypeReference)
          .name(super_name)
          .generics(generics)
          .meta(MetaTag::Extends)
          .build()
      });
    self.registry.save(
      NodeBuilder::new(name.clone(), NodeKind::ClassDeclaration)
        .name(name.clone())
        .generics(generics)
        .maybe_return(super_class)
        .meta_if(class.is_abstract, MetaTag::Abstract)
        .meta_if(class_decl.declare, MetaTag::Declare)
        .build(),
    );
    for member in &class.body {
      if let Some(node) = resolve_class_member(text_info, member, &name) {
        self.registry.save(node);
      }
    }
  }
}

fn resolve_class_member(
  text_info: &SourceTextInfo,
  member: &ClassMember,
  class_name: &str,
) -> Option<NormalizedNode> {
  let mut resolver = TypeResolver::new(text_info);
  match member {
    ClassMember::Constructor(ctor) => {
      let name = format_name(CONSTRUCT_SIGNATURE_NAME, class_name);
      let params = ctor
        .params
        .iter()
        .map(|param| resolver.resolve_constructor_param(param))
        .collect();
      Some(
        NodeBuilder::new(name.clone(), NodeKind::Constructor)
          .name(name)
          .params(params)
          .maybe_meta(ctor.accessibility.map(MetaTag::from_accessibility))
          .build(),
      )
    }
    ClassMember::Method(method) => {
      let prefix = class_member_prefix(class_name, method.is_static);
      let name = format_name(&prop_name_text(&method.key, text_info), &prefix);
      let kind = match method.kind {
        MethodKind::Method => NodeKind::MethodDeclaration,
        MethodKind::Getter => NodeKind::GetAccessor,
        MethodKind::Setter => NodeKind::SetAccessor,
      };
      let function = &method.function;
      let generics =
        resolver.resolve_type_params(function.type_params.as_deref());
      let params = function
        .params
        .iter()
        .map(|param| resolver.resolve_pat_param(&param.pat))
        .collect();
      let return_type =
        resolver.resolve_type_ann(function.return_type.as_deref());
      Some(
        NodeBuilder::new(name.clone(), kind)
          .name(name)
          .generics(generics)
          .params(params)
          .maybe_return(return_type)
          .meta_if(method.is_static, MetaTag::Static)
          .meta_if(method.is_optional, MetaTag::Optional)
          .meta_if(method.is_abstract, MetaTag::Abstract)
          .maybe_meta(method.accessibility.map(MetaTag::from_accessibility))
          .build(),
      )
    }
    ClassMember::ClassProp(prop) => {
      let prefix = class_member_prefix(class_name, prop.is_static);
      let name = format_name(&prop_name_text(&prop.key, text_info), &prefix);
      let ty = resolver.resolve_type_ann(prop.type_ann.as_deref());
      Some(
        NodeBuilder::new(name.clone(), NodeKind::PropertyDeclaration)
          .name(name)
          .maybe_return(ty)
          .meta_if(prop.is_static, MetaTag::Static)
          .meta_if(prop.readonly, MetaTag::Readonly)
          .meta_if(prop.is_optional, MetaTag::Optional)
          .meta_if(prop.is_abstract, MetaTag::Abstract)
          .maybe_meta(prop.accessibility.map(MetaTag::from_accessibility))
          .meta_if(prop.declare, MetaTag::Declare)
          .build(),
      )
    }
    ClassMember::TsIndexSignature(index) => Some(resolver.index_signature(
      index,
      &class_member_prefix(class_name, index.is_static),
    )),
    ClassMember::PrivateMethod(_)
    | ClassMember::PrivateProp(_)
    | ClassMember::StaticBlock(_)
    | ClassMember::AutoAccessor(_)
    | ClassMember::Empty(_) => None,
  }
}

fn class_member_prefix(class_name: &str, is_static: bool) -> String {
  if is_static {
    class_name.to_string()
  } else {
    format_name(PROTOTYPE, class_name)
  }
}

/// `Intl.Collator` is looked up from within `Intl`.
fn parent_scope(name: &str) -> &str {
  match name.rfind('.') {
    Some(index) => &name[..index],
    None => "",
  }
}

fn item_start(item: ModuleItemRef<'_>) -> SourcePos {
  match item {
    ModuleItemRef::ModuleDecl(decl) => decl.start(),
    ModuleItemRef::Stmt(stmt) => stmt.start(),
  }
}
