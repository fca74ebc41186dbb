// Copyright 2018-2024 the Deno authors. MIT license.

use deno_ast::swc::ast::Decl;
use deno_ast::swc::ast::Expr;
use deno_ast::swc::ast::Lit;
use deno_ast::swc::ast::MemberProp;
use deno_ast::swc::ast::ModuleDecl;
use deno_ast::swc::ast::ModuleItem;
use deno_ast::swc::ast::PropName;
use deno_ast::swc::ast::Stmt;
use deno_ast::swc::ast::TsEntityName;
use deno_ast::swc::ast::TsModuleBlock;
use deno_ast::swc::ast::TsModuleDecl;
use deno_ast::swc::ast::TsModuleName;
use deno_ast::swc::ast::TsNamespaceBody;
use deno_ast::swc::ast::TsQualifiedName;
use deno_ast::swc::ast::TsType;
use deno_ast::ModuleItemRef;
use deno_ast::SourceRangedForSpanned;
use deno_ast::SourceTextInfo;

use crate::meta::KeywordKind;

pub fn module_item_ref(item: &ModuleItem) -> ModuleItemRef<'_> {
  match item {
    ModuleItem::ModuleDecl(decl) => ModuleItemRef::ModuleDecl(decl),
    ModuleItem::Stmt(stmt) => ModuleItemRef::Stmt(stmt),
  }
}

/// The declaration held by a statement, unwrapping `export`.
pub fn item_decl(item: ModuleItemRef<'_>) -> Option<&Decl> {
  match item {
    ModuleItemRef::Stmt(Stmt::Decl(decl)) => Some(decl),
    ModuleItemRef::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
      Some(&export.decl)
    }
    _ => None,
  }
}

/// A namespace declaration with its dotted name parts flattened, so
/// `namespace A.B {}` yields `["A", "B"]` and the innermost block.
pub struct NamespaceBlock<'a> {
  pub names: Vec<String>,
  pub block: &'a TsModuleBlock,
}

impl NamespaceBlock<'_> {
  pub fn qualified_name(&self) -> String {
    self.names.join(".")
  }
}

/// Returns `None` for string named ambient modules and bodiless
/// declarations, which do not contribute globals.
pub fn namespace_block(decl: &TsModuleDecl) -> Option<NamespaceBlock<'_>> {
  let TsModuleName::Ident(ident) = &decl.id else {
    return None;
  };
  let mut names = vec![ident.sym.to_string()];
  let mut body = decl.body.as_ref()?;
  loop {
    match body {
      TsNamespaceBody::TsModuleBlock(block) => {
        return Some(NamespaceBlock { names, block });
      }
      TsNamespaceBody::TsNamespaceDecl(decl) => {
        names.push(decl.id.sym.to_string());
        body = &decl.body;
      }
    }
  }
}

/// `declare global { }` block, whose children belong to the outer scope.
pub fn global_augmentation_block(decl: &TsModuleDecl) -> Option<&TsModuleBlock> {
  if !decl.global {
    return None;
  }
  match decl.body.as_ref()? {
    TsNamespaceBody::TsModuleBlock(block) => Some(block),
    TsNamespaceBody::TsNamespaceDecl(_) => None,
  }
}

pub fn ts_entity_name_text(entity_name: &TsEntityName) -> String {
  match entity_name {
    TsEntityName::TsQualifiedName(qualified_name) => {
      ts_qualified_name_parts(qualified_name).join(".")
    }
    TsEntityName::Ident(ident) => ident.sym.to_string(),
  }
}

pub fn ts_qualified_name_parts(
  mut qualified_name: &TsQualifiedName,
) -> Vec<String> {
  let mut parts = Vec::new();
  loop {
    parts.push(qualified_name.right.sym.to_string());
    match &qualified_name.left {
      TsEntityName::TsQualifiedName(n) => {
        qualified_name = n;
      }
      TsEntityName::Ident(n) => {
        parts.push(n.sym.to_string());
        parts.reverse();
        return parts;
      }
    }
  }
}

/// Dotted text of an `extends` clause expression such as `Intl.Collator`.
pub fn expr_entity_text(expr: &Expr) -> Option<String> {
  match expr {
    Expr::Ident(ident) => Some(ident.sym.to_string()),
    Expr::Member(member) => {
      let obj = expr_entity_text(&member.obj)?;
      match &member.prop {
        MemberProp::Ident(prop) => Some(format!("{}.{}", obj, prop.sym)),
        MemberProp::PrivateName(_) | MemberProp::Computed(_) => None,
      }
    }
    Expr::Paren(paren) => expr_entity_text(&paren.expr),
    _ => None,
  }
}

/// The name of a type member key. Computed keys keep their brackets,
/// so `[Symbol.iterator]` stays distinguishable from a `Symbol` member.
pub fn property_key_text(
  key: &Expr,
  computed: bool,
  text_info: &SourceTextInfo,
) -> String {
  if computed {
    return format!("[{}]", key.text_fast(text_info));
  }
  match key {
    Expr::Ident(ident) => ident.sym.to_string(),
    Expr::Lit(Lit::Str(_)) => {
      unquote(key.text_fast(text_info)).to_string()
    }
    _ => key.text_fast(text_info).to_string(),
  }
}

pub fn prop_name_text(name: &PropName, text_info: &SourceTextInfo) -> String {
  match name {
    PropName::Ident(ident) => ident.sym.to_string(),
    PropName::Str(_) => unquote(name.text_fast(text_info)).to_string(),
    PropName::Computed(computed) => {
      format!("[{}]", computed.expr.text_fast(text_info))
    }
    PropName::Num(_) | PropName::BigInt(_) => {
      name.text_fast(text_info).to_string()
    }
  }
}

fn unquote(text: &str) -> &str {
  text.trim_matches(|c| c == '"' || c == '\'')
}

/// The name recorded for a declared type: the referenced name for type
/// references, the keyword for keyword types, `None` for anything more
/// complex.
pub fn simple_type_name(ty: &TsType) -> Option<String> {
  match ty {
    TsType::TsTypeRef(type_ref) => {
      Some(ts_entity_name_text(&type_ref.type_name))
    }
    TsType::TsKeywordType(keyword) => {
      Some(KeywordKind::from(keyword.kind).text().to_string())
    }
    _ => None,
  }
}
