// Copyright 2018-2024 the Deno authors. MIT license.

use deno_ast::swc::ast::Accessibility;
use deno_ast::swc::ast::TruePlusMinus;
use deno_ast::swc::ast::TsKeywordTypeKind;
use deno_ast::swc::ast::TsTypeOperatorOp;
use serde::Serialize;
use serde::Serializer;

/// A boolean flag attached to a resolved node. Presence means `true`.
///
/// The variant order is the order tags are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaTag {
  Static,
  Readonly,
  Optional,
  Rest,
  Extends,
  Default,
  Abstract,
  Asserts,
  Public,
  Private,
  Protected,
  /// Ambient `declare` modifier. Not emitted.
  Declare,
}

impl MetaTag {
  /// The stable string tag written to the catalog, if any.
  pub fn as_str(&self) -> Option<&'static str> {
    match self {
      MetaTag::Static => Some("static"),
      MetaTag::Readonly => Some("readonly"),
      MetaTag::Optional => Some("optional"),
      MetaTag::Rest => Some("rest"),
      MetaTag::Extends => Some("extends"),
      MetaTag::Default => Some("default"),
      MetaTag::Abstract => Some("abstract"),
      MetaTag::Asserts => Some("asserts"),
      MetaTag::Public => Some("public"),
      MetaTag::Private => Some("private"),
      MetaTag::Protected => Some("protected"),
      MetaTag::Declare => None,
    }
  }

  pub fn from_accessibility(accessibility: Accessibility) -> Self {
    match accessibility {
      Accessibility::Public => MetaTag::Public,
      Accessibility::Private => MetaTag::Private,
      Accessibility::Protected => MetaTag::Protected,
    }
  }

  /// Mapped type modifiers only produce a tag when they add the modifier.
  pub fn from_mapped_modifier(
    modifier: Option<TruePlusMinus>,
    tag: MetaTag,
  ) -> Option<Self> {
    match modifier {
      Some(TruePlusMinus::True) | Some(TruePlusMinus::Plus) => Some(tag),
      Some(TruePlusMinus::Minus) | None => None,
    }
  }
}

/// The structural category of a resolved node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
  // type nodes
  ArrayType,
  UnionType,
  IntersectionType,
  TupleType,
  MappedType,
  ConditionalType,
  IndexedAccessType,
  TypeOperator,
  TypeLiteral,
  FunctionType,
  ConstructorType,
  TypeReference,
  TypeQuery,
  TypePredicate,
  TemplateLiteralType,
  InferType,
  ImportType,
  LiteralType,
  ThisType,
  Identifier,
  Parameter,
  TypeParameter,
  // members
  PropertySignature,
  MethodSignature,
  IndexSignature,
  ConstructSignature,
  CallSignature,
  GetAccessor,
  SetAccessor,
  Constructor,
  PropertyDeclaration,
  MethodDeclaration,
  // declarations
  FunctionDeclaration,
  VariableDeclaration,
  InterfaceDeclaration,
  ModuleDeclaration,
  ClassDeclaration,
  // tokens
  Keyword(KeywordKind),
  Unknown,
}

impl NodeKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      NodeKind::ArrayType => "ArrayType",
      NodeKind::UnionType => "UnionType",
      NodeKind::IntersectionType => "IntersectionType",
      NodeKind::TupleType => "TupleType",
      NodeKind::MappedType => "MappedType",
      NodeKind::ConditionalType => "ConditionalType",
      NodeKind::IndexedAccessType => "IndexedAccessType",
      NodeKind::TypeOperator => "TypeOperator",
      NodeKind::TypeLiteral => "TypeLiteral",
      NodeKind::FunctionType => "FunctionType",
      NodeKind::ConstructorType => "ConstructorType",
      NodeKind::TypeReference => "TypeReference",
      NodeKind::TypeQuery => "TypeQuery",
      NodeKind::TypePredicate => "TypePredicate",
      NodeKind::TemplateLiteralType => "TemplateLiteralType",
      NodeKind::InferType => "InferType",
      NodeKind::ImportType => "ImportType",
      NodeKind::LiteralType => "LiteralType",
      NodeKind::ThisType => "ThisType",
      NodeKind::Identifier => "Identifier",
      NodeKind::Parameter => "Parameter",
      NodeKind::TypeParameter => "TypeParameter",
      NodeKind::PropertySignature => "PropertySignature",
      NodeKind::MethodSignature => "MethodSignature",
      NodeKind::IndexSignature => "IndexSignature",
      NodeKind::ConstructSignature => "ConstructSignature",
      NodeKind::CallSignature => "CallSignature",
      NodeKind::GetAccessor => "GetAccessor",
      NodeKind::SetAccessor => "SetAccessor",
      NodeKind::Constructor => "Constructor",
      NodeKind::PropertyDeclaration => "PropertyDeclaration",
      NodeKind::MethodDeclaration => "MethodDeclaration",
      NodeKind::FunctionDeclaration => "FunctionDeclaration",
      NodeKind::VariableDeclaration => "VariableDeclaration",
      NodeKind::InterfaceDeclaration => "InterfaceDeclaration",
      NodeKind::ModuleDeclaration => "ModuleDeclaration",
      NodeKind::ClassDeclaration => "ClassDeclaration",
      NodeKind::Keyword(keyword) => keyword.kind_str(),
      NodeKind::Unknown => "Unknown",
    }
  }
}

impl Serialize for NodeKind {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
  Any,
  Unknown,
  Number,
  Object,
  Boolean,
  BigInt,
  String,
  Symbol,
  Void,
  Undefined,
  Null,
  Never,
  Intrinsic,
}

impl KeywordKind {
  fn kind_str(&self) -> &'static str {
    match self {
      KeywordKind::Any => "AnyKeyword",
      KeywordKind::Unknown => "UnknownKeyword",
      KeywordKind::Number => "NumberKeyword",
      KeywordKind::Object => "ObjectKeyword",
      KeywordKind::Boolean => "BooleanKeyword",
      KeywordKind::BigInt => "BigIntKeyword",
      KeywordKind::String => "StringKeyword",
      KeywordKind::Symbol => "SymbolKeyword",
      KeywordKind::Void => "VoidKeyword",
      KeywordKind::Undefined => "UndefinedKeyword",
      KeywordKind::Null => "NullKeyword",
      KeywordKind::Never => "NeverKeyword",
      KeywordKind::Intrinsic => "IntrinsicKeyword",
    }
  }

  /// The keyword as written in source.
  pub fn text(&self) -> &'static str {
    match self {
      KeywordKind::Any => "any",
      KeywordKind::Unknown => "unknown",
      KeywordKind::Number => "number",
      KeywordKind::Object => "object",
      KeywordKind::Boolean => "boolean",
      KeywordKind::BigInt => "bigint",
      KeywordKind::String => "string",
      KeywordKind::Symbol => "symbol",
      KeywordKind::Void => "void",
      KeywordKind::Undefined => "undefined",
      KeywordKind::Null => "null",
      KeywordKind::Never => "never",
      KeywordKind::Intrinsic => "intrinsic",
    }
  }
}

impl From<TsKeywordTypeKind> for KeywordKind {
  fn from(kind: TsKeywordTypeKind) -> Self {
    match kind {
      TsKeywordTypeKind::TsAnyKeyword => KeywordKind::Any,
      TsKeywordTypeKind::TsUnknownKeyword => KeywordKind::Unknown,
      TsKeywordTypeKind::TsNumberKeyword => KeywordKind::Number,
      TsKeywordTypeKind::TsObjectKeyword => KeywordKind::Object,
      TsKeywordTypeKind::TsBooleanKeyword => KeywordKind::Boolean,
      TsKeywordTypeKind::TsBigIntKeyword => KeywordKind::BigInt,
      TsKeywordTypeKind::TsStringKeyword => KeywordKind::String,
      TsKeywordTypeKind::TsSymbolKeyword => KeywordKind::Symbol,
      TsKeywordTypeKind::TsVoidKeyword => KeywordKind::Void,
      TsKeywordTypeKind::TsUndefinedKeyword => KeywordKind::Undefined,
      TsKeywordTypeKind::TsNullKeyword => KeywordKind::Null,
      TsKeywordTypeKind::TsNeverKeyword => KeywordKind::Never,
      TsKeywordTypeKind::TsIntrinsicKeyword => KeywordKind::Intrinsic,
    }
  }
}

pub fn type_operator_text(op: TsTypeOperatorOp) -> &'static str {
  match op {
    TsTypeOperatorOp::KeyOf => "keyof",
    TsTypeOperatorOp::Unique => "unique",
    TsTypeOperatorOp::ReadOnly => "readonly",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hidden_tags_have_no_string() {
    assert_eq!(MetaTag::Declare.as_str(), None);
    assert_eq!(MetaTag::Rest.as_str(), Some("rest"));
  }

  #[test]
  fn keyword_kinds() {
    let kind = NodeKind::Keyword(TsKeywordTypeKind::TsStringKeyword.into());
    assert_eq!(kind.as_str(), "StringKeyword");
    assert_eq!(KeywordKind::BigInt.text(), "bigint");
  }

  #[test]
  fn mapped_modifiers() {
    assert_eq!(
      MetaTag::from_mapped_modifier(Some(TruePlusMinus::Plus), MetaTag::Optional),
      Some(MetaTag::Optional)
    );
    assert_eq!(
      MetaTag::from_mapped_modifier(
        Some(TruePlusMinus::Minus),
        MetaTag::Readonly
      ),
      None
    );
  }
}
