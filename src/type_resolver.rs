// Copyright 2018-2024 the Deno authors. MIT license.

use deno_ast::swc::ast::*;
use deno_ast::SourceRangedForSpanned;
use deno_ast::SourceTextInfo;

use crate::meta::type_operator_text;
use crate::meta::KeywordKind;
use crate::meta::MetaTag;
use crate::meta::NodeKind;
use crate::node::format_name;
use crate::node::IdGenerator;
use crate::node::NodeBuilder;
use crate::node::NormalizedNode;
use crate::swc_helpers::property_key_text;
use crate::swc_helpers::ts_entity_name_text;

/// Name given to index signatures, which have no key of their own.
pub const INDEX_SIGNATURE_NAME: &str = "__index";
/// Name given to construct signatures.
pub const CONSTRUCT_SIGNATURE_NAME: &str = "new";

/// Resolves type-level syntax into [`NormalizedNode`] trees.
///
/// Resolution is total: every swc type node produces a node and nothing
/// panics. Shapes that can't be interpreted degrade to `Unknown` nodes.
/// The resolver never looks at other declarations.
pub struct TypeResolver<'a> {
  text_info: &'a SourceTextInfo,
  ids: IdGenerator,
}

impl<'a> TypeResolver<'a> {
  pub fn new(text_info: &'a SourceTextInfo) -> Self {
    Self {
      text_info,
      ids: IdGenerator::default(),
    }
  }

  pub fn next_id(&mut self) -> String {
    self.ids.next_id()
  }

  pub fn resolve_type(&mut self, ty: &TsType) -> NormalizedNode {
    match ty {
      TsType::TsKeywordType(keyword) => {
        let kind = KeywordKind::from(keyword.kind);
        NodeBuilder::new(self.next_id(), NodeKind::Keyword(kind))
          .text(kind.text())
          .build()
      }
      TsType::TsThisType(_) => NodeBuilder::new(self.next_id(), NodeKind::ThisType)
        .text("this")
        .build(),
      TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsFnType(f)) => {
        let id = self.next_id();
        self
          .signature(
            id,
            NodeKind::FunctionType,
            &f.params,
            f.type_params.as_deref(),
            Some(&f.type_ann),
          )
          .build()
      }
      TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsConstructorType(
        c,
      )) => {
        let id = self.next_id();
        self
          .signature(
            id,
            NodeKind::ConstructorType,
            &c.params,
            c.type_params.as_deref(),
            Some(&c.type_ann),
          )
          .meta_if(c.is_abstract, MetaTag::Abstract)
          .build()
      }
      TsType::TsTypeRef(type_ref) => {
        let name = ts_entity_name_text(&type_ref.type_name);
        let generics = self.resolve_type_args(type_ref.type_params.as_deref());
        NodeBuilder::new(name.clone(), NodeKind::TypeReference)
          .name(name)
          .generics(generics)
          .build()
      }
      TsType::TsTypeQuery(query) => {
        let id = self.next_id();
        let name = match &query.expr_name {
          TsTypeQueryExpr::TsEntityName(entity_name) => {
            ts_entity_name_text(entity_name)
          }
          TsTypeQueryExpr::Import(import) => {
            import.text_fast(self.text_info).to_string()
          }
        };
        let generics = self.resolve_type_args(query.type_args.as_deref());
        NodeBuilder::new(id, NodeKind::TypeQuery)
          .name(name)
          .generics(generics)
          .build()
      }
      TsType::TsTypeLit(literal) => {
        let id = self.next_id();
        let members = literal
          .members
          .iter()
          .map(|member| self.resolve_type_element(member, ""))
          .collect();
        NodeBuilder::new(id, NodeKind::TypeLiteral)
          .params(members)
          .build()
      }
      TsType::TsArrayType(array) => {
        let id = self.next_id();
        let elem = self.resolve_type(&array.elem_type);
        NodeBuilder::new(id, NodeKind::ArrayType)
          .returns(vec![elem])
          .build()
      }
      TsType::TsTupleType(tuple) => {
        let id = self.next_id();
        let elems = tuple
          .elem_types
          .iter()
          .map(|elem| self.tuple_element(elem))
          .collect();
        NodeBuilder::new(id, NodeKind::TupleType)
          .returns(elems)
          .build()
      }
      TsType::TsOptionalType(optional) => {
        with_meta(self.resolve_type(&optional.type_ann), MetaTag::Optional)
      }
      TsType::TsRestType(rest) => {
        with_meta(self.resolve_type(&rest.type_ann), MetaTag::Rest)
      }
      TsType::TsUnionOrIntersectionType(
        TsUnionOrIntersectionType::TsUnionType(union),
      ) => self.union_like(NodeKind::UnionType, &union.types),
      TsType::TsUnionOrIntersectionType(
        TsUnionOrIntersectionType::TsIntersectionType(intersection),
      ) => self.union_like(NodeKind::IntersectionType, &intersection.types),
      TsType::TsConditionalType(conditional) => {
        let id = self.next_id();
        let check = self.resolve_type(&conditional.check_type);
        let extends = with_meta(
          self.resolve_type(&conditional.extends_type),
          MetaTag::Extends,
        );
        let true_type = self.resolve_type(&conditional.true_type);
        let false_type = self.resolve_type(&conditional.false_type);
        NodeBuilder::new(id, NodeKind::ConditionalType)
          .params(vec![check, extends])
          .returns(vec![true_type, false_type])
          .build()
      }
      TsType::TsInferType(infer) => {
        let id = self.next_id();
        let type_param = self.resolve_type_param(&infer.type_param);
        NodeBuilder::new(id, NodeKind::InferType)
          .generics(vec![type_param])
          .build()
      }
      TsType::TsParenthesizedType(paren) => self.resolve_type(&paren.type_ann),
      TsType::TsTypeOperator(operator) => {
        let id = self.next_id();
        let inner = self.resolve_type(&operator.type_ann);
        NodeBuilder::new(id, NodeKind::TypeOperator)
          .text(type_operator_text(operator.op))
          .returns(vec![inner])
          .build()
      }
      TsType::TsIndexedAccessType(access) => {
        let id = self.next_id();
        let obj = self.resolve_type(&access.obj_type);
        let index = self.resolve_type(&access.index_type);
        NodeBuilder::new(id, NodeKind::IndexedAccessType)
          .returns(vec![obj, index])
          .meta_if(access.readonly, MetaTag::Readonly)
          .build()
      }
      TsType::TsMappedType(mapped) => {
        let id = self.next_id();
        let type_param = self.resolve_type_param(&mapped.type_param);
        let name_type = mapped
          .name_type
          .as_ref()
          .map(|name_type| self.resolve_type(name_type));
        let value = mapped.type_ann.as_ref().map(|ty| self.resolve_type(ty));
        let mut builder = NodeBuilder::new(id, NodeKind::MappedType)
          .generics(vec![type_param])
          .params(name_type.into_iter().collect())
          .maybe_return(value);
        if let Some(tag) =
          MetaTag::from_mapped_modifier(mapped.readonly, MetaTag::Readonly)
        {
          builder = builder.meta(tag);
        }
        if let Some(tag) =
          MetaTag::from_mapped_modifier(mapped.optional, MetaTag::Optional)
        {
          builder = builder.meta(tag);
        }
        builder.build()
      }
      TsType::TsLitType(literal) => self.literal_type(literal),
      TsType::TsTypePredicate(predicate) => {
        let id = self.next_id();
        let param = match &predicate.param_name {
          TsThisTypeOrIdent::TsThisType(_) => {
            NodeBuilder::new(self.next_id(), NodeKind::ThisType)
              .text("this")
              .build()
          }
          TsThisTypeOrIdent::Ident(ident) => {
            NodeBuilder::new(ident.sym.to_string(), NodeKind::Identifier)
              .name(ident.sym.to_string())
              .build()
          }
        };
        let ty = self.resolve_type_ann(predicate.type_ann.as_deref());
        NodeBuilder::new(id, NodeKind::TypePredicate)
          .params(vec![param])
          .maybe_return(ty)
          .meta_if(predicate.asserts, MetaTag::Asserts)
          .build()
      }
      TsType::TsImportType(import) => {
        let id = self.next_id();
        let name = import
          .qualifier
          .as_ref()
          .map(ts_entity_name_text)
          .unwrap_or_default();
        let specifier = import
          .arg
          .text_fast(self.text_info)
          .trim_matches(|c| c == '"' || c == '\'')
          .to_string();
        let generics = self.resolve_type_args(import.type_args.as_deref());
        NodeBuilder::new(id, NodeKind::ImportType)
          .name(name)
          .text(specifier)
          .generics(generics)
          .build()
      }
    }
  }

  pub fn resolve_type_ann(
    &mut self,
    type_ann: Option<&TsTypeAnn>,
  ) -> Option<NormalizedNode> {
    type_ann.map(|type_ann| self.resolve_type(&type_ann.type_ann))
  }

  fn literal_type(&mut self, literal: &TsLitType) -> NormalizedNode {
    let id = self.next_id();
    let text = literal.text_fast(self.text_info).to_string();
    match &literal.lit {
      TsLit::Tpl(template) => {
        let spans = template
          .types
          .iter()
          .map(|ty| self.resolve_type(ty))
          .collect();
        NodeBuilder::new(id, NodeKind::TemplateLiteralType)
          .text(text)
          .returns(spans)
          .build()
      }
      TsLit::Number(_) | TsLit::Str(_) | TsLit::Bool(_) | TsLit::BigInt(_) => {
        NodeBuilder::new(id, NodeKind::LiteralType).text(text).build()
      }
    }
  }

  /// Unions and intersections whose members resolve to the same kind are
  /// flattened one level, so `(A | B) | C` yields three members.
  fn union_like(
    &mut self,
    kind: NodeKind,
    types: &[Box<TsType>],
  ) -> NormalizedNode {
    let id = self.next_id();
    let mut members = Vec::with_capacity(types.len());
    for ty in types {
      let member = self.resolve_type(ty);
      if member.kind == kind && member.meta.is_empty() {
        members.extend(member.returns);
      } else {
        members.push(member);
      }
    }
    NodeBuilder::new(id, kind).returns(members).build()
  }

  fn tuple_element(&mut self, elem: &TsTupleElement) -> NormalizedNode {
    let ty = self.resolve_type(&elem.ty);
    let Some(label) = &elem.label else {
      return ty;
    };
    let (name, optional) = match label {
      Pat::Ident(binding) => (binding.id.sym.to_string(), binding.id.optional),
      Pat::Rest(rest) => (self.pat_name(&rest.arg), false),
      other => (other.text_fast(self.text_info).to_string(), false),
    };
    NodeBuilder::new(name.clone(), NodeKind::Parameter)
      .name(name)
      .returns(vec![ty])
      .meta_if(optional, MetaTag::Optional)
      .build()
  }

  pub fn resolve_type_args(
    &mut self,
    type_args: Option<&TsTypeParamInstantiation>,
  ) -> Vec<NormalizedNode> {
    type_args
      .map(|args| args.params.iter().map(|p| self.resolve_type(p)).collect())
      .unwrap_or_default()
  }

  pub fn resolve_type_params(
    &mut self,
    type_params: Option<&TsTypeParamDecl>,
  ) -> Vec<NormalizedNode> {
    type_params
      .map(|decl| {
        decl
          .params
          .iter()
          .map(|param| self.resolve_type_param(param))
          .collect()
      })
      .unwrap_or_default()
  }

  /// A type parameter's constraint is tagged `extends` and its default
  /// `default`. Without a constraint the node has no children.
  pub fn resolve_type_param(&mut self, param: &TsTypeParam) -> NormalizedNode {
    let name = param.name.sym.to_string();
    let builder =
      NodeBuilder::new(name.clone(), NodeKind::TypeParameter).name(name);
    let Some(constraint) = &param.constraint else {
      return builder.build();
    };
    let mut returns =
      vec![with_meta(self.resolve_type(constraint), MetaTag::Extends)];
    if let Some(default) = &param.default {
      returns.push(with_meta(self.resolve_type(default), MetaTag::Default));
    }
    builder.returns(returns).build()
  }

  pub fn resolve_fn_params(&mut self, params: &[TsFnParam]) -> Vec<NormalizedNode> {
    params.iter().map(|p| self.resolve_fn_param(p)).collect()
  }

  pub fn resolve_fn_param(&mut self, param: &TsFnParam) -> NormalizedNode {
    match param {
      TsFnParam::Ident(binding) => self.binding_param(binding),
      TsFnParam::Rest(rest) => self.rest_param(rest),
      TsFnParam::Array(array) => self.pattern_param(
        array.text_fast(self.text_info),
        array.optional,
        array.type_ann.as_deref(),
      ),
      TsFnParam::Object(object) => self.pattern_param(
        object.text_fast(self.text_info),
        object.optional,
        object.type_ann.as_deref(),
      ),
    }
  }

  /// Resolves a parameter written as a pattern, as found on class methods
  /// and constructors.
  pub fn resolve_pat_param(&mut self, pat: &Pat) -> NormalizedNode {
    match pat {
      Pat::Ident(binding) => self.binding_param(binding),
      Pat::Rest(rest) => self.rest_param(rest),
      Pat::Array(array) => self.pattern_param(
        array.text_fast(self.text_info),
        array.optional,
        array.type_ann.as_deref(),
      ),
      Pat::Object(object) => self.pattern_param(
        object.text_fast(self.text_info),
        object.optional,
        object.type_ann.as_deref(),
      ),
      Pat::Assign(assign) => {
        with_meta(self.resolve_pat_param(&assign.left), MetaTag::Optional)
      }
      Pat::Invalid(_) | Pat::Expr(_) => {
        log::debug!(
          "Unsupported parameter pattern: {}",
          pat.text_fast(self.text_info)
        );
        self.unknown()
      }
    }
  }

  /// Class constructor parameters, including parameter properties such as
  /// `constructor(private readonly x: number)`.
  pub fn resolve_constructor_param(
    &mut self,
    param: &ParamOrTsParamProp,
  ) -> NormalizedNode {
    match param {
      ParamOrTsParamProp::Param(param) => self.resolve_pat_param(&param.pat),
      ParamOrTsParamProp::TsParamProp(prop) => {
        let mut node = match &prop.param {
          TsParamPropParam::Ident(binding) => self.binding_param(binding),
          TsParamPropParam::Assign(assign) => {
            with_meta(self.resolve_pat_param(&assign.left), MetaTag::Optional)
          }
        };
        if prop.readonly {
          node.meta.insert(MetaTag::Readonly);
        }
        if let Some(accessibility) = prop.accessibility {
          node.meta.insert(MetaTag::from_accessibility(accessibility));
        }
        node
      }
    }
  }

  pub fn binding_param(&mut self, binding: &BindingIdent) -> NormalizedNode {
    let name = binding.id.sym.to_string();
    let ty = self.resolve_type_ann(binding.type_ann.as_deref());
    NodeBuilder::new(name.clone(), NodeKind::Parameter)
      .name(name)
      .maybe_return(ty)
      .meta_if(binding.id.optional, MetaTag::Optional)
      .build()
  }

  /// Rest parameters keep their declared type and gain a `rest` tag.
  fn rest_param(&mut self, rest: &RestPat) -> NormalizedNode {
    let name = self.pat_name(&rest.arg);
    let type_ann = rest.type_ann.as_deref().or(match &*rest.arg {
      Pat::Ident(binding) => binding.type_ann.as_deref(),
      _ => None,
    });
    let ty = self.resolve_type_ann(type_ann);
    NodeBuilder::new(name.clone(), NodeKind::Parameter)
      .name(name)
      .maybe_return(ty)
      .meta(MetaTag::Rest)
      .build()
  }

  fn pattern_param(
    &mut self,
    text: &str,
    optional: bool,
    type_ann: Option<&TsTypeAnn>,
  ) -> NormalizedNode {
    let name = text.to_string();
    let ty = self.resolve_type_ann(type_ann);
    NodeBuilder::new(name.clone(), NodeKind::Parameter)
      .name(name)
      .maybe_return(ty)
      .meta_if(optional, MetaTag::Optional)
      .build()
  }

  fn pat_name(&self, pat: &Pat) -> String {
    match pat {
      Pat::Ident(binding) => binding.id.sym.to_string(),
      other => other.text_fast(self.text_info).to_string(),
    }
  }

  /// Shared shape of everything callable: params, generics and the return
  /// type.
  pub fn signature(
    &mut self,
    id: String,
    kind: NodeKind,
    params: &[TsFnParam],
    type_params: Option<&TsTypeParamDecl>,
    return_type: Option<&TsTypeAnn>,
  ) -> NodeBuilder {
    let generics = self.resolve_type_params(type_params);
    let params = self.resolve_fn_params(params);
    let ret = self.resolve_type_ann(return_type);
    NodeBuilder::new(id, kind)
      .generics(generics)
      .params(params)
      .maybe_return(ret)
  }

  /// Resolves an interface or type literal member named under `prefix`.
  /// An empty prefix is used for anonymous type literals, where call
  /// signatures get a synthetic id.
  pub fn resolve_type_element(
    &mut self,
    element: &TsTypeElement,
    prefix: &str,
  ) -> NormalizedNode {
    match element {
      TsTypeElement::TsPropertySignature(prop) => {
        let name = self.member_name(&prop.key, prop.computed, prefix);
        let ty = self.resolve_type_ann(prop.type_ann.as_deref());
        NodeBuilder::new(name.clone(), NodeKind::PropertySignature)
          .name(name)
          .maybe_return(ty)
          .meta_if(prop.optional, MetaTag::Optional)
          .meta_if(prop.readonly, MetaTag::Readonly)
          .build()
      }
      TsTypeElement::TsMethodSignature(method) => {
        let name = self.member_name(&method.key, method.computed, prefix);
        self
          .signature(
            name.clone(),
            NodeKind::MethodSignature,
            &method.params,
            method.type_params.as_deref(),
            method.type_ann.as_deref(),
          )
          .name(name)
          .meta_if(method.optional, MetaTag::Optional)
          .build()
      }
      TsTypeElement::TsCallSignatureDecl(call) => {
        let id = if prefix.is_empty() {
          self.next_id()
        } else {
          prefix.to_string()
        };
        self
          .signature(
            id,
            NodeKind::CallSignature,
            &call.params,
            call.type_params.as_deref(),
            call.type_ann.as_deref(),
          )
          .name(prefix)
          .build()
      }
      TsTypeElement::TsConstructSignatureDecl(construct) => {
        let name = format_name(CONSTRUCT_SIGNATURE_NAME, prefix);
        self
          .signature(
            name.clone(),
            NodeKind::ConstructSignature,
            &construct.params,
            construct.type_params.as_deref(),
            construct.type_ann.as_deref(),
          )
          .name(name)
          .build()
      }
      TsTypeElement::TsIndexSignature(index) => {
        self.index_signature(index, prefix)
      }
      TsTypeElement::TsGetterSignature(getter) => {
        let name = self.member_name(&getter.key, getter.computed, prefix);
        let ty = self.resolve_type_ann(getter.type_ann.as_deref());
        NodeBuilder::new(name.clone(), NodeKind::GetAccessor)
          .name(name)
          .maybe_return(ty)
          .build()
      }
      TsTypeElement::TsSetterSignature(setter) => {
        let name = self.member_name(&setter.key, setter.computed, prefix);
        let param = self.resolve_fn_param(&setter.param);
        NodeBuilder::new(name.clone(), NodeKind::SetAccessor)
          .name(name)
          .params(vec![param])
          .build()
      }
    }
  }

  pub fn index_signature(
    &mut self,
    index: &TsIndexSignature,
    prefix: &str,
  ) -> NormalizedNode {
    let name = format_name(INDEX_SIGNATURE_NAME, prefix);
    let params = self.resolve_fn_params(&index.params);
    let ty = self.resolve_type_ann(index.type_ann.as_deref());
    NodeBuilder::new(name.clone(), NodeKind::IndexSignature)
      .name(name)
      .params(params)
      .maybe_return(ty)
      .meta_if(index.readonly, MetaTag::Readonly)
      .meta_if(index.is_static, MetaTag::Static)
      .build()
  }

  fn member_name(&self, key: &Expr, computed: bool, prefix: &str) -> String {
    format_name(&property_key_text(key, computed, self.text_info), prefix)
  }

  /// Terminal node for syntax the resolver can't interpret.
  pub fn unknown(&mut self) -> NormalizedNode {
    NodeBuilder::new(self.next_id(), NodeKind::Unknown).build()
  }
}

pub fn with_meta(mut node: NormalizedNode, tag: MetaTag) -> NormalizedNode {
  node.meta.insert(tag);
  node
}

#[cfg(test)]
mod tests {
  use deno_ast::swc::ast::Decl;
  use deno_ast::swc::common::Spanned;
  use deno_ast::ModuleItemRef;
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::corpus::tests::corpus;
  use crate::serialize::serialize;

  /// Resolves the right hand side of `type T = <source>`.
  fn resolve(source: &str) -> NormalizedNode {
    let corpus = corpus(&[("types.d.ts", &format!("type T = {};", source))]);
    let file = &corpus.files()[0];
    let item = file.items().next().unwrap();
    let ModuleItemRef::Stmt(Stmt::Decl(Decl::TsTypeAlias(alias))) = item else {
      panic!("expected a type alias");
    };
    TypeResolver::new(file.text_info()).resolve_type(&alias.type_ann)
  }

  fn kinds(nodes: &[NormalizedNode]) -> Vec<&'static str> {
    nodes.iter().map(|n| n.kind.as_str()).collect()
  }

  #[test]
  fn keywords_carry_text() {
    let node = resolve("string");
    assert_eq!(node.kind.as_str(), "StringKeyword");
    assert_eq!(node.text.as_deref(), Some("string"));
    assert_eq!(node.id, "_0");
  }

  #[test]
  fn arrays_and_references() {
    let node = resolve("Promise<T[]>");
    assert_eq!(node.kind, NodeKind::TypeReference);
    assert_eq!(node.id, "Promise");
    assert_eq!(node.name, "Promise");
    assert_eq!(kinds(&node.generics), vec!["ArrayType"]);
    assert_eq!(node.generics[0].returns[0].name, "T");
  }

  #[test]
  fn qualified_references() {
    let node = resolve("Intl.Collator");
    assert_eq!(node.name, "Intl.Collator");
  }

  #[test]
  fn unions_flatten_nested_unions() {
    let node = resolve("(string | number) | null");
    assert_eq!(node.kind, NodeKind::UnionType);
    assert_eq!(
      kinds(&node.returns),
      vec!["StringKeyword", "NumberKeyword", "NullKeyword"]
    );
  }

  #[test]
  fn intersections_keep_nested_unions() {
    let node = resolve("A & (B | C)");
    assert_eq!(kinds(&node.returns), vec!["TypeReference", "UnionType"]);
  }

  #[test]
  fn tuples_tag_optional_and_rest() {
    let node = resolve("[string, number?, ...boolean[]]");
    assert_eq!(node.kind, NodeKind::TupleType);
    assert_eq!(node.returns.len(), 3);
    assert!(node.returns[1].has_meta(MetaTag::Optional));
    assert_eq!(node.returns[2].kind, NodeKind::ArrayType);
    assert!(node.returns[2].has_meta(MetaTag::Rest));
  }

  #[test]
  fn labeled_tuple_elements_become_parameters() {
    let node = resolve("[start: number, end?: number]");
    assert_eq!(kinds(&node.returns), vec!["Parameter", "Parameter"]);
    assert_eq!(node.returns[0].name, "start");
  }

  #[test]
  fn functions_and_rest_params() {
    let node = resolve("<T>(a: string, b?: number, ...rest: T[]) => void");
    assert_eq!(node.kind, NodeKind::FunctionType);
    assert_eq!(node.generics[0].name, "T");
    assert_eq!(node.params.len(), 3);
    assert!(node.params[1].has_meta(MetaTag::Optional));
    let rest = &node.params[2];
    assert_eq!(rest.name, "rest");
    assert!(rest.has_meta(MetaTag::Rest));
    assert_eq!(rest.returns[0].kind, NodeKind::ArrayType);
    assert_eq!(node.returns[0].kind.as_str(), "VoidKeyword");
  }

  #[test]
  fn constructor_types() {
    let node = resolve("abstract new (x: number) => Foo");
    assert_eq!(node.kind, NodeKind::ConstructorType);
    assert!(node.has_meta(MetaTag::Abstract));
    assert_eq!(node.returns[0].name, "Foo");
  }

  #[test]
  fn mapped_types() {
    let node = resolve("{ readonly [P in keyof T]?: T[P] }");
    assert_eq!(node.kind, NodeKind::MappedType);
    assert!(node.has_meta(MetaTag::Readonly));
    assert!(node.has_meta(MetaTag::Optional));
    let param = &node.generics[0];
    assert_eq!(param.name, "P");
    assert_eq!(param.returns[0].kind, NodeKind::TypeOperator);
    assert!(param.returns[0].has_meta(MetaTag::Extends));
    assert_eq!(param.returns[0].text.as_deref(), Some("keyof"));
    assert_eq!(node.returns[0].kind, NodeKind::IndexedAccessType);
  }

  #[test]
  fn conditional_and_infer() {
    let node = resolve("T extends Promise<infer U> ? U : never");
    assert_eq!(node.kind, NodeKind::ConditionalType);
    assert_eq!(node.params[0].name, "T");
    assert!(node.params[1].has_meta(MetaTag::Extends));
    assert_eq!(node.params[1].generics[0].kind, NodeKind::InferType);
    assert_eq!(kinds(&node.returns), vec!["TypeReference", "NeverKeyword"]);
  }

  #[test]
  fn type_params_without_constraint_are_minimal() {
    let node = resolve("<T, U extends string = \"a\">() => void");
    assert!(node.generics[0].returns.is_empty());
    let constrained = &node.generics[1];
    assert_eq!(constrained.returns.len(), 2);
    assert!(constrained.returns[0].has_meta(MetaTag::Extends));
    assert!(constrained.returns[1].has_meta(MetaTag::Default));
    assert_eq!(constrained.returns[1].text.as_deref(), Some("\"a\""));
  }

  #[test]
  fn literals_and_templates() {
    assert_eq!(resolve("42").text.as_deref(), Some("42"));
    assert_eq!(resolve("true").kind, NodeKind::LiteralType);
    let template = resolve("`on${string}`");
    assert_eq!(template.kind, NodeKind::TemplateLiteralType);
    assert_eq!(template.text.as_deref(), Some("`on${string}`"));
    assert_eq!(kinds(&template.returns), vec!["StringKeyword"]);
  }

  #[test]
  fn type_literals_resolve_members_anonymously() {
    let node = resolve(
      "{ new(): Foo; (x: number): string; readonly size: number; [key: string]: any; get value(): string; }",
    );
    assert_eq!(node.kind, NodeKind::TypeLiteral);
    assert_eq!(
      kinds(&node.params),
      vec![
        "ConstructSignature",
        "CallSignature",
        "PropertySignature",
        "IndexSignature",
        "GetAccessor"
      ]
    );
    assert_eq!(node.params[0].name, "new");
    assert_eq!(node.params[1].name, "");
    assert!(node.params[1].id.starts_with('_'));
    assert!(node.params[2].has_meta(MetaTag::Readonly));
    assert_eq!(node.params[3].name, "__index");
  }

  #[test]
  fn queries_predicates_and_operators() {
    let query = resolve("typeof globalThis");
    assert_eq!(query.kind, NodeKind::TypeQuery);
    assert_eq!(query.name, "globalThis");

    let predicate = resolve("(x: unknown) => x is string");
    let ret = &predicate.returns[0];
    assert_eq!(ret.kind, NodeKind::TypePredicate);
    assert_eq!(ret.params[0].name, "x");
    assert_eq!(ret.returns[0].kind.as_str(), "StringKeyword");

    let operator = resolve("readonly string[]");
    assert_eq!(operator.kind, NodeKind::TypeOperator);
    assert_eq!(operator.text.as_deref(), Some("readonly"));
  }

  #[test]
  fn import_types() {
    let node = resolve("import(\"./mod\").Foo<string>");
    assert_eq!(node.kind, NodeKind::ImportType);
    assert_eq!(node.name, "Foo");
    assert_eq!(node.text.as_deref(), Some("./mod"));
    assert_eq!(node.generics.len(), 1);
  }

  #[test]
  fn parenthesized_and_this() {
    assert_eq!(resolve("(string)").kind.as_str(), "StringKeyword");
    assert_eq!(resolve("(this)").kind, NodeKind::ThisType);
  }

  #[test]
  fn exotic_nesting_resolves() {
    let node = resolve(
      "Array<[{ [K in keyof T]: T[K] extends infer U ? U | [U, ...U[]] : never }, `a${T & string}`]> | keyof T",
    );
    assert_eq!(node.kind, NodeKind::UnionType);
    assert_eq!(node.returns.len(), 2);
  }

  #[test]
  fn ids_are_deterministic_per_resolver() {
    let first = serialize(&resolve("(a: string | number) => [boolean, null]"));
    let second = serialize(&resolve("(a: string | number) => [boolean, null]"));
    assert_eq!(first, second);
  }

  #[test]
  fn uninterpretable_parameters_become_unknown() {
    let corpus =
      corpus(&[("params.d.ts", "declare function f(x: number): void;")]);
    let file = &corpus.files()[0];
    let item = file.items().next().unwrap();
    let ModuleItemRef::Stmt(Stmt::Decl(Decl::Fn(function))) = item else {
      panic!("expected a function");
    };
    let span = function.function.params[0].pat.span();
    let mut resolver = TypeResolver::new(file.text_info());

    let invalid = resolver.resolve_pat_param(&Pat::Invalid(Invalid { span }));
    assert_eq!(invalid.kind.as_str(), "Unknown");
    assert_eq!(invalid.id, "_0");
    assert_eq!(invalid.text, None);
    assert!(invalid.returns.is_empty());

    let expr = resolver.resolve_pat_param(&Pat::Expr(Box::new(Expr::Invalid(
      Invalid { span },
    ))));
    assert_eq!(expr.kind, NodeKind::Unknown);
    assert!(expr.id.starts_with('_'));
    assert_eq!(serialize(&expr).text, None);
  }
}
