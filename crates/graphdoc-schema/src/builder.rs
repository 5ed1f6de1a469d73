//! Types reference construction.
//!
//! Walks the type graph with a worklist and a visited set keyed by type
//! name, so mutually or self-referencing types terminate and appear once.
//!
//! # Examples
//!
//! ```
//! use graphdoc_schema::{BuildReference, ReferenceBuilder, SchemaSource};
//!
//! let schema = SchemaSource::from(
//!     "type Query { author: Author } type Author { books: [Book] } type Book { author: Author }",
//! );
//! let reference = ReferenceBuilder::new().build(&schema).unwrap();
//!
//! let names: Vec<&str> = reference.types.iter().map(|t| t.name.as_str()).collect();
//! assert_eq!(names, ["Author", "Book", "Query"]);
//! ```

use crate::graph::{is_builtin_directive, is_builtin_scalar, named_type};
use crate::reference::{
    AppliedDirective, DirectiveArgument, DirectiveDescriptor, EnumValueDescriptor,
    FieldDescriptor, InputValueDescriptor, TypeDescriptor, TypeKind, TypeRef, TypesReference,
};
use crate::{SchemaSource, TypeGraph};
use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    self as ast, ConstDirective, DirectiveDefinition, EnumValueDefinition, FieldDefinition,
    InputValueDefinition, TypeDefinition,
};
use async_graphql_value::ConstValue;
use graphdoc_core::Result;
use std::collections::{BTreeSet, HashSet, VecDeque};

const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Produces a [`TypesReference`] from a schema.
///
/// Implemented by [`ReferenceBuilder`]; the render pipeline is generic over
/// this trait so alternative or instrumented builders can be plugged in.
pub trait BuildReference {
    /// Builds the types reference for `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`graphdoc_core::Error::SchemaError`] if SDL text cannot be
    /// parsed into a type graph.
    fn build(&self, schema: &SchemaSource) -> Result<TypesReference>;
}

/// Default reference builder.
///
/// # Examples
///
/// ```
/// use graphdoc_schema::{BuildReference, ReferenceBuilder, SchemaSource};
///
/// let sdl = "type Query { a: Int } type Orphan { b: Int }";
/// let schema = SchemaSource::from(sdl);
///
/// let all = ReferenceBuilder::new().build(&schema).unwrap();
/// assert!(all.get("Orphan").is_some());
///
/// let reachable = ReferenceBuilder::new()
///     .include_unreachable(false)
///     .build(&schema)
///     .unwrap();
/// assert!(reachable.get("Orphan").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceBuilder {
    include_unreachable: bool,
}

impl Default for ReferenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceBuilder {
    /// Creates a builder that documents every defined type.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include_unreachable: true,
        }
    }

    /// Controls whether types not reachable from a root operation are
    /// documented.
    #[must_use]
    pub const fn include_unreachable(mut self, include: bool) -> Self {
        self.include_unreachable = include;
        self
    }

    /// Builds the reference for an already constructed type graph.
    #[must_use]
    pub fn build_graph(&self, graph: &TypeGraph) -> TypesReference {
        let mut types: Vec<TypeDescriptor> = self
            .collect_type_names(graph)
            .into_iter()
            .filter_map(|name| graph.get(name).map(|definition| describe_type(graph, definition)))
            .collect();
        // Names arrive sorted; a stable sort by kind keeps them sorted per group
        types.sort_by_key(|ty| ty.kind);

        let directives = graph
            .directives()
            .filter(|d| !is_builtin_directive(d.name.node.as_str()))
            .map(describe_directive)
            .collect();

        tracing::debug!(
            "Built types reference for graph #{}: {} types",
            graph.id(),
            types.len()
        );

        TypesReference {
            query_type: graph.query_type().map(str::to_string),
            mutation_type: graph.mutation_type().map(str::to_string),
            subscription_type: graph.subscription_type().map(str::to_string),
            types,
            directives,
        }
    }

    /// Visits every type reachable from the seeds exactly once.
    fn collect_type_names<'g>(&self, graph: &'g TypeGraph) -> BTreeSet<&'g str> {
        let mut visited: HashSet<&'g str> = HashSet::new();
        let mut queue: VecDeque<&'g str> = graph.root_types().collect();
        if self.include_unreachable {
            queue.extend(graph.type_names());
        }

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name) {
                continue;
            }
            if let Some(definition) = graph.get(name) {
                queue.extend(referenced_types(definition).filter(|r| !visited.contains(r)));
            }
        }

        visited
            .into_iter()
            .filter(|name| is_documented(graph, name))
            .collect()
    }
}

impl BuildReference for ReferenceBuilder {
    fn build(&self, schema: &SchemaSource) -> Result<TypesReference> {
        match schema {
            SchemaSource::Sdl(text) => {
                let graph = TypeGraph::parse(text)?;
                Ok(self.build_graph(&graph))
            }
            SchemaSource::Graph(graph) => Ok(self.build_graph(graph)),
        }
    }
}

fn is_documented(graph: &TypeGraph, name: &str) -> bool {
    graph.contains(name) && !is_builtin_scalar(name) && !name.starts_with("__")
}

/// Names of every type a definition points at.
fn referenced_types(definition: &TypeDefinition) -> Box<dyn Iterator<Item = &str> + '_> {
    fn field_types(fields: &[Positioned<FieldDefinition>]) -> impl Iterator<Item = &str> {
        fields.iter().flat_map(|field| {
            std::iter::once(named_type(&field.node.ty.node)).chain(
                field
                    .node
                    .arguments
                    .iter()
                    .map(|arg| named_type(&arg.node.ty.node)),
            )
        })
    }

    match &definition.kind {
        ast::TypeKind::Scalar | ast::TypeKind::Enum(_) => Box::new(std::iter::empty()),
        ast::TypeKind::Object(object) => Box::new(
            object
                .implements
                .iter()
                .map(|i| i.node.as_str())
                .chain(field_types(&object.fields)),
        ),
        ast::TypeKind::Interface(iface) => Box::new(
            iface
                .implements
                .iter()
                .map(|i| i.node.as_str())
                .chain(field_types(&iface.fields)),
        ),
        ast::TypeKind::Union(union) => Box::new(union.members.iter().map(|m| m.node.as_str())),
        ast::TypeKind::InputObject(input) => Box::new(
            input
                .fields
                .iter()
                .map(|field| named_type(&field.node.ty.node)),
        ),
    }
}

fn describe_type(graph: &TypeGraph, definition: &TypeDefinition) -> TypeDescriptor {
    let name = definition.name.node.to_string();
    let mut descriptor = TypeDescriptor {
        name,
        kind: TypeKind::Scalar,
        description: description(definition.description.as_ref()),
        fields: vec![],
        interfaces: vec![],
        possible_types: vec![],
        enum_values: vec![],
        input_fields: vec![],
        specified_by_url: string_argument(&definition.directives, "specifiedBy", "url"),
        directives: applied_directives(&definition.directives),
    };

    match &definition.kind {
        ast::TypeKind::Scalar => {}
        ast::TypeKind::Object(object) => {
            descriptor.kind = TypeKind::Object;
            descriptor.interfaces = names(&object.implements);
            descriptor.fields = object.fields.iter().map(|f| describe_field(&f.node)).collect();
        }
        ast::TypeKind::Interface(iface) => {
            descriptor.kind = TypeKind::Interface;
            descriptor.interfaces = names(&iface.implements);
            descriptor.fields = iface.fields.iter().map(|f| describe_field(&f.node)).collect();
            descriptor.possible_types = graph
                .implementors(&descriptor.name)
                .into_iter()
                .map(str::to_string)
                .collect();
        }
        ast::TypeKind::Union(union) => {
            descriptor.kind = TypeKind::Union;
            descriptor.possible_types = names(&union.members);
        }
        ast::TypeKind::Enum(enumeration) => {
            descriptor.kind = TypeKind::Enum;
            descriptor.enum_values = enumeration
                .values
                .iter()
                .map(|v| describe_enum_value(&v.node))
                .collect();
        }
        ast::TypeKind::InputObject(input) => {
            descriptor.kind = TypeKind::InputObject;
            descriptor.input_fields = input
                .fields
                .iter()
                .map(|f| describe_input_value(&f.node))
                .collect();
        }
    }

    descriptor
}

fn describe_field(field: &FieldDefinition) -> FieldDescriptor {
    let deprecation_reason = deprecation_reason(&field.directives);
    FieldDescriptor {
        name: field.name.node.to_string(),
        description: description(field.description.as_ref()),
        type_ref: type_ref(&field.ty.node),
        arguments: field
            .arguments
            .iter()
            .map(|arg| describe_input_value(&arg.node))
            .collect(),
        is_deprecated: deprecation_reason.is_some(),
        deprecation_reason,
        directives: applied_directives(&field.directives),
    }
}

fn describe_input_value(value: &InputValueDefinition) -> InputValueDescriptor {
    let deprecation_reason = deprecation_reason(&value.directives);
    InputValueDescriptor {
        name: value.name.node.to_string(),
        description: description(value.description.as_ref()),
        type_ref: type_ref(&value.ty.node),
        default_value: value.default_value.as_ref().map(|v| v.node.to_string()),
        is_deprecated: deprecation_reason.is_some(),
        deprecation_reason,
        directives: applied_directives(&value.directives),
    }
}

fn describe_enum_value(value: &EnumValueDefinition) -> EnumValueDescriptor {
    let deprecation_reason = deprecation_reason(&value.directives);
    EnumValueDescriptor {
        name: value.value.node.to_string(),
        description: description(value.description.as_ref()),
        is_deprecated: deprecation_reason.is_some(),
        deprecation_reason,
        directives: applied_directives(&value.directives),
    }
}

fn describe_directive(directive: &DirectiveDefinition) -> DirectiveDescriptor {
    DirectiveDescriptor {
        name: directive.name.node.to_string(),
        description: description(directive.description.as_ref()),
        arguments: directive
            .arguments
            .iter()
            .map(|arg| describe_input_value(&arg.node))
            .collect(),
        locations: directive
            .locations
            .iter()
            .map(|location| screaming_snake_case(&format!("{:?}", location.node)))
            .collect(),
        is_repeatable: directive.is_repeatable,
    }
}

fn type_ref(ty: &ast::Type) -> TypeRef {
    TypeRef {
        display: ty.to_string(),
        name: named_type(ty).to_string(),
    }
}

fn description(description: Option<&Positioned<String>>) -> Option<String> {
    description.map(|d| d.node.clone())
}

fn names(names: &[Positioned<async_graphql_value::Name>]) -> Vec<String> {
    names.iter().map(|name| name.node.to_string()).collect()
}

fn find_directive<'a>(
    directives: &'a [Positioned<ConstDirective>],
    name: &str,
) -> Option<&'a ConstDirective> {
    directives
        .iter()
        .map(|d| &d.node)
        .find(|d| d.name.node.as_str() == name)
}

fn string_argument(
    directives: &[Positioned<ConstDirective>],
    directive: &str,
    argument: &str,
) -> Option<String> {
    find_directive(directives, directive)?
        .arguments
        .iter()
        .find(|(name, _)| name.node.as_str() == argument)
        .and_then(|(_, value)| match &value.node {
            ConstValue::String(s) => Some(s.clone()),
            _ => None,
        })
}

fn deprecation_reason(directives: &[Positioned<ConstDirective>]) -> Option<String> {
    find_directive(directives, "deprecated")?;
    Some(
        string_argument(directives, "deprecated", "reason")
            .unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_string()),
    )
}

/// Applied directives, minus those surfaced as dedicated metadata.
fn applied_directives(directives: &[Positioned<ConstDirective>]) -> Vec<AppliedDirective> {
    directives
        .iter()
        .map(|d| &d.node)
        .filter(|d| !matches!(d.name.node.as_str(), "deprecated" | "specifiedBy"))
        .map(|d| AppliedDirective {
            name: d.name.node.to_string(),
            arguments: d
                .arguments
                .iter()
                .map(|(name, value)| DirectiveArgument {
                    name: name.node.to_string(),
                    value: value.node.to_string(),
                })
                .collect(),
        })
        .collect()
}

/// `FieldDefinition` -> `FIELD_DEFINITION`
fn screaming_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_ascii_uppercase());
    }
    result
}
