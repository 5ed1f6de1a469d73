//! Navigable GraphQL type graph.
//!
//! Built from a parsed service document: type extensions are merged into
//! their base definitions, root operation types are resolved, and every type
//! reference is checked against the defined and built-in types.

use async_graphql_parser::types::{
    BaseType, DirectiveDefinition, SchemaDefinition, ServiceDocument, Type, TypeDefinition,
    TypeKind, TypeSystemDefinition,
};
use graphdoc_core::{Error, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Scalars every schema knows without defining them.
pub const BUILTIN_SCALARS: &[&str] = &["Boolean", "Float", "ID", "Int", "String"];

/// Directives every schema knows without defining them.
pub const BUILTIN_DIRECTIVES: &[&str] = &["deprecated", "include", "oneOf", "skip", "specifiedBy"];

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// A parsed schema with resolved roots and merged extensions.
///
/// Each graph receives a process-unique id when it is built; pre-built graphs
/// are identified by that id rather than by content.
///
/// # Examples
///
/// ```
/// use graphdoc_schema::TypeGraph;
///
/// let graph = TypeGraph::parse(
///     "type Query { node: Node } interface Node { id: ID! } type User implements Node { id: ID! }",
/// )
/// .unwrap();
///
/// assert_eq!(graph.query_type(), Some("Query"));
/// assert!(graph.contains("User"));
/// assert_eq!(graph.implementors("Node"), vec!["User"]);
/// ```
#[derive(Debug, Clone)]
pub struct TypeGraph {
    id: u64,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    types: BTreeMap<String, TypeDefinition>,
    directives: BTreeMap<String, DirectiveDefinition>,
}

impl TypeGraph {
    /// Parses schema definition language into a type graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaError`] if the text is not valid SDL or does
    /// not form a consistent type graph.
    pub fn parse(sdl: &str) -> Result<Self> {
        let document =
            async_graphql_parser::parse_schema(sdl).map_err(|e| Error::SchemaError {
                message: format!("Failed to parse schema: {e}"),
                source: Some(Box::new(e)),
            })?;
        Self::from_document(document)
    }

    /// Builds a type graph from an already parsed service document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaError`] on duplicate names, more than one
    /// `schema` definition, extensions of undefined types or of a different
    /// kind, unknown type references, and root operations naming missing or
    /// non-object types.
    pub fn from_document(document: ServiceDocument) -> Result<Self> {
        let mut types = BTreeMap::new();
        let mut extensions = Vec::new();
        let mut directives = BTreeMap::new();
        let mut schema_definitions = Vec::new();

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Type(ty) => {
                    let ty = ty.node;
                    if ty.extend {
                        extensions.push(ty);
                        continue;
                    }
                    let name = ty.name.node.to_string();
                    if types.contains_key(&name) {
                        return Err(Error::schema(format!(
                            "There can be only one type named \"{name}\""
                        )));
                    }
                    types.insert(name, ty);
                }
                TypeSystemDefinition::Directive(directive) => {
                    let directive = directive.node;
                    let name = directive.name.node.to_string();
                    if directives.contains_key(&name) {
                        return Err(Error::schema(format!(
                            "There can be only one directive named \"@{name}\""
                        )));
                    }
                    directives.insert(name, directive);
                }
                TypeSystemDefinition::Schema(schema) => schema_definitions.push(schema.node),
            }
        }

        for extension in extensions {
            merge_extension(&mut types, extension)?;
        }

        let [query_type, mutation_type, subscription_type] =
            resolve_roots(&schema_definitions, &types)?;

        let graph = Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            query_type,
            mutation_type,
            subscription_type,
            types,
            directives,
        };
        graph.check_references()?;

        tracing::debug!(
            "Built type graph #{} with {} types and {} directives",
            graph.id,
            graph.types.len(),
            graph.directives.len()
        );

        Ok(graph)
    }

    /// Returns the process-unique id of this graph.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the definition of a named type.
    ///
    /// Built-in scalars have no definition unless the schema declares them.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Returns `true` if the schema defines a type with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Returns `true` if the name refers to a defined or built-in type.
    #[must_use]
    pub fn is_known_type(&self, name: &str) -> bool {
        self.contains(name) || is_builtin_scalar(name)
    }

    /// Iterates over defined type names in ascending order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Iterates over defined types in ascending name order.
    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeDefinition)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Iterates over defined directives in ascending name order.
    pub fn directives(&self) -> impl Iterator<Item = &DirectiveDefinition> {
        self.directives.values()
    }

    /// Number of defined types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the schema defines no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Name of the query root type.
    #[must_use]
    pub fn query_type(&self) -> Option<&str> {
        self.query_type.as_deref()
    }

    /// Name of the mutation root type.
    #[must_use]
    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    /// Name of the subscription root type.
    #[must_use]
    pub fn subscription_type(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    /// Iterates over the root operation types that are present.
    pub fn root_types(&self) -> impl Iterator<Item = &str> {
        [self.query_type(), self.mutation_type(), self.subscription_type()]
            .into_iter()
            .flatten()
    }

    /// Object and interface types implementing `interface`, in name order.
    #[must_use]
    pub fn implementors(&self, interface: &str) -> Vec<&str> {
        self.types()
            .filter(|(_, ty)| {
                let implements = match &ty.kind {
                    TypeKind::Object(object) => &object.implements,
                    TypeKind::Interface(iface) => &iface.implements,
                    _ => return false,
                };
                implements.iter().any(|name| name.node.as_str() == interface)
            })
            .map(|(name, _)| name)
            .collect()
    }

    fn check_references(&self) -> Result<()> {
        for (name, ty) in self.types() {
            match &ty.kind {
                TypeKind::Scalar | TypeKind::Enum(_) => {}
                TypeKind::Object(object) => {
                    self.check_interfaces(name, object.implements.iter().map(|i| i.node.as_str()))?;
                    for field in &object.fields {
                        let field = &field.node;
                        self.check_type(&field.ty.node, name, field.name.node.as_str())?;
                        for arg in &field.arguments {
                            self.check_type(&arg.node.ty.node, name, arg.node.name.node.as_str())?;
                        }
                    }
                }
                TypeKind::Interface(iface) => {
                    self.check_interfaces(name, iface.implements.iter().map(|i| i.node.as_str()))?;
                    for field in &iface.fields {
                        let field = &field.node;
                        self.check_type(&field.ty.node, name, field.name.node.as_str())?;
                        for arg in &field.arguments {
                            self.check_type(&arg.node.ty.node, name, arg.node.name.node.as_str())?;
                        }
                    }
                }
                TypeKind::Union(union) => {
                    for member in &union.members {
                        let member = member.node.as_str();
                        if !matches!(self.get(member).map(|t| &t.kind), Some(TypeKind::Object(_))) {
                            return Err(Error::schema(format!(
                                "Union \"{name}\" member \"{member}\" must be a defined object type"
                            )));
                        }
                    }
                }
                TypeKind::InputObject(input) => {
                    for field in &input.fields {
                        let field = &field.node;
                        self.check_type(&field.ty.node, name, field.name.node.as_str())?;
                    }
                }
            }
        }

        for directive in self.directives() {
            let name = format!("@{}", directive.name.node);
            for arg in &directive.arguments {
                self.check_type(&arg.node.ty.node, &name, arg.node.name.node.as_str())?;
            }
        }

        Ok(())
    }

    fn check_type(&self, ty: &Type, owner: &str, member: &str) -> Result<()> {
        let named = named_type(ty);
        if self.is_known_type(named) {
            Ok(())
        } else {
            Err(Error::schema(format!(
                "Unknown type \"{named}\" referenced by \"{owner}.{member}\""
            )))
        }
    }

    fn check_interfaces<'a>(
        &self,
        owner: &str,
        interfaces: impl Iterator<Item = &'a str>,
    ) -> Result<()> {
        for interface in interfaces {
            if !matches!(self.get(interface).map(|t| &t.kind), Some(TypeKind::Interface(_))) {
                return Err(Error::schema(format!(
                    "Type \"{owner}\" cannot implement \"{interface}\": not a defined interface"
                )));
            }
        }
        Ok(())
    }
}

/// Returns the innermost named type of a possibly wrapped type.
pub(crate) fn named_type(ty: &Type) -> &str {
    match &ty.base {
        BaseType::Named(name) => name.as_str(),
        BaseType::List(inner) => named_type(inner),
    }
}

/// Returns `true` for GraphQL's built-in scalar names.
pub(crate) fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Returns `true` for GraphQL's built-in directive names.
pub(crate) fn is_builtin_directive(name: &str) -> bool {
    BUILTIN_DIRECTIVES.contains(&name)
}

const fn kind_label(kind: &TypeKind) -> &'static str {
    match kind {
        TypeKind::Scalar => "scalar",
        TypeKind::Object(_) => "object type",
        TypeKind::Interface(_) => "interface",
        TypeKind::Union(_) => "union",
        TypeKind::Enum(_) => "enum",
        TypeKind::InputObject(_) => "input object",
    }
}

fn merge_extension(
    types: &mut BTreeMap<String, TypeDefinition>,
    extension: TypeDefinition,
) -> Result<()> {
    let name = extension.name.node.to_string();
    let Some(base) = types.get_mut(&name) else {
        return Err(Error::schema(format!(
            "Cannot extend type \"{name}\" because it is not defined"
        )));
    };

    base.directives.extend(extension.directives);
    match (&mut base.kind, extension.kind) {
        (TypeKind::Scalar, TypeKind::Scalar) => {}
        (TypeKind::Object(object), TypeKind::Object(ext)) => {
            object.implements.extend(ext.implements);
            object.fields.extend(ext.fields);
        }
        (TypeKind::Interface(iface), TypeKind::Interface(ext)) => {
            iface.implements.extend(ext.implements);
            iface.fields.extend(ext.fields);
        }
        (TypeKind::Union(union), TypeKind::Union(ext)) => union.members.extend(ext.members),
        (TypeKind::Enum(enumeration), TypeKind::Enum(ext)) => {
            enumeration.values.extend(ext.values);
        }
        (TypeKind::InputObject(input), TypeKind::InputObject(ext)) => {
            input.fields.extend(ext.fields);
        }
        (base_kind, ext_kind) => {
            return Err(Error::schema(format!(
                "Cannot extend {} \"{name}\" as {}",
                kind_label(base_kind),
                kind_label(&ext_kind)
            )));
        }
    }
    Ok(())
}

fn resolve_roots(
    definitions: &[SchemaDefinition],
    types: &BTreeMap<String, TypeDefinition>,
) -> Result<[Option<String>; 3]> {
    let mut roots: [Option<String>; 3] = [None, None, None];
    let (extensions, bases): (Vec<_>, Vec<_>) = definitions.iter().partition(|d| d.extend);

    match bases.as_slice() {
        // Conventional names apply only without a base schema definition
        [] => {
            for (slot, name) in roots.iter_mut().zip(["Query", "Mutation", "Subscription"]) {
                if types.contains_key(name) {
                    *slot = Some(name.to_string());
                }
            }
        }
        [base] => declare_roots(&mut roots, base),
        _ => return Err(Error::schema("Must provide only one schema definition")),
    }

    for extension in extensions {
        declare_roots(&mut roots, extension);
    }

    for (operation, name) in ["query", "mutation", "subscription"].iter().zip(&roots) {
        let Some(name) = name else { continue };
        match types.get(name).map(|t| &t.kind) {
            Some(TypeKind::Object(_)) => {}
            Some(_) => {
                return Err(Error::schema(format!(
                    "The {operation} root type \"{name}\" must be an object type"
                )));
            }
            None => {
                return Err(Error::schema(format!(
                    "The {operation} root type \"{name}\" is not defined"
                )));
            }
        }
    }

    Ok(roots)
}

fn declare_roots(roots: &mut [Option<String>; 3], definition: &SchemaDefinition) {
    let declared = [&definition.query, &definition.mutation, &definition.subscription];
    for (slot, name) in roots.iter_mut().zip(declared) {
        if let Some(name) = name {
            *slot = Some(name.node.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolves_conventional_roots() {
        let graph = TypeGraph::parse(
            "type Query { a: Int } type Mutation { b: Int } type Subscription { c: Int }",
        )
        .unwrap();
        assert_eq!(graph.query_type(), Some("Query"));
        assert_eq!(graph.mutation_type(), Some("Mutation"));
        assert_eq!(graph.subscription_type(), Some("Subscription"));
        assert_eq!(graph.root_types().count(), 3);
    }

    #[test]
    fn test_explicit_schema_definition_overrides_convention() {
        let graph = TypeGraph::parse(
            "schema { query: RootQuery } type RootQuery { a: Int } type Mutation { b: Int }",
        )
        .unwrap();
        assert_eq!(graph.query_type(), Some("RootQuery"));
        assert_eq!(graph.mutation_type(), None);
    }

    #[test]
    fn test_schema_extension_keeps_conventional_roots() {
        let graph = TypeGraph::parse(
            "type Query { a: Int } type M { b: Int } extend schema { mutation: M }",
        )
        .unwrap();
        assert_eq!(graph.query_type(), Some("Query"));
        assert_eq!(graph.mutation_type(), Some("M"));
    }

    #[test]
    fn test_schema_extension_layers_over_definition() {
        let graph = TypeGraph::parse(
            "extend schema { subscription: Events } \
             schema { query: RootQuery } \
             type RootQuery { a: Int } type Events { b: Int } type Query { c: Int }",
        )
        .unwrap();
        assert_eq!(graph.query_type(), Some("RootQuery"));
        assert_eq!(graph.subscription_type(), Some("Events"));
    }

    #[test]
    fn test_multiple_schema_definitions_are_rejected() {
        let err = TypeGraph::parse(
            "schema { query: A } schema { query: B } type A { x: Int } type B { y: Int }",
        )
        .unwrap_err();
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("only one schema definition"));
    }

    #[test]
    fn test_schema_without_roots() {
        let graph = TypeGraph::parse("type User { id: ID! name: String }").unwrap();
        assert_eq!(graph.root_types().count(), 0);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_syntax_error_is_schema_error() {
        let err = TypeGraph::parse("type User {").unwrap_err();
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("Failed to parse schema"));
    }

    #[test]
    fn test_unknown_field_type_is_rejected() {
        let err = TypeGraph::parse("type Query { user: User }").unwrap_err();
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("Unknown type \"User\""));
    }

    #[test]
    fn test_unknown_argument_type_is_rejected() {
        let err = TypeGraph::parse("type Query { user(filter: Filter): String }").unwrap_err();
        assert!(err.to_string().contains("\"Filter\""));
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let err = TypeGraph::parse("type A { x: Int } type A { y: Int }").unwrap_err();
        assert!(err.to_string().contains("only one type named \"A\""));
    }

    #[test]
    fn test_missing_explicit_root_is_rejected() {
        let err = TypeGraph::parse("schema { query: Missing } type A { x: Int }").unwrap_err();
        assert!(err.to_string().contains("query root type \"Missing\""));
    }

    #[test]
    fn test_extensions_are_merged() {
        let graph = TypeGraph::parse(
            r"
            type Query { a: Int }
            extend type Query { b: String }
            enum Color { RED }
            extend enum Color { GREEN }
            ",
        )
        .unwrap();

        let Some(TypeKind::Object(query)) = graph.get("Query").map(|t| &t.kind) else {
            panic!("Query should be an object type");
        };
        assert_eq!(query.fields.len(), 2);

        let Some(TypeKind::Enum(color)) = graph.get("Color").map(|t| &t.kind) else {
            panic!("Color should be an enum");
        };
        assert_eq!(color.values.len(), 2);
    }

    #[test]
    fn test_extension_of_undefined_type_is_rejected() {
        let err = TypeGraph::parse("extend type Ghost { a: Int }").unwrap_err();
        assert!(err.to_string().contains("Cannot extend type \"Ghost\""));
    }

    #[test]
    fn test_extension_with_wrong_kind_is_rejected() {
        let err = TypeGraph::parse("type A { x: Int } extend enum A { B }").unwrap_err();
        assert!(err.to_string().contains("Cannot extend object type \"A\" as enum"));
    }

    #[test]
    fn test_union_member_must_be_object() {
        let err = TypeGraph::parse("enum E { A } union U = E").unwrap_err();
        assert!(err.to_string().contains("member \"E\""));
    }

    #[test]
    fn test_graph_ids_are_unique() {
        let a = TypeGraph::parse("type A { x: Int }").unwrap();
        let b = TypeGraph::parse("type A { x: Int }").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_builtin_scalars_are_known_but_not_defined() {
        let graph = TypeGraph::parse("type A { x: Int }").unwrap();
        assert!(graph.is_known_type("Int"));
        assert!(!graph.contains("Int"));
    }

    #[test]
    fn test_implementors_are_sorted() {
        let graph = TypeGraph::parse(
            r"
            interface Node { id: ID! }
            type Zebra implements Node { id: ID! }
            type Ant implements Node { id: ID! }
            type Loner { id: ID! }
            ",
        )
        .unwrap();
        assert_eq!(graph.implementors("Node"), vec!["Ant", "Zebra"]);
    }
}
