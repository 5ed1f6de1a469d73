//! Render-ready types reference.
//!
//! Every value here serializes all of its fields, using `null` or `[]` for
//! absent data, so templates can test any field without tripping over
//! missing keys.

use serde::{Deserialize, Serialize};

/// Structural kind of a documented type.
///
/// The declaration order is the presentation order of categories.
///
/// # Examples
///
/// ```
/// use graphdoc_schema::TypeKind;
///
/// assert!(TypeKind::Object < TypeKind::InputObject);
/// assert_eq!(TypeKind::InputObject.as_str(), "INPUT_OBJECT");
/// assert_eq!(TypeKind::from_name("UNION"), Some(TypeKind::Union));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    /// Object type
    Object,
    /// Interface type
    Interface,
    /// Union type
    Union,
    /// Enum type
    Enum,
    /// Custom scalar
    Scalar,
    /// Input object type
    InputObject,
}

impl TypeKind {
    /// All kinds in presentation order.
    pub const ALL: [Self; 6] = [
        Self::Object,
        Self::Interface,
        Self::Union,
        Self::Enum,
        Self::Scalar,
        Self::InputObject,
    ];

    /// Introspection name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::Scalar => "SCALAR",
            Self::InputObject => "INPUT_OBJECT",
        }
    }

    /// Heading used for the category in rendered documents.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Object => "Objects",
            Self::Interface => "Interfaces",
            Self::Union => "Unions",
            Self::Enum => "Enums",
            Self::Scalar => "Scalars",
            Self::InputObject => "Input Objects",
        }
    }

    /// Parses an introspection kind name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// A reference to a possibly wrapped type, e.g. `[User!]!`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Full type as written in SDL
    pub display: String,
    /// Innermost named type, used for cross-links
    pub name: String,
}

/// A directive applied to a schema element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDirective {
    /// Directive name without `@`
    pub name: String,
    /// Arguments in declaration order
    pub arguments: Vec<DirectiveArgument>,
}

/// One argument of an applied directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveArgument {
    /// Argument name
    pub name: String,
    /// Value as a GraphQL literal
    pub value: String,
}

/// An argument or input object field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValueDescriptor {
    /// Name
    pub name: String,
    /// Markdown description
    pub description: Option<String>,
    /// Declared type
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Default value as a GraphQL literal
    pub default_value: Option<String>,
    /// Whether `@deprecated` is applied
    pub is_deprecated: bool,
    /// Deprecation reason when deprecated
    pub deprecation_reason: Option<String>,
    /// Other applied directives
    pub directives: Vec<AppliedDirective>,
}

/// A field of an object or interface type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Name
    pub name: String,
    /// Markdown description
    pub description: Option<String>,
    /// Return type
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Arguments in declaration order
    pub arguments: Vec<InputValueDescriptor>,
    /// Whether `@deprecated` is applied
    pub is_deprecated: bool,
    /// Deprecation reason when deprecated
    pub deprecation_reason: Option<String>,
    /// Other applied directives
    pub directives: Vec<AppliedDirective>,
}

/// A value of an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDescriptor {
    /// Value name
    pub name: String,
    /// Markdown description
    pub description: Option<String>,
    /// Whether `@deprecated` is applied
    pub is_deprecated: bool,
    /// Deprecation reason when deprecated
    pub deprecation_reason: Option<String>,
    /// Other applied directives
    pub directives: Vec<AppliedDirective>,
}

/// A documented named type.
///
/// Member lists that do not apply to the kind are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name
    pub name: String,
    /// Structural kind
    pub kind: TypeKind,
    /// Markdown description
    pub description: Option<String>,
    /// Fields of objects and interfaces
    pub fields: Vec<FieldDescriptor>,
    /// Interfaces implemented by objects and interfaces
    pub interfaces: Vec<String>,
    /// Union members, or implementors of an interface
    pub possible_types: Vec<String>,
    /// Enum values
    pub enum_values: Vec<EnumValueDescriptor>,
    /// Fields of input objects
    pub input_fields: Vec<InputValueDescriptor>,
    /// `@specifiedBy` URL of a custom scalar
    pub specified_by_url: Option<String>,
    /// Applied directives other than `@specifiedBy`
    pub directives: Vec<AppliedDirective>,
}

/// A directive definition declared by the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveDescriptor {
    /// Name without `@`
    pub name: String,
    /// Markdown description
    pub description: Option<String>,
    /// Arguments in declaration order
    pub arguments: Vec<InputValueDescriptor>,
    /// Locations, e.g. `FIELD_DEFINITION`
    pub locations: Vec<String>,
    /// Whether the directive is repeatable
    pub is_repeatable: bool,
}

/// Types of one kind, as a contiguous slice of the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeCategory<'a> {
    /// Kind shared by every type in the group
    pub kind: TypeKind,
    /// Heading for the group
    pub title: &'static str,
    /// Types sorted by name
    pub types: &'a [TypeDescriptor],
}

/// Render-ready summary of a schema.
///
/// `types` is ordered by kind (see [`TypeKind::ALL`]) and then by name, so
/// each category occupies a contiguous run and repeated builds of the same
/// schema compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypesReference {
    /// Query root type name
    pub query_type: Option<String>,
    /// Mutation root type name
    pub mutation_type: Option<String>,
    /// Subscription root type name
    pub subscription_type: Option<String>,
    /// Documented types in presentation order
    pub types: Vec<TypeDescriptor>,
    /// Schema-defined directives sorted by name
    pub directives: Vec<DirectiveDescriptor>,
}

impl TypesReference {
    /// Groups the types by kind, skipping kinds with no types.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_schema::{BuildReference, ReferenceBuilder, SchemaSource, TypeKind};
    ///
    /// let schema = SchemaSource::from("type A { e: E } enum E { X } type B { a: A }");
    /// let reference = ReferenceBuilder::new().build(&schema).unwrap();
    /// let categories = reference.categories();
    ///
    /// assert_eq!(categories.len(), 2);
    /// assert_eq!(categories[0].kind, TypeKind::Object);
    /// assert_eq!(categories[0].types.len(), 2);
    /// assert_eq!(categories[1].title, "Enums");
    /// ```
    #[must_use]
    pub fn categories(&self) -> Vec<TypeCategory<'_>> {
        self.types
            .chunk_by(|a, b| a.kind == b.kind)
            .map(|types| TypeCategory {
                kind: types[0].kind,
                title: types[0].kind.title(),
                types,
            })
            .collect()
    }

    /// Finds a documented type by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.iter().find(|ty| ty.name == name)
    }

    /// Number of documented types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are documented.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
