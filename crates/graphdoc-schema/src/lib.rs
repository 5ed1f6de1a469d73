//! GraphQL schema loading and types reference construction.
//!
//! Parses schema definition language into a navigable [`TypeGraph`] and
//! turns that graph into a [`TypesReference`]: a serializable, render-ready
//! description of every documented type, grouped by kind and sorted by name.
//!
//! # Examples
//!
//! ```
//! use graphdoc_schema::{BuildReference, ReferenceBuilder, SchemaSource, TypeKind};
//!
//! let schema = SchemaSource::from("type Query { me: User } type User { id: ID! }");
//! let reference = ReferenceBuilder::new().build(&schema).unwrap();
//!
//! assert_eq!(reference.query_type.as_deref(), Some("Query"));
//! assert_eq!(reference.get("User").unwrap().kind, TypeKind::Object);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod builder;
mod graph;
mod reference;
mod source;

pub use builder::{BuildReference, ReferenceBuilder};
pub use graph::{BUILTIN_DIRECTIVES, BUILTIN_SCALARS, TypeGraph};
pub use reference::{
    AppliedDirective, DirectiveArgument, DirectiveDescriptor, EnumValueDescriptor,
    FieldDescriptor, InputValueDescriptor, TypeCategory, TypeDescriptor, TypeKind, TypeRef,
    TypesReference,
};
pub use source::{SchemaIdentity, SchemaSource};
