//! mdmkit-model
//!
//! In-memory document object model for MDM survey-metadata documents:
//! recursive, partially-optional node types plus a reusable versioned
//! collection that tracks both current and soft-deleted members of a set.
//!
//! The model performs no parsing. An external parser populates the tree
//! bottom-up through the constructors and push operations here; consumers
//! then read it back, including the active/deleted partitioning needed to
//! reconstruct original markup order.

pub mod alias;
pub mod category;
pub mod collection;
pub mod definition;
pub mod document;
pub mod field;
pub mod label;
pub mod property;
pub mod range;
pub mod routing;

pub use alias::{AliasVariable, NativeValue, SubAlias};
pub use category::{Categories, Category, CategoryElement};
pub use collection::VersionedCollection;
pub use definition::{
    Definition, HelperFields, NodeSettings, OtherVarDefinition, OtherVarKind, VarDefinition,
};
pub use document::{
    Alternative, Atom, CategoryId, Connection, Context, Contexts, DataSources, Language,
    Languages, MdmDocument, SaveLog, User, VarInstance,
};
pub use field::{
    BlockField, Field, FieldBase, FieldKind, LoopField, LoopRange, Pages, Reference, SubFields,
    UnknownFieldKind, VariableField,
};
pub use label::{Labels, Text};
pub use property::{LabelStyles, Notes, Properties, Property, Styles, Templates};
pub use range::Range;
pub use routing::{Routing, RoutingItem, Routings, Script, ScriptType, Scripts};
