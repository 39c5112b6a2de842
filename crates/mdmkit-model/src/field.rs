//! Schema field variant model
//!
//! A `Field` is one of three shapes: a plain reference to a variable, a
//! block grouping sub-fields, or a loop grouping repeated sub-fields. The
//! sum type replaces the source format's runtime tag dispatch, so consumers
//! get exhaustiveness checking at compile time. Blocks and loops nest to
//! arbitrary depth; the recursive spine is dismantled iteratively on drop.

use serde::{Deserialize, Serialize};

use crate::category::Categories;
use crate::collection::VersionedCollection;
use crate::label::Labels;
use crate::property::{LabelStyles, Notes, Properties, Styles, Templates};
use crate::routing::Routings;

/// A by-name reference to a variable, resolved by consumers - never a
/// structural pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Reference id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Name of the referenced variable.
    pub target: String,
}

impl Reference {
    /// Create a reference.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target: target.into(),
        }
    }
}

/// Fields common to every schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldBase {
    /// Node name.
    pub name: String,

    /// Own property set.
    pub properties: Option<Properties>,

    /// Own template set.
    pub templates: Option<Templates>,

    /// Display labels.
    pub labels: Option<Labels>,

    /// Label style properties.
    pub label_styles: Option<LabelStyles>,

    /// Own style properties.
    pub styles: Option<Styles>,

    /// Notes attached to the node.
    pub notes: Option<Notes>,
}

impl FieldBase {
    /// Create a base with no settings attached.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: None,
            templates: None,
            labels: None,
            label_styles: None,
            styles: None,
            notes: None,
        }
    }
}

/// A leaf field: a reference to a variable by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableField {
    /// Common node fields.
    pub base: FieldBase,

    /// The referenced variable.
    pub reference: Reference,
}

impl VariableField {
    /// Create a leaf field from a reference; the node takes the reference's
    /// name.
    pub fn new(reference: Reference) -> Self {
        Self {
            base: FieldBase::new(reference.name.clone()),
            reference,
        }
    }
}

/// A named, versioned set of page references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pages {
    /// Set name.
    pub name: String,

    /// Namespace key for qualified lookup.
    pub global_namespace: String,

    /// Member references under version control.
    pub items: VersionedCollection<Reference>,
}

impl Pages {
    /// Create an empty page set.
    pub fn new(name: impl Into<String>, global_namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            global_namespace: global_namespace.into(),
            items: VersionedCollection::new(),
        }
    }
}

/// Iteration bounds of a loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopRange {
    /// Lower bound, as written in the source.
    pub lower_bound: Option<String>,

    /// Upper bound.
    pub upper_bound: Option<String>,
}

/// A named, versioned collection of sub-fields.
///
/// Used by blocks and loops; members may themselves be blocks or loops, so
/// nested structures inherit versioning for free.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubFields {
    /// Collection name.
    pub name: String,

    /// Namespace key for qualified lookup.
    pub global_namespace: String,

    /// Member fields under version control.
    pub items: VersionedCollection<Field>,
}

impl SubFields {
    /// Create an empty sub-field collection.
    pub fn new(name: impl Into<String>, global_namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            global_namespace: global_namespace.into(),
            items: VersionedCollection::new(),
        }
    }
}

impl Drop for SubFields {
    fn drop(&mut self) {
        dismantle_fields(std::mem::take(&mut self.items));
    }
}

/// Tear down a field collection with an explicit work stack instead of
/// recursive drops; nesting depth is unbounded in real documents.
pub(crate) fn dismantle_fields(items: VersionedCollection<Field>) {
    let (active, deleted) = items.into_parts();
    let mut stack = active;
    stack.extend(deleted);

    while let Some(field) = stack.pop() {
        let fields = match field {
            Field::Variable(_) => None,
            Field::Block(mut block) => block.fields.take(),
            Field::Loop(mut looped) => looped.fields.take(),
        };
        if let Some(mut sub) = fields {
            let (active, deleted) = std::mem::take(&mut sub.items).into_parts();
            stack.extend(active);
            stack.extend(deleted);
        }
    }
}

/// A named grouping whose members are themselves fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockField {
    /// Common node fields.
    pub base: FieldBase,

    /// Block id.
    pub id: String,

    /// Namespace key for qualified lookup.
    pub global_namespace: String,

    /// Type references.
    pub types: Option<Pages>,

    /// Page references.
    pub pages: Option<Pages>,

    /// Member fields; `None` when the block declares none.
    pub fields: Option<SubFields>,

    /// Routing attached to the block.
    pub routings: Option<Routings>,
}

impl BlockField {
    /// Create an empty block.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        global_namespace: impl Into<String>,
    ) -> Self {
        Self {
            base: FieldBase::new(name),
            id: id.into(),
            global_namespace: global_namespace.into(),
            types: None,
            pages: None,
            fields: None,
            routings: None,
        }
    }
}

/// A grouping of repeated (looped) sub-fields.
///
/// Structurally analogous to a block, plus iteration detail: bounds,
/// iterated categories and the grid rendering flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopField {
    /// Common node fields.
    pub base: FieldBase,

    /// Loop id.
    pub id: String,

    /// Namespace key for qualified lookup.
    pub global_namespace: Option<String>,

    /// `true` when the source wrote this loop with the grid tag.
    pub grid: bool,

    /// Grid flag attribute, as written.
    pub is_grid: Option<String>,

    /// Iterator type tag.
    pub iterator_type: String,

    /// Format-defined loop type.
    pub loop_type: String,

    /// Type references.
    pub types: Option<Pages>,

    /// Page references.
    pub pages: Option<Pages>,

    /// Iteration bounds, lazily allocated.
    pub ranges: Option<Vec<LoopRange>>,

    /// Categories iterated over.
    pub categories: Option<Categories>,

    /// Member fields; `None` when the loop declares none.
    pub fields: Option<SubFields>,
}

impl LoopField {
    /// Create an empty loop.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            base: FieldBase::new(name),
            id: id.into(),
            global_namespace: None,
            grid: false,
            is_grid: None,
            iterator_type: String::new(),
            loop_type: String::new(),
            types: None,
            pages: None,
            ranges: None,
            categories: None,
            fields: None,
        }
    }

    /// Append an iteration range, allocating the sequence on first call.
    pub fn push_range(&mut self, range: LoopRange) {
        self.ranges.get_or_insert_with(Vec::new).push(range);
    }
}

/// One schema node: a variable reference, a block, or a loop.
///
/// Consumers dispatch on the variant, never on a runtime tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    /// Leaf reference to a variable.
    Variable(VariableField),

    /// Block of sub-fields.
    Block(BlockField),

    /// Loop of repeated sub-fields.
    Loop(LoopField),
}

impl Field {
    /// The variant discriminant.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Variable(_) => FieldKind::Variable,
            Self::Block(_) => FieldKind::Block,
            Self::Loop(_) => FieldKind::Loop,
        }
    }

    /// Shared base fields of any variant.
    pub fn base(&self) -> &FieldBase {
        match self {
            Self::Variable(f) => &f.base,
            Self::Block(f) => &f.base,
            Self::Loop(f) => &f.base,
        }
    }

    /// Mutable access to the shared base fields.
    pub fn base_mut(&mut self) -> &mut FieldBase {
        match self {
            Self::Variable(f) => &mut f.base,
            Self::Block(f) => &mut f.base,
            Self::Loop(f) => &mut f.base,
        }
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.base().name
    }
}

/// Fieldless discriminant of [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Variable reference.
    Variable,

    /// Block of sub-fields.
    Block,

    /// Loop of repeated sub-fields.
    Loop,
}

/// An unrecognized field tag is a format error, never a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized field tag '{0}'")]
pub struct UnknownFieldKind(pub String);

impl FieldKind {
    /// The canonical markup tag of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Block => "class",
            Self::Loop => "loop",
        }
    }

    /// Classify a markup tag. Both `loop` and `grid` denote loops.
    pub fn from_tag(tag: &str) -> Result<Self, UnknownFieldKind> {
        match tag {
            "variable" => Ok(Self::Variable),
            "class" => Ok(Self::Block),
            "loop" | "grid" => Ok(Self::Loop),
            other => Err(UnknownFieldKind(other.to_string())),
        }
    }
}

impl std::str::FromStr for FieldKind {
    type Err = UnknownFieldKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with_two_references() -> BlockField {
        let mut block = BlockField::new("_b1", "Block1", "");
        let mut fields = SubFields::new("Block1", "");
        fields.items.push(Field::Variable(VariableField::new(
            Reference::new("_q1", "Q1", "ref_Q1"),
        )));
        fields.items.push(Field::Variable(VariableField::new(
            Reference::new("_q2", "Q2", "ref_Q2"),
        )));
        block.fields = Some(fields);
        block
    }

    #[test]
    fn block_subfields_in_insertion_order() {
        let block = block_with_two_references();
        let items = &block.fields.as_ref().unwrap().items;

        let names: Vec<&str> = items.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["Q1", "Q2"]);
        assert!(items.deleted().is_empty());
    }

    #[test]
    fn deleting_a_subfield_moves_it() {
        let mut block = block_with_two_references();
        let items = &mut block.fields.as_mut().unwrap().items;

        assert!(items.mark_deleted(|f| f.name() == "Q1"));

        let active: Vec<&str> = items.iter().map(|f| f.name()).collect();
        assert_eq!(active, ["Q2"]);
        assert_eq!(items.deleted().len(), 1);
        assert_eq!(items.deleted()[0].name(), "Q1");
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let err = FieldKind::from_tag("matrix").unwrap_err();
        assert_eq!(err.0, "matrix");

        assert_eq!(FieldKind::from_tag("grid"), Ok(FieldKind::Loop));
        assert_eq!(FieldKind::from_tag("class"), Ok(FieldKind::Block));
    }

    #[test]
    fn kind_dispatch_matches_variant() {
        let field = Field::Block(BlockField::new("_b", "B", ""));
        assert_eq!(field.kind(), FieldKind::Block);
        assert_eq!(field.kind().as_str(), "class");
    }

    #[test]
    fn deep_nesting_drops_without_overflow() {
        let mut inner = BlockField::new("_b", "inner", "");
        for i in 0..50_000 {
            let mut outer = BlockField::new("_b", format!("b{i}"), "");
            let mut fields = SubFields::new("fields", "");
            fields.items.push(Field::Block(inner));
            outer.fields = Some(fields);
            inner = outer;
        }
        drop(inner);
    }
}
