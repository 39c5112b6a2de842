//! Document construction from parsed elements
//!
//! One `read_*` function per node type, each driven purely by attribute
//! lookup and child iteration on a [`ParsedElement`] tree. Nodes are built
//! leaves-first and moved into their owners only when complete, so a
//! partially-built parent is never observable.

use mdmkit_model::{
    AliasVariable, Alternative, Atom, BlockField, Categories, Category, CategoryElement,
    CategoryId, Connection, Context, Contexts, DataSources, Definition, Field, FieldKind,
    HelperFields, Labels, Language, Languages, LoopField, LoopRange, MdmDocument, NodeSettings,
    OtherVarDefinition, OtherVarKind, Pages, Properties, Property, Range, Reference, Routing,
    Routings, SaveLog, Script, ScriptType, Scripts, Styles, SubFields, Text, UnknownFieldKind,
    User, VarDefinition, VarInstance, VariableField,
};

use crate::element::ParsedElement;
use crate::options::{ReaderOptions, UnknownNodePolicy};

/// A tolerated unknown element, recorded when the policy is `Warn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadWarning {
    /// Tag of the unknown element.
    pub tag: String,

    /// Tag of its parent.
    pub parent: String,
}

/// Errors raised while building a document from parsed elements.
///
/// Absent optional attributes and children are not errors; they read as
/// `None` or an empty default. Everything here is malformed input the caller
/// can inspect and decide to skip, abort on, or report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadError {
    /// A child element the format does not define, under the strict policy.
    #[error("unknown element '{tag}' in '{parent}'")]
    UnknownNode {
        /// Tag of the offending element.
        tag: String,
        /// Tag of its parent.
        parent: String,
    },

    /// A required attribute with no valid default is missing.
    #[error("missing required attribute '{attribute}' on '{tag}'")]
    MissingAttribute {
        /// Tag of the offending element.
        tag: String,
        /// Name of the missing attribute.
        attribute: String,
    },

    /// A structurally single child occurred more than once.
    #[error("more than one '{tag}' child in '{parent}'")]
    DuplicateChild {
        /// Tag of the repeated child.
        tag: String,
        /// Tag of its parent.
        parent: String,
    },

    /// Element nesting went past the configured bound.
    #[error("element nesting exceeds the configured limit of {limit}")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A field collection member with an unrecognized variant tag.
    #[error(transparent)]
    UnknownFieldKind(#[from] UnknownFieldKind),
}

/// Builds an [`MdmDocument`] (or any single node) from a parsed element
/// tree.
#[derive(Debug, Default)]
pub struct DocumentReader {
    options: ReaderOptions,
    warnings: Vec<ReadWarning>,
    depth: usize,
}

impl DocumentReader {
    /// Create a reader with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with the given options.
    pub fn with_options(options: ReaderOptions) -> Self {
        Self {
            options,
            warnings: Vec::new(),
            depth: 0,
        }
    }

    /// Warnings recorded by the last read.
    pub fn warnings(&self) -> &[ReadWarning] {
        &self.warnings
    }

    /// Take the recorded warnings, leaving the reader empty.
    pub fn take_warnings(&mut self) -> Vec<ReadWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Read a whole document from its root element.
    pub fn read_document<E: ParsedElement>(&mut self, root: &E) -> Result<MdmDocument, ReadError> {
        self.warnings.clear();
        self.depth = 0;

        let mut doc = MdmDocument::new();
        doc.create_version = attr(root, "mdmcreateversion");
        doc.last_version = attr(root, "mdmlastversion");
        doc.id = attr(root, "id");
        doc.data_version = attr(root, "dataversion");
        doc.data_sub_version = attr(root, "datasubversion");
        doc.system_variable = attr(root, "systemvariable");
        doc.db_filter_validation = attr(root, "dbfiltervalidation");
        doc.xmlns = attr(root, "xmlns");

        for child in root.children() {
            match child.tag() {
                "datasources" => doc.data_sources = Some(self.read_data_sources(child)?),
                "properties" => doc.properties = self.read_properties(child)?,
                "styles" => doc.styles = self.read_property_collection(child)?,
                "definition" => doc.definitions = self.read_definitions(child)?,
                "design" => self.read_design(child, &mut doc)?,
                "routings" => doc.routings = Some(self.read_routings(child)?),
                "mappings" => doc.mappings = self.read_mappings(child)?,
                "aliases" => doc.aliases = self.read_aliases(child)?,
                "languages" => doc.languages = Some(self.read_languages(child)?),
                "contexts" => doc.contexts = Some(self.read_contexts(child)?),
                "labeltypes" => doc.label_contexts = Some(self.read_contexts(child)?),
                "atoms" => doc.atoms = self.read_atoms(child)?,
                "categorymap" => doc.category_map = self.read_category_map(child)?,
                "savelogs" => doc.save_logs = self.read_save_logs(child)?,
                _ => self.unknown(child.tag(), root.tag())?,
            }
        }

        tracing::debug!(
            definitions = doc.definitions.len(),
            mappings = doc.mappings.len(),
            "document read"
        );
        Ok(doc)
    }

    fn read_design<E: ParsedElement>(
        &mut self,
        node: &E,
        doc: &mut MdmDocument,
    ) -> Result<(), ReadError> {
        for child in node.children() {
            match child.tag() {
                "fields" => doc.design = Some(self.read_subfields(child)?),
                "pages" => doc.pages = Some(self.read_pages(child)?),
                "routings" => doc.routings = Some(self.read_routings(child)?),
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(())
    }

    /// Read a `properties`-shaped element (also `templates`, `labelstyles`,
    /// `notes`). Direct `property` children are versioned; an `unversioned`
    /// wrapper holds the cross-version set; `deleted` wrappers route to the
    /// deleted sequence at either level.
    pub fn read_properties<E: ParsedElement>(&mut self, node: &E) -> Result<Properties, ReadError> {
        self.enter()?;
        let mut props = Properties::new();
        for child in node.children() {
            match child.tag() {
                "property" => props.values.push(self.read_property(child)?),
                "unversioned" => {
                    for inner in child.children() {
                        match inner.tag() {
                            "property" => props.unversioned.push(self.read_property(inner)?),
                            "deleted" => {
                                for del in inner.children() {
                                    if del.tag() == "property" {
                                        props.unversioned.push_deleted(self.read_property(del)?);
                                    } else {
                                        self.unknown(del.tag(), inner.tag())?;
                                    }
                                }
                            }
                            _ => self.unknown(inner.tag(), child.tag())?,
                        }
                    }
                }
                "deleted" => {
                    for del in child.children() {
                        if del.tag() == "property" {
                            props.values.push_deleted(self.read_property(del)?);
                        } else {
                            self.unknown(del.tag(), child.tag())?;
                        }
                    }
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        self.leave();
        Ok(props)
    }

    /// Read a bare versioned property collection (`styles`).
    pub fn read_property_collection<E: ParsedElement>(
        &mut self,
        node: &E,
    ) -> Result<Styles, ReadError> {
        self.enter()?;
        let mut styles = Styles::new();
        for child in node.children() {
            match child.tag() {
                "property" => styles.push(self.read_property(child)?),
                "deleted" => {
                    for del in child.children() {
                        if del.tag() == "property" {
                            styles.push_deleted(self.read_property(del)?);
                        } else {
                            self.unknown(del.tag(), child.tag())?;
                        }
                    }
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        self.leave();
        Ok(styles)
    }

    /// Read one property. The name attribute is required; a property with no
    /// name has no valid default.
    pub fn read_property<E: ParsedElement>(&mut self, node: &E) -> Result<Property, ReadError> {
        self.enter()?;
        let name = require_attr(node, "name")?;
        let mut property = Property::new(
            name,
            attr_or_empty(node, "value"),
            attr_or_empty(node, "type"),
            attr_or_empty(node, "context"),
        );
        property.data_source = attr(node, "ds");

        for child in node.children() {
            match child.tag() {
                "styles" => property.styles = Some(self.read_property_collection(child)?),
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        self.leave();
        Ok(property)
    }

    /// Read a label set.
    pub fn read_labels<E: ParsedElement>(&mut self, node: &E) -> Result<Labels, ReadError> {
        let mut labels = Labels::new(attr_or_empty(node, "context"));
        for child in node.children() {
            if child.tag() == "text" {
                labels.push_text(Text::new(
                    attr_or_empty(child, "context"),
                    attr_or_empty(child, "xml:lang"),
                    child.text().unwrap_or(""),
                ));
            } else {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(labels)
    }

    fn read_setting_child<E: ParsedElement>(
        &mut self,
        child: &E,
        settings: &mut NodeSettings,
    ) -> Result<bool, ReadError> {
        match child.tag() {
            "properties" => settings.properties = Some(self.read_properties(child)?),
            "templates" => settings.templates = Some(self.read_properties(child)?),
            "styles" => settings.styles = Some(self.read_property_collection(child)?),
            "labels" => settings.labels = Some(self.read_labels(child)?),
            "labelstyles" => settings.label_styles = Some(self.read_properties(child)?),
            "notes" => settings.notes = Some(self.read_properties(child)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Read a versioned page-reference set (`pages`, `types`).
    pub fn read_pages<E: ParsedElement>(&mut self, node: &E) -> Result<Pages, ReadError> {
        let mut pages = Pages::new(
            attr_or_empty(node, "name"),
            attr_or_empty(node, "global-name-space"),
        );
        for child in node.children() {
            match child.tag() {
                "page" => pages.items.push(read_reference(child)),
                "deleted" => {
                    for del in child.children() {
                        if del.tag() == "page" {
                            pages.items.push_deleted(read_reference(del));
                        } else {
                            self.unknown(del.tag(), child.tag())?;
                        }
                    }
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(pages)
    }

    /// Read a category tree node.
    pub fn read_categories<E: ParsedElement>(&mut self, node: &E) -> Result<Categories, ReadError> {
        self.enter()?;
        let mut cats = Categories::new(attr_or_empty(node, "global-name-space"));
        cats.id = attr(node, "id");
        cats.name = attr(node, "name");

        for child in node.children() {
            match child.tag() {
                "category" => {
                    let category = self.read_category(child)?;
                    cats.push_category(category);
                }
                "element" => {
                    let element = self.read_element(child)?;
                    cats.push_element(element);
                }
                "categories" => {
                    if cats.sub_categories.is_some() {
                        return Err(ReadError::DuplicateChild {
                            tag: "categories".to_string(),
                            parent: node.tag().to_string(),
                        });
                    }
                    let sub = self.read_categories(child)?;
                    cats.set_sub_categories(sub);
                }
                "properties" => cats.properties = Some(self.read_properties(child)?),
                "templates" => cats.templates = Some(self.read_properties(child)?),
                "labels" => cats.labels = Some(self.read_labels(child)?),
                "deleted" => {
                    for del in child.children() {
                        if del.tag() == "category" {
                            let category = self.read_category(del)?;
                            cats.push_deleted_category(category);
                        } else {
                            self.unknown(del.tag(), child.tag())?;
                        }
                    }
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        self.leave();
        Ok(cats)
    }

    /// Read one category.
    pub fn read_category<E: ParsedElement>(&mut self, node: &E) -> Result<Category, ReadError> {
        let mut category = Category::new(
            attr_or_empty(node, "id"),
            attr_or_empty(node, "name"),
        );
        category.fixed = attr(node, "fixed");
        category.no_filter = attr(node, "nofilter");
        category.missing = attr(node, "missing");
        category.exclusive = attr(node, "exclusive");
        category.other_local = attr(node, "other-local");
        category.factor_value = attr(node, "factor-value");
        category.factor_type = attr(node, "factor-type");
        category.keycode = attr(node, "keycode");
        category.expression = attr(node, "expression");

        let mut settings = NodeSettings::default();
        for child in node.children() {
            if self.read_setting_child(child, &mut settings)? {
                continue;
            }
            match child.tag() {
                "othervariable" => category.other_variable = Some(read_reference(child)),
                "multiplier-variable" => {
                    category.multiplier_variable = Some(read_reference(child));
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        category.properties = settings.properties;
        category.templates = settings.templates;
        category.labels = settings.labels;
        category.label_styles = settings.label_styles;
        category.styles = settings.styles;
        category.notes = settings.notes;
        Ok(category)
    }

    fn read_element<E: ParsedElement>(&mut self, node: &E) -> Result<CategoryElement, ReadError> {
        let mut element = CategoryElement::new(
            attr_or_empty(node, "id"),
            attr_or_empty(node, "name"),
            attr_or_empty(node, "type"),
        );
        for child in node.children() {
            match child.tag() {
                "labels" => element.labels = Some(self.read_labels(child)?),
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(element)
    }

    /// Read a sub-field collection. Every child must be a recognized field
    /// variant; an unrecognized tag is a format error regardless of the
    /// unknown-node policy.
    pub fn read_subfields<E: ParsedElement>(&mut self, node: &E) -> Result<SubFields, ReadError> {
        self.enter()?;
        let mut fields = SubFields::new(
            attr_or_empty(node, "name"),
            attr_or_empty(node, "global-name-space"),
        );
        for child in node.children() {
            if child.tag() == "deleted" {
                for del in child.children() {
                    let field = self.read_field(del)?;
                    fields.items.push_deleted(field);
                }
            } else {
                let field = self.read_field(child)?;
                fields.items.push(field);
            }
        }
        self.leave();
        Ok(fields)
    }

    /// Read one field, dispatching on its tag.
    pub fn read_field<E: ParsedElement>(&mut self, node: &E) -> Result<Field, ReadError> {
        match FieldKind::from_tag(node.tag())? {
            FieldKind::Variable => {
                let mut field = VariableField::new(read_reference(node));
                let mut settings = NodeSettings::default();
                for child in node.children() {
                    if !self.read_setting_child(child, &mut settings)? {
                        self.unknown(child.tag(), node.tag())?;
                    }
                }
                apply_settings(&mut field.base, settings);
                Ok(Field::Variable(field))
            }
            FieldKind::Block => Ok(Field::Block(self.read_block(node)?)),
            FieldKind::Loop => Ok(Field::Loop(self.read_loop(node)?)),
        }
    }

    /// Read a block field.
    pub fn read_block<E: ParsedElement>(&mut self, node: &E) -> Result<BlockField, ReadError> {
        self.enter()?;
        let mut block = BlockField::new(
            attr_or_empty(node, "id"),
            attr_or_empty(node, "name"),
            attr_or_empty(node, "global-name-space"),
        );

        let mut settings = NodeSettings::default();
        for child in node.children() {
            if self.read_setting_child(child, &mut settings)? {
                continue;
            }
            match child.tag() {
                "fields" => block.fields = Some(self.read_subfields(child)?),
                "pages" => block.pages = Some(self.read_pages(child)?),
                "types" => block.types = Some(self.read_pages(child)?),
                "routings" => block.routings = Some(self.read_routings(child)?),
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        apply_settings(&mut block.base, settings);
        self.leave();
        Ok(block)
    }

    /// Read a loop field (`loop` or `grid`).
    pub fn read_loop<E: ParsedElement>(&mut self, node: &E) -> Result<LoopField, ReadError> {
        self.enter()?;
        let mut looped = LoopField::new(
            attr_or_empty(node, "id"),
            attr_or_empty(node, "name"),
        );
        looped.grid = node.tag() == "grid";
        looped.global_namespace = attr(node, "global-name-space");
        looped.is_grid = attr(node, "isgrid");
        looped.iterator_type = attr_or_empty(node, "iteratortype");
        looped.loop_type = attr_or_empty(node, "type");

        let mut settings = NodeSettings::default();
        for child in node.children() {
            if self.read_setting_child(child, &mut settings)? {
                continue;
            }
            match child.tag() {
                "fields" => looped.fields = Some(self.read_subfields(child)?),
                "class" => {
                    // The loop body may arrive wrapped in a class element.
                    for inner in child.children() {
                        match inner.tag() {
                            "fields" => looped.fields = Some(self.read_subfields(inner)?),
                            "pages" => looped.pages = Some(self.read_pages(inner)?),
                            "types" => looped.types = Some(self.read_pages(inner)?),
                            _ => self.unknown(inner.tag(), child.tag())?,
                        }
                    }
                }
                "categories" => looped.categories = Some(self.read_categories(child)?),
                "ranges" => {
                    for range in child.children() {
                        if range.tag() == "range" {
                            looped.push_range(LoopRange {
                                lower_bound: attr(range, "lowerbound"),
                                upper_bound: attr(range, "upperbound"),
                            });
                        } else {
                            self.unknown(range.tag(), child.tag())?;
                        }
                    }
                }
                "pages" => looped.pages = Some(self.read_pages(child)?),
                "types" => looped.types = Some(self.read_pages(child)?),
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        apply_settings(&mut looped.base, settings);
        self.leave();
        Ok(looped)
    }

    /// Read a routing section.
    pub fn read_routings<E: ParsedElement>(&mut self, node: &E) -> Result<Routings, ReadError> {
        let mut routings = Routings::new(attr_or_empty(node, "name"));
        for child in node.children() {
            match child.tag() {
                "scripts" => routings.scripts = Some(self.read_scripts(child)?),
                "routing" => {
                    let routing = self.read_routing(child)?;
                    routings.routing.push(routing);
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(routings)
    }

    /// Read a versioned script-group set.
    pub fn read_scripts<E: ParsedElement>(&mut self, node: &E) -> Result<Scripts, ReadError> {
        let mut scripts = Scripts::new();
        for child in node.children() {
            match child.tag() {
                "scripttype" => {
                    let group = self.read_script_type(child)?;
                    scripts.push(group);
                }
                "deleted" => {
                    for del in child.children() {
                        if del.tag() == "scripttype" {
                            let group = self.read_script_type(del)?;
                            scripts.push_deleted(group);
                        } else {
                            self.unknown(del.tag(), child.tag())?;
                        }
                    }
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(scripts)
    }

    /// Read one script group.
    pub fn read_script_type<E: ParsedElement>(&mut self, node: &E) -> Result<ScriptType, ReadError> {
        let mut group = ScriptType::new(
            attr_or_empty(node, "type"),
            attr_or_empty(node, "context"),
            attr_or_empty(node, "interviewmodes"),
            attr_or_empty(node, "usekeycodes"),
        );
        for child in node.children() {
            match child.tag() {
                "script" => group.scripts.push(read_script(child)),
                "deleted" => {
                    for del in child.children() {
                        if del.tag() == "script" {
                            group.scripts.push_deleted(read_script(del));
                        } else {
                            self.unknown(del.tag(), child.tag())?;
                        }
                    }
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(group)
    }

    /// Read one routing context.
    pub fn read_routing<E: ParsedElement>(&mut self, node: &E) -> Result<Routing, ReadError> {
        let mut routing = Routing::new(
            attr_or_empty(node, "context"),
            attr_or_empty(node, "interviewmodes"),
            attr_or_empty(node, "usekeycodes"),
        );
        for child in node.children() {
            if child.tag() == "ritem" {
                routing.push(attr_or_empty(child, "name"), attr_or_empty(child, "item"));
            } else {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(routing)
    }

    /// Read the definition section.
    pub fn read_definitions<E: ParsedElement>(
        &mut self,
        node: &E,
    ) -> Result<Vec<Definition>, ReadError> {
        let mut definitions = Vec::new();
        for child in node.children() {
            match child.tag() {
                "variable" => {
                    definitions.push(Definition::Variable(self.read_var_definition(child)?));
                }
                "othervariable" => definitions.push(Definition::OtherVariable(
                    self.read_other_var_definition(child, OtherVarKind::Other)?,
                )),
                "multiplier-variable" => definitions.push(Definition::OtherVariable(
                    self.read_other_var_definition(child, OtherVarKind::Multiplier)?,
                )),
                "categories" => {
                    definitions.push(Definition::Categories(self.read_categories(child)?));
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(definitions)
    }

    /// Read a variable definition.
    pub fn read_var_definition<E: ParsedElement>(
        &mut self,
        node: &E,
    ) -> Result<VarDefinition, ReadError> {
        let mut var = VarDefinition::new(
            attr_or_empty(node, "id"),
            attr_or_empty(node, "name"),
            attr_or_empty(node, "type"),
        );
        var.range = read_range(node);

        let mut settings = NodeSettings::default();
        for child in node.children() {
            if self.read_setting_child(child, &mut settings)? {
                continue;
            }
            match child.tag() {
                "categories" => var.categories = Some(self.read_categories(child)?),
                "helperfields" => var.helper_fields = Some(self.read_helper_fields(child)?),
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        var.settings = settings;
        Ok(var)
    }

    fn read_other_var_definition<E: ParsedElement>(
        &mut self,
        node: &E,
        kind: OtherVarKind,
    ) -> Result<OtherVarDefinition, ReadError> {
        let mut settings = NodeSettings::default();
        for child in node.children() {
            if !self.read_setting_child(child, &mut settings)? {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(OtherVarDefinition {
            id: attr_or_empty(node, "id"),
            name: attr_or_empty(node, "name"),
            variable_type: attr_or_empty(node, "type"),
            usage_type: attr_or_empty(node, "usagetype"),
            kind,
            settings,
        })
    }

    /// Read a helper-field set.
    pub fn read_helper_fields<E: ParsedElement>(
        &mut self,
        node: &E,
    ) -> Result<HelperFields, ReadError> {
        let mut helpers = HelperFields::new(
            attr_or_empty(node, "id"),
            attr_or_empty(node, "name"),
            attr_or_empty(node, "global-name-space"),
        );
        for child in node.children() {
            if child.tag() == "deleted" {
                for del in child.children() {
                    let field = self.read_field(del)?;
                    helpers.items.push_deleted(field);
                }
            } else {
                let field = self.read_field(child)?;
                helpers.items.push(field);
            }
        }
        Ok(helpers)
    }

    fn read_data_sources<E: ParsedElement>(&mut self, node: &E) -> Result<DataSources, ReadError> {
        let mut sources = DataSources {
            default_source: attr(node, "default"),
            connections: Vec::new(),
        };
        for child in node.children() {
            if child.tag() == "connection" {
                sources.connections.push(Connection {
                    name: attr_or_empty(child, "name"),
                    db_location: attr_or_empty(child, "dblocation"),
                    cdsc_name: attr_or_empty(child, "cdscname"),
                    project: attr_or_empty(child, "project"),
                    id: attr_or_empty(child, "id"),
                });
            } else {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(sources)
    }

    fn read_mappings<E: ParsedElement>(&mut self, node: &E) -> Result<Vec<VarInstance>, ReadError> {
        let mut mappings = Vec::new();
        for child in node.children() {
            if child.tag() == "varinstance" {
                mappings.push(VarInstance {
                    name: attr_or_empty(child, "name"),
                    source_type: attr_or_empty(child, "sourcetype"),
                    variable: attr_or_empty(child, "variable"),
                    full_name: attr_or_empty(child, "fullname"),
                });
            } else {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(mappings)
    }

    fn read_aliases<E: ParsedElement>(&mut self, node: &E) -> Result<Vec<AliasVariable>, ReadError> {
        let mut aliases = Vec::new();
        for child in node.children() {
            if child.tag() == "aliasvariable" {
                aliases.push(self.read_alias_variable(child)?);
            } else {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(aliases)
    }

    /// Read one alias variable.
    pub fn read_alias_variable<E: ParsedElement>(
        &mut self,
        node: &E,
    ) -> Result<AliasVariable, ReadError> {
        let mut alias = AliasVariable::new(
            attr_or_empty(node, "fullname"),
            attr_or_empty(node, "aliasname"),
        );
        alias.range = read_range(node);
        for child in node.children() {
            match child.tag() {
                "nativevalue" => alias.push_native_value(
                    attr_or_empty(child, "fullname"),
                    attr_or_empty(child, "value"),
                ),
                "subalias" => alias.push_sub_alias(
                    attr_or_empty(child, "index"),
                    attr_or_empty(child, "name"),
                ),
                "properties" => alias.properties = Some(self.read_properties(child)?),
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(alias)
    }

    fn read_languages<E: ParsedElement>(&mut self, node: &E) -> Result<Languages, ReadError> {
        let mut languages = Languages {
            base: attr_or_empty(node, "base"),
            items: Default::default(),
        };
        for child in node.children() {
            match child.tag() {
                "language" => {
                    let language = self.read_language(child)?;
                    languages.items.push(language);
                }
                "deleted" => {
                    for del in child.children() {
                        if del.tag() == "language" {
                            let language = self.read_language(del)?;
                            languages.items.push_deleted(language);
                        } else {
                            self.unknown(del.tag(), child.tag())?;
                        }
                    }
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(languages)
    }

    fn read_language<E: ParsedElement>(&mut self, node: &E) -> Result<Language, ReadError> {
        let mut language = Language {
            name: attr_or_empty(node, "name"),
            id: attr_or_empty(node, "id"),
            properties: None,
        };
        for child in node.children() {
            match child.tag() {
                "properties" => language.properties = Some(self.read_properties(child)?),
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(language)
    }

    fn read_contexts<E: ParsedElement>(&mut self, node: &E) -> Result<Contexts, ReadError> {
        let mut contexts = Contexts {
            base: attr_or_empty(node, "base"),
            items: Default::default(),
        };
        for child in node.children() {
            match child.tag() {
                "context" => {
                    let context = self.read_context(child)?;
                    contexts.items.push(context);
                }
                "deleted" => {
                    for del in child.children() {
                        if del.tag() == "context" {
                            let context = self.read_context(del)?;
                            contexts.items.push_deleted(context);
                        } else {
                            self.unknown(del.tag(), child.tag())?;
                        }
                    }
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(contexts)
    }

    fn read_context<E: ParsedElement>(&mut self, node: &E) -> Result<Context, ReadError> {
        let mut context = Context {
            name: attr_or_empty(node, "name"),
            alternatives: None,
        };
        for child in node.children() {
            match child.tag() {
                "alternatives" => {
                    let mut alternatives = mdmkit_model::VersionedCollection::new();
                    for alt in child.children() {
                        match alt.tag() {
                            "alternative" => alternatives.push(Alternative {
                                name: attr_or_empty(alt, "name"),
                            }),
                            "deleted" => {
                                for del in alt.children() {
                                    if del.tag() == "alternative" {
                                        alternatives.push_deleted(Alternative {
                                            name: attr_or_empty(del, "name"),
                                        });
                                    } else {
                                        self.unknown(del.tag(), alt.tag())?;
                                    }
                                }
                            }
                            _ => self.unknown(alt.tag(), child.tag())?,
                        }
                    }
                    context.alternatives = Some(alternatives);
                }
                _ => self.unknown(child.tag(), node.tag())?,
            }
        }
        Ok(context)
    }

    fn read_atoms<E: ParsedElement>(&mut self, node: &E) -> Result<Vec<Atom>, ReadError> {
        let mut atoms = Vec::new();
        for child in node.children() {
            if child.tag() == "atom" {
                atoms.push(Atom {
                    name: attr_or_empty(child, "name"),
                });
            } else {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(atoms)
    }

    fn read_category_map<E: ParsedElement>(
        &mut self,
        node: &E,
    ) -> Result<Vec<CategoryId>, ReadError> {
        let mut map = Vec::new();
        for child in node.children() {
            if child.tag() == "categoryid" {
                map.push(CategoryId {
                    name: attr_or_empty(child, "name"),
                    value: attr_or_empty(child, "value"),
                });
            } else {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(map)
    }

    fn read_save_logs<E: ParsedElement>(&mut self, node: &E) -> Result<Vec<SaveLog>, ReadError> {
        let mut logs = Vec::new();
        for child in node.children() {
            if child.tag() == "savelog" {
                logs.push(self.read_save_log(child)?);
            } else {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(logs)
    }

    fn read_save_log<E: ParsedElement>(&mut self, node: &E) -> Result<SaveLog, ReadError> {
        let mut log = SaveLog {
            file_version: attr_or_empty(node, "fileversion"),
            version_set: attr_or_empty(node, "versionset"),
            user_name: attr_or_empty(node, "username"),
            date: attr_or_empty(node, "date"),
            count: attr_or_empty(node, "count"),
            user: None,
        };
        for child in node.children() {
            if child.tag() == "user" {
                log.user = Some(User {
                    name: attr_or_empty(child, "name"),
                    file_version: attr_or_empty(child, "fileversion"),
                    comment: attr_or_empty(child, "comment"),
                });
            } else {
                self.unknown(child.tag(), node.tag())?;
            }
        }
        Ok(log)
    }

    fn unknown(&mut self, tag: &str, parent: &str) -> Result<(), ReadError> {
        match self.options.unknown_nodes {
            UnknownNodePolicy::Error => Err(ReadError::UnknownNode {
                tag: tag.to_string(),
                parent: parent.to_string(),
            }),
            UnknownNodePolicy::Warn => {
                tracing::warn!(tag, parent, "skipping unknown element");
                if self.options.collect_warnings {
                    self.warnings.push(ReadWarning {
                        tag: tag.to_string(),
                        parent: parent.to_string(),
                    });
                }
                Ok(())
            }
            UnknownNodePolicy::Ignore => Ok(()),
        }
    }

    fn enter(&mut self) -> Result<(), ReadError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(ReadError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

fn attr<E: ParsedElement>(node: &E, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

fn attr_or_empty<E: ParsedElement>(node: &E, name: &str) -> String {
    node.attribute(name).unwrap_or("").to_string()
}

fn require_attr<E: ParsedElement>(node: &E, name: &str) -> Result<String, ReadError> {
    match node.attribute(name) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ReadError::MissingAttribute {
            tag: node.tag().to_string(),
            attribute: name.to_string(),
        }),
    }
}

fn read_reference<E: ParsedElement>(node: &E) -> Reference {
    Reference::new(
        attr_or_empty(node, "id"),
        attr_or_empty(node, "name"),
        attr_or_empty(node, "ref"),
    )
}

fn read_script<E: ParsedElement>(node: &E) -> Script {
    Script::new(
        attr_or_empty(node, "name"),
        attr_or_empty(node, "default"),
        node.text().unwrap_or(""),
    )
}

fn read_range<E: ParsedElement>(node: &E) -> Range {
    Range {
        min_value: attr(node, "min"),
        min_type: attr(node, "mintype"),
        max_value: attr(node, "max"),
        max_type: attr(node, "maxtype"),
        effective_min_value: attr(node, "effectivemin"),
        effective_max_value: attr(node, "effectivemax"),
    }
}

fn apply_settings(base: &mut mdmkit_model::FieldBase, settings: NodeSettings) {
    base.properties = settings.properties;
    base.templates = settings.templates;
    base.labels = settings.labels;
    base.label_styles = settings.label_styles;
    base.styles = settings.styles;
    base.notes = settings.notes;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn reader() -> DocumentReader {
        DocumentReader::new()
    }

    #[test]
    fn property_requires_a_name() {
        let el = Element::new("property").with_attribute("value", "en");
        let err = reader().read_property(&el).unwrap_err();

        assert_eq!(
            err,
            ReadError::MissingAttribute {
                tag: "property".to_string(),
                attribute: "name".to_string(),
            }
        );
    }

    #[test]
    fn properties_split_versioned_and_unversioned() {
        let el = Element::new("properties")
            .with_child(
                Element::new("property")
                    .with_attribute("name", "Label")
                    .with_attribute("value", "v2"),
            )
            .with_child(
                Element::new("unversioned").with_child(
                    Element::new("property")
                        .with_attribute("name", "Lang")
                        .with_attribute("value", "en"),
                ),
            );

        let props = reader().read_properties(&el).unwrap();
        assert_eq!(props.get(0).map(|p| p.name.as_str()), Some("Label"));
        assert!(props.find_unversioned("Lang").is_some());
        assert!(props.find_unversioned("Label").is_none());
    }

    #[test]
    fn deleted_wrapper_routes_to_deleted() {
        let el = Element::new("fields")
            .with_attribute("name", "Block1")
            .with_child(
                Element::new("variable")
                    .with_attribute("name", "Q1")
                    .with_attribute("ref", "ref_Q1"),
            )
            .with_child(
                Element::new("deleted").with_child(
                    Element::new("variable")
                        .with_attribute("name", "Q0")
                        .with_attribute("ref", "ref_Q0"),
                ),
            );

        let fields = reader().read_subfields(&el).unwrap();
        assert_eq!(fields.items.len(), 1);
        assert_eq!(fields.items.deleted().len(), 1);
        assert_eq!(fields.items.deleted()[0].name(), "Q0");
    }

    #[test]
    fn unknown_field_tag_always_errors() {
        let el = Element::new("fields").with_child(Element::new("matrix"));

        // Even the lenient policy does not swallow an unknown field variant.
        let err = reader().read_subfields(&el).unwrap_err();
        assert!(matches!(err, ReadError::UnknownFieldKind(_)));
    }

    #[test]
    fn unknown_node_policy_strict_errors() {
        let el = Element::new("routing").with_child(Element::new("bogus"));

        let mut strict = DocumentReader::with_options(ReaderOptions::strict());
        let err = strict.read_routing(&el).unwrap_err();
        assert_eq!(
            err,
            ReadError::UnknownNode {
                tag: "bogus".to_string(),
                parent: "routing".to_string(),
            }
        );
    }

    #[test]
    fn unknown_node_policy_warn_records() {
        let el = Element::new("routing").with_child(Element::new("bogus"));

        let mut lenient = reader();
        lenient.read_routing(&el).unwrap();
        assert_eq!(lenient.warnings().len(), 1);
        assert_eq!(lenient.warnings()[0].tag, "bogus");
    }

    #[test]
    fn second_subcategories_child_is_rejected() {
        let el = Element::new("categories")
            .with_child(Element::new("categories"))
            .with_child(Element::new("categories"));

        let err = reader().read_categories(&el).unwrap_err();
        assert!(matches!(err, ReadError::DuplicateChild { .. }));
    }

    #[test]
    fn depth_limit_bounds_recursion() {
        let mut el = Element::new("categories");
        for _ in 0..40 {
            el = Element::new("categories").with_child(el);
        }

        let mut limited = DocumentReader::with_options(ReaderOptions {
            max_depth: 16,
            ..ReaderOptions::default()
        });
        let err = limited.read_categories(&el).unwrap_err();
        assert_eq!(err, ReadError::DepthExceeded { limit: 16 });
    }

    #[test]
    fn grid_tag_reads_as_loop() {
        let el = Element::new("grid")
            .with_attribute("id", "_g1")
            .with_attribute("name", "G1");

        let field = reader().read_field(&el).unwrap();
        match field {
            Field::Loop(looped) => assert!(looped.grid),
            other => panic!("expected a loop, got {:?}", other.kind()),
        }
    }

    #[test]
    fn absent_scripts_stay_absent() {
        let el = Element::new("routings").with_attribute("name", "main");
        let routings = reader().read_routings(&el).unwrap();
        assert!(routings.scripts.is_none());

        let el = Element::new("routings")
            .with_attribute("name", "main")
            .with_child(Element::new("scripts"));
        let routings = reader().read_routings(&el).unwrap();
        assert!(routings.scripts.is_some());
    }
}
