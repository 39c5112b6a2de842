//! Element reconstruction from the model
//!
//! Inverse of the reader: every node becomes an [`Element`] whose tag and
//! attribute names match what the reader consumes. Collections always emit
//! their active members first, in order, then one `deleted` wrapper holding
//! the deleted members in order (omitted when there are none), so the
//! active/deleted partitioning round-trips exactly.

use mdmkit_model::{
    AliasVariable, BlockField, Categories, Category, CategoryElement, Context, Contexts, Field,
    HelperFields, Labels, LoopField, MdmDocument, OtherVarDefinition, OtherVarKind, Pages,
    Properties, Property, Range, Reference, Routing, Routings, ScriptType, Scripts, Styles,
    SubFields, VarDefinition, VariableField,
};

use crate::element::Element;

/// Write a whole document to an element tree.
pub fn write_document(doc: &MdmDocument) -> Element {
    let mut root = Element::new("metadata")
        .with_optional_attribute("mdmcreateversion", doc.create_version.as_deref())
        .with_optional_attribute("mdmlastversion", doc.last_version.as_deref())
        .with_optional_attribute("id", doc.id.as_deref())
        .with_optional_attribute("dataversion", doc.data_version.as_deref())
        .with_optional_attribute("datasubversion", doc.data_sub_version.as_deref())
        .with_optional_attribute("systemvariable", doc.system_variable.as_deref())
        .with_optional_attribute("dbfiltervalidation", doc.db_filter_validation.as_deref())
        .with_optional_attribute("xmlns", doc.xmlns.as_deref());

    if let Some(sources) = &doc.data_sources {
        let mut el = Element::new("datasources")
            .with_optional_attribute("default", sources.default_source.as_deref());
        for connection in &sources.connections {
            el.push_child(
                Element::new("connection")
                    .with_attribute("name", &connection.name)
                    .with_attribute("dblocation", &connection.db_location)
                    .with_attribute("cdscname", &connection.cdsc_name)
                    .with_attribute("project", &connection.project)
                    .with_attribute("id", &connection.id),
            );
        }
        root.push_child(el);
    }

    if !doc.properties.is_empty() {
        root.push_child(write_properties("properties", &doc.properties));
    }
    if !doc.styles.is_empty() {
        root.push_child(write_property_collection("styles", &doc.styles));
    }

    if !doc.definitions.is_empty() {
        let mut el = Element::new("definition");
        for definition in &doc.definitions {
            el.push_child(match definition {
                mdmkit_model::Definition::Variable(var) => write_var_definition(var),
                mdmkit_model::Definition::OtherVariable(var) => write_other_var_definition(var),
                mdmkit_model::Definition::Categories(cats) => write_categories(cats),
            });
        }
        root.push_child(el);
    }

    if doc.design.is_some() || doc.pages.is_some() {
        let mut el = Element::new("design");
        if let Some(design) = &doc.design {
            el.push_child(write_subfields(design));
        }
        if let Some(pages) = &doc.pages {
            el.push_child(write_pages("pages", pages));
        }
        root.push_child(el);
    }

    if let Some(routings) = &doc.routings {
        root.push_child(write_routings(routings));
    }

    if !doc.mappings.is_empty() {
        let mut el = Element::new("mappings");
        for instance in &doc.mappings {
            el.push_child(
                Element::new("varinstance")
                    .with_attribute("name", &instance.name)
                    .with_attribute("sourcetype", &instance.source_type)
                    .with_attribute("variable", &instance.variable)
                    .with_attribute("fullname", &instance.full_name),
            );
        }
        root.push_child(el);
    }

    if !doc.aliases.is_empty() {
        let mut el = Element::new("aliases");
        for alias in &doc.aliases {
            el.push_child(write_alias_variable(alias));
        }
        root.push_child(el);
    }

    if let Some(languages) = &doc.languages {
        let mut el = Element::new("languages").with_attribute("base", &languages.base);
        write_collection_into(&mut el, &languages.items, |language| {
            let mut lang = Element::new("language")
                .with_attribute("name", &language.name)
                .with_attribute("id", &language.id);
            if let Some(properties) = &language.properties {
                lang.push_child(write_properties("properties", properties));
            }
            lang
        });
        root.push_child(el);
    }

    if let Some(contexts) = &doc.contexts {
        root.push_child(write_contexts("contexts", contexts));
    }
    if let Some(contexts) = &doc.label_contexts {
        root.push_child(write_contexts("labeltypes", contexts));
    }

    if !doc.atoms.is_empty() {
        let mut el = Element::new("atoms");
        for atom in &doc.atoms {
            el.push_child(Element::new("atom").with_attribute("name", &atom.name));
        }
        root.push_child(el);
    }

    if !doc.category_map.is_empty() {
        let mut el = Element::new("categorymap");
        for entry in &doc.category_map {
            el.push_child(
                Element::new("categoryid")
                    .with_attribute("name", &entry.name)
                    .with_attribute("value", &entry.value),
            );
        }
        root.push_child(el);
    }

    if !doc.save_logs.is_empty() {
        let mut el = Element::new("savelogs");
        for log in &doc.save_logs {
            let mut entry = Element::new("savelog")
                .with_attribute("fileversion", &log.file_version)
                .with_attribute("versionset", &log.version_set)
                .with_attribute("username", &log.user_name)
                .with_attribute("date", &log.date)
                .with_attribute("count", &log.count);
            if let Some(user) = &log.user {
                entry.push_child(
                    Element::new("user")
                        .with_attribute("name", &user.name)
                        .with_attribute("fileversion", &user.file_version)
                        .with_attribute("comment", &user.comment),
                );
            }
            el.push_child(entry);
        }
        root.push_child(el);
    }

    root
}

/// Write a property set under the given wrapper tag.
pub fn write_properties(tag: &str, props: &Properties) -> Element {
    let mut el = Element::new(tag);
    for property in props.values.active() {
        el.push_child(write_property(property));
    }
    if !props.unversioned.is_empty() {
        let mut unversioned = Element::new("unversioned");
        write_collection_into(&mut unversioned, &props.unversioned, write_property);
        el.push_child(unversioned);
    }
    push_deleted(&mut el, props.values.deleted(), write_property);
    el
}

/// Write a bare versioned property collection (`styles`).
pub fn write_property_collection(tag: &str, styles: &Styles) -> Element {
    let mut el = Element::new(tag);
    write_collection_into(&mut el, styles, write_property);
    el
}

fn write_property(property: &Property) -> Element {
    let mut el = Element::new("property")
        .with_attribute("name", &property.name)
        .with_attribute("value", &property.value)
        .with_attribute("type", &property.property_type)
        .with_attribute("context", &property.context)
        .with_optional_attribute("ds", property.data_source.as_deref());
    if let Some(styles) = &property.styles {
        el.push_child(write_property_collection("styles", styles));
    }
    el
}

fn write_labels(labels: &Labels) -> Element {
    let mut el = Element::new("labels").with_attribute("context", &labels.context);
    for text in &labels.texts {
        el.push_child(
            Element::new("text")
                .with_attribute("context", &text.context)
                .with_attribute("xml:lang", &text.language)
                .with_text(&text.text),
        );
    }
    el
}

#[allow(clippy::too_many_arguments)]
fn push_settings(
    el: &mut Element,
    properties: Option<&Properties>,
    templates: Option<&Properties>,
    styles: Option<&Styles>,
    labels: Option<&Labels>,
    label_styles: Option<&Properties>,
    notes: Option<&Properties>,
) {
    if let Some(properties) = properties {
        el.push_child(write_properties("properties", properties));
    }
    if let Some(templates) = templates {
        el.push_child(write_properties("templates", templates));
    }
    if let Some(styles) = styles {
        el.push_child(write_property_collection("styles", styles));
    }
    if let Some(labels) = labels {
        el.push_child(write_labels(labels));
    }
    if let Some(label_styles) = label_styles {
        el.push_child(write_properties("labelstyles", label_styles));
    }
    if let Some(notes) = notes {
        el.push_child(write_properties("notes", notes));
    }
}

fn write_reference(tag: &str, reference: &Reference) -> Element {
    Element::new(tag)
        .with_attribute("id", &reference.id)
        .with_attribute("name", &reference.name)
        .with_attribute("ref", &reference.target)
}

/// Write a page-reference set under the given wrapper tag.
pub fn write_pages(tag: &str, pages: &Pages) -> Element {
    let mut el = Element::new(tag)
        .with_attribute("name", &pages.name)
        .with_attribute("global-name-space", &pages.global_namespace);
    write_collection_into(&mut el, &pages.items, |r| write_reference("page", r));
    el
}

/// Write a category tree node.
pub fn write_categories(cats: &Categories) -> Element {
    let mut el = Element::new("categories")
        .with_optional_attribute("id", cats.id.as_deref())
        .with_optional_attribute("name", cats.name.as_deref())
        .with_attribute("global-name-space", &cats.global_namespace);

    if let Some(properties) = &cats.properties {
        el.push_child(write_properties("properties", properties));
    }
    if let Some(templates) = &cats.templates {
        el.push_child(write_properties("templates", templates));
    }
    if let Some(labels) = &cats.labels {
        el.push_child(write_labels(labels));
    }
    for category in cats.categories.active() {
        el.push_child(write_category(category));
    }
    if let Some(elements) = &cats.elements {
        for element in elements {
            el.push_child(write_category_element(element));
        }
    }
    if let Some(sub) = &cats.sub_categories {
        el.push_child(write_categories(sub));
    }
    push_deleted(&mut el, cats.categories.deleted(), write_category);
    el
}

fn write_category(category: &Category) -> Element {
    let mut el = Element::new("category")
        .with_attribute("id", &category.id)
        .with_attribute("name", &category.name)
        .with_optional_attribute("fixed", category.fixed.as_deref())
        .with_optional_attribute("nofilter", category.no_filter.as_deref())
        .with_optional_attribute("missing", category.missing.as_deref())
        .with_optional_attribute("exclusive", category.exclusive.as_deref())
        .with_optional_attribute("other-local", category.other_local.as_deref())
        .with_optional_attribute("factor-value", category.factor_value.as_deref())
        .with_optional_attribute("factor-type", category.factor_type.as_deref())
        .with_optional_attribute("keycode", category.keycode.as_deref())
        .with_optional_attribute("expression", category.expression.as_deref());

    push_settings(
        &mut el,
        category.properties.as_ref(),
        category.templates.as_ref(),
        category.styles.as_ref(),
        category.labels.as_ref(),
        category.label_styles.as_ref(),
        category.notes.as_ref(),
    );
    if let Some(other) = &category.other_variable {
        el.push_child(write_reference("othervariable", other));
    }
    if let Some(multiplier) = &category.multiplier_variable {
        el.push_child(write_reference("multiplier-variable", multiplier));
    }
    el
}

fn write_category_element(element: &CategoryElement) -> Element {
    let mut el = Element::new("element")
        .with_attribute("id", &element.id)
        .with_attribute("name", &element.name)
        .with_attribute("type", &element.element_type);
    if let Some(labels) = &element.labels {
        el.push_child(write_labels(labels));
    }
    el
}

/// Write a sub-field collection.
pub fn write_subfields(fields: &SubFields) -> Element {
    let mut el = Element::new("fields")
        .with_attribute("name", &fields.name)
        .with_attribute("global-name-space", &fields.global_namespace);
    write_collection_into(&mut el, &fields.items, write_field);
    el
}

/// Write one field.
pub fn write_field(field: &Field) -> Element {
    match field {
        Field::Variable(variable) => write_variable_field(variable),
        Field::Block(block) => write_block(block),
        Field::Loop(looped) => write_loop(looped),
    }
}

fn write_variable_field(field: &VariableField) -> Element {
    let mut el = write_reference("variable", &field.reference);
    push_settings(
        &mut el,
        field.base.properties.as_ref(),
        field.base.templates.as_ref(),
        field.base.styles.as_ref(),
        field.base.labels.as_ref(),
        field.base.label_styles.as_ref(),
        field.base.notes.as_ref(),
    );
    el
}

fn write_block(block: &BlockField) -> Element {
    let mut el = Element::new("class")
        .with_attribute("id", &block.id)
        .with_attribute("name", &block.base.name)
        .with_attribute("global-name-space", &block.global_namespace);

    push_settings(
        &mut el,
        block.base.properties.as_ref(),
        block.base.templates.as_ref(),
        block.base.styles.as_ref(),
        block.base.labels.as_ref(),
        block.base.label_styles.as_ref(),
        block.base.notes.as_ref(),
    );
    if let Some(fields) = &block.fields {
        el.push_child(write_subfields(fields));
    }
    if let Some(pages) = &block.pages {
        el.push_child(write_pages("pages", pages));
    }
    if let Some(types) = &block.types {
        el.push_child(write_pages("types", types));
    }
    if let Some(routings) = &block.routings {
        el.push_child(write_routings(routings));
    }
    el
}

fn write_loop(looped: &LoopField) -> Element {
    let tag = if looped.grid { "grid" } else { "loop" };
    let mut el = Element::new(tag)
        .with_attribute("id", &looped.id)
        .with_attribute("name", &looped.base.name)
        .with_optional_attribute("global-name-space", looped.global_namespace.as_deref())
        .with_optional_attribute("isgrid", looped.is_grid.as_deref())
        .with_attribute("iteratortype", &looped.iterator_type)
        .with_attribute("type", &looped.loop_type);

    push_settings(
        &mut el,
        looped.base.properties.as_ref(),
        looped.base.templates.as_ref(),
        looped.base.styles.as_ref(),
        looped.base.labels.as_ref(),
        looped.base.label_styles.as_ref(),
        looped.base.notes.as_ref(),
    );
    if let Some(ranges) = &looped.ranges {
        let mut wrapper = Element::new("ranges");
        for range in ranges {
            wrapper.push_child(
                Element::new("range")
                    .with_optional_attribute("lowerbound", range.lower_bound.as_deref())
                    .with_optional_attribute("upperbound", range.upper_bound.as_deref()),
            );
        }
        el.push_child(wrapper);
    }
    if let Some(categories) = &looped.categories {
        el.push_child(write_categories(categories));
    }
    if let Some(fields) = &looped.fields {
        el.push_child(write_subfields(fields));
    }
    if let Some(pages) = &looped.pages {
        el.push_child(write_pages("pages", pages));
    }
    if let Some(types) = &looped.types {
        el.push_child(write_pages("types", types));
    }
    el
}

/// Write a routing section.
pub fn write_routings(routings: &Routings) -> Element {
    let mut el = Element::new("routings").with_attribute("name", &routings.name);
    if let Some(scripts) = &routings.scripts {
        el.push_child(write_scripts(scripts));
    }
    for routing in &routings.routing {
        el.push_child(write_routing(routing));
    }
    el
}

fn write_scripts(scripts: &Scripts) -> Element {
    let mut el = Element::new("scripts");
    write_collection_into(&mut el, scripts, write_script_type);
    el
}

fn write_script_type(group: &ScriptType) -> Element {
    let mut el = Element::new("scripttype")
        .with_attribute("type", &group.script_type)
        .with_attribute("context", &group.context)
        .with_attribute("interviewmodes", &group.interview_modes)
        .with_attribute("usekeycodes", &group.use_keycodes);
    write_collection_into(&mut el, &group.scripts, |script| {
        Element::new("script")
            .with_attribute("name", &script.name)
            .with_attribute("default", &script.default)
            .with_text(&script.text)
    });
    el
}

fn write_routing(routing: &Routing) -> Element {
    let mut el = Element::new("routing")
        .with_attribute("context", &routing.context)
        .with_attribute("interviewmodes", &routing.interview_modes)
        .with_attribute("usekeycodes", &routing.use_keycodes);
    for item in routing.items.iter().flatten() {
        el.push_child(
            Element::new("ritem")
                .with_attribute("name", &item.name)
                .with_attribute("item", &item.item),
        );
    }
    el
}

fn write_var_definition(var: &VarDefinition) -> Element {
    let mut el = Element::new("variable")
        .with_attribute("id", &var.id)
        .with_attribute("name", &var.name)
        .with_attribute("type", &var.variable_type);
    el = push_range_attributes(el, &var.range);

    push_settings(
        &mut el,
        var.settings.properties.as_ref(),
        var.settings.templates.as_ref(),
        var.settings.styles.as_ref(),
        var.settings.labels.as_ref(),
        var.settings.label_styles.as_ref(),
        var.settings.notes.as_ref(),
    );
    if let Some(categories) = &var.categories {
        el.push_child(write_categories(categories));
    }
    if let Some(helpers) = &var.helper_fields {
        el.push_child(write_helper_fields(helpers));
    }
    el
}

fn write_other_var_definition(var: &OtherVarDefinition) -> Element {
    let tag = match var.kind {
        OtherVarKind::Other => "othervariable",
        OtherVarKind::Multiplier => "multiplier-variable",
    };
    let mut el = Element::new(tag)
        .with_attribute("id", &var.id)
        .with_attribute("name", &var.name)
        .with_attribute("type", &var.variable_type)
        .with_attribute("usagetype", &var.usage_type);
    push_settings(
        &mut el,
        var.settings.properties.as_ref(),
        var.settings.templates.as_ref(),
        var.settings.styles.as_ref(),
        var.settings.labels.as_ref(),
        var.settings.label_styles.as_ref(),
        var.settings.notes.as_ref(),
    );
    el
}

fn write_helper_fields(helpers: &HelperFields) -> Element {
    let mut el = Element::new("helperfields")
        .with_attribute("id", &helpers.id)
        .with_attribute("name", &helpers.name)
        .with_attribute("global-name-space", &helpers.global_namespace);
    write_collection_into(&mut el, &helpers.items, write_field);
    el
}

fn write_alias_variable(alias: &AliasVariable) -> Element {
    let mut el = Element::new("aliasvariable")
        .with_attribute("fullname", &alias.full_name)
        .with_attribute("aliasname", &alias.alias_name);
    el = push_range_attributes(el, &alias.range);

    for native in alias.native_values.iter().flatten() {
        el.push_child(
            Element::new("nativevalue")
                .with_attribute("fullname", &native.full_name)
                .with_attribute("value", &native.value),
        );
    }
    for sub in alias.sub_aliases.iter().flatten() {
        el.push_child(
            Element::new("subalias")
                .with_attribute("index", &sub.index)
                .with_attribute("name", &sub.name),
        );
    }
    if let Some(properties) = &alias.properties {
        el.push_child(write_properties("properties", properties));
    }
    el
}

fn write_contexts(tag: &str, contexts: &Contexts) -> Element {
    let mut el = Element::new(tag).with_attribute("base", &contexts.base);
    write_collection_into(&mut el, &contexts.items, write_context);
    el
}

fn write_context(context: &Context) -> Element {
    let mut el = Element::new("context").with_attribute("name", &context.name);
    if let Some(alternatives) = &context.alternatives {
        let mut wrapper = Element::new("alternatives");
        write_collection_into(&mut wrapper, alternatives, |alt| {
            Element::new("alternative").with_attribute("name", &alt.name)
        });
        el.push_child(wrapper);
    }
    el
}

fn push_range_attributes(el: Element, range: &Range) -> Element {
    el.with_optional_attribute("min", range.min_value.as_deref())
        .with_optional_attribute("mintype", range.min_type.as_deref())
        .with_optional_attribute("max", range.max_value.as_deref())
        .with_optional_attribute("maxtype", range.max_type.as_deref())
        .with_optional_attribute("effectivemin", range.effective_min_value.as_deref())
        .with_optional_attribute("effectivemax", range.effective_max_value.as_deref())
}

/// Emit active members in order, then one `deleted` wrapper.
fn write_collection_into<T>(
    el: &mut Element,
    collection: &mdmkit_model::VersionedCollection<T>,
    mut write: impl FnMut(&T) -> Element,
) {
    for item in collection.active() {
        el.push_child(write(item));
    }
    push_deleted(el, collection.deleted(), write);
}

fn push_deleted<T>(el: &mut Element, deleted: &[T], mut write: impl FnMut(&T) -> Element) {
    if deleted.is_empty() {
        return;
    }
    let mut wrapper = Element::new("deleted");
    for item in deleted {
        wrapper.push_child(write(item));
    }
    el.push_child(wrapper);
}
