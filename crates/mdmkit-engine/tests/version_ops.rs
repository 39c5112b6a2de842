//! Integration tests for version operations

use pretty_assertions::assert_eq;

use mdmkit_engine::{fingerprint, rollback_versioned, DeletionAudit};
use mdmkit_model::{
    BlockField, Categories, Category, Definition, Field, MdmDocument, Properties, Property,
    Reference, Routings, Script, ScriptType, Scripts, SubFields, VarDefinition, VariableField,
};

fn document_with_versioned_properties() -> MdmDocument {
    let mut doc = MdmDocument::new();
    doc.properties
        .push_unversioned(Property::new("Lang", "en", "text", "Analysis"));
    doc.properties
        .push(Property::new("Label", "v2", "text", "Question"));

    let mut var = VarDefinition::new("_v1", "gender", "categorical");
    let mut props = Properties::new();
    props.push(Property::new("ShowKeycodes", "1", "boolean", "Question"));
    var.settings.properties = Some(props);

    let mut cats = Categories::new("");
    let mut male = Category::new("_01", "Male");
    let mut male_props = Properties::new();
    male_props.push_unversioned(Property::new("Keep", "yes", "text", "Analysis"));
    male_props.push(Property::new("Drop", "v3", "text", "Analysis"));
    male.properties = Some(male_props);
    cats.push_category(male);
    var.categories = Some(cats);

    doc.definitions.push(Definition::Variable(var));
    doc
}

#[test]
fn rollback_clears_versioned_keeps_unversioned() {
    let mut doc = document_with_versioned_properties();

    let cleared = rollback_versioned(&mut doc);
    assert_eq!(cleared, 3);

    // Document level: the unversioned property survives, the versioned does
    // not.
    assert!(doc.properties.find("Label").is_none());
    assert_eq!(
        doc.properties
            .find_unversioned("Lang")
            .map(|p| p.value.as_str()),
        Some("en")
    );

    // Category level, deep in the tree.
    let var = match &doc.definitions[0] {
        Definition::Variable(var) => var,
        other => panic!("unexpected definition {:?}", other.name()),
    };
    let male = &var.categories.as_ref().unwrap().categories.active()[0];
    let props = male.properties.as_ref().unwrap();
    assert!(props.find("Drop").is_none());
    assert!(props.find_unversioned("Keep").is_some());

    // A second rollback finds nothing left to clear.
    assert_eq!(rollback_versioned(&mut doc), 0);
}

#[test]
fn audit_reports_deleted_members() {
    let mut doc = MdmDocument::new();

    // A category deleted between versions.
    let mut cats = Categories::new("");
    cats.push_category(Category::new("_01", "Male"));
    cats.push_category(Category::new("_02", "Female"));
    cats.delete_category("Male");
    let mut var = VarDefinition::new("_v1", "gender", "categorical");
    var.categories = Some(cats);
    doc.definitions.push(Definition::Variable(var));

    // A field deleted inside a block.
    let mut block = BlockField::new("_b1", "Block1", "");
    let mut sub = SubFields::new("Block1", "");
    sub.items.push(Field::Variable(VariableField::new(
        Reference::new("_q1", "Q1", "ref_Q1"),
    )));
    sub.items.push(Field::Variable(VariableField::new(
        Reference::new("_q2", "Q2", "ref_Q2"),
    )));
    sub.items.mark_deleted(|f| f.name() == "Q1");
    block.fields = Some(sub);
    let mut design = SubFields::new("", "");
    design.items.push(Field::Block(block));
    doc.design = Some(design);

    // A script group deleted from the routing section.
    let mut routings = Routings::new("main");
    let mut scripts = Scripts::new();
    let mut group = ScriptType::new("mrScriptBasic", "Web", "1", "0");
    group.scripts.push(Script::new("init", "true", "' setup"));
    group.scripts.mark_deleted(|s| s.name == "init");
    scripts.push(group);
    routings.scripts = Some(scripts);
    doc.routings = Some(routings);

    let report = DeletionAudit::scan(&doc);
    assert_eq!(report.total_deleted, 3);

    let by_kind = |kind: &str| {
        report
            .entries
            .iter()
            .find(|e| e.kind == kind)
            .unwrap_or_else(|| panic!("no {kind} entry"))
    };
    assert_eq!(by_kind("category").names, ["Male"]);
    assert_eq!(by_kind("field").names, ["Q1"]);
    assert_eq!(by_kind("field").path, "design/Block1");
    assert_eq!(by_kind("script").names, ["init"]);

    let json = report.to_json().unwrap();
    assert!(json.contains("\"Male\""));
    assert!(json.contains("\"total_deleted\": 3"));
}

#[test]
fn audit_of_clean_document_is_empty() {
    let report = DeletionAudit::scan(&MdmDocument::new());
    assert_eq!(report.total_deleted, 0);
    assert!(report.entries.is_empty());
}

#[test]
fn fingerprint_tracks_membership_changes() {
    let doc = document_with_versioned_properties();
    let before = fingerprint(&doc).unwrap();

    let mut edited = doc.clone();
    let var = match &mut edited.definitions[0] {
        Definition::Variable(var) => var,
        other => panic!("unexpected definition {:?}", other.name()),
    };
    var.categories.as_mut().unwrap().delete_category("Male");

    let after = fingerprint(&edited).unwrap();
    assert_ne!(before, after);

    // Same content, same fingerprint.
    assert_eq!(fingerprint(&doc).unwrap(), before);
}
