//! Read/write round-trip tests

use pretty_assertions::assert_eq;

use mdmkit_markup::{
    write_categories, write_document, write_routings, DocumentReader, Element, ReaderOptions,
};
use mdmkit_model::Field;

fn category(id: &str, name: &str) -> Element {
    Element::new("category")
        .with_attribute("id", id)
        .with_attribute("name", name)
}

#[test]
fn categories_tree_roundtrips() {
    let tree = Element::new("categories")
        .with_attribute("global-name-space", "person")
        .with_child(category("_01", "Male"))
        .with_child(category("_02", "Female"))
        .with_child(
            Element::new("element")
                .with_attribute("id", "_e1")
                .with_attribute("name", "NetAll")
                .with_attribute("type", "net"),
        )
        .with_child(
            Element::new("categories")
                .with_attribute("global-name-space", "person.detail")
                .with_child(category("_03", "Unknown")),
        );

    let mut reader = DocumentReader::with_options(ReaderOptions::strict());
    let first = reader.read_categories(&tree).unwrap();

    let written = write_categories(&first);
    let second = reader.read_categories(&written).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.categories.len(), 2);
    assert_eq!(
        second
            .categories
            .active()
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>(),
        ["Male", "Female"]
    );
    assert_eq!(second.elements.as_ref().map(Vec::len), Some(1));
    assert_eq!(second.depth(), 2);
}

#[test]
fn deleted_partition_and_order_survive() {
    let tree = Element::new("categories")
        .with_attribute("global-name-space", "")
        .with_child(category("_01", "A"))
        .with_child(category("_02", "B"))
        .with_child(
            Element::new("deleted")
                .with_child(category("_03", "C"))
                .with_child(category("_04", "D")),
        );

    let mut reader = DocumentReader::with_options(ReaderOptions::strict());
    let first = reader.read_categories(&tree).unwrap();
    let second = reader.read_categories(&write_categories(&first)).unwrap();

    assert_eq!(first, second);
    let deleted: Vec<_> = second
        .categories
        .deleted()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(deleted, ["C", "D"]);
}

#[test]
fn never_declared_scripts_stay_distinct_from_emptied() {
    let never = Element::new("routings").with_attribute("name", "main");
    let emptied = Element::new("routings")
        .with_attribute("name", "main")
        .with_child(
            Element::new("scripts").with_child(
                Element::new("deleted").with_child(
                    Element::new("scripttype")
                        .with_attribute("type", "mrScriptBasic")
                        .with_attribute("context", "Web")
                        .with_attribute("interviewmodes", "1")
                        .with_attribute("usekeycodes", "0"),
                ),
            ),
        );

    let mut reader = DocumentReader::with_options(ReaderOptions::strict());

    let first = reader.read_routings(&never).unwrap();
    let second = reader.read_routings(&write_routings(&first)).unwrap();
    assert_eq!(first, second);
    assert!(second.scripts.is_none());

    let first = reader.read_routings(&emptied).unwrap();
    let second = reader.read_routings(&write_routings(&first)).unwrap();
    assert_eq!(first, second);
    let scripts = second.scripts.expect("declared scripts must survive");
    assert_eq!(scripts.len(), 0);
    assert_eq!(scripts.deleted().len(), 1);
}

#[test]
fn full_document_roundtrips() {
    let root = Element::new("metadata")
        .with_attribute("mdmcreateversion", "7.0.0")
        .with_attribute("mdmlastversion", "7.5.1")
        .with_attribute("id", "bb6e1f6c")
        .with_attribute("dataversion", "9")
        .with_attribute("datasubversion", "2")
        .with_attribute("xmlns", "http://example.com/mdm")
        .with_child(
            Element::new("datasources")
                .with_attribute("default", "main")
                .with_child(
                    Element::new("connection")
                        .with_attribute("name", "main")
                        .with_attribute("dblocation", "survey.ddf")
                        .with_attribute("cdscname", "mrDataFileDsc")
                        .with_attribute("project", "survey")
                        .with_attribute("id", "_ds1"),
                ),
        )
        .with_child(
            Element::new("properties")
                .with_child(
                    Element::new("property")
                        .with_attribute("name", "Label")
                        .with_attribute("value", "v2")
                        .with_attribute("type", "text")
                        .with_attribute("context", "Question"),
                )
                .with_child(
                    Element::new("unversioned").with_child(
                        Element::new("property")
                            .with_attribute("name", "Lang")
                            .with_attribute("value", "en")
                            .with_attribute("type", "text")
                            .with_attribute("context", "Analysis"),
                    ),
                ),
        )
        .with_child(
            Element::new("styles").with_child(
                Element::new("property")
                    .with_attribute("name", "Color")
                    .with_attribute("value", "blue")
                    .with_attribute("type", "style")
                    .with_attribute("context", "Question"),
            ),
        )
        .with_child(
            Element::new("definition")
                .with_child(
                    Element::new("variable")
                        .with_attribute("id", "_v1")
                        .with_attribute("name", "age")
                        .with_attribute("type", "long")
                        .with_attribute("min", "18")
                        .with_attribute("mintype", "long")
                        .with_attribute("max", "99")
                        .with_attribute("maxtype", "long"),
                )
                .with_child(
                    Element::new("variable")
                        .with_attribute("id", "_v2")
                        .with_attribute("name", "gender")
                        .with_attribute("type", "categorical")
                        .with_child(
                            Element::new("categories")
                                .with_attribute("global-name-space", "")
                                .with_child(category("_01", "Male"))
                                .with_child(category("_02", "Female")),
                        ),
                ),
        )
        .with_child(
            Element::new("design").with_child(
                Element::new("fields")
                    .with_attribute("name", "")
                    .with_attribute("global-name-space", "")
                    .with_child(
                        Element::new("variable")
                            .with_attribute("id", "_q1")
                            .with_attribute("name", "Q1")
                            .with_attribute("ref", "ref_Q1"),
                    )
                    .with_child(
                        Element::new("class")
                            .with_attribute("id", "_b1")
                            .with_attribute("name", "Block1")
                            .with_attribute("global-name-space", "")
                            .with_child(
                                Element::new("fields")
                                    .with_attribute("name", "Block1")
                                    .with_attribute("global-name-space", "")
                                    .with_child(
                                        Element::new("loop")
                                            .with_attribute("id", "_l1")
                                            .with_attribute("name", "Brands")
                                            .with_attribute("iteratortype", "categorical")
                                            .with_attribute("type", "")
                                            .with_child(
                                                Element::new("ranges").with_child(
                                                    Element::new("range")
                                                        .with_attribute("lowerbound", "1")
                                                        .with_attribute("upperbound", "10"),
                                                ),
                                            ),
                                    ),
                            ),
                    ),
            ),
        )
        .with_child(
            Element::new("routings")
                .with_attribute("name", "main")
                .with_child(
                    Element::new("scripts").with_child(
                        Element::new("scripttype")
                            .with_attribute("type", "mrScriptBasic")
                            .with_attribute("context", "Web")
                            .with_attribute("interviewmodes", "1")
                            .with_attribute("usekeycodes", "0")
                            .with_child(
                                Element::new("script")
                                    .with_attribute("name", "init")
                                    .with_attribute("default", "true")
                                    .with_text("' setup"),
                            ),
                    ),
                )
                .with_child(
                    Element::new("routing")
                        .with_attribute("context", "Web")
                        .with_attribute("interviewmodes", "1")
                        .with_attribute("usekeycodes", "0")
                        .with_child(
                            Element::new("ritem")
                                .with_attribute("name", "Q1")
                                .with_attribute("item", "ask()"),
                        ),
                ),
        )
        .with_child(
            Element::new("mappings").with_child(
                Element::new("varinstance")
                    .with_attribute("name", "age")
                    .with_attribute("sourcetype", "0")
                    .with_attribute("variable", "_v1")
                    .with_attribute("fullname", "age"),
            ),
        )
        .with_child(
            Element::new("aliases").with_child(
                Element::new("aliasvariable")
                    .with_attribute("fullname", "age")
                    .with_attribute("aliasname", "AGE")
                    .with_attribute("min", "18")
                    .with_child(
                        Element::new("nativevalue")
                            .with_attribute("fullname", "age")
                            .with_attribute("value", "42"),
                    ),
            ),
        )
        .with_child(
            Element::new("languages")
                .with_attribute("base", "en-US")
                .with_child(
                    Element::new("language")
                        .with_attribute("name", "en-US")
                        .with_attribute("id", "0409"),
                ),
        )
        .with_child(
            Element::new("contexts")
                .with_attribute("base", "Question")
                .with_child(
                    Element::new("context")
                        .with_attribute("name", "Question")
                        .with_child(
                            Element::new("alternatives").with_child(
                                Element::new("alternative").with_attribute("name", "Analysis"),
                            ),
                        ),
                ),
        )
        .with_child(Element::new("atoms").with_child(Element::new("atom").with_attribute("name", "a1")))
        .with_child(
            Element::new("categorymap").with_child(
                Element::new("categoryid")
                    .with_attribute("name", "Male")
                    .with_attribute("value", "1"),
            ),
        )
        .with_child(
            Element::new("savelogs").with_child(
                Element::new("savelog")
                    .with_attribute("fileversion", "7.5.1")
                    .with_attribute("versionset", "V1")
                    .with_attribute("username", "author")
                    .with_attribute("date", "2019-04-11T09:30:00")
                    .with_attribute("count", "1")
                    .with_child(
                        Element::new("user")
                            .with_attribute("name", "author")
                            .with_attribute("fileversion", "7.5.1")
                            .with_attribute("comment", "initial"),
                    ),
            ),
        );

    let mut reader = DocumentReader::with_options(ReaderOptions::strict());
    let first = reader.read_document(&root).unwrap();
    assert!(reader.warnings().is_empty());

    let written = write_document(&first);
    let second = reader.read_document(&written).unwrap();

    assert_eq!(first, second);

    // Spot-check the structure came through, not just equality of the trees.
    assert_eq!(second.definitions.len(), 2);
    let design = second.design.as_ref().unwrap();
    assert_eq!(design.items.len(), 2);
    match &design.items.active()[1] {
        Field::Block(block) => {
            let inner = block.fields.as_ref().unwrap();
            assert_eq!(inner.items.len(), 1);
            assert!(matches!(inner.items.active()[0], Field::Loop(_)));
        }
        other => panic!("expected a block, got {:?}", other.kind()),
    }
    assert_eq!(
        second
            .properties
            .find_unversioned("Lang")
            .map(|p| p.value.as_str()),
        Some("en")
    );
    assert_eq!(second.save_logs.len(), 1);
    assert_eq!(second.aliases.len(), 1);
}
