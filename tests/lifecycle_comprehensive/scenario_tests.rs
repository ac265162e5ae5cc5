//! Tier 1: end-to-end scenarios

use crate::test_utils::*;

#[test]
fn three_databases_from_document() {
    let t = TestHub::new();
    let gdb1 = t.file("gdb1.dex");
    let cfg1 = t.file("gdb1.cfg");
    write_tuning(&cfg1, false);

    let text = format!(
        r#"
[databases]
default = "foo1"

[[databases.database]]
name = "foo0"
alias = "FOO0"
path = {gdb0:?}

[[databases.database]]
name = "foo1"
alias = "FOO1"
path = {gdb1:?}
conf = {cfg1:?}

[[databases.database]]
name = "foo2"
alias = "FOO2"
path = {gdb2:?}
"#,
        gdb0 = t.file("gdb0.dex").display().to_string(),
        gdb1 = gdb1.display().to_string(),
        cfg1 = cfg1.display().to_string(),
        gdb2 = t.file("gdb2.dex").display().to_string(),
    );
    let config_path = t.file("gdbkit.toml");
    std::fs::write(&config_path, text).unwrap();

    t.hub
        .activate_with(&TomlConfigLoader::from_file(&config_path))
        .unwrap();

    assert_eq!(t.hub.alias().unwrap(), "FOO1");
    assert_eq!(t.hub.path().unwrap(), gdb1);
    assert_eq!(t.hub.tuning().unwrap(), Some(cfg1));
    assert_eq!(t.hub.configuration().unwrap().len(), 3);

    // Only the default is opened by activation
    assert!(gdb1.exists());
    assert!(!t.file("gdb0.dex").exists());
    assert!(!t.file("gdb2.dex").exists());

    // Named databases open on first access
    let foo2 = t.hub.database("foo2").unwrap();
    assert_eq!(foo2.descriptor().alias(), "FOO2");
    assert!(!foo2.type_id("anything").unwrap().is_valid());
    assert!(t.file("gdb2.dex").exists());

    t.hub.shutdown().unwrap();
}

#[test]
fn direct_single_database() {
    let t = TestHub::new();
    t.hub.activate(t.single("MyGDB")).unwrap();

    assert_eq!(t.hub.alias().unwrap(), "MyGDB");
    assert_eq!(t.hub.path().unwrap(), t.file("MyGDB.dex"));
    assert!(t.hub.graph().is_ok());
    assert!(!t.hub.session().unwrap().is_closed());

    t.hub.shutdown().unwrap();
}

#[test]
fn composite_attribute_names() {
    let t = TestHub::new();
    t.hub.activate(t.single("Composite")).unwrap();
    create_schema(&t.hub);

    let direct = t.hub.attribute_id("NodeType", "Attribute").unwrap();
    assert!(direct.is_valid());
    assert_eq!(
        t.hub.attribute_id_split("NodeType.Attribute", '.').unwrap(),
        direct
    );
    assert!(t
        .hub
        .attribute_id_split("EdgeType.Attribute", '.')
        .unwrap()
        .is_valid());
    assert_eq!(
        t.hub.attribute_id_split("NodeType.Missing", '.').unwrap(),
        AttributeId::INVALID
    );
    assert_eq!(
        t.hub.attribute_id_split("Missing.Attribute", '.').unwrap(),
        AttributeId::INVALID
    );
    assert!(matches!(
        t.hub.attribute_id_split("A.B.C", '.'),
        Err(Error::NameResolution { .. })
    ));

    t.hub.shutdown().unwrap();
}

#[test]
fn drop_schema_invalidates_identifiers() {
    let t = TestHub::new();
    t.hub.activate(t.single("Drop")).unwrap();
    create_schema(&t.hub);

    let before = t.hub.type_id("NodeType").unwrap();
    assert_ne!(before, TypeId::INVALID);

    t.hub.drop_schema().unwrap();
    assert_eq!(t.hub.type_id("NodeType").unwrap(), TypeId::INVALID);
    assert_eq!(t.hub.type_id("EdgeType").unwrap(), TypeId::INVALID);
    assert_eq!(
        t.hub.attribute_id("NodeType", "Attribute").unwrap(),
        AttributeId::INVALID
    );

    // Identifiers are not reused after a drop
    create_schema(&t.hub);
    let after = t.hub.type_id("NodeType").unwrap();
    assert!(after.is_valid());
    assert_ne!(after, before);

    t.hub.shutdown().unwrap();
}

#[test]
fn schema_survives_shutdown_and_reactivation() {
    let t = TestHub::new();
    t.hub.activate(t.single("Durable")).unwrap();
    create_schema(&t.hub);
    let node = t.hub.type_id("NodeType").unwrap();
    t.hub.shutdown().unwrap();

    t.hub.activate(t.single("Durable")).unwrap();
    assert_eq!(t.hub.type_id("NodeType").unwrap(), node);
    t.hub.shutdown().unwrap();
}
