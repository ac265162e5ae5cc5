//! Tier 2: activation, fail-closed behavior and lifecycle passthroughs

use crate::test_utils::*;
use parking_lot::Mutex;

/// Loader that builds descriptors in code and records how often it ran.
struct ListLoader {
    entries: Vec<DatabaseDescriptor>,
    default: Option<String>,
    calls: Mutex<usize>,
}

impl ListLoader {
    fn new(entries: Vec<DatabaseDescriptor>, default: Option<&str>) -> Self {
        ListLoader {
            entries,
            default: default.map(str::to_string),
            calls: Mutex::new(0),
        }
    }
}

impl ConfigurationLoader for ListLoader {
    fn source(&self) -> String {
        format!("list of {}", self.entries.len())
    }

    fn populate(&self, tree: &mut ConfigurationTree) -> gdbkit::Result<()> {
        *self.calls.lock() += 1;
        for entry in &self.entries {
            tree.add_descriptor(entry.clone())?;
        }
        if let Some(default) = &self.default {
            tree.set_default(default.clone());
        }
        Ok(())
    }
}

#[test]
fn custom_loader_activates() {
    let t = TestHub::new();
    let loader = ListLoader::new(
        vec![
            DatabaseDescriptor::new("a", "A", t.file("a.dex")),
            DatabaseDescriptor::new("b", "B", t.file("b.dex")),
        ],
        Some("a"),
    );
    t.hub.activate_with(&loader).unwrap();
    assert_eq!(*loader.calls.lock(), 1);
    assert_eq!(t.hub.alias().unwrap(), "A");
    assert_eq!(t.hub.source().unwrap().as_deref(), Some("list of 2"));
    assert_eq!(t.hub.databases().unwrap().len(), 2);
    t.hub.shutdown().unwrap();
}

#[test]
fn empty_configuration_is_rejected() {
    let t = TestHub::new();
    let err = t
        .hub
        .activate_with(&ListLoader::new(Vec::new(), None))
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(!t.hub.is_configured());
}

#[test]
fn dangling_default_is_rejected() {
    let t = TestHub::new();
    let loader = ListLoader::new(
        vec![DatabaseDescriptor::new("a", "A", t.file("a.dex"))],
        Some("nobody"),
    );
    assert!(t.hub.activate_with(&loader).unwrap_err().is_configuration());
    assert!(!t.hub.is_configured());
    assert!(!t.file("a.dex").exists());
}

#[test]
fn failed_activation_is_fail_closed() {
    let t = TestHub::new();
    t.hub.activate(t.single("Good")).unwrap();
    let old_session = t.hub.session().unwrap();

    // A default whose tuning file does not exist cannot be opened
    let broken = ConfigurationTree::single(
        DatabaseDescriptor::new("Broken", "Broken", t.file("Broken.dex"))
            .with_tuning(t.file("missing.cfg")),
    );
    assert!(t.hub.activate(broken).is_err());

    // The previous configuration was shut down and nothing replaced it
    assert!(old_session.is_closed());
    assert!(!t.hub.is_configured());
    assert!(matches!(t.hub.alias(), Err(Error::NotConfigured)));
    assert!(matches!(t.hub.session(), Err(Error::NotConfigured)));
    assert!(matches!(t.hub.start(), Err(Error::NotConfigured)));

    // A later valid activation recovers
    t.hub.activate(t.single("Good")).unwrap();
    assert_eq!(t.hub.alias().unwrap(), "Good");
    t.hub.shutdown().unwrap();
}

#[test]
fn malformed_document_is_fail_closed() {
    let t = TestHub::new();
    t.hub.activate(t.single("Before")).unwrap();
    let err = t
        .hub
        .activate_with(&TomlConfigLoader::from_toml("[[databases.database]]\nname = 1\n"))
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(!t.hub.is_configured());
}

#[test]
fn start_shutdown_restart() {
    let t = TestHub::new();
    t.hub.activate(t.single("Cycle")).unwrap();
    let manager = t.hub.database("Cycle").unwrap();
    assert!(manager.is_open());

    t.hub.shutdown().unwrap();
    assert!(!manager.is_open());
    t.hub.shutdown().unwrap();

    t.hub.start().unwrap();
    t.hub.start().unwrap();
    assert!(manager.is_open());
    assert_eq!(manager.open_count(), 2);

    t.hub.restart().unwrap();
    assert!(manager.is_open());
    assert_eq!(manager.open_count(), 3);

    t.hub.shutdown().unwrap();
}

#[test]
fn restart_yields_fresh_session() {
    let t = TestHub::new();
    t.hub.activate(t.single("Fresh")).unwrap();

    let before = t.hub.session().unwrap();
    assert_eq!(session_addr(&before), session_addr(&t.hub.session().unwrap()));

    t.hub.restart().unwrap();
    assert!(before.is_closed());
    let after = t.hub.session().unwrap();
    assert_ne!(session_addr(&before), session_addr(&after));
    assert!(!after.is_closed());

    t.hub.shutdown().unwrap();
}

#[test]
fn shutdown_closes_outstanding_graphs() {
    let t = TestHub::new();
    t.hub.activate(t.single("Closing")).unwrap();
    let graph = t.hub.graph().unwrap();
    t.hub.shutdown().unwrap();

    assert!(matches!(graph.find_type("NodeType"), Err(Error::SessionClosed)));
    // The hub itself reopens on demand
    assert!(t.hub.graph().unwrap().find_type("NodeType").is_ok());
    t.hub.shutdown().unwrap();
}

#[test]
fn database_file_is_exclusive_across_hubs() {
    let first = TestHub::new();
    first.hub.activate(first.single("Shared")).unwrap();

    let second = GraphHub::default();
    let err = second
        .activate(ConfigurationTree::single(DatabaseDescriptor::new(
            "Shared",
            "Shared",
            first.file("Shared.dex"),
        )))
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert!(!second.is_configured());

    first.hub.shutdown().unwrap();
}
