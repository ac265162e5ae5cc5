//! Shared helpers for the lifecycle suite.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use gdbkit::{
    AttributeId, AttributeKind, ConfigurationLoader, ConfigurationTree, DataType,
    DatabaseDescriptor, Error, FileEngine, GraphHub, GraphSession, TomlConfigLoader, TypeId,
};
use tempfile::TempDir;

/// Hub over the file engine, with its storage directory.
pub struct TestHub {
    pub hub: GraphHub,
    pub dir: TempDir,
}

impl TestHub {
    pub fn new() -> Self {
        TestHub {
            hub: GraphHub::new(Arc::new(FileEngine::new())),
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Single-database configuration stored in this hub's directory.
    pub fn single(&self, alias: &str) -> ConfigurationTree {
        ConfigurationTree::single(DatabaseDescriptor::new(
            alias,
            alias,
            self.file(&format!("{}.dex", alias)),
        ))
    }
}

impl Drop for TestHub {
    fn drop(&mut self) {
        let _ = self.hub.deactivate();
    }
}

/// Write a tuning document accepted by the file engine.
pub fn write_tuning(path: &Path, sync_writes: bool) {
    std::fs::write(
        path,
        format!("[storage]\nsync_writes = {}\nread_only = false\n", sync_writes),
    )
    .unwrap();
}

/// Define NodeType and EdgeType, each with an attribute named "Attribute".
pub fn create_schema(hub: &GraphHub) {
    let graph = hub.graph().unwrap();
    let node = graph.new_node_type("NodeType").unwrap();
    graph
        .new_attribute(node, "Attribute", DataType::String, AttributeKind::Basic)
        .unwrap();
    let edge = graph.new_edge_type("EdgeType", true).unwrap();
    graph
        .new_attribute(edge, "Attribute", DataType::Long, AttributeKind::Indexed)
        .unwrap();
}

/// Address identity of a session handle.
pub fn session_addr(session: &Arc<dyn GraphSession>) -> usize {
    Arc::as_ptr(session) as *const () as usize
}
