//! Per-thread session registry
//!
//! The storage engine allows one exclusively owned working session per thread.
//! The registry maps `ThreadId` to that thread's session and creates it on
//! first use. Creation runs under the map entry's lock, so two threads can
//! never race on the same slot, and a thread never sees another's session.

use std::sync::Arc;
use std::thread::ThreadId;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use gdbkit_core::{Graph, GraphSession, Result};
use tracing::{debug, warn};

/// A session owned by one thread, with its derived graph.
pub struct ThreadSession {
    thread: ThreadId,
    session: Arc<dyn GraphSession>,
    graph: Arc<dyn Graph>,
}

impl ThreadSession {
    /// Bundle a session and its graph for `thread`.
    pub fn new(thread: ThreadId, session: Arc<dyn GraphSession>, graph: Arc<dyn Graph>) -> Self {
        ThreadSession {
            thread,
            session,
            graph,
        }
    }

    /// Owning thread.
    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    /// Session handle.
    pub fn session(&self) -> &Arc<dyn GraphSession> {
        &self.session
    }

    /// Graph handle derived from the session.
    pub fn graph(&self) -> &Arc<dyn Graph> {
        &self.graph
    }

    /// False once the session has been closed by anyone.
    pub fn is_valid(&self) -> bool {
        !self.session.is_closed()
    }
}

/// Map from thread identity to that thread's session.
///
/// Entries leave the map only through [`SessionRegistry::release`] or
/// [`SessionRegistry::close_all`]; the exit of the owning thread does not
/// remove them.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<ThreadId, Arc<ThreadSession>>,
}

impl SessionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the valid session registered for `thread`, or register the one
    /// produced by `create`.
    ///
    /// A registered session that has been closed is replaced.
    pub fn get_or_create(
        &self,
        thread: ThreadId,
        create: impl FnOnce() -> Result<ThreadSession>,
    ) -> Result<Arc<ThreadSession>> {
        match self.sessions.entry(thread) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_valid() {
                    return Ok(Arc::clone(entry.get()));
                }
                debug!(target: "gdbkit::sessions", ?thread, "Replacing closed session");
                let fresh = Arc::new(create()?);
                entry.insert(Arc::clone(&fresh));
                Ok(fresh)
            }
            Entry::Vacant(entry) => {
                debug!(target: "gdbkit::sessions", ?thread, "Creating session");
                let fresh = Arc::new(create()?);
                entry.insert(Arc::clone(&fresh));
                Ok(fresh)
            }
        }
    }

    /// Session registered for `thread`, valid or not.
    pub fn get(&self, thread: ThreadId) -> Option<Arc<ThreadSession>> {
        self.sessions.get(&thread).map(|entry| Arc::clone(entry.value()))
    }

    /// Close and forget the session of `thread`. Returns whether one existed.
    pub fn release(&self, thread: ThreadId) -> Result<bool> {
        match self.sessions.remove(&thread) {
            Some((_, session)) => {
                session.session().close()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Close every registered session and empty the registry.
    ///
    /// Returns how many sessions were registered.
    pub fn close_all(&self) -> usize {
        let mut closed = 0;
        self.sessions.retain(|thread, session| {
            if let Err(e) = session.session().close() {
                warn!(target: "gdbkit::sessions", ?thread, error = %e, "Failed to close session");
            }
            closed += 1;
            false
        });
        closed
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
