//! Tier 3: threads sharing one hub

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use crate::test_utils::*;

#[test]
fn threads_never_share_sessions() {
    let t = TestHub::new();
    t.hub.activate(t.single("Threads")).unwrap();
    create_schema(&t.hub);
    let hub = &t.hub;

    let num_threads = 8;
    let barrier = Barrier::new(num_threads);
    let addrs: HashSet<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    let session = hub.session().unwrap();
                    for _ in 0..20 {
                        assert_eq!(session_addr(&session), session_addr(&hub.session().unwrap()));
                        assert!(hub.type_id("NodeType").unwrap().is_valid());
                        assert!(hub.attribute_id_split("EdgeType.Attribute", '.').unwrap().is_valid());
                    }
                    barrier.wait();
                    session_addr(&session)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(addrs.len(), num_threads);

    t.hub.shutdown().unwrap();
}

#[test]
fn restart_while_threads_query() {
    let t = TestHub::new();
    t.hub.activate(t.single("Restarting")).unwrap();
    create_schema(&t.hub);
    let hub = &t.hub;

    let barrier = Arc::new(Barrier::new(3));
    thread::scope(|s| {
        for _ in 0..2 {
            let barrier = Arc::clone(&barrier);
            s.spawn(move || {
                barrier.wait();
                for _ in 0..100 {
                    assert!(hub.type_id("NodeType").unwrap().is_valid());
                }
            });
        }
        let barrier = Arc::clone(&barrier);
        s.spawn(move || {
            barrier.wait();
            for _ in 0..20 {
                hub.restart().unwrap();
            }
        });
    });

    assert!(t.hub.database("Restarting").unwrap().is_open());
    t.hub.shutdown().unwrap();
}

#[test]
fn restart_while_threads_write_schema() {
    let t = TestHub::new();
    t.hub.activate(t.single("Writing")).unwrap();
    let hub = &t.hub;

    let barrier = Barrier::new(4);
    let created: Vec<String> = thread::scope(|s| {
        let writers: Vec<_> = (0..3)
            .map(|w| {
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    let mut created = Vec::new();
                    for i in 0..100 {
                        let name = format!("Type{}_{}", w, i);
                        match hub.graph().unwrap().new_node_type(&name) {
                            Ok(_) => created.push(name),
                            Err(Error::SessionClosed) => {}
                            Err(e) => panic!("unexpected write failure: {}", e),
                        }
                    }
                    created
                })
            })
            .collect();
        barrier.wait();
        for _ in 0..20 {
            hub.restart().unwrap();
        }
        writers
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    // Reopening succeeds and no acknowledged type was lost
    t.hub.shutdown().unwrap();
    t.hub.start().unwrap();
    for name in &created {
        assert!(t.hub.type_id(name).unwrap().is_valid(), "lost {}", name);
    }
    t.hub.shutdown().unwrap();
}
