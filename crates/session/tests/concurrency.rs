//! Mutations of one session never interleave.

use std::sync::Barrier;
use std::thread;

use session::{FileStore, SessionStore};

#[test]
fn test_double_submission_applies_once() {
    let store = SessionStore::in_memory();
    let id = store.create("sophia", None, None, None).unwrap().id().to_string();
    let barrier = Barrier::new(8);
    let (store, id, barrier) = (&store, id.as_str(), &barrier);

    let applied = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(move || {
                    barrier.wait();
                    store.apply_move(id, "e2e4").is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });

    assert_eq!(applied, 1);
    assert_eq!(store.get(id).unwrap().record().moves(), ["e2e4"]);
}

#[test]
fn test_no_lost_updates_on_shared_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(FileStore::open(dir.path()).unwrap());
    let id = store.create("sophia", None, None, None).unwrap().id().to_string();
    let opening = ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5a4", "g8f6"];

    // Every thread submits the whole line. Each move vacates its
    // from-square, so a token is only ever legal once, right after its
    // predecessor; a rejected submission means another thread got there.
    let (store, id) = (&store, id.as_str());
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(move || {
                for token in opening {
                    if store.apply_move(id, token).is_err() {
                        let session = store.get(id).unwrap();
                        assert!(session.record().moves().iter().any(|m| m == token));
                    }
                }
            });
        }
    });

    assert_eq!(store.get(id).unwrap().record().moves(), opening);
}

#[test]
fn test_sessions_progress_independently() {
    let store = SessionStore::in_memory();
    let ids: Vec<String> = (0..6)
        .map(|_| store.create("penny", None, None, None).unwrap().id().to_string())
        .collect();

    thread::scope(|scope| {
        for id in &ids {
            let store = &store;
            scope.spawn(move || {
                for token in ["d2d4", "d7d5", "c2c4", "e7e6"] {
                    store.apply_move(id, token).unwrap();
                }
            });
        }
    });

    for id in &ids {
        assert_eq!(store.get(id).unwrap().record().len(), 4);
    }
}
