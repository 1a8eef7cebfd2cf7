//! Integration tests for the recurring-item store.

use chrono::NaiveDate;
use dayboard_core::{
    completion_rate, Category, ClockTime, DeleteScope, FixedClock, ItemDb, ItemDraft, ItemPatch,
    MemoryPersistence, RecurrenceStore, StoreError,
};
use proptest::prelude::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn memory_store() -> RecurrenceStore<MemoryPersistence, FixedClock> {
    RecurrenceStore::with_clock(MemoryPersistence::new(), FixedClock(today())).unwrap()
}

fn standup() -> ItemDraft {
    ItemDraft::block("Standup", Category::Work, ClockTime::new(9, 0).unwrap(), 15)
}

#[test]
fn write_report_scenario() {
    let mut store = memory_store();
    let t1 = store
        .add(ItemDraft::task("Write report", Category::Work).top_priority(true))
        .unwrap();

    store.toggle_completion(&t1).unwrap();
    let item = store.get(&t1).unwrap();
    assert!(item.completed);
    assert!(item.is_top_priority());
    assert_eq!(completion_rate([item]), 100);
}

#[test]
fn standup_series_scenario() {
    let mut store = memory_store();
    let unrelated = store
        .add(ItemDraft::task("Buy groceries", Category::Family))
        .unwrap();
    let b1 = store.add(standup().recurring()).unwrap();
    assert!(store.get(&b1).unwrap().is_series_root());

    let b2 = store.add(standup().occurrence_of(b1.clone())).unwrap();
    let b3 = store
        .add_occurrence(&b1, today().succ_opt().unwrap())
        .unwrap();

    assert_eq!(store.delete(&b2, DeleteScope::Instance).unwrap(), vec![b2.clone()]);
    assert!(store.contains(&b1));
    assert!(store.contains(&b3));

    let removed = store.delete(&b1, DeleteScope::Series).unwrap();
    assert_eq!(removed, vec![b1.clone(), b3.clone()]);
    assert_eq!(store.len(), 1);
    assert!(store.contains(&unrelated));
}

#[test]
fn update_missing_id_is_not_found() {
    let mut store = memory_store();
    let err = store
        .update("missing-id", ItemPatch::new().title("x"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { ref id } if id == "missing-id"));
}

#[test]
fn reset_all_clears_everything() {
    let mut store = memory_store();
    let root = store.add(standup().recurring()).unwrap();
    store.add(standup().occurrence_of(root)).unwrap();
    store.add(ItemDraft::task("Read", Category::Other)).unwrap();

    assert_eq!(store.reset_all().unwrap(), 3);
    assert!(store.is_empty());
    assert!(store.persistence().stored().is_empty());
}

#[test]
fn sqlite_backed_store_reloads_same_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dayboard.db");

    let (root, occ, task) = {
        let db = ItemDb::open_at(&path).unwrap();
        let mut store = RecurrenceStore::with_clock(db, FixedClock(today())).unwrap();
        let task = store
            .add(ItemDraft::task("Call dentist", Category::Health).top_priority(true))
            .unwrap();
        let root = store.add(standup().recurring()).unwrap();
        let occ = store.add(standup().occurrence_of(root.clone())).unwrap();
        store.toggle_completion(&occ).unwrap();
        store
            .update(&task, ItemPatch::new().category(Category::SelfCare))
            .unwrap();
        (root, occ, task)
    };

    let db = ItemDb::open_at(&path).unwrap();
    let store = RecurrenceStore::with_clock(db, FixedClock(today())).unwrap();
    let ids: Vec<&str> = store.items().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, [task.as_str(), root.as_str(), occ.as_str()]);
    assert!(store.get(&occ).unwrap().completed);
    assert_eq!(store.get(&task).unwrap().category, Category::SelfCare);
    assert_eq!(
        store.get(&occ).unwrap().series_root_id(),
        Some(root.as_str())
    );
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn arb_draft() -> impl Strategy<Value = ItemDraft> {
    prop_oneof![
        ("[a-z]{1,12}", arb_category(), any::<bool>())
            .prop_map(|(t, c, top)| ItemDraft::task(t, c).top_priority(top)),
        ("[a-z]{1,12}", arb_category(), 0u8..24, 0u8..60, 1u32..600).prop_map(
            |(t, c, h, m, d)| ItemDraft::block(t, c, ClockTime::new(h, m).unwrap(), d)
        ),
    ]
}

proptest! {
    #[test]
    fn add_never_reuses_an_id(drafts in prop::collection::vec(arb_draft(), 0..40)) {
        let mut store = memory_store();
        let mut ids = std::collections::HashSet::new();
        for draft in drafts {
            let id = store.add(draft).unwrap();
            prop_assert!(ids.insert(id));
        }
        prop_assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn toggle_twice_is_identity(drafts in prop::collection::vec(arb_draft(), 1..10), pick in any::<prop::sample::Index>()) {
        let mut store = memory_store();
        let ids: Vec<String> = drafts.into_iter().map(|d| store.add(d).unwrap()).collect();
        let id = pick.get(&ids);
        let before = store.get(id).unwrap().clone();
        store.toggle_completion(id).unwrap();
        store.toggle_completion(id).unwrap();
        prop_assert_eq!(store.get(id).unwrap(), &before);
    }

    #[test]
    fn all_completed_rate_is_100(drafts in prop::collection::vec(arb_draft(), 1..20)) {
        let mut store = memory_store();
        for draft in drafts {
            store.add(draft.completed(true)).unwrap();
        }
        prop_assert_eq!(completion_rate(store.items()), 100);
    }

    #[test]
    fn scoped_delete_removes_exactly_the_series(
        series_sizes in prop::collection::vec(0usize..4, 1..5),
        one_offs in 0usize..4,
        pick in any::<prop::sample::Index>(),
        series_scope in any::<bool>(),
    ) {
        let mut store = memory_store();
        let mut members: Vec<(String, Option<String>)> = Vec::new();
        for size in series_sizes {
            let root = store.add(standup().recurring()).unwrap();
            members.push((root.clone(), Some(root.clone())));
            for _ in 0..size {
                let occ = store.add(standup().occurrence_of(root.clone())).unwrap();
                members.push((occ, Some(root.clone())));
            }
        }
        for _ in 0..one_offs {
            let id = store.add(ItemDraft::task("once", Category::Other)).unwrap();
            members.push((id, None));
        }

        let (target, series) = pick.get(&members).clone();
        let before = store.len();
        let scope = if series_scope { DeleteScope::Series } else { DeleteScope::Instance };

        match (scope, series) {
            (DeleteScope::Series, None) => {
                let err = store.delete(&target, scope).unwrap_err();
                let is_ambiguous = matches!(err, StoreError::AmbiguousScope { .. });
                prop_assert!(is_ambiguous);
                prop_assert_eq!(store.len(), before);
            }
            (DeleteScope::Instance, _) => {
                let removed = store.delete(&target, scope).unwrap();
                prop_assert_eq!(removed, vec![target.clone()]);
                prop_assert_eq!(store.len(), before - 1);
            }
            (DeleteScope::Series, Some(root)) => {
                let expected: Vec<String> = members
                    .iter()
                    .filter(|(_, s)| s.as_deref() == Some(root.as_str()))
                    .map(|(id, _)| id.clone())
                    .collect();
                let removed = store.delete(&target, scope).unwrap();
                prop_assert_eq!(&removed, &expected);
                prop_assert_eq!(store.len(), before - expected.len());
                for (id, _) in &members {
                    prop_assert_eq!(store.contains(id), !expected.contains(id));
                }
            }
        }
    }

    #[test]
    fn sqlite_save_then_load_round_trips(drafts in prop::collection::vec(arb_draft(), 0..15)) {
        let mut store = RecurrenceStore::with_clock(ItemDb::open_memory().unwrap(), FixedClock(today())).unwrap();
        for draft in drafts {
            store.add(draft).unwrap();
        }
        let saved: Vec<_> = store.items().cloned().collect();
        let loaded = store.persistence().load_items().unwrap();
        prop_assert_eq!(loaded, saved);
    }
}
