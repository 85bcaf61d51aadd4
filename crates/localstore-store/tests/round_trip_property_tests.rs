// Property: whatever sequence of names is inserted, persisting and starting
// a new session from the stored snapshot yields the identical item list.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use localstore_store::{InitOutcome, LocalStoreSession, MemoryStorage};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_persist_round_trip(names in prop::collection::vec("[ -~]{0,24}", 0..12)) {
        let (mut session, _) = LocalStoreSession::open(MemoryStorage::new(), "sqlite-db").unwrap();
        for name in &names {
            session.insert(name).unwrap();
        }
        let before = session.items().to_vec();
        session.persist().unwrap();

        let (restored, outcome) = LocalStoreSession::open(session.into_storage(), "sqlite-db").unwrap();

        prop_assert!(matches!(outcome, InitOutcome::Restored { .. }), "outcome was {:?}", outcome);
        prop_assert_eq!(restored.items(), before.as_slice());
    }

    #[test]
    fn prop_only_non_blank_names_are_stored(names in prop::collection::vec("[ a-c]{0,4}", 0..12)) {
        let (mut session, _) = LocalStoreSession::open(MemoryStorage::new(), "sqlite-db").unwrap();
        for name in &names {
            session.insert(name).unwrap();
        }

        let expected: Vec<&str> = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect();
        let stored: Vec<&str> = session.items().iter().map(|i| i.name.as_str()).collect();
        prop_assert_eq!(stored, expected);

        let ids: Vec<i64> = session.items().iter().map(|i| i.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
