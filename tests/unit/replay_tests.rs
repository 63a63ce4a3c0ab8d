//! End-to-end replay: generate a disordered feed, write it, load it back and
//! replay it into a book.

#[cfg(test)]
mod replay_tests {
    use l1_book::{L1Snapshot, TopOfBook};
    use l1_book::replay::{
        GeneratorConfig, count_out_of_order, generate_updates, load_csv, replay, write_csv,
    };

    #[test]
    fn test_generated_feed_round_trip_and_replay() {
        let config = GeneratorConfig {
            count: 20_000,
            reorder_rate: 0.01,
            seed: Some(42),
            ..GeneratorConfig::default()
        };
        let updates = generate_updates(&config);
        let summary = count_out_of_order(&updates);

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("local_L1_data.csv");
        write_csv(&path, &updates).expect("write succeeds");
        let loaded = load_csv(&path).expect("load succeeds");
        assert_eq!(loaded, updates);

        let book = TopOfBook::new();
        let stats = replay(&book, &loaded).expect("no other writer");

        // Late packets are exactly the stale ones, plus sequence 0 on a fresh book
        let zero_is_late = loaded.first().is_some_and(|update| update.sequence != 0);
        let expected_stale = summary.count + usize::from(!zero_is_late);
        assert_eq!(stats.total, 20_000);
        assert_eq!(stats.stale, expected_stale);
        assert_eq!(stats.final_snapshot.sequence, 19_999);

        let last = loaded
            .iter()
            .find(|update| update.sequence == 19_999)
            .expect("highest sequence present");
        assert_eq!(stats.final_snapshot, L1Snapshot::from(*last));
    }

    #[test]
    fn test_replay_twice_after_reset() {
        let updates = generate_updates(&GeneratorConfig {
            count: 1_000,
            seed: Some(9),
            ..GeneratorConfig::default()
        });

        let mut book = TopOfBook::new();
        let first = replay(&book, &updates).expect("first replay");
        book.reset();
        let second = replay(&book, &updates).expect("second replay");

        assert_eq!(first.stale, second.stale);
        assert_eq!(first.final_snapshot, second.final_snapshot);
    }
}
