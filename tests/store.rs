use matchup_terminal::state::{Category, InputError, MatchStore, Outcome};

#[test]
fn submission_replaces_the_category() {
    let mut store = MatchStore::new();
    store
        .submit_scores(Category::H2h, &[(2.0, 1.0), (1.0, 1.0)])
        .expect("first batch");
    assert_eq!(store.h2h().len(), 2);

    store
        .submit_scores(Category::H2h, &[(0.0, 3.0)])
        .expect("second batch");
    // Replaced, not appended.
    assert_eq!(store.h2h().len(), 1);
    assert_eq!(store.h2h()[0].outcome, Outcome::Team2Wins);
}

#[test]
fn categories_are_independent() {
    let mut store = MatchStore::new();
    store
        .submit_scores(Category::H2h, &[(2.0, 1.0)])
        .expect("h2h batch");
    store
        .submit_scores(Category::Team1, &[(3.0, 0.0), (1.0, 2.0)])
        .expect("team1 batch");
    store
        .submit_scores(Category::Team1, &[(0.0, 0.0)])
        .expect("team1 again");
    assert_eq!(store.h2h().len(), 1);
    assert_eq!(store.team1().len(), 1);
    assert_eq!(store.total_matches(), 2);
}

#[test]
fn records_are_sorted_ascending_by_timestamp() {
    let mut store = MatchStore::new();
    store
        .submit_scores(
            Category::Team2,
            &[(1.0, 0.0), (2.0, 2.0), (0.0, 4.0), (3.0, 1.0)],
        )
        .expect("valid batch");
    let records = store.team2();
    for pair in records.windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }
    // Insertion order is preserved: the last submitted pair is most recent.
    assert_eq!(records[0].match_number, 1);
    assert_eq!(records[3].match_number, 4);
    assert_eq!(records[3].outcome, Outcome::Team2Wins);
}

#[test]
fn invalid_batches_are_rejected_whole() {
    let mut store = MatchStore::new();
    store
        .submit_scores(Category::H2h, &[(2.0, 1.0)])
        .expect("valid batch");

    assert!(matches!(
        store.submit_scores(Category::H2h, &[]),
        Err(InputError::EmptyBatch)
    ));
    assert!(matches!(
        store.submit_scores(Category::H2h, &[(1.0, 0.0), (f64::NAN, 2.0)]),
        Err(InputError::InvalidScore)
    ));
    assert!(matches!(
        store.submit_scores(Category::H2h, &[(1.0, 0.0), (-1.0, 2.0)]),
        Err(InputError::NegativeScore)
    ));
    // No partial application: the original batch is untouched.
    assert_eq!(store.h2h().len(), 1);
    assert_eq!(store.h2h()[0].team1_score, 2.0);
}

#[test]
fn clear_all_empties_every_category() {
    let mut store = MatchStore::new();
    store
        .submit_scores(Category::H2h, &[(1.0, 0.0)])
        .expect("h2h batch");
    store
        .submit_scores(Category::Team1, &[(2.0, 0.0)])
        .expect("team1 batch");
    store
        .submit_scores(Category::Team2, &[(3.0, 0.0)])
        .expect("team2 batch");
    assert_eq!(store.total_matches(), 3);

    store.clear_all();
    assert!(store.is_empty());

    // Clearing an already-empty store is a no-op.
    store.clear_all();
    assert!(store.is_empty());
}

#[test]
fn fractional_scores_are_accepted() {
    let mut store = MatchStore::new();
    store
        .submit_scores(Category::Team1, &[(2.5, 1.5)])
        .expect("fractional scores are legal");
    assert_eq!(store.team1()[0].total_score, 4.0);
}
