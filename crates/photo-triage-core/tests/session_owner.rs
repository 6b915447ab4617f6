//! Session owner tests: background scoring, generations and realization.

#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use photo_triage_core::domain::{
    AssetId, CategoryNames, Disposition, Dispositions, ImageCollection, Progress, SharpnessScore,
    TriageError,
};
use photo_triage_core::modules::{realize, RealizationPlan};
use photo_triage_core::ports::{Phase, ProgressEvent};
use photo_triage_core::session::{
    OwnerUpdate, SessionOwner, SessionSettings, TriageMode, TriageServices, WorkerEvent,
};
use photo_triage_test_support::{FixedScorer, MockFileStore, MockImageSource, MockProgressSink};

struct Harness {
    owner: SessionOwner,
    scorer: Arc<FixedScorer>,
    store: Arc<MockFileStore>,
    progress: Arc<MockProgressSink>,
}

fn harness(source: MockImageSource, scorer: FixedScorer, store: MockFileStore) -> Harness {
    let scorer = Arc::new(scorer);
    let store = Arc::new(store);
    let progress = Arc::new(MockProgressSink::new());
    let services = TriageServices {
        source: Arc::new(source),
        scorer: scorer.clone(),
        store: store.clone(),
    };
    let owner = SessionOwner::new(services, SessionSettings::default(), Some(2))
        .unwrap()
        .with_progress(progress.clone());
    Harness {
        owner,
        scorer,
        store,
        progress,
    }
}

fn shoot() -> MockImageSource {
    MockImageSource::new().with_folder("/shoot", &["a.jpg", "b.jpg", "c.jpg"])
}

fn example_scores() -> FixedScorer {
    FixedScorer::from_pairs(&[("a.jpg", 40.0), ("b.jpg", 100.0), ("c.jpg", 250.0)])
}

fn dispositions(owner: &SessionOwner) -> Vec<Disposition> {
    owner
        .session()
        .unwrap()
        .dispositions()
        .iter()
        .map(|(_, d)| d)
        .collect()
}

fn realized(updates: Vec<OwnerUpdate>) -> photo_triage_core::RealizationSummary {
    updates
        .into_iter()
        .find_map(|u| match u {
            OwnerUpdate::Realized { summary } => Some(summary),
            _ => None,
        })
        .unwrap()
}

#[test]
fn test_automatic_example_end_to_end() {
    let mut h = harness(shoot(), example_scores(), MockFileStore::new());

    h.owner.select_folder("/shoot", TriageMode::Automatic);
    let updates = h.owner.wait_idle();

    assert!(matches!(
        updates.first(),
        Some(OwnerUpdate::SessionReady { total: 3, .. })
    ));
    assert_eq!(
        dispositions(&h.owner),
        vec![Disposition::Discard, Disposition::Keep, Disposition::Keep]
    );
    let session = h.owner.session().unwrap();
    assert_eq!(session.blurry_count(), 1);
    assert_eq!(
        session.scoring_progress(),
        Progress {
            completed: 3,
            total: 3
        }
    );
    assert_eq!(h.progress.started_count(), 1);
    assert_eq!(h.progress.advanced_count(), 3);
    assert_eq!(h.progress.finished_counts(), vec![(3, 0)]);

    h.owner.start_realization().unwrap();
    let summary = realized(h.owner.wait_idle());

    assert_eq!(summary.count(Disposition::Keep), 2);
    assert_eq!(summary.count(Disposition::Discard), 1);
    assert!(summary.is_clean());
    // No Maybe folder in automatic mode.
    assert_eq!(
        h.store.dirs(),
        vec![PathBuf::from("/shoot/Keep"), PathBuf::from("/shoot/Discard")]
    );
    let destinations: Vec<_> = h.store.copies().into_iter().map(|(_, d)| d).collect();
    assert_eq!(
        destinations,
        vec![
            PathBuf::from("/shoot/Discard/a.jpg"),
            PathBuf::from("/shoot/Keep/b.jpg"),
            PathBuf::from("/shoot/Keep/c.jpg"),
        ]
    );
}

#[test]
fn test_threshold_change_does_not_rescore() {
    let mut h = harness(shoot(), example_scores(), MockFileStore::new());
    h.owner.select_folder("/shoot", TriageMode::Automatic);
    h.owner.wait_idle();

    let session = h.owner.session_mut().unwrap();
    session.set_threshold(30.0).unwrap();
    assert_eq!(session.blurry_count(), 0);
    session.set_threshold(100.0).unwrap();
    assert_eq!(session.blurry_count(), 1);

    assert_eq!(h.scorer.calls().len(), 3);
}

#[test]
fn test_decode_failure_is_excluded_not_fatal() {
    let scorer = FixedScorer::from_pairs(&[("a.jpg", 400.0), ("c.jpg", 10.0)]);
    let mut h = harness(shoot(), scorer, MockFileStore::new());
    h.owner.select_folder("/shoot", TriageMode::Automatic);
    h.owner.wait_idle();

    let session = h.owner.session().unwrap();
    assert!(session.scoring_progress().is_done());
    assert_eq!(session.unscored().len(), 1);
    assert_eq!(
        session.disposition(AssetId::from_index(1)),
        Disposition::Unclassified
    );
    assert_eq!(h.progress.skipped_count(), 1);
    assert_eq!(h.progress.finished_counts(), vec![(2, 1)]);

    assert_eq!(h.owner.start_realization().unwrap(), 2);
    let summary = realized(h.owner.wait_idle());
    assert_eq!(summary.copied(), 2);
    assert_eq!(summary.excluded.len(), 1);
    assert!(summary.excluded[0].path.ends_with("b.jpg"));
}

#[test]
fn test_copy_failure_does_not_stop_batch() {
    let store = MockFileStore::new().failing("b.jpg");
    let mut h = harness(shoot(), example_scores(), store);
    h.owner.select_folder("/shoot", TriageMode::Automatic);
    h.owner.wait_idle();

    h.owner.start_realization().unwrap();
    let updates = h.owner.wait_idle();
    let copied = updates
        .iter()
        .filter(|u| matches!(u, OwnerUpdate::Copied { .. }))
        .count();
    assert_eq!(copied, 3);

    let summary = realized(updates);
    assert_eq!(summary.copied(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].asset.path.ends_with("b.jpg"));
    assert_eq!(
        h.owner.session().unwrap().realization_progress(),
        Some(Progress {
            completed: 3,
            total: 3
        })
    );
}

#[test]
fn test_unwritable_category_fails_only_its_assets() {
    let store = MockFileStore::new().failing_dir("/shoot/Discard");
    let mut h = harness(shoot(), example_scores(), store);
    h.owner.select_folder("/shoot", TriageMode::Automatic);
    h.owner.wait_idle();

    h.owner.start_realization().unwrap();
    let summary = realized(h.owner.wait_idle());
    assert_eq!(summary.count(Disposition::Keep), 2);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].asset.path.ends_with("a.jpg"));
}

#[test]
fn test_new_selection_discards_stale_results() {
    let source = shoot().with_folder("/other", &["x.jpg"]);
    let scorer = example_scores()
        .with("x.jpg", 500.0)
        .with_delay("a.jpg", Duration::from_millis(50));
    let mut h = harness(source, scorer, MockFileStore::new());

    let first = h.owner.select_folder("/shoot", TriageMode::Automatic);
    let second = h.owner.select_folder("/other", TriageMode::Automatic);
    assert!(second > first);

    let updates = h.owner.wait_idle();
    for update in &updates {
        if let OwnerUpdate::ScoreApplied { score, .. } = update {
            assert_eq!(score.asset, AssetId::from_index(0));
        }
    }

    let session = h.owner.session().unwrap();
    assert_eq!(session.root(), Path::new("/other"));
    assert_eq!(session.generation(), second);
    assert_eq!(session.assets().len(), 1);
    assert_eq!(session.disposition(AssetId::from_index(0)), Disposition::Keep);

    let stale = h.owner.apply(WorkerEvent::Scored {
        generation: first,
        score: SharpnessScore::scored(AssetId::from_index(0), 1.0),
    });
    assert!(matches!(stale, OwnerUpdate::Discarded { generation } if generation == first));
    assert_eq!(h.owner.session().unwrap().blurry_count(), 0);
}

#[test]
fn test_duplicate_score_is_ignored() {
    let mut h = harness(shoot(), example_scores(), MockFileStore::new());
    let generation = h.owner.select_folder("/shoot", TriageMode::Automatic);
    h.owner.wait_idle();

    let update = h.owner.apply(WorkerEvent::Scored {
        generation,
        score: SharpnessScore::scored(AssetId::from_index(0), 900.0),
    });
    assert!(matches!(update, OwnerUpdate::Discarded { .. }));

    let session = h.owner.session().unwrap();
    assert_eq!(
        session.score(AssetId::from_index(0)).map(|s| s.value),
        Some(40.0)
    );
    assert_eq!(session.scoring_progress().completed, 3);
}

#[test]
fn test_failed_selection_keeps_previous_session() {
    let mut h = harness(shoot(), example_scores(), MockFileStore::new());
    h.owner.select_folder("/shoot", TriageMode::Automatic);
    h.owner.wait_idle();

    let failed = h.owner.select_folder("/missing", TriageMode::Automatic);
    let updates = h.owner.wait_idle();
    assert!(matches!(
        updates.as_slice(),
        [OwnerUpdate::SelectionFailed {
            error: TriageError::FolderAccess { .. },
            ..
        }]
    ));

    let session = h.owner.session().unwrap();
    assert_eq!(session.root(), Path::new("/shoot"));
    assert_eq!(session.generation(), failed);
    assert_eq!(session.blurry_count(), 1);

    h.owner.start_realization().unwrap();
    assert_eq!(realized(h.owner.wait_idle()).copied(), 3);
}

#[test]
fn test_failed_selection_mid_scoring_rescores_missing() {
    let scorer = example_scores().with_delay("c.jpg", Duration::from_millis(100));
    let mut h = harness(shoot(), scorer, MockFileStore::new());
    h.owner.select_folder("/shoot", TriageMode::Automatic);
    // Apply the load, then re-select before scoring can finish.
    while !matches!(h.owner.recv(), Some(OwnerUpdate::SessionReady { .. })) {}
    h.owner.select_folder("/missing", TriageMode::Automatic);
    h.owner.wait_idle();

    let session = h.owner.session().unwrap();
    assert!(session.scoring_progress().is_done());
    assert_eq!(
        dispositions(&h.owner),
        vec![Disposition::Discard, Disposition::Keep, Disposition::Keep]
    );
}

#[test]
fn test_failed_selection_mid_realization_finishes_batch() {
    let store = MockFileStore::new().with_copy_delay(Duration::from_millis(100));
    let mut h = harness(shoot(), example_scores(), store);
    h.owner.select_folder("/shoot", TriageMode::Automatic);
    h.owner.wait_idle();

    h.owner.start_realization().unwrap();
    h.owner.select_folder("/missing", TriageMode::Automatic);
    while !matches!(h.owner.recv(), Some(OwnerUpdate::SelectionFailed { .. })) {}

    // The batch is still copying under the rebound session.
    assert!(h.owner.is_busy());
    assert!(matches!(
        h.owner.start_realization(),
        Err(TriageError::RealizationInProgress)
    ));

    assert_eq!(realized(h.owner.wait_idle()).copied(), 3);
    let session = h.owner.session().unwrap();
    assert_eq!(
        session.realization_progress(),
        Some(Progress {
            completed: 3,
            total: 3
        })
    );
    assert_eq!(h.progress.finished_counts().last(), Some(&(3, 0)));
    assert_eq!(h.store.copies().len(), 3);

    h.owner.start_realization().unwrap();
    assert_eq!(realized(h.owner.wait_idle()).copied(), 3);
}

#[test]
fn test_new_session_drops_running_realization() {
    let source = shoot().with_folder("/other", &["x.jpg"]);
    let store = MockFileStore::new().with_copy_delay(Duration::from_millis(50));
    let mut h = harness(source, example_scores().with("x.jpg", 500.0), store);
    h.owner.select_folder("/shoot", TriageMode::Automatic);
    h.owner.wait_idle();

    h.owner.start_realization().unwrap();
    h.owner.select_folder("/other", TriageMode::Automatic);
    let updates = h.owner.wait_idle();
    assert!(!updates
        .iter()
        .any(|u| matches!(u, OwnerUpdate::Realized { .. })));

    let session = h.owner.session().unwrap();
    assert_eq!(session.root(), Path::new("/other"));
    assert_eq!(session.realization_progress(), None);
    assert!(h.owner.start_realization().is_ok());
}

#[test]
fn test_try_recv_polls_without_blocking() {
    let mut h = harness(shoot(), example_scores(), MockFileStore::new());
    assert!(h.owner.try_recv().is_none());

    h.owner.select_folder("/shoot", TriageMode::Automatic);
    let mut updates = Vec::new();
    for _ in 0..400 {
        if !h.owner.is_busy() {
            break;
        }
        match h.owner.try_recv() {
            Some(update) => updates.push(update),
            None => std::thread::sleep(Duration::from_millis(5)),
        }
    }

    assert!(!h.owner.is_busy());
    assert!(matches!(
        updates.first(),
        Some(OwnerUpdate::SessionReady { total: 3, .. })
    ));
    let scored = updates
        .iter()
        .filter(|u| matches!(u, OwnerUpdate::ScoreApplied { .. }))
        .count();
    assert_eq!(scored, 3);
    assert!(h.owner.try_recv().is_none());
}

#[test]
fn test_unusable_folder_names_are_refused() {
    let services = TriageServices {
        source: Arc::new(shoot()),
        scorer: Arc::new(example_scores()),
        store: Arc::new(MockFileStore::new()),
    };
    for categories in [
        CategoryNames {
            keep: ".".into(),
            ..CategoryNames::default()
        },
        CategoryNames {
            discard: "../Out".into(),
            ..CategoryNames::default()
        },
        CategoryNames {
            keep: "Out".into(),
            discard: "out".into(),
            ..CategoryNames::default()
        },
    ] {
        let settings = SessionSettings {
            categories,
            ..SessionSettings::default()
        };
        assert!(matches!(
            SessionOwner::new(services.clone(), settings, Some(1)),
            Err(TriageError::InvalidCategoryName { .. })
        ));
    }
}

#[test]
fn test_realize_writes_nothing_for_root_alias() {
    let paths = ["a.jpg", "b.jpg"].map(|n| PathBuf::from("/shoot").join(n));
    let photos = ImageCollection::new("/shoot", paths.to_vec()).unwrap();
    let mut dispositions = Dispositions::new(2);
    dispositions.set(AssetId::from_index(0), Disposition::Keep);
    dispositions.set(AssetId::from_index(1), Disposition::Discard);
    let names = CategoryNames {
        keep: ".".into(),
        ..CategoryNames::default()
    };
    let plan = RealizationPlan::new(&photos, &dispositions, names);
    let store = MockFileStore::new();

    let mut outcomes = 0;
    let summary = realize(&plan, &store, |_| outcomes += 1);

    assert_eq!(outcomes, 2);
    assert_eq!(summary.copied(), 0);
    assert_eq!(summary.failures.len(), 2);
    assert!(summary.failures[0].reason.contains("not a plain folder name"));
    assert!(store.dirs().is_empty());
    assert!(store.copies().is_empty());
}

#[test]
fn test_empty_folder_reports_and_creates_no_session() {
    let source = MockImageSource::new().with_folder("/empty", &[]);
    let mut h = harness(source, FixedScorer::new(), MockFileStore::new());
    h.owner.select_folder("/empty", TriageMode::Automatic);
    let updates = h.owner.wait_idle();

    match updates.as_slice() {
        [OwnerUpdate::SelectionFailed { error, .. }] => {
            assert!(matches!(error, TriageError::EmptyCollection { .. }));
            assert!(error.to_string().contains("no images found"));
        }
        other => panic!("unexpected updates: {other:?}"),
    }
    assert!(h.owner.session().is_none());
    assert!(matches!(
        h.owner.start_realization(),
        Err(TriageError::NoSession)
    ));
}

#[test]
fn test_realization_refused_while_scoring() {
    let scorer = example_scores().with_delay("b.jpg", Duration::from_millis(300));
    let mut h = harness(shoot(), scorer, MockFileStore::new());
    h.owner.select_folder("/shoot", TriageMode::Automatic);
    while !matches!(h.owner.recv(), Some(OwnerUpdate::SessionReady { .. })) {}

    assert!(matches!(
        h.owner.start_realization(),
        Err(TriageError::ScoringIncomplete { total: 3, .. })
    ));
    h.owner.wait_idle();
    assert!(h.owner.start_realization().is_ok());
}

#[test]
fn test_manual_example_end_to_end() {
    let source = MockImageSource::new().with_folder("/shoot", &["a.jpg", "b.jpg"]);
    let mut h = harness(source, FixedScorer::new(), MockFileStore::new());
    h.owner.select_folder("/shoot", TriageMode::Manual);
    h.owner.wait_idle();
    assert!(h.scorer.calls().is_empty());

    let session = h.owner.session_mut().unwrap();
    assert_eq!(session.current_index(), Some(0));
    assert!(!session.tag(Disposition::Maybe).unwrap().batch_complete);
    assert!(matches!(
        h.owner.start_realization(),
        Err(TriageError::Untagged { remaining: 1 })
    ));

    let session = h.owner.session_mut().unwrap();
    let outcome = session.tag(Disposition::Discard).unwrap();
    assert!(outcome.batch_complete);
    assert_eq!(outcome.current_index, 0);

    h.owner.start_realization().unwrap();
    let summary = realized(h.owner.wait_idle());
    assert_eq!(summary.count(Disposition::Maybe), 1);
    assert_eq!(summary.count(Disposition::Discard), 1);
    assert_eq!(
        h.store.dirs(),
        vec![PathBuf::from("/shoot/Discard"), PathBuf::from("/shoot/Maybe")]
    );
    // Only the copy batch reports progress in manual mode.
    assert_eq!(
        h.progress.events().first(),
        Some(&ProgressEvent::Started {
            phase: Phase::Realizing,
            total: 2
        })
    );
    assert_eq!(h.progress.finished_counts(), vec![(2, 0)]);
}
