use cardwatch_core::checkers::{
    CheckContext, Checker, CommitEvidence, Reconciliation, SubsystemInference, SysLabelChecker,
};
use cardwatch_core::domain::{Card, CardId, CardState, Snapshot};
use cardwatch_core::{AuditConfig, ViolationMap};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const READER_COMMIT: &str = "github.com/acme/hedgeye-reader/commit/abc123";

fn finished(id: u64) -> Card {
    Card::new(id, format!("story {id}"), CardState::Finished).with_owner("Ada")
}

fn run<'a>(snap: &'a Snapshot, config: &'a AuditConfig) -> ViolationMap<'a> {
    let ctx = CheckContext::new(snap, config);
    SysLabelChecker::new(SubsystemInference::from_config(config)).check(&ctx)
}

// ---------------------------------------------------------------------------
// Reconciliation branches
// ---------------------------------------------------------------------------

#[test]
fn inferred_reader_without_label_reports_expected() {
    let snap = Snapshot::builder()
        .card(finished(1))
        .comment(1, READER_COMMIT)
        .build()
        .expect("valid snapshot");

    let config = AuditConfig::default();
    let results = run(&snap, &config);
    assert_eq!(
        results.get(CardId(1)),
        Some("Did not find expected label(s): 'reader'")
    );
}

#[test]
fn no_label_and_no_evidence_reports_missing() {
    let snap = Snapshot::builder()
        .card(finished(1))
        .build()
        .expect("valid snapshot");

    let config = AuditConfig::default();
    let results = run(&snap, &config);
    assert_eq!(
        results.get(CardId(1)),
        Some("No system labels detected (reader, cms, dct, etc...)")
    );
}

#[test]
fn contradicted_label_reports_mismatch() {
    let snap = Snapshot::builder()
        .card(finished(1))
        .label(1, "cms")
        .comment(1, READER_COMMIT)
        .build()
        .expect("valid snapshot");

    let config = AuditConfig::default();
    let results = run(&snap, &config);
    assert_eq!(
        results.get(CardId(1)),
        Some("Expected label(s): 'reader', but found: 'cms' instead.")
    );
}

#[test]
fn declared_label_without_evidence_is_trusted() {
    // Documented policy: explicit labels win unless directly contradicted.
    let snap = Snapshot::builder()
        .card(finished(1))
        .label(1, "cms")
        .comment(1, "deployed by hand")
        .build()
        .expect("valid snapshot");

    assert!(run(&snap, &AuditConfig::default()).is_empty());
}

#[test]
fn corroborated_label_is_clean() {
    let snap = Snapshot::builder()
        .card(finished(1))
        .label(1, "cms")
        .label(1, "reader")
        .comment(1, READER_COMMIT)
        .build()
        .expect("valid snapshot");

    assert!(run(&snap, &AuditConfig::default()).is_empty());
}

#[test]
fn reconciliation_fires_exactly_one_branch() {
    let inference = SubsystemInference::from_config(&AuditConfig::default());
    let inferred = vec!["reader".to_string()];
    let outcomes = [
        inference.reconcile(&[], &[]),
        inference.reconcile(&[], &inferred),
        inference.reconcile(&["cms"], &inferred),
        inference.reconcile(&["cms"], &[]),
    ];

    assert!(matches!(outcomes[0], Reconciliation::NoSystemLabel));
    assert!(matches!(outcomes[1], Reconciliation::MissingExpected { .. }));
    assert!(matches!(outcomes[2], Reconciliation::Mismatch { .. }));
    assert!(matches!(outcomes[3], Reconciliation::Declared));
    let violating = outcomes.iter().filter(|o| o.message().is_some()).count();
    assert_eq!(violating, 3);
}

// ---------------------------------------------------------------------------
// Commit-link fragility
// ---------------------------------------------------------------------------

#[test]
fn malformed_link_falls_back_to_no_evidence() {
    let snap = Snapshot::builder()
        .card(finished(1))
        .label(1, "cms")
        .comment(1, "see https://github.com/acme")
        .build()
        .expect("valid snapshot");
    let config = AuditConfig::default();
    let ctx = CheckContext::new(&snap, &config);
    let inference = SubsystemInference::from_config(&config);

    let card = &snap.cards()[0];
    assert!(matches!(
        inference.evidence(&ctx, card),
        CommitEvidence::Malformed { .. }
    ));
    assert_eq!(inference.resolve(&ctx, card).as_deref(), Some("cms"));
    assert!(run(&snap, &AuditConfig::default()).is_empty());
}

#[test]
fn comma_separated_repo_yields_several_names() {
    let inference = SubsystemInference::from_config(&AuditConfig::default());
    let comments = vec![cardwatch_core::Comment::new(
        0,
        "github.com/acme/hedgeye-cms,reader/commit/9",
    )];
    assert_eq!(
        inference.infer_from_comments(&comments).names(),
        &["cms".to_string(), "reader".to_string()]
    );
}

#[test]
fn resolve_prefers_corroborated_name() {
    let snap = Snapshot::builder()
        .card(finished(1))
        .label(1, "cms")
        .label(1, "reader")
        .comment(1, READER_COMMIT)
        .card(finished(2))
        .comment(2, READER_COMMIT)
        .card(finished(3))
        .build()
        .expect("valid snapshot");
    let config = AuditConfig::default();
    let ctx = CheckContext::new(&snap, &config);
    let inference = SubsystemInference::from_config(&config);

    let resolved: Vec<Option<String>> = snap
        .cards()
        .iter()
        .map(|card| inference.resolve(&ctx, card))
        .collect();
    assert_eq!(
        resolved,
        vec![Some("reader".to_string()), Some("reader".to_string()), None]
    );
}
