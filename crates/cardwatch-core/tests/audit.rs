use cardwatch_core::domain::{Card, CardState, Snapshot};
use cardwatch_core::{audit, audit_parallel, AuditConfig, ViolationKind, NO_OWNER_KEY};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn busy_snapshot() -> Snapshot {
    let mut builder = Snapshot::builder();
    let owners = ["Ada", "Grace", "Linus"];
    let states = [
        CardState::Finished,
        CardState::Delivered,
        CardState::Accepted,
        CardState::Started,
    ];
    for id in 1..=40u64 {
        let mut card = Card::new(id, format!("story {id}"), states[(id % 4) as usize]);
        if id % 5 != 0 {
            card = card.with_owner(owners[(id % 3) as usize]);
        }
        builder = builder.card(card);
        if id % 2 == 0 {
            builder = builder.label(id, "to_prod");
        }
        if id % 3 == 0 {
            builder = builder.label(id, "cms");
        }
        if id % 7 == 0 {
            builder = builder.label(id, "blocked");
        }
        if id % 4 == 2 {
            builder = builder.comment(id, "Commit by dev github.com/acme/hedgeye-reader/commit/f");
        }
    }
    builder.build().expect("valid snapshot")
}

// ---------------------------------------------------------------------------
// Sequential vs parallel
// ---------------------------------------------------------------------------

#[test]
fn parallel_audit_matches_sequential() {
    let snap = busy_snapshot();
    let config = AuditConfig::default();

    let sequential = audit(&snap, &config);
    let parallel = audit_parallel(&snap, &config);

    assert_eq!(sequential.run_id, parallel.run_id);
    assert_eq!(sequential.outputs, parallel.outputs);
    assert_eq!(sequential.report, parallel.report);
    assert!(sequential.total_violations() > 0);
}

#[test]
fn outputs_follow_fixed_kind_order() {
    let snap = busy_snapshot();
    let config = AuditConfig::default();
    let outcome = audit_parallel(&snap, &config);

    let kinds: Vec<ViolationKind> = outcome.outputs.iter().map(|o| o.kind).collect();
    assert_eq!(kinds, ViolationKind::ALL.to_vec());
}

#[test]
fn unowned_cards_reported_under_sentinel() {
    let snap = busy_snapshot();
    let config = AuditConfig::default();
    let outcome = audit(&snap, &config);

    let nobody = outcome.report.get(NO_OWNER_KEY).expect("sentinel bundle");
    assert!(nobody
        .violations(ViolationKind::UnassignedOwner)
        .iter()
        .all(|v| v.card.owners.is_empty()));
}

#[test]
fn same_snapshot_same_run_id() {
    let config = AuditConfig::default();
    let a = busy_snapshot();
    let b = busy_snapshot();
    assert_eq!(audit(&a, &config).run_id, audit(&b, &config).run_id);
}
