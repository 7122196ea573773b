use super::*;
use pw_core::{ApplyPolicy, DocumentId, RunMode, RunReport};

fn id(s: &str) -> DocumentId {
    DocumentId::try_new(s).unwrap()
}

#[test]
fn test_document_lines() {
    let planned = ProgressEvent::Planned {
        index: 2,
        total: 5,
        document_id: id("eq-2"),
        name: "Parking voiture".to_string(),
        summary: r#"set icon = "car""#.to_string(),
    };
    assert_eq!(
        render(&planned),
        r#"  [2/5] Parking voiture: set icon = "car""#
    );

    let updated = ProgressEvent::Updated {
        index: 2,
        total: 5,
        document_id: id("eq-2"),
        name: "Parking voiture".to_string(),
    };
    assert_eq!(render(&updated), "  \u{2713} [2/5] Parking voiture");

    let failed = ProgressEvent::Failed {
        index: 3,
        total: 5,
        document_id: id("eq-3"),
        name: "Piscine".to_string(),
        error: "[S003] Patch rejected".to_string(),
    };
    assert_eq!(
        render(&failed),
        "  \u{2717} [3/5] Piscine - [S003] Patch rejected"
    );
}

#[test]
fn test_summary_lists_failures() {
    let mut report = RunReport::new("equipment-icons", RunMode::Live, ApplyPolicy::PerItem);
    report.record_matched(2);
    report.record_skipped();
    report.record_failed(&id("eq-3"), "Piscine", "[S005] Revision conflict");
    report.finish();

    let text = render(&ProgressEvent::Finished { report });
    assert!(text.starts_with("\nDone: 2 matched, 0 updated, 1 skipped, 1 failed"));
    assert!(text.contains("Failures:"));
    assert!(text.contains("\u{2717} Piscine (eq-3): [S005] Revision conflict"));
}

#[test]
fn test_dry_run_summary() {
    let mut report = RunReport::new("villa-locale", RunMode::DryRun, ApplyPolicy::PerItem);
    report.finish();
    let text = render(&ProgressEvent::Finished { report });
    assert!(text.starts_with("\nDry run complete: 0 matched, 0 would update"));
    assert!(!text.contains("Failures:"));
}

#[test]
fn test_batch_lines() {
    let failed = ProgressEvent::BatchFailed {
        transaction_id: "villa-geo-private-info-1a2b3c4d".to_string(),
        count: 3,
        error: "[S004] rejected".to_string(),
    };
    assert_eq!(
        render(&failed),
        "  \u{2717} Transaction villa-geo-private-info-1a2b3c4d rejected, 3 documents unchanged - [S004] rejected"
    );
}
