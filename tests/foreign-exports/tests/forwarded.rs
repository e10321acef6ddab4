use native_bridge::{declared_exports, retention_set};
use retainer::{ExportManifest, ManifestError, RetentionError};

#[test]
fn forwarded_declarations_land_in_the_bridge_table() {
    // Referencing `qux` makes sure this crate is linked into the test binary.
    assert_eq!(foreign_exports::qux(43), 42);

    let declared = declared_exports();
    assert_eq!(declared.len(), 4);
    for name in ["foo", "bar", "baz", "qux"] {
        assert!(declared.contains(name), "{name} is not declared");
    }
}

#[test]
fn unlisted_export_is_detected() {
    assert_eq!(foreign_exports::qux(1), 0);

    assert!(!retention_set().contains("qux"));
    assert_eq!(
        retention_set().verify_covers(declared_exports()),
        Err(RetentionError::NotRetained("qux"))
    );
}

#[test]
fn manifest_with_qux_reports_the_drift() {
    let mut manifest = ExportManifest::parse(include_str!("../../native-bridge/exports.txt")).unwrap();
    manifest.push("qux").unwrap();
    assert_eq!(
        manifest.check(retention_set()),
        Err(ManifestError::NotRetained("qux".into()))
    );
}
