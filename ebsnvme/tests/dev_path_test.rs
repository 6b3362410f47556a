use assert_matches::assert_matches;

use ebsnvme::{dev_path::resolve_device, NvmeError};

#[test]
fn missing_device() {
    assert_matches!(
        resolve_device("/dev/ebsnvme-test-missing"),
        Err(NvmeError::NotFound { path }) => {
            assert_eq!(path, "/dev/ebsnvme-test-missing");
        }
    );
}

#[test]
fn bare_names_are_looked_up_in_dev() {
    assert_matches!(
        resolve_device("ebsnvme-test-missing"),
        Err(NvmeError::NotFound { path }) => {
            assert_eq!(path, "/dev/ebsnvme-test-missing");
        }
    );
    assert_matches!(
        resolve_device("null"),
        Err(NvmeError::NotBlockDevice { path }) => {
            assert_eq!(path, "/dev/null");
        }
    );
}

#[test]
fn character_device_is_rejected() {
    assert_matches!(
        resolve_device("/dev/null"),
        Err(NvmeError::NotBlockDevice { .. })
    );
}

#[test]
fn regular_file_is_rejected() {
    let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
    assert_matches!(
        resolve_device(manifest),
        Err(NvmeError::NotBlockDevice { .. })
    );
}

#[test]
fn validation_errors_are_not_transport_errors() {
    let err = resolve_device("/dev/null").unwrap_err();
    assert!(!err.is_transport());
}
