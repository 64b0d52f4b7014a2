//! Shared fixtures for the HorizonDesk integration tests.

use std::path::Path;
use std::sync::Arc;

use horizondesk_store::{FileStorage, RecordStore};
use horizondesk_vault::{CryptoService, KdfParams};

/// Iteration count that keeps key derivation fast in tests.
pub const TEST_KDF_ITERATIONS: u32 = 1_000;

/// Record store over `storage.json` in `dir`.
pub fn file_records(dir: &Path) -> RecordStore {
    let storage = FileStorage::open_dir(dir).expect("open storage dir");
    RecordStore::new(Arc::new(storage))
}

/// Cipher with cheap key derivation.
pub fn fast_cipher() -> CryptoService {
    CryptoService::with_params(KdfParams::new(TEST_KDF_ITERATIONS).expect("non-zero iterations"))
}
