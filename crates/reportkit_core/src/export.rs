//! Shared render-call envelope: fallible kernel in, terminal result out.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::ReportResult;
use crate::spec::{EnumExportKind, SpecArtifact, SpecExportResult};
use crate::util::derive_panic_text;

/// Run `write_fn` and fold its outcome (including panics) into a result.
pub fn run_export<F>(kind: EnumExportKind, filename: &str, write_fn: F) -> SpecExportResult
where
    F: FnOnce() -> ReportResult<Vec<u8>>,
{
    let c_details = match catch_unwind(AssertUnwindSafe(write_fn)) {
        Ok(Ok(bytes)) => {
            tracing::info!(
                kind = kind.display_name(),
                filename,
                n_bytes = bytes.len(),
                "export finished"
            );
            return SpecExportResult::succeeded(SpecArtifact {
                filename: filename.to_string(),
                kind,
                bytes,
            });
        }
        Ok(Err(err)) => err.to_string(),
        Err(payload) => derive_panic_text(payload.as_ref()),
    };
    tracing::error!(kind = kind.display_name(), filename, error = %c_details, "export failed");
    SpecExportResult::failed(kind, c_details)
}
