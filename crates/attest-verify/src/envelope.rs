//! DSSE envelope signature verification

use crate::anchor::ResolvedAnchor;
use crate::error::{Error, Result};
use attest_types::DsseEnvelope;

/// Verify the envelope's signatures under the resolved anchor
///
/// Every signature is tried in order over the envelope's PAE and the index
/// of the first one that verifies is returned. Key IDs are ignored.
pub fn verify_envelope(envelope: &DsseEnvelope, anchor: &ResolvedAnchor) -> Result<usize> {
    let pae = envelope.pae();

    for (index, signature) in envelope.signatures.iter().enumerate() {
        match anchor.key.verify(&pae, &signature.sig) {
            Ok(()) => {
                tracing::debug!(index, keyid = %signature.keyid, "DSSE signature verified");
                return Ok(index);
            }
            Err(e) => {
                tracing::debug!(index, keyid = %signature.keyid, "DSSE signature rejected: {}", e);
            }
        }
    }

    Err(Error::SignatureInvalid(format!(
        "none of {} signature(s) verified",
        envelope.signatures.len()
    )))
}
