//! Signatures made on behalf of the remote peer.

use crate::error::SignError;
use crate::identity::SigningIdentity;
use crate::proto::Signature;

/// Sign `data` with `identity` and tag the result with its key type.
///
/// Fails without signing when the key type has no signature name.
pub fn sign(identity: &dyn SigningIdentity, data: &[u8]) -> Result<Signature, SignError> {
    let key_type = identity.key_type();
    let algorithm = key_type
        .signature_name()
        .ok_or_else(|| SignError::UnsupportedKeyType(key_type.to_string()))?;

    let blob = identity.sign(data)?;

    Ok(Signature {
        algorithm: algorithm.into(),
        blob,
    })
}
