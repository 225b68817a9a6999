//! The key identity an agent signs with.
//!
//! The agent never sees private key material directly: it only asks a
//! [`SigningIdentity`] for its public key blob, its key type and for
//! signatures. [`KeypairIdentity`] implements it for RSA and DSA keys
//! loaded with [`ssh_key`].

use std::fmt;

use rsa::signature::{SignatureEncoding, Signer as _};
use sha1::Sha1;
use ssh_encoding::Encode;
use ssh_key::{
    private::{KeypairData, RsaKeypair},
    PrivateKey,
};

use crate::error::SignError;

/// Key type of an identity, as reported to the remote peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyType {
    /// RSA key, signatures are PKCS#1 v1.5 over SHA-1.
    Rsa,
    /// DSA key.
    Dsa,
    /// Any other key algorithm. Identities of this type are listed but
    /// cannot sign.
    Other(String),
}

impl KeyType {
    /// Name sent with signatures made by this key type.
    pub fn signature_name(&self) -> Option<&'static str> {
        match self {
            Self::Rsa => Some("ssh-rsa"),
            Self::Dsa => Some("ssh-dsa"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa => f.write_str("RSA"),
            Self::Dsa => f.write_str("DSA"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Identity served by an agent.
///
/// An identity is shared by every session of an [`Agent`](crate::agent::Agent),
/// so signing may be called concurrently from several threads.
pub trait SigningIdentity: fmt::Debug + Send + Sync {
    /// Key type tag.
    fn key_type(&self) -> KeyType;

    /// Public key in the standard SSH wire encoding.
    fn public_key_blob(&self) -> &[u8];

    /// Sign `data`, returning the raw signature blob.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError>;
}

/// [`SigningIdentity`] backed by an unencrypted [`PrivateKey`].
#[derive(Debug)]
pub struct KeypairIdentity {
    key: PrivateKey,
    blob: Vec<u8>,
}

impl KeypairIdentity {
    /// Wrap a decrypted private key.
    pub fn new(key: PrivateKey) -> Result<Self, SignError> {
        if key.is_encrypted() {
            return Err(ssh_key::Error::Encrypted.into());
        }

        let mut blob = Vec::new();
        key.public_key()
            .key_data()
            .encode(&mut blob)
            .map_err(ssh_key::Error::from)?;

        Ok(Self { key, blob })
    }

    /// Parse an unencrypted OpenSSH private key.
    pub fn from_openssh(pem: impl AsRef<[u8]>) -> Result<Self, SignError> {
        Self::new(PrivateKey::from_openssh(pem)?)
    }

    /// The wrapped private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }
}

impl SigningIdentity for KeypairIdentity {
    fn key_type(&self) -> KeyType {
        match self.key.key_data() {
            KeypairData::Rsa(_) => KeyType::Rsa,
            KeypairData::Dsa(_) => KeyType::Dsa,
            _ => KeyType::Other(self.key.algorithm().to_string()),
        }
    }

    fn public_key_blob(&self) -> &[u8] {
        &self.blob
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError> {
        match self.key.key_data() {
            KeypairData::Rsa(keypair) => {
                let key = rsa_private_key(keypair)?;
                let signer = rsa::pkcs1v15::SigningKey::<Sha1>::new(key);
                Ok(signer.try_sign(data)?.to_vec())
            }
            KeypairData::Dsa(keypair) => {
                let signature: ssh_key::Signature = signature::Signer::try_sign(keypair, data)?;
                Ok(signature.as_bytes().to_vec())
            }
            _ => Err(SignError::UnsupportedKeyType(self.key_type().to_string())),
        }
    }
}

fn rsa_private_key(keypair: &RsaKeypair) -> Result<rsa::RsaPrivateKey, SignError> {
    let key = rsa::RsaPrivateKey::from_components(
        rsa::BigUint::try_from(&keypair.public.n)?,
        rsa::BigUint::try_from(&keypair.public.e)?,
        rsa::BigUint::try_from(&keypair.private.d)?,
        vec![
            rsa::BigUint::try_from(&keypair.private.p)?,
            rsa::BigUint::try_from(&keypair.private.q)?,
        ],
    )?;
    Ok(key)
}

#[cfg(test)]
pub(crate) mod stub {
    use std::sync::Mutex;

    use super::*;

    /// Identity recording every signing call.
    #[derive(Debug)]
    pub(crate) struct StubIdentity {
        key_type: KeyType,
        fail: bool,
        calls: Mutex<Vec<Vec<u8>>>,
    }

    impl StubIdentity {
        pub(crate) fn new(key_type: KeyType) -> Self {
            Self {
                key_type,
                fail: false,
                calls: Mutex::default(),
            }
        }

        pub(crate) fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        pub(crate) fn calls(&self) -> Vec<Vec<u8>> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl SigningIdentity for StubIdentity {
        fn key_type(&self) -> KeyType {
            self.key_type.clone()
        }

        fn public_key_blob(&self) -> &[u8] {
            b"stub-key-blob"
        }

        fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError> {
            self.calls.lock().expect("lock").push(data.to_vec());
            if self.fail {
                return Err(SignError::other(std::io::Error::other("stub failure")));
            }
            Ok(data.iter().rev().copied().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_names() {
        assert_eq!(KeyType::Rsa.signature_name(), Some("ssh-rsa"));
        assert_eq!(KeyType::Dsa.signature_name(), Some("ssh-dsa"));
        assert_eq!(KeyType::Other("ssh-ed25519".into()).signature_name(), None);
    }
}
