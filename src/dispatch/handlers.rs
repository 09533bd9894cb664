//! Traits for the dispatcher's external collaborators.
//!
//! The binary packet parser, the cryptographic primitives, the key
//! database, the trust model, and user prompting are all out of scope
//! for this crate (see the crate's top-level docs); the dispatcher
//! reaches them only through these traits, mirroring how
//! `crypto::hash::Context` wraps a boxed hash backend in the teacher
//! crate instead of hard-coding one.

use crate::packet::keyid::KeyID;
use crate::types::HashAlgorithm;
use crate::Result;

/// Verifies a document signature (sig-class `0x00`/`0x01`) over the
/// plaintext that was hashed under `hash_algo`.
///
/// Hashing itself is the crypto backend's concern (out of scope here,
/// per this crate's purpose); the dispatcher's job is only to
/// assemble which bytes and which declared algorithm go together and
/// hand them to this trait -- the "hash-context setup" this crate
/// coordinates.
pub trait Verifier {
    /// Returns `Ok(true)` if the signature is valid, `Ok(false)` if it
    /// is cryptographically invalid (a bad signature, not an error in
    /// this dispatcher), and `Err` for anything that prevented
    /// verification from running at all (unsupported algorithm,
    /// unknown key).
    fn verify(
        &mut self,
        issuer: KeyID,
        pk_algo: u8,
        hash_algo: HashAlgorithm,
        message: &[u8],
    ) -> Result<bool>;
}

/// Verifies a key/subkey/certification/revocation signature (sig-class
/// `0x10`-`0x30`), which is computed over key material rather than a
/// plaintext digest.
pub trait KeySignatureVerifier {
    /// Returns the verification result together with whether the
    /// issuer is the same key the signature covers (a self-signature).
    fn verify_key_signature(
        &mut self,
        issuer: KeyID,
        subject: KeyID,
        pk_algo: u8,
        hash_algo: HashAlgorithm,
        sigtype: u8,
    ) -> Result<KeySignatureOutcome>;
}

/// The result of [`KeySignatureVerifier::verify_key_signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySignatureOutcome {
    pub valid: bool,
    pub is_self_signature: bool,
}

/// A decrypted symmetric session key (the DEK) and the algorithm it is
/// for.
#[derive(Clone)]
pub struct Dek {
    pub algo: u8,
    key: Vec<u8>,
}
assert_send_and_sync!(Dek);

impl Dek {
    pub fn new(algo: u8, key: Vec<u8>) -> Self {
        Dek { algo, key }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

impl std::fmt::Debug for Dek {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Dek").field("algo", &self.algo).finish_non_exhaustive()
    }
}

impl Drop for Dek {
    fn drop(&mut self) {
        if !self.key.is_empty() {
            unsafe {
                memsec::memzero(self.key.as_mut_ptr(), self.key.len());
            }
        }
    }
}

/// Recovers session keys from PKESK/SKESK packets and performs
/// symmetric decryption of an ENCRYPTED packet's body once a DEK is
/// available.
pub trait Decryptor {
    /// Attempts to decrypt a public-key session key packet addressed
    /// to `recipient`, returning the recovered DEK if this
    /// collaborator holds the matching secret key.
    fn decrypt_session_key(
        &mut self,
        recipient: KeyID,
        pk_algo: u8,
        esk: &[u8],
    ) -> Result<Option<Dek>>;

    /// Derives a DEK from a passphrase-protected (symmetric-key)
    /// session key packet. `sym_algo`/`s2k` are `None` for the "old
    /// conventional encryption" case -- an ENCRYPTED packet with no
    /// preceding SKESK -- in which case the implementation must fall
    /// back to its own default cipher and string-to-key scheme.
    fn derive_session_key(
        &mut self,
        sym_algo: Option<u8>,
        s2k: Option<&[u8]>,
        esk: Option<&[u8]>,
    ) -> Result<Dek>;
}

/// Decompresses a COMPRESSED packet's body and parses the inflated
/// bytes back into packets, handing them to the dispatcher to recurse
/// into under the current mode.
///
/// Binary packet parsing is out of scope for this crate (see the
/// crate's top-level docs), so decompression and re-parsing are
/// bundled into one collaborator rather than splitting them across a
/// boundary this crate can't implement either side of.
pub trait Inflater {
    fn inflate(&mut self, algo: u8, body: &[u8]) -> Result<Vec<crate::packet::Packet>>;
}

/// Consumes bytes from a PLAINTEXT (literal data) packet's body.
pub trait LiteralSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Supplies a passphrase for a detached signature's signed-data file,
/// or for conventional (passphrase-only) encryption.
pub trait PassphraseSource {
    fn passphrase(&mut self, prompt: &str) -> Result<Vec<u8>>;
    /// The externally-declared signed data for sigs-only mode, when
    /// the signature is detached and no in-band plaintext arrives.
    fn signed_data(&mut self) -> Result<Vec<u8>>;
}

/// The dispatcher's external collaborators, bundled so a caller wires
/// them up once per stream.
///
/// Boxed trait objects, same shape as `crypto::hash::Context`'s boxed
/// hash backend in the teacher crate: the dispatcher is generic over
/// *which* crypto/storage backend it talks to without naming one.
pub struct Handlers {
    pub verifier: Box<dyn Verifier>,
    pub key_verifier: Box<dyn KeySignatureVerifier>,
    pub decryptor: Box<dyn Decryptor>,
    pub inflater: Box<dyn Inflater>,
    pub sink: Box<dyn LiteralSink>,
    pub passphrase: Box<dyn PassphraseSource>,
}
