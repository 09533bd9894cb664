//! ASCII armor codec and packet stream dispatcher for OpenPGP messages.
//!
//! This crate implements two pieces of an OpenPGP message processor:
//!
//!  - [`armor`], a streaming filter that converts between a binary
//!    OpenPGP packet stream and its ASCII-armored representation (see
//!    [RFC 4880, section 6]), including the clear-signed-document
//!    variant that reconstructs synthetic packets from a
//!    human-readable signed document; and
//!  - [`dispatch`], which consumes the decoded packet stream, groups
//!    related packets into trees, and calls out to handlers for
//!    verification, decryption, and literal-data sinks.
//!
//! Binary packet parsing, cryptographic primitives, key storage, trust
//! computation, and all user-facing plumbing are out of scope: this
//! crate treats them as collaborators reached through the traits in
//! [`dispatch::handlers`].
//!
//!   [RFC 4880, section 6]: https://tools.ietf.org/html/rfc4880#section-6

#[macro_use]
mod macros;

pub mod armor;
pub mod dispatch;
pub mod filter;
pub mod packet;
pub mod types;

pub use crate::packet::Packet;
pub use crate::types::{HashAlgorithm, SignatureType, Tag};

/// Crate result specialization.
pub type Result<T> = ::std::result::Result<T, anyhow::Error>;

/// Errors returned by this crate.
///
/// Note: this enum is `#[non_exhaustive]` to allow future extension
/// without a breaking change.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The armored data is malformed and cannot be recovered.
    ///
    /// Surfaced to callers as the `BADARMOR` status.
    #[error("Invalid OpenPGP armor: {0}")]
    InvalidArmor(String),

    /// A malformed packet was encountered while dispatching.
    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    /// A packet kind isn't allowed in the dispatcher's current mode.
    #[error("Unexpected packet in this context: {0:?}")]
    Unexpected(Tag),

    /// An unsupported public key algorithm was named by a PKESK or
    /// key signature.
    #[error("Unsupported public key algorithm: {0}")]
    UnsupportedPublicKeyAlgorithm(u8),

    /// An unsupported hash algorithm was named by a signature or a
    /// cleartext `Hash:` header.
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),

    /// No secret key is available to decrypt a PKESK.
    #[error("No secret key available for this session key packet")]
    NoSecretKey,

    /// Signature verification failed for cryptographic reasons.
    #[error("Bad signature: {0}")]
    BadSignature(String),

    /// A signature carries a class this dispatcher does not know how
    /// to verify.
    #[error("Unsupported signature class: {0:#04x}")]
    UnsupportedSignatureType(u8),

    /// The output sink for literal data refused to accept it.
    ///
    /// The plaintext is still hashed so that signature verification
    /// can proceed even though this error is returned.
    #[error("Could not create output for literal data: {0}")]
    CreateFile(String),

    /// Wraps an underlying I/O error.
    #[error(transparent)]
    Io(#[from] IoErrorWrapper),
}

/// A `Clone`-able wrapper around [`std::io::Error`].
///
/// `std::io::Error` isn't `Clone`, but [`Error`] derives `Clone` to
/// match the teacher crate's error type; the message is preserved,
/// the original `io::ErrorKind` is not needed by any caller in this
/// crate.
#[derive(Debug, Clone)]
pub struct IoErrorWrapper(pub String);

impl std::fmt::Display for IoErrorWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for IoErrorWrapper {}

impl From<std::io::Error> for IoErrorWrapper {
    fn from(e: std::io::Error) -> Self {
        IoErrorWrapper(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(IoErrorWrapper::from(e))
    }
}
