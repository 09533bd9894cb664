//! The OpenPGP packets this crate's dispatcher groups and inspects.
//!
//! Full packet bodies (MPIs, subpacket areas, key material) are the
//! binary packet parser's concern and out of scope here; each struct
//! below carries only the fields the armor codec or the dispatcher
//! actually reads or writes.

pub mod keyid;

use crate::types::{HashAlgorithm, SignatureType, Tag};
pub use keyid::KeyID;

/// A public key or public subkey packet.
///
/// Whether this is a primary key or a subkey is determined by which
/// [`Packet`] variant wraps it, not a field here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub keyid: KeyID,
    pub pk_algo: u8,
}
assert_send_and_sync!(PublicKey);

/// A secret key or secret subkey packet.
///
/// Whether this is a primary key or a subkey is determined by which
/// [`Packet`] variant wraps it, not a field here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKey {
    pub keyid: KeyID,
    pub pk_algo: u8,
}
assert_send_and_sync!(SecretKey);

/// A User ID packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserID {
    pub value: Vec<u8>,
}
assert_send_and_sync!(UserID);

/// A signature packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub sigtype: SignatureType,
    pub hash_algo: HashAlgorithm,
    pub pk_algo: u8,
    pub issuer: KeyID,
    /// Set once a hash context has produced a digest for this
    /// signature; the crypto backend consumes this to verify.
    pub computed_hash: Option<Vec<u8>>,
}
assert_send_and_sync!(Signature);

impl Signature {
    /// Whether the issuer key ID is the all-zero placeholder used by
    /// synthetic cleartext-signature one-pass packets.
    pub fn issuer_is_wildcard(&self) -> bool {
        self.issuer.is_wildcard()
    }
}

/// A one-pass signature packet: announces, ahead of the plaintext it
/// signs, which hash to compute while streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnePassSig {
    pub sigtype: SignatureType,
    pub hash_algo: HashAlgorithm,
    pub pk_algo: u8,
    pub issuer: KeyID,
    /// Set on the last one-pass signature packet of a run.
    pub last: bool,
}
assert_send_and_sync!(OnePassSig);

/// A public-key encrypted session key packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PKESK {
    pub recipient: KeyID,
    pub pk_algo: u8,
    /// Opaque, algorithm-specific encrypted session key material;
    /// the actual decryption is a crypto-backend collaborator's job.
    pub esk: Vec<u8>,
}
assert_send_and_sync!(PKESK);

/// A symmetric-key encrypted session key packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SKESK {
    pub sym_algo: u8,
    pub s2k: Vec<u8>,
    pub esk: Option<Vec<u8>>,
}
assert_send_and_sync!(SKESK);

/// A symmetrically encrypted (optionally integrity-protected) data
/// packet. The ciphertext itself is streamed, not buffered here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    pub mdc_protected: bool,
}
assert_send_and_sync!(Encrypted);

/// A compressed data packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    pub algo: u8,
    /// The compressed body; inflating it and re-parsing the inflated
    /// bytes into packets is the inflater collaborator's job (binary
    /// packet parsing is out of scope for this crate).
    pub body: Vec<u8>,
}
assert_send_and_sync!(CompressedData);

/// The literal data packet's mode octet (RFC 4880 section 5.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Binary,
    /// Canonical text, CRLF-terminated; used for both `t` and the
    /// modern `u` (UTF-8 text) modes.
    Text,
    MIME,
}
assert_send_and_sync!(DataFormat);

/// A literal ("plaintext") data packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub format: DataFormat,
    pub filename: Vec<u8>,
    pub date: u32,
    /// The body, streamed in partial-length chunks on the wire; fully
    /// buffered here once reassembled by the filter.
    pub body: Vec<u8>,
}
assert_send_and_sync!(Literal);

/// A marker packet, emitted by some implementations as the very first
/// packet of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker;
assert_send_and_sync!(Marker);

/// A comment packet, as some non-conforming implementations emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub value: Vec<u8>,
}
assert_send_and_sync!(Comment);

/// The OpenPGP packets this crate's components consume.
///
/// Note: this enum is `#[non_exhaustive]`: the binary packet parser
/// this crate treats as an external collaborator may hand back packet
/// kinds no component here needs to inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Packet {
    PublicKey(PublicKey),
    SecretKey(SecretKey),
    PublicSubkey(PublicKey),
    SecretSubkey(SecretKey),
    UserID(UserID),
    Signature(Signature),
    OnePassSig(OnePassSig),
    PKESK(PKESK),
    SKESK(SKESK),
    Encrypted(Encrypted),
    CompressedData(CompressedData),
    Literal(Literal),
    Marker(Marker),
    Comment(Comment),
}
assert_send_and_sync!(Packet);

impl Packet {
    /// Returns the packet's tag.
    pub fn tag(&self) -> Tag {
        match self {
            Packet::PublicKey(_) => Tag::PublicKey,
            Packet::SecretKey(_) => Tag::SecretKey,
            Packet::PublicSubkey(_) => Tag::PublicSubkey,
            Packet::SecretSubkey(_) => Tag::SecretSubkey,
            Packet::UserID(_) => Tag::UserID,
            Packet::Signature(_) => Tag::Signature,
            Packet::OnePassSig(_) => Tag::OnePassSig,
            Packet::PKESK(_) => Tag::PKESK,
            Packet::SKESK(_) => Tag::SKESK,
            Packet::Encrypted(_) => Tag::Encrypted,
            Packet::CompressedData(_) => Tag::CompressedData,
            Packet::Literal(_) => Tag::Literal,
            Packet::Marker(_) => Tag::Marker,
            Packet::Comment(_) => Tag::Comment,
        }
    }

    /// Whether this packet is a root key (starts a new key/cert
    /// group).
    pub fn is_key_root(&self) -> bool {
        matches!(self, Packet::PublicKey(_) | Packet::SecretKey(_))
    }
}
