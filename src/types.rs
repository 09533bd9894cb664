//! Small enumerations shared by the armor codec and the dispatcher.

use std::fmt;

/// The packet tags this crate understands.
///
/// Mirrors the subset of [RFC 4880, section 4.3] tags that the armor
/// codec's synthetic-packet injection and the dispatcher's grouping
/// rules need to recognize.
///
///   [RFC 4880, section 4.3]: https://tools.ietf.org/html/rfc4880#section-4.3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Tag {
    /// Public-key encrypted session key packet.
    PKESK,
    /// Signature packet.
    Signature,
    /// Symmetric-key encrypted session key packet.
    SKESK,
    /// One-pass signature packet.
    OnePassSig,
    /// Secret (private) key packet.
    SecretKey,
    /// Public key packet.
    PublicKey,
    /// Secret subkey packet.
    SecretSubkey,
    /// Compressed data packet.
    CompressedData,
    /// Symmetrically encrypted (and optionally integrity protected)
    /// data packet.
    Encrypted,
    /// Marker packet.
    Marker,
    /// Literal (plaintext) data packet.
    Literal,
    /// User ID packet.
    UserID,
    /// Public subkey packet.
    PublicSubkey,
    /// A comment packet, as emitted by some non-conforming
    /// implementations.
    Comment,
}
assert_send_and_sync!(Tag);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Tag::PKESK => "Public-Key Encrypted Session Key",
            Tag::Signature => "Signature",
            Tag::SKESK => "Symmetric-Key Encrypted Session Key",
            Tag::OnePassSig => "One-Pass Signature",
            Tag::SecretKey => "Secret Key",
            Tag::PublicKey => "Public Key",
            Tag::SecretSubkey => "Secret Subkey",
            Tag::CompressedData => "Compressed Data",
            Tag::Encrypted => "Encrypted Data",
            Tag::Marker => "Marker",
            Tag::Literal => "Literal Data",
            Tag::UserID => "User ID",
            Tag::PublicSubkey => "Public Subkey",
            Tag::Comment => "Comment",
        };
        f.write_str(s)
    }
}

/// Hash algorithms named by a `Hash:` armor header or a signature
/// packet.
///
/// The numeric values match the OpenPGP algorithm registry; only the
/// algorithms the clear-signature header syntax can name are
/// represented (see [RFC 4880, section 9.4]).
///
///   [RFC 4880, section 9.4]: https://tools.ietf.org/html/rfc4880#section-9.4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// MD5, the default when no `Hash:` header is present.
    MD5,
    /// SHA-1.
    SHA1,
    /// RIPEMD-160.
    RipeMD160,
    /// TIGER/192.
    Tiger192,
}
assert_send_and_sync!(HashAlgorithm);

impl HashAlgorithm {
    /// The bit this algorithm occupies in an armor context's `hashes`
    /// bitmask (RMD160=1, SHA1=2, MD5=4, TIGER=8).
    pub const fn bit(self) -> u8 {
        match self {
            HashAlgorithm::RipeMD160 => 1,
            HashAlgorithm::SHA1 => 2,
            HashAlgorithm::MD5 => 4,
            HashAlgorithm::Tiger192 => 8,
        }
    }

    /// All four algorithms in the bit order synthetic one-pass
    /// signatures are emitted in: RMD160, SHA1, MD5, TIGER.
    pub const ALL_IN_BIT_ORDER: [HashAlgorithm; 4] = [
        HashAlgorithm::RipeMD160,
        HashAlgorithm::SHA1,
        HashAlgorithm::MD5,
        HashAlgorithm::Tiger192,
    ];

    /// Parses one of the four names a `Hash:` header may list.
    pub fn from_armor_name(name: &str) -> Option<Self> {
        match name.trim() {
            "MD5" => Some(HashAlgorithm::MD5),
            "SHA1" => Some(HashAlgorithm::SHA1),
            "RIPEMD160" => Some(HashAlgorithm::RipeMD160),
            "TIGER" => Some(HashAlgorithm::Tiger192),
            _ => None,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            HashAlgorithm::MD5 => "MD5",
            HashAlgorithm::SHA1 => "SHA1",
            HashAlgorithm::RipeMD160 => "RIPEMD160",
            HashAlgorithm::Tiger192 => "TIGER",
        };
        f.write_str(s)
    }
}

/// A bitmask of [`HashAlgorithm`]s, as accumulated in an armor
/// context's `hashes` field while parsing a `Hash:` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HashAlgorithms(u8);
assert_send_and_sync!(HashAlgorithms);

impl HashAlgorithms {
    /// An empty set.
    pub const fn empty() -> Self {
        HashAlgorithms(0)
    }

    /// Adds `algo` to the set.
    pub fn insert(&mut self, algo: HashAlgorithm) {
        self.0 |= algo.bit();
    }

    /// Whether `algo` is a member of the set.
    pub fn contains(&self, algo: HashAlgorithm) -> bool {
        self.0 & algo.bit() != 0
    }

    /// Whether no algorithm has been declared.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the set members in bit order (RMD160, SHA1, MD5,
    /// TIGER), the order synthetic one-pass signatures are emitted in.
    pub fn iter(&self) -> impl Iterator<Item = HashAlgorithm> + '_ {
        HashAlgorithm::ALL_IN_BIT_ORDER.into_iter().filter(move |a| self.contains(*a))
    }
}

/// The signature class (RFC 4880 section 5.2.1), read from the low byte of a
/// signature or one-pass-signature packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureType {
    /// `0x00`: signature over a binary document.
    Binary,
    /// `0x01`: signature over a canonicalized text document.
    Text,
    /// `0x02`: a signature that doesn't cover any document.
    Standalone,
    /// `0x10`..`0x13`: certifications over a User ID / key binding.
    Certification(u8),
    /// `0x18`: subkey binding signature.
    SubkeyBinding,
    /// `0x19`: primary key binding signature.
    PrimaryKeyBinding,
    /// `0x1f`: direct key signature.
    DirectKey,
    /// `0x20`: key revocation signature.
    KeyRevocation,
    /// `0x28`: subkey revocation signature.
    SubkeyRevocation,
    /// `0x30`: certification revocation signature.
    CertificationRevocation,
    /// `0x40`: timestamp signature.
    Timestamp,
    /// `0x50`: third-party confirmation signature.
    ThirdPartyConfirmation,
    /// Any class byte this crate does not assign meaning to.
    Unknown(u8),
}
assert_send_and_sync!(SignatureType);

impl SignatureType {
    /// Parses a signature class byte.
    pub fn from_byte(b: u8) -> Self {
        match b {
            0x00 => SignatureType::Binary,
            0x01 => SignatureType::Text,
            0x02 => SignatureType::Standalone,
            0x10..=0x13 => SignatureType::Certification(b),
            0x18 => SignatureType::SubkeyBinding,
            0x19 => SignatureType::PrimaryKeyBinding,
            0x1f => SignatureType::DirectKey,
            0x20 => SignatureType::KeyRevocation,
            0x28 => SignatureType::SubkeyRevocation,
            0x30 => SignatureType::CertificationRevocation,
            0x40 => SignatureType::Timestamp,
            0x50 => SignatureType::ThirdPartyConfirmation,
            other => SignatureType::Unknown(other),
        }
    }

    /// The raw class byte.
    pub fn as_byte(&self) -> u8 {
        match *self {
            SignatureType::Binary => 0x00,
            SignatureType::Text => 0x01,
            SignatureType::Standalone => 0x02,
            SignatureType::Certification(b) => b,
            SignatureType::SubkeyBinding => 0x18,
            SignatureType::PrimaryKeyBinding => 0x19,
            SignatureType::DirectKey => 0x1f,
            SignatureType::KeyRevocation => 0x20,
            SignatureType::SubkeyRevocation => 0x28,
            SignatureType::CertificationRevocation => 0x30,
            SignatureType::Timestamp => 0x40,
            SignatureType::ThirdPartyConfirmation => 0x50,
            SignatureType::Unknown(b) => b,
        }
    }

    /// Whether this class is verified over a plaintext/document hash
    /// (as opposed to a key or subkey binding).
    pub fn is_document_signature(&self) -> bool {
        matches!(self, SignatureType::Binary | SignatureType::Text)
    }

    /// Whether this class is one of the key-signature classes the
    /// dispatcher verifies over a key or subkey root: certifications
    /// (`0x10`-`0x13`), subkey binding (`0x18`), key revocation
    /// (`0x20`), and certification revocation (`0x30`).
    ///
    /// `PrimaryKeyBinding`, `DirectKey`, and `SubkeyRevocation` are
    /// deliberately excluded -- the same mask the class byte is
    /// checked against upstream (`(class & ~3) == 0x10 || class ==
    /// 0x18 || class == 0x20 || class == 0x30`) excludes them too, and
    /// they fall through to "unsupported signature class" instead.
    pub fn is_key_signature(&self) -> bool {
        matches!(self,
            SignatureType::Certification(_)
            | SignatureType::SubkeyBinding
            | SignatureType::KeyRevocation
            | SignatureType::CertificationRevocation)
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#04x}", self.as_byte())
    }
}
