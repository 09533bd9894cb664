//! Key IDs.

use std::fmt;

/// The last 8 bytes of a key's fingerprint, as used by signature and
/// session-key packets to name the issuing/recipient key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyID([u8; 8]);
assert_send_and_sync!(KeyID);

impl KeyID {
    /// The all-zero key ID synthetic cleartext-signature one-pass
    /// packets use, since no real key issued them.
    pub const WILDCARD: KeyID = KeyID([0; 8]);

    /// Constructs a `KeyID` from its 8-byte big-endian form.
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        KeyID(bytes)
    }

    /// Returns the 8-byte big-endian form.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Whether this is the all-zero wildcard key ID.
    pub fn is_wildcard(&self) -> bool {
        self.0 == [0; 8]
    }
}

impl Default for KeyID {
    fn default() -> Self {
        KeyID::WILDCARD
    }
}

impl fmt::Debug for KeyID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KeyID({})", self)
    }
}

impl fmt::Display for KeyID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}
