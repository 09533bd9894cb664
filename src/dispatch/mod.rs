//! The packet stream dispatcher: groups decoded packets into trees and
//! calls out to handlers for decryption, signature verification,
//! decompression, and literal-data sinks.
//!
//! Binary packet parsing is a collaborator this module doesn't
//! perform; it consumes already-parsed [`Packet`](crate::Packet)
//! values, in the order a [`crate::armor::Reader`] (or the synthetic
//! prefix from [`crate::armor::cleartext`]) would hand them over.

pub mod handlers;

use crate::packet::keyid::KeyID;
use crate::packet::{Literal, Packet};
use crate::types::{SignatureType, Tag};
use crate::{Error, Result};

pub use handlers::{Dek, Handlers, KeySignatureOutcome};

/// Which packet kinds a dispatcher in this mode will accept, and what
/// it builds from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Accept everything; build key trees and signature trees.
    Default,
    /// Reject key-management packets; collect signatures, plaintext,
    /// compressed data, and one-pass signatures only.
    SigsOnly,
    /// Reject key-management packets other than session-key and
    /// encrypted-data ones.
    EncryptOnly,
}

impl Mode {
    fn accepts(&self, tag: Tag) -> bool {
        use Tag::*;
        match self {
            Mode::Default => true,
            Mode::SigsOnly => !matches!(
                tag,
                PublicKey | SecretKey | PublicSubkey | SecretSubkey | UserID | SKESK | PKESK
                    | Encrypted
            ),
            Mode::EncryptOnly => !matches!(tag, PublicKey | SecretKey | UserID),
        }
    }
}

/// A verification or decryption outcome, emitted to the side channel
/// a caller collects (this crate's analogue of GnuPG's
/// `--status-fd` text protocol, made concrete as data).
#[derive(Debug, Clone)]
pub enum Status {
    /// The armor layer rejected the stream outright.
    BadArmor,
    /// A signature verified successfully.
    GoodSig { issuer: KeyID, is_self_signature: bool },
    /// A signature's cryptographic check failed.
    BadSig { issuer: KeyID },
    /// Verification could not be completed (unsupported algorithm,
    /// unknown key, I/O failure reading the detached data, ...).
    ErrSig { issuer: KeyID, reason: String },
}

/// The kind of packet group currently being accumulated, determining
/// how [`Dispatcher::finalize_group`] (`proc_tree`) processes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    /// Rooted at a PUBLIC-KEY or SECRET-KEY packet: user IDs,
    /// signatures, and subkeys follow.
    Key,
    /// Rooted at a ONEPASS-SIG packet (or packets): a PLAINTEXT packet
    /// and its SIGNATURE(s) follow.
    OnePassSig,
    /// A lone SIGNATURE packet with no preceding one-pass announcement
    /// (a detached signature).
    DetachedSig,
}

/// One packet group (the dispatcher's "KBNode chain"): an ordered list
/// of packets sharing a root, with the root's kind determining how the
/// group is finalized.
struct Group {
    kind: GroupKind,
    packets: Vec<Packet>,
}

/// Tracks which kind of session-key packet was last seen, so an
/// unrelated packet arriving before the matching ENCRYPTED packet can
/// trigger defensive DEK release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionKeyState {
    None,
    PublicKey,
    Symmetric,
}

/// The dispatcher's mutable per-stream state and its handler
/// collaborators.
pub struct Dispatcher {
    mode: Mode,
    group: Option<Group>,
    dek: Option<Dek>,
    last_was_session_key: SessionKeyState,
    statuses: Vec<Status>,
    handlers: Handlers,
    /// Set for a sigs-only stream whose plaintext is supplied
    /// out-of-band rather than found in-band (detached signatures).
    signed_data: Option<Vec<u8>>,
}

impl Dispatcher {
    pub fn new(mode: Mode, handlers: Handlers) -> Self {
        Dispatcher {
            mode,
            group: None,
            dek: None,
            last_was_session_key: SessionKeyState::None,
            statuses: Vec::new(),
            handlers,
            signed_data: None,
        }
    }

    /// Declares the externally-supplied signed data for a detached
    /// signature verified in sigs-only mode, when no in-band plaintext
    /// will arrive.
    pub fn set_signed_data(&mut self, data: Vec<u8>) {
        self.signed_data = Some(data);
    }

    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    /// Feeds one packet to the dispatcher.
    pub fn process(&mut self, packet: Packet) -> Result<()> {
        let tag = packet.tag();
        if !self.mode.accepts(tag) {
            return Err(Error::Unexpected(tag).into());
        }

        let is_session_key_chain = matches!(
            packet,
            Packet::PKESK(_) | Packet::SKESK(_) | Packet::Encrypted(_)
        );

        match packet {
            Packet::PublicKey(_) | Packet::SecretKey(_) => {
                self.finalize_group()?;
                self.group = Some(Group { kind: GroupKind::Key, packets: vec![packet] });
            }

            Packet::PublicSubkey(_) | Packet::SecretSubkey(_) | Packet::UserID(_) => {
                match &mut self.group {
                    Some(g) => g.packets.push(packet),
                    None => return Err(Error::Unexpected(tag).into()),
                }
            }

            Packet::Signature(_) => match &mut self.group {
                Some(g) => g.packets.push(packet),
                None => {
                    self.group =
                        Some(Group { kind: GroupKind::DetachedSig, packets: vec![packet] })
                }
            },

            Packet::OnePassSig(_) => match &mut self.group {
                Some(g) => g.packets.push(packet),
                None => {
                    self.group =
                        Some(Group { kind: GroupKind::OnePassSig, packets: vec![packet] })
                }
            },

            Packet::PKESK(pkesk) => {
                if let Some(dek) =
                    self.handlers.decryptor.decrypt_session_key(pkesk.recipient, pkesk.pk_algo, &pkesk.esk)?
                {
                    self.dek = Some(dek);
                }
                self.last_was_session_key = SessionKeyState::PublicKey;
            }

            Packet::SKESK(skesk) => {
                let dek = self.handlers.decryptor.derive_session_key(
                    Some(skesk.sym_algo),
                    Some(&skesk.s2k),
                    skesk.esk.as_deref(),
                )?;
                self.dek = Some(dek);
                self.last_was_session_key = SessionKeyState::Symmetric;
            }

            Packet::Encrypted(_) => {
                if self.dek.is_none() {
                    let dek = self.handlers.decryptor.derive_session_key(None, None, None)?;
                    self.dek = Some(dek);
                }
                // Consumed regardless of outcome; actual bulk
                // decryption is the crypto backend's concern once it
                // holds the DEK.
                self.dek = None;
                self.last_was_session_key = SessionKeyState::None;
            }

            Packet::CompressedData(cd) => {
                let inflated = self.handlers.inflater.inflate(cd.algo, &cd.body)?;
                for p in inflated {
                    self.process(p)?;
                }
            }

            Packet::Literal(lit) => self.process_literal(lit)?,

            Packet::Marker(_) | Packet::Comment(_) => {}

            _ => {}
        }

        if !is_session_key_chain && self.last_was_session_key != SessionKeyState::None {
            self.dek = None;
            self.last_was_session_key = SessionKeyState::None;
        }

        Ok(())
    }

    /// Call once no more packets remain, to finalize the last group.
    pub fn finish(&mut self) -> Result<()> {
        self.finalize_group()
    }

    fn process_literal(&mut self, lit: Literal) -> Result<()> {
        self.handlers.sink.write(&lit.body)?;

        if let Some(g) = &mut self.group {
            if g.kind == GroupKind::OnePassSig {
                g.packets.push(Packet::Literal(lit));
                return Ok(());
            }
        }
        // A PLAINTEXT with no one-pass announcement in scope; sink it
        // and move on, nothing to verify.
        Ok(())
    }

    /// `proc_tree`: finalizes the current group, dispatching
    /// verification as appropriate, then clears it.
    fn finalize_group(&mut self) -> Result<()> {
        let group = match self.group.take() {
            Some(g) => g,
            None => return Ok(()),
        };

        match group.kind {
            // A key root is listing only: the group is released without
            // invoking any signature crypto. A caller that wants the
            // certifications/bindings on a key actually checked calls
            // `verify_key_signatures` itself, once it has the full group.
            GroupKind::Key => {
                log::debug!(
                    "finalized a key group with {} packet(s): listing only",
                    group.packets.len()
                );
            }
            GroupKind::OnePassSig => {
                self.verify_document_group(&group.packets)?;
            }
            GroupKind::DetachedSig => {
                self.verify_document_group(&group.packets)?;
            }
        }

        Ok(())
    }

    /// Verifies every key/subkey/certification/revocation signature in
    /// a key group, reporting each outcome to [`Dispatcher::statuses`].
    ///
    /// Not called automatically from `proc_tree`: a key root is listing
    /// only (see [`Dispatcher::finalize_group`]). A caller that wants a
    /// key's signatures actually checked -- as opposed to merely listed
    /// -- collects the group's packets and calls this explicitly.
    pub fn verify_key_signatures(&mut self, packets: &[Packet]) -> Result<()> {
        let subject = packets.iter().find_map(|p| match p {
            Packet::PublicKey(k) | Packet::PublicSubkey(k) => Some(k.keyid),
            Packet::SecretKey(k) | Packet::SecretSubkey(k) => Some(k.keyid),
            _ => None,
        });
        let Some(subject) = subject else { return Ok(()) };

        for p in packets {
            if let Packet::Signature(sig) = p {
                if !sig.sigtype.is_key_signature() {
                    continue;
                }
                let outcome = self.handlers.key_verifier.verify_key_signature(
                    sig.issuer,
                    subject,
                    sig.pk_algo,
                    sig.hash_algo,
                    sig.sigtype.as_byte(),
                );
                self.record_key_signature_outcome(sig.issuer, outcome);
            }
        }
        Ok(())
    }

    fn record_key_signature_outcome(
        &mut self,
        issuer: KeyID,
        outcome: Result<KeySignatureOutcome>,
    ) {
        match outcome {
            Ok(o) if o.valid => self.statuses.push(Status::GoodSig {
                issuer,
                is_self_signature: o.is_self_signature,
            }),
            Ok(_) => self.statuses.push(Status::BadSig { issuer }),
            Err(e) => self.statuses.push(Status::ErrSig { issuer, reason: e.to_string() }),
        }
    }

    /// Verifies every `SIGNATURE` in a one-pass or detached-signature
    /// group, per the sig-class dispatch rules.
    fn verify_document_group(&mut self, packets: &[Packet]) -> Result<()> {
        let message: Vec<u8> = match packets.iter().find_map(|p| match p {
            Packet::Literal(lit) => Some(lit.body.clone()),
            _ => None,
        }) {
            Some(body) => body,
            None => self.acquire_signed_data()?,
        };

        for p in packets {
            let sig = match p {
                Packet::Signature(sig) => sig,
                _ => continue,
            };

            if sig.sigtype.is_document_signature() {
                let result = self.handlers.verifier.verify(
                    sig.issuer,
                    sig.pk_algo,
                    sig.hash_algo,
                    &message,
                );
                match result {
                    Ok(true) => self.statuses.push(Status::GoodSig {
                        issuer: sig.issuer,
                        is_self_signature: false,
                    }),
                    Ok(false) => self.statuses.push(Status::BadSig { issuer: sig.issuer }),
                    Err(e) => self
                        .statuses
                        .push(Status::ErrSig { issuer: sig.issuer, reason: e.to_string() }),
                }
            } else if sig.sigtype.is_key_signature() {
                return Err(Error::UnsupportedSignatureType(sig.sigtype.as_byte()).into());
            } else if !matches!(sig.sigtype, SignatureType::Standalone) {
                return Err(Error::UnsupportedSignatureType(sig.sigtype.as_byte()).into());
            }
        }
        Ok(())
    }

    /// No in-band plaintext arrived: acquire the signed data either
    /// from the caller-declared `signed_data` (sigs-only mode) or by
    /// prompting for a detached file.
    fn acquire_signed_data(&mut self) -> Result<Vec<u8>> {
        if let Some(data) = self.signed_data.take() {
            return Ok(data);
        }
        self.handlers.passphrase_source_signed_data()
    }
}

impl Handlers {
    fn passphrase_source_signed_data(&mut self) -> Result<Vec<u8>> {
        self.passphrase.signed_data()
    }
}
