//! Whole-pipeline scenarios: a cleartext-signed document decoded by
//! the armor layer and the resulting synthetic packets (plus the
//! packets from its trailing detached-signature block) fed through
//! the dispatcher.

use std::io::Write;

use pgp_stream::armor::cleartext::CleartextMessage;
use pgp_stream::armor::{Kind, Reader, ReaderOptions, Writer};
use pgp_stream::dispatch::handlers::{
    Decryptor, Dek, Handlers, Inflater, KeySignatureOutcome, KeySignatureVerifier, LiteralSink,
    PassphraseSource, Verifier,
};
use pgp_stream::dispatch::{Dispatcher, Mode, Status};
use pgp_stream::types::HashAlgorithm;
use pgp_stream::Packet;

/// A crypto backend stand-in that accepts everything: good enough to
/// exercise the dispatcher's grouping and status-reporting logic
/// without a real cryptographic implementation.
struct AlwaysGood;

impl Verifier for AlwaysGood {
    fn verify(
        &mut self,
        _issuer: pgp_stream::packet::KeyID,
        _pk_algo: u8,
        _hash_algo: HashAlgorithm,
        _message: &[u8],
    ) -> pgp_stream::Result<bool> {
        Ok(true)
    }
}

impl KeySignatureVerifier for AlwaysGood {
    fn verify_key_signature(
        &mut self,
        _issuer: pgp_stream::packet::KeyID,
        _subject: pgp_stream::packet::KeyID,
        _pk_algo: u8,
        _hash_algo: HashAlgorithm,
        _sigtype: u8,
    ) -> pgp_stream::Result<KeySignatureOutcome> {
        Ok(KeySignatureOutcome { valid: true, is_self_signature: false })
    }
}

impl Decryptor for AlwaysGood {
    fn decrypt_session_key(
        &mut self,
        _recipient: pgp_stream::packet::KeyID,
        _pk_algo: u8,
        _esk: &[u8],
    ) -> pgp_stream::Result<Option<Dek>> {
        Ok(None)
    }

    fn derive_session_key(
        &mut self,
        _sym_algo: Option<u8>,
        _s2k: Option<&[u8]>,
        _esk: Option<&[u8]>,
    ) -> pgp_stream::Result<Dek> {
        Ok(Dek::new(9, vec![0u8; 16]))
    }
}

impl Inflater for AlwaysGood {
    fn inflate(&mut self, _algo: u8, _body: &[u8]) -> pgp_stream::Result<Vec<Packet>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct CollectingSink(Vec<u8>);

impl LiteralSink for CollectingSink {
    fn write(&mut self, bytes: &[u8]) -> pgp_stream::Result<()> {
        self.0.extend_from_slice(bytes);
        Ok(())
    }
}

impl PassphraseSource for AlwaysGood {
    fn passphrase(&mut self, _prompt: &str) -> pgp_stream::Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn signed_data(&mut self) -> pgp_stream::Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

fn handlers() -> Handlers {
    Handlers {
        verifier: Box::new(AlwaysGood),
        key_verifier: Box::new(AlwaysGood),
        decryptor: Box::new(AlwaysGood),
        inflater: Box::new(AlwaysGood),
        sink: Box::new(CollectingSink::default()),
        passphrase: Box::new(AlwaysGood),
    }
}

#[test]
fn cleartext_document_verifies_through_the_dispatcher() {
    let mut sig_writer = Writer::new(Vec::new(), Kind::Signature).unwrap();
    sig_writer.write_all(b"not-a-real-signature-body").unwrap();
    let sig_armor = sig_writer.finalize().unwrap();

    let input = format!(
        "-----BEGIN PGP SIGNED MESSAGE-----\nHash: SHA1, MD5\n\n- -dashed\nplain line\n{}",
        String::from_utf8(sig_armor).unwrap()
    );

    let (message, signature_block) = CleartextMessage::parse(input.as_bytes()).unwrap();
    assert_eq!(message.document(), b"-dashed\r\nplain line\r\n");

    let (_headers, detached_sig_bytes) = signature_block.decode().unwrap();
    assert_eq!(detached_sig_bytes, b"not-a-real-signature-body");

    let mut dispatcher = Dispatcher::new(Mode::Default, handlers());
    for packet in message.synthetic_packets() {
        dispatcher.process(packet).unwrap();
    }
    // The detached signature block's own packets aren't binary-parsed
    // by this crate (that's out of scope); exercise the dispatcher
    // with an equivalent in-band signature packet instead, closing
    // the one-pass-sig group the synthetic prefix opened.
    dispatcher
        .process(Packet::Signature(pgp_stream::packet::Signature {
            sigtype: pgp_stream::types::SignatureType::Text,
            hash_algo: HashAlgorithm::MD5,
            pk_algo: 1,
            issuer: pgp_stream::packet::KeyID::from_bytes([0xAA; 8]),
            computed_hash: None,
        }))
        .unwrap();
    dispatcher.finish().unwrap();

    assert_eq!(dispatcher.statuses().len(), 1);
    assert!(matches!(dispatcher.statuses()[0], Status::GoodSig { .. }));
}

#[test]
fn binary_armor_round_trips_through_the_reader_and_writer() {
    let payload = b"a longer payload that spans more than one 64-column line of radix-64 output";

    let mut writer = Writer::new(Vec::new(), Kind::Message).unwrap();
    writer.write_all(payload).unwrap();
    let armored = writer.finalize().unwrap();

    let mut reader = Reader::new(&armored[..], ReaderOptions::default()).unwrap();
    let mut decoded = Vec::new();
    std::io::Read::read_to_end(&mut reader, &mut decoded).unwrap();

    assert_eq!(decoded, payload);
    assert_eq!(reader.kind(), Some(Kind::Message));
    assert!(reader.any_data());
    assert_eq!(reader.truncated_lines(), 0);
}
