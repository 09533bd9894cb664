//! Cleartext-signature mode: a human-readable signed document, streamed
//! while synthesizing the packets a normal in-band signature would have
//! produced, so the dispatcher can verify both uniformly.

use std::io::Read;

use super::{decode_body, read_capped_line, read_header_block, Headers, Kind};
use crate::packet::keyid::KeyID;
use crate::packet::{DataFormat, Literal, OnePassSig, Packet};
use crate::types::{HashAlgorithm, HashAlgorithms, SignatureType};
use crate::{Error, Result};

/// A parsed and canonicalized cleartext-signed document, together with
/// the synthetic packets the dispatcher needs to verify it.
pub struct CleartextMessage {
    hashes: HashAlgorithms,
    not_dash_escaped: bool,
    /// The signed document: trailing whitespace trimmed per line,
    /// `\r\n`-terminated, dash-unescaped unless `NotDashEscaped:` was
    /// present.
    document: Vec<u8>,
    truncated: u32,
    /// Number of leading blank lines swallowed as the header/body
    /// separator (always exactly one on a well-formed stream).
    empty: u32,
}

impl CleartextMessage {
    /// Detects and parses a `BEGIN PGP SIGNED MESSAGE` block from
    /// `inner`, streaming and canonicalizing the document up to (but
    /// not including) the following `BEGIN PGP SIGNATURE` line, which
    /// is consumed. Returns the message and the reader positioned to
    /// continue decoding the trailing signature armor block.
    ///
    /// Nested cleartext (`BEGIN PGP SIGNED MESSAGE` appearing again
    /// before the terminating signature block) is rejected, per this
    /// crate's ban on multi-part armor streams.
    pub fn parse<R: Read>(inner: R) -> Result<(Self, SignatureBlock<R>)> {
        let mut br = std::io::BufReader::new(inner);

        let (first_line, _) = read_capped_line(&mut br).map_err(Error::from)?;
        if Kind::detect_header(&first_line, false) != Some(Kind::SignedMessage) {
            return Err(Error::InvalidArmor(
                "expected BEGIN PGP SIGNED MESSAGE".into(),
            )
            .into());
        }

        let mut hashes = HashAlgorithms::empty();
        let mut not_dash_escaped = false;
        loop {
            let (line, _) = read_capped_line(&mut br).map_err(Error::from)?;
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                break;
            }
            match trimmed.split_once(':') {
                Some(("Hash", value)) => {
                    hashes = super::parse_hash_header(value)?;
                }
                Some(("NotDashEscaped", _)) => {
                    not_dash_escaped = true;
                }
                _ => {
                    return Err(Error::InvalidArmor(format!(
                        "unexpected header in cleartext-signed message: {:?}",
                        trimmed
                    ))
                    .into())
                }
            }
        }
        if hashes.is_empty() {
            // No Hash: header defaults to MD5, per the armor grammar's
            // boundary behavior for an absent header.
            hashes.insert(HashAlgorithm::MD5);
        }

        let mut document = Vec::new();
        let mut truncated = 0u32;
        let signature_begin = Kind::Signature.begin();
        loop {
            let (line, was_truncated) = read_capped_line(&mut br).map_err(Error::from)?;
            if was_truncated {
                truncated += 1;
            }
            if line.is_empty() {
                return Err(Error::InvalidArmor(
                    "cleartext message never reached its signature block".into(),
                )
                .into());
            }
            let bare = line.trim_end_matches(['\r', '\n']);
            if bare == signature_begin {
                break;
            }
            if Kind::detect_header(bare, false) == Some(Kind::SignedMessage) {
                return Err(Error::InvalidArmor("nested cleartext signature".into()).into());
            }

            canonicalize_line(bare, not_dash_escaped, &mut document);
        }

        let message = CleartextMessage {
            hashes,
            not_dash_escaped,
            document,
            truncated,
            empty: 1,
        };

        Ok((message, SignatureBlock { br }))
    }

    /// The hash algorithms declared by the `Hash:` header (or `{MD5}`
    /// if absent).
    pub fn hashes(&self) -> HashAlgorithms {
        self.hashes
    }

    pub fn not_dash_escaped(&self) -> bool {
        self.not_dash_escaped
    }

    /// The canonicalized document: exactly the bytes that must be fed
    /// to each declared hash algorithm.
    pub fn document(&self) -> &[u8] {
        &self.document
    }

    pub fn truncated_lines(&self) -> u32 {
        self.truncated
    }

    /// Number of header/body separator blank lines swallowed (always
    /// 1 on a well-formed stream; tracked rather than assumed so a
    /// caller can assert on it in tests).
    pub fn separator_lines(&self) -> u32 {
        self.empty
    }

    /// Synthesizes the packet prefix a normal in-band signed message
    /// would have produced: one [`Packet::OnePassSig`] per declared
    /// hash algorithm (bit order: RMD160, SHA1, MD5, TIGER; `last` set
    /// on the final one), followed by a single
    /// [`Packet::Literal`] carrying the canonicalized document as
    /// canonical text (mode `'t'`, empty filename, zero timestamp).
    ///
    /// This crate models the synthetic stream as an in-memory packet
    /// list rather than re-serializing byte-identical wire packets and
    /// re-parsing them, since the dispatcher consumes [`Packet`]
    /// values either way.
    pub fn synthetic_packets(&self) -> Vec<Packet> {
        let mut packets = Vec::new();
        let algos: Vec<HashAlgorithm> = self.hashes.iter().collect();
        let count = algos.len();
        for (i, algo) in algos.into_iter().enumerate() {
            packets.push(Packet::OnePassSig(OnePassSig {
                sigtype: SignatureType::Text,
                hash_algo: algo,
                pk_algo: 0,
                issuer: KeyID::WILDCARD,
                last: i + 1 == count,
            }));
        }
        packets.push(Packet::Literal(Literal {
            format: DataFormat::Text,
            filename: Vec::new(),
            date: 0,
            body: self.document.clone(),
        }));
        packets
    }
}

/// Appends one canonicalized cleartext body line (its content already
/// stripped of the trailing `\n`/`\r`) to `out`.
fn canonicalize_line(line: &str, not_dash_escaped: bool, out: &mut Vec<u8>) {
    let trimmed = line.trim_end_matches([' ', '\t']);

    let content: &str = if !not_dash_escaped {
        if let Some(rest) = trimmed.strip_prefix("- ") {
            rest
        } else {
            if trimmed.starts_with('-') {
                log::warn!(
                    "cleartext line starts with '-' but is not dash-escaped: {:?}",
                    trimmed
                );
            }
            trimmed
        }
    } else {
        trimmed
    };

    out.extend_from_slice(content.as_bytes());
    out.extend_from_slice(b"\r\n");
}

/// The detached signature armor block following a cleartext-signed
/// document, positioned right after the `BEGIN PGP SIGNATURE` line
/// [`CleartextMessage::parse`] already consumed.
pub struct SignatureBlock<R> {
    br: std::io::BufReader<R>,
}

impl<R: Read> SignatureBlock<R> {
    /// Parses the headers and Radix-64 body of the trailing signature
    /// block, returning its decoded packet bytes for the binary
    /// packet parser to consume.
    pub fn decode(mut self) -> Result<(Headers, Vec<u8>)> {
        let headers = read_header_block(&mut self.br)?;
        let (body, _truncated, _any_data) = decode_body(&mut self.br, Kind::Signature)?;
        Ok((headers, body))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn signed(input: &str) -> (CleartextMessage, Vec<u8>) {
        let (msg, sig) = CleartextMessage::parse(input.as_bytes()).unwrap();
        let (_headers, body) = sig.decode().unwrap();
        (msg, body)
    }

    #[test]
    fn two_hashes_and_dash_escaping() {
        let mut writer = crate::armor::Writer::new(Vec::new(), Kind::Signature).unwrap();
        std::io::Write::write_all(&mut writer, b"sig-bytes").unwrap();
        let sig_armor = writer.finalize().unwrap();

        let input = format!(
            "-----BEGIN PGP SIGNED MESSAGE-----\nHash: SHA1, MD5\n\n- -dashed\nplain   \n{}",
            String::from_utf8(sig_armor).unwrap()
        );

        let (msg, body) = signed(&input);
        assert!(msg.hashes().contains(HashAlgorithm::SHA1));
        assert!(msg.hashes().contains(HashAlgorithm::MD5));
        assert!(!msg.hashes().contains(HashAlgorithm::Tiger192));
        assert_eq!(msg.document(), b"-dashed\r\nplain\r\n");
        assert_eq!(body, b"sig-bytes");

        let packets = msg.synthetic_packets();
        assert_eq!(packets.len(), 3);
        match &packets[0] {
            Packet::OnePassSig(ops) => {
                assert_eq!(ops.hash_algo, HashAlgorithm::SHA1);
                assert!(!ops.last);
                assert!(ops.issuer.is_wildcard());
            }
            _ => panic!("expected OnePassSig"),
        }
        match &packets[1] {
            Packet::OnePassSig(ops) => {
                assert_eq!(ops.hash_algo, HashAlgorithm::MD5);
                assert!(ops.last);
            }
            _ => panic!("expected OnePassSig"),
        }
        match &packets[2] {
            Packet::Literal(lit) => {
                assert_eq!(lit.format, DataFormat::Text);
                assert_eq!(lit.body, msg.document());
            }
            _ => panic!("expected Literal"),
        }
    }

    #[test]
    fn no_hash_header_defaults_to_md5() {
        let mut writer = crate::armor::Writer::new(Vec::new(), Kind::Signature).unwrap();
        std::io::Write::write_all(&mut writer, b"x").unwrap();
        let sig_armor = writer.finalize().unwrap();
        let input = format!(
            "-----BEGIN PGP SIGNED MESSAGE-----\n\nhello\n{}",
            String::from_utf8(sig_armor).unwrap()
        );
        let (msg, _body) = signed(&input);
        assert!(msg.hashes().contains(HashAlgorithm::MD5));
        assert_eq!(msg.hashes().iter().count(), 1);
    }

    #[test]
    fn empty_document_hashes_one_blank_line() {
        let mut writer = crate::armor::Writer::new(Vec::new(), Kind::Signature).unwrap();
        std::io::Write::write_all(&mut writer, b"x").unwrap();
        let sig_armor = writer.finalize().unwrap();
        let input = format!(
            "-----BEGIN PGP SIGNED MESSAGE-----\n\n\n{}",
            String::from_utf8(sig_armor).unwrap()
        );
        let (msg, _body) = signed(&input);
        assert_eq!(msg.document(), b"\r\n");
    }

    #[test]
    fn unknown_hash_algorithm_is_fatal() {
        let input = "-----BEGIN PGP SIGNED MESSAGE-----\nHash: BOGUS\n\nhello\n-----BEGIN PGP SIGNATURE-----\n";
        assert!(CleartextMessage::parse(input.as_bytes()).is_err());
    }

    #[test]
    fn unexpected_header_in_cleartext_is_fatal() {
        let input = "-----BEGIN PGP SIGNED MESSAGE-----\nComment: nope\n\nhello\n-----BEGIN PGP SIGNATURE-----\n";
        assert!(CleartextMessage::parse(input.as_bytes()).is_err());
    }

    #[test]
    fn nested_cleartext_is_rejected() {
        let input = "-----BEGIN PGP SIGNED MESSAGE-----\n\nhello\n-----BEGIN PGP SIGNED MESSAGE-----\nmore\n-----BEGIN PGP SIGNATURE-----\n";
        assert!(CleartextMessage::parse(input.as_bytes()).is_err());
    }
}
