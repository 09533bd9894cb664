//! Radix-64 (OpenPGP's base64 dialect) encode/decode and CRC-24.
//!
//! This module is deliberately stateless in its configuration: it
//! knows nothing about headers, footers, or cleartext signatures.
//! What little state exists -- a carry buffer of up to three pending
//! input bytes, a 4-bit index into it, and a running CRC-24
//! accumulator -- is owned by the caller ([`Encoder`]/[`Decoder`]) and
//! threaded through successive calls, so a stream can be fed to this
//! module in arbitrarily sized chunks.

/// The alphabet's 65th symbol, marking end-of-data on decode and pad
/// on encode.
const PAD: u8 = b'=';

/// Initial value of the CRC-24 accumulator (RFC 4880 section 6.1).
const CRC24_INIT: u32 = 0xB704CE;

/// CRC-24 polynomial (RFC 4880 section 6.1), top bit implicit.
const CRC24_POLY: u32 = 0x1864CFB;

const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

lazy_static::lazy_static! {
    /// The 256-entry CRC-24 table: `TABLE[i]` is the accumulator
    /// reached by shift-and-xoring `i << 16` eight times against
    /// [`CRC24_POLY`]. Built once, read-only thereafter; any race to
    /// build it is benign since every thread computes the same table.
    static ref CRC_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = (i as u32) << 16;
            let mut bit = 0;
            while bit < 8 {
                crc <<= 1;
                if crc & 0x0100_0000 != 0 {
                    crc ^= CRC24_POLY;
                }
                bit += 1;
            }
            table[i] = crc & 0x00FF_FFFF;
            i += 1;
        }
        table
    };

    /// ASCII byte to 6-bit value, or `None` for anything outside the
    /// Radix-64 alphabet (whitespace, line endings, and any other
    /// character, all of which the decoder treats as "skip, possibly
    /// warn").
    static ref DECODE_TABLE: [Option<u8>; 256] = {
        let mut table = [None; 256];
        for (value, &sym) in ALPHABET.iter().enumerate() {
            table[sym as usize] = Some(value as u8);
        }
        table
    };
}

/// Looks up the 6-bit value of a Radix-64 symbol.
pub(crate) fn decode_symbol(c: u8) -> Option<u8> {
    DECODE_TABLE[c as usize]
}

/// Whether `c` is whitespace the decoder silently skips rather than
/// warning about (spaces, tabs, CR, LF).
pub(crate) fn is_skippable_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n')
}

/// A running CRC-24 accumulator (RFC 4880 section 6.1).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crc24(u32);

impl Crc24 {
    pub(crate) fn new() -> Self {
        Crc24(CRC24_INIT)
    }

    /// Folds one decoded byte into the accumulator.
    pub(crate) fn update(&mut self, byte: u8) {
        let crc = self.0;
        self.0 = ((crc << 8) ^ CRC_TABLE[((crc >> 16) as u8 ^ byte) as usize])
            & 0x00FF_FFFF;
    }

    pub(crate) fn update_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.update(b);
        }
    }

    pub(crate) fn finalize(&self) -> u32 {
        self.0
    }
}

impl Default for Crc24 {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes a CRC-24 value as its 4-character Radix-64 representation,
/// as used by the `=XXXX` trailer line.
pub(crate) fn encode_crc(crc: u32) -> [u8; 4] {
    let bytes = [(crc >> 16) as u8, (crc >> 8) as u8, crc as u8];
    encode_triple(&bytes, 3)
}

/// Encodes up to 3 bytes (`len` of them, the rest ignored) into 4
/// Radix-64 characters, padding with `=` if `len < 3`.
fn encode_triple(bytes: &[u8; 3], len: usize) -> [u8; 4] {
    let b0 = bytes[0] as u32;
    let b1 = if len > 1 { bytes[1] as u32 } else { 0 };
    let b2 = if len > 2 { bytes[2] as u32 } else { 0 };
    let n = (b0 << 16) | (b1 << 8) | b2;

    let c0 = ALPHABET[((n >> 18) & 0x3f) as usize];
    let c1 = ALPHABET[((n >> 12) & 0x3f) as usize];
    let c2 = if len > 1 { ALPHABET[((n >> 6) & 0x3f) as usize] } else { PAD };
    let c3 = if len > 2 { ALPHABET[(n & 0x3f) as usize] } else { PAD };
    [c0, c1, c2, c3]
}

/// Encodes the carry buffer of a streaming [`Encoder`].
///
/// Groups input into 4-character quartets per 3 bytes, and tracks a
/// column counter so the caller can insert a line break every 16
/// quartets (64 characters), per RFC 4880 section 6.3 as narrowed by
/// GnuPG's 64-column convention.
#[derive(Debug, Clone)]
pub(crate) struct Encoder {
    /// Up to 2 bytes waiting for a full triple.
    stash: [u8; 2],
    stash_len: u8,
    crc: Crc24,
}

impl Encoder {
    pub(crate) fn new() -> Self {
        Encoder { stash: [0; 2], stash_len: 0, crc: Crc24::new() }
    }

    pub(crate) fn crc(&self) -> u32 {
        self.crc.finalize()
    }

    /// Encodes as much of `input` as forms complete triples (with any
    /// previously stashed bytes prepended), appending quartets to
    /// `out`. Leftover bytes (0..=2) are stashed for the next call or
    /// [`Encoder::finish`].
    pub(crate) fn push(&mut self, mut input: &[u8], out: &mut Vec<u8>) {
        self.crc.update_slice(input);

        // Top up the stash to a full triple if we have a partial one.
        if self.stash_len > 0 {
            while (self.stash_len as usize) < 3 && !input.is_empty() {
                self.stash[self.stash_len as usize] = input[0];
                self.stash_len += 1;
                input = &input[1..];
            }
            if self.stash_len as usize == 3 {
                let triple = [self.stash[0], self.stash[1], 0];
                out.extend_from_slice(&encode_triple(&triple, 3));
                self.stash_len = 0;
            } else {
                // Still short of a triple; nothing more to do.
                return;
            }
        }

        while input.len() >= 3 {
            let triple = [input[0], input[1], input[2]];
            out.extend_from_slice(&encode_triple(&triple, 3));
            input = &input[3..];
        }

        for &b in input {
            self.stash[self.stash_len as usize] = b;
            self.stash_len += 1;
        }
    }

    /// Flushes any stashed partial triple, padding with `=`, and
    /// returns the quartet if there was anything to flush.
    pub(crate) fn finish(&mut self) -> Option<[u8; 4]> {
        if self.stash_len == 0 {
            return None;
        }
        let triple = [self.stash[0], self.stash[1], 0];
        let out = encode_triple(&triple, self.stash_len as usize);
        self.stash_len = 0;
        Some(out)
    }
}

/// Decodes a stream of Radix-64 characters, accumulating whole bytes
/// and the running CRC, until `=` (end-of-data) is seen.
#[derive(Debug, Clone)]
pub(crate) struct Decoder {
    /// Up to 4 pending 6-bit values.
    radbuf: [u8; 4],
    /// Number of valid entries in `radbuf` (0..=3).
    idx: u8,
    crc: Crc24,
    saw_invalid: bool,
    done: bool,
}

impl Decoder {
    pub(crate) fn new() -> Self {
        Decoder {
            radbuf: [0; 4],
            idx: 0,
            crc: Crc24::new(),
            saw_invalid: false,
            done: false,
        }
    }

    pub(crate) fn crc(&self) -> u32 {
        self.crc.finalize()
    }

    /// Whether any character outside the alphabet (and not
    /// whitespace) was silently skipped; callers use this to decide
    /// whether to log a recoverable warning.
    pub(crate) fn saw_invalid_character(&self) -> bool {
        self.saw_invalid
    }

    /// Whether `=` (end-of-data) has been seen.
    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    /// Feeds a chunk of input characters, appending decoded bytes to
    /// `out`. Whitespace is skipped silently; any other character
    /// outside the alphabet is skipped with
    /// [`Decoder::saw_invalid_character`] latched for the caller to
    /// warn about.
    ///
    /// The first `=` marks end-of-data, same as standard base64: if
    /// it falls on a quartet boundary (a multiple of 3 bytes were
    /// encoded), that `=` is itself the CRC trailer's leading pad
    /// character, and the caller should read exactly four more
    /// characters as the CRC. If it falls mid-quartet (1 or 2 bytes
    /// left over), it is consumed as ordinary base64 padding --
    /// together with one further `=` when two symbols are pending --
    /// the leftover byte(s) are emitted, and the CRC trailer's own
    /// leading `=` follows afterwards in the stream, untouched by
    /// this call.
    ///
    /// Sets [`Decoder::is_done`] once `=` is seen. Returns the number
    /// of input bytes consumed.
    pub(crate) fn feed(&mut self, input: &[u8], out: &mut Vec<u8>) -> usize {
        let mut i = 0;
        while i < input.len() {
            let c = input[i];
            i += 1;

            if c == PAD {
                match self.idx {
                    0 => {
                        // Quartet-aligned: this `=` is the CRC
                        // trailer's own leading pad character.
                    }
                    2 => {
                        // One more pad character completes this
                        // quartet; tolerate whitespace before it.
                        while i < input.len() && is_skippable_whitespace(input[i]) {
                            i += 1;
                        }
                        if i < input.len() && input[i] == PAD {
                            i += 1;
                        }
                        let n = (self.radbuf[0] as u32) << 18
                            | (self.radbuf[1] as u32) << 12;
                        let byte = (n >> 16) as u8;
                        self.crc.update(byte);
                        out.push(byte);
                    }
                    3 => {
                        let n = (self.radbuf[0] as u32) << 18
                            | (self.radbuf[1] as u32) << 12
                            | (self.radbuf[2] as u32) << 6;
                        let b0 = (n >> 16) as u8;
                        let b1 = (n >> 8) as u8;
                        self.crc.update(b0);
                        self.crc.update(b1);
                        out.push(b0);
                        out.push(b1);
                    }
                    _ => {
                        // A single leftover 6-bit group can't encode
                        // a full byte; nothing to emit.
                    }
                }
                self.idx = 0;
                self.done = true;
                return i;
            }

            let v = match decode_symbol(c) {
                Some(v) => v,
                None => {
                    if !is_skippable_whitespace(c) {
                        self.saw_invalid = true;
                    }
                    continue;
                }
            };

            self.radbuf[self.idx as usize] = v;
            self.idx += 1;
            if self.idx < 4 {
                continue;
            }
            self.idx = 0;

            let n = (self.radbuf[0] as u32) << 18
                | (self.radbuf[1] as u32) << 12
                | (self.radbuf[2] as u32) << 6
                | (self.radbuf[3] as u32);
            let bytes = [(n >> 16) as u8, (n >> 8) as u8, n as u8];
            self.crc.update_slice(&bytes);
            out.extend_from_slice(&bytes);
        }
        input.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn crc() {
        // Computed against RFC 4880's CRC-24 definition; "Hello
        // world!" matches the well-known `s4Gu` trailer used by
        // several OpenPGP implementations' own test suites.
        let crcs: &[(&[u8], u32)] = &[
            (b"", 0xB704CE),
            (b"\x01", 0xE72528),
            (b"Hello world!", 0xB381AE),
        ];
        for (data, want) in crcs {
            let mut crc = Crc24::new();
            crc.update_slice(data);
            assert_eq!(crc.finalize(), *want, "crc of {:?}", data);
        }
    }

    #[test]
    fn encode_crc_matches_known_vector() {
        assert_eq!(&encode_crc(0xB381AE), b"s4Gu");
        assert_eq!(&encode_crc(0xB704CE), b"twTO");
    }

    #[test]
    fn encoder_empty() {
        let mut enc = Encoder::new();
        let mut out = Vec::new();
        enc.push(b"", &mut out);
        assert!(out.is_empty());
        assert!(enc.finish().is_none());
        assert_eq!(enc.crc(), CRC24_INIT);
    }

    #[test]
    fn encoder_single_byte_pads() {
        let mut enc = Encoder::new();
        let mut out = Vec::new();
        enc.push(&[0x01], &mut out);
        assert!(out.is_empty(), "a single byte should be stashed, not emitted yet");
        let quartet = enc.finish().expect("pending partial triple");
        assert_eq!(&quartet, b"AQ==");
    }

    #[test]
    fn encoder_hello_world() {
        let mut enc = Encoder::new();
        let mut out = Vec::new();
        enc.push(b"Hello world!", &mut out);
        if let Some(tail) = enc.finish() {
            out.extend_from_slice(&tail);
        }
        assert_eq!(out, b"SGVsbG8gd29ybGQh");
        assert_eq!(enc.crc(), 0xB381AE);
    }

    #[test]
    fn decoder_hello_world() {
        let mut dec = Decoder::new();
        let mut out = Vec::new();
        let consumed = dec.feed(b"SGVsbG8gd29ybGQh=", &mut out);
        assert_eq!(out, b"Hello world!");
        assert_eq!(dec.crc(), 0xB381AE);
        assert!(dec.is_done());
        assert_eq!(consumed, b"SGVsbG8gd29ybGQh=".len());
    }

    #[test]
    fn decoder_skips_whitespace_and_flags_garbage() {
        let mut dec = Decoder::new();
        let mut out = Vec::new();
        dec.feed(b"AQ ~ ==", &mut out);
        assert_eq!(out, &[0x01]);
        assert!(dec.saw_invalid_character());
    }

    fn roundtrip(payload: Vec<u8>) -> bool {
        let mut enc = Encoder::new();
        let mut encoded = Vec::new();
        enc.push(&payload, &mut encoded);
        if let Some(tail) = enc.finish() {
            encoded.extend_from_slice(&tail);
        }
        encoded.push(b'=');

        let mut dec = Decoder::new();
        let mut decoded = Vec::new();
        dec.feed(&encoded, &mut decoded);
        decoded == payload && dec.crc() == enc.crc()
    }

    #[test]
    fn roundtrip_examples() {
        assert!(roundtrip(vec![]));
        assert!(roundtrip(vec![0]));
        assert!(roundtrip(vec![1, 2, 3]));
        assert!(roundtrip((0..=255).collect()));
    }

    quickcheck::quickcheck! {
        fn roundtrip_arbitrary(payload: Vec<u8>) -> bool {
            roundtrip(payload)
        }
    }

    #[test]
    fn encoder_bytewise_matches_bulk() {
        let payload = b"Hello world! This is a longer message to wrap.";

        let mut bulk = Encoder::new();
        let mut bulk_out = Vec::new();
        bulk.push(payload, &mut bulk_out);
        if let Some(tail) = bulk.finish() {
            bulk_out.extend_from_slice(&tail);
        }

        let mut chunked = Encoder::new();
        let mut chunked_out = Vec::new();
        for &b in payload {
            chunked.push(&[b], &mut chunked_out);
        }
        if let Some(tail) = chunked.finish() {
            chunked_out.extend_from_slice(&tail);
        }

        assert_eq!(bulk_out, chunked_out);
        assert_eq!(bulk.crc(), chunked.crc());
    }
}
