use encoding_rs::SHIFT_JIS;

use crate::common::bit_utils::BitStream;
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
    Eci = 0b0111,
}

impl Mode {
    /// Width of the character count field for versions 1-9, 10-26 and 27-40.
    pub fn char_cnt_bits(self) -> [usize; 3] {
        match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
            Self::Kanji => [8, 10, 12],
            Self::Eci => [0, 0, 0],
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                data[0] as u16
            }
            Self::Kanji => {
                debug_assert!(len == 2, "Kanji chunk must be a double byte: {len}");
                let sjw = (data[0] as u16) << 8 | data[1] as u16;
                let off = if sjw <= 0x9FFC { sjw - 0x8140 } else { sjw - 0xC140 };
                (off >> 8) * 0xC0 + (off & 0xFF)
            }
            Self::Eci => unreachable!("Cannot encode characters in ECI mode"),
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
            Self::Kanji | Self::Eci => false,
        }
    }

    /// Encoded bit length of `len` characters, excluding mode and count headers.
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji => len * 13,
            Self::Eci => unreachable!("ECI length depends on the designator value"),
        }
    }
}


// Segment
//------------------------------------------------------------------------------

/// A run of payload encoded in a single mode. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    mode: Mode,
    // Characters for numeric, alphanumeric & kanji, bytes for byte mode, 0 for ECI
    num_chars: usize,
    data: BitStream,
}

impl Segment {
    /// Builds a segment from already encoded bits. `num_chars` must agree with the mode.
    pub fn new(mode: Mode, num_chars: usize, data: BitStream) -> Self {
        Self { mode, num_chars, data }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.num_chars
    }

    pub fn data(&self) -> &BitStream {
        &self.data
    }

    pub fn make_numeric(text: &str) -> QRResult<Self> {
        if !Self::is_numeric(text) {
            return Err(QRError::InvalidChar);
        }
        Ok(Self::chunked(Mode::Numeric, text.as_bytes(), 3))
    }

    pub fn make_alphanumeric(text: &str) -> QRResult<Self> {
        if !Self::is_alphanumeric(text) {
            return Err(QRError::InvalidChar);
        }
        Ok(Self::chunked(Mode::Alphanumeric, text.as_bytes(), 2))
    }

    pub fn make_bytes(data: &[u8]) -> Self {
        Self::chunked(Mode::Byte, data, 1)
    }

    /// Encodes text as Shift JIS double byte characters.
    pub fn make_kanji(text: &str) -> QRResult<Self> {
        let (sjis, _, had_errors) = SHIFT_JIS.encode(text);
        if had_errors || sjis.len() & 1 == 1 {
            return Err(QRError::InvalidChar);
        }
        let is_kanji = |c: &[u8]| {
            let sjw = (c[0] as u16) << 8 | c[1] as u16;
            matches!(sjw, 0x8140..=0x9FFC | 0xE040..=0xEBBF) && c[1] >= 0x40
        };
        if !sjis.chunks_exact(2).all(is_kanji) {
            return Err(QRError::InvalidChar);
        }
        Ok(Self::chunked(Mode::Kanji, &sjis, 2))
    }

    /// Extended Channel Interpretation designator.
    pub fn make_eci(assign_val: u32) -> QRResult<Self> {
        let mut bs = BitStream::new(24);
        match assign_val {
            0..=0x7F => bs.push_bits(assign_val, 8),
            0x80..=0x3FFF => {
                bs.push_bits(0b10u8, 2);
                bs.push_bits(assign_val, 14);
            }
            0x4000..=999_999 => {
                bs.push_bits(0b110u8, 3);
                bs.push_bits(assign_val, 21);
            }
            _ => return Err(QRError::InvalidEci),
        }
        Ok(Self::new(Mode::Eci, 0, bs))
    }

    /// Picks the single most compact mode for the whole text. Empty text yields no segments.
    pub fn make_segments(text: &str) -> Vec<Self> {
        Self::auto(text.as_bytes())
    }

    pub(crate) fn auto(data: &[u8]) -> Vec<Self> {
        if data.is_empty() {
            vec![]
        } else if data.iter().all(|&b| Mode::Numeric.contains(b)) {
            vec![Self::chunked(Mode::Numeric, data, 3)]
        } else if data.iter().all(|&b| Mode::Alphanumeric.contains(b)) {
            vec![Self::chunked(Mode::Alphanumeric, data, 2)]
        } else {
            vec![Self::make_bytes(data)]
        }
    }

    pub fn is_numeric(text: &str) -> bool {
        text.bytes().all(|b| Mode::Numeric.contains(b))
    }

    pub fn is_alphanumeric(text: &str) -> bool {
        text.bytes().all(|b| Mode::Alphanumeric.contains(b))
    }

    // Caller guarantees every byte is valid for the mode
    fn chunked(mode: Mode, data: &[u8], chunk_size: usize) -> Self {
        let num_chars = if mode == Mode::Kanji { data.len() / 2 } else { data.len() };
        let bit_len = mode.encoded_len(num_chars);
        let mut bs = BitStream::new(bit_len);
        for chunk in data.chunks(chunk_size) {
            let size = match mode {
                Mode::Kanji => 13,
                _ => mode.encoded_len(chunk.len()),
            };
            bs.push_bits(mode.encode_chunk(chunk), size);
        }
        debug_assert!(bs.len() == bit_len, "Encoded {} bits, expected {bit_len}", bs.len());
        Self::new(mode, num_chars, bs)
    }

    /// Bits needed by the segment at the given version, or `None` if the character count
    /// overflows the count field.
    pub fn bit_len(&self, version: Version) -> Option<usize> {
        let len_bits = version.char_cnt_bits(self.mode);
        if self.num_chars >= 1 << len_bits {
            return None;
        }
        Some(version.mode_bits() + len_bits + self.data.len())
    }

    pub fn total_bits(segs: &[Self], version: Version) -> Option<usize> {
        segs.iter().try_fold(0usize, |acc, s| acc.checked_add(s.bit_len(version)?))
    }
}
