pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use tracing::{debug, trace};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::Segment;
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    /// Smallest version in `min..=max` that holds the segments, along with the bits they use.
    pub fn find_version(
        segs: &[Segment],
        ecl: ECLevel,
        min: Version,
        max: Version,
    ) -> QRResult<(Version, usize)> {
        debug_assert!(min.is_valid() && max.is_valid() && min <= max, "Invalid version range");

        for v in *min..=*max {
            let ver = Version::new(v);
            let bcap = ver.data_bit_capacity(ecl);
            match Segment::total_bits(segs, ver) {
                Some(sz) if sz <= bcap => {
                    debug!("Version {ver} fits {sz} of {bcap} bits at ec level {ecl:?}");
                    return Ok((ver, sz));
                }
                sz => trace!("Version {ver} rejected: {sz:?} bits, capacity {bcap}"),
            }
        }
        Err(QRError::DataTooLong)
    }

    /// Strongest ec level, not weaker than `ecl`, that still holds `used_bits` at `ver`.
    pub fn boost_ec_level(used_bits: usize, ver: Version, ecl: ECLevel) -> ECLevel {
        ECLevel::ALL
            .into_iter()
            .filter(|&l| l >= ecl && used_bits <= ver.data_bit_capacity(l))
            .max()
            .unwrap_or(ecl)
    }

    /// Data codewords for the version & ec level, terminated and padded to full capacity.
    pub fn encode_segments(segs: &[Segment], ver: Version, ecl: ECLevel) -> BitStream {
        let bcap = ver.data_bit_capacity(ecl);
        let mut bs = BitStream::new(bcap);
        for seg in segs {
            push_segment(seg, ver, &mut bs);
        }
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);

        debug_assert!(bs.len() == bcap, "Bit stream {} doesn't fill capacity {bcap}", bs.len());
        bs
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::Segment;
    use crate::common::metadata::Version;

    pub fn push_segment(seg: &Segment, ver: Version, out: &mut BitStream) {
        push_header(seg, ver, out);
        out.append(seg.data());
    }

    fn push_header(seg: &Segment, ver: Version, out: &mut BitStream) {
        out.push_bits(seg.mode() as u8, ver.mode_bits());
        let len_bits = ver.char_cnt_bits(seg.mode());
        let char_cnt = seg.num_chars();
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(char_cnt as u16, len_bits);
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0u8, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(
            offset == 0,
            "Bit offset should be zero before padding codewords: {}",
            offset
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        let padding =
            PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).collect::<Vec<_>>();
        out.extend(&padding);
    }


    // Global constants
    //------------------------------------------------------------------------------

    pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
}
