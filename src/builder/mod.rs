mod qr;

pub use qr::{Module, QR};

use std::ops::Deref;

use tracing::debug;

use crate::common::{
    codec::{boost_ec_level, encode_segments, find_version, Segment},
    ec::Block,
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

/// Configures and builds a [`QR`] symbol.
///
/// ```
/// use qrsym::{ECLevel, QRBuilder};
///
/// let qr = QRBuilder::new(b"Hello, world!").ec_level(ECLevel::L).build().unwrap();
/// assert_eq!(*qr.version(), 1);
/// // Raised as far as the payload allows
/// assert_eq!(qr.ec_level(), ECLevel::M);
/// ```
#[derive(Debug, Clone)]
pub struct QRBuilder {
    segments: Vec<Segment>,
    min_version: Version,
    max_version: Version,
    ec_level: ECLevel,
    boost_ec_level: bool,
    mask: Option<MaskPattern>,
}

impl QRBuilder {
    /// Picks numeric, alphanumeric or byte mode for the whole payload, whichever is most
    /// compact.
    pub fn new(data: &[u8]) -> Self {
        Self::from_segments(Segment::auto(data))
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            min_version: Version::MIN,
            max_version: Version::MAX,
            ec_level: ECLevel::M,
            boost_ec_level: true,
            mask: None,
        }
    }

    pub fn data(&mut self, data: &[u8]) -> &mut Self {
        self.segments = Segment::auto(data);
        self
    }

    pub fn segments(&mut self, segments: Vec<Segment>) -> &mut Self {
        self.segments = segments;
        self
    }

    /// Pins the symbol to a single version.
    pub fn version(&mut self, version: Version) -> &mut Self {
        self.min_version = version;
        self.max_version = version;
        self
    }

    pub fn min_version(&mut self, version: Version) -> &mut Self {
        self.min_version = version;
        self
    }

    pub fn max_version(&mut self, version: Version) -> &mut Self {
        self.max_version = version;
        self
    }

    /// Minimum error correction level. It may be raised when `boost_ec_level` is set.
    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn boost_ec_level(&mut self, boost: bool) -> &mut Self {
        self.boost_ec_level = boost;
        self
    }

    /// Skips the mask search in favor of `mask`.
    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let mask = match self.mask {
            Some(m) => (*m).to_string(),
            None => "Auto".to_string(),
        };
        format!(
            "{{ Version: {}..={}, Ec level: {:?}, Boost: {}, Mask: {} }}",
            self.min_version, self.max_version, self.ec_level, self.boost_ec_level, mask
        )
    }
}

#[cfg(test)]
mod qrbuilder_util_tests {
    use super::QRBuilder;
    use crate::common::{ECLevel, MaskPattern, Version};

    #[test]
    fn test_metadata() {
        let mut qr_builder = QRBuilder::new(b"Hello, world!");
        qr_builder.version(Version::new(1)).ec_level(ECLevel::L).boost_ec_level(false);
        assert_eq!(qr_builder.metadata(), "{ Version: 1..=1, Ec level: L, Boost: false, Mask: Auto }");
        qr_builder.min_version(Version::MIN).max_version(Version::new(9)).mask(MaskPattern::new(3));
        assert_eq!(qr_builder.metadata(), "{ Version: 1..=9, Ec level: L, Boost: false, Mask: 3 }");
        qr_builder.unset_mask();
        assert_eq!(qr_builder.metadata(), "{ Version: 1..=9, Ec level: L, Boost: false, Mask: Auto }");
    }
}

impl QRBuilder {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());

        let (min, max) = (self.min_version, self.max_version);
        if !min.is_valid() || !max.is_valid() || min > max {
            return Err(QRError::InvalidVersion);
        }
        if self.mask.is_some_and(|m| !m.is_valid()) {
            return Err(QRError::InvalidMaskingPattern);
        }

        debug!("Finding best version...");
        let (version, used_bits) = find_version(&self.segments, self.ec_level, min, max)?;
        let ec_level = if self.boost_ec_level {
            boost_ec_level(used_bits, version, self.ec_level)
        } else {
            self.ec_level
        };

        debug!("Encoding data...");
        let encoded_data = encode_segments(&self.segments, version, ec_level);
        let data_len = version.data_codewords(ec_level);

        debug!("Constructing payload with ecc & interleaving...");
        let (data_blocks, ecc_blocks) = Self::compute_ecc(encoded_data.data(), version, ec_level);
        let mut payload = Self::interleave(&data_blocks);
        payload.extend(Self::interleave(&ecc_blocks));

        debug!("Drawing function patterns & payload...");
        let mut qr = QR::new(version, ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload);

        let mask = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                m
            }
            None => {
                debug!("Finding best mask...");
                apply_best_mask(&mut qr)
            }
        };

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        debug!("QR generated: {}", qr.metadata());
        debug!(
            "Data capacity: {data_len}, Used: {}, Error capacity: {}, Mask: {}",
            used_bits.div_ceil(8),
            Self::ec_capacity(version, ec_level),
            *mask
        );
        debug!(
            "Dark cells: {dark_modules}, Light cells: {}, Balance: {}%",
            total_modules - dark_modules,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }

    // ECC: Error Correction Codeword generator
    fn compute_ecc(data: &[u8], version: Version, ec_level: ECLevel) -> (Vec<&[u8]>, Vec<Vec<u8>>) {
        let data_blocks = Self::blockify(data, version, ec_level);

        let ecc_size_per_block = version.ecc_per_block(ec_level);
        let ecc_blocks = data_blocks
            .iter()
            .map(|b| Block::new(b, ecc_size_per_block).ecc().to_vec())
            .collect::<Vec<_>>();

        (data_blocks, ecc_blocks)
    }

    /// Splits data codewords into short blocks followed by long blocks.
    pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
        let (block1_size, block1_count, block2_size, block2_count) =
            version.data_codewords_per_block(ec_level);

        let total_blocks = block1_count + block2_count;
        let total_block1_size = block1_size * block1_count;
        let total_size = total_block1_size + block2_size * block2_count;

        debug_assert!(
            total_size == data.len(),
            "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
            data.len(),
            total_size
        );

        let mut data_blocks = Vec::with_capacity(total_blocks);
        data_blocks.extend(data[..total_block1_size].chunks(block1_size));
        if block2_size > 0 {
            data_blocks.extend(data[total_block1_size..].chunks(block2_size));
        }
        data_blocks
    }

    /// Number of codewords the symbol can lose and still be read. Small symbols reserve a
    /// few ecc codewords against misdecoding.
    pub(crate) fn ec_capacity(version: Version, ec_level: ECLevel) -> usize {
        let p = match (*version, ec_level) {
            (1, ECLevel::L) => 3,
            (2, ECLevel::L) | (1, ECLevel::M) => 2,
            (1, _) | (3, ECLevel::L) => 1,
            _ => 0,
        };

        let ec_bytes = version.block_count(ec_level) * version.ecc_per_block(ec_level);
        (ec_bytes - p) / 2
    }

    /// Takes codeword i of every block that has one, for i = 0, 1, ...
    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}
