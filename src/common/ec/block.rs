use super::{galois::G, MAX_BLOCK_SIZE, MAX_EC_SIZE};

// Block of data codewords followed by its error correction codewords
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Block {
    pub(crate) data: [u8; MAX_BLOCK_SIZE],
    // Block length
    pub(crate) len: usize,
    // Data length
    pub(crate) dlen: usize,
}

impl Block {
    /// Computes `ec_len` Reed-Solomon codewords for `raw`.
    pub fn new(raw: &[u8], ec_len: usize) -> Self {
        let dlen = raw.len();
        let len = dlen + ec_len;
        debug_assert!(len <= MAX_BLOCK_SIZE, "Block too long: {len}");
        debug_assert!(0 < ec_len && ec_len <= MAX_EC_SIZE, "Invalid ecc length: {ec_len}");

        let mut data = [0u8; MAX_BLOCK_SIZE];
        data[..dlen].copy_from_slice(raw);
        let mut block = Self { data, len, dlen };
        block.compute_ecc();
        block
    }

    /// Wraps codewords that already carry their ecc, e.g. to be rectified.
    pub fn with_encoded(encoded: &[u8], dlen: usize) -> Self {
        let len = encoded.len();
        debug_assert!(dlen < len && len <= MAX_BLOCK_SIZE, "Invalid block: len {len}, dlen {dlen}");

        let mut data = [0u8; MAX_BLOCK_SIZE];
        data[..len].copy_from_slice(encoded);
        Self { data, len, dlen }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ec_len(&self) -> usize {
        self.len - self.dlen
    }

    pub fn data_len(&self) -> usize {
        self.dlen
    }

    pub fn full(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn full_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..self.len]
    }
}

// Ecc generator
//------------------------------------------------------------------------------

impl Block {
    // Remainder of data(x) * x^n divided by the generator polynomial of degree n, computed
    // as a shift register. Coefficients of the remainder are the ecc codewords.
    fn compute_ecc(&mut self) {
        let ec_len = self.ec_len();
        let gen = generator_poly(ec_len);

        let mut rem = [G::ZERO; MAX_EC_SIZE];
        for &b in self.data() {
            let factor = G(b) + rem[0];
            rem.copy_within(1..ec_len, 0);
            rem[ec_len - 1] = G::ZERO;
            for (r, &g) in rem[..ec_len].iter_mut().zip(gen[..ec_len].iter()) {
                *r += g * factor;
            }
        }

        for (d, r) in self.data[self.dlen..self.len].iter_mut().zip(rem.iter()) {
            *d = (*r).into();
        }
    }
}

/// Coefficients of (x - α^0)(x - α^1)...(x - α^(n-1)), highest degree first with the
/// leading 1 dropped.
pub(crate) fn generator_poly(degree: usize) -> [G; MAX_EC_SIZE] {
    debug_assert!(0 < degree && degree <= MAX_EC_SIZE, "Invalid generator degree: {degree}");

    let mut res = [G::ZERO; MAX_EC_SIZE];
    res[degree - 1] = G::ONE;
    let mut root = G::ONE;
    for _ in 0..degree {
        for j in 0..degree {
            res[j] *= root;
            if j + 1 < degree {
                let next = res[j + 1];
                res[j] += next;
            }
        }
        root *= G(2);
    }
    res
}
