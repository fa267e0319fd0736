use super::{galois::G, Block, MAX_BLOCK_SIZE, MAX_EC_SIZE};
use crate::common::error::{QRError, QRResult};

// Rectifier
//------------------------------------------------------------------------------

impl Block {
    /// Corrects up to floor(ec_len / 2) corrupted codewords in place and returns the data
    /// codewords.
    pub fn rectify(&mut self) -> QRResult<&[u8]> {
        let synd = match self.syndromes() {
            Ok(()) => return Ok(self.data()),
            Err(s) => s,
        };

        // Error locator polynomial
        let sig = self.berlekamp_massey(&synd);
        let err_loc = self.chien_search(&sig)?;

        // Formal derivative of sigma
        let mut dsig = [G::ZERO; MAX_EC_SIZE];
        for i in (1..MAX_EC_SIZE).step_by(2) {
            dsig[i - 1] = sig[i];
        }

        let omg = self.omega(&synd, &sig);
        let err_mag = self.forney(&omg, &dsig, &err_loc)?;

        for (d, &g) in self.data[..self.len].iter_mut().zip(err_mag.iter()) {
            *d = (G(*d) + g).into();
        }

        match self.syndromes() {
            Ok(()) => Ok(self.data()),
            Err(_) => Err(QRError::TooManyError),
        }
    }

    fn syndromes(&self) -> Result<(), [G; MAX_EC_SIZE]> {
        let mut synd = [G::ZERO; MAX_EC_SIZE];
        let gdata = self.full().iter().rev().map(|&b| G(b)).collect::<Vec<_>>();
        for (i, s) in synd.iter_mut().take(self.ec_len()).enumerate() {
            *s = eval_poly(gdata.iter(), G::gen_pow(i));
        }

        if synd.iter().all(|&s| s == G::ZERO) {
            Ok(())
        } else {
            Err(synd)
        }
    }

    // Sigma polynomial
    fn berlekamp_massey(&self, synd: &[G]) -> [G; MAX_EC_SIZE] {
        let mut l = 0usize;
        let mut m = 1usize;
        let mut b = G::ONE;
        let mut cx = [G::ZERO; MAX_EC_SIZE];
        let mut bx = [G::ZERO; MAX_EC_SIZE];
        cx[0] = G::ONE;
        bx[0] = G::ONE;

        for n in 0..self.ec_len() {
            // Discrepancy
            let mut d = synd[n];
            for i in 1..=l {
                d += cx[i] * synd[n - i];
            }

            if d == G::ZERO {
                m += 1;
                continue;
            }

            let tx = cx;
            let scale = d / b;
            for i in 0..MAX_EC_SIZE - m {
                cx[i + m] += scale * bx[i];
            }

            if 2 * l <= n {
                bx = tx;
                l = n + 1 - l;
                b = d;
                m = 1;
            } else {
                m += 1;
            }
        }
        cx
    }

    // Marks codewords whose locator is a root of sigma. Fails if sigma doesn't split into
    // distinct roots inside the block.
    fn chien_search(&self, sig: &[G; MAX_EC_SIZE]) -> QRResult<[bool; MAX_BLOCK_SIZE]> {
        let deg = sig.iter().rposition(|&g| g != G::ZERO).unwrap_or(0);
        let mut err_loc = [false; MAX_BLOCK_SIZE];
        let mut found = 0;
        for (i, e) in err_loc[..self.len].iter_mut().rev().enumerate() {
            *e = eval_poly(sig.iter().take(deg + 1), G::gen_pow(255 - i)) == G::ZERO;
            found += *e as usize;
        }

        if deg == 0 || found != deg || 2 * deg > self.ec_len() {
            return Err(QRError::TooManyError);
        }
        Ok(err_loc)
    }

    // Error evaluator polynomial
    fn omega(&self, synd: &[G; MAX_EC_SIZE], sig: &[G; MAX_EC_SIZE]) -> [G; MAX_EC_SIZE] {
        let t = self.ec_len() - 1;
        let mut omg = [G::ZERO; MAX_EC_SIZE];
        for i in 0..t {
            let sy = synd[i + 1];
            for j in 0..t - i {
                omg[i + j] += sy * sig[j];
            }
        }
        omg
    }

    fn forney(
        &self,
        omg: &[G; MAX_EC_SIZE],
        dsig: &[G; MAX_EC_SIZE],
        err_loc: &[bool; MAX_BLOCK_SIZE],
    ) -> QRResult<[G; MAX_BLOCK_SIZE]> {
        let mut mag = [G::ZERO; MAX_BLOCK_SIZE];
        for (i, &is_err) in err_loc[..self.len].iter().rev().enumerate() {
            if !is_err {
                continue;
            }
            let xinv = G::gen_pow(255 - i);
            let omg_x = eval_poly(omg.iter(), xinv);
            let sig_x = eval_poly(dsig.iter(), xinv);
            if sig_x == G::ZERO {
                return Err(QRError::TooManyError);
            }
            mag[self.len - 1 - i] = omg_x / sig_x;
        }
        Ok(mag)
    }
}

// Coefficients in ascending order of degree
fn eval_poly<'a>(poly: impl Iterator<Item = &'a G>, x: G) -> G {
    let mut res = G::ZERO;
    let mut xpow = G::ONE;
    for &coeff in poly {
        res += coeff * xpow;
        xpow *= x;
    }
    res
}
