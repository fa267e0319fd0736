use std::ops::Deref;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub const COUNT: u8 = 8;

    /// Patterns outside 0..=7 are rejected when the symbol is built.
    pub const fn new(pattern: u8) -> Self {
        Self(pattern)
    }

    pub fn is_valid(self) -> bool {
        self.0 < Self::COUNT
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        (p & 1) + (p % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        ((p & 1) + (p % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let p = r as i32 * c as i32;
        (((r + c) as i32 & 1) + (p % 3)) & 1 == 0
    }
}

impl MaskPattern {
    /// Predicate over (row, col); modules where it holds are inverted.
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        debug_assert!(self.is_valid(), "Invalid pattern: {}", self.0);

        match self.0 & 0b111 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            _ => mask_functions::meadow,
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

/// Masks a copy of `base` with `mask` and scores it.
pub fn trial(base: &QR, mask: MaskPattern) -> (QR, u32) {
    let mut qr = base.clone();
    qr.apply_mask(mask);
    let pen = compute_total_penalty(&qr);
    trace!("Mask {} penalty {pen}", *mask);
    (qr, pen)
}

/// Replaces `qr` with the lowest penalty masking of it. Ties go to the lower mask index.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    #[cfg(feature = "parallel")]
    let mut trials = (0..MaskPattern::COUNT)
        .into_par_iter()
        .map(|m| trial(qr, MaskPattern(m)))
        .collect::<Vec<_>>();
    #[cfg(not(feature = "parallel"))]
    let mut trials = MaskPattern::all().map(|m| trial(qr, m)).collect::<Vec<_>>();

    let best = (0..trials.len()).min_by_key(|&i| (trials[i].1, i)).unwrap_or(0);
    *qr = trials.swap_remove(best).0;
    MaskPattern(best as u8)
}

// Penalty
//------------------------------------------------------------------------------

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr, true) + compute_adjacent_penalty(qr, false);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen = compute_finder_pattern_penalty(qr, true) + compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen + bal_pen
}

// Module color along row or column i
fn line(qr: &QR, i: i16, is_hor: bool) -> impl Iterator<Item = Color> + '_ {
    let w = qr.width() as i16;
    (0..w).map(move |j| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) })
}

// N1: 3 for a run of 5 same colored modules, plus 1 for each module beyond
fn compute_adjacent_penalty(qr: &QR, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        let mut last = None;
        let mut run = 0;
        for clr in line(qr, i, is_hor) {
            if last != Some(clr) {
                last = Some(clr);
                run = 0;
            }
            run += 1;
            match run {
                5 => pen += 3,
                6.. => pen += 1,
                _ => {}
            }
        }
    }
    pen
}

// N2: 3 for every 2x2 block of a single color, overlaps included
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// N3: 40 for every 1:1:3:1:1 dark-light-dark-light-dark run pattern with a 4 unit light
// run on either side. The area beyond the symbol counts as light.
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    let mut cnt = 0;
    let w = qr.width();
    for i in 0..w as i16 {
        let mut hist = RunHistory::new(w);
        let mut run_clr = Color::Light;
        let mut run = 0;
        for clr in line(qr, i, is_hor) {
            if clr == run_clr {
                run += 1;
                continue;
            }
            hist.push(run);
            if run_clr == Color::Light {
                cnt += hist.count_patterns();
            }
            run_clr = clr;
            run = 1;
        }
        cnt += hist.terminate(run_clr, run);
    }
    cnt * 40
}

// N4: 10 for every 5% the dark ratio strays from 50%
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark = qr.count_dark_modules();
    let w = qr.width();
    let tot = w * w;
    let dev = (dark * 20).abs_diff(tot * 10) / tot;
    dev as u32 * 10
}

// Lengths of the latest 7 runs in a line, most recent first
struct RunHistory {
    runs: [usize; 7],
    w: usize,
}

impl RunHistory {
    fn new(w: usize) -> Self {
        Self { runs: [0; 7], w }
    }

    fn push(&mut self, mut run: usize) {
        // Leading light run extends into the quiet zone
        if self.runs[0] == 0 {
            run += self.w;
        }
        self.runs.copy_within(0..6, 1);
        self.runs[0] = run;
    }

    // Checks the last 5 runs against 1:1:3:1:1, assuming runs[0] is light
    fn count_patterns(&self) -> u32 {
        let h = &self.runs;
        let n = h[1];
        let core = n > 0 && h[2] == n && h[3] == n * 3 && h[4] == n && h[5] == n;
        (core && h[0] >= n * 4 && h[6] >= n) as u32 + (core && h[6] >= n * 4 && h[0] >= n) as u32
    }

    // Closes the line with the trailing quiet zone
    fn terminate(&mut self, run_clr: Color, mut run: usize) -> u32 {
        if run_clr == Color::Dark {
            self.push(run);
            run = 0;
        }
        run += self.w;
        self.push(run);
        self.count_patterns()
    }
}
