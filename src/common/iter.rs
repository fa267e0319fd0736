use super::metadata::Version;

// Iterator over module coordinates in data placement order
//------------------------------------------------------------------------------

/// Walks two-column strips from the bottom-right corner leftwards, alternating upward and
/// downward, right column before left within a row. The vertical timing column is skipped.
/// Function modules are not filtered out.
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);

        // Columns left of the timing column are shifted so strips keep their parity
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            // Left column of an upward strip
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            // Left column of a downward strip
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            // End of the strip next to the timing column
            0 | 2 if self.c == VERT_TIMING_COL + 1 => self.c -= 2,
            _ => self.c -= 1,
        }
        Some(res)
    }
}

static VERT_TIMING_COL: i16 = 6;
