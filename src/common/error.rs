use std::fmt::{Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Segment construction
    InvalidChar,
    InvalidEci,

    // Capacity planning
    DataTooLong,

    // Builder configuration
    InvalidVersion,
    InvalidMaskingPattern,

    // Reed-Solomon correction
    TooManyError,
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let msg = match *self {
            Self::InvalidChar => "Invalid character for segment mode",
            Self::InvalidEci => "ECI designator out of range",
            Self::DataTooLong => "Data too long",
            Self::InvalidVersion => "Invalid version range",
            Self::InvalidMaskingPattern => "Invalid masking pattern",
            Self::TooManyError => "Too many errors to correct successfully",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
