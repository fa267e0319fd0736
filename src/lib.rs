//! # qrsym
//!
//! A Rust library for generating QR codes, bit-exact against ISO/IEC 18004 Model 2
//! (versions 1 to 40).
//!
//! ## Features
//!
//! - **Segment encoding**: Numeric, alphanumeric, byte, kanji and ECI segments, or automatic
//!   mode selection for a whole payload
//! - **Capacity planning**: Smallest version in a configurable range, with optional raising of
//!   the error correction level while the data still fits
//! - **Reed-Solomon error correction**: ECC generation over GF(256) for levels L, M, Q and H,
//!   plus block correction
//! - **Mask selection**: All 8 masks scored by the 4 penalty rules, optionally in parallel
//!   with the `parallel` feature
//! - **Rendering**: Grayscale images and terminal text with a 4 module quiet zone
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrsym::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only data, all other settings are automatically chosen
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//!
//! let img = qr.to_image(4); // 4 pixels per module
//! assert_eq!(img.width(), (qr.width() as u32 + 8) * 4);
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrsym::{ECLevel, MaskPattern, QRBuilder, Segment, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let segments = vec![
//!     Segment::make_alphanumeric("INVOICE ")?,
//!     Segment::make_numeric("000123456789")?,
//! ];
//! let qr = QRBuilder::from_segments(segments)
//!     .min_version(Version::new(2))  // Smallest version allowed - defaults to 1
//!     .max_version(Version::new(10)) // Largest version allowed - defaults to 40
//!     .ec_level(ECLevel::M)          // Minimum error correction level - defaults to M
//!     .boost_ec_level(false)         // Keep M even if a higher level fits
//!     .mask(MaskPattern::new(3))     // Mask pattern - if not provided, lowest penalty mask
//!     .build()?;
//!
//! assert_eq!(*qr.version(), 2);
//! assert_eq!(qr.ec_level(), ECLevel::M);
//! println!("{}", qr.to_str(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! - Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module, clippy::suspicious_arithmetic_impl)]

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::bit_utils::BitStream;
pub use common::codec::{Mode, Segment};
pub use common::ec::Block;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Metadata, Version};
