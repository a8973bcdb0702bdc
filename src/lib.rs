#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(docs_rs, feature(doc_cfg))]

//! A crate for embedding PNG image data into document image objects.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! There are two ways in:
//!
//! * [`convert_png`](convert::convert_png) takes the raw bytes of a PNG file
//!   and maps them onto an [`ImageObject`](image::ImageObject) *without
//!   decoding the pixels*. The PNG's own deflate stream is copied through
//!   unchanged and the consumer gets decode parameters telling it how to
//!   reverse the adaptive filtering itself. Structural damage, checksum
//!   failures, and features that can't be carried this way (interlacing,
//!   interleaved alpha, transparent-color keys) all reject the call.
//! * [`encode_raster`](predictor::encode_raster) takes an arbitrary
//!   in-memory pixel buffer, runs the PNG scanline predictor over it, and
//!   deflates the result into a fresh stream. This is the path for images
//!   that never were PNG bytes to begin with.
//!
//! Both paths are pure computation over in-memory buffers: single-threaded,
//! no global state, and every rejection is terminal for that call. Callers
//! keep their own fallback (decode fully, then re-encode) for inputs this
//! crate declines.
//!
//! The crate is `no_std` but requires `alloc`.

extern crate alloc;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub mod chunk;
pub use chunk::*;

pub mod crc32;
pub use crc32::*;

pub mod error;
pub use error::*;

pub mod ihdr;
pub use ihdr::*;

pub mod parse;
pub use parse::*;

pub mod color;
pub use color::*;

mod icc;

pub mod image;
pub use image::*;

mod indexed;

pub mod convert;
pub use convert::*;

pub mod zlib;
pub use zlib::CompressionLevel;

pub mod raster;
pub use raster::*;

pub mod predictor;
pub use predictor::*;

/// How a color-managed consumer should map the image's colors to the output
/// device, as defined by the International Color Consortium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderingIntent {
  /// for images preferring good adaptation to the output device gamut at the
  /// expense of colorimetric accuracy, such as photographs.
  Perceptual,
  /// for images requiring colour appearance matching (relative to the output
  /// device white point), such as logos.
  RelativeColorimetric,
  /// for images preferring preservation of saturation at the expense of hue
  /// and lightness, such as charts and graphs.
  Saturation,
  /// for images requiring preservation of absolute colorimetry, such as
  /// previews of images destined for a different output device (proofs).
  AbsoluteColorimetric,
}
impl RenderingIntent {
  /// Maps an sRGB chunk's intent byte.
  ///
  /// Only 0 through 3 mean anything; any other value gives `None` and the
  /// image simply carries no intent.
  #[inline]
  #[must_use]
  pub const fn from_byte(byte: u8) -> Option<Self> {
    match byte {
      0 => Some(RenderingIntent::Perceptual),
      1 => Some(RenderingIntent::RelativeColorimetric),
      2 => Some(RenderingIntent::Saturation),
      3 => Some(RenderingIntent::AbsoluteColorimetric),
      _ => None,
    }
  }
}
