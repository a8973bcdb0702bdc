//! The deflate side of the crate, wrapping `miniz_oxide`.
//!
//! Direct-copy embedding never touches this module: those bytes are already a
//! zlib stream and get carried as-is. This is for the data the crate
//! compresses itself: predictor-filtered scanlines, palette lookup tables,
//! alpha planes, and synthesized ICC profiles.

use alloc::{boxed::Box, vec::Vec};

use miniz_oxide::deflate::core::{
  compress, create_comp_flags_from_zip_params, CompressorOxide, TDEFLFlush, TDEFLStatus,
};

use crate::error::ConvertError;

/// A deflate compression level, 0 (store) through 10 (max).
///
/// This is a per-call parameter everywhere it's used. There is no process-wide
/// compression setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct CompressionLevel(u8);
impl CompressionLevel {
  pub const FASTEST: Self = Self(1);
  pub const DEFAULT: Self = Self(6);
  pub const BEST: Self = Self(10);

  /// Makes a level, clamping anything past 10 down to 10.
  #[inline]
  #[must_use]
  pub const fn new(level: u8) -> Self {
    if level > 10 {
      Self(10)
    } else {
      Self(level)
    }
  }

  #[inline]
  #[must_use]
  pub const fn level(self) -> u8 {
    self.0
  }
}
impl Default for CompressionLevel {
  #[inline]
  #[must_use]
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// One-shot zlib compression of a complete buffer.
#[inline]
#[must_use]
pub(crate) fn deflate(bytes: &[u8], level: CompressionLevel) -> Vec<u8> {
  miniz_oxide::deflate::compress_to_vec_zlib(bytes, level.level())
}

/// A streaming zlib compressor that one deflate stream spans.
///
/// The predictor encoder feeds this one filtered row at a time while the row
/// is still hot, so the whole image never has to exist as a filtered buffer.
/// Nothing is observable until [`finish`](Self::finish) returns the stream;
/// dropping the encoder on an error path discards everything cleanly.
pub(crate) struct ZlibEncoder {
  compressor: Box<CompressorOxide>,
  out: Vec<u8>,
}
impl ZlibEncoder {
  #[must_use]
  pub fn new(level: CompressionLevel) -> Self {
    // positive window bits selects the zlib wrapper
    let flags = create_comp_flags_from_zip_params(i32::from(level.level()), 15, 0);
    Self { compressor: Box::new(CompressorOxide::new(flags)), out: Vec::new() }
  }

  /// Feeds more bytes into the stream.
  pub fn write(&mut self, bytes: &[u8]) -> Result<(), ConvertError> {
    self.drive(bytes, TDEFLFlush::None)
  }

  /// Finishes the stream and hands over the compressed bytes.
  pub fn finish(mut self) -> Result<Vec<u8>, ConvertError> {
    self.drive(&[], TDEFLFlush::Finish)?;
    Ok(self.out)
  }

  fn drive(&mut self, mut input: &[u8], flush: TDEFLFlush) -> Result<(), ConvertError> {
    loop {
      // always leave real room so the compressor can make progress
      let spare = (input.len() / 2).max(64);
      let out_start = self.out.len();
      self.out.resize(out_start + spare, 0);
      let (status, bytes_in, bytes_out) =
        compress(&mut self.compressor, input, &mut self.out[out_start..], flush);
      self.out.truncate(out_start + bytes_out);
      input = &input[bytes_in..];
      match status {
        TDEFLStatus::Done => return Ok(()),
        TDEFLStatus::Okay => {
          if input.is_empty() && matches!(flush, TDEFLFlush::None) {
            return Ok(());
          }
          // out of output space, go around and grow
        }
        _ => return Err(ConvertError::CompressorError),
      }
    }
  }
}
