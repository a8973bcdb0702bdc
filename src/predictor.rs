//! The generic lossless path: PNG adaptive filtering over an in-memory
//! raster, deflated into one stream.
//!
//! From the PNG spec:
//!
//! > Filters are applied to **bytes**, not to pixels, regardless of the bit
//! > depth or color type of the image.
//!
//! Per scanline, all five filter candidates are computed and the one whose
//! output minimizes the sum of absolute signed byte values wins. That's the
//! heuristic the PNG spec recommends; it's an estimate, not a true
//! compressed-size measurement, and a brute-force search over all
//! 5^image-height row combinations is nobody's idea of a good time.

use alloc::vec;
use alloc::vec::Vec;

use crate::{
  color::ColorSpace,
  error::ConvertError,
  image::{DecodeParams, ImageObject, ImageStream},
  raster::RasterSource,
  zlib::{CompressionLevel, ZlibEncoder},
};

/// Per-call options for the predictor encoder.
///
/// Everything the encoder can be told is in here; there is no process-wide
/// encoder state of any kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderConfig {
  /// Deflate level for the image stream and the soft-mask stream.
  pub level: CompressionLevel,
}

/// The Paeth filter function computes a simple linear function of the three
/// neighboring bytes (left `a`, above `b`, upper left `c`) and predicts
/// whichever neighbor is closest to it, ties going `a`, then `b`, then `c`.
#[inline]
#[must_use]
const fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
  // The PNG spec says the calculation shall be performed exactly, without
  // overflow, so this is i32 math.
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Sums each byte reinterpreted as signed 8-bit and taken absolute, so a
/// residual of 255 counts as 1, not 255.
#[inline]
#[must_use]
fn signed_abs_sum(bytes: &[u8]) -> u64 {
  bytes.iter().map(|&b| u64::from((b as i8).unsigned_abs())).sum()
}

/// Losslessly encodes an in-memory raster into an embedded image object.
///
/// Every scanline is re-expressed through the best of the five PNG filters
/// and fed, marker byte first, into a single zlib stream spanning the whole
/// image. An alpha channel never lands in that stream: it's split into its
/// own 8-bit gray soft mask, flate-compressed without a predictor, and
/// attached to the result.
///
/// ## Failure
/// A source whose layout or component count the encoder doesn't recognize is
/// declined with [`ConvertError::UnsupportedRasterLayout`]; the caller owns
/// any fallback strategy.
pub fn encode_raster(
  source: &RasterSource<'_>, config: EncoderConfig,
) -> Result<ImageObject, ConvertError> {
  source.check_layout()?;

  let w = source.width as usize;
  let h = source.height as usize;
  let cc = source.color_components();
  let bytes_per_pixel = cc * source.bytes_per_component();
  let row_len = w * bytes_per_pixel;

  let mut current: Vec<u8> = vec![0; row_len];
  // the row above the first row is all zeros by definition
  let mut previous: Vec<u8> = vec![0; row_len];
  // one candidate buffer per filter type, marker byte up front
  let mut candidates: [Vec<u8>; 5] = core::array::from_fn(|f| {
    let mut row = vec![0_u8; row_len + 1];
    row[0] = f as u8;
    row
  });
  let mut alpha: Vec<u8> = if source.has_alpha() { vec![0; w * h] } else { Vec::new() };

  let mut zip = ZlibEncoder::new(config.level);
  for y in 0..h {
    let alpha_row = if source.has_alpha() { Some(&mut alpha[y * w..(y + 1) * w]) } else { None };
    source.materialize_row(y, &mut current, alpha_row);

    for i in 0..row_len {
      let x = current[i];
      let a = if i >= bytes_per_pixel { current[i - bytes_per_pixel] } else { 0 };
      let b = previous[i];
      let c = if i >= bytes_per_pixel { previous[i - bytes_per_pixel] } else { 0 };
      candidates[0][i + 1] = x;
      candidates[1][i + 1] = x.wrapping_sub(a);
      candidates[2][i + 1] = x.wrapping_sub(b);
      candidates[3][i + 1] = x.wrapping_sub(((u16::from(a) + u16::from(b)) / 2) as u8);
      candidates[4][i + 1] = x.wrapping_sub(paeth_predictor(a, b, c));
    }

    // lowest estimate wins, earliest filter type wins ties
    let mut best = 0;
    let mut best_sum = signed_abs_sum(&candidates[0][1..]);
    for (f, candidate) in candidates.iter().enumerate().skip(1) {
      let sum = signed_abs_sum(&candidate[1..]);
      if sum < best_sum {
        best = f;
        best_sum = sum;
      }
    }

    // compress the row while it's hot
    zip.write(&candidates[best])?;
    core::mem::swap(&mut current, &mut previous);
  }
  let data = zip.finish()?;

  let bits_per_component = (source.bytes_per_component() * 8) as u8;
  let mut image = ImageObject::new(source.width, source.height, bits_per_component);
  image.set_compressed_data(ImageStream::pre_compressed(data));
  image.set_decode_parameters(DecodeParams::png_adaptive(
    cc as u8,
    source.width,
    bits_per_component,
  ));
  image
    .set_color_space(if cc == 1 { ColorSpace::DeviceGray } else { ColorSpace::DeviceRGB });

  if source.has_alpha() {
    let mut mask = ImageObject::new(source.width, source.height, 8);
    mask.set_compressed_data(ImageStream::compress(&alpha, config.level));
    mask.set_color_space(ColorSpace::DeviceGray);
    image.attach_soft_mask(mask);
  }

  Ok(image)
}
