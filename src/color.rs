//! Color space descriptors and the profile resolution logic.
//!
//! The converter starts every image on a plain device space and then layers
//! whatever the PNG's profile chunks call for on top, in a fixed precedence:
//! an embedded ICC profile beats an sRGB marker, which beats gamma and
//! chromaticity data. Where an ICC-based space and a calibrated space would
//! mean the same thing, the ICC-based one wins because consumers decode it
//! faster.

use alloc::{boxed::Box, vec::Vec};

use crate::{
  error::ConvertError,
  icc,
  image::{ImageObject, ImageStream},
  parse::ConverterState,
  zlib::CompressionLevel,
  RenderingIntent,
};

/// CIE 1931 XYZ with the CCIR XA/11-recommended D65 white point.
pub const D65_WHITE_POINT: [f32; 3] = [0.9505, 1.0000, 1.0890];

/// Describes the color space of an embedded image.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpace {
  /// One component, device gray.
  DeviceGray,
  /// Three components, device RGB.
  DeviceRGB,
  /// Calibrated gray: a white point and a gamma.
  CalGray {
    /// XYZ tristimulus of the diffuse white point.
    white_point: [f32; 3],
    gamma: f32,
  },
  /// Calibrated RGB: a white point, an RGB-to-XYZ matrix in column order, and
  /// a per-channel gamma.
  CalRGB {
    white_point: [f32; 3],
    matrix: [f32; 9],
    gamma: [f32; 3],
  },
  /// A palette over some base space. Samples are indexes into the lookup
  /// table, which holds `hival + 1` entries of base-space components.
  Indexed {
    base: Box<ColorSpace>,
    /// The largest valid index value.
    hival: u8,
    /// The packed lookup table, carried flate-compressed.
    lookup: ImageStream,
  },
  /// An ICC profile stream, with the component count the consumer needs
  /// before parsing the profile.
  IccBased {
    components: u8,
    /// The profile bytes, carried flate-compressed.
    profile: ImageStream,
  },
}
impl ColorSpace {
  /// The number of components one sample of this space has.
  #[inline]
  #[must_use]
  pub fn components(&self) -> u8 {
    match self {
      ColorSpace::DeviceGray | ColorSpace::CalGray { .. } => 1,
      ColorSpace::DeviceRGB | ColorSpace::CalRGB { .. } => 3,
      ColorSpace::Indexed { .. } => 1,
      ColorSpace::IccBased { components, .. } => *components,
    }
  }
}

/// Reads one of PNG's 100000-scaled fixed point values.
#[inline]
#[must_use]
fn png_fixed(bytes: &[u8]) -> f32 {
  u32::from_be_bytes(bytes.try_into().unwrap()) as i32 as f32 / 100_000.0
}

/// Solves the CalRGB white point and transform matrix from the eight cHRM
/// chromaticity values, per the PDF CalRGB derivation.
///
/// Returns `(white_point, matrix)` with the matrix in `[XA, YA, ZA, XB, YB,
/// ZB, XC, YC, ZC]` order.
#[must_use]
fn calrgb_from_chromaticities(
  xw: f32, yw: f32, xr: f32, yr: f32, xg: f32, yg: f32, xb: f32, yb: f32,
) -> ([f32; 3], [f32; 9]) {
  // all three channels at full power define the white point
  let r = 1.0_f32;
  let g = 1.0_f32;
  let b = 1.0_f32;
  let z = yw * ((xg - xb) * yr - (xr - xb) * yg + (xr - xg) * yb);
  let ya = (yr / r) * ((xg - xb) * yw - (xw - xb) * yg + (xw - xg) * yb) / z;
  let xa = ya * xr / yr;
  let za = ya * (((1.0 - xr) / yr) - 1.0);
  let yb_ = -(yg / g) * ((xr - xb) * yw - (xw - xb) * yr + (xw - xr) * yb) / z;
  let xb_ = yb_ * xg / yg;
  let zb_ = yb_ * (((1.0 - xg) / yg) - 1.0);
  let yc = (yb / b) * ((xr - xg) * yw - (xw - xg) * yr + (xw - xr) * yg) / z;
  let xc = yc * (xb / yb);
  let zc = yc * (((1.0 - xb) / yb) - 1.0);

  let matrix = [xa, ya, za, xb_, yb_, zb_, xc, yc, zc];
  let white_point =
    [xa * r + xb_ * g + xc * b, ya * r + yb_ * g + yc * b, za * r + zb_ * g + zc * b];
  (white_point, matrix)
}

/// Layers the profile chunks of `state` onto `image`, which already carries
/// its base device space.
///
/// Chunk lengths are validated here: sRGB must be exactly 1 byte, gAMA 4,
/// cHRM 32. Anything else rejects the whole conversion.
pub(crate) fn resolve_color_profile(
  state: &ConverterState<'_>, is_gray: bool, image: &mut ImageObject,
) -> Result<(), ConvertError> {
  let mut gamma = 1.0_f32;
  if let Some(gama) = &state.gama {
    let data = gama.data();
    if data.len() != 4 {
      return Err(ConvertError::BadGamaLength);
    }
    gamma = 1.0 / png_fixed(data);
  }

  if is_gray && gamma != 1.0 {
    image.set_color_space(ColorSpace::CalGray { white_point: D65_WHITE_POINT, gamma });
  }

  if let Some(srgb) = &state.srgb {
    let data = srgb.data();
    if data.len() != 1 {
      return Err(ConvertError::BadSrgbLength);
    }
    // an out-of-range intent byte records no intent at all
    if let Some(intent) = RenderingIntent::from_byte(data[0]) {
      image.set_rendering_intent(intent);
    }
    gamma = 2.2;
  }

  if state.srgb.is_none() && state.iccp.is_none() {
    if let Some(chrm) = &state.chrm {
      let data = chrm.data();
      if data.len() != 32 {
        return Err(ConvertError::BadChrmLength);
      }
      let xw = png_fixed(&data[0..4]);
      let yw = png_fixed(&data[4..8]);
      let xr = png_fixed(&data[8..12]);
      let yr = png_fixed(&data[12..16]);
      let xg = png_fixed(&data[16..20]);
      let yg = png_fixed(&data[20..24]);
      let xb = png_fixed(&data[24..28]);
      let yb = png_fixed(&data[28..32]);
      let (white_point, matrix) = calrgb_from_chromaticities(xw, yw, xr, yr, xg, yg, xb, yb);
      if !is_gray {
        image.set_color_space(ColorSpace::CalRGB {
          white_point,
          matrix,
          gamma: [gamma, gamma, gamma],
        });
      }
    }
  }

  // ICC-based spaces decode faster in consumers, so prefer one whenever the
  // input has a profile, claims sRGB, or is gray with nothing better to say.
  if state.iccp.is_some() || state.srgb.is_some() || (is_gray && state.gama.is_none()) {
    let components = if is_gray { 1 } else { 3 };
    let profile: Vec<u8> = match &state.iccp {
      Some(iccp) => iccp.data().to_vec(),
      None => {
        if is_gray {
          icc::gray_profile(gamma)
        } else {
          icc::srgb_profile()
        }
      }
    };
    image.set_color_space(ColorSpace::IccBased {
      components,
      profile: ImageStream::compress(&profile, CompressionLevel::DEFAULT),
    });
  }
  Ok(())
}
