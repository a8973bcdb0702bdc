//! Builds the small ICC profiles the converter synthesizes.
//!
//! When a PNG carries no profile of its own, downstream consumers decode an
//! ICC-based space faster than a CalGray/CalRGB one, so the converter prefers
//! attaching one of these deterministic minimal profiles over leaving a bare
//! device space.
//!
//! Layout follows ICC.1 version 2: a 128-byte header, a tag table, then the
//! tag data with each element aligned to 4 bytes.

use alloc::vec::Vec;

/// ICC `s15Fixed16Number`: signed 16.16 fixed point, big-endian.
#[inline]
#[must_use]
fn s15f16(x: f32) -> [u8; 4] {
  ((x * 65536.0 + 0.5) as i32).to_be_bytes()
}

/// ICC `u8Fixed8Number`: unsigned 8.8 fixed point, big-endian.
#[inline]
#[must_use]
fn u8f8(x: f32) -> [u8; 2] {
  ((x * 256.0 + 0.5) as u16).to_be_bytes()
}

/// `XYZType` tag data.
fn xyz_tag(x: f32, y: f32, z: f32) -> Vec<u8> {
  let mut out = Vec::with_capacity(20);
  out.extend_from_slice(b"XYZ ");
  out.extend_from_slice(&[0; 4]);
  out.extend_from_slice(&s15f16(x));
  out.extend_from_slice(&s15f16(y));
  out.extend_from_slice(&s15f16(z));
  out
}

/// `curveType` tag data holding a single gamma exponent.
fn gamma_curve_tag(gamma: f32) -> Vec<u8> {
  let mut out = Vec::with_capacity(14);
  out.extend_from_slice(b"curv");
  out.extend_from_slice(&[0; 4]);
  out.extend_from_slice(&1_u32.to_be_bytes());
  out.extend_from_slice(&u8f8(gamma));
  out
}

/// `textDescriptionType` tag data (the version 2 form, with its empty Unicode
/// and ScriptCode sections).
fn desc_tag(text: &str) -> Vec<u8> {
  let ascii = text.as_bytes();
  let mut out = Vec::with_capacity(90 + ascii.len() + 1);
  out.extend_from_slice(b"desc");
  out.extend_from_slice(&[0; 4]);
  out.extend_from_slice(&((ascii.len() + 1) as u32).to_be_bytes());
  out.extend_from_slice(ascii);
  out.push(0);
  // Unicode language code + count
  out.extend_from_slice(&[0; 8]);
  // ScriptCode code + count
  out.extend_from_slice(&[0; 3]);
  // fixed-size ScriptCode text area
  out.extend_from_slice(&[0; 67]);
  out
}

/// `textType` tag data.
fn text_tag(text: &str) -> Vec<u8> {
  let mut out = Vec::with_capacity(9 + text.len());
  out.extend_from_slice(b"text");
  out.extend_from_slice(&[0; 4]);
  out.extend_from_slice(text.as_bytes());
  out.push(0);
  out
}

/// D50, the profile connection space illuminant every v2 profile declares.
const PCS_ILLUMINANT: [f32; 3] = [0.9642, 1.0, 0.8249];

/// Glues a header, tag table, and tag data into one profile.
fn assemble(color_space: &[u8; 4], tags: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
  let mut header = [0_u8; 128];
  // version 2.1.0
  header[8..12].copy_from_slice(&0x0210_0000_u32.to_be_bytes());
  // display device profile of the given data color space, PCS XYZ
  header[12..16].copy_from_slice(b"mntr");
  header[16..20].copy_from_slice(color_space);
  header[20..24].copy_from_slice(b"XYZ ");
  header[36..40].copy_from_slice(b"acsp");
  // rendering intent: perceptual (0), already zero
  header[68..72].copy_from_slice(&s15f16(PCS_ILLUMINANT[0]));
  header[72..76].copy_from_slice(&s15f16(PCS_ILLUMINANT[1]));
  header[76..80].copy_from_slice(&s15f16(PCS_ILLUMINANT[2]));

  let table_len = 4 + 12 * tags.len();
  let mut offsets = Vec::with_capacity(tags.len());
  let mut data_area: Vec<u8> = Vec::new();
  for (_sig, data) in tags.iter() {
    while data_area.len() % 4 != 0 {
      data_area.push(0);
    }
    offsets.push(128 + table_len + data_area.len());
    data_area.extend_from_slice(data);
  }

  let total = 128 + table_len + data_area.len();
  let mut out = Vec::with_capacity(total);
  out.extend_from_slice(&header);
  out.extend_from_slice(&(tags.len() as u32).to_be_bytes());
  for ((sig, data), offset) in tags.iter().zip(offsets.iter()) {
    out.extend_from_slice(sig);
    out.extend_from_slice(&(*offset as u32).to_be_bytes());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  }
  out.extend_from_slice(&data_area);
  out[0..4].copy_from_slice(&(total as u32).to_be_bytes());
  out
}

/// A minimal single-channel gray profile with the given gamma.
#[must_use]
pub(crate) fn gray_profile(gamma: f32) -> Vec<u8> {
  let [wx, wy, wz] = PCS_ILLUMINANT;
  assemble(
    b"GRAY",
    &[
      (*b"desc", desc_tag("Generic gray gamma profile")),
      (*b"wtpt", xyz_tag(wx, wy, wz)),
      (*b"kTRC", gamma_curve_tag(gamma)),
      (*b"cprt", text_tag("Public domain")),
    ],
  )
}

/// A minimal sRGB-shaped RGB profile: the sRGB primaries chromatically
/// adapted to D50, with plain 2.2 gamma curves standing in for the piecewise
/// sRGB curve.
#[must_use]
pub(crate) fn srgb_profile() -> Vec<u8> {
  let [wx, wy, wz] = PCS_ILLUMINANT;
  assemble(
    b"RGB ",
    &[
      (*b"desc", desc_tag("Generic RGB profile")),
      (*b"wtpt", xyz_tag(wx, wy, wz)),
      (*b"rXYZ", xyz_tag(0.43607, 0.22249, 0.01392)),
      (*b"gXYZ", xyz_tag(0.38515, 0.71687, 0.09708)),
      (*b"bXYZ", xyz_tag(0.14307, 0.06061, 0.71410)),
      (*b"rTRC", gamma_curve_tag(2.2)),
      (*b"gTRC", gamma_curve_tag(2.2)),
      (*b"bTRC", gamma_curve_tag(2.2)),
      (*b"cprt", text_tag("Public domain")),
    ],
  )
}
