//! The in-memory carrier for an embedded image object.
//!
//! The surrounding document model owns the persisted representation; this
//! crate only performs the operations: set the compressed data, the decode
//! parameters, the color space, the rendering intent, and optionally attach a
//! soft mask. [`ImageObject`] records exactly those calls and nothing else.

use alloc::{boxed::Box, vec::Vec};

use crate::{color::ColorSpace, zlib, zlib::CompressionLevel, RenderingIntent};

/// The stream filter an [`ImageStream`]'s bytes are encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StreamFilter {
  /// zlib/deflate
  Flate,
}

/// A filtered byte stream destined for the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStream {
  bytes: Vec<u8>,
  filter: StreamFilter,
}
impl ImageStream {
  /// Wraps bytes that are already a complete zlib stream.
  ///
  /// This is the zero-recompression path: concatenated IDAT windows and the
  /// predictor encoder's output both arrive here unchanged.
  #[inline]
  #[must_use]
  pub const fn pre_compressed(bytes: Vec<u8>) -> Self {
    Self { bytes, filter: StreamFilter::Flate }
  }

  /// Compresses raw bytes into a new flate stream.
  #[inline]
  #[must_use]
  pub fn compress(raw: &[u8], level: CompressionLevel) -> Self {
    Self { bytes: zlib::deflate(raw, level), filter: StreamFilter::Flate }
  }

  /// The encoded bytes.
  #[inline]
  #[must_use]
  pub fn bytes(&self) -> &[u8] {
    &self.bytes
  }

  #[inline]
  #[must_use]
  pub const fn filter(&self) -> StreamFilter {
    self.filter
  }
}

/// The decode parameters that let a consumer reverse the adaptive filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeParams {
  /// 15 means "PNG adaptive, per-row choice".
  pub predictor: u8,
  /// Samples per pixel in the filtered stream.
  pub colors: u8,
  /// Pixels per row.
  pub columns: u32,
  /// Bits in one sample.
  pub bits_per_component: u8,
}
impl DecodeParams {
  /// Parameters for a stream filtered with the PNG adaptive predictor.
  #[inline]
  #[must_use]
  pub const fn png_adaptive(colors: u8, columns: u32, bits_per_component: u8) -> Self {
    Self { predictor: 15, colors, columns, bits_per_component }
  }
}

/// An embedded image object under construction.
///
/// Built fresh by each conversion call and handed to the caller complete; a
/// rejected conversion never returns one, so no partially-mutated object can
/// escape.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageObject {
  width: u32,
  height: u32,
  bits_per_component: u8,
  data: Option<ImageStream>,
  decode_params: Option<DecodeParams>,
  color_space: Option<ColorSpace>,
  soft_mask: Option<Box<ImageObject>>,
  rendering_intent: Option<RenderingIntent>,
}
impl ImageObject {
  #[inline]
  #[must_use]
  pub const fn new(width: u32, height: u32, bits_per_component: u8) -> Self {
    Self {
      width,
      height,
      bits_per_component,
      data: None,
      decode_params: None,
      color_space: None,
      soft_mask: None,
      rendering_intent: None,
    }
  }

  #[inline]
  pub fn set_compressed_data(&mut self, stream: ImageStream) {
    self.data = Some(stream);
  }
  #[inline]
  pub fn set_decode_parameters(&mut self, params: DecodeParams) {
    self.decode_params = Some(params);
  }
  #[inline]
  pub fn set_color_space(&mut self, space: ColorSpace) {
    self.color_space = Some(space);
  }
  #[inline]
  pub fn attach_soft_mask(&mut self, mask: ImageObject) {
    self.soft_mask = Some(Box::new(mask));
  }
  #[inline]
  pub fn set_rendering_intent(&mut self, intent: RenderingIntent) {
    self.rendering_intent = Some(intent);
  }

  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }
  #[inline]
  #[must_use]
  pub const fn bits_per_component(&self) -> u8 {
    self.bits_per_component
  }
  #[inline]
  #[must_use]
  pub fn data(&self) -> Option<&ImageStream> {
    self.data.as_ref()
  }
  #[inline]
  #[must_use]
  pub fn decode_parameters(&self) -> Option<&DecodeParams> {
    self.decode_params.as_ref()
  }
  #[inline]
  #[must_use]
  pub fn decode_parameters_mut(&mut self) -> Option<&mut DecodeParams> {
    self.decode_params.as_mut()
  }
  #[inline]
  #[must_use]
  pub fn color_space(&self) -> Option<&ColorSpace> {
    self.color_space.as_ref()
  }
  #[inline]
  #[must_use]
  pub fn soft_mask(&self) -> Option<&ImageObject> {
    self.soft_mask.as_deref()
  }
  #[inline]
  #[must_use]
  pub fn rendering_intent(&self) -> Option<RenderingIntent> {
    self.rendering_intent
  }
}
