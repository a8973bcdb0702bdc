//! The top of the zero-recompression path.
//!
//! [`convert_png`] takes the raw bytes of a PNG file and produces an embedded
//! image object whose data stream is the PNG's own deflate stream, copied
//! byte for byte. The pixels are never decoded. When the PNG uses something
//! this path can't carry (interlacing, interleaved alpha, a transparent-color
//! key), the call rejects and the caller picks a different strategy.

use alloc::vec::Vec;

use crate::{
  color::{resolve_color_profile, ColorSpace},
  error::ConvertError,
  ihdr::{ColorType, ImageHeader},
  image::{DecodeParams, ImageObject, ImageStream},
  indexed::build_indexed_image,
  parse::{check_converter_state, parse_png_chunks, ConverterState},
};

/// Converts a PNG byte stream into an embedded image object without
/// recompressing the pixel data.
///
/// The full pipeline: split the buffer into chunks, verify every relevant
/// chunk's CRC, validate the header fields, then dispatch on the color type.
///
/// ## Failure
/// Any structural damage, checksum mismatch, or use of an unsupported
/// feature rejects the whole conversion; see [`ConvertError`] for the
/// catalog. A rejection never carries partial output.
pub fn convert_png(png: &[u8]) -> Result<ImageObject, ConvertError> {
  let state = parse_png_chunks(png)?;
  check_converter_state(&state)?;
  let header = ImageHeader::from_chunk(&state.ihdr)?;
  header.check_supported()?;

  match header.color_type {
    ColorType::Y => {
      if state.trns.is_some() {
        // a transparent-color key would need pixel inspection to honor
        return Err(ConvertError::TransparentColorKey);
      }
      build_image_object(&state, &header, true)
    }
    ColorType::RGB => {
      if state.trns.is_some() {
        return Err(ConvertError::TransparentColorKey);
      }
      build_image_object(&state, &header, false)
    }
    ColorType::Index => build_indexed_image(&state, &header),
    ColorType::YA | ColorType::RGBA => {
      // separating interleaved alpha would mean decoding the stream
      Err(ConvertError::AlphaColorType)
    }
  }
}

/// Builds the base image object: IDAT windows concatenated in file order,
/// decode parameters for the adaptive predictor, the base device space, and
/// whatever the profile chunks layer on top.
pub(crate) fn build_image_object(
  state: &ConverterState<'_>, header: &ImageHeader, is_gray: bool,
) -> Result<ImageObject, ConvertError> {
  // all IDAT data windows back to back are the zlib stream
  let total: usize = state.idats.iter().map(|idat| idat.length()).sum();
  let mut data: Vec<u8> = Vec::with_capacity(total);
  for idat in state.idats.iter() {
    data.extend_from_slice(idat.data());
  }

  let space = if is_gray { ColorSpace::DeviceGray } else { ColorSpace::DeviceRGB };
  let mut image = ImageObject::new(header.width, header.height, header.bit_depth);
  image.set_compressed_data(ImageStream::pre_compressed(data));
  image.set_decode_parameters(DecodeParams::png_adaptive(
    space.components(),
    header.width,
    header.bit_depth,
  ));
  image.set_color_space(space);
  resolve_color_profile(state, is_gray, &mut image)?;
  Ok(image)
}
