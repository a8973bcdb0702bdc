//! Embedding of palette-indexed images.

use alloc::{boxed::Box, vec::Vec};

use crate::{
  color::ColorSpace,
  convert::build_image_object,
  error::ConvertError,
  ihdr::ImageHeader,
  image::{DecodeParams, ImageObject, ImageStream},
  parse::ConverterState,
  zlib::CompressionLevel,
};

/// Builds the image object for a color type 3 PNG.
///
/// The samples stay exactly as they are in the IDAT stream; only the color
/// space changes, wrapping the resolved base RGB space in a palette. When a
/// `tRNS` chunk is present the same encoded rows get attached a second time
/// as a soft mask whose palette maps each index to its alpha.
pub(crate) fn build_indexed_image(
  state: &ConverterState<'_>, header: &ImageHeader,
) -> Result<ImageObject, ConvertError> {
  let plte = state.plte.as_ref().ok_or(ConvertError::MissingPalette)?;
  let entries: &[[u8; 3]] =
    bytemuck::try_cast_slice(plte.data()).map_err(|_| ConvertError::PaletteNotRgbTriples)?;
  if entries.is_empty() {
    return Err(ConvertError::MissingPalette);
  }
  if entries.len() > 256 {
    return Err(ConvertError::PaletteTooLarge);
  }
  if header.bit_depth > 8 {
    return Err(ConvertError::IndexedBitDepthTooDeep);
  }
  let hival = (entries.len() - 1) as u8;

  let mut image = build_image_object(state, header, false)?;
  // the stream carries palette indexes, one sample per pixel
  if let Some(params) = image.decode_parameters_mut() {
    params.colors = 1;
  }
  let base = match image.color_space() {
    Some(space) => space.clone(),
    None => ColorSpace::DeviceRGB,
  };
  image.set_color_space(ColorSpace::Indexed {
    base: Box::new(base),
    hival,
    lookup: ImageStream::compress(plte.data(), CompressionLevel::DEFAULT),
  });

  if let Some(trns) = &state.trns {
    let mut mask = ImageObject::new(header.width, header.height, header.bit_depth);
    // the mask reuses the image's encoded rows; only the palette differs
    if let Some(stream) = image.data() {
      mask.set_compressed_data(stream.clone());
    }
    mask.set_decode_parameters(DecodeParams::png_adaptive(1, header.width, header.bit_depth));
    // indexes past the end of the transparency table are fully opaque
    let mut alphas: Vec<u8> = trns.data().to_vec();
    while alphas.len() < hival as usize + 1 {
      alphas.push(0xFF);
    }
    mask.set_color_space(ColorSpace::Indexed {
      base: Box::new(ColorSpace::DeviceGray),
      hival,
      lookup: ImageStream::compress(&alphas, CompressionLevel::DEFAULT),
    });
    image.attach_soft_mask(mask);
  }

  Ok(image)
}
