use crate::{chunk::Chunk, error::ConvertError};

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl ColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }
}
impl TryFrom<u8> for ColorType {
  type Error = ConvertError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => ColorType::Y,
      2 => ColorType::RGB,
      3 => ColorType::Index,
      4 => ColorType::YA,
      6 => ColorType::RGBA,
      _ => return Err(ConvertError::UnknownColorType),
    })
  }
}

/// The parsed fields of an IHDR chunk.
///
/// Parsing a header and deciding if it describes something this crate can
/// convert are separate steps: [`from_chunk`](Self::from_chunk) only needs
/// the 13 bytes to be present and the color type byte to mean something,
/// while [`check_supported`](Self::check_supported) is where the conversion
/// planner enforces its limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per sample
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: ColorType,
  /// 0 is deflate, the only defined value
  pub compression_method: u8,
  /// 0 is adaptive filtering, the only defined value
  pub filter_method: u8,
  /// 0 is not interlaced, 1 is Adam7
  pub interlace_method: u8,
}
impl ImageHeader {
  /// The PNG spec caps dimensions at `2^31 - 1`.
  pub const MAX_DIMENSION: u32 = 0x7FFF_FFFF;

  /// Parses the header fields out of an IHDR chunk's data window.
  pub fn from_chunk(chunk: &Chunk<'_>) -> Result<Self, ConvertError> {
    let data = chunk.data();
    if data.len() != 13 {
      return Err(ConvertError::BadIhdrLength);
    }
    Ok(Self {
      width: u32::from_be_bytes(data[0..4].try_into().unwrap()),
      height: u32::from_be_bytes(data[4..8].try_into().unwrap()),
      bit_depth: data[8],
      color_type: ColorType::try_from(data[9])?,
      compression_method: data[10],
      filter_method: data[11],
      interlace_method: data[12],
    })
  }

  /// Checks every header field the converter insists on.
  ///
  /// Color type is *not* checked here; the planner dispatches on it and has
  /// its own rejections for the alpha types.
  pub fn check_supported(&self) -> Result<(), ConvertError> {
    if !matches!(self.bit_depth, 1 | 2 | 4 | 8 | 16) {
      return Err(ConvertError::BadBitDepth);
    }
    if self.width == 0 || self.height == 0 {
      return Err(ConvertError::BadDimensions);
    }
    if self.width > Self::MAX_DIMENSION || self.height > Self::MAX_DIMENSION {
      return Err(ConvertError::BadDimensions);
    }
    if self.compression_method != 0 {
      return Err(ConvertError::BadCompressionMethod);
    }
    if self.filter_method != 0 {
      return Err(ConvertError::BadFilterMethod);
    }
    if self.interlace_method != 0 {
      return Err(ConvertError::Interlaced);
    }
    Ok(())
  }
}
