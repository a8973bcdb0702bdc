use crate::chunk::ChunkTy;

/// Broad classification of a [`ConvertError`].
///
/// Every rejection is terminal for the call that produced it. The caller owns
/// the decision to fall back to some other embedding strategy; nothing in this
/// crate retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
  /// The byte stream doesn't hold together as a sequence of PNG chunks.
  Structural,
  /// The chunk framing is fine but a checksum disagrees with the content.
  Integrity,
  /// The input is well-formed but uses a feature this crate deliberately
  /// doesn't handle.
  Unsupported,
}

/// An error from the `pngthru` crate.
///
/// No error ever carries partial output: when a conversion call fails, the
/// target image object was never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertError {
  /// The buffer can't even hold a signature plus IHDR framing.
  BufferTooSmall,
  /// The first chunk after the signature wasn't IHDR.
  FirstChunkNotIhdr,
  /// More than one IHDR chunk.
  DuplicateIhdr,
  /// More than one PLTE chunk.
  DuplicatePlte,
  /// More than one tRNS chunk.
  DuplicateTrns,
  /// A chunk's declared length runs past the end of the buffer.
  ChunkPastEnd,
  /// The buffer ran out before an IEND chunk appeared.
  MissingIend,
  /// Not a single IDAT chunk in the whole stream.
  NoImageData,
  /// The IHDR chunk doesn't have the 13 data bytes a header needs.
  BadIhdrLength,

  /// A chunk's stored CRC doesn't match its content.
  BadCrc(ChunkTy),

  /// Bit depth outside of {1, 2, 4, 8, 16}.
  BadBitDepth,
  /// Width or height is zero or exceeds the PNG maximum.
  BadDimensions,
  /// Compression method other than deflate (0).
  BadCompressionMethod,
  /// Filter method other than adaptive (0).
  BadFilterMethod,
  /// Interlaced images aren't converted.
  Interlaced,
  /// Color type byte that PNG doesn't define.
  UnknownColorType,
  /// Color types 4 and 6 interleave alpha with the samples, which a direct
  /// copy can't separate.
  AlphaColorType,
  /// A gray or truecolor image with a transparent-color `tRNS` key.
  TransparentColorKey,
  /// Indexed image without a PLTE chunk.
  MissingPalette,
  /// PLTE length isn't a whole number of `(r, g, b)` triples.
  PaletteNotRgbTriples,
  /// PLTE implies more than 256 entries.
  PaletteTooLarge,
  /// Indexed images are only converted up to 8 bits per sample.
  IndexedBitDepthTooDeep,
  /// An sRGB chunk that isn't exactly 1 byte.
  BadSrgbLength,
  /// A gAMA chunk that isn't exactly 4 bytes.
  BadGamaLength,
  /// A cHRM chunk that isn't exactly 32 bytes.
  BadChrmLength,
  /// A pixel layout the predictor encoder doesn't recognize.
  UnsupportedRasterLayout,
  /// The deflate compressor refused the stream.
  CompressorError,
}
impl ConvertError {
  /// Which part of the error taxonomy this error belongs to.
  #[inline]
  #[must_use]
  pub const fn kind(self) -> ErrorKind {
    use ConvertError::*;
    match self {
      BufferTooSmall | FirstChunkNotIhdr | DuplicateIhdr | DuplicatePlte | DuplicateTrns
      | ChunkPastEnd | MissingIend | NoImageData | BadIhdrLength => ErrorKind::Structural,
      BadCrc(_) => ErrorKind::Integrity,
      BadBitDepth | BadDimensions | BadCompressionMethod | BadFilterMethod | Interlaced
      | UnknownColorType | AlphaColorType | TransparentColorKey | MissingPalette
      | PaletteNotRgbTriples | PaletteTooLarge | IndexedBitDepthTooDeep | BadSrgbLength
      | BadGamaLength | BadChrmLength | UnsupportedRasterLayout | CompressorError => {
        ErrorKind::Unsupported
      }
    }
  }
}
