use alloc::vec::Vec;

use crate::{
  chunk::{check_chunk_sane, Chunk, ChunkKind, ChunkTy},
  error::ConvertError,
};

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// All the chunks of one PNG that matter for conversion.
///
/// Everything here is a view into the source buffer, which is only ever read
/// for the lifetime of one conversion call. The IDAT list keeps file order,
/// because concatenating the IDAT windows in order *is* the zlib stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterState<'b> {
  /// The header chunk. Always present; parsing fails without it.
  pub ihdr: Chunk<'b>,
  /// At least one, in file order.
  pub idats: Vec<Chunk<'b>>,
  pub plte: Option<Chunk<'b>>,
  pub trns: Option<Chunk<'b>>,
  pub srgb: Option<Chunk<'b>>,
  pub gama: Option<Chunk<'b>>,
  pub chrm: Option<Chunk<'b>>,
  pub iccp: Option<Chunk<'b>>,
}

#[inline]
#[must_use]
fn u32_be(bytes: &[u8]) -> u32 {
  u32::from_be_bytes(bytes.try_into().unwrap())
}

/// Splits a PNG byte buffer into the chunks the converter cares about.
///
/// * The buffer must be at least 20 bytes (signature plus IHDR framing).
/// * The first chunk must be IHDR.
/// * A second IHDR, PLTE, or tRNS is a structural error. A second sRGB, gAMA,
///   cHRM, or iCCP silently replaces the first.
/// * Parsing ends successfully at the first IEND chunk; trailing bytes after
///   it are ignored. Running out of buffer before an IEND is an error.
/// * sBIT, the text/metadata/time chunks, and unknown chunk types are
///   skipped.
///
/// Only framing is checked here. CRCs are the business of
/// [`check_converter_state`], and header field values are the planner's.
pub fn parse_png_chunks(png: &[u8]) -> Result<ConverterState<'_>, ConvertError> {
  if png.len() < 20 {
    return Err(ConvertError::BufferTooSmall);
  }

  let mut ihdr: Option<Chunk<'_>> = None;
  let mut idats: Vec<Chunk<'_>> = Vec::new();
  let mut plte: Option<Chunk<'_>> = None;
  let mut trns: Option<Chunk<'_>> = None;
  let mut srgb: Option<Chunk<'_>> = None;
  let mut gama: Option<Chunk<'_>> = None;
  let mut chrm: Option<Chunk<'_>> = None;
  let mut iccp: Option<Chunk<'_>> = None;

  // Note: the signature bytes themselves aren't checked, same as the rest of
  // the structural checks don't care what the data means. If the signature is
  // wrong then the first "chunk" almost certainly won't read as IHDR anyway.
  let mut ptr: usize = PNG_SIGNATURE.len();

  if ChunkTy(png[ptr + 4..ptr + 8].try_into().unwrap()) != ChunkTy::IHDR {
    return Err(ConvertError::FirstChunkNotIhdr);
  }

  while ptr + 12 <= png.len() {
    let length = u32_be(&png[ptr..ptr + 4]) as usize;
    let ty = ChunkTy(png[ptr + 4..ptr + 8].try_into().unwrap());
    ptr += 8;

    // data window plus the trailing CRC must fit in what's left
    if length > png.len() || ptr + length + 4 > png.len() {
      return Err(ConvertError::ChunkPastEnd);
    }
    let declared_crc = u32_be(&png[ptr + length..ptr + length + 4]);
    let chunk = Chunk::from_parts(png, ty, ptr, length, declared_crc);

    match ChunkKind::classify(ty) {
      ChunkKind::IHDR => {
        if ihdr.is_some() {
          return Err(ConvertError::DuplicateIhdr);
        }
        ihdr = Some(chunk);
      }
      ChunkKind::IDAT => idats.push(chunk),
      ChunkKind::PLTE => {
        if plte.is_some() {
          return Err(ConvertError::DuplicatePlte);
        }
        plte = Some(chunk);
      }
      ChunkKind::IEND => {
        // Done. Anything after the IEND framing is ignored.
        let ihdr = ihdr.ok_or(ConvertError::FirstChunkNotIhdr)?;
        return Ok(ConverterState { ihdr, idats, plte, trns, srgb, gama, chrm, iccp });
      }
      ChunkKind::tRNS => {
        if trns.is_some() {
          return Err(ConvertError::DuplicateTrns);
        }
        trns = Some(chunk);
      }
      ChunkKind::sRGB => srgb = Some(chunk),
      ChunkKind::gAMA => gama = Some(chunk),
      ChunkKind::cHRM => chrm = Some(chunk),
      ChunkKind::iCCP => iccp = Some(chunk),
      // sBIT doesn't block conversion on its own; the sample depth it
      // declares is still recoverable by the consumer.
      ChunkKind::sBIT => (),
      ChunkKind::Meta | ChunkKind::Unknown => (),
    }

    ptr += length + 4;
  }
  Err(ConvertError::MissingIend)
}

/// Checks that a parsed state is fit to convert: the header exists and is
/// sane, every optional chunk that exists is sane, and there's at least one
/// IDAT chunk with all of them sane.
pub fn check_converter_state(state: &ConverterState<'_>) -> Result<(), ConvertError> {
  if !state.ihdr.is_sane() {
    return Err(ConvertError::BadCrc(ChunkTy::IHDR));
  }
  for (chunk, ty) in [
    (&state.plte, ChunkTy::PLTE),
    (&state.iccp, ChunkTy::iCCP),
    (&state.trns, ChunkTy::tRNS),
    (&state.srgb, ChunkTy::sRGB),
    (&state.chrm, ChunkTy::cHRM),
    (&state.gama, ChunkTy::gAMA),
  ] {
    if !check_chunk_sane(chunk.as_ref()) {
      return Err(ConvertError::BadCrc(ty));
    }
  }
  if state.idats.is_empty() {
    return Err(ConvertError::NoImageData);
  }
  for idat in state.idats.iter() {
    if !idat.is_sane() {
      return Err(ConvertError::BadCrc(ChunkTy::IDAT));
    }
  }
  Ok(())
}
