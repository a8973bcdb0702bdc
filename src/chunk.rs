use core::fmt::{Debug, Write};

use crate::crc32::crc32;

/// The 4-byte type code of a PNG chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkTy(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkTy {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");
  pub const cHRM: Self = Self(*b"cHRM");
  pub const gAMA: Self = Self(*b"gAMA");
  pub const iCCP: Self = Self(*b"iCCP");
  pub const sBIT: Self = Self(*b"sBIT");
  pub const sRGB: Self = Self(*b"sRGB");
  pub const tEXt: Self = Self(*b"tEXt");
  pub const zTXt: Self = Self(*b"zTXt");
  pub const iTXt: Self = Self(*b"iTXt");
  pub const bKGD: Self = Self(*b"bKGD");
  pub const hIST: Self = Self(*b"hIST");
  pub const pHYs: Self = Self(*b"pHYs");
  pub const sPLT: Self = Self(*b"sPLT");
  pub const tIME: Self = Self(*b"tIME");
}
impl Debug for ChunkTy {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for b in self.0 {
      f.write_char(b as char)?;
    }
    Ok(())
  }
}

/// How the parser routes a chunk, one handler per kind.
///
/// Text, metadata, and time chunks are all explicitly `Meta`: they're skipped
/// without being an error. Anything the spec doesn't name lands on `Unknown`,
/// which is skipped the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub enum ChunkKind {
  IHDR,
  PLTE,
  IDAT,
  IEND,
  tRNS,
  cHRM,
  gAMA,
  iCCP,
  sBIT,
  sRGB,
  Meta,
  Unknown,
}
impl ChunkKind {
  /// Classifies a type code into the handler for it.
  #[inline]
  #[must_use]
  pub const fn classify(ty: ChunkTy) -> Self {
    match ty {
      ChunkTy::IHDR => ChunkKind::IHDR,
      ChunkTy::PLTE => ChunkKind::PLTE,
      ChunkTy::IDAT => ChunkKind::IDAT,
      ChunkTy::IEND => ChunkKind::IEND,
      ChunkTy::tRNS => ChunkKind::tRNS,
      ChunkTy::cHRM => ChunkKind::cHRM,
      ChunkTy::gAMA => ChunkKind::gAMA,
      ChunkTy::iCCP => ChunkKind::iCCP,
      ChunkTy::sBIT => ChunkKind::sBIT,
      ChunkTy::sRGB => ChunkKind::sRGB,
      ChunkTy::tEXt
      | ChunkTy::zTXt
      | ChunkTy::iTXt
      | ChunkTy::bKGD
      | ChunkTy::hIST
      | ChunkTy::pHYs
      | ChunkTy::sPLT
      | ChunkTy::tIME => ChunkKind::Meta,
      _ => ChunkKind::Unknown,
    }
  }
}

/// A chunk of a PNG datastream, addressed as a window into the source buffer.
///
/// This is a borrowed view, never a copy. It keeps the *whole* source buffer
/// plus the data window's offset and length, because verifying a chunk needs
/// the 4 type bytes that sit immediately before the data window.
///
/// A well-formed chunk has `start >= 4` (the type code precedes the data) and
/// `start + length < bytes.len()` (the CRC follows the data).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'b> {
  bytes: &'b [u8],
  ty: ChunkTy,
  start: usize,
  length: usize,
  declared_crc: u32,
}
impl Debug for Chunk<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Chunk")
      .field("ty", &self.ty)
      .field("start", &self.start)
      .field("length", &self.length)
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> Chunk<'b> {
  /// Makes a chunk view from its raw parts.
  ///
  /// No checking happens here; [`is_sane`](Self::is_sane) is what decides if
  /// the window and checksum actually hold up.
  #[inline]
  #[must_use]
  pub const fn from_parts(
    bytes: &'b [u8], ty: ChunkTy, start: usize, length: usize, declared_crc: u32,
  ) -> Self {
    Self { bytes, ty, start, length, declared_crc }
  }

  #[inline]
  #[must_use]
  pub const fn ty(&self) -> ChunkTy {
    self.ty
  }
  #[inline]
  #[must_use]
  pub const fn start(&self) -> usize {
    self.start
  }
  #[inline]
  #[must_use]
  pub const fn length(&self) -> usize {
    self.length
  }
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }

  /// The chunk's data window.
  ///
  /// An out-of-bounds window gives the empty slice rather than a panic.
  #[inline]
  #[must_use]
  pub fn data(&self) -> &'b [u8] {
    self.bytes.get(self.start..self.start.saturating_add(self.length)).unwrap_or(&[])
  }

  /// Recomputes the CRC over the type bytes and the data window.
  ///
  /// An out-of-bounds window hashes as empty rather than panicking.
  #[inline]
  #[must_use]
  pub fn compute_actual_crc(&self) -> u32 {
    let lo = self.start.saturating_sub(4);
    let hi = self.start.saturating_add(self.length);
    crc32(self.bytes.get(lo..hi).unwrap_or(&[]))
  }

  /// Checks that the chunk's window sits inside the buffer and that its CRC
  /// matches its content.
  #[must_use]
  pub fn is_sane(&self) -> bool {
    let end = match self.start.checked_add(self.length) {
      Some(end) => end,
      None => return false,
    };
    if end >= self.bytes.len() {
      return false;
    }
    if self.start < 4 {
      return false;
    }
    // The type code is covered by the CRC along with the data.
    self.compute_actual_crc() == self.declared_crc
  }
}

/// Checks a possibly-absent chunk.
///
/// A chunk that doesn't exist can't be wrong, so `None` is sane.
#[inline]
#[must_use]
pub fn check_chunk_sane(chunk: Option<&Chunk<'_>>) -> bool {
  match chunk {
    None => true,
    Some(chunk) => chunk.is_sane(),
  }
}
