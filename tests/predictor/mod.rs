//! Tests for the generic lossless path: encode a raster, then decode the
//! produced stream with a reference unfilterer and compare pixels.

use pngthru::*;

fn inflate(bytes: &[u8]) -> Vec<u8> {
  miniz_oxide::inflate::decompress_to_vec_zlib(bytes).unwrap()
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
  let (a_, b_, c_) = (i32::from(a), i32::from(b), i32::from(c));
  let p = a_ + b_ - c_;
  let (pa, pb, pc) = ((p - a_).abs(), (p - b_).abs(), (p - c_).abs());
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reference unfilter: walks the marker-prefixed scanlines of a decompressed
/// stream and reconstructs the raw bytes.
fn unfilter(data: &[u8], width: usize, height: usize, bytes_per_pixel: usize) -> Vec<u8> {
  let row_len = width * bytes_per_pixel;
  let stride = row_len + 1;
  assert_eq!(data.len(), stride * height, "stream length mismatch");
  let mut out = Vec::with_capacity(row_len * height);
  let mut prev = vec![0_u8; row_len];
  for y in 0..height {
    let filter = data[y * stride];
    let row = &data[y * stride + 1..(y + 1) * stride];
    let mut recon = row.to_vec();
    for i in 0..row_len {
      let a = if i >= bytes_per_pixel { recon[i - bytes_per_pixel] } else { 0 };
      let b = prev[i];
      let c = if i >= bytes_per_pixel { prev[i - bytes_per_pixel] } else { 0 };
      recon[i] = match filter {
        0 => recon[i],
        1 => recon[i].wrapping_add(a),
        2 => recon[i].wrapping_add(b),
        3 => recon[i].wrapping_add(((u16::from(a) + u16::from(b)) / 2) as u8),
        4 => recon[i].wrapping_add(paeth(a, b, c)),
        other => panic!("illegal filter type {other}"),
      };
    }
    out.extend_from_slice(&recon);
    prev = recon;
  }
  out
}

fn decode_image(image: &ImageObject) -> Vec<u8> {
  let params = image.decode_parameters().unwrap();
  assert_eq!(params.predictor, 15);
  let bytes_per_pixel = params.colors as usize * (params.bits_per_component as usize / 8);
  let stream = inflate(image.data().unwrap().bytes());
  unfilter(&stream, params.columns as usize, image.height() as usize, bytes_per_pixel)
}

#[test]
fn test_gray_bytes_roundtrip() {
  let mut pixels = [0_u8; 64];
  for (i, p) in pixels.iter_mut().enumerate() {
    *p = (i as u8).wrapping_mul(13);
  }
  let source = RasterSource {
    width: 8,
    height: 8,
    rows: RasterRows::ByteTuples { data: &pixels, components: 1, has_alpha: false },
  };
  let image = encode_raster(&source, EncoderConfig::default()).unwrap();
  assert_eq!(image.bits_per_component(), 8);
  assert_eq!(image.color_space(), Some(&ColorSpace::DeviceGray));
  assert!(image.soft_mask().is_none());
  assert_eq!(decode_image(&image), pixels);
}

#[test]
fn test_rgb_bytes_with_alpha_split() {
  #[rustfmt::skip]
  let pixels = [
    10, 20, 30, 255,   40, 50, 60, 128,
    70, 80, 90, 0,     15, 25, 35, 77,
  ];
  let source = RasterSource {
    width: 2,
    height: 2,
    rows: RasterRows::ByteTuples { data: &pixels, components: 4, has_alpha: true },
  };
  let image = encode_raster(&source, EncoderConfig::default()).unwrap();
  // alpha never lands in the main stream
  assert_eq!(image.decode_parameters().unwrap().colors, 3);
  assert_eq!(
    decode_image(&image),
    [10, 20, 30, 40, 50, 60, 70, 80, 90, 15, 25, 35]
  );

  let mask = image.soft_mask().expect("alpha should have produced a soft mask");
  assert_eq!(mask.bits_per_component(), 8);
  assert_eq!(mask.color_space(), Some(&ColorSpace::DeviceGray));
  // plain flate, no predictor on the mask
  assert!(mask.decode_parameters().is_none());
  assert_eq!(inflate(mask.data().unwrap().bytes()), [255, 128, 0, 77]);
}

#[test]
fn test_packed_argb_matches_byte_tuples() {
  // the same image through two layouts must produce the same streams
  let tuples = [1_u8, 2, 3, 40, 5, 6, 7, 80];
  let packed = [
    u32::from_le_bytes([3, 2, 1, 40]),
    u32::from_le_bytes([7, 6, 5, 80]),
  ];
  let from_tuples = encode_raster(
    &RasterSource {
      width: 2,
      height: 1,
      rows: RasterRows::ByteTuples { data: &tuples, components: 4, has_alpha: true },
    },
    EncoderConfig::default(),
  )
  .unwrap();
  let from_packed = encode_raster(
    &RasterSource {
      width: 2,
      height: 1,
      rows: RasterRows::PackedInts { data: &packed, order: PackedOrder::Argb },
    },
    EncoderConfig::default(),
  )
  .unwrap();
  assert_eq!(from_tuples.data(), from_packed.data());
  assert_eq!(
    from_tuples.soft_mask().unwrap().data(),
    from_packed.soft_mask().unwrap().data()
  );
}

#[test]
fn test_packed_rgb_has_no_mask() {
  let packed = [0x00FF_8040_u32; 6];
  let source = RasterSource {
    width: 3,
    height: 2,
    rows: RasterRows::PackedInts { data: &packed, order: PackedOrder::Rgb },
  };
  let image = encode_raster(&source, EncoderConfig::default()).unwrap();
  assert!(image.soft_mask().is_none());
  assert_eq!(decode_image(&image), [0xFF, 0x80, 0x40].repeat(6));
}

#[test]
fn test_bgr_channel_swizzle() {
  // INT_BGR keeps red in the low byte
  let packed = [u32::from_le_bytes([0x11, 0x22, 0x33, 0])];
  let source = RasterSource {
    width: 1,
    height: 1,
    rows: RasterRows::PackedInts { data: &packed, order: PackedOrder::Bgr },
  };
  let image = encode_raster(&source, EncoderConfig::default()).unwrap();
  assert_eq!(decode_image(&image), [0x11, 0x22, 0x33]);
}

#[test]
fn test_shorts_sixteen_bit_roundtrip() {
  let pixels: [u16; 8] = [0, 1, 256, 257, 0x7FFF, 0x8000, 0xFFFE, 0xFFFF];
  let source = RasterSource {
    width: 4,
    height: 2,
    rows: RasterRows::Shorts { data: &pixels, components: 1, has_alpha: false },
  };
  let image = encode_raster(&source, EncoderConfig::default()).unwrap();
  assert_eq!(image.bits_per_component(), 16);
  let decoded = decode_image(&image);
  let mut expected = Vec::new();
  for p in pixels {
    expected.extend_from_slice(&p.to_be_bytes());
  }
  assert_eq!(decoded, expected);
}

#[test]
fn test_shorts_alpha_takes_high_byte() {
  let pixels: [u16; 4] = [0x1234, 0xABCD, 0x5678, 0x0102];
  let source = RasterSource {
    width: 2,
    height: 1,
    rows: RasterRows::Shorts { data: &pixels, components: 2, has_alpha: true },
  };
  let image = encode_raster(&source, EncoderConfig::default()).unwrap();
  assert_eq!(image.decode_parameters().unwrap().colors, 1);
  assert_eq!(decode_image(&image), [0x12, 0x34, 0x56, 0x78]);
  let mask = image.soft_mask().unwrap();
  assert_eq!(inflate(mask.data().unwrap().bytes()), [0xAB, 0x01]);
}

#[test]
fn test_unrecognized_layouts_decline() {
  // two color components is not a stream the consumer can type
  let data = [0_u8; 8];
  let source = RasterSource {
    width: 2,
    height: 2,
    rows: RasterRows::ByteTuples { data: &data, components: 2, has_alpha: false },
  };
  assert_eq!(
    encode_raster(&source, EncoderConfig::default()),
    Err(ConvertError::UnsupportedRasterLayout)
  );

  // data slice doesn't match the declared dimensions
  let source = RasterSource {
    width: 3,
    height: 3,
    rows: RasterRows::ByteTuples { data: &data, components: 1, has_alpha: false },
  };
  assert_eq!(
    encode_raster(&source, EncoderConfig::default()),
    Err(ConvertError::UnsupportedRasterLayout)
  );
}

#[test]
fn test_compression_level_is_per_call() {
  let mut pixels = vec![0_u8; 32 * 32];
  for (i, p) in pixels.iter_mut().enumerate() {
    *p = (i % 17) as u8;
  }
  let source = RasterSource {
    width: 32,
    height: 32,
    rows: RasterRows::ByteTuples { data: &pixels, components: 1, has_alpha: false },
  };
  let fast = encode_raster(
    &source,
    EncoderConfig { level: CompressionLevel::FASTEST },
  )
  .unwrap();
  let best =
    encode_raster(&source, EncoderConfig { level: CompressionLevel::BEST }).unwrap();
  // different settings, same decoded pixels
  assert_eq!(decode_image(&fast), pixels);
  assert_eq!(decode_image(&best), pixels);
}

#[test]
fn test_large_random_roundtrip() {
  let pixels = super::rand_bytes(31 * 17 * 3);
  let source = RasterSource {
    width: 31,
    height: 17,
    rows: RasterRows::ByteTuples { data: &pixels, components: 3, has_alpha: false },
  };
  let image = encode_raster(&source, EncoderConfig::default()).unwrap();
  assert_eq!(decode_image(&image), pixels);
}
