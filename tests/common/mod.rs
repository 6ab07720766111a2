//! A deterministic stand-in for the native codec.
//!
//! The wire format is self-describing: a `FAKE` magic, a flags byte
//! (alpha, animation, lossless), little-endian dimensions, then the pixel
//! payload run-length encoded as `(count, value)` pairs. Lossless mode
//! stores the payload bit-exact; lossy mode quantizes each byte first,
//! with a step that grows as quality drops, so lower quality compresses
//! better and higher quality never produces a smaller stream.

use webp_bridge::{BitstreamFeatures, BitstreamFormat, FeatureStatus, NativeCodec};

const MAGIC: &[u8; 4] = b"FAKE";
const FLAG_ALPHA: u8 = 1 << 0;
const FLAG_ANIMATION: u8 = 1 << 1;
const FLAG_LOSSLESS: u8 = 1 << 2;
const HEADER_LEN: usize = 13;

pub struct FakeCodec;

struct Header {
    flags: u8,
    width: u32,
    height: u32,
}

fn parse_header(data: &[u8]) -> Option<Header> {
    if data.len() < HEADER_LEN || &data[..4] != MAGIC {
        return None;
    }
    Some(Header {
        flags: data[4],
        width: u32::from_le_bytes(data[5..9].try_into().unwrap()),
        height: u32::from_le_bytes(data[9..13].try_into().unwrap()),
    })
}

fn quantize_step(quality: f32) -> u32 {
    1 + ((100.0 - quality.clamp(0.0, 100.0)) as u32) / 8
}

fn rle_encode(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut iter = bytes.iter();
    if let Some(&first) = iter.next() {
        let mut value = first;
        let mut count = 1u8;
        for &b in iter {
            if b == value && count < u8::MAX {
                count += 1;
            } else {
                out.push(count);
                out.push(value);
                value = b;
                count = 1;
            }
        }
        out.push(count);
        out.push(value);
    }
    out
}

fn rle_decode(data: &[u8]) -> Option<Vec<u8>> {
    if data.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::new();
    for pair in data.chunks_exact(2) {
        out.extend(std::iter::repeat_n(pair[1], pair[0] as usize));
    }
    Some(out)
}

fn encode_stream(
    pixels: &[u8],
    width: u32,
    height: u32,
    stride: u32,
    bpp: usize,
    quality: Option<f32>,
) -> Vec<u8> {
    let row_len = width as usize * bpp;
    if stride < row_len as u32 || pixels.len() < (height as usize) * stride as usize {
        return Vec::new();
    }

    let mut raw = Vec::with_capacity(row_len * height as usize);
    for y in 0..height as usize {
        let start = y * stride as usize;
        raw.extend_from_slice(&pixels[start..start + row_len]);
    }

    let mut flags = 0u8;
    if bpp == 4 {
        flags |= FLAG_ALPHA;
    }
    if let Some(quality) = quality {
        let step = quantize_step(quality);
        for v in &mut raw {
            *v = ((u32::from(*v) / step) * step) as u8;
        }
    } else {
        flags |= FLAG_LOSSLESS;
    }

    let mut out = Vec::with_capacity(HEADER_LEN);
    out.extend_from_slice(MAGIC);
    out.push(flags);
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&rle_encode(&raw));
    out
}

fn decode_stream(data: &[u8], output: &mut [u8], stride: u32, expect_alpha: bool) -> bool {
    let Some(header) = parse_header(data) else {
        return false;
    };
    let has_alpha = header.flags & FLAG_ALPHA != 0;
    if has_alpha != expect_alpha || header.flags & FLAG_ANIMATION != 0 {
        return false;
    }
    let bpp = if has_alpha { 4 } else { 3 };
    let row_len = header.width as usize * bpp;
    let Some(raw) = rle_decode(&data[HEADER_LEN..]) else {
        return false;
    };
    if raw.len() != row_len * header.height as usize {
        return false;
    }
    for (y, row) in raw.chunks_exact(row_len).enumerate() {
        let start = y * stride as usize;
        let Some(dst) = output.get_mut(start..start + row_len) else {
            return false;
        };
        dst.copy_from_slice(row);
    }
    true
}

impl NativeCodec for FakeCodec {
    fn get_info(&self, data: &[u8]) -> Option<(u32, u32)> {
        parse_header(data).map(|h| (h.width, h.height))
    }

    fn get_features(&self, data: &[u8]) -> Result<BitstreamFeatures, FeatureStatus> {
        let header = parse_header(data).ok_or(FeatureStatus::BitstreamError)?;
        Ok(BitstreamFeatures {
            width: header.width,
            height: header.height,
            has_alpha: header.flags & FLAG_ALPHA != 0,
            has_animation: header.flags & FLAG_ANIMATION != 0,
            format: if header.flags & FLAG_LOSSLESS != 0 {
                BitstreamFormat::Lossless
            } else {
                BitstreamFormat::Lossy
            },
        })
    }

    fn encode_rgb(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        stride: u32,
        quality: f32,
    ) -> Vec<u8> {
        encode_stream(pixels, width, height, stride, 3, Some(quality))
    }

    fn encode_rgba(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        stride: u32,
        quality: f32,
    ) -> Vec<u8> {
        encode_stream(pixels, width, height, stride, 4, Some(quality))
    }

    fn encode_lossless_rgb(&self, pixels: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
        encode_stream(pixels, width, height, stride, 3, None)
    }

    fn encode_lossless_rgba(&self, pixels: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8> {
        encode_stream(pixels, width, height, stride, 4, None)
    }

    fn decode_rgb_into(&self, data: &[u8], output: &mut [u8], stride: u32) -> bool {
        decode_stream(data, output, stride, false)
    }

    fn decode_rgba_into(&self, data: &[u8], output: &mut [u8], stride: u32) -> bool {
        decode_stream(data, output, stride, true)
    }
}

/// Build an animated bitstream header for rejection tests.
pub fn animated_stream(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN);
    out.extend_from_slice(MAGIC);
    out.push(FLAG_ANIMATION);
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out
}
