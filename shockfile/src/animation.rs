use crate::{byte_slice::ByteSlice, image::{Frame, FrameSet}, palette::Palette, Error, Result};

// CFA: 14 byte header, a lookup table of (1 << bpp) palette indices, then one
// RLE stream per frame. Each stream expands to packed_width * height bytes of
// bit-packed pixels, least significant bits first.

pub const HEADER_SIZE: usize = 14;
const MAX_BITS_PER_PIXEL: u8 = 8;
const MAX_CHUNK: usize = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CfaHeader {
	pub width: u16,
	pub height: u16,
	pub packed_width: u16,
	pub origin_x: i16,
	pub origin_y: i16,
	pub bits_per_pixel: u8,
	pub frame_count: u8,
	pub header_size: u16
}

impl CfaHeader {
	pub fn parse(buf: &[u8]) -> Result<Self, String> {
		let header = Self {
			width: buf.read_u16_field(0, "width")?,
			height: buf.read_u16_field(2, "height")?,
			packed_width: buf.read_u16_field(4, "packed width")?,
			origin_x: buf.read_i16_field(6, "origin x")?,
			origin_y: buf.read_i16_field(8, "origin y")?,
			bits_per_pixel: buf.read_u8_field(10, "bits per pixel")?,
			frame_count: buf.read_u8_field(11, "frame count")?,
			header_size: buf.read_u16_field(12, "header size")?
		};
		let bpp = header.bits_per_pixel;
		if bpp == 0 || bpp > MAX_BITS_PER_PIXEL {
			return Err(format!("unsupported bits per pixel {bpp}"));
		}
		if header.frame_count == 0 {
			return Err("no frames declared".into());
		}
		if header.width == 0 || header.height == 0 {
			return Err(format!("empty frame extents {}x{}", header.width, header.height));
		}
		if (header.packed_width as usize) * 8 < header.width as usize * bpp as usize {
			return Err(format!("packed rows of {} bytes cannot hold {} pixels at {bpp} bpp", header.packed_width, header.width));
		}
		let lookup_end = HEADER_SIZE + header.lookup_len();
		if (header.header_size as usize) < lookup_end {
			return Err(format!("header size {} does not cover the lookup table ending at {lookup_end}", header.header_size));
		}
		if header.header_size as usize > buf.len() {
			return Err(format!("header size {} is past the end of the {} byte file", header.header_size, buf.len()));
		}
		Ok(header)
	}

	pub fn lookup_len(&self) -> usize {
		1 << self.bits_per_pixel
	}

	/// Bytes one frame occupies once its RLE stream is expanded.
	pub fn packed_frame_size(&self) -> usize {
		self.packed_width as usize * self.height as usize
	}
}

/// Decodes every frame of a CFA resource, expanding pixels through `palette`.
pub fn decode(buf: &[u8], palette: &Palette) -> Result<FrameSet> {
	decode_frames(buf, palette).map_err(Error::MalformedAnimation)
}

fn decode_frames(buf: &[u8], palette: &Palette) -> Result<FrameSet, String> {
	let header = CfaHeader::parse(buf)?;
	let lookup = &buf[HEADER_SIZE..HEADER_SIZE + header.lookup_len()];
	let frame_count = header.frame_count as usize;
	let packed_size = header.packed_frame_size();
	// even a stream made only of maximal runs needs two bytes per 128 packed bytes
	let min_stream = packed_size.div_ceil(MAX_CHUNK) * 2;
	let available = buf.len() - header.header_size as usize;
	if available < frame_count * min_stream {
		return Err(format!("{frame_count} frames declared but only {available} bytes of frame data"));
	}

	let (width, height) = (header.width as u32, header.height as u32);
	let mut packed = vec![0u8; packed_size];
	let mut indices = vec![0u8; (width * height) as usize];
	let mut frames = Vec::with_capacity(frame_count);
	let mut pos = header.header_size as usize;
	for i in 0..frame_count {
		pos = expand_rle(buf, pos, &mut packed).map_err(|msg| format!("frame {i}: {msg}"))?;
		unpack_rows(&packed, &header, lookup, &mut indices);
		frames.push(Frame::from_indexed(width, height, palette, &indices));
	}
	Ok(FrameSet {
		origin_x: header.origin_x,
		origin_y: header.origin_y,
		frames: frames.into()
	})
}

/// Fills `out` from the RLE stream at `src[pos..]`, returning where the stream ended.
fn expand_rle(src: &[u8], mut pos: usize, out: &mut [u8]) -> Result<usize, String> {
	let mut out_cursor = 0;
	while out_cursor < out.len() {
		let control = *src.get(pos).ok_or("ran out of data")? as usize;
		pos += 1;
		if control & 0x80 != 0 { // run
			let len = (control & 0x7F) + 1;
			let value = *src.get(pos).ok_or("incomplete run")?;
			pos += 1;
			out.get_mut(out_cursor..out_cursor + len).ok_or("run overruns the frame")?.fill(value);
			out_cursor += len;
		} else { // literal chunk
			let len = control + 1;
			let chunk = src.get(pos..pos + len).ok_or("literal chunk went out of bounds")?;
			out.get_mut(out_cursor..out_cursor + len).ok_or("literal chunk overruns the frame")?.copy_from_slice(chunk);
			pos += len;
			out_cursor += len;
		}
	}
	Ok(pos)
}

fn unpack_rows(packed: &[u8], header: &CfaHeader, lookup: &[u8], indices: &mut [u8]) {
	let bpp = header.bits_per_pixel as usize;
	let mask = (1u16 << bpp) - 1;
	for (row, out_row) in packed.chunks_exact(header.packed_width as usize).zip(indices.chunks_exact_mut(header.width as usize)) {
		let mut bit = 0;
		for out in out_row {
			let byte = bit / 8;
			let word = row[byte] as u16 | (row.get(byte + 1).copied().unwrap_or(0) as u16) << 8;
			*out = lookup[((word >> (bit % 8)) & mask) as usize];
			bit += bpp;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::image::Pixel;

	fn gray_palette() -> Palette {
		Palette::from_colors(|i| Pixel::opaque(i, i, i))
	}

	fn pack_row(values: &[u8], bpp: usize, packed_width: usize) -> Vec<u8> {
		let mut row = vec![0u8; packed_width];
		for (i, &v) in values.iter().enumerate() {
			let bit = i * bpp;
			let word = (v as u16) << (bit % 8);
			row[bit / 8] |= word as u8;
			if bit / 8 + 1 < packed_width {
				row[bit / 8 + 1] |= (word >> 8) as u8;
			}
		}
		row
	}

	fn encode_rle(data: &[u8]) -> Vec<u8> {
		let mut out = Vec::new();
		let mut i = 0;
		while i < data.len() {
			let run = data[i..].iter().take(MAX_CHUNK).take_while(|&&x| x == data[i]).count();
			if run >= 3 {
				out.push(0x80 | (run - 1) as u8);
				out.push(data[i]);
				i += run;
			} else {
				let len = (data.len() - i).min(MAX_CHUNK);
				out.push((len - 1) as u8);
				out.extend_from_slice(&data[i..i + len]);
				i += len;
			}
		}
		out
	}

	fn build_cfa(width: usize, bpp: usize, lookup: &[u8], frames: &[Vec<Vec<u8>>]) -> Vec<u8> {
		let packed_width = (width * bpp).div_ceil(8);
		let height = frames[0].len();
		let mut buf = Vec::new();
		buf.extend_from_slice(&(width as u16).to_le_bytes());
		buf.extend_from_slice(&(height as u16).to_le_bytes());
		buf.extend_from_slice(&(packed_width as u16).to_le_bytes());
		buf.extend_from_slice(&(-3i16).to_le_bytes());
		buf.extend_from_slice(&7i16.to_le_bytes());
		buf.push(bpp as u8);
		buf.push(frames.len() as u8);
		buf.extend_from_slice(&((HEADER_SIZE + lookup.len()) as u16).to_le_bytes());
		buf.extend_from_slice(lookup);
		for rows in frames {
			let packed: Vec<u8> = rows.iter().flat_map(|r| pack_row(r, bpp, packed_width)).collect();
			buf.extend(encode_rle(&packed));
		}
		buf
	}

	#[test]
	fn decodes_frames_in_order_through_lookup_and_palette() {
		let lookup = [0, 10, 20, 30];
		let frames = vec![
			vec![vec![0, 1, 2, 3, 3], vec![3, 3, 3, 3, 3]],
			vec![vec![1, 1, 1, 1, 1], vec![2, 0, 2, 0, 2]]
		];
		let set = decode(&build_cfa(5, 2, &lookup, &frames), &gray_palette()).unwrap();
		assert_eq!(set.len(), 2);
		assert_eq!((set.origin_x, set.origin_y), (-3, 7));
		let first = &set.frames[0];
		assert_eq!((first.width, first.height), (5, 2));
		assert_eq!(first.pixel(0, 0), Pixel::TRANSPARENT);
		assert_eq!(first.pixel(1, 0), Pixel::opaque(10, 10, 10));
		assert_eq!(first.pixel(2, 0), Pixel::opaque(20, 20, 20));
		assert_eq!(first.pixel(4, 1), Pixel::opaque(30, 30, 30));
		let second = &set.frames[1];
		assert!(second.row(0).iter().all(|&p| p == Pixel::opaque(10, 10, 10)));
		assert_eq!(second.pixel(1, 1), Pixel::TRANSPARENT);
		assert_eq!(second.pixel(2, 1), Pixel::opaque(20, 20, 20));
	}

	#[test]
	fn eight_bit_frames_with_long_runs() {
		let lookup: Vec<u8> = (0..=255).collect();
		let row: Vec<u8> = (0..300).map(|x| if x < 200 {42} else {(x % 256) as u8}).collect();
		let set = decode(&build_cfa(300, 8, &lookup, &[vec![row.clone(), row]]), &gray_palette()).unwrap();
		let frame = &set.frames[0];
		assert_eq!(frame.pixel(0, 1), Pixel::opaque(42, 42, 42));
		assert_eq!(frame.pixel(299, 1), Pixel::opaque(43, 43, 43));
	}

	#[test]
	fn odd_bit_widths_straddle_bytes() {
		let lookup: Vec<u8> = (0..8).map(|x| x * 2).collect();
		let row = vec![7, 1, 6, 2, 5, 3, 4];
		let set = decode(&build_cfa(7, 3, &lookup, &[vec![row.clone()]]), &gray_palette()).unwrap();
		let decoded: Vec<u8> = set.frames[0].row(0).iter().map(|p| p.r).collect();
		assert_eq!(decoded, row.iter().map(|x| x * 2).collect::<Vec<_>>());
	}

	#[test]
	fn frame_count_is_read_from_the_header() {
		let lookup = [0, 1];
		let mut buf = build_cfa(8, 1, &lookup, &[vec![vec![1; 8]]]);
		// trailing garbage is not another frame
		buf.extend_from_slice(&[0x00, 0xFF, 0x00, 0xFF]);
		assert_eq!(decode(&buf, &gray_palette()).unwrap().len(), 1);
		// claiming a second frame without data fails
		buf.truncate(buf.len() - 4);
		buf[11] = 2;
		assert!(matches!(decode(&buf, &gray_palette()), Err(Error::MalformedAnimation(_))));
	}

	#[test]
	fn inconsistent_headers_are_rejected() {
		let lookup = [0, 1, 2, 3];
		let good = build_cfa(4, 2, &lookup, &[vec![vec![1, 2, 3, 0]; 3]]);
		assert!(decode(&good, &gray_palette()).is_ok());
		let broken = |patch: &dyn Fn(&mut Vec<u8>)| {
			let mut buf = good.clone();
			patch(&mut buf);
			decode(&buf, &gray_palette())
		};
		assert!(matches!(broken(&|b| b.truncate(9)), Err(Error::MalformedAnimation(_))));
		assert!(matches!(broken(&|b| b[10] = 0), Err(Error::MalformedAnimation(_))));
		assert!(matches!(broken(&|b| b[10] = 9), Err(Error::MalformedAnimation(_))));
		assert!(matches!(broken(&|b| b[11] = 0), Err(Error::MalformedAnimation(_))));
		assert!(matches!(broken(&|b| b[0] = 0), Err(Error::MalformedAnimation(_))));
		assert!(matches!(broken(&|b| b[4] = 0), Err(Error::MalformedAnimation(_))));
		assert!(matches!(broken(&|b| b[12] = 2), Err(Error::MalformedAnimation(_))));
		assert!(matches!(broken(&|b| b[12] = 0xFF), Err(Error::MalformedAnimation(_))));
		assert!(matches!(broken(&|b| {b.pop();}), Err(Error::MalformedAnimation(_))));
	}

	#[test]
	fn runs_may_not_overrun_a_frame() {
		let mut buf = build_cfa(4, 8, &(0..=255).collect::<Vec<u8>>(), &[vec![vec![5; 4]]]);
		let stream_start = HEADER_SIZE + 256;
		buf.truncate(stream_start);
		buf.extend_from_slice(&[0x80 | 9, 5]);
		assert!(matches!(decode(&buf, &gray_palette()), Err(Error::MalformedAnimation(_))));
	}
}
