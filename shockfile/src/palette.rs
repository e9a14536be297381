use std::{fs, path::Path};
use crate::{byte_slice::ByteSlice, decode_step, image::Pixel, Certainty, Decoder, Error, Result};

pub const PALETTE_SIZE: usize = 256;

const COL_HEADER_SIZE: usize = 8;
const COL_VERSION: u16 = 0xB123;

/// 256 opaque colours, indexed by the single-byte pixel codes of decoded bitmaps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
	colors: Box<[Pixel; PALETTE_SIZE]>
}

impl Palette {
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let buf = fs::read(path).map_err(Error::io(path))?;
		Self::from_bytes(&buf)
	}

	pub fn from_bytes(buf: &[u8]) -> Result<Self> {
		match decode_step(buf, &PALETTE_DECODERS).map_err(Error::MalformedPalette)? {
			Some((decoder, palette)) => {
				log::debug!("decoded {} palette ({}) from {} bytes", decoder.id, decoder.desc, buf.len());
				Ok(palette)
			}
			None => Err(Error::MalformedPalette(format!(
				"expected at least {} bytes of colour table, got {}", PALETTE_SIZE * 3, buf.len()
			)))
		}
	}

	pub fn from_colors(f: impl Fn(u8) -> Pixel) -> Self {
		let mut colors = Box::new([Pixel::TRANSPARENT; PALETTE_SIZE]);
		for (i, color) in colors.iter_mut().enumerate() {
			let c = f(i as u8);
			*color = Pixel::opaque(c.r, c.g, c.b);
		}
		Self {colors}
	}

	pub fn color(&self, index: u8) -> Pixel {
		self.colors[index as usize]
	}

	/// Colour used when a bitmap is expanded; index 0 is see-through.
	pub fn expand(&self, index: u8) -> Pixel {
		if index == 0 {
			Pixel::TRANSPARENT
		} else {
			self.colors[index as usize]
		}
	}
}

fn from_records(buf: &[u8], stride: usize) -> Result<Palette, String> {
	let table = buf.get(..PALETTE_SIZE * stride).ok_or_else(|| format!("colour table needs {} bytes, got {}", PALETTE_SIZE * stride, buf.len()))?;
	let mut colors = Box::new([Pixel::TRANSPARENT; PALETTE_SIZE]);
	for (color, record) in colors.iter_mut().zip(table.chunks_exact(stride)) {
		*color = Pixel::opaque(record[0], record[1], record[2]);
	}
	Ok(Palette {colors})
}

const ENTRY_COL: Decoder<Palette> = Decoder {
	id: "col",
	desc: "Colour table with an 8 byte version header",
	detect: |buf| Certainty::certain_if(buf.get_u16_at(4) == Some(COL_VERSION)),
	decode: |buf| from_records(buf.get(COL_HEADER_SIZE..).unwrap_or_default(), 3)
};

const ENTRY_RGBX: Decoder<Palette> = Decoder {
	id: "rgbx",
	desc: "Headerless colour table with 4 byte records",
	detect: |buf| Certainty::certain_if(buf.len() == PALETTE_SIZE * 4),
	decode: |buf| from_records(buf, 4)
};

const ENTRY_PAL: Decoder<Palette> = Decoder {
	id: "pal",
	desc: "Headerless colour table with 3 byte records",
	detect: |buf| if buf.len() == PALETTE_SIZE * 3 {
		Certainty::Certain
	} else {
		Certainty::possible_if(buf.len() > PALETTE_SIZE * 3)
	},
	decode: |buf| from_records(buf, 3)
};

pub const PALETTE_DECODERS: [Decoder<Palette>; 3] = [ENTRY_COL, ENTRY_RGBX, ENTRY_PAL];
