use bytemuck::{Pod, Zeroable};
use crate::palette::Palette;

#[repr(C)]
#[derive(Zeroable, Pod, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Pixel {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: u8
}

impl Pixel {
	pub const TRANSPARENT: Self = Self {r: 0, g: 0, b: 0, a: 0};

	pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
		Self {r, g, b, a: 255}
	}
}

/// One decoded bitmap, row-major with the top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
	pub width: u32,
	pub height: u32,
	pub pixels: Box<[Pixel]>
}

impl Frame {
	pub fn empty(width: u32, height: u32) -> Self {
		Self {
			width, height,
			pixels: vec![Pixel::TRANSPARENT; (width * height) as usize].into()
		}
	}

	/// Expands palette indices into colours. Index 0 is the transparent colour.
	pub fn from_indexed(width: u32, height: u32, palette: &Palette, indices: &[u8]) -> Self {
		let needed_size = (width * height) as usize;
		assert!(indices.len() >= needed_size);
		Self {
			width, height,
			pixels: indices[..needed_size].iter().map(|&x| palette.expand(x)).collect()
		}
	}

	pub fn row(&self, y: u32) -> &[Pixel] {
		let w = self.width as usize;
		&self.pixels[y as usize * w..y as usize * w + w]
	}

	pub fn row_mut(&mut self, y: u32) -> &mut [Pixel] {
		let w = self.width as usize;
		&mut self.pixels[y as usize * w..y as usize * w + w]
	}

	pub fn pixel(&self, x: u32, y: u32) -> Pixel {
		self.row(y)[x as usize]
	}

	pub fn as_rgba_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(&self.pixels)
	}
}

/// Every frame of one animation resource, in encoded order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSet {
	pub origin_x: i16,
	pub origin_y: i16,
	pub frames: Box<[Frame]>
}

impl FrameSet {
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Frame> {
		self.frames.iter()
	}
}
