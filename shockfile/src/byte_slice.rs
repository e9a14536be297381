macro_rules! impl_byte_readers {
	($($t:ty),*) => {paste::paste! {$(
		fn [<read_ $t _field>](&self, offset: usize, name: &'static str) -> Result<$t, String> {
			self.[<get_ $t _at>](offset).ok_or_else(#[cold] || format!("could not read {name}"))
		}
		fn [<get_ $t _at>](&self, offset: usize) -> Option<$t> {
			Some($t::from_le_bytes(self.get(offset..offset.checked_add(size_of::<$t>())?)?.try_into().ok()?))
		}
	)*}}
}

/// Bounds-checked little-endian field access on raw resource bytes.
pub trait ByteSlice {
	fn read_u8_field(&self, offset: usize, name: &'static str) -> Result<u8, String>;
	fn read_u16_field(&self, offset: usize, name: &'static str) -> Result<u16, String>;
	fn read_u32_field(&self, offset: usize, name: &'static str) -> Result<u32, String>;
	fn read_i16_field(&self, offset: usize, name: &'static str) -> Result<i16, String>;
	fn get_u8_at(&self, offset: usize) -> Option<u8>;
	fn get_u16_at(&self, offset: usize) -> Option<u16>;
	fn get_u32_at(&self, offset: usize) -> Option<u32>;
	fn get_i16_at(&self, offset: usize) -> Option<i16>;
}

impl ByteSlice for [u8] {
	impl_byte_readers!(u8, u16, u32, i16);
}
