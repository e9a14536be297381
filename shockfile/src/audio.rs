use crate::{Error, Result};

pub const SAMPLE_RATE: u32 = 11025;
pub const CHANNELS: u16 = 1;

/// Repeating key subtracted from every sound effect, taken from the game's
/// memory at runtime. Only known to hold for the weapon sound bank.
pub const NOISE_TABLE: [u8; 21] = [
	0xDD, 0x83, 0x65, 0x57, 0xEA, 0x78, 0x08, 0x48, 0xB8, 0x01, 0x38,
	0x94, 0x08, 0xDD, 0x3F, 0xC2, 0xBE, 0xAB, 0x76, 0xC6, 0x14
];

/// Decoded mono PCM, one sample per source byte.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
	pub sample_rate: u32,
	pub channels: u16,
	pub samples: Box<[f32]>
}

impl SampleBuffer {
	pub fn len(&self) -> usize {
		self.samples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.samples.is_empty()
	}

	pub fn duration_secs(&self) -> f32 {
		self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
	}
}

/// Removes the scramble in place. The key restarts at its first byte for every
/// resource. Panics if `key` is empty.
pub fn descramble(buf: &mut [u8], key: &[u8]) {
	assert!(!key.is_empty(), "scramble key is empty");
	for (x, k) in buf.iter_mut().zip(key.iter().cycle()) {
		*x = x.wrapping_sub(*k);
	}
}

/// The inverse of [`descramble`].
pub fn scramble(buf: &mut [u8], key: &[u8]) {
	assert!(!key.is_empty(), "scramble key is empty");
	for (x, k) in buf.iter_mut().zip(key.iter().cycle()) {
		*x = x.wrapping_add(*k);
	}
}

/// Unsigned 8-bit PCM centred at 128 to a float in [-1, 1).
pub fn normalize(sample: u8) -> f32 {
	const CONVERSION_FACTOR: f32 = 1.0 / 128.0;
	(sample as i16 - 128) as f32 * CONVERSION_FACTOR
}

pub fn convert(raw: &[u8]) -> Result<SampleBuffer> {
	convert_with_key(raw, &NOISE_TABLE)
}

pub fn convert_with_key(raw: &[u8], key: &[u8]) -> Result<SampleBuffer> {
	if raw.is_empty() {
		return Err(Error::EmptyAudio);
	}
	let mut pcm = raw.to_vec();
	descramble(&mut pcm, key);
	Ok(SampleBuffer {
		sample_rate: SAMPLE_RATE,
		channels: CHANNELS,
		samples: pcm.into_iter().map(normalize).collect()
	})
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use super::*;

	#[test]
	fn key_restarts_for_every_resource() {
		let mut scrambled: Vec<u8> = (0..30u8).collect();
		scramble(&mut scrambled, &NOISE_TABLE);
		let first = convert(&scrambled).unwrap();
		let second = convert(&scrambled).unwrap();
		assert_eq!(first, second);
		assert_eq!(first.samples[21], normalize(21));
	}

	#[test]
	fn descramble_subtracts_the_reference_key() {
		let mut buf = [0xDD + 10, 0x83 + 20, 0x65, 0x14];
		descramble(&mut buf, &NOISE_TABLE);
		assert_eq!(buf, [10, 20, 0, 0x14u8.wrapping_sub(0x57)]);
	}

	#[test]
	#[should_panic(expected = "scramble key is empty")]
	fn empty_key_is_refused() {
		let _ = convert_with_key(&[0, 128, 255], &[]);
	}

	#[test]
	fn normalize_endpoints() {
		assert_eq!(normalize(128), 0.0);
		assert_eq!(normalize(0), -1.0);
		assert_eq!(normalize(255), 127.0 / 128.0);
		assert_eq!(normalize(192), 0.5);
	}

	#[test]
	fn empty_input_is_rejected() {
		assert!(matches!(convert(&[]), Err(Error::EmptyAudio)));
	}

	#[test]
	fn buffers_are_mono_at_the_fixed_rate() {
		let buf = convert(&[0u8; 11025]).unwrap();
		assert_eq!(buf.sample_rate, 11025);
		assert_eq!(buf.channels, 1);
		assert_eq!(buf.duration_secs(), 1.0);
	}

	proptest! {
		#[test]
		fn descramble_inverts_scramble(data in prop::collection::vec(any::<u8>(), 0..512), key in prop::collection::vec(any::<u8>(), 1..40)) {
			let mut buf = data.clone();
			scramble(&mut buf, &key);
			descramble(&mut buf, &key);
			prop_assert_eq!(buf, data);
		}

		#[test]
		fn normalize_is_bounded(byte in any::<u8>()) {
			let sample = normalize(byte);
			prop_assert!((-1.0..=1.0).contains(&sample));
		}

		#[test]
		fn convert_preserves_length(data in prop::collection::vec(any::<u8>(), 1..2048)) {
			prop_assert_eq!(convert(&data).unwrap().len(), data.len());
		}
	}
}
