//! Import pipeline for the asset formats of The Terminator: Future Shock.
//!
//! Reads `.BSA` archives, expands `.CFA` bitmap animations through a colour
//! palette and descrambles the raw 8-bit sound effects, caching everything in a
//! [`ResourceBank`] keyed by the closed sets of identifiers in [`resource`].

pub mod byte_slice;
mod error;
pub use error::{Error, Result};
pub mod image;
pub mod palette;
pub use palette::Palette;
pub mod archive;
pub use archive::BsaReader;
pub mod animation;
pub mod audio;
pub use audio::SampleBuffer;
pub mod resource;
pub use resource::{AnimationId, SoundId};
pub mod bank;
pub use bank::{BankPaths, PopulateReport, ResourceBank};
pub mod profile;
pub use profile::{WeaponId, WeaponProfile};

pub enum Certainty {
	Impossible,
	Possible,
	Certain
}

impl Certainty {
	pub const fn certain_if(cond: bool) -> Self {
		if cond {
			Self::Certain
		} else {
			Self::Impossible
		}
	}

	pub const fn possible_if(cond: bool) -> Self {
		if cond {
			Self::Possible
		} else {
			Self::Impossible
		}
	}
}

#[derive(Clone, Copy)]
pub struct Decoder<T> {
	pub id: &'static str,
	pub desc: &'static str,
	detect: fn(buf: &[u8]) -> Certainty,
	decode: fn(buf: &[u8]) -> Result<T, String>
}

/// Runs the first decoder that is certain about `buf`, or failing that, the
/// first possible one that succeeds.
fn decode_step<'a, T>(buf: &[u8], decoders: &'a [Decoder<T>]) -> Result<Option<(&'a Decoder<T>, T)>, String> {
	for decoder in decoders {
		if let Certainty::Certain = (decoder.detect)(buf) {
			return (decoder.decode)(buf)
				.map(|x| Some((decoder, x)))
				.map_err(|msg| {
					if msg.is_empty() {
						format!("unspecified error from {}", decoder.id)
					} else {
						format!("error from {}: {}", decoder.id, msg)
					}
				});
		}
	}
	for decoder in decoders {
		if let Certainty::Possible = (decoder.detect)(buf) {
			if let Ok(x) = (decoder.decode)(buf) {
				return Ok(Some((decoder, x)));
			}
		}
	}
	Ok(None)
}
