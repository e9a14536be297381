use std::{fmt::{Debug, Display}, hash::Hash};

/// A closed set of resources, each stored under a fixed name.
///
/// Archive entries and standalone files are matched against [`ResourceId::stem`]
/// ignoring ASCII case and extension.
pub trait ResourceId: Copy + Eq + Hash + Debug + Display + 'static {
	const ALL: &'static [Self];
	/// Extension of the standalone file written for each resource.
	const EXTENSION: &'static str;

	fn stem(self) -> &'static str;
	fn from_stem(stem: &str) -> Option<Self>;

	fn file_name(self) -> String {
		format!("{}.{}", self.stem(), Self::EXTENSION)
	}

	/// Resolves an archive entry or file name, with or without extension.
	fn from_name(name: &str) -> Option<Self> {
		let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
		Self::from_stem(&stem.to_ascii_uppercase())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimationId {
	Weapon01,
	Weapon02,
	Weapon03,
	Weapon04
}

static ANIMATION_STEMS: phf::Map<&'static str, AnimationId> = phf::phf_map! {
	"WEAPON01" => AnimationId::Weapon01,
	"WEAPON02" => AnimationId::Weapon02,
	"WEAPON03" => AnimationId::Weapon03,
	"WEAPON04" => AnimationId::Weapon04
};

impl ResourceId for AnimationId {
	const ALL: &'static [Self] = &[Self::Weapon01, Self::Weapon02, Self::Weapon03, Self::Weapon04];
	const EXTENSION: &'static str = "CFA";

	fn stem(self) -> &'static str {
		match self {
			Self::Weapon01 => "WEAPON01",
			Self::Weapon02 => "WEAPON02",
			Self::Weapon03 => "WEAPON03",
			Self::Weapon04 => "WEAPON04"
		}
	}

	fn from_stem(stem: &str) -> Option<Self> {
		ANIMATION_STEMS.get(stem).copied()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoundId {
	Shots5,
	/// SHOTS3 holds the same sound
	Shots2,
	FastGun2,
	ShtGun,
	SgCock1,
	SgCock2,
	UziCock3
}

static SOUND_STEMS: phf::Map<&'static str, SoundId> = phf::phf_map! {
	"SHOTS5" => SoundId::Shots5,
	"SHOTS2" => SoundId::Shots2,
	"FASTGUN2" => SoundId::FastGun2,
	"SHTGUN" => SoundId::ShtGun,
	"SGCOCK1" => SoundId::SgCock1,
	"SGCOCK2" => SoundId::SgCock2,
	"UZICOCK3" => SoundId::UziCock3
};

impl ResourceId for SoundId {
	const ALL: &'static [Self] = &[
		Self::Shots5, Self::Shots2, Self::FastGun2, Self::ShtGun,
		Self::SgCock1, Self::SgCock2, Self::UziCock3
	];
	const EXTENSION: &'static str = "RAW";

	fn stem(self) -> &'static str {
		match self {
			Self::Shots5 => "SHOTS5",
			Self::Shots2 => "SHOTS2",
			Self::FastGun2 => "FASTGUN2",
			Self::ShtGun => "SHTGUN",
			Self::SgCock1 => "SGCOCK1",
			Self::SgCock2 => "SGCOCK2",
			Self::UziCock3 => "UZICOCK3"
		}
	}

	fn from_stem(stem: &str) -> Option<Self> {
		SOUND_STEMS.get(stem).copied()
	}
}

impl Display for AnimationId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.stem())
	}
}

impl Display for SoundId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.stem())
	}
}
