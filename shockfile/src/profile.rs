use std::fmt::Display;
use crate::{bank::ResourceBank, image::FrameSet, resource::{AnimationId, SoundId}, SampleBuffer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponId {
	Uzi,
	M16,
	MachineGun,
	Shotgun
}

impl WeaponId {
	pub const ALL: [Self; 4] = [Self::Uzi, Self::M16, Self::MachineGun, Self::Shotgun];

	/// Maps an item template index (0 for the Uzi) to its weapon.
	pub fn from_index(index: usize) -> Option<Self> {
		Self::ALL.get(index).copied()
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::Uzi => "Uzi",
			Self::M16 => "M16",
			Self::MachineGun => "Machine Gun",
			Self::Shotgun => "Shotgun"
		}
	}

	/// Accepts the display name or the variant name, ignoring case and spaces.
	pub fn from_name(name: &str) -> Option<Self> {
		let wanted: String = name.chars().filter(|c| !c.is_whitespace() && *c != '-' && *c != '_').collect();
		Self::ALL.into_iter().find(|x| x.name().replace(' ', "").eq_ignore_ascii_case(&wanted))
	}
}

impl Display for WeaponId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// Fixed presentation and behaviour of one weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponProfile {
	pub weapon: WeaponId,
	pub animation: AnimationId,
	/// Screen offsets of the first-person sprite, as fractions of the view.
	pub horizontal_offset: f32,
	pub vertical_offset: f32,
	pub fire_sound: SoundId,
	pub equip_sound: SoundId,
	pub damage: u32,
	pub is_burst_fire: bool
}

static PROFILES: [WeaponProfile; 4] = [
	WeaponProfile {
		weapon: WeaponId::Uzi,
		animation: AnimationId::Weapon01,
		horizontal_offset: -0.3,
		vertical_offset: 0.0,
		fire_sound: SoundId::Shots5,
		equip_sound: SoundId::UziCock3,
		damage: 5,
		is_burst_fire: true
	},
	WeaponProfile {
		weapon: WeaponId::M16,
		animation: AnimationId::Weapon02,
		horizontal_offset: 0.1,
		vertical_offset: 0.01,
		fire_sound: SoundId::Shots2,
		equip_sound: SoundId::SgCock2,
		damage: 10,
		is_burst_fire: true
	},
	WeaponProfile {
		weapon: WeaponId::MachineGun,
		animation: AnimationId::Weapon03,
		horizontal_offset: 0.0,
		vertical_offset: 0.0,
		fire_sound: SoundId::FastGun2,
		equip_sound: SoundId::SgCock2,
		damage: 15,
		is_burst_fire: true
	},
	WeaponProfile {
		weapon: WeaponId::Shotgun,
		animation: AnimationId::Weapon04,
		horizontal_offset: -0.25,
		vertical_offset: 0.0,
		fire_sound: SoundId::ShtGun,
		equip_sound: SoundId::SgCock1,
		damage: 30,
		is_burst_fire: false
	}
];

pub fn select(weapon: WeaponId) -> &'static WeaponProfile {
	&PROFILES[weapon as usize]
}

/// A profile with its resources looked up in a populated bank.
#[derive(Clone, Copy, Debug)]
pub struct LoadedWeapon<'a> {
	pub profile: &'static WeaponProfile,
	pub frames: Option<&'a FrameSet>,
	pub fire_sound: &'a SampleBuffer,
	pub equip_sound: &'a SampleBuffer
}

impl WeaponProfile {
	pub fn bind<'a>(&'static self, bank: &'a ResourceBank) -> LoadedWeapon<'a> {
		LoadedWeapon {
			profile: self,
			frames: bank.animation(self.animation),
			fire_sound: bank.sound(self.fire_sound),
			equip_sound: bank.sound(self.equip_sound)
		}
	}
}
