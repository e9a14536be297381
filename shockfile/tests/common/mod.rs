#![allow(dead_code)]

use std::{fs, path::Path};
use shockfile::{audio, resource::{AnimationId, ResourceId, SoundId}, BankPaths};

pub fn build_archive(files: &[(&str, Vec<u8>)]) -> Vec<u8> {
	let mut buf = Vec::new();
	buf.extend((files.len() as u16).to_le_bytes());
	buf.extend(0x0100u16.to_le_bytes());
	for (_, data) in files {
		buf.extend_from_slice(data);
	}
	for (name, data) in files {
		let mut name_buf = [0u8; 12];
		name_buf[..name.len()].copy_from_slice(name.as_bytes());
		buf.extend(name_buf);
		buf.extend(0u16.to_le_bytes());
		buf.extend((data.len() as u32).to_le_bytes());
	}
	buf
}

/// Two 2x2 frames at 2 bpp. Lookup maps pixel values 0..4 to palette
/// indices 0, 10, 20, 30.
pub fn two_frame_cfa() -> Vec<u8> {
	let mut buf = Vec::new();
	for x in [2u16, 2, 1] {
		buf.extend(x.to_le_bytes());
	}
	buf.extend((-4i16).to_le_bytes());
	buf.extend(12i16.to_le_bytes());
	buf.extend([2, 2]);
	buf.extend(18u16.to_le_bytes());
	buf.extend([0, 10, 20, 30]);
	// frame 0: rows [1, 2] and [3, 0], as literal bytes
	buf.extend([0x01, 0b1001, 0b0011]);
	// frame 1: every pixel 3, as a run
	buf.extend([0x81, 0b1111]);
	buf
}

pub fn scrambled(samples: &[u8]) -> Vec<u8> {
	let mut buf = samples.to_vec();
	audio::scramble(&mut buf, &audio::NOISE_TABLE);
	buf
}

/// Writes a full image archive and sound archive to `dir`.
pub fn write_game_data(dir: &Path) -> BankPaths {
	let images: Vec<(&str, Vec<u8>)> = AnimationId::ALL.iter().map(|id| (id.stem(), two_frame_cfa())).collect();
	let sounds: Vec<(&str, Vec<u8>)> = SoundId::ALL.iter().enumerate()
		.map(|(i, id)| (id.stem(), scrambled(&[i as u8 * 10, 128, 255])))
		.collect();
	let paths = BankPaths {
		standalone_dir: dir.join("standalone"),
		image_archive: dir.join("MDMDIMGS.BSA"),
		sound_archive: dir.join("MDMDSFXS.BSA")
	};
	fs::write(&paths.image_archive, build_archive(&images)).unwrap();
	fs::write(&paths.sound_archive, build_archive(&sounds)).unwrap();
	paths
}

/// A COL palette whose entry i is (i, 255 - i, 7).
pub fn col_palette() -> Vec<u8> {
	let mut buf = vec![0u8; 8];
	buf[4..6].copy_from_slice(&0xB123u16.to_le_bytes());
	for i in 0..=255u8 {
		buf.extend([i, 255 - i, 7]);
	}
	buf
}
