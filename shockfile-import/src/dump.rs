use std::{fs, path::{Path, PathBuf}};
use anyhow::Context;
use image::ExtendedColorType;
use shockfile::{image::FrameSet, resource::ResourceId, ResourceBank, SampleBuffer};

/// Writes every decoded resource in `bank` to `out`, returning the files
/// written.
pub fn dump_bank(bank: &ResourceBank, out: &Path) -> anyhow::Result<Vec<PathBuf>> {
	fs::create_dir_all(out).with_context(|| format!("could not create {}", out.display()))?;
	let mut written = Vec::new();
	for (id, frames) in bank.animations() {
		written.extend(dump_frames(frames, &out.join(id.stem()))?);
	}
	for (id, sound) in bank.sounds() {
		written.push(dump_samples(sound, &out.join(id.stem()))?);
	}
	log::info!("wrote {} files to {}", written.len(), out.display());
	Ok(written)
}

/// One PNG per frame: `stem.png`, `stem.1.png`, ...
pub fn dump_frames(frames: &FrameSet, stem: &Path) -> anyhow::Result<Vec<PathBuf>> {
	let mut written = Vec::with_capacity(frames.len());
	for (i, frame) in frames.iter().enumerate() {
		let mut file_name = stem.file_name().unwrap_or_default().to_owned();
		if i > 0 {
			file_name.push(format!(".{i}.png"));
		} else {
			file_name.push(".png");
		}
		let target = stem.with_file_name(file_name);
		image::save_buffer(&target, frame.as_rgba_bytes(), frame.width, frame.height, ExtendedColorType::Rgba8)
			.with_context(|| format!("could not write {}", target.display()))?;
		written.push(target);
	}
	Ok(written)
}

/// Raw little-endian `f32` samples in `stem.f32`.
pub fn dump_samples(sound: &SampleBuffer, stem: &Path) -> anyhow::Result<PathBuf> {
	let target = stem.with_extension("f32");
	let buf: Vec<u8> = if cfg!(target_endian = "little") {
		bytemuck::cast_slice(&sound.samples).to_vec()
	} else {
		sound.samples.iter().flat_map(|x| x.to_le_bytes()).collect()
	};
	fs::write(&target, buf).with_context(|| format!("could not write {}", target.display()))?;
	Ok(target)
}
