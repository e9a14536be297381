use std::{io::Write, path::PathBuf, process::ExitCode};
use anyhow::{anyhow, Context};
use clap::Parser;
use log::LevelFilter;
use shockfile::{profile, Palette, ResourceBank, WeaponId, WeaponProfile};
use config::Config;

mod config;
mod dump;

/// Imports the weapon animations and sounds of The Terminator: Future Shock.
///
/// Paths given here are remembered for the next run.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Directory holding the game's palette and archives
	#[arg(long)]
	data_dir: Option<PathBuf>,
	/// Directory for standalone resource files, the data directory by default
	#[arg(long)]
	cache_dir: Option<PathBuf>,
	/// Palette file name inside the data directory
	#[arg(long)]
	palette: Option<String>,
	/// Image archive file name inside the data directory
	#[arg(long)]
	image_archive: Option<String>,
	/// Sound archive file name inside the data directory
	#[arg(long)]
	sound_archive: Option<String>,
	/// Write every frame as PNG and every sound as raw f32 into this directory
	#[arg(long, value_name = "OUT")]
	dump: Option<PathBuf>,
	/// Only print this weapon's profile
	#[arg(long, value_name = "NAME")]
	weapon: Option<String>,
	#[arg(short, long)]
	verbose: bool
}

impl Args {
	fn apply(&self, config: &mut Config) {
		if let Some(dir) = &self.data_dir {
			config.game_data_dir = Some(dir.clone());
		}
		if let Some(dir) = &self.cache_dir {
			config.cache_dir = Some(dir.clone());
		}
		if let Some(name) = &self.palette {
			config.palette = name.clone();
		}
		if let Some(name) = &self.image_archive {
			config.image_archive = name.clone();
		}
		if let Some(name) = &self.sound_archive {
			config.sound_archive = name.clone();
		}
	}
}

fn init_logging(verbose: bool) {
	let mut builder = env_logger::Builder::new();
	builder
		.filter_level(LevelFilter::Info)
		.parse_default_env()
		.format(|buf, record| {
			writeln!(buf, "[{}] {} {}", chrono::Local::now().format("%H:%M:%S"), record.level(), record.args())
		});
	if verbose {
		builder.filter_level(LevelFilter::Debug);
	}
	builder.init();
}

fn print_profile(profile: &WeaponProfile) {
	println!(
		"{:<12} {}  offset ({:+.2}, {:+.2})  fire {}  equip {}  damage {:>2}  {}",
		profile.weapon.name(), profile.animation, profile.horizontal_offset, profile.vertical_offset,
		profile.fire_sound, profile.equip_sound, profile.damage,
		if profile.is_burst_fire { "burst" } else { "single" }
	);
}

fn run(args: Args) -> anyhow::Result<()> {
	let config_path = config::config_file_path()?;
	let mut config = Config::read(&config_path)?;
	args.apply(&mut config);
	if let Err(e) = config.write(&config_path) {
		log::warn!("{e:#}");
	}

	let weapons = match &args.weapon {
		Some(name) => vec![WeaponId::from_name(name).ok_or_else(|| anyhow!("unknown weapon '{name}'"))?],
		None => WeaponId::ALL.to_vec()
	};

	let palette_path = config.palette_path()?;
	let palette = Palette::load(&palette_path)
		.with_context(|| format!("could not load the palette {}", palette_path.display()))?;
	let paths = config.bank_paths()?;
	let (bank, report) = ResourceBank::populate(&paths, &palette).context("could not populate the resource bank")?;
	print!("{report}");

	for weapon in weapons {
		let loaded = profile::select(weapon).bind(&bank);
		print_profile(loaded.profile);
		match loaded.frames {
			Some(frames) => println!("{:<12} {} frames, origin ({}, {})", "", frames.len(), frames.origin_x, frames.origin_y),
			None => println!("{:<12} no animation", "")
		}
	}

	if let Some(out) = &args.dump {
		dump::dump_bank(&bank, out)?;
	}
	Ok(())
}

fn main() -> ExitCode {
	let args = Args::parse();
	init_logging(args.verbose);
	match run(args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			log::error!("{e:#}");
			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;
	use super::*;

	#[test]
	fn arguments_are_consistent() {
		Args::command().debug_assert();
	}

	#[test]
	fn flags_override_the_config() {
		let args = Args::parse_from(["shockfile-import", "--data-dir", "/games/shock", "--sound-archive", "SFX.BSA"]);
		let mut config = Config {cache_dir: Some("/cache".into()), ..Config::default()};
		args.apply(&mut config);
		assert_eq!(config.game_data_dir, Some("/games/shock".into()));
		assert_eq!(config.sound_archive, "SFX.BSA");
		assert_eq!(config.image_archive, config::DEFAULT_IMAGE_ARCHIVE);
		assert_eq!(config.cache_dir, Some("/cache".into()));
	}
}
