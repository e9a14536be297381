use std::{collections::HashMap, fs::{self, File}, io::BufReader, path::{Path, PathBuf}};
use anyhow::{anyhow, Context};
use serde_json::Value;
use shockfile::BankPaths;

pub const DEFAULT_PALETTE: &str = "SHOCK.COL";
pub const DEFAULT_IMAGE_ARCHIVE: &str = "MDMDIMGS.BSA";
pub const DEFAULT_SOUND_ARCHIVE: &str = "MDMDSFXS.BSA";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	pub game_data_dir: Option<PathBuf>,
	/// Where standalone resources are kept; the game data directory when unset.
	pub cache_dir: Option<PathBuf>,
	pub palette: String,
	pub image_archive: String,
	pub sound_archive: String
}

impl Default for Config {
	fn default() -> Self {
		Self {
			game_data_dir: None,
			cache_dir: None,
			palette: DEFAULT_PALETTE.into(),
			image_archive: DEFAULT_IMAGE_ARCHIVE.into(),
			sound_archive: DEFAULT_SOUND_ARCHIVE.into()
		}
	}
}

pub fn config_file_path() -> anyhow::Result<PathBuf> {
	let dirs = directories::ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
		.ok_or_else(|| anyhow!("no home directory to keep the config in"))?;
	Ok(dirs.config_local_dir().join("config.json"))
}

impl Config {
	/// Loads `path`, keeping defaults for anything missing. A missing file is
	/// not an error.
	pub fn read(path: &Path) -> anyhow::Result<Self> {
		let mut config = Self::default();
		let Ok(config_file) = File::open(path) else {
			return Ok(config);
		};
		let buf: HashMap<String, Value> = serde_json::from_reader(BufReader::new(config_file))
			.with_context(|| format!("could not parse {}", path.display()))?;

		if let Some(Value::String(value)) = buf.get("game_data_dir") {
			config.game_data_dir = Some(value.into());
		}

		if let Some(Value::String(value)) = buf.get("cache_dir") {
			config.cache_dir = Some(value.into());
		}

		if let Some(Value::String(value)) = buf.get("palette") {
			config.palette = value.clone();
		}

		if let Some(Value::String(value)) = buf.get("image_archive") {
			config.image_archive = value.clone();
		}

		if let Some(Value::String(value)) = buf.get("sound_archive") {
			config.sound_archive = value.clone();
		}

		Ok(config)
	}

	pub fn write(&self, path: &Path) -> anyhow::Result<()> {
		let mut config = HashMap::new();

		if let Some(dir) = &self.game_data_dir {
			config.insert("game_data_dir", serde_json::to_value(dir)?);
		}

		if let Some(dir) = &self.cache_dir {
			config.insert("cache_dir", serde_json::to_value(dir)?);
		}

		config.insert("palette", Value::String(self.palette.clone()));
		config.insert("image_archive", Value::String(self.image_archive.clone()));
		config.insert("sound_archive", Value::String(self.sound_archive.clone()));

		let buf = serde_json::to_string_pretty(&config)?;
		if let Some(dir) = path.parent() {
			fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;
		}
		fs::write(path, buf).with_context(|| format!("could not write {}", path.display()))
	}

	fn data_dir(&self) -> anyhow::Result<&Path> {
		self.game_data_dir.as_deref().ok_or_else(|| anyhow!("no game data directory configured, pass --data-dir"))
	}

	pub fn palette_path(&self) -> anyhow::Result<PathBuf> {
		Ok(self.data_dir()?.join(&self.palette))
	}

	pub fn bank_paths(&self) -> anyhow::Result<BankPaths> {
		let data_dir = self.data_dir()?;
		Ok(BankPaths {
			standalone_dir: self.cache_dir.clone().unwrap_or_else(|| data_dir.into()),
			image_archive: data_dir.join(&self.image_archive),
			sound_archive: data_dir.join(&self.sound_archive)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_file_gives_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let config = Config::read(&dir.path().join("config.json")).unwrap();
		assert_eq!(config, Config::default());
		assert!(config.bank_paths().is_err());
	}

	#[test]
	fn written_config_reads_back() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("config.json");
		let config = Config {
			game_data_dir: Some("/games/shock".into()),
			cache_dir: None,
			palette: "ALT.COL".into(),
			..Config::default()
		};
		config.write(&path).unwrap();
		assert_eq!(Config::read(&path).unwrap(), config);
	}

	#[test]
	fn cache_dir_defaults_to_the_data_dir() {
		let mut config = Config {game_data_dir: Some("/games/shock".into()), ..Config::default()};
		let paths = config.bank_paths().unwrap();
		assert_eq!(paths.standalone_dir, Path::new("/games/shock"));
		assert_eq!(paths.sound_archive, Path::new("/games/shock/MDMDSFXS.BSA"));
		config.cache_dir = Some("/tmp/cache".into());
		assert_eq!(config.bank_paths().unwrap().standalone_dir, Path::new("/tmp/cache"));
		assert_eq!(config.palette_path().unwrap(), Path::new("/games/shock/SHOCK.COL"));
	}

	#[test]
	fn unknown_and_mistyped_keys_are_ignored() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		fs::write(&path, r#"{"palette": 3, "bookmarks": [], "sound_archive": "SFX.BSA"}"#).unwrap();
		let config = Config::read(&path).unwrap();
		assert_eq!(config.palette, DEFAULT_PALETTE);
		assert_eq!(config.sound_archive, "SFX.BSA");
	}
}
