use std::{collections::HashMap, fmt::Display, fs, io, path::{Path, PathBuf}};
use log::{debug, info, warn};
use crate::{
	animation, archive::BsaReader, audio, image::FrameSet, palette::Palette,
	resource::{AnimationId, ResourceId, SoundId}, Error, Result, SampleBuffer
};

/// How one family of resources is named and decoded.
pub trait ResourceKind {
	type Id: ResourceId;
	type Artifact;
	const KIND: &'static str;

	fn decode(&self, buf: &[u8]) -> Result<Self::Artifact>;
}

pub struct AnimationKind<'p> {
	pub palette: &'p Palette
}

impl ResourceKind for AnimationKind<'_> {
	type Id = AnimationId;
	type Artifact = FrameSet;
	const KIND: &'static str = "animation";

	fn decode(&self, buf: &[u8]) -> Result<FrameSet> {
		animation::decode(buf, self.palette)
	}
}

pub struct SoundKind;

impl ResourceKind for SoundKind {
	type Id = SoundId;
	type Artifact = SampleBuffer;
	const KIND: &'static str = "sound";

	fn decode(&self, buf: &[u8]) -> Result<SampleBuffer> {
		audio::convert(buf)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
	pub from_standalone: usize,
	pub from_archive: usize,
	pub archive_opened: bool,
	pub entries_read: usize,
	pub entries_skipped: usize,
	/// Stems of the resources found nowhere, in declaration order.
	pub unresolved: Vec<&'static str>
}

/// Resolves every identifier of a kind, preferring standalone files and
/// falling back to a single pass over an archive. Whatever comes out of the
/// archive is written back as a standalone file for the next run.
pub struct TwoTierLoader<K> {
	kind: K
}

impl<K: ResourceKind> TwoTierLoader<K> {
	pub fn new(kind: K) -> Self {
		Self {kind}
	}

	pub fn load(&self, standalone_dir: &Path, archive_path: &Path) -> Result<(HashMap<K::Id, K::Artifact>, LoadStats)> {
		let mut loaded = HashMap::new();
		let mut stats = LoadStats::default();
		let mut pending = Vec::new();
		for &id in K::Id::ALL {
			match self.load_standalone(standalone_dir, id) {
				Some(artifact) => {
					loaded.insert(id, artifact);
					stats.from_standalone += 1;
				}
				None => pending.push(id)
			}
		}
		if !pending.is_empty() {
			self.load_archive(standalone_dir, archive_path, &mut pending, &mut loaded, &mut stats)?;
		}
		stats.unresolved = pending.iter().map(|id| id.stem()).collect();
		info!(
			"{} {}s: {} standalone, {} from {}, {} missing",
			loaded.len(), K::KIND, stats.from_standalone, stats.from_archive,
			if stats.archive_opened { archive_path.display().to_string() } else { "no archive".into() },
			stats.unresolved.len()
		);
		Ok((loaded, stats))
	}

	fn load_standalone(&self, dir: &Path, id: K::Id) -> Option<K::Artifact> {
		let path = dir.join(id.file_name());
		let buf = match fs::read(&path) {
			Ok(buf) => buf,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
			Err(e) => {
				warn!("could not read {}: {e}", path.display());
				return None;
			}
		};
		match self.kind.decode(&buf) {
			Ok(artifact) => {
				debug!("{id} loaded from {}", path.display());
				Some(artifact)
			}
			Err(e) => {
				warn!("ignoring {}: {e}", path.display());
				None
			}
		}
	}

	fn load_archive(
		&self,
		standalone_dir: &Path,
		archive_path: &Path,
		pending: &mut Vec<K::Id>,
		loaded: &mut HashMap<K::Id, K::Artifact>,
		stats: &mut LoadStats
	) -> Result<()> {
		let mut bsa = BsaReader::open(archive_path)?;
		stats.archive_opened = true;
		for i in 0..bsa.index_count() {
			if pending.is_empty() {
				break;
			}
			let wanted = bsa.entry_name(i)
				.and_then(K::Id::from_name)
				.and_then(|id| pending.iter().position(|x| *x == id));
			let Some(pos) = wanted else {
				bsa.skip_entry(i)?;
				continue;
			};
			let id = pending[pos];
			let buf = bsa.read_entry(i)?;
			persist(standalone_dir, &id.file_name(), &buf);
			match self.kind.decode(&buf) {
				Ok(artifact) => {
					debug!("{id} loaded from entry {i} of {}", archive_path.display());
					loaded.insert(id, artifact);
					pending.remove(pos);
					stats.from_archive += 1;
				}
				Err(e) => warn!("could not decode {id} from {}: {e}", archive_path.display())
			}
		}
		let traversal = bsa.stats();
		stats.entries_read = traversal.entries_read;
		stats.entries_skipped = traversal.entries_skipped;
		Ok(())
	}
}

fn persist(dir: &Path, file_name: &str, buf: &[u8]) {
	let path = dir.join(file_name);
	if let Err(e) = fs::create_dir_all(dir).and_then(|_| fs::write(&path, buf)) {
		warn!("could not write {}: {e}", path.display());
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankPaths {
	/// Where standalone resource files are looked up and written.
	pub standalone_dir: PathBuf,
	pub image_archive: PathBuf,
	pub sound_archive: PathBuf
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PopulateReport {
	pub animations: LoadStats,
	pub sounds: LoadStats
}

impl Display for PopulateReport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (kind, stats) in [("animations", &self.animations), ("sounds", &self.sounds)] {
			write!(f, "{kind}: {} standalone, {} from archive", stats.from_standalone, stats.from_archive)?;
			if stats.archive_opened {
				write!(f, " ({} entries read, {} skipped)", stats.entries_read, stats.entries_skipped)?;
			}
			if !stats.unresolved.is_empty() {
				write!(f, ", missing {}", stats.unresolved.join(", "))?;
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

/// Every weapon animation and sound, decoded once at startup and read-only
/// afterwards. Animations may be missing; every sound is present.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceBank {
	animations: HashMap<AnimationId, FrameSet>,
	sounds: HashMap<SoundId, SampleBuffer>
}

impl ResourceBank {
	pub fn populate(paths: &BankPaths, palette: &Palette) -> Result<(Self, PopulateReport)> {
		let (animations, animation_stats) = TwoTierLoader::new(AnimationKind {palette})
			.load(&paths.standalone_dir, &paths.image_archive)?;
		let (sounds, sound_stats) = TwoTierLoader::new(SoundKind)
			.load(&paths.standalone_dir, &paths.sound_archive)?;
		if let Some(name) = sound_stats.unresolved.first() {
			return Err(Error::UnresolvedRequiredResource(name.to_string()));
		}
		for name in &animation_stats.unresolved {
			warn!("animation {name} is unavailable");
		}
		Ok((Self {animations, sounds}, PopulateReport {animations: animation_stats, sounds: sound_stats}))
	}

	pub fn animation(&self, id: AnimationId) -> Option<&FrameSet> {
		self.animations.get(&id)
	}

	pub fn sound(&self, id: SoundId) -> &SampleBuffer {
		&self.sounds[&id]
	}

	pub fn animations(&self) -> impl Iterator<Item = (AnimationId, &FrameSet)> {
		AnimationId::ALL.iter().filter_map(|&id| Some((id, self.animations.get(&id)?)))
	}

	pub fn sounds(&self) -> impl Iterator<Item = (SoundId, &SampleBuffer)> {
		SoundId::ALL.iter().filter_map(|&id| Some((id, self.sounds.get(&id)?)))
	}
}
