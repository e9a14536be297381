use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("malformed palette: {0}")]
	MalformedPalette(String),
	#[error("corrupt archive: {0}")]
	ArchiveCorrupt(String),
	#[error("malformed animation: {0}")]
	MalformedAnimation(String),
	#[error("audio resource is empty")]
	EmptyAudio,
	#[error("required resource {0} was found neither as a standalone file nor in the archive")]
	UnresolvedRequiredResource(String),
	#[error("could not access {}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error
	}
}

impl Error {
	pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
		let path = path.into();
		move |source| Self::Io {path, source}
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
