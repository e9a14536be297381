use std::{fs::File, io::{self, BufReader, Read, Seek, SeekFrom}, path::{Path, PathBuf}};
use crate::{byte_slice::ByteSlice, Error, Result};

// layout: u16 entry count, u16 index type, entry data back to back, index at the tail.
// Index records carry a u16 of flags before the length; no known archive sets them.

pub const HEADER_SIZE: u64 = 4;
const NAME_LEN: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexType {
	/// 12 byte NUL-padded name, u16 flags, u32 length
	Names,
	/// u16 id, u16 flags, u32 length
	Numbers
}

impl IndexType {
	pub const fn from_raw(raw: u16) -> Option<Self> {
		match raw {
			0x0100 => Some(Self::Names),
			0x0200 => Some(Self::Numbers),
			_ => None
		}
	}

	pub const fn raw(self) -> u16 {
		match self {
			Self::Names => 0x0100,
			Self::Numbers => 0x0200
		}
	}

	pub const fn record_size(self) -> usize {
		match self {
			Self::Names => NAME_LEN + 6,
			Self::Numbers => 8
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
	pub name: String,
	pub length: u32,
	pub offset: u64
}

impl ArchiveEntry {
	/// The name without its extension.
	pub fn stem(&self) -> &str {
		self.name.rsplit_once('.').map_or(self.name.as_str(), |(stem, _)| stem)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
	pub entries_read: usize,
	pub entries_skipped: usize,
	pub bytes_read: u64,
	pub bytes_skipped: u64
}

/// A read session over one archive.
///
/// The index is parsed up front; entry data is then consumed through a cursor
/// that starts at the first entry. Walking the index in order and either
/// reading or skipping every entry never seeks backwards. The underlying file
/// handle is released when the reader is dropped.
pub struct BsaReader<R = BufReader<File>> {
	source: PathBuf,
	reader: R,
	index_type: IndexType,
	entries: Box<[ArchiveEntry]>,
	cursor: u64,
	stats: TraversalStats
}

impl BsaReader {
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let file = File::open(path).map_err(Error::io(path))?;
		Self::from_reader(path, BufReader::new(file))
	}
}

impl<R: Read + Seek> BsaReader<R> {
	pub fn from_reader(source: impl Into<PathBuf>, mut reader: R) -> Result<Self> {
		let source = source.into();
		let corrupt = |msg: String| Error::ArchiveCorrupt(format!("{}: {msg}", source.display()));
		let file_len = reader.seek(SeekFrom::End(0)).map_err(Error::io(&source))?;
		reader.seek(SeekFrom::Start(0)).map_err(Error::io(&source))?;
		let mut header = [0u8; HEADER_SIZE as usize];
		reader.read_exact(&mut header).map_err(|_| corrupt(format!("{file_len} bytes is too small to hold a header")))?;
		let count = u16::from_le_bytes([header[0], header[1]]) as usize;
		let raw_type = u16::from_le_bytes([header[2], header[3]]);
		let index_type = IndexType::from_raw(raw_type).ok_or_else(|| corrupt(format!("unknown index type 0x{raw_type:04X}")))?;
		let index_size = (count * index_type.record_size()) as u64;
		if HEADER_SIZE + index_size > file_len {
			return Err(corrupt(format!("index of {count} entries does not fit in {file_len} bytes")));
		}
		let data_end = file_len - index_size;
		let mut index = vec![0u8; index_size as usize];
		reader.seek(SeekFrom::Start(data_end)).map_err(Error::io(&source))?;
		reader.read_exact(&mut index).map_err(Error::io(&source))?;
		let entries = parse_index(&index, index_type, data_end).map_err(corrupt)?;
		let entries_end = entries.last().map_or(HEADER_SIZE, |x| x.offset + x.length as u64);
		if entries_end < data_end {
			log::warn!("{}: {} unused bytes before the index", source.display(), data_end - entries_end);
		}
		reader.seek(SeekFrom::Start(HEADER_SIZE)).map_err(Error::io(&source))?;
		log::debug!("opened {} with {count} entries", source.display());
		Ok(Self {
			source,
			reader,
			index_type,
			entries: entries.into(),
			cursor: HEADER_SIZE,
			stats: TraversalStats::default()
		})
	}

	pub fn index_type(&self) -> IndexType {
		self.index_type
	}

	pub fn index_count(&self) -> usize {
		self.entries.len()
	}

	pub fn entries(&self) -> &[ArchiveEntry] {
		&self.entries
	}

	pub fn entry_name(&self, index: usize) -> Option<&str> {
		self.entries.get(index).map(|x| x.name.as_str())
	}

	pub fn entry_length(&self, index: usize) -> Option<u32> {
		self.entries.get(index).map(|x| x.length)
	}

	pub fn stats(&self) -> TraversalStats {
		self.stats
	}

	fn entry_checked(&self, index: usize) -> Result<&ArchiveEntry> {
		self.entries.get(index).ok_or_else(|| Error::ArchiveCorrupt(format!(
			"{}: no entry {index}, the index holds {}", self.source.display(), self.entries.len()
		)))
	}

	/// Reads the bytes of entry `index`. Reading the entry under the cursor
	/// never seeks; any other entry is reached by seeking to its offset.
	pub fn read_entry(&mut self, index: usize) -> Result<Vec<u8>> {
		let entry = self.entry_checked(index)?;
		let (offset, length) = (entry.offset, entry.length);
		if self.cursor != offset {
			self.reader.seek(SeekFrom::Start(offset)).map_err(Error::io(&self.source))?;
		}
		let mut buf = vec![0u8; length as usize];
		// position is unknown until the read completes
		self.cursor = u64::MAX;
		if let Err(e) = self.reader.read_exact(&mut buf) {
			return Err(if e.kind() == io::ErrorKind::UnexpectedEof {
				Error::ArchiveCorrupt(format!("{}: entry {index} is truncated", self.source.display()))
			} else {
				Error::io(&self.source)(e)
			});
		}
		self.cursor = offset + length as u64;
		self.stats.entries_read += 1;
		self.stats.bytes_read += length as u64;
		Ok(buf)
	}

	/// Moves the cursor past entry `index` without reading it.
	pub fn skip_entry(&mut self, index: usize) -> Result<()> {
		let entry = self.entry_checked(index)?;
		let (offset, length) = (entry.offset, entry.length);
		if self.cursor == offset {
			self.reader.seek_relative(length as i64).map_err(Error::io(&self.source))?;
		} else {
			self.reader.seek(SeekFrom::Start(offset + length as u64)).map_err(Error::io(&self.source))?;
		}
		self.cursor = offset + length as u64;
		self.stats.entries_skipped += 1;
		self.stats.bytes_skipped += length as u64;
		Ok(())
	}
}

fn parse_index(index: &[u8], index_type: IndexType, data_end: u64) -> Result<Vec<ArchiveEntry>, String> {
	let mut entries = Vec::with_capacity(index.len() / index_type.record_size());
	let mut offset = HEADER_SIZE;
	for (i, record) in index.chunks_exact(index_type.record_size()).enumerate() {
		let (name, flags_at) = match index_type {
			IndexType::Names => {
				let raw = &record[..NAME_LEN];
				let len = raw.iter().position(|x| *x == 0).unwrap_or(NAME_LEN);
				let name = std::str::from_utf8(&raw[..len]).map_err(|_| format!("name of entry {i} is not valid text"))?;
				(name.to_string(), NAME_LEN)
			}
			IndexType::Numbers => (record.read_u16_field(0, "entry id")?.to_string(), 2)
		};
		let length = record.read_u32_field(flags_at + 2, "entry length")?;
		if offset + length as u64 > data_end {
			return Err(format!("entry {name} ({length} bytes at {offset}) would read past the end of the data at {data_end}"));
		}
		entries.push(ArchiveEntry {name, length, offset});
		offset += length as u64;
	}
	Ok(entries)
}
