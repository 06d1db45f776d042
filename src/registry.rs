// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Maps a library's stem name to the path it was last loaded from.
///
/// Stems are compared byte for byte, so names that are not valid UTF-8 stay distinct.
/// Holds at most one path per stem; recording a new path under an existing
/// stem silently replaces the old one.
#[derive(Debug, Default, Clone)]
pub struct Registry {
	paths: BTreeMap<OsString, PathBuf>,
}

impl Registry {
	#[inline]
	pub const fn new() -> Self {
		Self {
			paths: BTreeMap::new(),
		}
	}

	/// Records `path` under its stem name and returns the stem.
	pub fn record(&mut self, path: &Path) -> OsString {
		let stem = stem_name(path);
		if let Some(old) = self.paths.insert(stem.clone(), path.to_owned()) {
			if old != path {
				log::debug!(
					"{:?} now maps to {} (was {})",
					stem,
					path.display(),
					old.display()
				);
			}
		}
		stem
	}

	#[inline]
	pub fn get<S: AsRef<OsStr>>(&self, stem: S) -> Option<&Path> {
		self.paths.get(stem.as_ref()).map(PathBuf::as_path)
	}

	#[inline]
	pub fn remove<S: AsRef<OsStr>>(&mut self, stem: S) -> Option<PathBuf> {
		self.paths.remove(stem.as_ref())
	}

	#[inline]
	pub fn contains<S: AsRef<OsStr>>(&self, stem: S) -> bool {
		self.paths.contains_key(stem.as_ref())
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.paths.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &Path)> {
		self.paths.iter().map(|(stem, path)| (stem.as_os_str(), path.as_path()))
	}
}

/// Strips the directory and the final extension from `path`.
///
/// `/tmp/libexample.so` gives `libexample`, `libm.so.6` gives `libm.so`.
/// A name whose only dot is the leading one (`.hidden`) yields an empty stem.
pub fn stem_name(path: &Path) -> OsString {
	let file_name = path.file_name().map(OsStrExt::as_bytes).unwrap_or_default();
	let stem = match file_name.iter().rposition(|&b| b == b'.') {
		Some(dot) => &file_name[..dot],
		None => file_name,
	};
	OsStr::from_bytes(stem).to_owned()
}
