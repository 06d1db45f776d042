// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use std::{ffi, io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	LoadFailure,
	UnloadFailure,
	InvalidName,
	Io,
}

#[derive(Debug, Error)]
pub enum ShimError {
	/// The loader could not open or bind the library.
	#[error("library `{}` could not be loaded: {reason}", .path.display())]
	LoadFailure { path: PathBuf, reason: String },
	/// The loader reported an error after `dlclose`. The library may or may not still be mapped.
	#[error("library could not be unloaded: {0}")]
	UnloadFailure(String),
	#[error("name contains an interior nul byte")]
	Nul(#[from] ffi::NulError),
	#[error(transparent)]
	Io(#[from] io::Error),
}

impl ShimError {
	#[inline]
	pub const fn kind(&self) -> ErrorKind {
		match self {
			Self::LoadFailure { .. } => ErrorKind::LoadFailure,
			Self::UnloadFailure(_) => ErrorKind::UnloadFailure,
			Self::Nul(_) => ErrorKind::InvalidName,
			Self::Io(_) => ErrorKind::Io,
		}
	}
}
