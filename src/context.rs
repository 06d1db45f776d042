// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use crate::loader;
use crate::{Handle, Result, Symbol};
use std::path::Path;

/// Per-caller state for the `DLLH_*` family of calls.
///
/// Nothing needs to be stored on unix; the type exists so callers that also target
/// platforms with real per-context state keep one lifecycle everywhere.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Context {}

impl Context {
	#[inline]
	pub const fn new() -> Self {
		Self {}
	}

	/// Loads `path` exactly like [`Loader::load`](crate::Loader::load) does, but records
	/// nothing, so the library cannot be found again by name.
	pub fn load_library_at_path<P: AsRef<Path>>(&self, path: P) -> Result<Handle> {
		loader::open(path.as_ref())
	}

	/// The returned symbol is only valid while both `handle` and this context are.
	pub fn load_function_with_name(&self, handle: Handle, name: &str) -> Option<Symbol> {
		loader::symbol(handle, name)
	}
}

/// Deliberately does nothing.
///
/// Unloading by path would need a `RTLD_NOLOAD` probe plus a `dlclose` that may drop a
/// reference somebody else owns, so libraries opened through a [`Context`] stay loaded.
#[inline]
pub fn unload_library_at_path<P: AsRef<Path>>(path: P) {
	log::trace!("ignoring unload request for {}", path.as_ref().display());
}
