// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use crate::os::imp;
use crate::registry::Registry;
use crate::{error::ShimError, Handle, Result, Symbol};
use std::ffi::{self, OsStr};
use std::path::Path;

/// Windows-style loader over the system's `dlopen` family.
///
/// Besides forwarding calls, the loader keeps a [`Registry`] of stem names so
/// that [`module_handle`](Loader::module_handle) can answer the same question
/// `GetModuleHandle` does on Windows.
#[derive(Debug, Default)]
pub struct Loader {
	registry: Registry,
}

impl Loader {
	#[inline]
	pub const fn new() -> Self {
		Self {
			registry: Registry::new(),
		}
	}

	#[inline]
	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Loads the library at `path`, binding all symbols immediately.
	///
	/// Increments the system loader's reference count for the library. On success the
	/// stem of `path` is mapped to `path`; nothing is recorded on failure.
	///
	/// # Examples
	///
	/// ```no_run
	/// use dylib_shim::Loader;
	///
	/// let mut loader = Loader::new();
	/// let handle = loader.load("/tmp/libexample.so").unwrap();
	/// assert_eq!(loader.module_handle("libexample"), Some(handle));
	/// ```
	pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<Handle> {
		let path = path.as_ref();
		let handle = open(path)?;
		let stem = self.registry.record(path);
		log::debug!("loaded {:?} from {} as {:p}", stem, path.display(), handle.as_ptr());
		Ok(handle)
	}

	/// Decrements the reference count of `handle`, unloading the library when it hits zero.
	///
	/// The registry is left untouched; a stale entry is dropped by the next
	/// [`module_handle`](Loader::module_handle) that finds the library gone.
	pub fn unload(&self, handle: Handle) -> Result<()> {
		close(handle)
	}

	/// Returns the handle of a library previously loaded under `stem`, if it is still mapped.
	///
	/// Never loads anything and leaves the reference count as it found it.
	pub fn module_handle<S: AsRef<OsStr>>(&mut self, stem: S) -> Option<Handle> {
		let stem = stem.as_ref();
		let path = self.registry.get(stem)?;
		let c_path = match imp::path_to_cstring(path) {
			Ok(c_path) => c_path,
			Err(_) => {
				self.registry.remove(stem);
				return None;
			}
		};
		let Some(raw) = (unsafe { imp::dylib_open_noload(&c_path) }) else {
			log::warn!("{:?} is no longer loaded, forgetting {}", stem, path.display());
			self.registry.remove(stem);
			return None;
		};
		// the probe took a reference of its own
		if let Err(e) = unsafe { imp::dylib_close(raw.as_ptr()) } {
			log::warn!("failed to release probe reference for {:?}: {e}", stem);
		}
		Some(Handle::new(raw))
	}

	/// Resolves `name` in the library behind `handle`.
	pub fn proc_address(&self, handle: Handle, name: &str) -> Option<Symbol> {
		symbol(handle, name)
	}
}

pub(crate) fn open(path: &Path) -> Result<Handle> {
	let c_path = imp::path_to_cstring(path)?;
	let failure = |reason: String| {
		log::warn!("failed to load {}: {reason}", path.display());
		ShimError::LoadFailure {
			path: path.to_owned(),
			reason,
		}
	};
	let raw = unsafe { imp::dylib_open(&c_path) }.map_err(failure)?;
	Ok(Handle::new(raw))
}

pub(crate) fn close(handle: Handle) -> Result<()> {
	match unsafe { imp::dylib_close(handle.as_ptr()) } {
		Ok(()) => {
			log::debug!("released {:p}", handle.as_ptr());
			Ok(())
		}
		Err(reason) => {
			log::warn!("failed to release {:p}: {reason}", handle.as_ptr());
			Err(ShimError::UnloadFailure(reason))
		}
	}
}

pub(crate) fn symbol(handle: Handle, name: &str) -> Option<Symbol> {
	let c_name = ffi::CString::new(name).ok()?;
	let sym = Symbol::new(unsafe { imp::dylib_symbol(handle.as_ptr(), &c_name) });
	log::trace!("{name} in {:p} -> {:?}", handle.as_ptr(), sym.map(Symbol::as_ptr));
	sym
}
