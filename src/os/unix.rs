// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use super::RawHandle;
use std::cell::RefCell;
use std::os::unix::ffi::OsStrExt;
use std::ptr::NonNull;
use std::{ffi, path};

thread_local! {
	// `dlerror` is consumed on read, so messages we capture are parked here
	// until someone asks for the last error.
	static PENDING_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

unsafe fn dylib_error() -> Option<String> {
	let err = libc::dlerror();
	if err.is_null() {
		None
	} else {
		Some(ffi::CStr::from_ptr(err).to_string_lossy().into_owned())
	}
}

/// Reads the pending loader error and parks a copy for [`take_error`].
unsafe fn capture_error(fallback: &str) -> String {
	let msg = dylib_error().unwrap_or_else(|| fallback.to_owned());
	PENDING_ERROR.with(|slot| *slot.borrow_mut() = Some(msg.clone()));
	msg
}

/// Returns the last loader error on this thread, clearing it. Errors captured by
/// this crate win over whatever `dlerror` reports since.
pub(crate) fn take_error() -> Option<String> {
	let live = unsafe { dylib_error() };
	PENDING_ERROR.with(|slot| slot.borrow_mut().take()).or(live)
}

/// Each loader call starts from a clean slate, as `dlerror` does.
unsafe fn clear_error() {
	let _ = libc::dlerror();
	PENDING_ERROR.with(|slot| *slot.borrow_mut() = None);
}

unsafe fn map_result<F>(f: F) -> Result<NonNull<ffi::c_void>, String>
where
	F: FnOnce() -> RawHandle,
{
	clear_error();
	match NonNull::new(f()) {
		Some(handle) => Ok(handle),
		None => Err(capture_error("unknown dynamic linking error")),
	}
}

pub(crate) fn path_to_cstring(path: &path::Path) -> Result<ffi::CString, ffi::NulError> {
	ffi::CString::new(path.as_os_str().as_bytes())
}

/// Opens `path` with every symbol bound immediately.
pub(crate) unsafe fn dylib_open(path: &ffi::CStr) -> Result<NonNull<ffi::c_void>, String> {
	map_result(|| libc::dlopen(path.as_ptr(), libc::RTLD_NOW))
}

/// Returns a handle only if `path` is already mapped. The returned handle carries
/// a reference that must be released with [`dylib_close`].
///
/// glibc rejects `RTLD_NOLOAD` on its own, so a binding mode is passed along.
pub(crate) unsafe fn dylib_open_noload(path: &ffi::CStr) -> Option<NonNull<ffi::c_void>> {
	clear_error();
	let handle = libc::dlopen(path.as_ptr(), libc::RTLD_NOW | libc::RTLD_NOLOAD);
	// a miss is not an error from the caller's point of view
	let _ = libc::dlerror();
	NonNull::new(handle)
}

/// Decrements the reference count. Any pending `dlerror` after the call counts as failure,
/// even when `dlclose` itself returned zero.
pub(crate) unsafe fn dylib_close(handle: RawHandle) -> Result<(), String> {
	clear_error();
	let result = libc::dlclose(handle);
	close_result(result, dylib_error())
}

// Handing `dlclose` a bad handle is undefined behaviour, so the failure side is
// only reachable through this mapping.
fn close_result(result: ffi::c_int, err: Option<String>) -> Result<(), String> {
	let msg = match err {
		Some(msg) => msg,
		None if result != 0 => "dlclose failed".to_owned(),
		None => return Ok(()),
	};
	PENDING_ERROR.with(|slot| *slot.borrow_mut() = Some(msg.clone()));
	Err(msg)
}

pub(crate) unsafe fn dylib_symbol(handle: RawHandle, name: &ffi::CStr) -> *mut ffi::c_void {
	libc::dlsym(handle, name.as_ptr())
}

/// Paths of every image currently mapped into the process, in loader order.
#[cfg(not(target_vendor = "apple"))]
pub(crate) fn image_paths() -> Vec<path::PathBuf> {
	unsafe extern "C" fn callback(
		info: *mut libc::dl_phdr_info,
		_size: libc::size_t,
		data: *mut ffi::c_void,
	) -> ffi::c_int {
		let paths = &mut *data.cast::<Vec<path::PathBuf>>();
		let name = (*info).dlpi_name;
		let path = if name.is_null() || *name == 0 {
			// the executable itself has an empty name on ELF platforms
			std::env::current_exe().unwrap_or_default()
		} else {
			let bytes = ffi::CStr::from_ptr(name).to_bytes();
			path::PathBuf::from(ffi::OsStr::from_bytes(bytes))
		};
		paths.push(path);
		0
	}

	let mut paths: Vec<path::PathBuf> = Vec::new();
	unsafe {
		libc::dl_iterate_phdr(Some(callback), (&mut paths as *mut Vec<path::PathBuf>).cast());
	}
	paths
}

#[cfg(target_vendor = "apple")]
pub(crate) fn image_paths() -> Vec<path::PathBuf> {
	let count = unsafe { libc::_dyld_image_count() };
	(0..count)
		.filter_map(|index| unsafe {
			let name = libc::_dyld_get_image_name(index);
			// images can be removed between the count and the lookup
			name.as_ref().map(|name| {
				let bytes = ffi::CStr::from_ptr(name).to_bytes();
				path::PathBuf::from(ffi::OsStr::from_bytes(bytes))
			})
		})
		.collect()
}
