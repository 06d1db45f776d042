// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
//! C entry points, named after their Windows counterparts so plugin code written
//! against `LoadLibrary`/`GetProcAddress` links unchanged.
//!
//! Every failure turns into a null pointer or `false`; nothing unwinds across the boundary.
#![allow(non_snake_case)]

use crate::{context, diag, Context, Handle, Loader};
use parking_lot::Mutex;
use std::ffi::{c_char, c_void, CStr, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

static LOADER: Mutex<Loader> = parking_lot::const_mutex(Loader::new());

unsafe fn c_os_str<'a>(s: *const c_char) -> Option<&'a OsStr> {
	if s.is_null() {
		return None;
	}
	Some(OsStr::from_bytes(CStr::from_ptr(s).to_bytes()))
}

unsafe fn c_path<'a>(s: *const c_char) -> Option<&'a Path> {
	c_os_str(s).map(Path::new)
}

unsafe fn c_str<'a>(s: *const c_char) -> Option<&'a str> {
	if s.is_null() {
		return None;
	}
	CStr::from_ptr(s).to_str().ok()
}

#[no_mangle]
pub unsafe extern "C" fn LoadLibrary(library_path: *const c_char) -> *mut c_void {
	let Some(path) = c_path(library_path) else {
		return ptr::null_mut();
	};
	LOADER
		.lock()
		.load(path)
		.map_or(ptr::null_mut(), Handle::as_ptr)
}

#[no_mangle]
pub unsafe extern "C" fn FreeLibrary(library_handle: *mut c_void) -> bool {
	match Handle::from_ptr(library_handle) {
		Some(handle) => LOADER.lock().unload(handle).is_ok(),
		None => false,
	}
}

#[no_mangle]
pub unsafe extern "C" fn GetModuleHandle(stem_name: *const c_char) -> *mut c_void {
	let Some(stem) = c_os_str(stem_name) else {
		return ptr::null_mut();
	};
	LOADER
		.lock()
		.module_handle(stem)
		.map_or(ptr::null_mut(), Handle::as_ptr)
}

#[no_mangle]
pub unsafe extern "C" fn GetProcAddress(
	library_handle: *mut c_void,
	function_name: *const c_char,
) -> *mut c_void {
	match (Handle::from_ptr(library_handle), c_str(function_name)) {
		(Some(handle), Some(name)) => LOADER
			.lock()
			.proc_address(handle, name)
			.map_or(ptr::null_mut(), |sym| sym.as_ptr()),
		_ => ptr::null_mut(),
	}
}

#[no_mangle]
pub extern "C" fn GetError() {
	if let Err(e) = diag::dump_last_error() {
		log::error!("could not write {}: {e}", diag::LAST_ERROR_FILE);
	}
}

#[no_mangle]
pub extern "C" fn PrintLibs() {
	if let Err(e) = diag::dump_loaded_images() {
		log::error!("could not write {}: {e}", diag::LOADED_IMAGES_FILE);
	}
}

#[no_mangle]
pub extern "C" fn DLLH_create_context() -> *mut c_void {
	Box::into_raw(Box::new(Context::new())).cast()
}

/// # Safety
/// `context` must come from [`DLLH_create_context`] and not have been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn DLLH_destroy_context(context: *mut c_void) {
	if !context.is_null() {
		drop(Box::from_raw(context.cast::<Context>()));
	}
}

#[no_mangle]
pub unsafe extern "C" fn DLLH_load_library_at_path(
	context: *mut c_void,
	library_path: *const c_char,
) -> *mut c_void {
	let Some(ctx) = context.cast::<Context>().as_ref() else {
		return ptr::null_mut();
	};
	let Some(path) = c_path(library_path) else {
		return ptr::null_mut();
	};
	ctx.load_library_at_path(path)
		.map_or(ptr::null_mut(), Handle::as_ptr)
}

/// The returned pointer is only valid as long as `library_handle` and `context` are.
#[no_mangle]
pub unsafe extern "C" fn DLLH_load_function_with_name(
	context: *mut c_void,
	library_handle: *mut c_void,
	function: *const c_char,
) -> *mut c_void {
	// the context carries no state on unix, so a missing one is not an error
	let fallback = Context::new();
	let ctx = context.cast::<Context>().as_ref().unwrap_or(&fallback);
	match (Handle::from_ptr(library_handle), c_str(function)) {
		(Some(handle), Some(name)) => ctx
			.load_function_with_name(handle, name)
			.map_or(ptr::null_mut(), |sym| sym.as_ptr()),
		_ => ptr::null_mut(),
	}
}

#[no_mangle]
pub unsafe extern "C" fn DLLH_unload_library_at_path(library_path: *const c_char) {
	if let Some(path) = c_path(library_path) {
		context::unload_library_at_path(path);
	}
}
