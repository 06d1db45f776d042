// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use std::{ffi, ptr::NonNull};

/// An opaque handle to a library image, issued by the system loader.
///
/// The loader owns the image; a `Handle` is only a name for it and does not
/// keep it alive. Equal handles refer to the same loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle(NonNull<ffi::c_void>);

impl Handle {
	/// Wraps a raw loader handle, returning `None` for null.
	///
	/// # Safety
	/// `ptr` must be null or a handle returned by `dlopen`.
	#[inline]
	pub unsafe fn from_ptr(ptr: *mut ffi::c_void) -> Option<Self> {
		NonNull::new(ptr).map(Self)
	}

	#[inline]
	pub(crate) const fn new(ptr: NonNull<ffi::c_void>) -> Self {
		Self(ptr)
	}

	#[inline]
	pub const fn as_ptr(self) -> *mut ffi::c_void {
		self.0.as_ptr()
	}
}

/// Address of a resolved symbol.
///
/// Only valid while the library it came from stays loaded.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(transparent)]
pub struct Symbol(NonNull<ffi::c_void>);

impl Symbol {
	#[inline]
	pub(crate) fn new(addr: *mut ffi::c_void) -> Option<Self> {
		NonNull::new(addr).map(Self)
	}

	/// Casts to a pointer of another type.
	#[inline]
	pub const fn cast<T>(self) -> *mut T {
		self.0.as_ptr().cast()
	}

	#[inline]
	pub const fn as_ptr(self) -> *mut ffi::c_void {
		self.0.as_ptr()
	}
}
