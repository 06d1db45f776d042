// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
#[cfg_attr(docsrs, doc(cfg(unix)))]
#[cfg(unix)]
pub(crate) mod unix;

#[cfg(unix)]
pub(crate) use unix as imp;

/// Raw handle as issued by the system loader.
pub(crate) type RawHandle = *mut std::ffi::c_void;
