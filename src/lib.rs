// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
//! Windows-style dynamic library calls (`LoadLibrary`, `FreeLibrary`, `GetModuleHandle`,
//! `GetProcAddress`) on top of `dlopen`, `dlsym` and `dlclose`.
//!
//! The Rust API lives on [`Loader`] and [`Context`]. With the `ffi` feature the same
//! operations are exported as C symbols.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::missing_safety_doc)]
#![cfg(unix)]

pub mod context;
pub mod diag;
pub mod error;
pub mod img;
mod library;
mod loader;
mod os;
pub mod registry;

#[cfg(feature = "ffi")]
#[cfg_attr(docsrs, doc(cfg(feature = "ffi")))]
pub mod ffi;

pub use context::{unload_library_at_path, Context};
pub use library::{Handle, Symbol};
pub use loader::Loader;
pub use registry::Registry;

/// The result of a shim function
pub type Result<T> = std::result::Result<T, error::ShimError>;
