// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
//! Dump helpers for poking at the loader from the outside.
//!
//! Both dumps truncate their target on every call.
use crate::img::Images;
use crate::os::imp;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Written by [`dump_last_error`], relative to the current directory.
pub const LAST_ERROR_FILE: &str = "debug.txt";
/// Written by [`dump_loaded_images`], relative to the current directory.
pub const LOADED_IMAGES_FILE: &str = "libs.txt";

/// Writes the pending loader error of this thread, consuming it.
pub fn write_last_error<W: Write>(out: &mut W) -> Result<()> {
	writeln!(out, "TryDynamicLinking ")?;
	if let Some(msg) = imp::take_error() {
		writeln!(out, "A dynamic linking error occurred: ({msg})")?;
	}
	Ok(())
}

pub fn write_loaded_images<W: Write>(out: &mut W) -> Result<()> {
	for (i, path) in Images::now().enumerate() {
		writeln!(out, "lib num {i} : {}", path.display())?;
	}
	Ok(())
}

pub fn dump_last_error_to<P: AsRef<Path>>(path: P) -> Result<()> {
	let mut out = BufWriter::new(File::create(path)?);
	write_last_error(&mut out)?;
	out.flush()?;
	Ok(())
}

pub fn dump_loaded_images_to<P: AsRef<Path>>(path: P) -> Result<()> {
	let mut out = BufWriter::new(File::create(path)?);
	write_loaded_images(&mut out)?;
	out.flush()?;
	Ok(())
}

#[inline]
pub fn dump_last_error() -> Result<()> {
	dump_last_error_to(LAST_ERROR_FILE)
}

#[inline]
pub fn dump_loaded_images() -> Result<()> {
	dump_loaded_images_to(LOADED_IMAGES_FILE)
}
