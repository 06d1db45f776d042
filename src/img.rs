// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason
use crate::os::imp;
use std::{path, vec};

/// Iterates the paths of the images mapped into this process.
///
/// The list is a snapshot taken by [`Images::now`]; images loaded or unloaded
/// afterwards are not reflected.
#[derive(Debug)]
pub struct Images {
	inner: vec::IntoIter<path::PathBuf>,
}

impl Images {
	pub fn now() -> Self {
		Self {
			inner: imp::image_paths().into_iter(),
		}
	}
}

impl Iterator for Images {
	type Item = path::PathBuf;
	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next()
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl ExactSizeIterator for Images {}
