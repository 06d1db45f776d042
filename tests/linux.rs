#![cfg(all(target_os = "linux", target_env = "gnu"))]

use dylib_shim::*;
use std::path::PathBuf;
use std::{env, fs, process};

fn init() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn libm_path() -> PathBuf {
	let mut loader = Loader::new();
	let handle = loader.load("libm.so.6").unwrap();
	let path = img::Images::now()
		.find(|path| {
			path.file_name()
				.map_or(false, |name| name.to_string_lossy().starts_with("libm.so"))
		})
		.unwrap();
	loader.unload(handle).unwrap();
	path
}

// Each test gets its own copy so the system loader sees an independent image.
fn private_copy(test: &str) -> PathBuf {
	let dir = env::temp_dir().join(format!("dylib_shim-{}-{test}", process::id()));
	fs::create_dir_all(&dir).unwrap();
	let target = dir.join("libexample.so");
	fs::copy(libm_path(), &target).unwrap();
	target
}

#[test]
fn test_end_to_end() {
	init();
	let path = private_copy("end_to_end");
	let mut loader = Loader::new();

	let handle = loader.load(&path).unwrap();
	assert_eq!(loader.registry().get("libexample"), Some(path.as_path()));
	assert_eq!(loader.module_handle("libexample"), Some(handle));

	let cos = loader.proc_address(handle, "cos").unwrap();
	assert_eq!(loader.proc_address(handle, "cos"), Some(cos));
	let cos: extern "C" fn(f64) -> f64 = unsafe { std::mem::transmute(cos.as_ptr()) };
	assert_eq!(cos(0.0), 1.0);
	assert_eq!(loader.proc_address(handle, "no_such_fn"), None);

	loader.unload(handle).unwrap();
	fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn test_lookup_keeps_refcount() {
	init();
	let path = private_copy("lookup_refcount");
	let mut loader = Loader::new();

	let handle = loader.load(&path).unwrap();
	for _ in 0..4 {
		assert_eq!(loader.module_handle("libexample"), Some(handle));
	}
	// a single unload balances the single load, so the image is gone
	loader.unload(handle).unwrap();
	assert_eq!(loader.module_handle("libexample"), None);
	fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn test_stale_entry_removed() {
	init();
	let path = private_copy("stale_entry");
	let mut loader = Loader::new();

	let handle = loader.load(&path).unwrap();
	loader.unload(handle).unwrap();
	// unloading leaves the entry behind
	assert!(loader.registry().contains("libexample"));

	assert_eq!(loader.module_handle("libexample"), None);
	assert!(!loader.registry().contains("libexample"));
	assert_eq!(loader.module_handle("libexample"), None);
	fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn test_refcounted_unload() {
	init();
	let path = private_copy("refcounted");
	let mut loader = Loader::new();

	let first = loader.load(&path).unwrap();
	let second = loader.load(&path).unwrap();
	assert_eq!(first, second);
	loader.unload(first).unwrap();
	assert_eq!(loader.module_handle("libexample"), Some(second));
	loader.unload(second).unwrap();
	assert_eq!(loader.module_handle("libexample"), None);
	fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn test_context_does_not_record() {
	init();
	let path = private_copy("context");
	let ctx = Context::new();
	let mut loader = Loader::new();

	let handle = ctx.load_library_at_path(&path).unwrap();
	assert!(ctx.load_function_with_name(handle, "sin").is_some());
	assert!(ctx.load_function_with_name(handle, "no_such_fn").is_none());
	assert_eq!(loader.module_handle("libexample"), None);

	unload_library_at_path(&path);
	// still loaded after the no-op, so the loader hands out the same handle
	assert_eq!(loader.load(&path).unwrap(), handle);
	loader.unload(handle).unwrap();
	loader.unload(handle).unwrap();
	fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn test_images_contain_loaded_library() {
	let path = private_copy("images");
	let mut loader = Loader::new();
	let handle = loader.load(&path).unwrap();
	assert!(img::Images::now().any(|image| image == path));
	loader.unload(handle).unwrap();
	assert!(!img::Images::now().any(|image| image == path));
	fs::remove_dir_all(path.parent().unwrap()).unwrap();
}
