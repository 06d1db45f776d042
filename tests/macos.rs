#![cfg(target_os = "macos")]

use dylib_shim::*;

#[test]
fn test_load_system() {
	let mut loader = Loader::new();
	let handle = loader.load("/usr/lib/libSystem.B.dylib").unwrap();
	assert_eq!(loader.module_handle("libSystem.B"), Some(handle));
	assert!(loader.proc_address(handle, "malloc").is_some());
	assert!(loader.proc_address(handle, "no_such_fn").is_none());
	loader.unload(handle).unwrap();
}

#[test]
fn test_images_include_libsystem() {
	assert!(img::Images::now().any(|path| path.to_string_lossy().contains("libSystem")));
}
