use std::any::type_name;
use std::env;
use std::fs::{File, create_dir};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const _DATA_PATTERN: &str = "ARBITRARY DATA";

#[allow(dead_code)]
pub(crate) fn make_payload(size: usize) -> Vec<u8> {
    let pattern = _DATA_PATTERN.as_bytes();
    pattern.iter().copied().cycle().take(size).collect()
}

fn get_fn_name<T>(_: T) -> &'static str {
    type_name::<T>()
}

pub(crate) fn mk_tmp<T>(test_func: T) -> PathBuf {
    let test_dir_name = get_fn_name(test_func).replace("::", "_");
    let pid = std::process::id();
    let test_tmp_dir = env::temp_dir().join(format!("fhandle_{pid}_{test_dir_name}"));
    create_dir(&test_tmp_dir).unwrap();
    test_tmp_dir
}

pub(crate) fn write_file(path: &Path, data: &[u8]) -> String {
    let mut file = File::create(path).unwrap();
    file.write_all(data).unwrap();
    path.to_string_lossy().to_string()
}

#[allow(dead_code)]
pub(crate) fn run_fhandle<S: AsRef<str>>(args: &[S]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_fhandle"))
        .args(args.iter().map(|arg| arg.as_ref()))
        .output()
        .expect("Failed to run fhandle");
    eprintln!(
        "fhandle exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}
