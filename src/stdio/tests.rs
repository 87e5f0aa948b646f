use super::*;
use std::any::type_name;
use std::env;
use std::fs::{File, Permissions, create_dir, set_permissions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

const DATA_PATTERN: &str = "ARBITRARY DATA";

fn get_fn_name<T>(_: T) -> &'static str {
    type_name::<T>()
}

fn mk_tmp<T>(test_func: T) -> PathBuf {
    let test_dir_name = get_fn_name(test_func).replace("::", "_");
    let pid = std::process::id();
    let test_tmp_dir = env::temp_dir().join(format!("fhandle_{pid}_{test_dir_name}"));
    create_dir(&test_tmp_dir).unwrap();
    test_tmp_dir
}

fn make_payload(size: usize) -> Vec<u8> {
    let pattern = DATA_PATTERN.as_bytes();
    pattern.iter().copied().cycle().take(size).collect()
}

fn write_file(path: &PathBuf, data: &[u8]) -> String {
    let mut file = File::create(path).unwrap();
    file.write_all(data).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn open_non_existent() {
    let result = StandardStream::open("/nonexistent/nonexistent.file", "rb");
    assert_eq!(result.err().unwrap(), FileError::FileNotFound);
}

#[test]
fn open_access_denied() {
    if unsafe { libc::geteuid() } == 0 {
        eprintln!("The test is not intended to be run under root privileges");
        return;
    }
    let directory = mk_tmp(open_access_denied);
    let path = write_file(&directory.join("locked"), b"locked");
    set_permissions(&path, Permissions::from_mode(0o200)).unwrap();
    let result = StandardStream::open(&path, "rb");
    assert_eq!(result.err().unwrap(), FileError::AccessViolation);
}

#[test]
fn open_name_with_nul() {
    let result = StandardStream::open("bad\0name", "rb");
    assert!(matches!(result.err().unwrap(), FileError::InvalidName(_)));
}

#[test]
fn size_and_initial_position() {
    let directory = mk_tmp(size_and_initial_position);
    let path = write_file(&directory.join("payload"), &make_payload(1000));
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    assert_eq!(stream.tell().unwrap(), 0);
    assert_eq!(stream.size().unwrap(), 1000);
    assert_eq!(stream.tell().unwrap(), 0);
}

#[test]
fn size_keeps_position() {
    let directory = mk_tmp(size_keeps_position);
    let path = write_file(&directory.join("payload"), &make_payload(300));
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    stream.seek(123, SeekOrigin::Start).unwrap();
    assert_eq!(stream.size().unwrap(), 300);
    assert_eq!(stream.tell().unwrap(), 123);
}

#[test]
fn read_elements() {
    let directory = mk_tmp(read_elements);
    let payload = make_payload(64);
    let path = write_file(&directory.join("payload"), &payload);
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    let mut buffer = [0u8; 64];
    assert_eq!(stream.read(&mut buffer, 4, 10), 10);
    assert_eq!(&buffer[..40], &payload[..40]);
    assert_eq!(stream.tell().unwrap(), 40);
}

#[test]
fn short_read_sets_eof() {
    let directory = mk_tmp(short_read_sets_eof);
    let path = write_file(&directory.join("payload"), &make_payload(25));
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    let mut buffer = [0u8; 40];
    assert_eq!(stream.read(&mut buffer, 10, 4), 2);
    assert!(stream.is_eof());
    assert!(!stream.has_error());
    assert_eq!(stream.error().unwrap(), "end-of-file");
}

#[test]
fn read_count_clamped_to_buffer() {
    let directory = mk_tmp(read_count_clamped_to_buffer);
    let path = write_file(&directory.join("payload"), &make_payload(100));
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    let mut buffer = [0u8; 8];
    assert_eq!(stream.read(&mut buffer, 2, 100), 4);
    assert_eq!(stream.read(&mut buffer, 0, 100), 0);
}

#[test]
fn get_char_until_eof() {
    let directory = mk_tmp(get_char_until_eof);
    let path = write_file(&directory.join("payload"), b"ab");
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    assert_eq!(stream.get_char(), Some(b'a'));
    assert_eq!(stream.get_char(), Some(b'b'));
    assert_eq!(stream.get_char(), None);
    assert!(stream.is_eof());
}

#[test]
fn get_string_stops_at_newline() {
    let directory = mk_tmp(get_string_stops_at_newline);
    let path = write_file(&directory.join("lines"), b"first\nsecond\n");
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    let mut buffer = [0xFFu8; 32];
    assert_eq!(stream.get_string(&mut buffer).unwrap(), b"first\n");
    assert_eq!(buffer[6], 0);
    assert_eq!(stream.get_string(&mut buffer).unwrap(), b"second\n");
    assert!(stream.get_string(&mut buffer).is_none());
}

#[test]
fn get_string_truncates() {
    let directory = mk_tmp(get_string_truncates);
    let path = write_file(&directory.join("lines"), b"abcdefgh\n");
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    let mut buffer = [0u8; 4];
    assert_eq!(stream.get_string(&mut buffer).unwrap(), b"abc");
    assert_eq!(buffer[3], 0);
    assert!(stream.get_string(&mut []).is_none());
}

#[test]
fn read_write_only_sets_error() {
    let directory = mk_tmp(read_write_only_sets_error);
    let path = directory.join("output").to_string_lossy().to_string();
    let mut stream = StandardStream::open(&path, "wb").unwrap();
    let mut buffer = [0u8; 16];
    assert_eq!(stream.read(&mut buffer, 1, 16), 0);
    assert!(stream.has_error());
    let message = stream.error().unwrap();
    assert!(message.contains("Bad file descriptor"), "{message}");
}

#[test]
fn seek_negative_fails() {
    let directory = mk_tmp(seek_negative_fails);
    let path = write_file(&directory.join("payload"), &make_payload(10));
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    assert!(stream.seek(-5, SeekOrigin::Start).is_err());
    assert_eq!(stream.tell().unwrap(), 0);
}

#[test]
fn seek_origins() {
    let directory = mk_tmp(seek_origins);
    let path = write_file(&directory.join("payload"), &make_payload(100));
    let mut stream = StandardStream::open(&path, "rb").unwrap();
    stream.seek(10, SeekOrigin::Start).unwrap();
    stream.seek(5, SeekOrigin::Current).unwrap();
    assert_eq!(stream.tell().unwrap(), 15);
    stream.seek(-20, SeekOrigin::End).unwrap();
    assert_eq!(stream.tell().unwrap(), 80);
}

#[test]
fn close_reports_success() {
    let directory = mk_tmp(close_reports_success);
    let path = write_file(&directory.join("payload"), &make_payload(10));
    let stream = StandardStream::open(&path, "rb").unwrap();
    assert!(stream.close().is_ok());
}
