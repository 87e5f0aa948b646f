use crate::fs::{FileError, Positioned, SeekOrigin, size_by_seek};
use std::ffi::CString;
use std::fmt::{Debug, Display, Formatter};
use std::io;

#[cfg(test)]
mod tests;

const EOF_MESSAGE: &str = "end-of-file";

/// An owned C library `FILE*`.
pub(crate) struct StandardStream {
    file: *mut libc::FILE,
    last_errno: Option<i32>,
    display: String,
}

// The FILE* is never shared: every access goes through `&mut self` or `&self` of its single owner.
unsafe impl Send for StandardStream {}

impl StandardStream {
    pub(crate) fn open(name: &str, mode: &str) -> Result<Self, FileError> {
        let c_name = CString::new(name).map_err(|_| FileError::InvalidName(name.to_string()))?;
        let c_mode = CString::new(mode).map_err(|_| FileError::InvalidMode(mode.to_string()))?;
        let file = unsafe { libc::fopen(c_name.as_ptr(), c_mode.as_ptr()) };
        if file.is_null() {
            let error = io::Error::last_os_error();
            if error.raw_os_error() == Some(libc::EINVAL) {
                return Err(FileError::InvalidMode(mode.to_string()));
            }
            return Err(FileError::from_io(&error));
        }
        Ok(Self {
            file,
            last_errno: None,
            display: format!("<StandardStream {name} [{mode}]>"),
        })
    }

    fn remember_errno(&mut self) -> io::Error {
        let error = io::Error::last_os_error();
        self.last_errno = error.raw_os_error();
        error
    }

    pub(crate) fn read(&mut self, buffer: &mut [u8], size: usize, count: usize) -> usize {
        if size == 0 {
            return 0;
        }
        let count = count.min(buffer.len() / size);
        if count == 0 {
            return 0;
        }
        let read =
            unsafe { libc::fread(buffer.as_mut_ptr() as *mut libc::c_void, size, count, self.file) };
        if read < count && self.has_error() {
            self.remember_errno();
        }
        read
    }

    pub(crate) fn get_char(&mut self) -> Option<u8> {
        let c = unsafe { libc::fgetc(self.file) };
        if c == libc::EOF {
            if self.has_error() {
                self.remember_errno();
            }
            None
        } else {
            Some(c as u8)
        }
    }

    pub(crate) fn get_string<'b>(&mut self, buffer: &'b mut [u8]) -> Option<&'b [u8]> {
        if buffer.is_empty() {
            return None;
        }
        let limit = buffer.len().min(libc::c_int::MAX as usize);
        let result = unsafe {
            libc::fgets(
                buffer.as_mut_ptr() as *mut libc::c_char,
                limit as libc::c_int,
                self.file,
            )
        };
        if result.is_null() {
            if self.has_error() {
                self.remember_errno();
            }
            return None;
        }
        let length = buffer[..limit]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(limit - 1);
        Some(&buffer[..length])
    }

    pub(crate) fn size(&mut self) -> Result<u64, FileError> {
        size_by_seek(self)
    }

    pub(crate) fn has_error(&self) -> bool {
        unsafe { libc::ferror(self.file) != 0 }
    }

    pub(crate) fn is_eof(&self) -> bool {
        unsafe { libc::feof(self.file) != 0 }
    }

    /// Describes the sticky state of the stream, if any.
    pub(crate) fn error(&self) -> Option<String> {
        if self.has_error() {
            Some(match self.last_errno {
                Some(errno) => io::Error::from_raw_os_error(errno).to_string(),
                None => String::from("Unknown stream error"),
            })
        } else if self.is_eof() {
            Some(String::from(EOF_MESSAGE))
        } else {
            None
        }
    }

    pub(crate) fn close(mut self) -> Result<(), FileError> {
        let file = std::mem::replace(&mut self.file, std::ptr::null_mut());
        if unsafe { libc::fclose(file) } == 0 {
            Ok(())
        } else {
            Err(FileError::StreamError(self.remember_errno().to_string()))
        }
    }
}

impl Positioned for StandardStream {
    type Error = FileError;

    fn tell(&mut self) -> Result<u64, FileError> {
        let position = unsafe { libc::ftell(self.file) };
        if position < 0 {
            Err(FileError::StreamError(self.remember_errno().to_string()))
        } else {
            Ok(position as u64)
        }
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<(), FileError> {
        let whence = match origin {
            SeekOrigin::Start => libc::SEEK_SET,
            SeekOrigin::Current => libc::SEEK_CUR,
            SeekOrigin::End => libc::SEEK_END,
        };
        if unsafe { libc::fseek(self.file, offset as libc::c_long, whence) } == 0 {
            Ok(())
        } else {
            Err(FileError::StreamError(self.remember_errno().to_string()))
        }
    }
}

impl Drop for StandardStream {
    fn drop(&mut self) {
        if !self.file.is_null() && unsafe { libc::fclose(self.file) } != 0 {
            let error = io::Error::last_os_error();
            eprintln!("{self}: Close failed: {error}");
        }
    }
}

impl Display for StandardStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write! {f, "{}", self.display}
    }
}

impl Debug for StandardStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write! {f, "StandardStream: {} {:?}", self.display, self.file}
    }
}
