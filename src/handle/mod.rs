use crate::fs::{BackendKind, FileError, Positioned, SeekOrigin};
#[cfg(feature = "media")]
use crate::media::{MediaError, MediaStream};
use crate::stdio::StandardStream;
use std::fmt::{Debug, Display, Formatter};
#[cfg(feature = "media")]
use std::io::ErrorKind;



enum Native {
    Standard(StandardStream),
    #[cfg(feature = "media")]
    Alternate(MediaStream),
}

/// A file opened through one of the two backends.
///
/// Every operation is answered by the backend chosen at open time. Failures
/// of the alternate backend are remembered and exposed through [`FileHandle::error`].
pub struct FileHandle {
    kind: BackendKind,
    native: Native,
    #[cfg(feature = "media")]
    last_error: Option<String>,
    display: String,
}

fn unknown_handle_type(requested: impl Display) -> ! {
    panic!("File_Open: unknown file handle type {requested}!")
}

#[cfg(feature = "media")]
fn record<T>(
    last_error: &mut Option<String>,
    result: Result<T, MediaError>,
) -> Result<T, MediaError> {
    if let Err(error) = &result {
        *last_error = Some(error.to_string());
    }
    result
}

impl FileHandle {
    /// Opens `name` with an fopen-style `mode` using the `kind` backend.
    ///
    /// Panics if `kind` is not built into this binary.
    pub fn open(name: &str, mode: &str, kind: BackendKind) -> Result<Self, FileError> {
        let native = match kind {
            BackendKind::Standard => Native::Standard(StandardStream::open(name, mode)?),
            #[cfg(feature = "media")]
            BackendKind::Alternate => Native::Alternate(
                MediaStream::from_file(name, mode)
                    .map_err(|error| media_open_error(mode, error))?,
            ),
            #[allow(unreachable_patterns)]
            other => unknown_handle_type(other.tag()),
        };
        Ok(Self {
            kind,
            native,
            #[cfg(feature = "media")]
            last_error: None,
            display: format!("<FileHandle {name} [{kind}]>"),
        })
    }

    /// Same as [`FileHandle::open`] with the backend given by its raw type tag.
    pub fn open_tagged(name: &str, mode: &str, tag: u32) -> Result<Self, FileError> {
        match BackendKind::from_tag(tag) {
            Some(kind) => Self::open(name, mode, kind),
            None => unknown_handle_type(tag),
        }
    }

    /// Wraps an in-memory resource into an alternate backend handle.
    #[cfg(feature = "media")]
    pub fn from_memory<T: Into<Vec<u8>>>(data: T) -> Self {
        let stream = MediaStream::from_memory(data.into());
        let display = format!("<FileHandle {stream} [{}]>", BackendKind::Alternate);
        Self {
            kind: BackendKind::Alternate,
            native: Native::Alternate(stream),
            last_error: None,
            display,
        }
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Reads up to `count` elements of `size` bytes into `buffer`.
    ///
    /// Returns the number of whole elements read; a short count means end of stream or an error.
    pub fn read(&mut self, buffer: &mut [u8], size: usize, count: usize) -> usize {
        match &mut self.native {
            Native::Standard(stream) => stream.read(buffer, size, count),
            #[cfg(feature = "media")]
            Native::Alternate(stream) => {
                record(&mut self.last_error, stream.read(buffer, size, count)).unwrap_or(0)
            }
        }
    }

    pub fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<(), FileError> {
        match &mut self.native {
            Native::Standard(stream) => stream.seek(offset, origin),
            #[cfg(feature = "media")]
            Native::Alternate(stream) => {
                record(&mut self.last_error, stream.seek(offset, origin)).map_err(stream_error)
            }
        }
    }

    pub fn tell(&mut self) -> Result<u64, FileError> {
        match &mut self.native {
            Native::Standard(stream) => stream.tell(),
            #[cfg(feature = "media")]
            Native::Alternate(stream) => {
                record(&mut self.last_error, stream.tell()).map_err(stream_error)
            }
        }
    }

    /// Total length of the stream in bytes. The current position is preserved.
    pub fn size(&mut self) -> Result<u64, FileError> {
        match &mut self.native {
            Native::Standard(stream) => stream.size(),
            #[cfg(feature = "media")]
            Native::Alternate(stream) => {
                record(&mut self.last_error, stream.size()).map_err(stream_error)
            }
        }
    }

    /// Next byte of the stream, `None` at end of stream or on error.
    pub fn get_char(&mut self) -> Option<u8> {
        match &mut self.native {
            Native::Standard(stream) => stream.get_char(),
            #[cfg(feature = "media")]
            Native::Alternate(stream) => {
                let mut c = [0u8; 1];
                match record(&mut self.last_error, stream.read(&mut c, 1, 1)) {
                    Ok(1) => Some(c[0]),
                    _ => None,
                }
            }
        }
    }

    /// Fills `buffer` with at most `buffer.len() - 1` bytes and NUL-terminates it.
    ///
    /// The standard backend stops after a newline. The alternate backend reads
    /// `buffer.len() - 1` bytes in one go regardless of newlines.
    pub fn get_string<'b>(&mut self, buffer: &'b mut [u8]) -> Option<&'b [u8]> {
        match &mut self.native {
            Native::Standard(stream) => stream.get_string(buffer),
            #[cfg(feature = "media")]
            Native::Alternate(stream) => {
                let wanted = buffer.len().checked_sub(1)?;
                match record(&mut self.last_error, stream.read(buffer, 1, wanted)) {
                    Ok(0) | Err(_) => None,
                    Ok(read) => {
                        buffer[read] = 0;
                        Some(&buffer[..read])
                    }
                }
            }
        }
    }

    /// Last known error message of the handle.
    pub fn error(&self) -> Option<String> {
        match &self.native {
            Native::Standard(stream) => stream.error(),
            #[cfg(feature = "media")]
            Native::Alternate(_) => self.last_error.clone(),
        }
    }

    pub fn eof(&mut self) -> bool {
        match &mut self.native {
            Native::Standard(stream) => stream.is_eof(),
            #[cfg(feature = "media")]
            Native::Alternate(stream) => {
                let Ok(size) = record(&mut self.last_error, stream.size()) else {
                    return true;
                };
                match stream.tell() {
                    Ok(position) => position >= size,
                    Err(_) => true,
                }
            }
        }
    }

    /// Sticky error flag of the native stream. Always `false` for the alternate backend.
    pub fn check_error(&self) -> bool {
        match &self.native {
            Native::Standard(stream) => stream.has_error(),
            #[cfg(feature = "media")]
            Native::Alternate(_) => false,
        }
    }

    /// Closes the native stream and returns its close status.
    pub fn close(self) -> Result<(), FileError> {
        match self.native {
            Native::Standard(stream) => stream.close(),
            #[cfg(feature = "media")]
            Native::Alternate(stream) => stream.close().map_err(stream_error),
        }
    }
}

#[cfg(feature = "media")]
fn stream_error(error: MediaError) -> FileError {
    FileError::StreamError(error.into_message())
}

#[cfg(feature = "media")]
fn media_open_error(mode: &str, error: MediaError) -> FileError {
    match error.cause() {
        Some(ErrorKind::NotFound) => FileError::FileNotFound,
        Some(ErrorKind::PermissionDenied) => FileError::AccessViolation,
        Some(_) => FileError::UnknownError(error.into_message()),
        None => FileError::InvalidMode(mode.to_string()),
    }
}

impl Display for FileHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write! {f, "{}", self.display}
    }
}

impl Debug for FileHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.native {
            Native::Standard(stream) => write!(f, "FileHandle: {stream:?}"),
            #[cfg(feature = "media")]
            Native::Alternate(stream) => {
                write!(f, "FileHandle: {stream:?} last error {:?}", self.last_error)
            }
        }
    }
}
