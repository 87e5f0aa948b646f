use crate::fs::{Positioned, SeekOrigin, size_by_seek};
use crate::mode::OpenMode;
use std::fmt::{Debug, Display, Formatter};
use std::fs::File;
use std::io;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::os::fd::IntoRawFd;


/// Error text reported by the media library for a failed call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MediaError {
    message: String,
    cause: Option<ErrorKind>,
}

impl MediaError {
    fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    fn from_io<T: Into<String>>(message: T, error: &io::Error) -> Self {
        Self {
            message: message.into(),
            cause: Some(error.kind()),
        }
    }

    /// Operating system error kind behind the failure, when there is one.
    pub(crate) fn cause(&self) -> Option<ErrorKind> {
        self.cause
    }

    pub(crate) fn into_message(self) -> String {
        self.message
    }
}

impl Display for MediaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write! {f, "{}", self.message}
    }
}

enum Source {
    File(File),
    Memory { data: Vec<u8>, position: u64 },
}

/// A media-library stream reading either a file or an owned memory block.
pub(crate) struct MediaStream {
    source: Source,
    display: String,
}

impl MediaStream {
    pub(crate) fn from_file(name: &str, mode: &str) -> Result<Self, MediaError> {
        let open_mode = OpenMode::parse(mode)
            .map_err(|error| MediaError::new(format!("Couldn't open {name}: {error}")))?;
        let mut file = open_mode
            .to_open_options()
            .open(name)
            .map_err(|error| open_error(name, &error))?;
        // Write-only append streams start at the end, update streams at the beginning.
        if open_mode.is_append() && !open_mode.is_readable() {
            file.seek(SeekFrom::End(0))
                .map_err(|error| open_error(name, &error))?;
        }
        Ok(Self {
            source: Source::File(file),
            display: format!("<MediaStream {name} [{mode}]>"),
        })
    }

    pub(crate) fn from_memory(data: Vec<u8>) -> Self {
        let display = format!("<MediaStream memory [{} bytes]>", data.len());
        Self {
            source: Source::Memory { data, position: 0 },
            display,
        }
    }

    /// Reads up to `count` objects of `size` bytes and returns how many were read in full.
    pub(crate) fn read(
        &mut self,
        buffer: &mut [u8],
        size: usize,
        count: usize,
    ) -> Result<usize, MediaError> {
        let wanted = match size.checked_mul(count) {
            Some(0) | None => return Ok(0),
            Some(wanted) => wanted.min(buffer.len() - buffer.len() % size),
        };
        let target = &mut buffer[..wanted];
        let total = match &mut self.source {
            Source::File(file) => read_file(file, target)?,
            Source::Memory { data, position } => {
                let start = (*position as usize).min(data.len());
                let available = (data.len() - start).min(target.len());
                target[..available].copy_from_slice(&data[start..start + available]);
                *position = (start + available) as u64;
                available
            }
        };
        Ok(total / size)
    }

    pub(crate) fn size(&mut self) -> Result<u64, MediaError> {
        if let Source::Memory { data, .. } = &self.source {
            return Ok(data.len() as u64);
        }
        size_by_seek(self)
    }

    pub(crate) fn close(self) -> Result<(), MediaError> {
        match self.source {
            Source::File(file) => {
                let fd = file.into_raw_fd();
                if unsafe { libc::close(fd) } == 0 {
                    Ok(())
                } else {
                    let error = io::Error::last_os_error();
                    Err(MediaError::from_io(
                        format!("Error closing datastream: {error}"),
                        &error,
                    ))
                }
            }
            Source::Memory { .. } => Ok(()),
        }
    }
}

fn open_error(name: &str, error: &io::Error) -> MediaError {
    MediaError::from_io(format!("Couldn't open {name}: {error}"), error)
}

fn seek_error(error: &io::Error) -> MediaError {
    MediaError::from_io(format!("Error seeking in datastream: {error}"), error)
}

fn read_file(file: &mut File, target: &mut [u8]) -> Result<usize, MediaError> {
    let mut total = 0;
    while total < target.len() {
        match file.read(&mut target[total..]) {
            Ok(0) => break,
            Ok(read) => total += read,
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) if total == 0 => {
                return Err(MediaError::from_io(
                    format!("Error reading from datastream: {error}"),
                    &error,
                ));
            }
            Err(_) => break,
        }
    }
    Ok(total)
}

impl Positioned for MediaStream {
    type Error = MediaError;

    fn tell(&mut self) -> Result<u64, MediaError> {
        match &mut self.source {
            Source::File(file) => file.stream_position().map_err(|error| seek_error(&error)),
            Source::Memory { position, .. } => Ok(*position),
        }
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<(), MediaError> {
        match &mut self.source {
            Source::File(file) => {
                let target = match origin {
                    SeekOrigin::Start => {
                        if offset < 0 {
                            return Err(MediaError::new(
                                "Error seeking in datastream: negative offset",
                            ));
                        }
                        SeekFrom::Start(offset as u64)
                    }
                    SeekOrigin::Current => SeekFrom::Current(offset),
                    SeekOrigin::End => SeekFrom::End(offset),
                };
                file.seek(target).map(|_| ()).map_err(|error| seek_error(&error))
            }
            Source::Memory { data, position } => {
                let base = match origin {
                    SeekOrigin::Start => 0,
                    SeekOrigin::Current => *position as i64,
                    SeekOrigin::End => data.len() as i64,
                };
                // Memory streams clamp the new position to the buffer.
                *position = base.saturating_add(offset).clamp(0, data.len() as i64) as u64;
                Ok(())
            }
        }
    }
}

impl Display for MediaStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write! {f, "{}", self.display}
    }
}

impl Debug for MediaStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Source::File(file) => write!(f, "MediaStream: {} {:?}", self.display, file),
            Source::Memory { position, .. } => {
                write!(f, "MediaStream: {} at {position}", self.display)
            }
        }
    }
}
