mod config;
mod fs;
mod handle;
#[cfg(feature = "media")]
mod media;
mod mode;
mod stdio;

pub use config::{ConfigError, HandleConfig};
pub use fs::{BackendKind, FILEHANDLE_ALTERNATE, FILEHANDLE_STANDARD, FileError, SeekOrigin};
pub use handle::FileHandle;
pub use mode::{ModeError, OpenMode};
