use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;


/// Access requested by an fopen-style mode string such as `"rb"` or `"w+"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    read: bool,
    write: bool,
    append: bool,
    truncate: bool,
    create: bool,
    exclusive: bool,
}

impl OpenMode {
    pub fn parse(mode: &str) -> Result<Self, ModeError> {
        let mut chars = mode.chars();
        let mut result = match chars.next() {
            Some('r') => Self::with_access(true, false),
            Some('w') => Self {
                truncate: true,
                create: true,
                ..Self::with_access(false, true)
            },
            Some('a') => Self {
                append: true,
                create: true,
                ..Self::with_access(false, true)
            },
            Some(other) => return Err(ModeError::UnknownAccess(other)),
            None => return Err(ModeError::Empty),
        };
        for modifier in chars {
            match modifier {
                '+' => {
                    result.read = true;
                    result.write = true;
                }
                'b' | 't' | 'e' | 'm' | 'c' => {}
                'x' if result.truncate => result.exclusive = true,
                other => return Err(ModeError::UnknownModifier(other)),
            }
        }
        Ok(result)
    }

    fn with_access(read: bool, write: bool) -> Self {
        Self {
            read,
            write,
            append: false,
            truncate: false,
            create: false,
            exclusive: false,
        }
    }

    pub fn is_readable(&self) -> bool {
        self.read
    }

    pub fn is_append(&self) -> bool {
        self.append
    }

    pub fn to_open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.read).write(self.write);
        if self.append {
            options.append(true);
        }
        if self.exclusive {
            options.create_new(true);
        } else {
            options.create(self.create).truncate(self.truncate);
        }
        options
    }
}

#[derive(Debug, PartialEq)]
pub enum ModeError {
    Empty,
    UnknownAccess(char),
    UnknownModifier(char),
}

impl Display for ModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeError::Empty => write!(f, "Empty open mode"),
            ModeError::UnknownAccess(c) => write!(f, "Unknown access mode '{c}'"),
            ModeError::UnknownModifier(c) => write!(f, "Unknown mode modifier '{c}'"),
        }
    }
}

impl std::error::Error for ModeError {}
