use clap::Parser;
use fhandle::{BackendKind, FileHandle, HandleConfig, SeekOrigin};
use std::io::{Write, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

const CHUNK_SIZE: usize = 4096;

const STRING_LIMIT: usize = 256;

#[derive(Parser, Debug)]
#[command(color = clap::ColorChoice::Never)]
struct Args {
    #[arg(help = "Resource to open")]
    path: String,

    #[arg(
        short = 'b',
        long,
        help = "I/O backend: standard or alternate",
        long_help = "Backend to open the resource with. Overrides the backend from the config file."
    )]
    backend: Option<BackendKind>,

    #[arg(short = 'm', long, help = "fopen-style open mode")]
    mode: Option<String>,

    #[arg(short = 'c', long, help = "JSON handle config")]
    config: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Start offset",
        long_help = "Offset to seek to before reading. Negative values are relative to the end of the resource."
    )]
    offset: i64,

    #[arg(short = 'n', long, help = "Number of bytes to dump")]
    length: Option<u64>,

    #[arg(short = 's', long, help = "Print size and position instead of data")]
    stat: bool,

    #[arg(
        short = 'l',
        long,
        help = "Print strings instead of raw data",
        long_help = "Print up to COUNT strings read through the handle, one per output line."
    )]
    lines: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => match HandleConfig::load(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("{error}");
                return ExitCode::FAILURE;
            }
        },
        None => HandleConfig::default(),
    };
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(mode) = &args.mode {
        config.mode = mode.clone();
    }
    if !config.backend.is_available() {
        eprintln!("Backend {} is not available in this build", config.backend);
        return ExitCode::FAILURE;
    }
    let mut handle = match config.open(&args.path) {
        Ok(handle) => handle,
        Err(error) => {
            eprintln!("Can't open {} with {config}: {error}", args.path);
            return ExitCode::FAILURE;
        }
    };
    let result = dump(&args, &mut handle);
    let display = handle.to_string();
    let close_result = handle.close();
    if let Err(message) = result {
        eprintln!("{message}");
        return ExitCode::FAILURE;
    }
    if let Err(error) = close_result {
        eprintln!("{display}: Close failed: {error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn dump(args: &Args, handle: &mut FileHandle) -> Result<(), String> {
    let origin = if args.offset < 0 {
        SeekOrigin::End
    } else {
        SeekOrigin::Start
    };
    handle
        .seek(args.offset, origin)
        .map_err(|error| format!("{handle}: Seek to {} failed: {error}", args.offset))?;
    let mut output = stdout().lock();
    if args.stat {
        let size = handle
            .size()
            .map_err(|error| format!("{handle}: Can't get size: {error}"))?;
        let position = handle
            .tell()
            .map_err(|error| format!("{handle}: Can't get position: {error}"))?;
        writeln!(output, "size {size}\nposition {position}").map_err(output_error)?;
        return Ok(());
    }
    match args.lines {
        Some(count) => dump_strings(handle, count, &mut output),
        None => dump_bytes(handle, args.length, &mut output),
    }
}

fn dump_bytes<W: Write>(
    handle: &mut FileHandle,
    length: Option<u64>,
    output: &mut W,
) -> Result<(), String> {
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut remaining = length.unwrap_or(u64::MAX);
    while remaining > 0 {
        let wanted = remaining.min(CHUNK_SIZE as u64) as usize;
        let read = handle.read(&mut buffer, 1, wanted);
        output.write_all(&buffer[..read]).map_err(output_error)?;
        remaining -= read as u64;
        if read < wanted {
            if handle.check_error() || !handle.eof() {
                return Err(read_error(handle));
            }
            break;
        }
    }
    output.flush().map_err(output_error)
}

fn dump_strings<W: Write>(
    handle: &mut FileHandle,
    count: usize,
    output: &mut W,
) -> Result<(), String> {
    let mut buffer = [0u8; STRING_LIMIT];
    for _ in 0..count {
        let Some(text) = handle.get_string(&mut buffer) else {
            if handle.check_error() || !handle.eof() {
                return Err(read_error(handle));
            }
            break;
        };
        output.write_all(text).map_err(output_error)?;
        if !text.ends_with(b"\n") {
            output.write_all(b"\n").map_err(output_error)?;
        }
    }
    output.flush().map_err(output_error)
}

fn read_error(handle: &FileHandle) -> String {
    let reason = handle
        .error()
        .unwrap_or_else(|| String::from("unknown error"));
    format!("{handle}: Read failed: {reason}")
}

fn output_error(error: std::io::Error) -> String {
    format!("Can't write output: {error}")
}
