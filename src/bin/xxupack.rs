//! xxupack command-line binary

use chrono::NaiveDate;
use clap::Parser;
use std::{env, panic, path::PathBuf, process};
use xxupack::exceptions::XxuError;
use xxupack::exit_codes::{
    EXIT_CONFIG_ERROR, EXIT_ERROR, EXIT_IO_ERROR, EXIT_PACK_ERROR, EXIT_PANIC, EXIT_SUCCESS,
};
use xxupack::xxu::config::{parse_byte_value, parse_date_value};
use xxupack::{CalcModel, HighBitMode, OsVersion, PackConfig, pack_to_path};

const VERSION: &str = xxupack::version::VERSION;

#[derive(Parser, Debug)]
#[command(version = VERSION, about = "Pack an Intel-HEX firmware image into an XXU OS-upgrade container")]
struct Args {
    /// Input hex file (defaults to standard input)
    hex_file: Option<PathBuf>,

    /// Output XXU file ('-' or omitted: standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target calculator preset (73, 83p or 84p); sets calc and cert ids
    #[arg(short, long, value_parser = parse_model)]
    target: Option<CalcModel>,

    /// Calculator (link device) ID byte, decimal or 0x hex
    #[arg(short, long, value_parser = parse_byte)]
    calc_id: Option<u8>,

    /// Certificate ID byte, decimal or 0x hex
    #[arg(short = 'q', long, value_parser = parse_byte)]
    cert_id: Option<u8>,

    /// OS version as MAJOR.MINOR (default 1.0)
    #[arg(short = 'v', long, value_parser = parse_version)]
    os_version: Option<OsVersion>,

    /// Maximum compatible hardware version byte (default 0xFF)
    #[arg(long, value_parser = parse_byte)]
    hardware: Option<u8>,

    /// Declared program size (apparently unnecessary)
    #[arg(short = 's', long)]
    os_size: Option<u32>,

    /// Declared image size (almost certainly unnecessary)
    #[arg(short = 'i', long)]
    image_size: Option<u32>,

    /// Date stamp as YYYY-MM-DD (defaults to today)
    #[arg(short, long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Policy for payload bytes with the high bit set: drop or reject
    #[arg(long, default_value = "drop", value_parser = parse_high_bit)]
    high_bit: HighBitMode,

    /// Log level (trace, debug, info, warn, error; prefix with 'json:' for JSON)
    #[arg(long)]
    log_level: Option<String>,
}

fn parse_model(s: &str) -> Result<CalcModel, String> {
    s.parse().map_err(|e: XxuError| e.to_string())
}

fn parse_byte(s: &str) -> Result<u8, String> {
    parse_byte_value(s).map_err(|e| e.to_string())
}

fn parse_version(s: &str) -> Result<OsVersion, String> {
    s.parse().map_err(|e: XxuError| e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_date_value(s).map_err(|e| e.to_string())
}

fn parse_high_bit(s: &str) -> Result<HighBitMode, String> {
    s.parse().map_err(|e: XxuError| e.to_string())
}

fn main() {
    // Set up panic handler to return a specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {panic_info}");
        process::exit(EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in xxupack");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("xxupack {}", xxupack::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = Args::parse();

    if let Some(ref level) = args.log_level {
        xxupack::logger::JsonLogger::init_with_level(level);
    } else {
        xxupack::logger::JsonLogger::init();
    }

    let mut config = PackConfig::default();
    if let Some(model) = args.target {
        config = config.with_model(model);
    }
    // Explicit ids override the preset
    if let Some(calc_id) = args.calc_id {
        config.calc_id = calc_id;
    }
    if let Some(cert_id) = args.cert_id {
        config.cert_id = cert_id;
    }
    if let Some(version) = args.os_version {
        config.version = version;
    }
    if let Some(hardware) = args.hardware {
        config.hardware_max = hardware;
    }
    if let Some(os_size) = args.os_size {
        config.os_size = os_size;
    }
    if let Some(image_size) = args.image_size {
        config.image_size = image_size;
    }
    if let Some(date) = args.date {
        config.date = date;
    }
    config.high_bit = args.high_bit;

    let output = args
        .output
        .filter(|path| path.as_os_str() != "-");

    match pack_to_path(&config, args.hex_file.as_deref(), output.as_deref()) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("xxupack: {e}");
            match e {
                XxuError::ConfigError(_) => EXIT_CONFIG_ERROR,
                XxuError::InputError(_) | XxuError::OutputError(_) | XxuError::IoError(_) => {
                    EXIT_IO_ERROR
                }
                XxuError::PayloadError(_) => EXIT_PACK_ERROR,
                XxuError::Generic(_) => EXIT_ERROR,
            }
        }
    }
}
