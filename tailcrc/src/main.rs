use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use qca_uimage::{LegacyHeader, TailRecord, Version, VersionError, VersionPair};
use std::fs::OpenOptions;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// Writes the ASUS QCA/QCN vendor tail into a uImage header and fixes the
/// header CRC.
#[derive(Parser)]
struct Tailcrc {
    /// uImage to patch.
    #[clap(short, long, value_name = "INPUT_UIMAGE_FILE")]
    input: PathBuf,

    #[clap(short, long, value_name = "OUTPUT_FILE")]
    output: PathBuf,

    /// asuswrt version, e.g. 3.0.0.4.382.52482
    #[clap(short = 'v', long, value_name = "VERSION")]
    version_string: String,

    /// Hardware version stored in the tail; may be given up to five times.
    #[clap(long = "hw", value_name = "MAJOR.MINOR")]
    hw: Vec<VersionPair>,
}

struct Config {
    input: PathBuf,
    output: PathBuf,
    tail: TailRecord,
}

impl Config {
    fn new(args: Tailcrc) -> anyhow::Result<Self> {
        // A malformed version is not fatal; keep whatever fields parsed.
        let version = match Version::parse(&args.version_string) {
            Ok(v) => v,
            Err(VersionError::Incomplete { input, matched, parsed }) => {
                warn!(
                    "Version {} doesn't match supported 6-digits format ({} fields)",
                    input, matched
                );
                parsed
            }
            Err(e) => return Err(e.into()),
        };

        let mut tail = TailRecord::default();
        version.apply(&mut tail);
        tail.set_hw(&args.hw)?;

        Ok(Self {
            input: args.input,
            output: args.output,
            tail,
        })
    }
}

fn write_output(path: &Path, image: &[u8]) -> std::io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    opts.mode(0o644);

    opts.open(path)?.write_all(image)
}

fn run(config: &Config) -> anyhow::Result<u32> {
    let mut image = std::fs::read(&config.input)
        .with_context(|| format!("could not read input file {}", config.input.display()))?;

    let mut tail = config.tail.clone();
    let crc = qca_uimage::patch(&mut image, &mut tail)?;

    let hdr = LegacyHeader::new(&image)?;
    let tail = hdr.tail();
    info!(
        "{}: kernel {}, fs {}, sn {}, en {}, key 0x{:02x}, crc 0x{:08x} ({})",
        tail.product(),
        tail.kernel,
        tail.fs,
        tail.sn,
        tail.en,
        tail.key,
        crc,
        if hdr.verify_crc() { "ok" } else { "BAD" }
    );

    write_output(&config.output, &image)
        .with_context(|| format!("could not write output file {}", config.output.display()))?;

    Ok(crc)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // clap exits with 2 on usage errors; this tool has always used 1.
    let args = match Tailcrc::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let config = Config::new(args)?;
    let crc = run(&config)?;

    println!("success, crc = 0x{:08x}", crc);

    Ok(())
}
