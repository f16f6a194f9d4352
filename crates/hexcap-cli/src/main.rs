use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use hexcap_core::{
    Capture, CaptureError, CaptureReport, Config, GeneratorError, LayerId, MaskSpec,
    build_report,
};
use tracing::{Level, debug, info};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("HEXCAP_BUILD_COMMIT"),
    " ",
    env!("HEXCAP_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "hexcap")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Inspect and edit captured packets field by field.",
    long_about = None,
    after_help = concat!(
        "Examples:\n",
        "  hexcap pcap dump capture.pcap --stdout --pretty\n",
        "  hexcap pcap edit capture.pcap -o out.pcap --set 1:ipv4:ttl=01\n",
        "  hexcap pcap edit capture.pcap -o out.pcap --generator 1:udp:dport=10,1",
    )
)]
struct Cli {
    /// JSON file with display and sizing settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log decode decisions (debug level)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode a capture and print every packet's layers and columns as JSON.
    Dump(DumpArgs),
    /// Apply column edits, generators and yank/paste, then write a pcap file.
    Edit(EditArgs),
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Path to a .pcap or .pcapng file (a glob matching one file is accepted)
    input: PathBuf,

    /// Output JSON path
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    output: Option<PathBuf>,

    /// Write JSON to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Include the column layout of every layer kind present
    #[arg(long)]
    sections: bool,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Path to a .pcap or .pcapng file (a glob matching one file is accepted)
    input: PathBuf,

    /// Output pcap path; its directory must already exist
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Set a column: PID:LAYER:COLUMN=VALUE (value in display form)
    #[arg(
        long = "set",
        value_name = "PID:LAYER:COLUMN=VALUE",
        value_parser = parse_assignment
    )]
    sets: Vec<Assignment>,

    /// Attach a generator: PID:LAYER:COLUMN=COUNT,STEP
    #[arg(
        long = "generator",
        value_name = "PID:LAYER:COLUMN=COUNT,STEP",
        value_parser = parse_assignment
    )]
    generators: Vec<Assignment>,

    /// Attach a bit mask (1 freezes a bit): PID:LAYER:COLUMN=BITS
    #[arg(
        long = "mask",
        value_name = "PID:LAYER:COLUMN=BITS",
        value_parser = parse_assignment
    )]
    masks: Vec<Assignment>,

    /// Attach a hex mask: PID:LAYER:COLUMN=HEX
    #[arg(
        long = "mask-hex",
        value_name = "PID:LAYER:COLUMN=HEX",
        value_parser = parse_assignment
    )]
    hex_masks: Vec<Assignment>,

    /// Move packets FIRST-LAST (1-based, inclusive) to the clipboard
    #[arg(long, value_name = "FIRST-LAST", value_parser = parse_range)]
    yank: Option<(usize, usize)>,

    /// Paste the yanked packets before packet BEFORE (1-based; count + 1 appends)
    #[arg(long, value_name = "BEFORE", requires = "yank")]
    paste: Option<usize>,

    /// Minimum frame size; shorter frames are zero-padded
    #[arg(long)]
    min_size: Option<usize>,

    /// Maximum frame size; larger frames abort the write
    #[arg(long)]
    max_size: Option<usize>,
}

/// One `PID:LAYER:COLUMN=VALUE` argument, already split.
#[derive(Debug, Clone)]
struct Assignment {
    pid: usize,
    layer: LayerId,
    column: String,
    value: String,
}

fn parse_assignment(arg: &str) -> Result<Assignment, String> {
    let (target, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected PID:LAYER:COLUMN=VALUE, got '{arg}'"))?;
    let mut parts = target.splitn(3, ':');
    let (Some(pid), Some(layer), Some(column)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected PID:LAYER:COLUMN before '=', got '{target}'"));
    };
    let pid = pid
        .parse::<usize>()
        .ok()
        .filter(|pid| *pid > 0)
        .ok_or_else(|| format!("packet id must be a positive integer, got '{pid}'"))?;
    let layer = layer.parse::<LayerId>().map_err(|err| err.to_string())?;
    Ok(Assignment {
        pid,
        layer,
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_range(arg: &str) -> Result<(usize, usize), String> {
    let (first, last) = arg.split_once('-').unwrap_or((arg, arg));
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("expected 1-based FIRST-LAST, got '{arg}'"))
    };
    Ok((parse(first)?, parse(last)?))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Dump(args) => cmd_pcap_dump(args, config, cli.quiet),
            PcapCommands::Edit(args) => cmd_pcap_edit(args, config, cli.quiet),
        },
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<CaptureError> for CliError {
    fn from(err: CaptureError) -> Self {
        let hint = match &err {
            CaptureError::MissingDirectory { .. } => Some("create the directory first".to_string()),
            CaptureError::Packet(_) => {
                Some("raise --max-size or shrink the edited packet".to_string())
            }
            CaptureError::Source(_) => Some("use a valid .pcap or .pcapng file".to_string()),
            CaptureError::OutOfRange { .. } => Some("packet ids are 1-based".to_string()),
            CaptureError::MixedLinktypes { .. } => {
                Some("yank the packets of one link type into a separate file".to_string())
            }
            _ => None,
        };
        CliError::new(err.to_string(), hint)
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            format!("invalid config {}: {err}", path.display()),
            Some("expected JSON with pid_width, mtu, undefined_width, undefined_dots".to_string()),
        )
    })
}

fn cmd_pcap_dump(args: DumpArgs, config: Config, quiet: bool) -> Result<(), CliError> {
    let input = resolve_input_path(&args.input)?;
    validate_input_file(&input)?;
    let meta = fs::metadata(&input)
        .with_context(|| format!("failed to read input file: {}", input.display()))?;

    let capture = Capture::open(&input, config)?;
    let report = build_report(&capture, &input, meta.len(), args.sections);
    let json = serialize_report(&report, args.pretty)?;

    let Some(output) = args.output.filter(|_| !args.stdout) else {
        print!("{}", json);
        return Ok(());
    };
    ensure_distinct(&input, &output)?;
    fs::write(&output, json)
        .with_context(|| format!("failed to write report: {}", output.display()))?;
    if !quiet {
        eprintln!("OK: report written -> {}", output.display());
    }
    Ok(())
}

fn cmd_pcap_edit(args: EditArgs, config: Config, quiet: bool) -> Result<(), CliError> {
    let input = resolve_input_path(&args.input)?;
    validate_input_file(&input)?;
    ensure_distinct(&input, &args.output)?;

    let mut capture = Capture::open(&input, config)?;
    apply_size_bounds(&mut capture, args.min_size, args.max_size)?;

    for set in &args.sets {
        let packet = packet_for(&mut capture, set)?;
        packet
            .set_column(set.layer, &set.column, &set.value)
            .map_err(|err| {
                CliError::new(
                    format!("cannot set {}: {err}", describe(set)),
                    Some("values use the column's display form, e.g. c0.a8.00.01".to_string()),
                )
            })?;
        debug!(target = %describe(set), value = %set.value, "column set");
    }

    for generator in &args.generators {
        let (count, step) = parse_count_step(&generator.value)?;
        let packet = packet_for(&mut capture, generator)?;
        packet
            .add_generator(generator.layer, &generator.column, count, step)
            .map_err(|err| generator_error(generator, err))?;
    }

    let masks = args
        .masks
        .iter()
        .map(|m| (m, MaskSpec::Bits(m.value.clone())))
        .chain(args.hex_masks.iter().map(|m| (m, MaskSpec::Hex(m.value.clone()))));
    for (assignment, mask) in masks {
        let packet = packet_for(&mut capture, assignment)?;
        packet
            .add_mask(assignment.layer, &assignment.column, &mask)
            .map_err(|err| generator_error(assignment, err))?;
    }

    if let Some((first, last)) = args.yank {
        let yanked = capture.yank(first - 1, last - 1)?;
        info!(yanked, "packets yanked");
        if let Some(before) = args.paste {
            capture.paste(before.saturating_sub(1))?;
        }
    }

    capture.save_as(&args.output)?;
    if !quiet {
        eprintln!("OK: capture written -> {}", args.output.display());
    }
    Ok(())
}

fn apply_size_bounds(
    capture: &mut Capture,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), CliError> {
    match (min, max) {
        (Some(min), Some(max)) => capture.set_pkt_size_range(min, max)?,
        (Some(min), None) => capture.set_min_pkt_size(min),
        (None, Some(max)) => capture.set_max_pkt_size(max),
        (None, None) => {}
    }
    Ok(())
}

fn packet_for<'a>(
    capture: &'a mut Capture,
    assignment: &Assignment,
) -> Result<&'a mut hexcap_core::Packet, CliError> {
    let len = capture.len();
    capture.packet_mut(assignment.pid - 1).ok_or_else(|| {
        CliError::new(
            format!("packet {} does not exist", assignment.pid),
            Some(format!("the capture holds packets 1 to {len}")),
        )
    })
}

fn parse_count_step(value: &str) -> Result<(u32, i64), CliError> {
    let invalid = || {
        CliError::new(
            format!("invalid generator '{value}'"),
            Some("use COUNT,STEP, e.g. 10,1 or 5,-2".to_string()),
        )
    };
    let (count, step) = value.split_once(',').ok_or_else(invalid)?;
    let count = count.trim().parse().map_err(|_| invalid())?;
    let step = step.trim().parse().map_err(|_| invalid())?;
    Ok((count, step))
}

fn generator_error(assignment: &Assignment, err: GeneratorError) -> CliError {
    let hint = match &err {
        GeneratorError::InvalidMask { .. } => {
            Some("a mask needs one contiguous run of 0 bits".to_string())
        }
        GeneratorError::MaskTooLong { .. } => Some("shorten the mask".to_string()),
        GeneratorError::Unsupported => {
            Some("packets that were not fully decoded cannot be edited".to_string())
        }
        _ => None,
    };
    CliError::new(format!("{}: {err}", describe(assignment)), hint)
}

fn describe(assignment: &Assignment) -> String {
    format!(
        "packet {} {} {}",
        assignment.pid, assignment.layer, assignment.column
    )
}

fn serialize_report(report: &CaptureReport, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn ensure_distinct(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("failed to resolve input path: {}", input.display()))?;
    let parent = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let (Ok(dir), Some(name)) = (fs::canonicalize(parent), output.file_name()) else {
        // a missing directory is reported when writing
        return Ok(());
    };
    if dir.join(name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        n => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if n > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{pattern}' ({n} matches); matches: {listed}"
                ),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
