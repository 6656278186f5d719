//! rs16fec - protect and recover fixed-size codec slots
//!
//! Files are handled as streams of frames: `encode` turns payload bytes into
//! slots, `decode` turns slots back into payload bytes.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

use rs16fec::slot_plan::data_size;
use rs16fec::{decode_frames, encode_frames, BatchConfig, DecodeOptions, Epmr, FecMode, SlotBytes, SlotPlan, Validity};

fn slot_bytes_arg() -> Arg {
    Arg::new("slot_bytes")
        .short('s')
        .long("slot-bytes")
        .help("Slot size in bytes (40..=400)")
        .value_name("BYTES")
        .required(true)
        .value_parser(clap::value_parser!(usize))
}

fn mode_arg() -> Arg {
    Arg::new("mode")
        .short('m')
        .long("mode")
        .help("FEC mode (0 = off, 1..=4 = increasing protection)")
        .value_name("MODE")
        .value_parser(clap::value_parser!(u8))
}

fn ccc_arg() -> Arg {
    Arg::new("ccc")
        .long("ccc")
        .help("Combined channel coding: disable partial concealment")
        .action(ArgAction::SetTrue)
}

fn threading_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of CPU threads (0 = auto-detect)")
                .value_name("N")
                .default_value("0"),
        )
        .arg(
            Arg::new("no-parallel")
                .long("no-parallel")
                .help("Disable parallel processing")
                .action(ArgAction::SetTrue),
        )
}

fn io_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("input")
                .help("Input file")
                .required(true)
                .index(1)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .help("Output file")
                .required(true)
                .index(2)
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn main() -> Result<()> {
    let matches = Command::new("rs16fec")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reed-Solomon GF(16) forward error correction for codec slots")
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("plan")
                .about("Show how a slot is divided in each mode")
                .arg(slot_bytes_arg())
                .arg(mode_arg())
                .arg(ccc_arg()),
        )
        .subcommand(threading_args(io_args(
            Command::new("encode")
                .about("Encode payload bytes into slots")
                .arg(slot_bytes_arg())
                .arg(mode_arg().required(true))
                .arg(
                    Arg::new("epmr")
                        .short('e')
                        .long("epmr")
                        .help("Error protection mode request sent to the peer (0..=3)")
                        .value_name("EPMR")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u8)),
                )
                .arg(ccc_arg()),
        )))
        .subcommand(threading_args(io_args(
            Command::new("decode")
                .about("Decode slots back into payload bytes")
                .arg(slot_bytes_arg())
                .arg(mode_arg().help("Expected FEC mode, sizes the zero fill of lost frames"))
                .arg(ccc_arg())
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help("Quiet mode - totals only")
                        .action(ArgAction::SetTrue),
                ),
        )))
        .get_matches();

    let level = match matches.get_count("verbose") {
        0 => None,
        1 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    let mut logger = env_logger::Builder::from_default_env();
    logger
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);
    if let Some(level) = level {
        logger.filter_level(level);
    }
    logger.init();

    match matches.subcommand() {
        Some(("plan", sub_matches)) => handle_plan(sub_matches),
        Some(("encode", sub_matches)) => handle_encode(sub_matches),
        Some(("decode", sub_matches)) => handle_decode(sub_matches),
        _ => {
            eprintln!("Error: No command specified");
            eprintln!("\nUse 'rs16fec --help' for usage information");
            std::process::exit(1);
        }
    }
}

fn slot_bytes(matches: &ArgMatches) -> Result<SlotBytes> {
    let bytes = matches.get_one::<usize>("slot_bytes").copied().unwrap_or_default();
    Ok(SlotBytes::new(bytes)?)
}

fn mode(matches: &ArgMatches) -> Result<Option<FecMode>> {
    matches
        .get_one::<u8>("mode")
        .map(|&number| FecMode::try_from(number))
        .transpose()
        .map_err(Into::into)
}

fn handle_plan(matches: &ArgMatches) -> Result<()> {
    let slot = slot_bytes(matches)?;
    let ccc = matches.get_flag("ccc");
    let modes = match mode(matches)? {
        Some(mode) => vec![mode],
        None => FecMode::ALL.to_vec(),
    };

    println!("Slot of {slot} bytes, {} codewords", rs16fec::slot_plan::codeword_count(slot.as_usize()));
    println!();
    println!("mode  payload  hashes  redundancy  pccw  split");
    for mode in modes {
        let plan = SlotPlan::new(mode, slot, ccc);
        let redundancy = if mode == FecMode::Off {
            0
        } else {
            plan.redundancy_nibbles()
        };
        println!(
            "{:>4}  {:>7}  {:>6}  {:>10}  {:>4}  {:>5}",
            mode.number(),
            plan.payload_bytes,
            plan.hash_bytes,
            redundancy / 2,
            plan.n_pccw,
            plan.pc_split
        );
    }
    Ok(())
}

fn handle_encode(matches: &ArgMatches) -> Result<()> {
    let slot = slot_bytes(matches)?;
    let mode = mode(matches)?.unwrap_or(FecMode::Off);
    let epmr = Epmr::new(matches.get_one::<u8>("epmr").copied().unwrap_or_default())?;
    let ccc = matches.get_flag("ccc");
    let config = BatchConfig::from_args(matches);
    config.install_thread_pool();

    let input = matches
        .get_one::<PathBuf>("input")
        .context("Input file is required")?;
    let output = matches
        .get_one::<PathBuf>("output")
        .context("Output file is required")?;

    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let plan = SlotPlan::new(mode, slot, ccc);
    let encoded = encode_frames(&plan, epmr, &data, config.parallel).context("Failed to encode frames")?;

    fs::write(output, &encoded).with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Encoded {} bytes into {} slots of {} bytes (mode {}, {} payload bytes per slot)",
        data.len(),
        encoded.len() / slot.as_usize(),
        slot,
        mode,
        plan.payload_bytes
    );
    Ok(())
}

fn handle_decode(matches: &ArgMatches) -> Result<()> {
    let slot = slot_bytes(matches)?;
    let expected_mode = mode(matches)?;
    let quiet = matches.get_flag("quiet");
    let options = DecodeOptions {
        combined_channel_coding: matches.get_flag("ccc"),
        bad_frame: false,
    };
    let config = BatchConfig::from_args(matches);
    config.install_thread_pool();

    let input = matches
        .get_one::<PathBuf>("input")
        .context("Input file is required")?;
    let output = matches
        .get_one::<PathBuf>("output")
        .context("Output file is required")?;

    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let frames = decode_frames(slot, &data, options, config.parallel).context("Failed to decode frames")?;

    // Lost frames are zero-filled to the expected payload size
    let fill = match expected_mode {
        Some(mode) => data_size(mode, options.combined_channel_coding, slot.as_usize()),
        None => frames
            .iter()
            .find(|f| f.report.mode.is_some())
            .map_or(0, |f| f.report.payload_len),
    };

    let mut decoded = Vec::with_capacity(frames.len() * slot.as_usize());
    let (mut valid, mut partial, mut lost, mut bit_errors) = (0usize, 0usize, 0usize, 0u64);

    for (index, frame) in frames.iter().enumerate() {
        let report = &frame.report;
        match report.validity {
            Validity::Valid => valid += 1,
            Validity::Partial(_) => partial += 1,
            Validity::Unrecoverable => lost += 1,
        }
        bit_errors += u64::from(report.bit_errors.unwrap_or(0));

        if report.validity == Validity::Unrecoverable {
            decoded.resize(decoded.len() + fill, 0);
        } else {
            decoded.extend_from_slice(&frame.payload);
        }

        if !quiet {
            let mode = report.mode.map_or_else(|| "-".to_string(), |m| m.to_string());
            let errors = report.bit_errors.map_or_else(|| "-".to_string(), |n| n.to_string());
            let epmr = report.epmr.map_or_else(|| "-".to_string(), |e| e.to_string());
            let range = report
                .validity
                .unreliable_range()
                .map(|r| format!(" unreliable bits {}..={}", r.first_bit, r.last_bit))
                .unwrap_or_default();
            println!(
                "Frame {index}: validity {} mode {mode} bit errors {errors} epmr {epmr}{range}",
                report.validity.code()
            );
        }
    }

    fs::write(output, &decoded).with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Decoded {} frames: {valid} valid, {partial} partial, {lost} unrecoverable, {bit_errors} bit errors corrected",
        frames.len()
    );
    Ok(())
}
