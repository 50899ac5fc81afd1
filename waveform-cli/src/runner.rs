use std::fs;
use std::io::{self, Write};

use clap::ArgMatches;
use log::info;
use serde::Serialize;
use waveform_lib::{encode_packed, PeakRecord, PeakSource, ResampleOptions, Result, WaveformData};

use crate::cli;

#[derive(Debug, Serialize)]
struct PeaksOutput {
    offset_start: usize,
    offset_end: usize,
    min: Vec<i32>,
    max: Vec<i32>,
}

/// Dispatch the parsed subcommand and return the process exit code.
pub fn run(args: &ArgMatches) -> Result<i32> {
    match args.subcommand() {
        Some(("info", sub)) => run_info(sub),
        Some(("peaks", sub)) => run_peaks(sub),
        Some(("resample", sub)) => run_resample(sub),
        Some(("create", sub)) => match sub.subcommand() {
            Some(("options-json", _)) => {
                let json = serde_json::to_string_pretty(&ResampleOptions::default())?;
                println!("{}", json);
                Ok(0)
            }
            _ => Ok(2),
        },
        _ => Ok(2),
    }
}

fn load(args: &ArgMatches) -> Result<WaveformData> {
    let path = args
        .get_one::<String>("INPUT")
        .map(String::as_str)
        .unwrap_or("-");
    let payload = cli::input::read_payload(path)?;
    let waveform = WaveformData::create(payload)?;
    info!(
        "loaded {:?} source with {} columns",
        waveform.source().kind(),
        waveform.source().length()
    );
    Ok(waveform)
}

fn run_info(args: &ArgMatches) -> Result<i32> {
    let waveform = load(args)?;
    let source = waveform.source();
    println!("version: {}", source.version());
    println!("bits: {}", source.bit_depth().bits());
    println!("sample_rate: {}", source.sample_rate());
    println!("samples_per_pixel: {}", source.samples_per_pixel());
    println!("length: {}", source.length());
    println!("duration: {:.3}", waveform.duration());
    println!("pixels_per_second: {:.3}", waveform.pixels_per_second());
    Ok(0)
}

fn run_peaks(args: &ArgMatches) -> Result<i32> {
    let mut waveform = load(args)?;
    let start = args.get_one::<i64>("start").copied();
    let end = args.get_one::<i64>("end").copied();

    if start.is_some() || end.is_some() {
        let length = waveform.source().length() as i64;
        waveform.offset(start.unwrap_or(0), end.unwrap_or(length))?;
    }

    let output = PeaksOutput {
        offset_start: waveform.offset_start(),
        offset_end: waveform.offset_end(),
        min: waveform.min(),
        max: waveform.max(),
    };
    println!("{}", serde_json::to_string(&output)?);
    Ok(0)
}

fn run_resample(args: &ArgMatches) -> Result<i32> {
    let waveform = load(args)?;
    let options = cli::options::resample_options(args)?;
    let resampled = waveform.resample(options)?;
    info!(
        "resampled to {} columns at {} samples per pixel",
        resampled.source().length(),
        resampled.source().samples_per_pixel()
    );

    let encoded = match args.get_one::<String>("format").map(String::as_str) {
        Some("binary") => encode_packed(resampled.source())?,
        _ => {
            let mut json = serde_json::to_vec(&PeakRecord::from_source(resampled.source()))?;
            json.push(b'\n');
            json
        }
    };

    match args.get_one::<String>("output") {
        Some(path) => fs::write(path, &encoded)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&encoded)?;
            stdout.flush()?;
        }
    }
    Ok(0)
}
