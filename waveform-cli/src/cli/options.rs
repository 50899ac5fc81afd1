//! Resample options assembled from an optional JSON file plus flags.

use std::fs;

use clap::ArgMatches;
use log::info;
use waveform_lib::{ResampleOptions, Result};

/// Load `--options`, then let explicit flags override its fields.
pub fn resample_options(args: &ArgMatches) -> Result<ResampleOptions> {
    let mut options = match args.get_one::<String>("options") {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let options: ResampleOptions = serde_json::from_str(&text)?;
            info!("loaded resample options from {}", path);
            options
        }
        None => ResampleOptions::default(),
    };

    if let Some(width) = args.get_one::<usize>("width") {
        options.width = Some(*width);
        options.scale = None;
    }
    if let Some(scale) = args.get_one::<u32>("scale") {
        options.scale = Some(*scale);
    }
    if let Some(start_time) = args.get_one::<f64>("start-time") {
        options.start_time = Some(*start_time);
    }
    if let Some(length) = args.get_one::<usize>("length") {
        options.length = Some(*length);
    }

    Ok(options)
}
