//! Loading peak payloads from files or standard input.

use std::fs;
use std::io::{self, Read};

use log::debug;
use waveform_lib::{Payload, Result};

/// Read `path` (or stdin for `-`) into a payload ready for adapter detection.
pub fn read_payload(path: &str) -> Result<Payload> {
    let bytes = if path == "-" {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        buffer
    } else {
        fs::read(path)?
    };

    debug!("read {} bytes from {}", bytes.len(), path);
    Ok(classify(bytes))
}

/// JSON objects become text payloads; everything else is treated as packed binary.
pub fn classify(bytes: Vec<u8>) -> Payload {
    let first = bytes.iter().find(|byte| !byte.is_ascii_whitespace());
    if first != Some(&b'{') {
        return Payload::Bytes(bytes);
    }

    match String::from_utf8(bytes) {
        Ok(text) => Payload::Text(text),
        Err(err) => Payload::Bytes(err.into_bytes()),
    }
}
