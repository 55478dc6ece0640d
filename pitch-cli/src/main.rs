//! # pitch - real-time pitch detector CLI
//!
//! Captures audio from an input device and prints the dominant
//! frequency of each analyzed block, one line per analysis tick.
//! Detection lines go to stdout; every diagnostic goes to stderr.

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use crossbeam_channel::bounded;
use pitch_core::{
    audio::{self, AudioCapture},
    config::{DEFAULT_CHUNK_SIZE, DEFAULT_SAMPLE_RATE, DeviceConfig},
    driver,
    queue::SampleQueue,
    spectrum::SpectralAnalyzer,
    tuning,
};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    let matches = Command::new("pitch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Detect the dominant frequency of live audio input")
        .arg(
            Arg::new("sample-rate")
                .short('r')
                .long("sample-rate")
                .value_name("HZ")
                .help("Capture rate; one of 44100, 48000, 96000, 192000 (others fall back to 44100)")
                .default_value("96000"),
        )
        .arg(
            Arg::new("chunk-size")
                .short('c')
                .long("chunk-size")
                .value_name("FRAMES")
                .help("Samples per analysis block")
                .default_value("10240"),
        )
        .arg(
            Arg::new("device")
                .short('d')
                .long("device")
                .value_name("NAME")
                .help("Input device name (default: first input-capable device)"),
        )
        .arg(
            Arg::new("interval-ms")
                .short('i')
                .long("interval-ms")
                .value_name("MILLIS")
                .help("Pause between analysis ticks")
                .default_value("500"),
        )
        .arg(
            Arg::new("note")
                .short('n')
                .long("note")
                .help("Annotate each line with the nearest note and cent offset")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-devices")
                .long("list-devices")
                .help("List input devices and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-devices") {
        for name in audio::input_device_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    let sample_rate: u32 = matches
        .get_one::<String>("sample-rate")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(DEFAULT_SAMPLE_RATE);
    let chunk_size: usize = matches
        .get_one::<String>("chunk-size")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(DEFAULT_CHUNK_SIZE);
    let interval_ms: u64 = matches
        .get_one::<String>("interval-ms")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(500);
    let show_note = matches.get_flag("note");
    let device = matches.get_one::<String>("device").cloned();

    let config = DeviceConfig::new(sample_rate, chunk_size).with_device(device);

    let queue = SampleQueue::default();
    let capture = AudioCapture::start(&config, queue.clone())?;

    // The stream may have been opened at a neighbouring rate; the
    // analyzer must agree with what the device actually delivers.
    let mut analyzer = SpectralAnalyzer::new(capture.sample_rate());

    // Enter (or EOF) on stdin stops the loop so the stream is released
    // on the normal exit path; an external signal still works.
    let (shutdown_tx, shutdown_rx) = bounded(1);
    thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        let _ = shutdown_tx.send(());
    });

    eprintln!("[MAIN] Listening... press Enter to stop.");

    driver::run(
        &queue,
        &mut analyzer,
        Duration::from_millis(interval_ms),
        &shutdown_rx,
        |result| {
            if show_note {
                let (name, target) = tuning::find_nearest_note(result.frequency);
                let cents = tuning::cents_deviation(result.frequency, target);
                println!(
                    "Note Frequency is {:.2} ({} {:+.1} cents)",
                    result.frequency, name, cents
                );
            } else {
                println!("Note Frequency is {:.2}", result.frequency);
            }
        },
    );

    eprintln!("[MAIN] Stopping capture...");
    capture.stop()?;
    Ok(())
}
