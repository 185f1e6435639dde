use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use framewatch::capture::{CaptureCoordinator, FrameSource, PnetCapture, RECORD_CHANNEL_CAPACITY};
use framewatch::pipeline::PacketPipeline;
use framewatch::reporter::{ConsoleReporter, RecordSink};

#[derive(Parser)]
#[command(name = "framewatch")]
#[command(about = "Live packet capture and dissection monitor")]
struct Args {
    /// Network interface to capture on (defaults to the first up,
    /// non-loopback interface with an address)
    #[arg(short, long)]
    interface: Option<String>,

    /// List available interfaces and exit
    #[arg(long)]
    list_interfaces: bool,

    /// Only show records dissected down to an IP layer
    #[arg(long)]
    ip_only: bool,

    /// Print the payload hex/ASCII block under each record
    #[arg(long)]
    show_payload: bool,

    /// Verbose output: full-date timestamps and payload blocks for
    /// every record
    #[arg(short, long)]
    verbose: bool,

    /// Disable promiscuous mode
    #[arg(long)]
    no_promiscuous: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if args.list_interfaces {
        for line in PnetCapture::list_interfaces() {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut source = match &args.interface {
        Some(name) => PnetCapture::new(name),
        None => PnetCapture::on_default_interface(),
    }
    .context("Failed to open capture interface")?
    .with_promiscuous(!args.no_promiscuous);

    let interface_name = source.interface_name().to_string();

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = running.clone();
    ctrlc::set_handler(move || {
        running_handler.store(false, Ordering::Relaxed);
    })
    .context("Failed to install Ctrl+C handler")?;

    let pipeline = PacketPipeline::new().with_show_payload(args.show_payload);
    let coordinator = CaptureCoordinator::new(pipeline).with_ip_only(args.ip_only);

    let (tx, rx) = mpsc::sync_channel(RECORD_CHANNEL_CAPACITY);

    let reporter = ConsoleReporter::new().with_verbose(args.verbose);
    reporter.on_start(&interface_name);

    let capture_running = running.clone();
    let capture_thread = thread::spawn(move || coordinator.run(&mut source, tx, capture_running));

    // Sole consumer of the record channel; ends when the capture thread
    // drops its sender.
    for record in rx {
        reporter.report(&record);
    }

    match capture_thread.join() {
        Ok(result) => result.context("Capture failed")?,
        Err(_) => anyhow::bail!("Capture thread panicked"),
    }

    reporter.on_stop();
    Ok(())
}
