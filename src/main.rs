use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};
use log::{error, info};

use doppler::dsp::{Mixer, SampleFormat};
use doppler::predict::{self, ObserverLocation, OrbitTrack};
use doppler::schedule::{EventLog, FrequencySchedule, Timebase};
use doppler::stream::{self, StreamError};

#[derive(Parser)]
#[command(name = "doppler", version)]
#[command(
    about = "Reads an IQ stream on stdin and writes a Doppler corrected \
             or constant shifted IQ stream on stdout"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct StreamArgs {
    /// Input stream samplerate in samples per second
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    samplerate: u32,

    /// Input IQ sample layout (output is always i16)
    #[arg(long, value_enum, default_value_t = SampleFormat::I16)]
    format: SampleFormat,
}

#[derive(Subcommand)]
enum Command {
    /// Shift the stream by a constant frequency
    #[command(name = "const")]
    Const {
        #[command(flatten)]
        stream: StreamArgs,

        /// Frequency shift in Hz
        #[arg(long, allow_negative_numbers = true)]
        shift: i32,
    },
    /// Cancel the Doppler shift of a tracked satellite
    Track {
        #[command(flatten)]
        stream: StreamArgs,

        /// Transmission frequency of the tracked object in Hz
        #[arg(long)]
        freq: u64,

        /// File with TLE records
        #[arg(long)]
        tlefile: PathBuf,

        /// Name of the TLE record to use
        #[arg(long)]
        tlename: String,

        /// Observer location as lat,lon,alt (degrees, degrees, meters)
        #[arg(long, value_parser = ObserverLocation::parse, allow_negative_numbers = true)]
        location: ObserverLocation,

        /// Fixed start time (UTC, YYYY-MM-DDTHH:MM:SS); time then advances
        /// with the sample count instead of the wall clock
        #[arg(long, value_parser = parse_utc)]
        time: Option<DateTime<Utc>>,

        /// Additional constant shift in Hz on top of the Doppler correction
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,

        /// Append tracking events to this file instead of the status log
        #[arg(long)]
        events: Option<PathBuf>,
    },
}

fn parse_utc(s: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(samples) => {
            info!("end of stream after {samples} samples");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<u64, StreamError> {
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    match command {
        Command::Const {
            stream: args,
            shift,
        } => {
            info!("constant shift mode");
            info!("\tsamplerate : {} sps", args.samplerate);
            info!("\tformat     : {:?}", args.format);
            info!("\tshift      : {} Hz", shift);

            let mut schedule = FrequencySchedule::constant(shift as f64, args.samplerate);
            let mut mixer = Mixer::new(args.samplerate);
            stream::run(stdin, stdout, args.format, &mut schedule, &mut mixer)
        }
        Command::Track {
            stream: args,
            freq,
            tlefile,
            tlename,
            location,
            time,
            offset,
            events,
        } => {
            let record = predict::lookup(&tlefile, &tlename)?;
            let track = OrbitTrack::new(&record, location)?;

            info!("tracking mode");
            info!("\tsamplerate : {} sps", args.samplerate);
            info!("\tformat     : {:?}", args.format);
            info!("\tsatellite  : {}", track.name());
            info!("\tfrequency  : {} Hz", freq);
            info!("\toffset     : {} Hz", offset);
            info!(
                "\tlocation   : lat {:.5} lon {:.5} alt {:.1} m",
                location.latitude_deg, location.longitude_deg, location.altitude_m
            );
            if let Some(start) = time {
                info!("\tstart time : {}", start);
            }

            let events = match &events {
                Some(path) => EventLog::to_file(path)?,
                None => EventLog::live(),
            };
            let timebase = match time {
                Some(start) => Timebase::Simulated { start },
                None => Timebase::Live,
            };

            let mut schedule = FrequencySchedule::doppler(
                track,
                freq as f64,
                offset as f64,
                timebase,
                args.samplerate,
                events,
            );
            let mut mixer = Mixer::new(args.samplerate);
            stream::run(stdin, stdout, args.format, &mut schedule, &mut mixer)
        }
    }
}
