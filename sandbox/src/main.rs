use clap::Parser;

mod config;
mod init;
mod ripples;
mod stage;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// RON settings file. Demo-scale defaults are used when omitted.
    #[arg(short, long)]
    settings: Option<String>,

    /// Seed for the procedural stage and the ripple script.
    #[arg(long, default_value_t = 42)]
    seed: u32,

    /// Seconds between scripted ripples.
    #[arg(short, long, default_value_t = 1.5)]
    emit_period: f32,

    /// Run time in seconds. Zero runs until interrupted.
    #[arg(short, long, default_value_t = 12.0)]
    duration: f32,
}

fn main() {
    let args = Args::parse();

    if args.emit_period <= 0.0 {
        eprintln!("Error: emit_period must be positive, got {}", args.emit_period);
        std::process::exit(1);
    }
    if args.duration < 0.0 {
        eprintln!("Error: duration must not be negative, got {}", args.duration);
        std::process::exit(1);
    }

    let settings = match config::load_settings(args.settings.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Failed to load settings: {err}");
            std::process::exit(1);
        }
    };

    init::run(settings, args.seed, args.emit_period, args.duration);
}
