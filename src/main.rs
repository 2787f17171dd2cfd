use std::process;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use circular_coordinates::config::USAGE;
use circular_coordinates::{CliOptions, Plot, PlotCommand};
use log::{error, info};
use rand::Rng;

fn run() -> circular_coordinates::Result<()> {
    let options = CliOptions::parse(std::env::args().skip(1))?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }
    let randomize = options.randomize;
    let config = options.into_config()?;
    let segments = config.arc.weights.len();
    let total = config.arc.total;
    let plot = Plot::new(config);

    println!("Press any key to exit program.");

    if !randomize {
        return plot.show();
    }

    let (sender, receiver) = mpsc::channel();
    // Weights averaging total / segments, so the arc roughly fills the circle
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mean = total / segments as f64;
        loop {
            let weights: Vec<f64> = (0..segments)
                .map(|_| rng.random_range(0.2 * mean..1.8 * mean))
                .collect();
            info!("new weights: {weights:?}");
            if sender.send(PlotCommand::SetWeights(weights)).is_err() {
                break;
            }
            thread::sleep(Duration::from_secs(1));
        }
    });

    plot.show_with_commands(receiver)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        error!("{err}");
        process::exit(1);
    }
}
