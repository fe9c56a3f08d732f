//! Interactive console for the back-propagation network engine.
//!
//! Loads a network from a JSON description, then reads commands from
//! stdin: `run` feeds a vector through the network and prints the
//! report, `train` fits the network to a labeled example set until the
//! summed squared error drops below 1e-4, `save` writes the current
//! weights back out, and `exit` ends the session. Dimension mismatches
//! are printed and the session continues.

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;

use bpn::checkpoint::{load_network, save_network};
use bpn::data::ExampleSet;
use bpn::training::{self, EpochRecord, Logging, TrainOptions};
use bpn::Activation;

/// Convergence threshold applied to every interactive training run.
const CONVERGENCE: f64 = 1e-4;

#[derive(Parser, Debug)]
#[command(
    name = "bpn-console",
    about = "Run and train a back-propagation network interactively"
)]
struct Args {
    /// Network description file (JSON)
    network: PathBuf,

    /// Append per-epoch training records to this JSONL file
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Print a progress line every N epochs while training
    #[arg(long, default_value_t = 100)]
    log_every: usize,
}

fn main() {
    let args = Args::parse();

    let mut network = match load_network(&args.network) {
        Ok(network) => network,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    println!("loaded network from {}", args.network.display());
    println!("{network:?}");

    let stdin = io::stdin();
    loop {
        let Some(command) = prompt(&stdin, "what should the network do (run, train, save, exit)? ")
        else {
            break;
        };

        match command.as_str() {
            "run" => run_command(&stdin, &mut network),
            "train" => train_command(&stdin, &mut network, &args),
            "save" => save_command(&stdin, &network),
            "exit" => break,
            other => println!("unknown command {other:?}; expected run, train, save or exit"),
        }
    }
}

/// Prints `message`, then reads one trimmed line. `None` on EOF.
fn prompt(stdin: &io::Stdin, message: &str) -> Option<String> {
    print!("{message}");
    let _ = io::stdout().flush();

    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn run_command(stdin: &io::Stdin, network: &mut bpn::Network) {
    let Some(line) = prompt(stdin, "input values, comma separated (e.g. 1,0,1): ") else {
        return;
    };
    let input = match parse_vector(&line) {
        Ok(input) => input,
        Err(e) => {
            println!("{e}");
            return;
        }
    };
    match network.run(&input) {
        Ok(report) => println!("{report}"),
        Err(e) => println!("{e}"),
    }
}

fn train_command(stdin: &io::Stdin, network: &mut bpn::Network, args: &Args) {
    let Some(path) = prompt(stdin, "example set file: ") else {
        return;
    };
    let set = match ExampleSet::load(Path::new(&path)) {
        Ok(set) => set,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    let Some(answer) = prompt(stdin, "use accelerated (scaled-tanh) training? (y/n) ") else {
        return;
    };
    let activation = match answer.as_str() {
        "y" => Activation::ScaledTanh,
        "n" => Activation::Sigmoid,
        _ => {
            println!("please answer y or n");
            return;
        }
    };

    let options = TrainOptions {
        activation: Some(activation),
        adaptive_rate: true,
        logging: Logging::Epochs(args.log_every),
    };
    match training::train(network, &set.inputs, &set.targets, CONVERGENCE, &options) {
        Ok(summary) => {
            if let Some(metrics) = &args.metrics {
                if let Err(e) = append_metrics(metrics, &summary.history) {
                    eprintln!("failed to write metrics to {}: {e}", metrics.display());
                }
            }
        }
        Err(e) => println!("{e}"),
    }
}

fn save_command(stdin: &io::Stdin, network: &bpn::Network) {
    let Some(path) = prompt(stdin, "save network to: ") else {
        return;
    };
    match save_network(Path::new(&path), network) {
        Ok(()) => println!("network written to {path}"),
        Err(e) => println!("{e}"),
    }
}

fn parse_vector(line: &str) -> Result<Vec<f64>, String> {
    line.split(',')
        .map(|field| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("could not parse {:?} as a number: {e}", field.trim()))
        })
        .collect()
}

/// Appends one JSON line per epoch record.
fn append_metrics(path: &Path, records: &[EpochRecord]) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for record in records {
        serde_json::to_writer(&mut file, record)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        file.write_all(b"\n")?;
    }
    Ok(())
}
