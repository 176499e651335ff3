use crate::cli::GenotypeArgs;
use crate::mlva::{analyze_isolate, report::write_report, BinTable, IsolateInput, IsolateReport};
use crate::utils::Result;
use crossbeam_channel::{bounded, Sender};
use rayon::{
    iter::{ParallelBridge, ParallelIterator},
    ThreadPoolBuilder,
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};

const CHANNEL_BUFFER_SIZE: usize = 256;

const PRIMER_SUFFIXES: [&str; 2] = ["_primers-blastn.csv", "_primers-blastn.csv.gz"];
const REPEAT_SUFFIX: &str = "_repeat-blastn";

type IsolateOutcome = std::result::Result<IsolateReport, (String, String)>;

pub fn genotype(args: GenotypeArgs) -> Result<()> {
    let bins = BinTable::load(&args.bins_path)?;
    if bins.is_empty() {
        return Err(format!(
            "Bin mapping table {} contains no rows",
            args.bins_path.display()
        ));
    }
    let bins = Arc::new(bins);

    fs::create_dir_all(&args.output_dir).map_err(|e| {
        format!(
            "Failed to create output directory {}: {}",
            args.output_dir.display(),
            e
        )
    })?;

    let isolates = discover_isolates(&args.input_dir)?;
    if isolates.is_empty() {
        return Err(format!(
            "No primer hit reports (*{}) found in {}",
            PRIMER_SUFFIXES[0],
            args.input_dir.display()
        ));
    }
    log::info!("Typing {} isolate(s)...", isolates.len());

    let (sender_input, receiver_input) = bounded(CHANNEL_BUFFER_SIZE);
    let input_thread = thread::spawn(move || {
        for isolate in isolates {
            sender_input
                .send(isolate)
                .expect("Failed to send isolate through channel");
        }
    });

    let (sender_result, receiver_result) = bounded::<IsolateOutcome>(CHANNEL_BUFFER_SIZE);
    let output_dir = args.output_dir.clone();
    let writer_thread = thread::spawn(move || {
        let mut typed = 0_usize;
        let mut failed = 0_usize;
        for outcome in &receiver_result {
            match outcome {
                Ok(report) => match write_report(&output_dir, &report) {
                    Ok(_) => {
                        typed += 1;
                        log::info!("{}: MLVA profile {}", report.id, report.profiles.join(" | "));
                    }
                    Err(e) => {
                        failed += 1;
                        log::error!("{}: {}", report.id, e);
                    }
                },
                Err((id, reason)) => {
                    failed += 1;
                    log::error!("{}: {}", id, reason);
                }
            }
        }
        (typed, failed)
    });

    let pool = initialize_thread_pool(args.num_threads)?;
    pool.install(|| {
        receiver_input
            .into_iter()
            .par_bridge()
            .for_each_with(&sender_result, |s, isolate| {
                process_isolate(isolate, &bins, s)
            });
    });

    // Clean-up
    drop(sender_result);
    input_thread.join().expect("Input stream thread panicked");
    let (typed, failed) = writer_thread.join().expect("Writer thread panicked");
    log::info!("Typed {} isolate(s), {} failed", typed, failed);

    Ok(())
}

fn process_isolate(isolate: IsolateInput, bins: &BinTable, sender: &Sender<IsolateOutcome>) {
    let outcome = analyze_isolate(&isolate, bins)
        .map_err(|e| (isolate.id.clone(), e.to_string()));
    if let Err(e) = sender.send(outcome) {
        log::error!("Failed to send isolate result to writer thread: {}", e);
    }
}

/// Pairs every `<id>_primers-blastn.csv[.gz]` in the input directory with
/// its `<id>_repeat-blastn.csv[.gz]` sibling. The repeat report may be
/// absent; it is then loaded as an empty hit set.
fn discover_isolates(input_dir: &Path) -> Result<Vec<IsolateInput>> {
    let entries = fs::read_dir(input_dir)
        .map_err(|e| format!("Failed to read {}: {}", input_dir.display(), e))?;

    let mut isolates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| e.to_string())?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(id) = PRIMER_SUFFIXES
            .iter()
            .find_map(|suffix| name.strip_suffix(suffix))
        else {
            continue;
        };
        isolates.push(IsolateInput {
            id: id.to_string(),
            primer_path: entry.path(),
            repeat_path: repeat_path_for(input_dir, id),
        });
    }

    isolates.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(isolates)
}

fn repeat_path_for(input_dir: &Path, id: &str) -> PathBuf {
    let plain = input_dir.join(format!("{}{}.csv", id, REPEAT_SUFFIX));
    if plain.exists() {
        return plain;
    }
    let gzipped = input_dir.join(format!("{}{}.csv.gz", id, REPEAT_SUFFIX));
    if gzipped.exists() {
        gzipped
    } else {
        plain
    }
}

fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("mlvatyper-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}
