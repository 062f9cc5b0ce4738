use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dbfenc::classify::{classify, ClassifierParams};
use dbfenc::pipeline::{recode_bundle, FailurePolicy, Outcome, RecodeOptions, UnchangedReason};
use dbfenc::sample::{extract_sample, DEFAULT_SAMPLE_CAP};
use dbfenc::store::{EntryStore, MemoryStore};
use dbfenc::{parse_layout, EncodingName};

#[derive(Parser)]
#[command(name = "dbfenc", about = "Detect and fix .dbf attribute-table encodings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the encoding of a .dbf file
    Detect {
        input: PathBuf,
        /// Sample cap in bytes
        #[arg(long, default_value_t = DEFAULT_SAMPLE_CAP)]
        sample_cap: usize,
    },
    /// Show the header and field table of a .dbf file
    Info {
        input: PathBuf,
    },
    /// Recode the shapefile components in a directory to the target encoding
    Recode {
        /// Directory holding .shp/.dbf/.cpg components
        input_dir: PathBuf,
        /// Target encoding label (UTF-8, CP932, CP1252)
        #[arg(short, long, default_value = "UTF-8")]
        target: String,
        /// Abort on structural errors instead of leaving files untouched
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {

        // ── Detect ───────────────────────────────────────────────────────────
        Commands::Detect { input, sample_cap } => {
            let buf = std::fs::read(&input)?;
            let layout = parse_layout(&buf)?;
            let sample = extract_sample(&buf, &layout, sample_cap);
            let verdict = classify(&sample, &ClassifierParams::default());
            println!("{}: {} ({} sample bytes)", input.display(), verdict.name(), sample.len());
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let buf = std::fs::read(&input)?;
            let layout = parse_layout(&buf)?;
            println!("── DBF attribute table ─────────────────────────────────");
            println!("  Path          {}", input.display());
            println!("  Records       {}", layout.header.record_count);
            println!("  Header length {} B", layout.header.header_len);
            println!("  Record length {} B", layout.header.record_len);
            println!("  Fields        {}", layout.fields.len());
            println!("{:<14} {:>4} {:>6} {:>8}  Text", "Name", "Type", "Width", "Offset");
            for f in &layout.fields {
                println!("{:<14} {:>4} {:>6} {:>8}  {}",
                    String::from_utf8_lossy(f.trimmed_name()),
                    f.kind as char, f.length, f.record_offset,
                    if f.is_text() { "yes" } else { "" });
            }
        }

        // ── Recode ───────────────────────────────────────────────────────────
        Commands::Recode { input_dir, target, strict } => {
            let target = EncodingName::from_label(&target)
                .ok_or_else(|| format!("unknown target encoding '{target}'"))?;
            let mut store = load_dir(&input_dir)?;
            let options = RecodeOptions {
                target,
                failure_policy: if strict { FailurePolicy::Closed } else { FailurePolicy::Open },
                ..Default::default()
            };

            match recode_bundle(&mut store, &options)? {
                Outcome::Unchanged(reason) => {
                    println!("unchanged: {}", describe(&reason));
                }
                Outcome::Transcoded { source, truncated_slots } => {
                    write_dir(&input_dir, &store)?;
                    println!("recoded {} → {}", source.name(), target.name());
                    if truncated_slots > 0 {
                        eprintln!("warning: {truncated_slots} value(s) truncated to fit their field width");
                    }
                }
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn load_dir(dir: &Path) -> std::io::Result<MemoryStore> {
    let mut store = MemoryStore::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            let name = entry.file_name().to_string_lossy().into_owned();
            store.insert(name, std::fs::read(entry.path())?);
        }
    }
    Ok(store)
}

fn write_dir(dir: &Path, store: &MemoryStore) -> std::io::Result<()> {
    for name in store.entry_names() {
        let data = store
            .read_entry(&name)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
        std::fs::write(dir.join(&name), data)?;
    }
    Ok(())
}

fn describe(reason: &UnchangedReason) -> String {
    match reason {
        UnchangedReason::NoAttributeTable => "no .dbf entry found".into(),
        UnchangedReason::NoTextFields => "no text-bearing fields".into(),
        UnchangedReason::AlreadyTarget(enc) => format!("already {}", enc.name()),
        UnchangedReason::FailedOpen(err) => format!("left untouched after error: {err}"),
    }
}
