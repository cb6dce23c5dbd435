// crates/fcmtune-cli/src/cmd/entropy.rs

use std::path::PathBuf;

use clap::Args;
use fcmtune_core::{defaults, EntropyReport};

use crate::io::sequence::SequenceFile;

#[derive(Args, Debug)]
pub struct EntropyArgs {
    /// Sequence file (text; surrounding whitespace is ignored)
    pub file: PathBuf,

    /// Context order for the conditional entropy
    #[arg(short = 'k', long = "order", default_value_t = defaults::ENTROPY_K)]
    pub k: usize,

    /// Print the measurements as one JSON object instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: EntropyArgs) -> anyhow::Result<()> {
    let file = SequenceFile::load(&args.file)?;
    let symbols = file.symbols();
    let r = EntropyReport::measure(&symbols, args.k);

    if args.json {
        println!("{}", serde_json::to_string(&r)?);
        return Ok(());
    }

    let conditional = match r.conditional {
        Some(h) => format!("{:.4}", h),
        None => format!("undefined (sequence length {} <= k)", r.symbols),
    };

    println!("File: {}", args.file.display());
    println!("Shannon Entropy (H(X)): {:.4}", r.shannon);
    println!("Conditional Entropy (H(Y|X)) [k={}]: {}", r.k, conditional);
    println!("Redundancy (R): {:.4}", r.redundancy);

    eprintln!("--- entropy ---");
    eprintln!("symbols         = {}", r.symbols);
    eprintln!("alphabet        = {}", r.alphabet);
    eprintln!("contexts        = {}", r.distinct_contexts);

    Ok(())
}
