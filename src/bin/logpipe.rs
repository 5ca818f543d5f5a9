//! Demo run: default configuration, report to stdout
//!
//! Run with: cargo run --release

use logpipe::prelude::*;

fn main() -> logpipe::Result<()> {
    let config = PipelineConfig::default();

    // Directory creation is a startup concern, kept out of the library
    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let report = Pipeline::new(config)?.run()?;
    println!("{report}");

    Ok(())
}
