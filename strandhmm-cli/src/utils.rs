use anyhow::{Context, Result};
use log::LevelFilter;

///
/// Set up logging to stderr. `RUST_LOG` takes precedence over the default level.
///
pub fn init_logger(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.try_init().context("Failed to set up logger")
}

/// Size the global rayon pool; `None` keeps rayon's default of one thread per core.
pub fn init_rayon_threads(threads: Option<usize>) -> Result<()> {
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("Failed to create global thread pool")?;
    }
    Ok(())
}
