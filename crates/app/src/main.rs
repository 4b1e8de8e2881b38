// CLI modules
mod args;
mod config;
mod op;
mod ops;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Download, Init, Ls, Mkdir, Mv, Rename, Replace, Rm, Upload};

command_enum! {
    (Init, Init),
    (Upload, Upload),
    (Download, Download),
    (Ls, Ls),
    (Mkdir, Mkdir),
    (Rm, Rm),
    (Mv, Mv),
    (Rename, Rename),
    (Replace, Replace),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // configuration problems fail fast, before the engine sees anything
    let config = match config::Config::from_env(args.store.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    tracing::debug!("using object store at {:?}", config.store_path);

    let ctx = match op::OpContext::new(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: failed to open object store: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
