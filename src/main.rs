use config::{DEFAULT_CONFIG_FILE, PipelineConfig};
use dialoguer::Input;
use std::path::Path;
use std::process::ExitCode;

mod config;
mod error;
mod models;
mod pipeline;
mod processor;
mod report;
mod storage;

fn main() -> ExitCode {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = match PipelineConfig::load(DEFAULT_CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let file_name: String = match Input::new()
        .with_prompt("Enter the file name (including extension)")
        .interact_text()
    {
        Ok(file_name) => file_name,
        Err(e) => {
            eprintln!("Failed to read file name: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match pipeline::execute(config, Path::new(file_name.trim())) {
        Ok(summary) => {
            println!(
                "Cleaned {} row(s); reports written for {} game(s).",
                summary.cleaned_rows, summary.total_games
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
