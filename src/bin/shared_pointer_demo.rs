use colored::Colorize;
use shared_pointer::demo::{self, Line};
use shared_pointer::DemoConfig;
use std::env;
use std::path::Path;
use std::process::ExitCode;

fn init_logging(fallback: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or(fallback.unwrap_or("warn"));
    env_logger::Builder::from_env(env).init();
}

fn main() -> ExitCode {
    // optional argument: path to a TOML config
    let config = match env::args().nth(1) {
        Some(path) => DemoConfig::load(Path::new(&path)),
        None => Ok(DemoConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.log_level.as_deref());

    match demo::run(&config) {
        Ok(report) => {
            for line in report.lines() {
                match line {
                    Line::Heading(text) => println!("\n{}", text.bold().green()),
                    Line::Info(text) => println!("  {}", text),
                    Line::Error(text) => println!("  {}", text.red()),
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
