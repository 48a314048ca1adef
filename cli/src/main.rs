use std::path::Path;
use std::process::exit;

use colored::Colorize as _;
use cuiktest_core::{action, Config};

fn parse_config() -> Config {
    Config::parse_args(std::env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!(
            "Usage: cuiktest [-n <int>] [-c <compiler>] [-Xcc <flag>]... [-Xcuik <flag>]... [-f <test-dir>] [--clean | --no-clean]"
        );
        exit(2);
    })
}

fn print_summary(report: &action::TestReport) {
    if report.all_passed() {
        println!(
            "{}",
            format!("All {} tests passed", report.total()).green()
        );
    } else {
        println!(
            "{}",
            format!("{}/{} tests failed", report.failed, report.total()).red()
        );
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cfg = parse_config();
    log::debug!("{:?}", cfg);

    let report = action::run_all_tests(&cfg, Path::new(action::DEFAULT_TRANSPILER))
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: {:?}", e);
            exit(1);
        });

    print_summary(&report);
    exit(if report.all_passed() { 0 } else { 1 });
}
