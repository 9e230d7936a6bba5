use anyhow::Result;
use clap::Parser;
use nodepat_setup_cli::flows::run_uninstall_command;

#[derive(Parser, Debug)]
#[command(name = "nodepat-uninstall")]
#[command(about = "Remove an installed Nodepat deployment", long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();
    run_uninstall_command()
}
