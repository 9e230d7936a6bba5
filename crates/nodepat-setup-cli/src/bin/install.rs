use anyhow::Result;
use clap::Parser;
use nodepat_setup_cli::flows::run_install_command;

#[derive(Parser, Debug)]
#[command(name = "nodepat-install")]
#[command(about = "Download and install the latest Nodepat release", long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();
    run_install_command()
}
