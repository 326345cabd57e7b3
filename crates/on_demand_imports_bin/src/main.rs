use clap::Parser;
use on_demand_imports_bin::{run, CliArgs};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let logger = logger::StdioLogger::new();
    run(args, &logger)
}
