//! csv-buddy: schema-governed CSV tables from the command line.

use anyhow::Result;
use buddy_cli::cli::{Cli, Command};
use buddy_cli::commands::{
    run_build, run_check, run_json, run_normalize, run_schema, run_show, table_options,
    write_output,
};
use buddy_cli::logging::init_logging;
use buddy_cli::summary::{print_check, rows_table, schema_table};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let options = table_options(cli.delimiter, cli.lenient);
    match &cli.command {
        Command::Check(args) => print_check(&run_check(args, options)?),
        Command::Normalize(args) => {
            write_output(&run_normalize(args, options)?, args.output.as_deref())?;
        }
        Command::Json(args) => println!("{}", run_json(args, options)?),
        Command::Show(args) => println!("{}", rows_table(&run_show(args, options)?)),
        Command::Build(args) => {
            write_output(&run_build(args, options)?, args.output.as_deref())?;
        }
        Command::Schema(args) => println!("{}", schema_table(&run_schema(args)?)),
    }
    Ok(())
}
