use std::env;
use std::io::{self, Read, Write};

use anyhow::Error;
use clap::{App, AppSettings};
use env_logger::{fmt, Builder, Target};
use log::{error, Level, LevelFilter, Record};

use veritab::generate_truth_table;

mod pack;

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "{}", record.args())
        } else {
            writeln!(buf, "{}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stderr)
        .format(format)
        .filter(None, LevelFilter::Info);

    if let Ok(ref env_var) = env::var("VERITAB_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("veritab")
        .version(env!("CARGO_PKG_VERSION"))
        .setting(AppSettings::DisableHelpSubcommand)
        .setting(AppSettings::ArgsNegateSubcommands)
        .setting(AppSettings::VersionlessSubcommands)
        .about("Generate truth tables for propositional formulas in LaTeX notation")
        .arg_from_usage("[FORMULA] 'The formula to tabulate (stdin if omitted)'")
        .subcommand(pack::pack_args())
        .get_matches();

    init_logging();

    if let Some(matches) = matches.subcommand_matches("pack") {
        return pack::pack_main(matches);
    }

    let formula = match matches.value_of("FORMULA") {
        Some(text) => text.to_string(),
        None => {
            log::info!("Reading formula from stdin");
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    match generate_truth_table(&formula) {
        Ok(table) => {
            print!("{}", table);
            Ok(0)
        }
        Err(err) => {
            error!("{}", err);
            Ok(1)
        }
    }
}
