use std::process::ExitCode;

mod cli;
mod commands;
mod display;
mod io;
mod logging;
mod prompt;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();
    logging::init(&cli.output.log_level);

    let ctx = display::Context::detect().with_quiet(cli.output.quiet);

    if ctx.interactive && !cli.version {
        display::print_banner();
    }

    match commands::run(cli, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
