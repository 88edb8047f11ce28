use clap::{error::ErrorKind, Parser};
use flipper::{Engine, EngineCommand};

fn main() {
    let mut engine = Engine::new();

    // Skip the executable name
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    // Arguments may hold several commands back to back; try the longest slice first
    let mut arg_idx = args.len();
    let mut parsed_idx = 0;
    while parsed_idx < arg_idx {
        let slice = &args[parsed_idx..arg_idx];

        match EngineCommand::try_parse_from(slice) {
            Ok(cmd) => {
                if let Err(e) = engine.send_command(cmd) {
                    eprintln!("{e}");
                }
                parsed_idx = arg_idx;
                arg_idx = args.len();
            }

            // Edge case: `--help` and `--version` are both "error" cases according to Clap
            Err(e)
                if matches!(e.kind(), ErrorKind::DisplayHelp)
                    || matches!(e.kind(), ErrorKind::DisplayVersion) =>
            {
                println!("{e}");
                parsed_idx = arg_idx;
                arg_idx = args.len();
            }

            Err(e) => {
                // Nothing starting here parses; skip the offending argument
                if arg_idx == parsed_idx + 1 {
                    eprintln!("ERROR on input {slice:?}:\n{e}");
                    parsed_idx += 1;
                    arg_idx = args.len();
                } else {
                    arg_idx -= 1;
                }
            }
        }
    }

    if let Err(e) = engine.run() {
        eprintln!("{} encountered an error: {e}", env!("CARGO_PKG_NAME"));
    }
}
