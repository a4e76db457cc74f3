use std::env;

use corvid::engine::uci::main_loop;

const DEFAULT_HASH_MB: usize = 16;

struct Config {
    hash_mb: usize,
    log_level: Option<String>,
    fixed_depth: Option<i32>,
}

/// Hand-rolled flag parsing for `--hash <MB>`, `--log <level>`, and `--depth <N>`: three flags
/// don't justify pulling in an argument-parsing crate.
fn parse_args() -> Config {
    let mut hash_mb = DEFAULT_HASH_MB;
    let mut log_level = None;
    let mut fixed_depth = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--hash" => {
                if let Some(value) = args.next() {
                    match value.parse::<usize>() {
                        Ok(mb) => hash_mb = mb,
                        Err(_) => eprintln!("--hash expects a number of megabytes, got '{value}'"),
                    }
                }
            }
            "--log" => log_level = args.next(),
            "--depth" => {
                if let Some(value) = args.next() {
                    match value.parse::<i32>() {
                        Ok(d) => fixed_depth = Some(d),
                        Err(_) => eprintln!("--depth expects a ply count, got '{value}'"),
                    }
                }
            }
            other => eprintln!("unrecognized argument: {other}"),
        }
    }

    Config { hash_mb, log_level, fixed_depth }
}

fn main() {
    let config = parse_args();

    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = &config.log_level {
        builder.parse_filters(level);
    }
    builder.init();

    log::info!("starting with a {}MB transposition table", config.hash_mb);
    main_loop(config.hash_mb, config.fixed_depth);
}
