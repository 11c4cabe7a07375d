//! Tern Compiler CLI

use std::path::PathBuf;
use std::process::ExitCode;

use ternc::{init_tracing, Session, SessionConfig};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
enum Emit {
    #[default]
    Mir,
    Json,
    /// Check only.
    Nothing,
}

impl Emit {
    fn parse(s: &str) -> Option<Emit> {
        match s {
            "mir" => Some(Emit::Mir),
            "json" => Some(Emit::Json),
            "none" => Some(Emit::Nothing),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut emit = Emit::default();
    let mut config = SessionConfig::default();
    let mut files = Vec::new();
    for arg in &args {
        if let Some(kind) = arg.strip_prefix("--emit=") {
            let Some(parsed) = Emit::parse(kind) else {
                eprintln!("error: unknown emit kind '{kind}'");
                eprintln!("Valid kinds: mir, json, none");
                return ExitCode::FAILURE;
            };
            emit = parsed;
        } else if let Some(limit) = arg.strip_prefix("--error-limit=") {
            let Ok(limit) = limit.parse::<usize>() else {
                eprintln!("error: invalid error limit '{limit}'");
                return ExitCode::FAILURE;
            };
            config.diagnostics = config.diagnostics.with_error_limit(limit);
        } else if let Some(name) = arg.strip_prefix("--entry=") {
            config.entry_point = name.to_owned();
        } else if arg == "--no-entry" {
            config = config.library();
        } else if arg == "--help" || arg == "-h" {
            print_usage();
            return ExitCode::SUCCESS;
        } else if arg == "--version" || arg == "-V" {
            println!("Tern Compiler {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        } else if arg.starts_with('-') {
            eprintln!("error: unknown option '{arg}'");
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        } else {
            files.push(PathBuf::from(arg));
        }
    }

    if files.is_empty() {
        print_usage();
        return ExitCode::FAILURE;
    }

    let mut session = Session::new(config);
    for path in &files {
        if let Err(err) = session.add_file(path) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    let result = session.run();
    for rendered in session.render_diagnostics() {
        eprintln!("{rendered}");
    }
    let module = match result {
        Ok(module) => module,
        Err(aborted) => {
            eprintln!("error: {aborted}");
            return ExitCode::FAILURE;
        }
    };

    match emit {
        Emit::Mir => print!("{module}"),
        Emit::Json => match serde_json::to_string_pretty(&tern_mir::dump_json(&module)) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: cannot serialize MIR: {err}");
                return ExitCode::FAILURE;
            }
        },
        Emit::Nothing => {}
    }
    ExitCode::SUCCESS
}

fn print_usage() {
    println!("Tern Compiler");
    println!();
    println!("Usage: tern [options] <file.tn>...");
    println!();
    println!("All files are compiled as one unit.");
    println!();
    println!("Options:");
    println!("  --emit=<kind>       Output: mir (default), json, none");
    println!("  --no-entry          Compile a library unit without 'main'");
    println!("  --entry=<name>      Name of the entry point (default: main)");
    println!("  --error-limit=<n>   Stop recording errors after n");
    println!("  -h, --help          Show this help message");
    println!("  -V, --version       Show version information");
    println!();
    println!("Environment:");
    println!("  TERN_LOG            Tracing filter, e.g. tern_lower=debug");
    println!("  RUST_LOG            Used when TERN_LOG is unset");
    println!();
    println!("Examples:");
    println!("  tern main.tn");
    println!("  tern --emit=json main.tn util.tn");
    println!("  tern --no-entry --emit=none lib.tn");
}
