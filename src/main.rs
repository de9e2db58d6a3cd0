use std::process;

use apcc::error::PipelineError;
use apcc::interpreter::{ExecOptions, Interpreter, DEFAULT_MAX_STEPS};
use clap::Parser;
use clap_stdin::FileOrStdin;

#[derive(Parser, Debug)]
#[command(version, about = "Compile and run A++ programs")]
struct Args {
    /// Program to run, `-` for stdin
    #[arg(default_value = "-")]
    source: FileOrStdin,
    /// Print the token list
    #[arg(long)]
    tokens: bool,
    /// Print the symbol table
    #[arg(long)]
    symbols: bool,
    /// Print the generated instructions
    #[arg(long)]
    asm: bool,
    /// A line handed to `getInput`, may be repeated
    #[arg(short, long = "input", value_name = "LINE")]
    input: Vec<String>,
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,
    /// More logging, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn fail(error: PipelineError) -> ! {
    if let PipelineError::Rejected(diagnostics) = &error {
        eprint!("{diagnostics}");
    }
    eprintln!("error: {error}");
    process::exit(1);
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    let source = args.source.contents().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    let compilation = apcc::compile(&source).unwrap_or_else(|e| fail(e));

    if args.tokens {
        for token in &compilation.tokens {
            println!("{token}");
        }
    }
    if args.symbols {
        print!("{}", compilation.symbol_table);
    }
    if args.asm {
        println!("{}", compilation.assembly());
    }

    let options = ExecOptions {
        max_steps: args.max_steps,
        input: args.input,
    };
    let execution = Interpreter::new(compilation.instructions, &options)
        .run()
        .unwrap_or_else(|e| fail(e.into()));

    for entry in &execution.output {
        println!("{entry}");
    }
    for (name, value) in &execution.variables {
        println!("{name} = {value}");
    }
}
