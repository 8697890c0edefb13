//! Magpie CLI - language front end
//!
//! Usage:
//!   magpie <SCRIPT>           Parse a script and print its canonical rendering
//!   magpie --tokens <SCRIPT>  Dump the token stream instead
//!   magpie                    Read source from stdin

use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use magpie_lang::lexer::lex;
use magpie_lang::parser::parse;

/// Magpie - parse scripts and print the canonical AST rendering
#[derive(Parser, Debug)]
#[command(name = "magpie")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The script file to parse (stdin when omitted)
    script: Option<PathBuf>,

    /// Dump the token stream instead of the parsed program
    #[arg(short = 't', long = "tokens")]
    tokens: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (filename, source) = match &args.script {
        Some(script) => {
            let source = match std::fs::read_to_string(script) {
                Ok(source) => source,
                Err(error) => {
                    eprintln!("Error reading file {:?}: {}", script, error);
                    return ExitCode::from(1);
                }
            };
            (script.display().to_string(), source)
        }
        None => {
            let mut source = String::new();
            if let Err(error) = std::io::stdin().read_to_string(&mut source) {
                eprintln!("Error reading stdin: {}", error);
                return ExitCode::from(1);
            }
            ("<stdin>".to_string(), source)
        }
    };

    if args.tokens {
        for token in lex(&filename, &source) {
            println!(
                "{}:{} {} '{}'",
                token.position.line, token.position.column, token.kind, token.literal
            );
        }
        return ExitCode::SUCCESS;
    }

    match parse(&filename, &source) {
        Ok(program) => {
            println!("{}", program);
            ExitCode::SUCCESS
        }
        Err(errors) => {
            for message in errors.messages() {
                eprintln!("{}", message);
            }
            ExitCode::from(2)
        }
    }
}
