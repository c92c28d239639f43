//! Matoy command-line interface.
//!
//! Starts the interactive console when run without arguments; subcommands
//! expose the file runner and the lexer and parser debug printers.

mod render;
mod repl;

use matoy_eval::Vm;
use matoy_syntax::{Lexer, SyntaxNode, Token};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        repl::repl();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: matoyc run <file>");
                std::process::exit(1);
            }
            run_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: matoyc lex <file>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: matoyc parse <file>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("Matoy {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Evaluates a source file against a fresh machine and prints the final
/// value, or renders the diagnostics and exits nonzero.
fn run_file(path: &str) {
    let text = read_file(path);
    let mut vm = Vm::new();
    match matoy_eval::eval_str(&text, &mut vm) {
        Ok(value) => println!("{value}"),
        Err(errors) => {
            render::render(path, &text, &errors);
            std::process::exit(1);
        }
    }
}

/// Prints the token stream of a file, one token per line.
fn lex_file(path: &str) {
    let text = read_file(path);
    let mut lexer = Lexer::new(&text);
    loop {
        let token = lexer.next();
        if token.v == Token::End {
            break;
        }
        let excerpt = &text[token.span.to_range()];
        match lexer.take_error() {
            Some(message) => {
                println!("{:?} [{}] {excerpt:?}: {message}", token.v, token.span);
            }
            None => println!("{:?} [{}] {excerpt:?}", token.v, token.span),
        }
    }
}

/// Prints the syntax tree of a file, one node per line.
fn parse_file(path: &str) {
    let text = read_file(path);
    let parsed = matoy_syntax::parse(&text);
    print_node(&parsed.root, 0);
}

/// Dumps a node and its children, indented two spaces per level.
fn print_node(node: &SyntaxNode, depth: usize) {
    let indent = depth * 2;
    if node.is_inner() {
        println!(
            "{:indent$}{:?} [{}] (len: {}, desc: {})",
            "",
            node.kind(),
            node.span(),
            node.len(),
            node.descendants(),
        );
        for child in node.children() {
            print_node(child, depth + 1);
        }
    } else if node.is_error() {
        let message = node
            .errors()
            .into_iter()
            .next()
            .map(|error| error.message)
            .unwrap_or_default();
        println!("{:indent$}ERROR {:?}: {message}", "", node.text());
    } else {
        println!(
            "{:indent$}{:?} {:?} [{}]",
            "",
            node.token(),
            node.text(),
            node.span(),
        );
    }
}

/// Reads a source file, or reports the problem and exits nonzero.
fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("error: cannot find file '{path}'");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: cannot read '{path}': {e}");
            std::process::exit(1);
        }
    }
}

/// Enables tracing output when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_err() {
        return;
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(EnvFilter::from_default_env())
        .init();
}

fn print_usage() {
    println!("Matoy interactive console and file runner");
    println!();
    println!("Usage: matoyc [command]");
    println!();
    println!("Commands:");
    println!("  (none)         Start the interactive console");
    println!("  run <file>     Evaluate a file and print the final value");
    println!("  lex <file>     Tokenize a file and display the tokens");
    println!("  parse <file>   Parse a file and display the syntax tree");
    println!("  help           Show this help message");
    println!("  version        Show version information");
}
