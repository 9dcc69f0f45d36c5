use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read};

use weft::{ErrorCode, Interpreter, RuntimeError};

fn error_prefix(err: &RuntimeError) -> &'static str {
    match err.code {
        Some(code) if code.is_parse() => "Parse error",
        Some(ErrorCode::Static) => "Static error",
        _ => "Runtime error",
    }
}

fn print_error(err: &RuntimeError) {
    let prefix = error_prefix(err);
    eprintln!("{}: {}", prefix, err.message);
    let mut meta = Vec::new();
    match (err.line, err.column) {
        (Some(line), Some(column)) => meta.push(format!("line={}, column={}", line, column)),
        (Some(line), None) => meta.push(format!("line={}", line)),
        _ => {}
    }
    if !meta.is_empty() {
        eprintln!("{} metadata: {}", prefix, meta.join(", "));
    }
    if let Some(hint) = &err.hint {
        eprintln!("{} hint: {}", prefix, hint);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut dump_ast = false;
    let mut repl_flag = false;
    let mut filtered_args: Vec<String> = Vec::new();
    for arg in &args[1..] {
        if arg == "--dump-ast" {
            dump_ast = true;
        } else if arg == "--repl" {
            repl_flag = true;
        } else {
            filtered_args.push(arg.clone());
        }
    }

    if repl_flag || (filtered_args.is_empty() && io::stdin().is_terminal()) {
        weft::repl::run_repl();
        return;
    }

    let input = if !filtered_args.is_empty() && filtered_args[0] == "-e" {
        if filtered_args.len() < 2 {
            eprintln!("Usage: {} -e <code>", args[0]);
            std::process::exit(1);
        }
        filtered_args[1].clone()
    } else if !filtered_args.is_empty() {
        fs::read_to_string(&filtered_args[0]).unwrap_or_else(|err| {
            eprintln!("Failed to read {}: {}", filtered_args[0], err);
            std::process::exit(1);
        })
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).unwrap_or_else(|err| {
            eprintln!("Failed to read stdin: {}", err);
            std::process::exit(1);
        });
        buf
    };

    if dump_ast {
        match weft::dump_ast(&input) {
            Ok(ast) => println!("{}", ast),
            Err(err) => {
                print_error(&err);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut interpreter = Interpreter::new();
    interpreter.set_immediate_stdout(true);
    if let Err(err) = interpreter.run(&input) {
        print_error(&err);
        std::process::exit(1);
    }
}
