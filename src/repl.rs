use crate::Interpreter;
use crate::value::Value;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Check if the input has unbalanced brackets, suggesting more input is needed.
fn is_incomplete(input: &str) -> bool {
    let mut depth_brace = 0i32;
    let mut depth_paren = 0i32;
    let mut in_string = false;
    let mut prev = '\0';

    for ch in input.chars() {
        if in_string {
            if ch == '"' && prev != '\\' {
                in_string = false;
            }
            prev = ch;
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth_brace += 1,
            '}' => depth_brace -= 1,
            '(' => depth_paren += 1,
            ')' => depth_paren -= 1,
            _ => {}
        }
        prev = ch;
    }

    depth_brace > 0 || depth_paren > 0
}

/// Result of processing a single REPL line.
enum LineResult {
    /// Need more input (incomplete expression).
    Continue,
    /// Line was processed (output may have been produced).
    Done,
}

/// Process a single line of REPL input. Returns the display string (if any)
/// and whether more input is needed.
///
/// This function is the testable core of the REPL loop — it has no I/O
/// dependencies beyond the `Interpreter`.
fn process_line(
    interpreter: &mut Interpreter,
    accumulated: &mut String,
    line: &str,
) -> (LineResult, Option<String>) {
    if accumulated.is_empty() {
        *accumulated = line.to_string();
    } else {
        accumulated.push('\n');
        accumulated.push_str(line);
    }

    if is_incomplete(accumulated) {
        return (LineResult::Continue, None);
    }

    // Skip empty or whitespace-only input
    if accumulated.trim().is_empty() {
        accumulated.clear();
        return (LineResult::Done, None);
    }

    interpreter.clear_output();
    interpreter.last_value = None;
    let display = match interpreter.run(accumulated) {
        Ok(output) => {
            if !output.is_empty() {
                Some(output)
            } else if let Some(value) = interpreter.last_value.take() {
                if matches!(value, Value::Nil) {
                    None
                } else {
                    Some(format!("{}\n", value.to_string_value()))
                }
            } else {
                None
            }
        }
        Err(err) => {
            // If it looks like incomplete input (parse error), try accumulating
            if err.code.is_some_and(|c| c.is_parse()) && is_incomplete(accumulated) {
                return (LineResult::Continue, None);
            }
            Some(format!("Error: {}\n", err.message))
        }
    };

    accumulated.clear();
    (LineResult::Done, display)
}

pub fn run_repl() {
    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("Failed to initialize line editor: {}", err);
            std::process::exit(1);
        }
    };

    let history_path = history_path();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    let mut interpreter = Interpreter::new();
    let mut accumulated = String::new();

    loop {
        let prompt = if accumulated.is_empty() { "> " } else { "* " };

        match rl.readline(prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let (result, display) = process_line(&mut interpreter, &mut accumulated, &line);
                if let Some(text) = display {
                    print!("{}", text);
                }
                if matches!(result, LineResult::Continue) {
                    continue;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C: cancel current input
                accumulated.clear();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D: exit
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }
}

fn history_path() -> Option<std::path::PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let dir = std::path::PathBuf::from(home).join(".weft");
    let _ = std::fs::create_dir_all(&dir);
    Some(dir.join("history"))
}
