use crate::error::ErrorKind;
use crate::interpreter::{Interpreter, LineResult};
use std::io::{self, Write};

/// Interactive front end with a persistent interpreter, so declarations and
/// open blocks carry across prompts. The host-facing `interpret` contract
/// still builds a fresh interpreter per script run; the REPL session is the
/// one place state is deliberately reused.

pub fn start() {
    println!("K Interpreter v0.1.0");
    println!("Type 'exit' or press Ctrl+C to quit");
    println!();

    let mut interpreter = Interpreter::new();

    loop {
        // Continuation prompt while a block is open
        if interpreter.depth() > 0 {
            print!(". ");
        } else {
            print!("> ");
        }
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }

                run_repl_line(line, &mut interpreter);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_repl_line(source: &str, interpreter: &mut Interpreter) {
    for result in interpreter.run(source) {
        match &result {
            // A line that is no K statement may still be a bare expression;
            // the unknown-command message carries the cleaned line text.
            LineResult::Diagnostic { error, .. } if error.kind == ErrorKind::UnknownCommand => {
                match interpreter.eval_expr(&error.message) {
                    Ok(value) => println!("{}", value),
                    Err(_) => println!("{}", result.render()),
                }
            }
            other => println!("{}", other.render()),
        }
    }
}
