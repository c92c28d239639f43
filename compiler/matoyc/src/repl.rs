//! The interactive console.

use std::io::{self, Write};

use matoy_diagnostic::SourceResult;
use matoy_eval::{eval_str, try_eval_str, Vm};
use matoy_foundations::Value;

use crate::render;

/// The source name under which console input is reported.
const SOURCE: &str = "repl";

/// Runs the read-eval-print loop until the end of input.
///
/// The machine persists across submissions, so variables declared on one
/// line stay visible on later ones. Input that merely looks unfinished
/// (a trailing operator, an unclosed block) switches to a continuation
/// prompt instead of reporting errors; a blank line submits it as-is.
pub fn repl() {
    println!("Welcome to MATOY! Feel free to enter statements and get the result!");

    let mut vm = Vm::new();
    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { ">>> " } else { "... " };
        print!("{prompt}");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim_end();

        if buffer.is_empty() {
            if line.trim().is_empty() {
                continue;
            }
            buffer.push_str(line);
        } else if line.trim().is_empty() {
            // Force the pending input through, so text the parser keeps
            // treating as unfinished cannot trap the prompt.
            let text = std::mem::take(&mut buffer);
            report(eval_str(&text, &mut vm), &text, &mut vm);
            continue;
        } else {
            buffer.push('\n');
            buffer.push_str(line);
        }

        match try_eval_str(&buffer, &mut vm) {
            // Unfinished; keep reading under the continuation prompt.
            None => {}
            Some(result) => {
                let text = std::mem::take(&mut buffer);
                report(result, &text, &mut vm);
            }
        }
    }
}

/// Prints an evaluation outcome.
///
/// Any flow event left over from a top-level `break` or `return` is
/// dropped so that it cannot swallow the next submission.
fn report(result: SourceResult<Value>, text: &str, vm: &mut Vm) {
    vm.flow = None;
    match result {
        Ok(value) => println!("{value}"),
        Err(errors) => render::render(SOURCE, text, &errors),
    }
}
