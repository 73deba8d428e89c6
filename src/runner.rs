use crate::interpreter::{Interpreter, LineResult};

/// Run a K script and print its output text verbatim, the way an embedding
/// host would display it. With `pretty` set, every collected diagnostic is
/// additionally rendered against the source with ariadne.
pub fn run(source: &str, filename: Option<&str>, pretty: bool) {
    let mut interpreter = Interpreter::new();
    let results = interpreter.run(source);

    for result in &results {
        println!("{}", result.render());
    }

    if pretty {
        for result in &results {
            if let LineResult::Diagnostic { error, .. } = result {
                error.report(source, filename);
            }
        }
    }
}
