use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::OutputFormat;
use crate::app::App;
use crate::render;

/// Prompt loop. Every question is answered on its own; nothing carries over
/// between turns.
pub async fn run(app: &App, format: OutputFormat) -> Result<()> {
    let pipeline = app.pipeline()?;
    let mut editor = DefaultEditor::new()?;

    println!("Ask about the documents in '{}'. Type 'exit' to quit.", app.config.collection);

    let mut turns = 0usize;
    loop {
        let line = match editor.readline("\n🔍 Ask something: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit") {
            break;
        }
        editor.add_history_entry(question)?;

        debug!(turn = turns, "answering");
        turns += 1;
        // A failed turn is reported and the session goes on.
        match pipeline.answer(question).await {
            Ok(answer) => println!("{}", render::answer(&answer, format)?),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    debug!(turns, "chat session ended");
    Ok(())
}
