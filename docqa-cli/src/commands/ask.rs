use anyhow::Result;

use crate::OutputFormat;
use crate::app::App;
use crate::render;

pub async fn run(app: &App, question: &str, format: OutputFormat) -> Result<()> {
    let answer = app.pipeline()?.answer(question).await?;
    println!("{}", render::answer(&answer, format)?);
    Ok(())
}
