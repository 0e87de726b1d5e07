//! The grounding instruction sent to the answer generator.

/// The answer the generator is told to give when the context has none.
pub const NOT_FOUND_ANSWER: &str = "Not found in the provided documents.";

/// Build the system instruction that confines the model to `context`.
///
/// The context is embedded verbatim, however long it is.
pub fn grounding_instruction(context: &str) -> String {
    format!(
        "\nYou are a helpful assistant who ONLY answers using the provided context.\n\
         \n\
         Rules:\n\
         - Answer ONLY from the text below.\n\
         - Mention page numbers when supporting statements.\n\
         - If answer not found in context, say: \"{NOT_FOUND_ANSWER}\"\n\
         - No hallucinations.\n\
         \n\
         CONTEXT:\n\
         {context}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_context_verbatim_after_the_rules() {
        let context = "\nPage 1 — contract.pdf\nClause 1. Payment due in 30 days.\n";
        let instruction = grounding_instruction(context);
        assert!(instruction.ends_with(&format!("CONTEXT:\n{context}\n")));
        assert!(instruction.find("Rules:").unwrap() < instruction.find("CONTEXT:").unwrap());
    }

    #[test]
    fn states_every_grounding_rule() {
        let instruction = grounding_instruction("");
        assert!(instruction.contains("ONLY answers using the provided context"));
        assert!(instruction.contains("Mention page numbers"));
        assert!(instruction.contains("say: \"Not found in the provided documents.\""));
        assert!(instruction.contains("No hallucinations."));
    }

    #[test]
    fn empty_context_still_produces_the_rules() {
        assert!(grounding_instruction("").ends_with("CONTEXT:\n\n"));
    }
}
