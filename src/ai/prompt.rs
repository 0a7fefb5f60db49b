//! Prompt template for slide generation.

/// Front matter put in front of every generated deck.
pub const GENERATED_DECK_HEADER: &str = "---\nmarp: true\n---\n\n";

/// Substituted when the caller gives no additional instructions.
pub const NO_INSTRUCTIONS: &str = "None";

/// The fixed slide generation prompt with its two substitutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePrompt<'a> {
    pub topic: &'a str,
    pub additional_instructions: Option<&'a str>,
}

impl<'a> SlidePrompt<'a> {
    pub fn new(topic: &'a str, additional_instructions: Option<&'a str>) -> Self {
        Self {
            topic,
            additional_instructions,
        }
    }

    pub fn render(&self) -> String {
        let instructions = self
            .additional_instructions
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_INSTRUCTIONS);
        format!(
            "
Create presentation slides on the given topic.
Keep the following in mind:

1. Separate each slide with \"---\"
2. Make the first slide a title slide
3. Include a table of contents or overview
4. Keep the content concise and easy to understand
5. Use bullet points effectively
6. Use tables where appropriate
7. Finish with a summary slide

Topic: {topic}
Additional instructions: {instructions}
",
            topic = self.topic.trim(),
            instructions = instructions,
        )
    }
}

/// Prefix model output with the deck header.
pub fn wrap_generated(text: &str) -> String {
    format!("{}\n\n{}", GENERATED_DECK_HEADER, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_substitutes_topic() {
        let prompt = SlidePrompt::new("Rust ownership", Some("Keep it short")).render();
        assert!(prompt.contains("Topic: Rust ownership\n"));
        assert!(prompt.contains("Additional instructions: Keep it short\n"));
        assert!(prompt.contains("1. Separate each slide with \"---\""));
        assert!(prompt.contains("7. Finish with a summary slide"));
    }

    #[test]
    fn test_missing_instructions_default_to_none() {
        for instructions in [None, Some(""), Some("   ")] {
            let prompt = SlidePrompt::new("x", instructions).render();
            assert!(prompt.contains("Additional instructions: None\n"));
        }
    }

    #[test]
    fn test_placeholders_in_topic_are_not_expanded_twice() {
        let prompt = SlidePrompt::new("{additional_instructions}", Some("extra")).render();
        assert!(prompt.contains("Topic: {additional_instructions}\n"));
    }

    #[test]
    fn test_wrap_generated() {
        assert_eq!(
            wrap_generated("# Deck"),
            "---\nmarp: true\n---\n\n\n\n# Deck"
        );
    }
}
