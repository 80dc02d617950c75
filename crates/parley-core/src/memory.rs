//! Prompt templates for the rolling summary memory.
//!
//! The model never sees the raw transcript. Each turn it gets the current
//! summary plus the new input, and afterwards it is asked to fold that one
//! exchange into a new summary.

const CONVERSATION_PREAMBLE: &str = "The following is a friendly conversation between a human and an AI. \
The AI is talkative and provides lots of specific details from its context. \
If the AI does not know the answer to a question, it truthfully says it does not know.";

const SUMMARY_INSTRUCTIONS: &str = "Progressively summarize the lines of conversation provided, \
adding onto the previous summary returning a new summary.";

const SUMMARY_EXAMPLE: &str = "EXAMPLE
Current summary:
The human asks what the AI thinks of artificial intelligence. The AI thinks artificial intelligence is a force for good.

New lines of conversation:
Human: Why do you think artificial intelligence is a force for good?
AI: Because artificial intelligence will help humans reach their full potential.

New summary:
The human asks what the AI thinks of artificial intelligence. The AI thinks artificial intelligence is a force for good because it will help humans reach their full potential.
END OF EXAMPLE";

/// Prompt for answering `input` given the summary of everything before it.
pub fn conversation_prompt(summary: &str, input: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(CONVERSATION_PREAMBLE);
    prompt.push_str("\n\nCurrent conversation:\n");
    prompt.push_str(summary);
    prompt.push_str("\nHuman: ");
    prompt.push_str(input);
    prompt.push_str("\nAI:");

    prompt
}

/// Prompt asking the model to merge one exchange into `summary`.
pub fn summary_prompt(summary: &str, human: &str, ai: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(SUMMARY_INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(SUMMARY_EXAMPLE);
    prompt.push_str("\n\nCurrent summary:\n");
    prompt.push_str(summary);
    prompt.push_str("\n\nNew lines of conversation:\n");
    prompt.push_str(&format!("Human: {}\nAI: {}", human, ai));
    prompt.push_str("\n\nNew summary:");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_prompt_ends_with_ai_cue() {
        let prompt = conversation_prompt("The human said hi.", "What's new?");
        assert!(prompt.starts_with("The following is a friendly conversation"));
        assert!(prompt.contains("Current conversation:\nThe human said hi.\nHuman: What's new?"));
        assert!(prompt.ends_with("\nAI:"));
    }

    #[test]
    fn test_first_turn_has_empty_history() {
        let prompt = conversation_prompt("", "Hello");
        assert!(prompt.contains("Current conversation:\n\nHuman: Hello\nAI:"));
    }

    #[test]
    fn test_summary_prompt_has_only_summary_and_new_lines() {
        let prompt = summary_prompt("Earlier digest.", "Hello", "Hi there!");
        let tail = prompt
            .split("END OF EXAMPLE")
            .nth(1)
            .expect("example block is closed");

        assert_eq!(
            tail,
            "\n\nCurrent summary:\nEarlier digest.\n\nNew lines of conversation:\nHuman: Hello\nAI: Hi there!\n\nNew summary:"
        );
    }
}
