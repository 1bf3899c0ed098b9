use crate::{OutputTokensDetails, ResponseUsage};

/// Roughly estimate the number of tokens in `text`. ASCII text is counted at
/// four characters per token; any other character counts as one token.
pub fn estimate_tokens(text: &str) -> u32 {
    let (ascii_chars, other_chars) = text.chars().fold((0usize, 0usize), |(ascii, other), c| {
        if c.is_ascii() {
            (ascii + 1, other)
        } else {
            (ascii, other + 1)
        }
    });

    let tokens = ascii_chars.div_ceil(4).saturating_add(other_chars);
    u32::try_from(tokens).unwrap_or(u32::MAX)
}

/// Estimate the usage of a response. Reasoning counts toward output tokens.
pub fn estimate_usage(prompt: &str, reasoning: &str, completion: &str) -> ResponseUsage {
    let input_tokens = estimate_tokens(prompt);
    let reasoning_tokens = estimate_tokens(reasoning);
    let output_tokens = reasoning_tokens.saturating_add(estimate_tokens(completion));

    ResponseUsage {
        input_tokens,
        output_tokens,
        total_tokens: input_tokens.saturating_add(output_tokens),
        output_tokens_details: OutputTokensDetails { reasoning_tokens },
    }
}
