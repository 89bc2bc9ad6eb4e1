//! Prompt construction for each era
//!
//! Pure functions: the same era and elements always produce the same prompt.

use super::entities::{Era, TechElement};

/// Build the generation prompt for an era from its tech elements
pub fn build_prompt(era: Era, elements: &[TechElement]) -> String {
    let tech = elements
        .iter()
        .map(|element| element.label)
        .collect::<Vec<_>>()
        .join(", ");

    match era {
        Era::Review => format!(
            "A high-tech cinematic landscape reflecting the digital evolution of the past decade, \
             featuring metaphors for: {}. Cyberpunk blueprint style, neon teal and deep blue tones, \
             4K resolution.",
            tech
        ),
        Era::Outlook => format!(
            "A breathtaking futuristic vision of the next technological frontier, featuring: {}. \
             Solarpunk-tech fusion, sleek gold and white robotics, ethereal intelligence, \
             8K ultra-realistic cinematic art.",
            tech
        ),
    }
}

/// Prompt for an era using its configured elements
pub fn prompt_for(era: Era) -> String {
    build_prompt(era, era.elements())
}
