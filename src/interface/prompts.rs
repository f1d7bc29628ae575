use dialoguer::Confirm;
use strsim::jaro_winkler;

use crate::error::Result;

/// Yes/no confirmation with a default answer.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Closest known identifier to a mistyped one, if any is close enough.
pub fn suggest<'a>(input: &str, known: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let input = input.to_lowercase();
    let mut best: Option<(&str, f64)> = None;
    for candidate in known {
        let score = jaro_winkler(&candidate.to_lowercase(), &input);
        if score > 0.7 && best.is_none_or(|(_, high)| score > high) {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}
