//! Prompt construction.

use crate::request::Action;

const SUMMARIZE_INSTRUCTION: &str =
    "Summarize the following text in a concise and clear manner:\n\n";
const REPLY_INSTRUCTION: &str =
    "Generate a professional and polite reply for the following message:\n\n";
const BULLETS_INSTRUCTION: &str = "Convert the following text into clear bullet points:\n\n";

/// Map an action to its fixed instruction template and append the user
/// text.  Pure; the action is guaranteed valid by the validator so there is
/// no failure mode.
pub fn build_prompt(action: Action, text: &str) -> String {
    let instruction = match action {
        Action::Summarize => SUMMARIZE_INSTRUCTION,
        Action::Reply => REPLY_INSTRUCTION,
        Action::Bullets => BULLETS_INSTRUCTION,
    };
    format!("{}{}", instruction, text)
}
