/// What a step's free-text action asks the browser to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepIntent {
    Click,
    Fill,
    /// Nothing recognisable; the step runs without interacting
    None,
}

/// Maps a free-text action description to an intent.
pub trait IntentPolicy {
    fn classify(&self, user_action: &str) -> StepIntent;
}

/// Case-insensitive keyword match, first hit wins: "click" before
/// "fill"/"enter"/"type".
///
/// Ambiguous for actions mentioning several keywords ("type the name, then
/// click Save" is a click) and blind to synonyms ("press", "select").
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordIntentPolicy;

const CLICK_WORDS: [&str; 1] = ["click"];
const FILL_WORDS: [&str; 3] = ["fill", "enter", "type"];

impl IntentPolicy for KeywordIntentPolicy {
    fn classify(&self, user_action: &str) -> StepIntent {
        let action = user_action.to_lowercase();
        if CLICK_WORDS.iter().any(|w| action.contains(w)) {
            StepIntent::Click
        } else if FILL_WORDS.iter().any(|w| action.contains(w)) {
            StepIntent::Fill
        } else {
            StepIntent::None
        }
    }
}

/// The first `"double-quoted"` run of text in an action description.
pub fn quoted_label(user_action: &str) -> Option<&str> {
    let start = user_action.find('"')? + 1;
    let len = user_action[start..].find('"')?;
    let label = &user_action[start..start + len];
    (!label.is_empty()).then_some(label)
}
