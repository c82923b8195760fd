use serde::Serialize;
use whatlang::detect;

/// Cap on the sampled text handed to the detector; a few thousand words are
/// plenty and long exports should not pay for full concatenation.
const SAMPLE_CHAR_BUDGET: usize = 20_000;

/// Detected dominant language of the conversation text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanguage {
    /// ISO 639-3 code, e.g. "eng".
    pub code: String,
    pub confidence: f64,
}

/// Runs whatlang over a bounded sample of the message bodies.
///
/// Returns `None` when there is too little text to say anything useful.
pub fn detect_conversation_language<'a, I>(texts: I) -> Option<DetectedLanguage>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sample = String::new();
    for text in texts {
        if sample.len() >= SAMPLE_CHAR_BUDGET {
            break;
        }
        sample.push_str(text);
        sample.push(' ');
    }
    if sample.split_whitespace().count() < 5 {
        return None;
    }
    detect(&sample).map(|info| DetectedLanguage {
        code: info.lang().code().to_string(),
        confidence: info.confidence(),
    })
}
