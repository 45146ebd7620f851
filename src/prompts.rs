//! Prompt text sent to the generator. Every prompt that expects tabular
//! output asks for CSV so replies can go through [`crate::records::parse_records`].

const CHAT_SUFFIX: &str = "\n\nPlease answer as a knowledgeable medical assistant. \
Keep the answer concise and accurate, use plain language a patient can follow, \
and recommend consulting a healthcare professional for diagnosis or treatment.";

/// User prompt with any attached file appended verbatim
pub fn chat_context(prompt: &str, file: Option<(&str, &str)>) -> String {
    match file {
        Some((name, content)) => {
            format!("{prompt}\n\nAttached file: {name}\nFile content:\n{content}")
        }
        None => prompt.to_string(),
    }
}

pub fn chat(context: &str) -> String {
    format!("{context}{CHAT_SUFFIX}")
}

/// Ask for a two-column term list extracted from `text`
pub fn extract_terms(text: &str) -> String {
    format!(
        "Extract the important medical terms from the following text and give a short \
definition for each. Return them in a csv format with two columns: Term, Definition.\n\n\
Text:\n{text}"
    )
}

pub fn find_articles(topic: &str, max_results: u32, source_priority: &[String]) -> String {
    let priority = if source_priority.is_empty() {
        String::new()
    } else {
        format!(
            " Prefer sources in this order of priority: {}.",
            source_priority.join(", ")
        )
    };
    format!(
        "Please provide a list of {max_results} reputable sources where I can read about \
{topic}.{priority} Return them in a csv format with four columns: Name, URL, Source Type, \
Description."
    )
}

pub fn read_article(url: &str) -> String {
    format!(
        "Please read through this medical website: {url} and create a short list of \
important terms and their definitions. Return them in a csv format."
    )
}

pub fn enhance_location_query(query: &str) -> String {
    format!(
        "Rewrite the following search so it finds relevant healthcare providers on a map \
search service. Reply with the rewritten search text only, on a single line.\n\n\
Search: {query}"
    )
}
