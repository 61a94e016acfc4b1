use serde::Deserialize;
use thiserror::Error;

const DICTIONARY_ENDPOINT: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// The two lookup outcomes the panel must keep apart: the service answering
/// "no such word" is not the same thing as the service being unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no definition found")]
    NotFound,
    #[error("dictionary unavailable: {0}")]
    Unavailable(String),
}

/// Looks up a short definition for one word, passed exactly as extracted.
pub trait DefinitionProvider {
    fn define(&self, word: &str) -> Result<String, LookupError>;
}

#[derive(Debug, Deserialize)]
struct Entry {
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
}

fn first_definition(entries: &[Entry]) -> Option<String> {
    entries
        .iter()
        .flat_map(|entry| &entry.meanings)
        .flat_map(|meaning| &meaning.definitions)
        .map(|d| d.definition.clone())
        .next()
}

/// dictionaryapi.dev client. One request per lookup, no retries; a failed
/// lookup is retried by the user pressing the key again.
pub struct DictionaryApiClient {
    http: reqwest::blocking::Client,
}

impl DictionaryApiClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for DictionaryApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionProvider for DictionaryApiClient {
    fn define(&self, word: &str) -> Result<String, LookupError> {
        let url = format!("{DICTIONARY_ENDPOINT}/{word}");
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        if !response.status().is_success() {
            return Err(LookupError::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let entries: Vec<Entry> = response
            .json()
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        first_definition(&entries).ok_or(LookupError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shape of a real dictionaryapi.dev answer, trimmed down.
    const HELLO_RESPONSE: &str = r#"[
        {
            "word": "hello",
            "phonetic": "/həˈloʊ/",
            "meanings": [
                {
                    "partOfSpeech": "noun",
                    "definitions": [
                        { "definition": "\"Hello!\" or an equivalent greeting." }
                    ]
                },
                {
                    "partOfSpeech": "verb",
                    "definitions": [
                        { "definition": "To greet with \"hello\"." }
                    ]
                }
            ]
        }
    ]"#;

    #[test]
    fn first_definition_takes_the_first_meaning() {
        let entries: Vec<Entry> = serde_json::from_str(HELLO_RESPONSE).unwrap();
        assert_eq!(
            first_definition(&entries).unwrap(),
            "\"Hello!\" or an equivalent greeting."
        );
    }

    #[test]
    fn unknown_extra_fields_are_tolerated() {
        // the service sends plenty of fields nothing here cares about
        let entries: Vec<Entry> = serde_json::from_str(HELLO_RESPONSE).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].meanings.len(), 2);
    }

    #[test]
    fn empty_response_means_no_definition() {
        let entries: Vec<Entry> = serde_json::from_str("[]").unwrap();
        assert_eq!(first_definition(&entries), None);
    }

    #[test]
    fn meaning_without_definitions_is_skipped() {
        let raw = r#"[ { "meanings": [ { "definitions": [] },
            { "definitions": [ { "definition": "second meaning wins" } ] } ] } ]"#;
        let entries: Vec<Entry> = serde_json::from_str(raw).unwrap();
        assert_eq!(first_definition(&entries).unwrap(), "second meaning wins");
    }

    #[test]
    fn not_found_and_unavailable_stay_distinct() {
        let missing = LookupError::NotFound;
        let down = LookupError::Unavailable("connection refused".to_string());

        assert_ne!(missing, down);
        assert_ne!(missing.to_string(), down.to_string());
        assert!(matches!(missing, LookupError::NotFound));
        assert!(matches!(down, LookupError::Unavailable(_)));
    }

    // Ignored by default: talks to the live service.
    #[test]
    #[ignore]
    fn live_lookup_of_nonsense_is_not_found() {
        let err = DictionaryApiClient::new()
            .define("zqxjvwpt")
            .unwrap_err();
        assert_eq!(err, LookupError::NotFound);
    }
}
