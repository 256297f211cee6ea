use std::fs;
use std::path::Path;

use rust_embed::Embed;
use serde_json::Value;

use crate::session::deck::CommandCard;
use crate::source::LoadError;

#[derive(Embed)]
#[folder = "assets/decks/"]
struct DeckAssets;

/// `.json` files are command decks; everything else is plain text.
pub fn is_deck_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn bundled_deck_names() -> Vec<String> {
    let mut names: Vec<String> = DeckAssets::iter()
        .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
        .collect();
    names.sort();
    names
}

pub fn load_bundled_deck(name: &str) -> Result<Vec<CommandCard>, LoadError> {
    let file = DeckAssets::get(&format!("{name}.json"))
        .ok_or_else(|| LoadError::UnknownDeck(name.to_string()))?;
    let content = String::from_utf8_lossy(file.data.as_ref());
    parse_deck(name, &content)
}

pub fn load_deck_file(path: &Path) -> Result<Vec<CommandCard>, LoadError> {
    let resolved = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let content = fs::read_to_string(&resolved).map_err(|source| LoadError::Read {
        path: resolved.clone(),
        source,
    })?;
    parse_deck(&resolved.display().to_string(), &content)
}

/// Accepts a top-level array of cards, or an object holding exactly one
/// array of cards.
pub fn parse_deck(name: &str, content: &str) -> Result<Vec<CommandCard>, LoadError> {
    let value: Value = serde_json::from_str(content).map_err(|source| LoadError::DeckJson {
        name: name.to_string(),
        source,
    })?;
    let invalid = |message: String| LoadError::InvalidDeck {
        name: name.to_string(),
        message,
    };

    let entries = match &value {
        Value::Array(entries) => entries,
        Value::Object(map) => {
            let mut arrays = map.values().filter_map(Value::as_array);
            match (arrays.next(), arrays.next()) {
                (Some(entries), None) => entries,
                _ => return Err(invalid("deck files must hold an array of cards".to_string())),
            }
        }
        _ => return Err(invalid("deck files must hold an array of cards".to_string())),
    };

    if entries.is_empty() {
        return Err(invalid("deck files must hold a non-empty array".to_string()));
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_card(index, entry).map_err(invalid))
        .collect()
}

fn parse_card(index: usize, entry: &Value) -> Result<CommandCard, String> {
    let Some(card) = entry.as_object() else {
        return Err(format!("card at index {index} must be an object"));
    };
    let id = card
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| format!("card at index {index} is missing an integer id"))?;
    let text_field = |field: &str| {
        card.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| format!("card at index {index} is missing a {field} string"))
    };

    Ok(CommandCard {
        id,
        command: text_field("command")?,
        description: text_field("description")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array_deck() {
        let deck = parse_deck(
            "test",
            r#"[{"id": 1, "command": "ls", "description": "List files"}]"#,
        )
        .unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].command, "ls");
        assert_eq!(deck[0].description, "List files");
    }

    #[test]
    fn test_parse_object_with_single_array() {
        let deck = parse_deck(
            "test",
            r#"{"cards": [{"id": 7, "command": "pwd", "description": "Print directory"}]}"#,
        )
        .unwrap();
        assert_eq!(deck[0].id, 7);
    }

    #[test]
    fn test_object_with_two_arrays_rejected() {
        let err = parse_deck("test", r#"{"a": [], "b": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidDeck { .. }));
    }

    #[test]
    fn test_empty_deck_rejected() {
        assert!(matches!(
            parse_deck("test", "[]"),
            Err(LoadError::InvalidDeck { .. })
        ));
    }

    #[test]
    fn test_card_validation_messages() {
        let cases = [
            (r#"[42]"#, "card at index 0 must be an object"),
            (
                r#"[{"id": 1.5, "command": "a", "description": "b"}]"#,
                "card at index 0 is missing an integer id",
            ),
            (
                r#"[{"id": 1, "command": "  ", "description": "b"}]"#,
                "card at index 0 is missing a command string",
            ),
            (
                r#"[{"id": 1, "command": "a", "description": "b"}, {"id": 2, "command": "a"}]"#,
                "card at index 1 is missing a description string",
            ),
        ];
        for (json, expected) in cases {
            match parse_deck("test", json) {
                Err(LoadError::InvalidDeck { message, .. }) => assert_eq!(message, expected),
                other => panic!("expected InvalidDeck for {json}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_deck("test", "[{"),
            Err(LoadError::DeckJson { .. })
        ));
    }

    #[test]
    fn test_bundled_decks() {
        let names = bundled_deck_names();
        assert!(names.contains(&"git".to_string()));
        let git = load_bundled_deck("git").unwrap();
        assert_eq!(git[0].command, "git init");
        assert!(matches!(
            load_bundled_deck("nope"),
            Err(LoadError::UnknownDeck(_))
        ));
    }

    #[test]
    fn test_is_deck_path() {
        assert!(is_deck_path(Path::new("decks/git.json")));
        assert!(is_deck_path(Path::new("DECK.JSON")));
        assert!(!is_deck_path(Path::new("notes.txt")));
        assert!(!is_deck_path(Path::new("README")));
    }

    #[test]
    fn test_load_deck_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.json");
        fs::write(&path, r#"[{"id": 1, "command": "top", "description": "Processes"}]"#).unwrap();
        assert_eq!(load_deck_file(&path).unwrap()[0].command, "top");
    }
}
