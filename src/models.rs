//! Domain types shared with the deck generator API.
//!
//! Field names follow the backend's JSON so most types derive serde directly.
//! Card fields are the exception: their keys depend on the deck's card type,
//! so [`CardFields`] maps the known schemas onto typed variants by hand.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const FIELD_FRONT: &str = "Front";
pub const FIELD_BACK: &str = "Back";
pub const FIELD_TEXT: &str = "Text";
pub const FIELD_TRANSLATION: &str = "Translation";
pub const FIELD_EXPLANATION: &str = "Explanation";

const BASIC_FIELDS: &[&str] = &[FIELD_FRONT, FIELD_BACK];
const CLOZE_FIELDS: &[&str] = &[FIELD_TEXT, FIELD_TRANSLATION, FIELD_EXPLANATION];

/// Card type of a deck
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    #[default]
    Basic,
    Cloze,
    Reversed,
}

impl CardType {
    pub const ALL: [CardType; 3] = [CardType::Basic, CardType::Cloze, CardType::Reversed];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Basic => "basic",
            CardType::Cloze => "cloze",
            CardType::Reversed => "reversed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardType::Basic => "Basic",
            CardType::Cloze => "Cloze",
            CardType::Reversed => "Reversed",
        }
    }

    /// Field names of this card type's schema, in display order
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            CardType::Basic | CardType::Reversed => BASIC_FIELDS,
            CardType::Cloze => CLOZE_FIELDS,
        }
    }

    /// A field set with every schema field present and empty
    pub fn empty_fields(&self) -> CardFields {
        match self {
            CardType::Basic | CardType::Reversed => CardFields::Basic {
                front: String::new(),
                back: String::new(),
            },
            CardType::Cloze => CardFields::Cloze {
                text: String::new(),
                translation: String::new(),
                explanation: String::new(),
            },
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of a card.
///
/// Serialized as a flat JSON object (`{"Front": "...", "Back": "..."}`). Maps
/// whose keys are exactly one of the known schemas become the typed variants;
/// anything else is kept as ordered pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardFields {
    Basic {
        front: String,
        back: String,
    },
    Cloze {
        text: String,
        translation: String,
        explanation: String,
    },
    Custom(Vec<(String, String)>),
}

impl CardFields {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        if has_exact_keys(&pairs, BASIC_FIELDS) {
            CardFields::Basic {
                front: value_of(&pairs, FIELD_FRONT),
                back: value_of(&pairs, FIELD_BACK),
            }
        } else if has_exact_keys(&pairs, CLOZE_FIELDS) {
            CardFields::Cloze {
                text: value_of(&pairs, FIELD_TEXT),
                translation: value_of(&pairs, FIELD_TRANSLATION),
                explanation: value_of(&pairs, FIELD_EXPLANATION),
            }
        } else {
            CardFields::Custom(pairs)
        }
    }

    /// Field names in display order
    pub fn names(&self) -> Vec<&str> {
        match self {
            CardFields::Basic { .. } => BASIC_FIELDS.to_vec(),
            CardFields::Cloze { .. } => CLOZE_FIELDS.to_vec(),
            CardFields::Custom(pairs) => pairs.iter().map(|(k, _)| k.as_str()).collect(),
        }
    }

    pub fn entries(&self) -> Vec<(&str, &str)> {
        match self {
            CardFields::Basic { front, back } => {
                vec![(FIELD_FRONT, front.as_str()), (FIELD_BACK, back.as_str())]
            }
            CardFields::Cloze {
                text,
                translation,
                explanation,
            } => vec![
                (FIELD_TEXT, text.as_str()),
                (FIELD_TRANSLATION, translation.as_str()),
                (FIELD_EXPLANATION, explanation.as_str()),
            ],
            CardFields::Custom(pairs) => pairs
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    /// Overwrite a field. A name outside the Basic or Cloze schema turns the
    /// fields into an open map that keeps the existing pairs.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self {
            CardFields::Basic { front, .. } if name == FIELD_FRONT => *front = value,
            CardFields::Basic { back, .. } if name == FIELD_BACK => *back = value,
            CardFields::Cloze { text, .. } if name == FIELD_TEXT => *text = value,
            CardFields::Cloze { translation, .. } if name == FIELD_TRANSLATION => *translation = value,
            CardFields::Cloze { explanation, .. } if name == FIELD_EXPLANATION => *explanation = value,
            CardFields::Custom(pairs) => match pairs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value,
                None => pairs.push((name.to_string(), value)),
            },
            _ => {
                let mut pairs: Vec<(String, String)> = self
                    .entries()
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                pairs.push((name.to_string(), value));
                *self = CardFields::Custom(pairs);
            }
        }
    }

    /// Whether the field set is the schema implied by `card_type`
    pub fn matches(&self, card_type: CardType) -> bool {
        match (self, card_type) {
            (CardFields::Basic { .. }, CardType::Basic | CardType::Reversed) => true,
            (CardFields::Cloze { .. }, CardType::Cloze) => true,
            _ => false,
        }
    }
}

fn has_exact_keys(pairs: &[(String, String)], names: &[&str]) -> bool {
    pairs.len() == names.len() && names.iter().all(|n| pairs.iter().any(|(k, _)| k == n))
}

fn value_of(pairs: &[(String, String)], name: &str) -> String {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

impl Serialize for CardFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CardFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = CardFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CardFields, A::Error> {
                let mut pairs = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, Option<String>>()? {
                    pairs.push((key, value.unwrap_or_default()));
                }
                Ok(CardFields::from_pairs(pairs))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// Identity of a card row in the editor.
///
/// Rows loaded from the server are `Persisted`. Rows added locally carry a
/// negative placeholder (-1, -2, ...) until a save creates them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardId {
    Persisted(u64),
    Pending(i64),
}

impl CardId {
    pub fn is_persisted(&self) -> bool {
        matches!(self, CardId::Persisted(_))
    }

    /// Signed form; placeholders are negative, server ids are not
    pub fn as_i64(&self) -> i64 {
        match self {
            CardId::Persisted(id) => *id as i64,
            CardId::Pending(placeholder) => *placeholder,
        }
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardId::Persisted(id) => write!(f, "{}", id),
            CardId::Pending(_) => f.write_str("new"),
        }
    }
}

/// A deck as returned by the API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub card_type: CardType,
    #[serde(default)]
    pub card_count: u32,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub csv_path: String,
    #[serde(default)]
    pub apkg_path: Option<String>,
}

/// Accepts both offset-qualified RFC 3339 and the naive ISO form Python emits
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

/// Payload for `POST /decks`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeckCreate {
    pub name: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub card_type: CardType,
}

/// Payload for `PUT /decks/{id}`; absent fields are left untouched
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DeckUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Query filters for `GET /decks`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeckFilter {
    pub language: Option<String>,
    pub tag: Option<String>,
}

impl DeckFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(language) = self.language.as_ref().filter(|l| !l.is_empty()) {
            pairs.push(("language", language.clone()));
        }
        if let Some(tag) = self.tag.as_ref().filter(|t| !t.is_empty()) {
            pairs.push(("tag", tag.clone()));
        }
        pairs
    }
}

/// A persisted card
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    pub deck_id: String,
    pub fields: CardFields,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardCreate {
    pub fields: CardFields,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<CardFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Body of `POST /cards/{deck}/cards/batch`
#[derive(Debug, Serialize)]
pub struct CardBatch<'a> {
    pub cards: &'a [CardCreate],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Basic,
    Cloze,
}

/// A card template; read-only from the client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TemplateType,
    pub qfmt: String,
    pub afmt: String,
    #[serde(default)]
    pub css: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Column separator for pasted text imports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Separator {
    #[default]
    Tab,
    Comma,
    Semicolon,
    Pipe,
}

impl Separator {
    pub const ALL: [Separator; 4] = [
        Separator::Tab,
        Separator::Comma,
        Separator::Semicolon,
        Separator::Pipe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Tab => "\t",
            Separator::Comma => ",",
            Separator::Semicolon => ";",
            Separator::Pipe => "|",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Separator::Tab => "Tab",
            Separator::Comma => "Comma",
            Separator::Semicolon => "Semicolon",
            Separator::Pipe => "Pipe",
        }
    }
}

/// CSV file import request
#[derive(Clone, Debug, PartialEq)]
pub struct CsvImport {
    pub path: PathBuf,
    pub deck_name: Option<String>,
    pub language: String,
    pub card_type: CardType,
}

impl CsvImport {
    /// Text parts of the multipart form; the file part is added separately
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(name) = &self.deck_name {
            fields.push(("deck_name", name.clone()));
        }
        fields.push(("language", self.language.clone()));
        fields.push(("card_type", self.card_type.as_str().to_string()));
        fields
    }
}

/// Pasted text import request
#[derive(Clone, Debug, PartialEq)]
pub struct TextImport {
    pub text: String,
    pub deck_name: String,
    pub language: String,
    pub separator: Separator,
    pub card_type: CardType,
}

impl TextImport {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("text", self.text.clone()),
            ("deck_name", self.deck_name.clone()),
            ("language", self.language.clone()),
            ("separator", self.separator.as_str().to_string()),
            ("card_type", self.card_type.as_str().to_string()),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DeckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub deck: Option<Deck>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DeckListResponse {
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub decks: Vec<Deck>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CardResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub card: Option<Card>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CardListResponse {
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TemplateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub template: Option<Template>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TemplateListResponse {
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub templates: Vec<Template>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TagsResponse {
    pub success: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn basic_fields_become_typed_variant() {
        let fields: CardFields =
            serde_json::from_value(json!({"Back": "Hola", "Front": "Hello"})).unwrap();
        assert_eq!(
            fields,
            CardFields::Basic {
                front: "Hello".into(),
                back: "Hola".into()
            }
        );
        assert_eq!(fields.names(), vec!["Front", "Back"]);
        assert!(fields.matches(CardType::Reversed));
        assert!(!fields.matches(CardType::Cloze));
    }

    #[test]
    fn cloze_fields_become_typed_variant() {
        let fields: CardFields = serde_json::from_value(json!({
            "Text": "Yo {{c1::hablo}} español",
            "Translation": "I speak Spanish",
            "Explanation": "present tense"
        }))
        .unwrap();
        assert!(fields.matches(CardType::Cloze));
        assert_eq!(fields.get("Translation"), Some("I speak Spanish"));
    }

    #[test]
    fn unknown_schema_keeps_order() {
        let fields: CardFields =
            serde_json::from_str(r#"{"Word": "gato", "Meaning": "cat", "Gender": null}"#).unwrap();
        assert_eq!(fields.names(), vec!["Word", "Meaning", "Gender"]);
        assert_eq!(fields.get("Gender"), Some(""));
        assert!(!fields.matches(CardType::Basic));
    }

    #[test]
    fn fields_serialize_as_flat_object() {
        let fields = CardFields::Basic {
            front: "Goodbye".into(),
            back: "Adiós".into(),
        };
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!({"Front": "Goodbye", "Back": "Adiós"})
        );
    }

    #[test]
    fn set_opens_the_schema_for_unknown_fields() {
        let mut fields = CardType::Basic.empty_fields();
        fields.set("Back", "Hola");
        assert_eq!(fields, CardFields::Basic { front: String::new(), back: "Hola".into() });

        fields.set("Notes", "greeting");
        assert_eq!(fields.names(), vec!["Front", "Back", "Notes"]);
        assert_eq!(fields.get("Back"), Some("Hola"));
        assert_eq!(fields.get("Notes"), Some("greeting"));

        let mut custom = CardFields::Custom(vec![("Word".into(), String::new())]);
        custom.set("Word", "perro");
        custom.set("Notes", "noun");
        assert_eq!(custom.names(), vec!["Word", "Notes"]);
        assert_eq!(custom.get("Word"), Some("perro"));
    }

    #[test]
    fn empty_fields_follow_card_type() {
        assert_eq!(CardType::Reversed.empty_fields().names(), vec!["Front", "Back"]);
        assert_eq!(
            CardType::Cloze.empty_fields().names(),
            vec!["Text", "Translation", "Explanation"]
        );
    }

    #[test]
    fn deck_parses_backend_shape() {
        let deck: Deck = serde_json::from_value(json!({
            "id": "spanish_vocab",
            "name": "Spanish Vocabulary",
            "language": "spanish",
            "description": null,
            "tags": ["vocabulary"],
            "card_type": "basic",
            "card_count": 12,
            "created_at": "2024-05-01T10:20:30.123456",
            "updated_at": "2024-05-02T08:00:00+00:00",
            "csv_path": "csv/spanish_vocab.csv",
            "apkg_path": null
        }))
        .unwrap();
        assert_eq!(deck.card_type, CardType::Basic);
        assert_eq!(deck.card_count, 12);
        assert!(deck.created_at.is_some());
        assert!(deck.updated_at.is_some());
        assert_eq!(deck.apkg_path, None);
    }

    #[test]
    fn deck_create_sends_empty_tag_list() {
        let draft = DeckCreate {
            name: "Spanish Vocabulary".into(),
            language: "spanish".into(),
            description: None,
            tags: Vec::new(),
            card_type: CardType::Basic,
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({
                "name": "Spanish Vocabulary",
                "language": "spanish",
                "tags": [],
                "card_type": "basic"
            })
        );
    }

    #[test]
    fn template_type_key_is_renamed() {
        let template: Template = serde_json::from_value(json!({
            "id": "basic",
            "name": "Basic",
            "type": "basic",
            "qfmt": "{{Front}}",
            "afmt": "{{FrontSide}}<hr id=answer>{{Back}}",
            "is_default": true
        }))
        .unwrap();
        assert_eq!(template.kind, TemplateType::Basic);
        assert!(template.is_default);
        assert_eq!(template.css, None);
    }

    #[test]
    fn filter_skips_empty_values() {
        let filter = DeckFilter {
            language: Some("french".into()),
            tag: Some(String::new()),
        };
        assert_eq!(filter.query_pairs(), vec![("language", "french".to_string())]);
        assert!(DeckFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn card_id_sign_convention() {
        assert_eq!(CardId::Pending(-3).as_i64(), -3);
        assert!(CardId::Persisted(0).is_persisted());
        assert_eq!(CardId::Pending(-1).to_string(), "new");
    }
}
