//! Screen routes

use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    DeckList,
    DeckCreate,
    DeckEdit(String),
    Import,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::DeckList => String::from("/"),
            Route::DeckCreate => String::from("/decks/create"),
            Route::DeckEdit(id) => format!("/decks/{}/edit", id),
            Route::Import => String::from("/import"),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::DeckList),
            ["decks", "create"] => Some(Route::DeckCreate),
            ["decks", id, "edit"] => Some(Route::DeckEdit(id.to_string())),
            ["import"] => Some(Route::Import),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_route_path() {
        assert_eq!(Route::DeckEdit("trip".into()).path(), "/decks/trip/edit");
    }

    #[test]
    fn parse_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::DeckList));
        assert_eq!(Route::parse(""), Some(Route::DeckList));
        assert_eq!(Route::parse("/decks/create"), Some(Route::DeckCreate));
        assert_eq!(
            Route::parse("/decks/spanish_vocab/edit/"),
            Some(Route::DeckEdit("spanish_vocab".into()))
        );
        assert_eq!(Route::parse("import"), Some(Route::Import));
        assert_eq!(Route::parse("/decks/x"), None);
    }
}
