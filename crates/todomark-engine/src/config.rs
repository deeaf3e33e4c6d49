use serde::{Deserialize, Serialize};

/// Name of the built-in unchecked state.
pub const UNCHECKED: &str = "unchecked";
/// Name of the built-in checked state.
pub const CHECKED: &str = "checked";

/// Optional value-dependent styling hook for a metadata tag.
///
/// Evaluated lazily by rendering layers; discovery never calls it.
pub type StyleFn = fn(&str) -> String;

/// A named todo state and its marker spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDef {
    pub name: String,
    /// Marker glyph written in the buffer, e.g. `□` or `✔`. Typically multi-byte.
    pub marker: String,
    /// Inner character(s) of the native checkbox spelling, e.g. `" "` or `"x"`.
    /// `None` means this state has no native spelling.
    pub native: Option<String>,
}

impl StateDef {
    pub fn new(name: &str, marker: &str, native: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            marker: marker.to_string(),
            native: native.map(str::to_string),
        }
    }
}

/// An `@name(value)` metadata tag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataTagDef {
    pub name: String,
    /// If set, this spelling is an alias and resolves to the named tag.
    #[serde(default)]
    pub alias_for: Option<String>,
    /// Accepted/completable values. Empty means free-form.
    #[serde(default)]
    pub choices: Vec<String>,
    /// Value-dependent styling, evaluated lazily by rendering layers.
    #[serde(skip)]
    pub style: Option<StyleFn>,
}

impl MetadataTagDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias_for: None,
            choices: Vec::new(),
            style: None,
        }
    }

    pub fn alias(name: &str, alias_for: &str) -> Self {
        Self {
            name: name.to_string(),
            alias_for: Some(alias_for.to_string()),
            choices: Vec::new(),
            style: None,
        }
    }
}

/// Configuration consumed by the recognizer, discovery and linter.
///
/// Todo states and metadata tags are open, user-extensible registries rather
/// than closed enums; hosts register additional entries at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoConfig {
    pub states: Vec<StateDef>,
    pub metadata: Vec<MetadataTagDef>,
    /// Accepted unordered list bullet characters.
    pub bullets: Vec<char>,
    /// Whether ordered markers (`1.` / `1)`) are recognized as list items.
    pub ordered_markers: bool,
    /// Whether the native checkbox spelling (`[ ]` / `[x]`) is accepted as an
    /// alternate todo-marker spelling.
    pub native_checkboxes: bool,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            states: vec![
                StateDef::new(UNCHECKED, "□", Some(" ")),
                StateDef::new(CHECKED, "✔", Some("x")),
            ],
            metadata: Vec::new(),
            bullets: vec!['-', '*', '+'],
            ordered_markers: true,
            native_checkboxes: true,
        }
    }
}

impl TodoConfig {
    pub fn state(&self, name: &str) -> Option<&StateDef> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Registers a state, replacing any existing state of the same name.
    pub fn register_state(&mut self, def: StateDef) {
        self.states.retain(|s| s.name != def.name);
        self.states.push(def);
    }

    pub fn tag(&self, name: &str) -> Option<&MetadataTagDef> {
        self.metadata.iter().find(|t| t.name == name)
    }

    /// Registers a metadata tag, replacing any existing tag of the same name.
    pub fn register_tag(&mut self, def: MetadataTagDef) {
        self.metadata.retain(|t| t.name != def.name);
        self.metadata.push(def);
    }

    /// Resolves a tag spelling to its canonical name. Unknown tags and tags
    /// without an alias resolve to themselves.
    pub fn canonical_tag<'a>(&'a self, name: &'a str) -> &'a str {
        self.tag(name)
            .and_then(|t| t.alias_for.as_deref())
            .unwrap_or(name)
    }

    pub fn is_bullet(&self, c: char) -> bool {
        self.bullets.contains(&c)
    }
}
