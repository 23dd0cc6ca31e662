//! Element attribute, class and style storage

/// Attribute with an optional value (`None` for boolean attributes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// Ordered attribute list
///
/// Names are stored lower case. Most elements carry only a handful of
/// attributes, so lookups are linear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    attrs: Vec<Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value; boolean attributes read as `""`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Set an attribute, keeping its original position if it already exists
    pub fn set(&mut self, name: &str, value: Option<String>) {
        match self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attribute {
                name: name.to_ascii_lowercase(),
                value,
            }),
        }
    }

    /// Remove an attribute, returning whether it was present
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|a| !a.name.eq_ignore_ascii_case(name));
        self.attrs.len() != before
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    fn find(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Class list (space-separated tokens)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        list.add(s);
        list
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add every whitespace-separated class in `classes`; true if any was new
    pub fn add(&mut self, classes: &str) -> bool {
        let mut added = false;
        for token in classes.split_whitespace() {
            if !self.contains(token) {
                self.tokens.push(token.to_string());
                added = true;
            }
        }
        added
    }

    /// Remove every whitespace-separated class in `classes`; true if any was present
    pub fn remove(&mut self, classes: &str) -> bool {
        let before = self.tokens.len();
        for token in classes.split_whitespace() {
            self.tokens.retain(|t| t != token);
        }
        self.tokens.len() != before
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get value as string
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Set from string
    pub fn set_value(&mut self, value: &str) {
        *self = Self::from_string(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

/// Inline style declarations, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    properties: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `name: value; name: value` declarations
    pub fn parse(style: &str) -> Self {
        let mut decl = Self::new();
        decl.add(style);
        decl
    }

    /// Merge declarations from a style string; later values win
    pub fn add(&mut self, style: &str) {
        for part in style.split(';') {
            let Some((name, value)) = part.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            self.set(&name, value);
        }
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.properties.len() != before
    }

    pub fn clear(&mut self) {
        self.properties.clear();
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Serialized form, e.g. `color: red; width: 10px`
    pub fn value(&self) -> String {
        self.properties
            .iter()
            .map(|(n, v)| format!("{n}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn set_value(&mut self, value: &str) {
        *self = Self::parse(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
