use std::collections::HashMap;

/// Decoded INFO column of one variant record: key to raw value. Flag-only
/// tokens (no '=') map to themselves. Decoded fresh per record, never
/// retained across records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoField {
    fields: HashMap<String, String>,
}

impl InfoField {
    /// Decodes a semicolon-delimited INFO string. A ';' only terminates a
    /// token when the next character is a word character, so semicolons
    /// embedded inside a value (free-text descriptions, trailing ';') stay
    /// part of that value. Later duplicates of a key overwrite earlier ones.
    pub fn decode(raw: &str) -> Self {
        let mut fields = HashMap::new();
        for token in split_info_tokens(raw) {
            match token.split_once('=') {
                Some((key, value)) => fields.insert(key.to_string(), value.to_string()),
                None => fields.insert(token.to_string(), token.to_string()),
            };
        }
        InfoField { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn split_info_tokens(raw: &str) -> Vec<&str> {
    let bytes = raw.as_bytes();
    let mut tokens = Vec::new();
    let mut start = 0;
    for (position, byte) in bytes.iter().enumerate() {
        if *byte == b';' && position + 1 < bytes.len() && is_word_byte(bytes[position + 1]) {
            tokens.push(&raw[start..position]);
            start = position + 1;
        }
    }
    tokens.push(&raw[start..]);
    tokens
}
