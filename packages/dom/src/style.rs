//! Inline `style` attribute handling.
//!
//! The attribute text is the single source of truth: per-property assignment
//! parses it into ordered declarations, edits them and writes the text back.

/// Parse `style` attribute text into ordered `(property, value)` pairs.
///
/// Declarations without a `:` or with an empty property name are dropped,
/// the way a CSS parser discards invalid declarations.
pub fn parse_declarations(style_text: &str) -> Vec<(String, String)> {
    style_text
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name, value.to_string()))
        })
        .collect()
}

pub fn serialize_declarations(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply one property assignment to style text and return the new text.
///
/// An existing declaration keeps its position; a new one is appended; an
/// empty value removes the property.
pub fn assign_property(style_text: &str, property: &str, value: &str) -> String {
    let property = property.trim().to_ascii_lowercase();
    let value = value.trim();
    let mut declarations = parse_declarations(style_text);

    if value.is_empty() {
        declarations.retain(|(name, _)| *name != property);
    } else if let Some(slot) = declarations.iter_mut().find(|(name, _)| *name == property) {
        slot.1 = value.to_string();
    } else {
        declarations.push((property, value.to_string()));
    }

    serialize_declarations(&declarations)
}

/// Property names are CSS identifiers: letters, digits and `-`, with custom
/// properties (`--name`) allowed.
pub fn is_valid_property_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
