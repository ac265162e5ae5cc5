//! Composite attribute names
//!
//! A composite name joins a type name and an attribute name with a split
//! character, e.g. `"person.name"` with `'.'`. The split character must occur
//! exactly once. Either half may be empty; an empty half simply resolves to
//! the invalid sentinel downstream.

use gdbkit_core::{Error, Result};

/// Split `composite` into `(type, attribute)` at the single `split` character.
///
/// # Errors
///
/// Returns [`Error::NameResolution`] if `split` does not occur, or occurs
/// more than once.
///
/// # Example
///
/// ```
/// use gdbkit_engine::split_attribute_name;
///
/// assert_eq!(split_attribute_name("person.name", '.').unwrap(), ("person", "name"));
/// assert_eq!(split_attribute_name("person.", '.').unwrap(), ("person", ""));
/// assert!(split_attribute_name("a.b.c", '.').is_err());
/// ```
pub fn split_attribute_name(composite: &str, split: char) -> Result<(&str, &str)> {
    let unsplittable = || Error::NameResolution {
        name: composite.to_string(),
        split,
    };

    let at = composite.find(split).ok_or_else(unsplittable)?;
    let attribute = &composite[at + split.len_utf8()..];
    if attribute.contains(split) {
        return Err(unsplittable());
    }
    Ok((&composite[..at], attribute))
}
