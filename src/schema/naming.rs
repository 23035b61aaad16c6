//! Collection naming
//!
//! A record type is stored under a collection name. The name is the
//! explicit per-type override when one is declared, otherwise the
//! lowercase of the type name (`User` -> `user`).

/// Default collection name for a type name.
pub fn default_collection_name(type_name: &str) -> String {
    type_name.to_lowercase()
}

/// Resolves the collection name, preferring the override.
pub fn collection_name(type_name: &str, collection: Option<&str>) -> String {
    match collection {
        Some(name) => name.to_string(),
        None => default_collection_name(type_name),
    }
}

/// Type names are ASCII identifiers starting with a letter.
pub fn check_type_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Err("type name must not be empty".into()),
        Some(c) if !c.is_ascii_alphabetic() => {
            return Err(format!("type name '{}' must start with a letter", name));
        }
        _ => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("type name '{}' must be alphanumeric", name));
    }
    Ok(())
}

/// Collection names double as file stems on export, so path separators
/// and dots are refused.
pub fn check_collection_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("collection name must not be empty".into());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(format!("collection name '{}' contains invalid characters", name));
    }
    Ok(())
}
