//! Naming helpers for stack, change set and logical resource identifiers

use crate::utils::generate_uuid;

/// Maximum length the service accepts for stack and change set names
pub const MAX_NAME_LEN: usize = 128;

/// Stack name budget inside a change set name: 128 minus a 36 char UUID and the `-`
pub const CHANGE_SET_STACK_PREFIX_LEN: usize = 91;

/// Create a valid stack name from a label such as a metric or alarm name
pub fn stack_name_from_label(label: &str) -> String {
    label.to_lowercase().replace(['/', '.'], "-")
}

/// Create a logical name usable as a template resource identifier
pub fn logical_name_from_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, '-' | '/' | '_' | '.' | ' '))
        .collect()
}

/// Truncate `name` to at most `max` bytes, backing off to a char boundary
pub fn trim(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }

    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

/// Stack name as sent to the service
pub fn canonical_stack_name(stack_name: &str) -> String {
    trim(stack_name, MAX_NAME_LEN)
}

/// Generate a fresh change set name for the stack
///
/// Every call yields a new name so retried or abandoned deployments never
/// collide with an earlier change set.
pub fn change_set_name(stack_name: &str) -> String {
    format!(
        "{}-{}",
        trim(stack_name, CHANGE_SET_STACK_PREFIX_LEN),
        generate_uuid()
    )
}
