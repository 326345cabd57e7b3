/// Maps an exported symbol onto the file name of its module.
///
/// The first character is lower-cased, and every later ASCII uppercase
/// letter is lower-cased and prefixed with `separator`:
///
/// - `("DatePicker", "")` -> `datepicker`
/// - `("DatePicker", "-")` -> `date-picker`
pub fn transform_symbol_name(name: &str, separator: &str) -> String {
    let mut chars = name.chars();
    let mut out = String::with_capacity(name.len() + separator.len() * 2);
    match chars.next() {
        Some(first) => out.extend(first.to_lowercase()),
        None => return out,
    }
    for c in chars {
        if c.is_ascii_uppercase() {
            out.push_str(separator);
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Builds `<library>/<directory>/<file>` the way node's `path.join` would,
/// always with forward slashes so generated source is the same on every
/// platform.
pub fn submodule_path(library_name: &str, library_directory: &str, file_name: &str) -> String {
    let joined = [library_name, library_directory, file_name]
        .iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace('\\', "/"))
        .collect::<Vec<_>>()
        .join("/");
    path_clean::clean(&joined)
}
