/// Make a foreign object name usable as a target entity name.
///
/// Newlines, tabs and carriage returns are removed; spaces, slashes,
/// backslashes and dots become underscores. The map is fixed, so the same
/// input always yields the same name.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\n' | '\t' | '\r'))
        .map(|c| match c {
            ' ' | '/' | '\\' | '.' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_separators_and_drops_control_characters() {
        assert_eq!(sanitize_name("exceptions list/v2.1"), "exceptions_list_v2_1");
        assert_eq!(sanitize_name("line\nbreak\tname\r"), "linebreakname");
        assert_eq!(sanitize_name("already_clean"), "already_clean");
    }

    #[test]
    fn output_never_contains_disallowed_characters() {
        let sanitized = sanitize_name("a b/c\\d.e\nf\tg\rh");
        assert!(!sanitized.contains([' ', '/', '\\', '.', '\n', '\t', '\r']));
    }

    #[test]
    fn sanitizing_twice_changes_nothing() {
        let once = sanitize_name("corporate fileshares/internal");
        assert_eq!(sanitize_name(&once), once);
    }
}
