//! Path segment sanitization
//!
//! Display names from the host hierarchy become directory and file names. Only
//! ASCII letters, digits, space, newline and period survive; anything else is
//! dropped and the result is trimmed.

use regex::Regex;
use std::sync::OnceLock;

/// Extensions the exporter appends to component base names
pub const RESERVED_EXTENSIONS: [&str; 3] = ["stp", "stl", "igs"];

fn disallowed() -> &'static Regex {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    DISALLOWED.get_or_init(|| Regex::new(r"[^a-zA-Z0-9 \n.]").expect("static pattern is valid"))
}

/// Maps a display name onto a safe path segment
///
/// Never fails; a name made only of disallowed characters yields `""`.
///
/// # Examples
///
/// ```
/// use designvault::core::naming::sanitize;
///
/// assert_eq!(sanitize("  Bracket (rev B)/2 "), "Bracket rev B2");
/// assert_eq!(sanitize("#?*"), "");
/// ```
pub fn sanitize(raw_name: &str) -> String {
    disallowed().replace_all(raw_name, "").trim().to_string()
}

/// Sanitizes a name that will have a format extension appended
///
/// A result ending in `stp`, `stl` or `igs` gets an underscore before those
/// three characters so `<name>.<ext>` can never read as an exporter artifact.
/// When the suffix follows a period, the period becomes the underscore:
/// `"Part.stp"` turns into `"Part_stp"`, `"Partstl"` into `"Part_stl"`.
pub fn sanitize_as_base_name(raw_name: &str) -> String {
    let name = sanitize(raw_name);

    let Some(suffix) = RESERVED_EXTENSIONS
        .iter()
        .find(|ext| name.ends_with(*ext))
    else {
        return name;
    };

    let stem = &name[..name.len() - suffix.len()];
    let stem = stem.strip_suffix('.').unwrap_or(stem);
    format!("{stem}_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Widget", "Widget" ; "plain name untouched")]
    #[test_case("Bracket (rev B)", "Bracket rev B" ; "parentheses dropped")]
    #[test_case("a/b\\c:d", "abcd" ; "path separators dropped")]
    #[test_case("  spaced  ", "spaced" ; "trimmed")]
    #[test_case("Ünïcødé", "ncd" ; "non ascii letters dropped")]
    #[test_case("v1.2", "v1.2" ; "periods kept")]
    #[test_case("line\nbreak", "line\nbreak" ; "inner newline kept")]
    #[test_case("\n edge \n", "edge" ; "outer newlines trimmed")]
    #[test_case("%%%", "" ; "all disallowed yields empty")]
    fn test_sanitize(raw: &str, expected: &str) {
        assert_eq!(sanitize(raw), expected);
    }

    #[test_case("Part.stp", "Part_stp" ; "dotted step suffix")]
    #[test_case("Part.stl", "Part_stl" ; "dotted stl suffix")]
    #[test_case("Part.igs", "Part_igs" ; "dotted iges suffix")]
    #[test_case("Partstp", "Part_stp" ; "bare step suffix")]
    #[test_case("stl", "_stl" ; "suffix only")]
    #[test_case("Part.STP", "Part.STP" ; "case sensitive")]
    #[test_case("Part.dxf", "Part.dxf" ; "dxf not reserved")]
    #[test_case("Part (1).stp", "Part 1_stp" ; "sanitized before suffix check")]
    fn test_sanitize_as_base_name(raw: &str, expected: &str) {
        assert_eq!(sanitize_as_base_name(raw), expected);
    }

    #[test]
    fn test_bare_suffix_grows_by_one_and_keeps_suffix() {
        for raw in ["Gearstp", "Gearstl", "Gearigs"] {
            let out = sanitize_as_base_name(raw);
            assert_eq!(out.len(), raw.len() + 1);
            assert_eq!(&out[out.len() - 3..], &raw[raw.len() - 3..]);
            assert_eq!(out.as_bytes()[out.len() - 4], b'_');
        }
    }

    #[test]
    fn test_sanitize_only_removes_disallowed() {
        let raw = "A-b_c.d e#f";
        let out = sanitize(raw);
        let expected: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '\n' | '.'))
            .collect();
        assert_eq!(out, expected.trim());
    }
}
