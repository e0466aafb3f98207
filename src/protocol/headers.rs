//! Header parsing and key normalization for the Inertia protocol.
//!
//! # Header Formats
//!
//! | Header | Format | Example |
//! |--------|--------|---------|
//! | X-Inertia | boolean literal | `true` |
//! | X-Inertia-Partial-Data | comma-separated keys | `users, filters` |
//! | X-Inertia-Partial-Except | comma-separated keys | `stats` |
//! | X-Inertia-Reset | comma-separated keys | `results` |
//!
//! # Examples
//!
//! ```
//! use inertia_axum::protocol::{parse_key_list, to_camel_case};
//!
//! assert_eq!(parse_key_list("users, filters,,"), vec!["users", "filters"]);
//! assert_eq!(to_camel_case("TestFunc"), "testFunc");
//! assert_eq!(to_camel_case("URLValue"), "urlValue");
//! assert_eq!(to_camel_case("created_at"), "created_at");
//! ```

/// Parse a comma-separated key list.
///
/// Entries are trimmed and empty entries are dropped, so `""` yields an empty list.
///
/// # Examples
///
/// ```
/// use inertia_axum::protocol::parse_key_list;
///
/// assert!(parse_key_list("").is_empty());
/// assert_eq!(parse_key_list(" a ,b"), vec!["a", "b"]);
/// ```
pub fn parse_key_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize a prop or field name to camelCase.
///
/// Only the leading run of uppercase letters is lowercased, keeping the last
/// one when it starts the next word. Separators, digits and everything after
/// the first word are left alone, so `Address.City` becomes `address.City`.
pub fn to_camel_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if !chars.first().is_some_and(|c| c.is_uppercase()) {
        return key.to_string();
    }

    let mut lower = 0;
    for i in 0..chars.len() {
        if i == 1 && !chars[i].is_uppercase() {
            break;
        }
        if i > 0 && i + 1 < chars.len() && !chars[i + 1].is_uppercase() {
            if chars[i + 1] == ' ' {
                lower = i + 1;
            }
            break;
        }
        lower = i + 1;
    }

    chars[..lower]
        .iter()
        .flat_map(|c| c.to_lowercase())
        .chain(chars[lower..].iter().copied())
        .collect()
}

/// Whether a prop key is named by a header key list entry.
///
/// Matching is case-insensitive against both the raw key and its camelCase form,
/// so `UserName` is selected by `userName`.
pub fn key_in_list(key: &str, list: &[String]) -> bool {
    let camel = to_camel_case(key);
    list.iter()
        .any(|k| k.eq_ignore_ascii_case(key) || k.eq_ignore_ascii_case(&camel))
}

/// Parse the `X-Inertia` header value.
///
/// Any boolean literal marks the request as an Inertia request; the value itself
/// is not significant.
#[inline]
pub fn parse_inertia_flag(value: &str) -> bool {
    let v = value.trim();
    v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_list() {
        assert_eq!(parse_key_list("testFunc,testMerge"), vec!["testFunc", "testMerge"]);
    }

    #[test]
    fn test_parse_key_list_trims_and_skips_empty() {
        assert_eq!(parse_key_list(" a , , b ,"), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_key_list_empty() {
        assert!(parse_key_list("").is_empty());
        assert!(parse_key_list(" , ").is_empty());
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("Test"), "test");
        assert_eq!(to_camel_case("TestFunc"), "testFunc");
        assert_eq!(to_camel_case("testMerge"), "testMerge");
        assert_eq!(to_camel_case("errors"), "errors");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_to_camel_case_keeps_inner_words() {
        assert_eq!(to_camel_case("test_func"), "test_func");
        assert_eq!(to_camel_case("userID"), "userID");
        assert_eq!(to_camel_case("myURL"), "myURL");
        assert_eq!(to_camel_case("page2col"), "page2col");
        assert_eq!(to_camel_case("sha256sum"), "sha256sum");
        assert_eq!(to_camel_case("Address.City"), "address.City");
        assert_eq!(to_camel_case("Items[0].Name"), "items[0].Name");
    }

    #[test]
    fn test_to_camel_case_leading_acronym() {
        assert_eq!(to_camel_case("ID"), "id");
        assert_eq!(to_camel_case("URLValue"), "urlValue");
        assert_eq!(to_camel_case("ABC DEF"), "abc DEF");
        assert_eq!(to_camel_case("IOStream"), "ioStream");
    }

    #[test]
    fn test_key_in_list_is_case_insensitive() {
        let list = vec!["testfunc".to_string(), "created_at".to_string()];
        assert!(key_in_list("TestFunc", &list));
        assert!(key_in_list("Created_At", &list));
        assert!(!key_in_list("other", &list));
    }

    #[test]
    fn test_parse_inertia_flag() {
        assert!(parse_inertia_flag("true"));
        assert!(parse_inertia_flag("True"));
        assert!(parse_inertia_flag("false"));
        assert!(!parse_inertia_flag("yes"));
        assert!(!parse_inertia_flag(""));
    }
}
