//! Isolation of the first balanced JSON object inside free text.

/// Returns the first balanced `{...}` span in `text`.
///
/// Braces inside string literals are ignored and backslash escapes are
/// honoured. When an opening brace never closes, scanning resumes at the
/// next opening brace.
#[must_use]
pub fn first_json_object(text: &str) -> Option<&str> {
    text.char_indices()
        .filter(|(_, ch)| *ch == '{')
        .find_map(|(start, _)| balanced_end(text, start).and_then(|end| text.get(start..=end)))
}

fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.get(start..)?.char_indices() {
        if in_string {
            match (escaped, ch) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::first_json_object;
    use rstest::rstest;

    #[rstest]
    #[case(r#"Here is the result: {"riskLevel":"Critical"} thanks"#, Some(r#"{"riskLevel":"Critical"}"#))]
    #[case(r#"{"a":{"b":1}} and {"c":2}"#, Some(r#"{"a":{"b":1}}"#))]
    #[case(r#"{"text":"a } inside"}"#, Some(r#"{"text":"a } inside"}"#))]
    #[case(r#"{"text":"escaped \" quote }"}"#, Some(r#"{"text":"escaped \" quote }"}"#))]
    #[case(r#"prefix { never closed {"ok":true}"#, Some(r#"{"ok":true}"#))]
    #[case("no braces at all", None)]
    #[case("} backwards {", None)]
    fn isolates_first_balanced_object(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(first_json_object(text), expected);
    }

    #[rstest]
    fn multibyte_prose_is_handled() {
        let text = "Résumé → {\"suggestion\":\"naïve ✓\"} fin";
        assert_eq!(first_json_object(text), Some("{\"suggestion\":\"naïve ✓\"}"));
    }
}
