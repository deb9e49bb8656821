use anyhow::{Result, bail};

/// Fill a `{{name}}` template from named substitutions.
///
/// Every placeholder must have a substitution and every substitution must be
/// used; a mismatch is an error rather than literal `{{name}}` text leaking
/// into a model prompt. Substituted values are never rescanned, so article
/// content containing braces cannot break rendering.
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> Result<String> {
    let mut used = vec![false; substitutions.len()];
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            bail!("unterminated '{{{{' in prompt template");
        };
        let name = &after[..end];
        match substitutions.iter().position(|(n, _)| *n == name) {
            Some(idx) => {
                used[idx] = true;
                out.push_str(substitutions[idx].1);
            }
            None => bail!("template placeholder '{{{{{}}}}}' has no substitution", name),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);

    if let Some(idx) = used.iter().position(|u| !*u) {
        bail!(
            "substitution '{{{{{}}}}}' does not appear in the template",
            substitutions[idx].0
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::render;

    #[test]
    fn fills_named_placeholders() {
        let out = render(
            "Title: {{title}}\nBody: {{content}}",
            &[("title", "Hello"), ("content", "World")],
        )
        .unwrap();
        assert_eq!(out, "Title: Hello\nBody: World");
    }

    #[test]
    fn repeated_placeholder_is_filled_each_time() {
        let out = render("{{x}} and {{x}}", &[("x", "again")]).unwrap();
        assert_eq!(out, "again and again");
    }

    #[test]
    fn missing_substitution_is_an_error() {
        let err = render("Hello {{name}}", &[]).unwrap_err().to_string();
        assert!(err.contains("{{name}}"), "got: {err}");
    }

    #[test]
    fn unused_substitution_is_an_error() {
        let err = render("no placeholders here", &[("name", "x")])
            .unwrap_err()
            .to_string();
        assert!(err.contains("{{name}}"), "got: {err}");
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        assert!(render("broken {{name", &[("name", "x")]).is_err());
    }

    #[test]
    fn braces_in_substituted_values_are_left_alone() {
        let out = render(
            "Body: {{content}}",
            &[("content", "code sample: {{ not a placeholder }}")],
        )
        .unwrap();
        assert_eq!(out, "Body: code sample: {{ not a placeholder }}");
    }
}
