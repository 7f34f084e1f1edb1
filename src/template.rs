//! Literal `$name` template substitution and template-driven publishing.
//!
//! Substitution is deliberately primitive: placeholders are replaced
//! verbatim from a mapping, with no expression language. The template page
//! author is responsible for producing valid storage-format markup.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::ports::content::ContentService;

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Substitutes `$name` and `${name}` placeholders from `vars`; `$$` escapes
/// a literal dollar sign. Strict: an unresolved well-formed placeholder or a
/// dangling `$` fails instead of emitting a partial result.
///
/// # Errors
///
/// Returns [`Error::InputValidation`] for unresolved or malformed
/// placeholders.
pub fn substitute(template: &str, vars: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&(_, '$')) => {
                chars.next();
                out.push('$');
            }
            Some(&(_, '{')) => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed || name.is_empty() || !name.chars().all(is_ident_continue) {
                    return Err(Error::InputValidation(format!(
                        "invalid placeholder at offset {pos}"
                    )));
                }
                out.push_str(resolve(&name, vars, pos)?);
            }
            Some(&(_, c)) if is_ident_start(c) => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if is_ident_continue(c) {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(resolve(&name, vars, pos)?);
            }
            _ => {
                return Err(Error::InputValidation(format!(
                    "invalid placeholder at offset {pos}"
                )));
            }
        }
    }
    Ok(out)
}

fn resolve<'a>(name: &str, vars: &'a BTreeMap<String, String>, pos: usize) -> Result<&'a str> {
    vars.get(name).map(String::as_str).ok_or_else(|| {
        Error::InputValidation(format!("unresolved placeholder '${name}' at offset {pos}"))
    })
}

/// Fetches the template page's body, substitutes `vars` into it, and
/// publishes the result as a new page titled `title` under `parent_page_id`.
/// Returns the raw creation response for envelope inspection and labeling.
///
/// # Errors
///
/// Fails if the template cannot be fetched, a placeholder is unresolved, or
/// the page cannot be created.
pub fn publish_from_template(
    content: &dyn ContentService,
    parent_page_id: u64,
    template_page_id: u64,
    title: &str,
    vars: &BTreeMap<String, String>,
) -> Result<Value> {
    let template = content.page_content(template_page_id)?;
    let body = substitute(&template, vars)?;
    content.create_page(Some(parent_page_id), title, &body)
}

/// Extracts the identifier of the page a creation response refers to, for
/// follow-up operations such as labeling.
///
/// # Errors
///
/// Returns [`Error::RemoteService`] when the response carries no usable id.
pub fn created_page_id(response: &Value) -> Result<u64> {
    let id = match response.get("id") {
        Some(Value::String(s)) => s.parse::<u64>().ok(),
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    };
    id.ok_or_else(|| Error::RemoteService {
        code: 200,
        message: "creation response has no page id".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn substitutes_all_placeholders_and_preserves_literal_text() {
        let result = substitute(
            "Hello $NAME, release $RELEASE",
            &vars(&[("NAME", "Ops"), ("RELEASE", "4.8.0")]),
        )
        .unwrap();
        assert_eq!(result, "Hello Ops, release 4.8.0");
        assert!(!result.contains('$'));
    }

    #[test]
    fn braced_placeholders_and_dollar_escape() {
        let result = substitute("${WHO}: $$5", &vars(&[("WHO", "Ops")])).unwrap();
        assert_eq!(result, "Ops: $5");
    }

    #[test]
    fn unresolved_placeholder_fails_without_partial_output() {
        let result = substitute("Hello $NAME and $MISSING", &vars(&[("NAME", "Ops")]));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::InputValidation(_)));
        assert!(err.to_string().contains("$MISSING"));
    }

    #[test]
    fn dangling_dollar_is_malformed() {
        assert!(substitute("cost: $ 5", &vars(&[])).is_err());
        assert!(substitute("cost: $", &vars(&[])).is_err());
        assert!(substitute("${unclosed", &vars(&[("unclosed", "x")])).is_err());
    }

    #[test]
    fn placeholder_name_stops_at_non_identifier_characters() {
        let result = substitute("v$REL.", &vars(&[("REL", "4.8")])).unwrap();
        assert_eq!(result, "v4.8.");
    }

    #[test]
    fn created_page_id_accepts_string_or_number() {
        assert_eq!(created_page_id(&json!({"id": "61210700"})).unwrap(), 61_210_700);
        assert_eq!(created_page_id(&json!({"id": 42})).unwrap(), 42);
        assert!(created_page_id(&json!({"title": "no id"})).is_err());
    }
}
