//! Named-field substitution for message templates.
//!
//! A template is plain text with `{name}` placeholders. `{{` and `}}`
//! produce literal braces. Substitution is the only control flow; the
//! output goes straight to [`crate::wrap`].

use std::collections::HashMap;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TemplateError {
    #[error("template references unknown field `{0}`")]
    MissingField(String),

    #[error("unterminated field reference at byte {0}")]
    Unterminated(usize),
}

/// Fill `template` with the given fields.
///
/// Every referenced field must be present; a placeholder with no closing
/// brace is malformed. Both cases are errors rather than silent blanks so a
/// bad job never reaches paper.
pub fn compose(template: &str, fields: &HashMap<&str, &str>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(TemplateError::Unterminated(pos));
                }
                match fields.get(name.as_str()) {
                    Some(value) => out.push_str(value),
                    None => return Err(TemplateError::MissingField(name)),
                }
            }
            '}' => {
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}
