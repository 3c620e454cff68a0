//! Placeholder substitution for command templates.
//!
//! Templates use brace placeholders: `{}` or `{0}` is replaced by the single
//! substitution value, `{{` and `}}` produce literal braces.  Only one value
//! is ever supplied, so any further placeholder is an error.
//!
//! ```text
//! "exec dmenu_run -m {}"  +  "1"  ->  "exec dmenu_run -m 1"
//! ```

/// Errors from a malformed template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("single '{{' encountered in format string")]
    UnmatchedOpen,
    #[error("single '}}' encountered in format string")]
    UnmatchedClose,
    #[error("replacement index {0} out of range for positional args tuple")]
    IndexOutOfRange(usize),
    #[error("unknown placeholder {{{0}}}")]
    UnknownField(String),
    #[error("conversions and format specs are not supported: {{{0}}}")]
    UnsupportedSpec(String),
    #[error("cannot mix automatic and manual field numbering")]
    MixedNumbering,
}

/// Placeholder numbering style; a template must stick to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Unset,
    Auto(usize),
    Manual,
}

/// Replace the placeholders in `template` with `value`.
pub fn substitute(template: &str, value: &str) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut chars = template.chars().peekable();
    let mut numbering = Numbering::Unset;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(FormatError::UnmatchedOpen),
                        Some(ch) => field.push(ch),
                    }
                }
                let index = field_index(&field, &mut numbering)?;
                if index != 0 {
                    return Err(FormatError::IndexOutOfRange(index));
                }
                out.push_str(value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(FormatError::UnmatchedClose),
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Resolve the positional index a placeholder refers to.
fn field_index(field: &str, numbering: &mut Numbering) -> Result<usize, FormatError> {
    if field.contains([':', '!']) {
        return Err(FormatError::UnsupportedSpec(field.to_string()));
    }
    if field.is_empty() {
        let index = match *numbering {
            Numbering::Unset => 0,
            Numbering::Auto(next) => next,
            Numbering::Manual => return Err(FormatError::MixedNumbering),
        };
        *numbering = Numbering::Auto(index + 1);
        return Ok(index);
    }
    let index = field
        .parse::<usize>()
        .map_err(|_| FormatError::UnknownField(field.to_string()))?;
    if let Numbering::Auto(_) = numbering {
        return Err(FormatError::MixedNumbering);
    }
    *numbering = Numbering::Manual;
    Ok(index)
}
