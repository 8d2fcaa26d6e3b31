use crate::error::ProcessError;

/// A program and its arguments, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    elements: Vec<String>,
}

impl CommandSpec {
    /// Build from program + arguments. Fails on an empty sequence.
    pub fn new<I, S>(elements: I) -> Result<Self, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements: Vec<String> = elements.into_iter().map(Into::into).collect();
        if elements.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }
        Ok(Self { elements })
    }

    /// The executable name or path.
    pub fn program(&self) -> &str {
        &self.elements[0]
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// All elements joined into one string safe to hand a POSIX shell:
    /// each element is individually quoted so embedded spaces and
    /// metacharacters are inert.
    pub fn to_shell_string(&self) -> String {
        self.elements
            .iter()
            .map(|e| quote(e))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// POSIX single-quote escaping. Strings made only of safe characters pass
/// through; everything else is wrapped in single quotes, with embedded
/// single quotes rendered as `'"'"'`.
pub fn quote(s: &str) -> String {
    if !s.is_empty() && s.chars().all(is_shell_safe) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push_str("'\"'\"'");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

fn is_shell_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-'
        )
}
