use std::collections::HashMap;

/// Source of variable values for `$NAME` expansion
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

/// Looks variables up in the environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct HostEnvironment;

impl Environment for HostEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces every `$NAME` in `text` with its value.
///
/// Unknown names are left as they were, including the `$`.
pub fn expand_env_vars(text: &str, env: &(impl Environment + ?Sized)) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let start = match chars.peek() {
            Some(&(index, next)) if is_name_start(next) => index,
            _ => {
                result.push('$');
                continue;
            }
        };

        let mut end = text.len();
        while let Some(&(index, next)) = chars.peek() {
            if !is_name_char(next) {
                end = index;
                break;
            }
            chars.next();
        }

        let name = &text[start..end];
        match env.var(name) {
            Some(value) => result.push_str(&value),
            None => {
                result.push('$');
                result.push_str(name);
            }
        }
    }

    result
}
