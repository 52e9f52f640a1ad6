// src/core/template.rs

use crate::constants::TEMPLATE_SLOT;
use crate::models::Platform;
use thiserror::Error;

/// Why an argument template could not be formatted with a command.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// A quoted section is opened but never closed.
    #[error("Argument template '{0}' has unbalanced quoting.")]
    UnbalancedQuotes(String),
    /// The template has nowhere to put the command.
    #[error("Argument template '{0}' has no {slot} slot for the command.", slot = TEMPLATE_SLOT)]
    MissingSlot(String),
    /// The template holds `{0}` more than once.
    #[error("Argument template '{template}' has {count} command slots, expected exactly one.")]
    MultipleSlots {
        /// The offending template.
        template: String,
        /// How many `{0}` slots were found.
        count: usize,
    },
    /// The template references an argument other than `{0}`.
    #[error("Argument template '{template}' references argument {{{index}}}, only {{0}} exists.")]
    IndexOutOfRange {
        /// The offending template.
        template: String,
        /// The index written between the braces.
        index: String,
    },
    /// The braces hold something that is not an index, such as `{0:x}` or `{}`.
    #[error("Argument template '{template}' has an invalid slot '{{{slot}}}'.")]
    InvalidSlot {
        /// The offending template.
        template: String,
        /// The text written between the braces.
        slot: String,
    },
    /// A `{` is never closed.
    #[error("Argument template '{0}' has a '{{' that is never closed.")]
    UnclosedBrace(String),
    /// A `}` appears without a matching `{` and is not doubled.
    #[error("Argument template '{0}' has a lone '}}'; write '}}}}' for a literal brace.")]
    UnescapedBrace(String),
}

/// Formats an argument template into the final argument vector.
///
/// The template is first split into words following the quoting rules of `platform`,
/// then the command text is written into the one word holding `{0}`. The command is
/// therefore never re-tokenised: whatever it contains reaches the interpreter inside a
/// single argument. `{{` and `}}` stand for literal braces. `#` has no special meaning.
///
/// # Errors
/// Fails if the quoting is unbalanced, or if the template does not contain exactly
/// one `{0}` slot and nothing else in braces.
pub fn format_arguments(
    template: &str,
    command: &str,
    platform: Platform,
) -> Result<Vec<String>, TemplateError> {
    let words = split_words(template, platform)
        .ok_or_else(|| TemplateError::UnbalancedQuotes(template.to_string()))?;

    let mut slots = 0;
    let args = words
        .iter()
        .map(|word| render_word(word, command, template, &mut slots))
        .collect::<Result<Vec<String>, TemplateError>>()?;

    match slots {
        0 => Err(TemplateError::MissingSlot(template.to_string())),
        1 => Ok(args),
        count => Err(TemplateError::MultipleSlots {
            template: template.to_string(),
            count,
        }),
    }
}

/// Splits a template into words. Returns `None` if a quote is left open.
///
/// - `Unix`: POSIX word rules without comments. Single quotes are literal, double quotes
///   let a backslash escape only dollar, backtick, double quote, backslash and newline,
///   and a bare backslash escapes the next character.
/// - `Windows`: whitespace and double quotes only. A backslash is an ordinary character,
///   so paths like `C:\scripts\run.ps1` pass through untouched.
fn split_words(template: &str, platform: Platform) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            '"' => {
                in_word = true;
                let mut closed = false;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' if platform == Platform::Unix => match chars.peek() {
                            Some(&'\n') => {
                                chars.next();
                            }
                            Some(&(e @ ('$' | '`' | '"' | '\\'))) => {
                                chars.next();
                                word.push(e);
                            }
                            _ => word.push('\\'),
                        },
                        other => word.push(other),
                    }
                }
                if !closed {
                    return None;
                }
            }
            '\'' if platform == Platform::Unix => {
                in_word = true;
                let mut closed = false;
                for q in chars.by_ref() {
                    if q == '\'' {
                        closed = true;
                        break;
                    }
                    word.push(q);
                }
                if !closed {
                    return None;
                }
            }
            '\\' if platform == Platform::Unix => {
                in_word = true;
                match chars.next() {
                    Some('\n') => {}
                    Some(escaped) => word.push(escaped),
                    None => word.push('\\'),
                }
            }
            other => {
                in_word = true;
                word.push(other);
            }
        }
    }

    if in_word {
        words.push(word);
    }
    Some(words)
}

/// Renders one template word, counting the slots it consumed.
fn render_word(
    word: &str,
    command: &str,
    template: &str,
    slots: &mut usize,
) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(word.len() + command.len());
    let mut chars = word.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                rendered.push('{');
            }
            '{' => {
                let mut inner = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    inner.push(next);
                }
                if !closed {
                    return Err(TemplateError::UnclosedBrace(template.to_string()));
                }
                if inner == "0" {
                    *slots += 1;
                    rendered.push_str(command);
                } else if !inner.is_empty() && inner.chars().all(|d| d.is_ascii_digit()) {
                    return Err(TemplateError::IndexOutOfRange {
                        template: template.to_string(),
                        index: inner,
                    });
                } else {
                    return Err(TemplateError::InvalidSlot {
                        template: template.to_string(),
                        slot: inner,
                    });
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                rendered.push('}');
            }
            '}' => return Err(TemplateError::UnescapedBrace(template.to_string())),
            other => rendered.push(other),
        }
    }

    Ok(rendered)
}
