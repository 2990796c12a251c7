//! # Word Splitter
//!
//! Turns one input line into arguments for clap.
//!
//! ```text
//! set supplier name "Acme Corp"   ──►  [set] [supplier] [name] [Acme Corp]
//! set product description ''      ──►  [set] [product] [description] []
//! ```
//!
//! Single and double quotes group words. Inside double quotes a backslash
//! escapes the next character; single quotes are literal.

use super::ParseError;

pub fn split_words(line: &str) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();
    let mut current = String::new();
    // A quoted empty string is still a word
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                in_word = true;
                let quote = c;
                loop {
                    match chars.next() {
                        Some(c) if c == quote => break,
                        Some('\\') if quote == '"' => match chars.next() {
                            Some(escaped) => current.push(escaped),
                            None => return Err(ParseError::UnterminatedQuote { quote }),
                        },
                        Some(c) => current.push(c),
                        None => return Err(ParseError::UnterminatedQuote { quote }),
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}
