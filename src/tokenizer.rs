//! Turn a raw input line into tokens.
//!
//! Quote handling only: no backslash escapes, no case folding, no glob or
//! variable expansion. `|`, `>`, and `&` are ordinary characters to the
//! tokenizer; the parser in [`crate::parser`] is the one that requires
//! them to stand alone.

enum State {
    /// Between tokens — whitespace is skipped.
    Normal,
    /// Building an unquoted token.
    InWord,
    /// Inside `'...'` — every character is literal, including `"`.
    InSingleQuote,
    /// Inside `"..."` — every character is literal, including `'`.
    InDoubleQuote,
}

/// Tokenize a raw input line.
///
/// An unterminated quote is tolerated, not an error: the partial token
/// accumulated so far is emitted.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = State::Normal;

    for ch in line.chars() {
        match (&state, ch) {
            (State::Normal, ' ' | '\t') => {}
            (State::Normal, '\'') => state = State::InSingleQuote,
            (State::Normal, '"') => state = State::InDoubleQuote,
            (State::Normal, c) => {
                current.push(c);
                state = State::InWord;
            }

            (State::InWord, ' ' | '\t') => {
                tokens.push(std::mem::take(&mut current));
                state = State::Normal;
            }
            (State::InWord, '\'') => state = State::InSingleQuote,
            (State::InWord, '"') => state = State::InDoubleQuote,
            (State::InWord, c) => current.push(c),

            (State::InSingleQuote, '\'') => state = State::InWord,
            (State::InSingleQuote, c) => current.push(c),

            (State::InDoubleQuote, '"') => state = State::InWord,
            (State::InDoubleQuote, c) => current.push(c),
        }
    }

    if !current.is_empty() || matches!(state, State::InSingleQuote | State::InDoubleQuote) {
        tokens.push(current);
    }

    tokens
}
