//! Deterministic declaration printer.
//!
//! Declarations are emitted from their source text with line endings
//! normalized to `\n` and trailing whitespace removed from every line, so
//! printing is stable across platforms and repeated extraction. Lines that
//! end inside a raw string literal keep their trailing whitespace.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Code,
    RawString,
    BlockComment,
}

/// Lexical state at the end of `line`, given the state at its start
fn state_after(line: &str, mut state: LexState) -> LexState {
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            LexState::RawString => {
                if c == '`' {
                    state = LexState::Code;
                }
            }
            LexState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = LexState::Code;
                }
            }
            LexState::Code => match c {
                '`' => state = LexState::RawString,
                '"' | '\'' => {
                    while let Some(inner) = chars.next() {
                        if inner == '\\' {
                            chars.next();
                        } else if inner == c {
                            break;
                        }
                    }
                }
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = LexState::BlockComment;
                }
                _ => {}
            },
        }
    }
    state
}

/// Print one declaration's source text
pub fn print_declaration(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = LexState::Code;
    for (idx, line) in text.lines().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        state = state_after(line, state);
        if state == LexState::RawString {
            out.push_str(line);
        } else {
            out.push_str(line.trim_end());
        }
    }
    out.trim_end().to_string()
}

/// Print a sequence of declarations, one per block, each followed by a newline
pub fn print_declarations<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for text in texts {
        out.push_str(&print_declaration(text));
        out.push('\n');
    }
    out
}
