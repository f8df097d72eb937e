// Statement Splitter
//
// Splits a batch of SQL text into single statements on `;`. Semicolons inside
// quoted strings, quoted identifiers and comments do not terminate a
// statement.

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Normal,
    /// Inside a `'`, `"` or `` ` `` quoted run
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Split `batch` into trimmed statements without their terminator. Empty
/// statements are dropped; the last statement needs no terminator.
pub fn split_statements(batch: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = State::Normal;
    let mut chars = batch.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::Normal => match ch {
                ';' => {
                    flush(&mut statements, &mut current);
                    continue;
                }
                '\'' | '"' | '`' => state = State::Quoted(ch),
                '#' => state = State::LineComment,
                '-' if chars.peek() == Some(&'-') => {
                    // MySQL wants whitespace after `--`
                    let mut ahead = chars.clone();
                    ahead.next();
                    if ahead.peek().is_none_or(|c| c.is_whitespace()) {
                        state = State::LineComment;
                    }
                }
                '/' if chars.peek() == Some(&'*') => {
                    current.push(ch);
                    if let Some(star) = chars.next() {
                        current.push(star);
                    }
                    state = State::BlockComment;
                    continue;
                }
                _ => {}
            },
            State::Quoted(quote) => match ch {
                '\\' if quote != '`' => {
                    current.push(ch);
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                    continue;
                }
                c if c == quote => {
                    // a doubled quote stays inside the run
                    if chars.peek() == Some(&quote) {
                        current.push(c);
                        chars.next();
                    } else {
                        state = State::Normal;
                    }
                }
                _ => {}
            },
            State::LineComment => {
                if ch == '\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    current.push(ch);
                    if let Some(slash) = chars.next() {
                        current.push(slash);
                    }
                    state = State::Normal;
                    continue;
                }
            }
        }
        current.push(ch);
    }
    flush(&mut statements, &mut current);
    statements
}

fn flush(statements: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
    current.clear();
}
