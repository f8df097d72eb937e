// Comment Mining
//
// Comments in DML text double as annotations. Each comment line starting
// with a column name may carry attributes, for now only `required`:
//
//     -- id required
//     /* name required, at most 64 chars */
//
// MySQL executable comments (`/*! ... */`) are not annotations.

use serde::Serialize;

pub const META_ATTRIBUTE_REQUIRED: &str = "required";

/// Attributes mined from comments for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meta {
    pub column: String,
    pub attributes: Vec<String>,
}

impl Meta {
    pub fn new(column: impl Into<String>) -> Self {
        Meta {
            column: column.into(),
            attributes: Vec::new(),
        }
    }

    pub fn add_attribute(&mut self, attribute: &str) {
        if !self
            .attributes
            .iter()
            .any(|a| a.eq_ignore_ascii_case(attribute))
        {
            self.attributes.push(attribute.to_string());
        }
    }
}

/// Comment lines of `sql` in source order, trimmed of comment markup.
/// Quoted strings and identifiers are skipped.
pub fn extract_comments(sql: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' | '"' | '`' => {
                while let Some(c) = chars.next() {
                    if c == '\\' && ch != '`' {
                        chars.next();
                    } else if c == ch {
                        if chars.peek() == Some(&ch) {
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
            }
            '#' => {
                let body: String = chars.by_ref().take_while(|&c| c != '\n').collect();
                push_lines(&mut lines, &body);
            }
            '-' if chars.peek() == Some(&'-') => {
                // MySQL wants whitespace after `--`
                let mut ahead = chars.clone();
                ahead.next();
                if !ahead.peek().is_none_or(|c| c.is_whitespace()) {
                    continue;
                }
                chars.next();
                let body: String = chars.by_ref().take_while(|&c| c != '\n').collect();
                push_lines(&mut lines, &body);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let executable = chars.peek() == Some(&'!');
                let mut body = String::new();
                while let Some(c) = chars.next() {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        break;
                    }
                    body.push(c);
                }
                if !executable {
                    push_lines(&mut lines, &body);
                }
            }
            _ => {}
        }
    }
    lines
}

fn push_lines(lines: &mut Vec<String>, body: &str) {
    for line in body.lines() {
        let line = line.trim_matches(|c: char| c == '*' || c == '-' || c.is_whitespace());
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
}

/// Build column metas from comment lines. The first word of a line names the
/// column; only lines carrying an attribute produce a meta, one per column.
pub fn parse_metas(comments: &[String]) -> Vec<Meta> {
    let mut metas: Vec<Meta> = Vec::new();
    for comment in comments {
        let comment = comment.trim();
        let column = comment.split(' ').next().unwrap_or(comment);
        let mut meta = Meta::new(column);
        if comment.contains(META_ATTRIBUTE_REQUIRED) {
            meta.add_attribute(META_ATTRIBUTE_REQUIRED);
        }
        if meta.attributes.is_empty() {
            continue;
        }
        if !metas.iter().any(|m| m.column.eq_ignore_ascii_case(&meta.column)) {
            metas.push(meta);
        }
    }
    metas
}
