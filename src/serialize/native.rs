/*!
Native literal fixtures (`php` format).

The file is a loadable PHP unit:

  <?php

  return array (
    'name' => 'widget',
    'tags' =>
    array (
      0 => 'a',
    ),
  );

Layout mirrors `var_export`: two-space indentation per level, nested arrays on their own
line after `=> `, trailing commas, `NULL` for null, single-quoted strings escaping only
`\` and `'`. A NUL byte cannot live inside a single-quoted literal, so it is spliced in
as `' . "\0" . '`.

`parse` reads the same subset back (plus `[...]` short arrays), so fixtures written
here round-trip to an equal `Value`, within the limits of PHP arrays: an empty map
loads back as `[]`, and string keys spelling decimal integers are integer keys, so a
map keyed `"0"`, `"1"`, ... in order loads back as a list.
*/

use serde_json::{Map, Number, Value};

use crate::error::LiteralError;

pub const OPEN_TAG: &str = "<?php";

/// Render `value` as a complete `<?php return ...;` unit.
pub fn encode(value: &Value) -> String {
    let mut out = String::from(OPEN_TAG);
    out.push_str("\n\nreturn ");
    export(value, 1, &mut out);
    out.push(';');
    out
}

/// Render `value` as a bare literal expression (no header).
pub fn export_literal(value: &Value) -> String {
    let mut out = String::new();
    export(value, 1, &mut out);
    out
}

fn export(value: &Value, level: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => export_number(n, out),
        Value::String(s) => export_string(s, out),
        Value::Array(items) => {
            open_array(level, out);
            for (index, item) in items.iter().enumerate() {
                spaces(level + 1, out);
                out.push_str(&index.to_string());
                out.push_str(" => ");
                export(item, level + 2, out);
                out.push_str(",\n");
            }
            close_array(level, out);
        }
        Value::Object(map) => {
            open_array(level, out);
            for (key, item) in map {
                spaces(level + 1, out);
                export_string(key, out);
                out.push_str(" => ");
                export(item, level + 2, out);
                out.push_str(",\n");
            }
            close_array(level, out);
        }
    }
}

fn open_array(level: usize, out: &mut String) {
    if level > 1 {
        out.push('\n');
        spaces(level - 1, out);
    }
    out.push_str("array (\n");
}

fn close_array(level: usize, out: &mut String) {
    if level > 1 {
        spaces(level - 1, out);
    }
    out.push(')');
}

fn spaces(n: usize, out: &mut String) {
    out.extend(std::iter::repeat_n(' ', n));
}

fn export_number(n: &Number, out: &mut String) {
    if let Some(i) = n.as_i64() {
        out.push_str(&i.to_string());
    } else if let Some(u) = n.as_u64() {
        out.push_str(&u.to_string());
    } else if let Some(f) = n.as_f64() {
        // Debug keeps the shortest round-trip form and always marks it as a float.
        out.push_str(&format!("{f:?}"));
    }
}

fn export_string(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\0' => out.push_str("' . \"\\0\" . '"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

/// Load a native literal fixture back into a value.
pub fn parse(text: &str) -> Result<Value, LiteralError> {
    let mut p = Parser::new(text);
    p.skip_ws();
    p.skip_bom();
    if !p.eat(OPEN_TAG) {
        return Err(LiteralError::MissingOpenTag);
    }
    p.skip_ws();
    p.expect_keyword("return")?;
    let value = p.expr()?;
    p.skip_ws();
    p.expect(";", "`;`")?;
    p.skip_ws();
    if p.eat("?>") {
        p.skip_ws();
    }
    if p.pos < p.src.len() {
        return Err(LiteralError::TrailingInput(p.pos));
    }
    Ok(value)
}

enum Key {
    Int(i64),
    Str(String),
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn skip_bom(&mut self) {
        if self.rest().starts_with('\u{feff}') {
            self.pos += '\u{feff}'.len_utf8();
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str, expected: &'static str) -> Result<(), LiteralError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(LiteralError::Expected {
                expected,
                offset: self.pos,
            })
        }
    }

    fn ident(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn expect_keyword(&mut self, word: &'static str) -> Result<(), LiteralError> {
        let start = self.pos;
        if self.ident().eq_ignore_ascii_case(word) {
            Ok(())
        } else {
            self.pos = start;
            Err(LiteralError::Expected {
                expected: word,
                offset: start,
            })
        }
    }

    /// term ( '.' term )*   -- concatenation only joins strings
    fn expr(&mut self) -> Result<Value, LiteralError> {
        let first = self.term()?;
        self.skip_ws();
        if self.peek() != Some('.') {
            return Ok(first);
        }
        let Value::String(mut joined) = first else {
            return Err(LiteralError::ConcatNonString(self.pos));
        };
        while self.eat(".") {
            let at = self.pos;
            match self.term()? {
                Value::String(s) => joined.push_str(&s),
                _ => return Err(LiteralError::ConcatNonString(at)),
            }
            self.skip_ws();
        }
        Ok(Value::String(joined))
    }

    fn term(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some('\'') => self.single_quoted().map(Value::String),
            Some('"') => self.double_quoted().map(Value::String),
            Some('[') => {
                self.pos += 1;
                self.entries(']')
            }
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let word = self.ident();
                match word.to_ascii_lowercase().as_str() {
                    "null" => Ok(Value::Null),
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "array" => {
                        self.skip_ws();
                        self.expect("(", "`(`")?;
                        self.entries(')')
                    }
                    _ => Err(LiteralError::Expected {
                        expected: "a literal value",
                        offset: start,
                    }),
                }
            }
            _ => Err(LiteralError::Expected {
                expected: "a literal value",
                offset: start,
            }),
        }
    }

    fn entries(&mut self, close: char) -> Result<Value, LiteralError> {
        let mut pairs: Vec<(Key, Value)> = Vec::new();
        // `None` once an index of i64::MAX has been used; PHP refuses further appends.
        let mut next_index: Option<i64> = Some(0);
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                break;
            }
            let entry_at = self.pos;
            let first = self.expr()?;
            self.skip_ws();
            let (key, value) = if self.eat("=>") {
                let key = array_key(first).ok_or(LiteralError::Expected {
                    expected: "an integer or string key",
                    offset: entry_at,
                })?;
                (key, self.expr()?)
            } else {
                let index = next_index.ok_or(LiteralError::NextIndexOccupied(entry_at))?;
                (Key::Int(index), first)
            };
            if let Key::Int(i) = key
                && next_index.is_some_and(|n| i >= n)
            {
                next_index = i.checked_add(1);
            }
            // Later duplicates replace earlier ones, as in PHP.
            pairs.retain(|(k, _)| !same_key(k, &key));
            pairs.push((key, value));
            self.skip_ws();
            if !self.eat(",") {
                self.skip_ws();
                let expected = if close == ')' { "`)`" } else { "`]`" };
                self.expect(&close.to_string(), expected)?;
                break;
            }
        }
        Ok(build_array(pairs))
    }

    fn single_quoted(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\'' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => match chars.next() {
                    Some((_, e @ ('\\' | '\''))) => out.push(e),
                    Some((_, other)) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                c => out.push(c),
            }
        }
        Err(LiteralError::UnterminatedString(start))
    }

    fn double_quoted(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => match chars.next() {
                    Some((_, '0')) => out.push('\0'),
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 'r')) => out.push('\r'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, e @ ('\\' | '"' | '$'))) => out.push(e),
                    Some((_, other)) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                c => out.push(c),
            }
        }
        Err(LiteralError::UnterminatedString(start))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let rest = self.rest();
        let mut len = 0;
        let bytes = rest.as_bytes();
        while len < bytes.len() {
            let b = bytes[len];
            let sign_ok = (b == b'-' || b == b'+')
                && (len == 0 || matches!(bytes[len - 1], b'e' | b'E'));
            if b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E' || sign_ok {
                len += 1;
            } else {
                break;
            }
        }
        let text = &rest[..len];
        self.pos += len;
        let invalid = || LiteralError::InvalidNumber {
            text: text.to_string(),
            offset: start,
        };
        let is_float = text.contains(['.', 'e', 'E']);
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Value::Number(i.into()));
            }
            if let Ok(u) = text.parse::<u64>() {
                return Ok(Value::Number(u.into()));
            }
        }
        let f = text.parse::<f64>().map_err(|_| invalid())?;
        Number::from_f64(f).map(Value::Number).ok_or_else(invalid)
    }
}

/// PHP key casting: integers stay integers, and so do strings spelling a canonical
/// decimal integer (`'5'`, `'-3'`, but not `'05'`, `'+5'` or `'-0'`).
fn array_key(value: Value) -> Option<Key> {
    match value {
        Value::Number(n) => n.as_i64().map(Key::Int),
        Value::String(s) => Some(match canonical_int(&s) {
            Some(i) => Key::Int(i),
            None => Key::Str(s),
        }),
        _ => None,
    }
}

fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let canonical = match digits.as_bytes() {
        [b'0'] => digits.len() == s.len(),
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    };
    if canonical { s.parse().ok() } else { None }
}

fn same_key(a: &Key, b: &Key) -> bool {
    match (a, b) {
        (Key::Int(x), Key::Int(y)) => x == y,
        (Key::Str(x), Key::Str(y)) => x == y,
        _ => false,
    }
}

/// Integer keys `0..n` in order form a list; anything else becomes an ordered map.
fn build_array(pairs: Vec<(Key, Value)>) -> Value {
    let is_list = pairs
        .iter()
        .enumerate()
        .all(|(i, (k, _))| matches!(k, Key::Int(n) if *n == i as i64));
    if is_list {
        return Value::Array(pairs.into_iter().map(|(_, v)| v).collect());
    }
    let mut map = Map::new();
    for (k, v) in pairs {
        let key = match k {
            Key::Int(i) => i.to_string(),
            Key::Str(s) => s,
        };
        map.insert(key, v);
    }
    Value::Object(map)
}
