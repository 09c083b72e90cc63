use super::CompileError;

/// A lexical token with the byte position it started at
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    Name(String),
    Str(String),
    Number(f64),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
}

/// Split the input into tokens
///
/// Names follow the SCIM attribute name grammar (leading letter or `$`,
/// then letters, digits, `-`, `_`, `$`). String literals use JSON string
/// syntax and are decoded here; operator keywords come out as names and are
/// classified by the parser.
pub(super) fn scan(input: &str) -> Result<Vec<(Token, usize)>, CompileError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (pos, ch) = chars[i];
        match ch {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push((Token::LParen, pos));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, pos));
                i += 1;
            }
            '[' => {
                tokens.push((Token::LBracket, pos));
                i += 1;
            }
            ']' => {
                tokens.push((Token::RBracket, pos));
                i += 1;
            }
            '.' => {
                tokens.push((Token::Dot, pos));
                i += 1;
            }
            '"' => {
                let (token, next) = scan_string(input, &chars, i)?;
                tokens.push((token, pos));
                i = next;
            }
            c if c.is_ascii_alphabetic() || c == '$' => {
                let start = i;
                while i < chars.len() && is_name_char(chars[i].1) {
                    i += 1;
                }
                let text: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                tokens.push((Token::Name(text), pos));
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                let start = i;
                while i < chars.len() && is_number_char(chars[i].1) {
                    i += 1;
                }
                let text: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| CompileError::BadLiteral {
                        text: text.clone(),
                        pos,
                    })?;
                tokens.push((Token::Number(value), pos));
            }
            c => return Err(CompileError::UnexpectedChar { ch: c, pos }),
        }
    }

    Ok(tokens)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '$'
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
}

fn scan_string(
    input: &str,
    chars: &[(usize, char)],
    open: usize,
) -> Result<(Token, usize), CompileError> {
    let open_pos = chars[open].0;
    let mut i = open + 1;
    let mut escaped = false;

    while i < chars.len() {
        let (_, c) = chars[i];
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            // include both quotes so the span is a JSON string
            let span = &input[open_pos..chars[i].0 + 1];
            let decoded: String =
                serde_json::from_str(span).map_err(|_| CompileError::BadLiteral {
                    text: span.to_string(),
                    pos: open_pos,
                })?;
            return Ok((Token::Str(decoded), i + 1));
        }
        i += 1;
    }

    Err(CompileError::UnterminatedString { pos: open_pos })
}
