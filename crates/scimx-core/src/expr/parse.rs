use super::lex::{scan, Token};
use super::{CompareOp, CompileError, Filter, Literal, PathExpr, Step};

/// Compile a path string
///
/// The empty (or all-whitespace) path compiles to the empty expression,
/// which addresses the whole resource.
pub fn compile_path(input: &str) -> Result<PathExpr, CompileError> {
    if input.trim().is_empty() {
        return Ok(PathExpr::empty());
    }

    let mut parser = Parser::new(scan(input)?, input.len());
    let mut steps = Vec::new();

    loop {
        let (name, _) = parser.expect_name("attribute name")?;
        steps.push(Step::Attr(name));

        if let Some(open) = parser.eat(&Token::LBracket) {
            let filter = parser.parse_or()?;
            if parser.eat(&Token::RBracket).is_none() {
                return Err(CompileError::UnbalancedBracket { pos: open });
            }
            steps.push(Step::ValueFilter(filter));
        }

        match parser.peek_token() {
            Some(Token::Dot) => {
                parser.advance();
                if !matches!(parser.peek_token(), Some(Token::Name(_))) {
                    return Err(CompileError::EmptySegment {
                        pos: parser.pos_or_end(),
                    });
                }
            }
            None => break,
            Some(_) => {
                return Err(CompileError::TrailingInput {
                    pos: parser.pos_or_end(),
                })
            }
        }
    }

    Ok(PathExpr { steps })
}

/// Compile a standalone filter string
pub fn compile_filter(input: &str) -> Result<Filter, CompileError> {
    let mut parser = Parser::new(scan(input)?, input.len());
    let filter = parser.parse_or()?;
    if parser.peek_token().is_some() {
        return Err(CompileError::TrailingInput {
            pos: parser.pos_or_end(),
        });
    }
    Ok(filter)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn new(tokens: Vec<(Token, usize)>, end: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            end,
        }
    }

    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn pos_or_end(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, pos)| *pos)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        if token.is_some() {
            self.advance();
        }
        token
    }

    /// Consume the given punctuation token, returning its position
    fn eat(&mut self, token: &Token) -> Option<usize> {
        match self.tokens.get(self.pos) {
            Some((current, pos)) if current == token => {
                let pos = *pos;
                self.advance();
                Some(pos)
            }
            _ => None,
        }
    }

    /// Consume a name token equal to the keyword, case-insensitively
    fn eat_keyword(&mut self, word: &str) -> bool {
        match self.peek_token() {
            Some(Token::Name(name)) if name.eq_ignore_ascii_case(word) => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn expect_name(&mut self, expected: &'static str) -> Result<(String, usize), CompileError> {
        let pos = self.pos_or_end();
        match self.next_token() {
            Some(Token::Name(name)) => Ok((name, pos)),
            _ => Err(CompileError::Expected { expected, pos }),
        }
    }

    // or < and < unary; `not` binds a parenthesized group
    fn parse_or(&mut self) -> Result<Filter, CompileError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            let right = self.parse_and()?;
            left = Filter::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Filter, CompileError> {
        let mut left = self.parse_unary()?;
        while self.eat_keyword("and") {
            let right = self.parse_unary()?;
            left = Filter::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Filter, CompileError> {
        if self.eat_keyword("not") {
            if self.eat(&Token::LParen).is_none() {
                return Err(CompileError::Expected {
                    expected: "'(' after 'not'",
                    pos: self.pos_or_end(),
                });
            }
            let inner = self.parse_or()?;
            if self.eat(&Token::RParen).is_none() {
                return Err(CompileError::Expected {
                    expected: "')'",
                    pos: self.pos_or_end(),
                });
            }
            return Ok(Filter::Not(Box::new(inner)));
        }

        if self.eat(&Token::LParen).is_some() {
            let inner = self.parse_or()?;
            if self.eat(&Token::RParen).is_none() {
                return Err(CompileError::Expected {
                    expected: "')'",
                    pos: self.pos_or_end(),
                });
            }
            return Ok(inner);
        }

        self.parse_attr_exp()
    }

    fn parse_attr_exp(&mut self) -> Result<Filter, CompileError> {
        let (first, _) = self.expect_name("attribute path")?;
        let mut path = vec![first];
        while self.eat(&Token::Dot).is_some() {
            let (next, _) = self.expect_name("sub-attribute name")?;
            path.push(next);
        }

        let (op_text, op_pos) = self.expect_name("comparison operator")?;
        if op_text.eq_ignore_ascii_case("pr") {
            return Ok(Filter::Present { path });
        }

        let op = CompareOp::parse(&op_text).ok_or_else(|| CompileError::UnknownOperator {
            text: op_text.clone(),
            pos: op_pos,
        })?;

        let literal = self.parse_literal()?;
        Ok(Filter::Compare { path, op, literal })
    }

    fn parse_literal(&mut self) -> Result<Literal, CompileError> {
        let pos = self.pos_or_end();
        match self.next_token() {
            Some(Token::Str(s)) => Ok(Literal::Str(s)),
            Some(Token::Number(n)) => Ok(Literal::Number(n)),
            Some(Token::Name(word)) => {
                if word.eq_ignore_ascii_case("true") {
                    Ok(Literal::Bool(true))
                } else if word.eq_ignore_ascii_case("false") {
                    Ok(Literal::Bool(false))
                } else if word.eq_ignore_ascii_case("null") {
                    Ok(Literal::Null)
                } else {
                    Err(CompileError::Expected {
                        expected: "literal",
                        pos,
                    })
                }
            }
            _ => Err(CompileError::Expected {
                expected: "literal",
                pos,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_simple_path() {
        let expr = compile_path("userName").unwrap();
        assert_eq!(expr.steps(), &[Step::Attr("userName".to_string())]);
    }

    #[test]
    fn test_compile_dotted_path() {
        let expr = compile_path("name.familyName").unwrap();
        assert_eq!(
            expr.steps(),
            &[
                Step::Attr("name".to_string()),
                Step::Attr("familyName".to_string())
            ]
        );
    }

    #[test]
    fn test_compile_empty_path() {
        assert!(compile_path("").unwrap().is_empty());
        assert!(compile_path("   ").unwrap().is_empty());
    }

    #[test]
    fn test_compile_filtered_path() {
        let expr = compile_path("emails[value eq \"foo@bar.com\"].type").unwrap();

        assert_eq!(expr.steps().len(), 3);
        assert_eq!(expr.steps()[0], Step::Attr("emails".to_string()));
        assert_eq!(
            expr.steps()[1],
            Step::ValueFilter(Filter::Compare {
                path: vec!["value".to_string()],
                op: CompareOp::Eq,
                literal: Literal::Str("foo@bar.com".to_string()),
            })
        );
        assert_eq!(expr.steps()[2], Step::Attr("type".to_string()));
    }

    #[test]
    fn test_operator_keywords_are_case_insensitive() {
        let expr = compile_path("emails[value EQ \"x\"]").unwrap();
        assert!(matches!(
            &expr.steps()[1],
            Step::ValueFilter(Filter::Compare {
                op: CompareOp::Eq,
                ..
            })
        ));
    }

    #[test]
    fn test_unbalanced_bracket() {
        let err = compile_path("emails[value eq \"x\"").unwrap_err();
        assert_eq!(err, CompileError::UnbalancedBracket { pos: 6 });
    }

    #[test]
    fn test_trailing_input() {
        let err = compile_path("userName extra").unwrap_err();
        assert!(matches!(err, CompileError::TrailingInput { pos: 9 }));
    }

    #[test]
    fn test_empty_trailing_segment() {
        let err = compile_path("userName.").unwrap_err();
        assert!(matches!(err, CompileError::EmptySegment { .. }));
    }

    #[test]
    fn test_unknown_operator() {
        let err = compile_path("emails[value qq \"x\"]").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnknownOperator { ref text, .. } if text == "qq"
        ));
    }

    #[test]
    fn test_missing_literal() {
        let err = compile_path("emails[value eq]").unwrap_err();
        assert!(matches!(
            err,
            CompileError::Expected {
                expected: "literal",
                ..
            }
        ));
    }

    #[test]
    fn test_filter_present() {
        let filter = compile_filter("emails pr").unwrap();
        assert_eq!(
            filter,
            Filter::Present {
                path: vec!["emails".to_string()]
            }
        );
    }

    #[test]
    fn test_filter_dotted_operand() {
        let filter = compile_filter("name.familyName co \"Zhang\"").unwrap();
        assert!(matches!(
            filter,
            Filter::Compare { ref path, op: CompareOp::Co, .. }
                if path == &["name".to_string(), "familyName".to_string()]
        ));
    }

    #[test]
    fn test_filter_precedence_and_binds_tighter_than_or() {
        let filter = compile_filter("a eq 1 or b eq 2 and c eq 3").unwrap();
        match filter {
            Filter::Or(left, right) => {
                assert!(matches!(*left, Filter::Compare { .. }));
                assert!(matches!(*right, Filter::And(_, _)));
            }
            other => panic!("expected or at the top, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_parens_group() {
        let filter = compile_filter("(a eq 1 or b eq 2) and c eq 3").unwrap();
        match filter {
            Filter::And(left, right) => {
                assert!(matches!(*left, Filter::Or(_, _)));
                assert!(matches!(*right, Filter::Compare { .. }));
            }
            other => panic!("expected and at the top, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_not_requires_parens() {
        assert!(matches!(
            compile_filter("not (active eq true)").unwrap(),
            Filter::Not(_)
        ));
        assert!(matches!(
            compile_filter("not active eq true").unwrap_err(),
            CompileError::Expected {
                expected: "'(' after 'not'",
                ..
            }
        ));
    }

    #[test]
    fn test_filter_literals() {
        assert!(matches!(
            compile_filter("active eq true").unwrap(),
            Filter::Compare {
                literal: Literal::Bool(true),
                ..
            }
        ));
        assert!(matches!(
            compile_filter("age gt 21").unwrap(),
            Filter::Compare {
                literal: Literal::Number(n),
                ..
            } if n == 21.0
        ));
        assert!(matches!(
            compile_filter("nickName eq null").unwrap(),
            Filter::Compare {
                literal: Literal::Null,
                ..
            }
        ));
    }

    #[test]
    fn test_filter_trailing_garbage() {
        let err = compile_filter("a eq 1 b").unwrap_err();
        assert!(matches!(err, CompileError::TrailingInput { .. }));
    }
}
