//! Lexer and recursive-descent parser for pack condition expressions.
//!
//! Grammar (lowest precedence first):
//!
//! ```text
//! expr       := and ( '||' and )*
//! and        := unary ( '&&' unary )*
//! unary      := '!' unary | comparison
//! comparison := primary ( ('==' '!=' '<' '<=' '>' '>=') primary )?
//! primary    := '(' expr ')' | integer | 'string' | variable | function '(' 'string' ')'
//! ```

use std::str::FromStr;

use super::{CompareOp, Expr, ExprError, Function, Variable};

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Str(String),
    AndAnd,
    OrOr,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => name.clone(),
            Token::Int(value) => value.to_string(),
            Token::Str(value) => format!("'{value}'"),
            Token::AndAnd => "&&".into(),
            Token::OrOr => "||".into(),
            Token::Bang => "!".into(),
            Token::EqEq => "==".into(),
            Token::NotEq => "!=".into(),
            Token::Lt => "<".into(),
            Token::Le => "<=".into(),
            Token::Gt => ">".into(),
            Token::Ge => ">=".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        }
    }
}

fn lex(source: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let mut tokens = Vec::new();
    let bytes = source.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '(' => {
                tokens.push((Token::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, i));
                i += 1;
            }
            '&' if bytes.get(i + 1) == Some(&b'&') => {
                tokens.push((Token::AndAnd, i));
                i += 2;
            }
            '|' if bytes.get(i + 1) == Some(&b'|') => {
                tokens.push((Token::OrOr, i));
                i += 2;
            }
            '=' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push((Token::EqEq, i));
                i += 2;
            }
            '!' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push((Token::NotEq, i));
                i += 2;
            }
            '!' => {
                tokens.push((Token::Bang, i));
                i += 1;
            }
            '<' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push((Token::Le, i));
                i += 2;
            }
            '<' => {
                tokens.push((Token::Lt, i));
                i += 1;
            }
            '>' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push((Token::Ge, i));
                i += 2;
            }
            '>' => {
                tokens.push((Token::Gt, i));
                i += 1;
            }
            '\'' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end] != b'\'' {
                    end += 1;
                }
                if end >= bytes.len() {
                    return Err(ExprError::UnexpectedEnd);
                }
                tokens.push((Token::Str(source[start..end].to_owned()), i));
                i = end + 1;
            }
            '0'..='9' | '-' => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let text = &source[start..i];
                let value = text.parse::<i64>().map_err(|_| ExprError::UnexpectedToken {
                    position: start,
                    found: text.to_owned(),
                })?;
                tokens.push((Token::Int(value), start));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start = i;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push((Token::Ident(source[start..i].to_owned()), start));
            }
            _ => {
                return Err(ExprError::UnexpectedCharacter {
                    position: i,
                    found: c,
                });
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.cursor).cloned();
        self.cursor += 1;
        token
    }

    fn expect(&mut self, wanted: Token) -> Result<(), ExprError> {
        match self.advance() {
            Some((token, _)) if token == wanted => Ok(()),
            Some((token, position)) => Err(ExprError::UnexpectedToken {
                position,
                found: token.describe(),
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.and()?;
        while self.peek() == Some(&Token::OrOr) {
            self.advance();
            let rhs = self.and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        while self.peek() == Some(&Token::AndAnd) {
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.peek() == Some(&Token::Bang) {
            self.advance();
            let inner = self.unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ExprError> {
        let lhs = self.primary()?;
        let op = match self.peek() {
            Some(Token::EqEq) => CompareOp::Eq,
            Some(Token::NotEq) => CompareOp::Ne,
            Some(Token::Lt) => CompareOp::Lt,
            Some(Token::Le) => CompareOp::Le,
            Some(Token::Gt) => CompareOp::Gt,
            Some(Token::Ge) => CompareOp::Ge,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.primary()?;
        Ok(Expr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.advance() {
            Some((Token::LParen, _)) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some((Token::Int(value), _)) => Ok(Expr::Int(value)),
            Some((Token::Str(value), _)) => Ok(Expr::Str(value)),
            Some((Token::Ident(name), _)) => {
                if self.peek() == Some(&Token::LParen) {
                    let function = Function::from_str(&name)
                        .map_err(|_| ExprError::UnknownFunction(name.clone()))?;
                    self.advance();
                    let argument = match self.advance() {
                        Some((Token::Str(argument), _)) => argument,
                        Some(_) | None => {
                            return Err(ExprError::BadArgument {
                                function: function.to_string(),
                            });
                        }
                    };
                    self.expect(Token::RParen)?;
                    Ok(Expr::Call { function, argument })
                } else {
                    let variable = Variable::from_str(&name)
                        .map_err(|_| ExprError::UnknownVariable(name.clone()))?;
                    Ok(Expr::Var(variable))
                }
            }
            Some((token, position)) => Err(ExprError::UnexpectedToken {
                position,
                found: token.describe(),
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

/// Parses an authored expression, rejecting anything outside the closed
/// variable and function vocabularies.
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let tokens = lex(source)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser { tokens, cursor: 0 };
    let expr = parser.expr()?;

    if let Some((token, position)) = parser.tokens.get(parser.cursor) {
        return Err(ExprError::UnexpectedToken {
            position: *position,
            found: token.describe(),
        });
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_boolean_expression() {
        let expr = parse("flag('gate_open') && (faith >= 10 || balance < 0)").unwrap();
        match expr {
            Expr::And(lhs, rhs) => {
                assert!(matches!(
                    *lhs,
                    Expr::Call {
                        function: Function::Flag,
                        ..
                    }
                ));
                assert!(matches!(*rhs, Expr::Or(_, _)));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_variable() {
        assert_eq!(
            parse("fiath >= 10"),
            Err(ExprError::UnknownVariable("fiath".into()))
        );
    }

    #[test]
    fn rejects_unknown_function() {
        assert_eq!(
            parse("flagg('gate_open')"),
            Err(ExprError::UnknownFunction("flagg".into()))
        );
    }

    #[test]
    fn rejects_empty_expression() {
        assert_eq!(parse(""), Err(ExprError::Empty));
        assert_eq!(parse("   "), Err(ExprError::Empty));
    }

    #[test]
    fn rejects_bare_function_argument() {
        assert_eq!(
            parse("flag(gate_open)"),
            Err(ExprError::BadArgument {
                function: "flag".into()
            })
        );
    }

    #[test]
    fn rejects_trailing_tokens() {
        assert!(matches!(
            parse("faith >= 10 balance"),
            Err(ExprError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn rejects_unterminated_string() {
        assert_eq!(parse("flag('gate_open"), Err(ExprError::UnexpectedEnd));
    }

    #[test]
    fn negative_integers_lex() {
        let expr = parse("balance >= -50").unwrap();
        assert!(matches!(
            expr,
            Expr::Compare {
                op: CompareOp::Ge,
                ..
            }
        ));
    }
}
