//! LaTeX propositional formula parser for the veritab truth-table generator.
//!
//! Formulas are written in LaTeX math notation, e.g.
//! `\neg p \land (q \to r)`. Parsing produces an
//! [`Expr`](veritab_formula::Expr) tree plus the table of variables it
//! mentions, via precedence climbing over the scanned tokens.

use veritab_formula::{BinOp, Expr, Token, TokenKind, VarTable};

use thiserror::Error;

/// Possible errors while parsing a LaTeX formula.
///
/// Columns are 0-based byte offsets into the input.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error(
        "column {}: unexpected character in formula input: '{}'",
        column,
        unexpected
    )]
    UnexpectedInput { column: usize, unexpected: char },
    #[error("column {}: '\\' does not start a known operator", column)]
    UnknownCommand { column: usize },
    #[error("column {}: expected a variable, '(' or '\\neg'", column)]
    MissingOperand { column: usize },
    #[error("column {}: unmatched '('", column)]
    UnmatchedParen { column: usize },
    #[error("formula is empty")]
    EmptyFormula,
}

/// Known LaTeX operator spellings, in match order.
///
/// The scanner takes the first spelling matching at the current position;
/// for this set, first match and longest match coincide.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("\\neg", TokenKind::Not),
    ("\\lnot", TokenKind::Not),
    ("\\land", TokenKind::And),
    ("\\wedge", TokenKind::And),
    ("\\lor", TokenKind::Or),
    ("\\vee", TokenKind::Or),
    ("\\oplus", TokenKind::Xor),
    ("\\implies", TokenKind::Implies),
    ("\\to", TokenKind::Implies),
    ("\\rightarrow", TokenKind::Implies),
    ("\\leftrightarrow", TokenKind::Biconditional),
];

/// A successfully parsed formula together with its interned variables.
#[derive(Clone, Debug)]
pub struct ParsedFormula {
    pub root: Expr,
    pub vars: VarTable,
}

/// Precedence-climbing parser for LaTeX propositional formulas.
///
/// All state is reinitialized by every [`parse`](Parser::parse) call, so one
/// instance can be reused for any number of sequential parses. Tokens past
/// the end of a structurally complete formula are not rejected; they are
/// left unconsumed.
#[derive(Default)]
pub struct Parser {
    tokens: Vec<Token>,
    offsets: Vec<usize>,
    cursor: usize,
    input_len: usize,
    vars: VarTable,
}

/// Parse a formula, creating a fresh parser.
pub fn parse_formula(input: &str) -> Result<ParsedFormula, ParserError> {
    Parser::new().parse(input)
}

/// Split `input` into tokens without parsing.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParserError> {
    let mut parser = Parser::new();
    parser.scan(input)?;
    Ok(parser.tokens)
}

impl Parser {
    /// Create a new parser.
    pub fn new() -> Parser {
        Parser::default()
    }

    /// Parse a complete formula.
    pub fn parse(&mut self, input: &str) -> Result<ParsedFormula, ParserError> {
        self.tokens.clear();
        self.offsets.clear();
        self.cursor = 0;
        self.vars = VarTable::new();

        self.scan(input)?;
        if self.tokens.is_empty() {
            return Err(ParserError::EmptyFormula);
        }

        let lhs = self.parse_primary()?;
        let root = self.parse_expr_rhs(lhs, 0)?;

        Ok(ParsedFormula {
            root,
            vars: std::mem::take(&mut self.vars),
        })
    }

    fn scan(&mut self, input: &str) -> Result<(), ParserError> {
        let bytes = input.as_bytes();
        let mut pos = 0;

        self.input_len = bytes.len();

        while pos < bytes.len() {
            match bytes[pos] {
                b'\\' => {
                    let matched = OPERATORS
                        .iter()
                        .find(|&&(spelling, _)| input[pos..].starts_with(spelling));
                    match matched {
                        Some(&(spelling, kind)) => {
                            self.push_token(kind, spelling, pos);
                            pos += spelling.len();
                        }
                        None => return Err(ParserError::UnknownCommand { column: pos }),
                    }
                }
                b'(' => {
                    self.push_token(TokenKind::LParen, "(", pos);
                    pos += 1;
                }
                b')' => {
                    self.push_token(TokenKind::RParen, ")", pos);
                    pos += 1;
                }
                b' ' => pos += 1,
                byte if byte.is_ascii_alphabetic() => {
                    let start = pos;
                    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
                        pos += 1;
                    }
                    self.push_token(TokenKind::Variable, &input[start..pos], start);
                }
                byte => {
                    return Err(ParserError::UnexpectedInput {
                        column: pos,
                        unexpected: byte as char,
                    });
                }
            }
        }

        Ok(())
    }

    fn push_token(&mut self, kind: TokenKind, literal: &str, offset: usize) {
        self.tokens.push(Token::new(kind, literal));
        self.offsets.push(offset);
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Input column of the token at the cursor, or one past the input's end.
    fn current_column(&self) -> usize {
        self.offsets
            .get(self.cursor)
            .copied()
            .unwrap_or(self.input_len)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParserError> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => {
                return Err(ParserError::MissingOperand {
                    column: self.current_column(),
                })
            }
        };

        match token.kind {
            TokenKind::Variable => {
                self.advance();
                Ok(Expr::Var(self.vars.intern(&token.literal)))
            }
            TokenKind::LParen => {
                self.advance();
                let lhs = self.parse_primary()?;
                let expr = self.parse_expr_rhs(lhs, 0)?;
                match self.peek() {
                    Some(next) if next.kind == TokenKind::RParen => {
                        self.advance();
                        Ok(expr)
                    }
                    _ => Err(ParserError::UnmatchedParen {
                        column: self.current_column(),
                    }),
                }
            }
            TokenKind::Not => {
                self.advance();
                let operand = self.parse_primary()?;
                let operand = self.parse_expr_rhs(operand, token.precedence())?;
                Ok(Expr::negation(operand))
            }
            _ => Err(ParserError::MissingOperand {
                column: self.current_column(),
            }),
        }
    }

    /// Absorb infix operators binding at least as tightly as
    /// `min_precedence` into `lhs`.
    fn parse_expr_rhs(&mut self, mut lhs: Expr, min_precedence: u32) -> Result<Expr, ParserError> {
        while let Some(op) = self.peek_binary(min_precedence) {
            self.advance();
            let mut rhs = self.parse_primary()?;

            // Operators binding tighter than `op` belong to the right
            // operand; absorb them before combining.
            while let Some(precedence) = self.peek_climb(op) {
                rhs = self.parse_expr_rhs(rhs, precedence)?;
            }

            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// The next token's connective when it binds at least as tightly as
    /// `min_precedence`.
    fn peek_binary(&self, min_precedence: u32) -> Option<BinOp> {
        let token = self.peek()?;
        let op = BinOp::from_token(token.kind)?;
        if op.precedence() >= min_precedence {
            Some(op)
        } else {
            None
        }
    }

    /// Precedence to climb at when the next token must join the right
    /// operand of `op` instead of `op`'s own chain.
    fn peek_climb(&self, op: BinOp) -> Option<u32> {
        let token = self.peek()?;
        let next = BinOp::from_token(token.kind)?;
        let precedence = next.precedence();
        if precedence > op.precedence()
            || (token.kind.is_right_associative() && precedence == op.precedence())
        {
            Some(precedence)
        } else {
            None
        }
    }
}
