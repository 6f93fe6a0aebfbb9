//! Arithmetic expression parser
//!
//! Accepts only what survives sanitization: numeric literals,
//! `+ - * /` and parentheses. No identifiers, no calls, nothing else.

use crate::core::{CalcError, CalcResult};

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition
    Add,
    /// Subtraction
    Subtract,
    /// Multiplication
    Multiply,
    /// Division
    Divide,
}

impl BinaryOp {
    /// Applies the operator, rejecting division by zero
    pub fn apply(self, left: f64, right: f64) -> CalcResult<f64> {
        match self {
            Self::Add => Ok(left + right),
            Self::Subtract => Ok(left - right),
            Self::Multiply => Ok(left * right),
            Self::Divide => {
                if right == 0.0 {
                    return Err(CalcError::malformed("Division by zero"));
                }
                Ok(left / right)
            }
        }
    }
}

/// Token types from lexical analysis
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
}

/// Abstract Syntax Tree node
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Numeric literal
    Number(f64),
    /// Binary operation
    BinaryOp {
        /// Left operand
        left: Box<AstNode>,
        /// Operator
        op: BinaryOp,
        /// Right operand
        right: Box<AstNode>,
    },
    /// Unary negation
    Negate(Box<AstNode>),
}

impl AstNode {
    /// Creates a new binary operation node
    #[must_use]
    pub fn binary(left: AstNode, op: BinaryOp, right: AstNode) -> Self {
        Self::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a new negation node
    #[must_use]
    pub fn negate(inner: AstNode) -> Self {
        Self::Negate(Box::new(inner))
    }
}

/// Tokenizer for converting expression strings to tokens
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given input
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenizes the entire input
    pub fn tokenize(&mut self) -> CalcResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input
    pub fn next_token(&mut self) -> CalcResult<Option<Token>> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' | '.' => return self.read_number().map(Some),
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            _ => {
                return Err(CalcError::malformed(format!(
                    "Unexpected character: '{ch}'"
                )));
            }
        };
        self.advance();

        Ok(Some(token))
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_number(&mut self) -> CalcResult<Token> {
        let start = self.pos;
        let mut has_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let literal = &self.input[start..self.pos];
        let value: f64 = literal
            .parse()
            .map_err(|_| CalcError::malformed(format!("Invalid number: '{literal}'")))?;

        Ok(Token::Number(value))
    }
}

/// Recursive descent parser for expressions
///
/// Grammar:
/// ```text
/// expression ::= term (('+' | '-') term)*
/// term       ::= unary (('*' | '/') unary)*
/// unary      ::= ('+' | '-') unary | primary
/// primary    ::= NUMBER | '(' expression ')'
/// ```
///
/// Parenthesis and sign nesting is capped at [`Parser::MAX_DEPTH`] and the
/// token count at [`Parser::MAX_TOKENS`]; longer input is rejected as
/// malformed instead of exhausting the stack.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Deepest accepted nesting of parentheses and unary signs
    pub const MAX_DEPTH: usize = 256;

    /// Longest accepted token stream
    pub const MAX_TOKENS: usize = 4096;

    /// Creates a new parser from tokens
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parses a string expression into an AST
    pub fn parse_str(input: &str) -> CalcResult<AstNode> {
        let tokens = Tokenizer::new(input).tokenize()?;
        Self::new(tokens).parse()
    }

    /// Parses all tokens into a single AST
    pub fn parse(&mut self) -> CalcResult<AstNode> {
        if self.tokens.is_empty() {
            return Err(CalcError::malformed("Empty expression"));
        }
        if self.tokens.len() > Self::MAX_TOKENS {
            return Err(CalcError::malformed("Expression too long"));
        }

        let ast = self.parse_expression()?;

        if let Some(token) = self.current() {
            return Err(CalcError::malformed(format!(
                "Unexpected token {token:?} at position {}",
                self.pos
            )));
        }

        Ok(ast)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn descend(&mut self) -> CalcResult<()> {
        self.depth += 1;
        if self.depth > Self::MAX_DEPTH {
            return Err(CalcError::malformed("Expression nested too deeply"));
        }
        Ok(())
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_expression(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.current() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current() {
                Some(Token::Star) => BinaryOp::Multiply,
                Some(Token::Slash) => BinaryOp::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> CalcResult<AstNode> {
        match self.current() {
            Some(Token::Minus) => {
                self.advance();
                self.descend()?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(AstNode::negate(inner))
            }
            Some(Token::Plus) => {
                self.advance();
                self.descend()?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> CalcResult<AstNode> {
        let token = self
            .advance()
            .cloned()
            .ok_or_else(|| CalcError::malformed("Unexpected end of expression"))?;

        match token {
            Token::Number(n) => Ok(AstNode::Number(n)),
            Token::LeftParen => {
                self.descend()?;
                let expr = self.parse_expression()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RightParen) => Ok(expr),
                    Some(t) => Err(CalcError::malformed(format!(
                        "Expected ')' but found {t:?}"
                    ))),
                    None => Err(CalcError::malformed("Unclosed parenthesis")),
                }
            }
            _ => Err(CalcError::malformed(format!("Unexpected token: {token:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== BinaryOp tests =====

    #[test]
    fn test_binary_op_apply() {
        assert_eq!(BinaryOp::Add.apply(2.0, 3.0), Ok(5.0));
        assert_eq!(BinaryOp::Subtract.apply(2.0, 3.0), Ok(-1.0));
        assert_eq!(BinaryOp::Multiply.apply(2.0, 3.0), Ok(6.0));
        assert_eq!(BinaryOp::Divide.apply(3.0, 2.0), Ok(1.5));
    }

    #[test]
    fn test_binary_op_divide_by_zero() {
        assert_eq!(
            BinaryOp::Divide.apply(1.0, 0.0),
            Err(CalcError::malformed("Division by zero"))
        );
    }

    // ===== Tokenizer tests =====

    #[test]
    fn test_tokenize_expression() {
        let tokens = Tokenizer::new("2+3*4").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(2.0),
                Token::Plus,
                Token::Number(3.0),
                Token::Star,
                Token::Number(4.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_decimals() {
        let tokens = Tokenizer::new(".5 2. 3.25").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![Token::Number(0.5), Token::Number(2.0), Token::Number(3.25)]
        );
    }

    #[test]
    fn test_tokenize_second_dot_starts_new_literal() {
        let tokens = Tokenizer::new("1.2.3").tokenize().unwrap();
        assert_eq!(tokens, vec![Token::Number(1.2), Token::Number(0.3)]);
    }

    #[test]
    fn test_tokenize_lone_dot_fails() {
        assert!(Tokenizer::new(".").tokenize().is_err());
    }

    #[test]
    fn test_tokenize_rejects_foreign_characters() {
        assert!(Tokenizer::new("2 ^ 3").tokenize().is_err());
        assert!(Tokenizer::new("alert(1)").tokenize().is_err());
        assert!(Tokenizer::new("2 × 3").tokenize().is_err());
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(Tokenizer::new("  ").tokenize().unwrap().is_empty());
    }

    // ===== Parser tests =====

    #[test]
    fn test_parse_precedence_mul_over_add() {
        let ast = Parser::parse_str("2+3*4").unwrap();
        assert_eq!(
            ast,
            AstNode::binary(
                AstNode::Number(2.0),
                BinaryOp::Add,
                AstNode::binary(AstNode::Number(3.0), BinaryOp::Multiply, AstNode::Number(4.0)),
            )
        );
    }

    #[test]
    fn test_parse_left_associative_subtraction() {
        // (8 - 3) - 2, not 8 - (3 - 2)
        let ast = Parser::parse_str("8-3-2").unwrap();
        assert_eq!(
            ast,
            AstNode::binary(
                AstNode::binary(AstNode::Number(8.0), BinaryOp::Subtract, AstNode::Number(3.0)),
                BinaryOp::Subtract,
                AstNode::Number(2.0),
            )
        );
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = Parser::parse_str("(2+3)*4").unwrap();
        match ast {
            AstNode::BinaryOp {
                op: BinaryOp::Multiply,
                left,
                ..
            } => assert!(matches!(*left, AstNode::BinaryOp { op: BinaryOp::Add, .. })),
            other => panic!("Expected Multiply at top level, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unary_signs() {
        assert_eq!(
            Parser::parse_str("-5").unwrap(),
            AstNode::negate(AstNode::Number(5.0))
        );
        assert_eq!(Parser::parse_str("+5").unwrap(), AstNode::Number(5.0));
        assert_eq!(
            Parser::parse_str("3*-2").unwrap(),
            AstNode::binary(
                AstNode::Number(3.0),
                BinaryOp::Multiply,
                AstNode::negate(AstNode::Number(2.0)),
            )
        );
    }

    #[test]
    fn test_parse_errors() {
        for input in ["", "2+", "(2+3", "2+3)", "2*/3", "()", "5(3)", "1.2.3"] {
            assert!(
                matches!(Parser::parse_str(input), Err(CalcError::MalformedExpression(_))),
                "expected failure for {input:?}"
            );
        }
    }

    #[test]
    fn test_parser_parse_empty_tokens() {
        let result = Parser::new(vec![]).parse();
        assert_eq!(result, Err(CalcError::malformed("Empty expression")));
    }

    // ===== Limit tests =====

    #[test]
    fn test_parse_deep_parentheses_rejected() {
        let input = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(
            Parser::parse_str(&input),
            Err(CalcError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_parse_nesting_limit() {
        let depth = Parser::MAX_DEPTH;
        let at_limit = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(Parser::parse_str(&at_limit).is_ok());

        let over = format!("{}1{}", "(".repeat(depth + 1), ")".repeat(depth + 1));
        assert_eq!(
            Parser::parse_str(&over),
            Err(CalcError::malformed("Expression nested too deeply"))
        );

        let signs = format!("{}1", "-".repeat(depth + 1));
        assert_eq!(
            Parser::parse_str(&signs),
            Err(CalcError::malformed("Expression nested too deeply"))
        );
    }

    #[test]
    fn test_parse_token_limit() {
        let long = format!("{}1", "1+".repeat(Parser::MAX_TOKENS));
        assert_eq!(
            Parser::parse_str(&long),
            Err(CalcError::malformed("Expression too long"))
        );

        let chain = format!("{}1", "1+".repeat(1000));
        assert!(Parser::parse_str(&chain).is_ok());
    }
}
