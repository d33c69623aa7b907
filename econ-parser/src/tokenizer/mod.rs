pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(Ok(kind)) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn linear_demand() {
        compare_tokens(
            "Q = 3040 - 25P",
            [
                (TokenKind::Name, "Q"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Assign, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "3040"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Sub, "-"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "25"),
                (TokenKind::Name, "P"),
            ],
        );
    }

    #[test]
    fn powers_and_decimals() {
        compare_tokens(
            "1.8+9P**2-.5(P^3)",
            [
                (TokenKind::Float, "1.8"),
                (TokenKind::Add, "+"),
                (TokenKind::Int, "9"),
                (TokenKind::Name, "P"),
                (TokenKind::Exp, "**"),
                (TokenKind::Int, "2"),
                (TokenKind::Sub, "-"),
                (TokenKind::Float, ".5"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "P"),
                (TokenKind::Exp, "^"),
                (TokenKind::Int, "3"),
                (TokenKind::CloseParen, ")"),
            ],
        );
    }

    #[test]
    fn unknown_symbol() {
        compare_tokens(
            "Q = 2 $",
            [
                (TokenKind::Name, "Q"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Assign, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "$"),
            ],
        );
    }
}
