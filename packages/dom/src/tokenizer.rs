use logos::Logos;
use std::ops::Range;

/// Top-level markup tokens.
///
/// Tags are lexed whole; their internals go through [`TagToken`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"<!--([^-]|-[^-])*-->")]
pub enum Token<'src> {
    // `<tag attr="value">` or `<tag/>`
    #[regex(r"<[a-zA-Z][^>]*>", |lex| lex.slice())]
    StartTag(&'src str),

    // `</tag>`
    #[regex(r"</[a-zA-Z][^>]*>", |lex| lex.slice())]
    EndTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),
}

/// Tokens inside a start tag, between `<` and `>`.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum TagToken<'src> {
    #[regex(r#"[^ \t\n\r\f/>=<"']+"#, |lex| lex.slice())]
    Name(&'src str),

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| trim_quotes(lex.slice()))]
    #[regex(r"'[^']*'", |lex| trim_quotes(lex.slice()))]
    Quoted(&'src str),

    #[token("/")]
    Slash,
}

fn trim_quotes(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

/// Tokenize markup, keeping byte spans. The error carries the position of
/// the first character the lexer could not match.
pub fn tokenize(source: &str) -> Result<Vec<(Token<'_>, Range<usize>)>, usize> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(lexer.span().start),
        }
    }
    Ok(tokens)
}

pub fn tokenize_tag(inner: &str) -> Result<Vec<TagToken<'_>>, usize> {
    let mut lexer = TagToken::lexer(inner);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => return Err(lexer.span().start),
        }
    }
    Ok(tokens)
}
