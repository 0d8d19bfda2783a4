use crate::error::{ParseError, ValidationError};
use indexmap::IndexSet;
use plex::lexer;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Connective {
	And,
	Or,
	Not,
	If,
	Iff,
	Xor,
	// kept as written, rejected by validation
	Unknown(String),
}

impl Connective {
	pub fn from_word(word: &str) -> Connective {
		match word.to_ascii_lowercase().as_str() {
			"and" => Connective::And,
			"or" => Connective::Or,
			"not" => Connective::Not,
			"if" => Connective::If,
			"iff" => Connective::Iff,
			"xor" => Connective::Xor,
			_ => Connective::Unknown(word.to_owned()),
		}
	}

	pub fn name(&self) -> &str {
		match self {
			Connective::And => "and",
			Connective::Or => "or",
			Connective::Not => "not",
			Connective::If => "if",
			Connective::Iff => "iff",
			Connective::Xor => "xor",
			Connective::Unknown(word) => word,
		}
	}

	// None for the variadic connectives
	fn arity(&self) -> Option<usize> {
		match self {
			Connective::Not => Some(1),
			Connective::If | Connective::Iff => Some(2),
			_ => None,
		}
	}
}

impl fmt::Display for Connective {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
	Symbol(String),
	Connective(Connective, Vec<Expression>),
}

impl Expression {
	pub fn symbol(name: impl Into<String>) -> Expression {
		Expression::Symbol(name.into())
	}

	pub fn and(children: Vec<Expression>) -> Expression {
		Expression::Connective(Connective::And, children)
	}

	pub fn negate(self) -> Expression {
		Expression::Connective(Connective::Not, vec![self])
	}

	pub fn from_string(line: &str) -> Result<Expression, ParseError> {
		parse(line)
	}

	// depth first, stops at the first failure
	pub fn validate(&self) -> Result<(), ValidationError> {
		match self {
			Expression::Symbol(name) => {
				if is_valid_symbol(name) {
					Ok(())
				} else {
					Err(ValidationError::InvalidSymbol(name.clone()))
				}
			}
			Expression::Connective(connective, children) => {
				if let Connective::Unknown(word) = connective {
					return Err(ValidationError::UnknownConnective(word.clone()));
				}
				if let Some(expected) = connective.arity() {
					if children.len() != expected {
						return Err(ValidationError::Arity {
							connective: connective.to_string(),
							expected,
							found: children.len(),
						});
					}
				}
				children.iter().try_for_each(Expression::validate)
			}
		}
	}

	pub fn is_valid(&self) -> bool {
		match self.validate() {
			Ok(()) => true,
			Err(err) => {
				warn!("{}", err);
				false
			}
		}
	}

	fn render_recurse(&self, result: &mut String, separator: &str) {
		match self {
			Expression::Symbol(name) => result.push_str(name),
			Expression::Connective(connective, children) => {
				result.push('(');
				result.push_str(connective.name());
				for child in children {
					result.push(' ');
					child.render_recurse(result, "");
					result.push_str(separator);
				}
				result.push(')');
			}
		}
	}

	// separator follows every top-level child only
	pub fn render(&self, separator: &str) -> String {
		let mut result = String::new();
		self.render_recurse(&mut result, separator);
		result
	}

	pub fn collect_symbols(&self, symbols: &mut IndexSet<String>) {
		match self {
			Expression::Symbol(name) => {
				if !symbols.contains(name.as_str()) {
					symbols.insert(name.clone());
				}
			}
			Expression::Connective(_, children) => {
				for child in children {
					child.collect_symbols(symbols);
				}
			}
		}
	}

	pub fn symbols(&self) -> IndexSet<String> {
		let mut symbols = IndexSet::new();
		self.collect_symbols(&mut symbols);
		symbols
	}
}

impl fmt::Display for Expression {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.render(""))
	}
}

impl FromStr for Expression {
	type Err = ParseError;

	fn from_str(line: &str) -> Result<Expression, ParseError> {
		parse(line)
	}
}

pub fn is_valid_symbol(name: &str) -> bool {
	!name.is_empty() && name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
	Word(String),
	LeftParenthesis,
	RightParenthesis,
	Whitespace,
	Unexpected(char),
}

lexer! {
	fn next_token(text: 'a) -> Token;

	r#"[ ]+"# => Token::Whitespace,
	r#"[A-Za-z0-9_]+"# => Token::Word(text.to_owned()),
	r#"\("# => Token::LeftParenthesis,
	r#"\)"# => Token::RightParenthesis,
	r#"."# => Token::Unexpected(text.chars().next().unwrap_or('.')),
}

// anything the lexer rejects (line breaks) comes back as a single character
fn lex(text: &str) -> Option<(Token, &str)> {
	if text.is_empty() {
		return None;
	}
	match next_token(text) {
		Some(lexed) => Some(lexed),
		None => {
			let ch = text.chars().next()?;
			Some((Token::Unexpected(ch), &text[ch.len_utf8()..]))
		}
	}
}

struct Cursor<'a> {
	line: &'a str,
	remaining: &'a str,
	peeked: Option<(Token, &'a str)>,
}

impl<'a> Cursor<'a> {
	fn new(line: &'a str) -> Cursor<'a> {
		Cursor {
			line,
			remaining: line,
			peeked: None,
		}
	}

	fn position(&self) -> usize {
		self.line.len() - self.remaining.len()
	}

	fn peek(&mut self) -> Option<Token> {
		if self.peeked.is_none() {
			self.peeked = lex(self.remaining);
		}
		self.peeked.as_ref().map(|(token, _)| token.clone())
	}

	fn bump(&mut self) {
		if self.peeked.is_none() {
			self.peeked = lex(self.remaining);
		}
		if let Some((_, rest)) = self.peeked.take() {
			self.remaining = rest;
		}
	}

	fn unexpected(&self, character: char) -> ParseError {
		ParseError::UnexpectedCharacter {
			character,
			position: self.position(),
		}
	}
}

/// Parses the first prefix expression on `line`, e.g. `(and P (if P Q))`.
pub fn parse(line: &str) -> Result<Expression, ParseError> {
	let mut cursor = Cursor::new(line);
	let expression = read_expression(&mut cursor)?;
	let trailing = cursor.remaining.trim_start_matches(' ');
	if !trailing.is_empty() {
		warn!("ignoring trailing input {:?} after {}", trailing, expression);
	}
	debug!("parsed {}", expression);
	Ok(expression)
}

fn read_expression(cursor: &mut Cursor) -> Result<Expression, ParseError> {
	loop {
		match cursor.peek() {
			None => return Err(ParseError::EmptyInput),
			Some(Token::Whitespace) => cursor.bump(),
			Some(Token::LeftParenthesis) => {
				cursor.bump();
				let word = read_word(cursor)?;
				let children = read_subexpressions(cursor)?;
				return Ok(Expression::Connective(Connective::from_word(&word), children));
			}
			Some(_) => return Ok(Expression::Symbol(read_word(cursor)?)),
		}
	}
}

fn read_subexpressions(cursor: &mut Cursor) -> Result<Vec<Expression>, ParseError> {
	let mut children = Vec::new();
	loop {
		match cursor.peek() {
			None => {
				return Err(ParseError::UnexpectedEnd {
					position: cursor.position(),
				})
			}
			Some(Token::Whitespace) => cursor.bump(),
			Some(Token::RightParenthesis) => {
				cursor.bump();
				return Ok(children);
			}
			Some(_) => children.push(read_expression(cursor)?),
		}
	}
}

// a word ends at ')', ' ' or end of input; it may be empty
fn read_word(cursor: &mut Cursor) -> Result<String, ParseError> {
	let mut word = String::new();
	if let Some(Token::Word(text)) = cursor.peek() {
		cursor.bump();
		word = text;
	}
	match cursor.peek() {
		Some(Token::LeftParenthesis) => Err(cursor.unexpected('(')),
		Some(Token::Unexpected(ch)) => Err(cursor.unexpected(ch)),
		_ => Ok(word),
	}
}
