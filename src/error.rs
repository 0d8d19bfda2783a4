use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

// Byte offsets into the parsed line
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
	#[error("unexpected character {character:?} at {position}")]
	UnexpectedCharacter { character: char, position: usize },
	#[error("unexpected end of input at {position}, expected ')'")]
	UnexpectedEnd { position: usize },
	#[error("empty expression")]
	EmptyInput,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
	#[error("connective \"{connective}\" with {found} arguments, expected {expected}")]
	Arity {
		connective: String,
		expected: usize,
		found: usize,
	},
	#[error("unknown connective {0:?}")]
	UnknownConnective(String),
	#[error("invalid symbol {0:?}")]
	InvalidSymbol(String),
}

// only reachable on trees that skipped validation
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvalError {
	#[error("symbol {0:?} is not bound in the model")]
	UnboundSymbol(String),
	#[error("connective \"{connective}\" evaluated with {found} arguments")]
	MissingOperand { connective: String, found: usize },
	#[error("cannot evaluate unknown connective {0:?}")]
	UnknownConnective(String),
}

#[derive(Debug, Error)]
pub enum Error {
	#[error("{name}:{line}: {source}")]
	Parse {
		name: String,
		line: usize,
		#[source]
		source: ParseError,
	},
	#[error("invalid knowledge base: {0}")]
	InvalidKnowledgeBase(#[source] ValidationError),
	#[error("invalid statement: {0}")]
	InvalidStatement(#[source] ValidationError),
	#[error("statement file is empty")]
	MissingStatement,
	#[error(transparent)]
	Eval(#[from] EvalError),
	#[error("failed to open file {}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}
