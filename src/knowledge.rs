use crate::error::{Error, Result};
use crate::prop_tree::{parse, Expression};
use crate::truth_table::{entails, FixedAssignments, Verdict};
use std::fs;
use std::path::Path;
use tracing::debug;

pub fn strip_terminators(line: &str) -> &str {
	line.trim_end_matches(|ch| ch == '\r' || ch == '\n')
}

pub fn is_skipped(line: &str) -> bool {
	line.is_empty() || line.starts_with('#')
}

// A single token `P` fixes `P` to true. Two tokens where the first, minus its
// leading character, reads `not` fix the second token minus its last
// character to false, so `(not P)` fixes `P`. Nothing is checked beyond that:
// `(not  P)` with odd spacing still matches, `(not (P))` fixes `(P)`.
pub fn fixed_assignment(line: &str) -> Option<(String, bool)> {
	let tokens: Vec<&str> = line.split_whitespace().collect();
	match tokens.as_slice() {
		[word] => Some((word.to_string(), true)),
		[first, second] if drop_first(first) == "not" => {
			Some((drop_last(second).to_owned(), false))
		}
		_ => None,
	}
}

fn drop_first(token: &str) -> &str {
	let mut chars = token.chars();
	chars.next();
	chars.as_str()
}

fn drop_last(token: &str) -> &str {
	let mut chars = token.chars();
	chars.next_back();
	chars.as_str()
}

fn read_file(path: &Path) -> Result<String> {
	fs::read_to_string(path).map_err(|source| Error::Io {
		path: path.to_path_buf(),
		source,
	})
}

#[derive(Clone, Debug, Default)]
pub struct Knowledge {
	rules: Vec<Expression>,
	fixed: FixedAssignments,
}

impl Knowledge {
	pub fn new() -> Knowledge {
		Knowledge::default()
	}

	// name only labels parse errors
	pub fn load_str(&mut self, name: &str, text: &str) -> Result<()> {
		for (number, line) in text.lines().enumerate() {
			let line = strip_terminators(line);
			if is_skipped(line) {
				continue;
			}
			if let Some((symbol, value)) = fixed_assignment(line) {
				debug!(%symbol, value, "fixed assignment");
				self.fixed.insert(symbol, value);
			}
			let expression = parse(line).map_err(|source| Error::Parse {
				name: name.to_owned(),
				line: number + 1,
				source,
			})?;
			self.rules.push(expression);
		}
		Ok(())
	}

	pub fn load_file(&mut self, path: &Path) -> Result<()> {
		let text = read_file(path)?;
		self.load_str(&path.display().to_string(), &text)
	}

	pub fn rules(&self) -> &[Expression] {
		&self.rules
	}

	pub fn fixed(&self) -> &FixedAssignments {
		&self.fixed
	}

	pub fn knowledge_base(&self) -> Expression {
		Expression::and(self.rules.clone())
	}

	pub fn validate(&self) -> Result<()> {
		self.knowledge_base()
			.validate()
			.map_err(Error::InvalidKnowledgeBase)
	}

	pub fn verdict(&self, statement: &Expression) -> Result<Verdict> {
		let knowledge_base = self.knowledge_base();
		let negation = statement.clone().negate();
		negation.validate().map_err(Error::InvalidStatement)?;
		let holds = entails(&knowledge_base, statement, &self.fixed)?;
		let fails = entails(&knowledge_base, &negation, &self.fixed)?;
		debug!(holds, fails, "entailment checked");
		Ok(Verdict::from_entailment(holds, fails))
	}
}

// first line only
pub fn read_statement(text: &str) -> Result<Expression> {
	let line = text.lines().next().ok_or(Error::MissingStatement)?;
	let statement = parse(strip_terminators(line)).map_err(|source| Error::Parse {
		name: "statement".to_owned(),
		line: 1,
		source,
	})?;
	statement.validate().map_err(Error::InvalidStatement)?;
	Ok(statement)
}

pub fn read_statement_file(path: &Path) -> Result<Expression> {
	read_statement(&read_file(path)?)
}
