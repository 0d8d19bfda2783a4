use crate::error::EvalError;
use crate::prop_tree::{Connective, Expression};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

pub type Model = HashMap<String, bool>;

// asserted up front, never enumerated
pub type FixedAssignments = HashMap<String, bool>;

fn operands<'e>(
	connective: &Connective,
	children: &'e [Expression],
	needed: usize,
) -> Result<&'e [Expression], EvalError> {
	if children.len() < needed {
		return Err(EvalError::MissingOperand {
			connective: connective.to_string(),
			found: children.len(),
		});
	}
	Ok(children)
}

// every symbol in the expression must be bound
pub fn evaluate(expression: &Expression, model: &Model) -> Result<bool, EvalError> {
	let (connective, children) = match expression {
		Expression::Symbol(name) => {
			return model
				.get(name)
				.copied()
				.ok_or_else(|| EvalError::UnboundSymbol(name.clone()))
		}
		Expression::Connective(connective, children) => (connective, children.as_slice()),
	};
	match connective {
		Connective::And => {
			for child in children {
				if !evaluate(child, model)? {
					return Ok(false);
				}
			}
			Ok(true)
		}
		Connective::Or => {
			for child in children {
				if evaluate(child, model)? {
					return Ok(true);
				}
			}
			Ok(false)
		}
		Connective::Not => {
			let args = operands(connective, children, 1)?;
			Ok(!evaluate(&args[0], model)?)
		}
		Connective::If => {
			let args = operands(connective, children, 2)?;
			Ok(!evaluate(&args[0], model)? || evaluate(&args[1], model)?)
		}
		Connective::Iff => {
			let args = operands(connective, children, 2)?;
			Ok(evaluate(&args[0], model)? == evaluate(&args[1], model)?)
		}
		// operands past the second are ignored
		Connective::Xor => {
			let args = operands(connective, children, 2)?;
			Ok(evaluate(&args[0], model)? != evaluate(&args[1], model)?)
		}
		Connective::Unknown(word) => Err(EvalError::UnknownConnective(word.clone())),
	}
}

pub struct TruthTable<'a> {
	knowledge_base: &'a Expression,
	query: &'a Expression,
	symbols: Vec<String>,
	fixed: &'a FixedAssignments,
}

impl<'a> TruthTable<'a> {
	// symbols must cover both expressions, order only changes traversal
	pub fn new(
		knowledge_base: &'a Expression,
		query: &'a Expression,
		symbols: Vec<String>,
		fixed: &'a FixedAssignments,
	) -> TruthTable<'a> {
		TruthTable {
			knowledge_base,
			query,
			symbols,
			fixed,
		}
	}

	pub fn from_expressions(
		knowledge_base: &'a Expression,
		query: &'a Expression,
		fixed: &'a FixedAssignments,
	) -> TruthTable<'a> {
		let mut symbols = IndexSet::new();
		knowledge_base.collect_symbols(&mut symbols);
		query.collect_symbols(&mut symbols);
		TruthTable::new(knowledge_base, query, symbols.into_iter().collect(), fixed)
	}

	pub fn symbols(&self) -> &[String] {
		&self.symbols
	}

	// each branch owns its model, fixed symbols never branch
	fn check_all_recurse(&self, index: usize, mut model: Model) -> Result<bool, EvalError> {
		let symbol = match self.symbols.get(index) {
			Some(symbol) => symbol,
			None => {
				if !evaluate(self.knowledge_base, &model)? {
					return Ok(true);
				}
				let result = evaluate(self.query, &model)?;
				trace!(?model, result, "knowledge base holds");
				return Ok(result);
			}
		};
		if let Some(&value) = self.fixed.get(symbol) {
			model.insert(symbol.clone(), value);
			return self.check_all_recurse(index + 1, model);
		}
		let mut model_true = model.clone();
		model_true.insert(symbol.clone(), true);
		if !self.check_all_recurse(index + 1, model_true)? {
			return Ok(false);
		}
		model.insert(symbol.clone(), false);
		self.check_all_recurse(index + 1, model)
	}

	pub fn check_all(&self) -> Result<bool, EvalError> {
		let free = self
			.symbols
			.iter()
			.filter(|symbol| !self.fixed.contains_key(*symbol))
			.count();
		debug!(
			symbols = self.symbols.len(),
			free,
			"enumerating {} models",
			1u128.checked_shl(free as u32).unwrap_or(u128::MAX)
		);
		self.check_all_recurse(0, Model::new())
	}
}

/// TT-Entails: does `knowledge_base` entail `query` given the fixed symbols.
pub fn entails(
	knowledge_base: &Expression,
	query: &Expression,
	fixed: &FixedAssignments,
) -> Result<bool, EvalError> {
	TruthTable::from_expressions(knowledge_base, query, fixed).check_all()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
	DefinitelyTrue,
	DefinitelyFalse,
	PossiblyTrueOrFalse,
	BothTrueAndFalse,
}

impl Verdict {
	pub fn from_entailment(statement: bool, negation: bool) -> Verdict {
		match (statement, negation) {
			(true, false) => Verdict::DefinitelyTrue,
			(false, true) => Verdict::DefinitelyFalse,
			(false, false) => Verdict::PossiblyTrueOrFalse,
			(true, true) => Verdict::BothTrueAndFalse,
		}
	}
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Verdict::DefinitelyTrue => "Definitely True",
			Verdict::DefinitelyFalse => "Definitely False",
			Verdict::PossiblyTrueOrFalse => "Possibly True, possibly False",
			Verdict::BothTrueAndFalse => "Both True and False",
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::prop_tree::parse;

	fn model(pairs: &[(&str, bool)]) -> Model {
		pairs
			.iter()
			.map(|(name, value)| (name.to_string(), *value))
			.collect()
	}

	fn verdict(kb: &str, statement: &str, fixed: &FixedAssignments) -> Verdict {
		let kb = parse(kb).unwrap();
		let statement = parse(statement).unwrap();
		let negation = statement.clone().negate();
		Verdict::from_entailment(
			entails(&kb, &statement, fixed).unwrap(),
			entails(&kb, &negation, fixed).unwrap(),
		)
	}

	#[test]
	fn test_evaluate_connectives() {
		let m = model(&[("A", true), ("B", false)]);
		let eval = |text: &str| evaluate(&parse(text).unwrap(), &m).unwrap();
		assert!(eval("(and A (not B))"));
		assert!(!eval("(and A B A)"));
		assert!(eval("(or B B A)"));
		assert!(!eval("(if A B)"));
		assert!(eval("(if B A)"));
		assert!(eval("(if B B)"));
		assert!(!eval("(iff A B)"));
		assert!(eval("(iff B B)"));
		assert!(eval("(xor A B)"));
		assert!(!eval("(xor A A)"));
		assert!(eval("(and)"));
		assert!(!eval("(or)"));
	}

	#[test]
	fn test_evaluate_xor_first_two() {
		let m = model(&[("A", true), ("B", false), ("C", true)]);
		assert_eq!(evaluate(&parse("(xor A B C)").unwrap(), &m), Ok(true));
		assert_eq!(evaluate(&parse("(xor A C B)").unwrap(), &m), Ok(false));
		// the third operand is never looked up
		assert_eq!(evaluate(&parse("(xor A B Z)").unwrap(), &m), Ok(true));
	}

	#[test]
	fn test_evaluate_short_circuit() {
		// C is unbound but never reached
		let m = model(&[("A", true), ("B", false)]);
		assert_eq!(evaluate(&parse("(or A C)").unwrap(), &m), Ok(true));
		assert_eq!(evaluate(&parse("(and B C)").unwrap(), &m), Ok(false));
	}

	#[test]
	fn test_evaluate_contract_errors() {
		let m = model(&[("A", true)]);
		assert_eq!(
			evaluate(&parse("(and A C)").unwrap(), &m),
			Err(EvalError::UnboundSymbol("C".to_owned()))
		);
		assert_eq!(
			evaluate(&parse("(not)").unwrap(), &m),
			Err(EvalError::MissingOperand {
				connective: "not".to_owned(),
				found: 0
			})
		);
		assert_eq!(
			evaluate(&parse("(xor A)").unwrap(), &m),
			Err(EvalError::MissingOperand {
				connective: "xor".to_owned(),
				found: 1
			})
		);
		assert_eq!(
			evaluate(&parse("(nand A A)").unwrap(), &m),
			Err(EvalError::UnknownConnective("nand".to_owned()))
		);
	}

	#[test]
	fn test_modus_ponens() {
		let none = FixedAssignments::new();
		assert_eq!(verdict("(and P (if P Q))", "Q", &none), Verdict::DefinitelyTrue);
		assert_eq!(
			verdict("(and P (if P Q))", "(not Q)", &none),
			Verdict::DefinitelyFalse
		);
	}

	#[test]
	fn test_unconstrained() {
		let none = FixedAssignments::new();
		assert_eq!(verdict("(or P Q)", "P", &none), Verdict::PossiblyTrueOrFalse);
	}

	#[test]
	fn test_query_only_symbol() {
		// R never appears in the knowledge base
		let none = FixedAssignments::new();
		assert_eq!(verdict("(and P)", "R", &none), Verdict::PossiblyTrueOrFalse);
		assert_eq!(verdict("(and P)", "(or R (not R))", &none), Verdict::DefinitelyTrue);
	}

	#[test]
	fn test_contradictory_fixed() {
		let mut fixed = FixedAssignments::new();
		fixed.insert("P".to_owned(), false);
		assert_eq!(verdict("P", "P", &fixed), Verdict::BothTrueAndFalse);
		assert_eq!(verdict("(and P Q)", "Q", &fixed), Verdict::BothTrueAndFalse);
	}

	#[test]
	fn test_fixed_symbol_not_enumerated() {
		let mut fixed = FixedAssignments::new();
		fixed.insert("P".to_owned(), true);
		assert_eq!(verdict("(if P Q)", "Q", &fixed), Verdict::DefinitelyTrue);
		// fixed symbols outside the expressions are ignored
		fixed.insert("Z".to_owned(), false);
		assert_eq!(verdict("(if P Q)", "Q", &fixed), Verdict::DefinitelyTrue);
	}

	#[test]
	fn test_symbol_order() {
		let kb = parse("(and (or A B) (if A C) (if B C))").unwrap();
		let query = parse("C").unwrap();
		let fixed = FixedAssignments::new();
		let table = TruthTable::from_expressions(&kb, &query, &fixed);
		assert_eq!(table.symbols(), &["A", "B", "C"]);
		assert_eq!(table.check_all(), Ok(true));
		let reversed = vec!["C".to_owned(), "B".to_owned(), "A".to_owned()];
		assert_eq!(TruthTable::new(&kb, &query, reversed, &fixed).check_all(), Ok(true));
	}

	#[test]
	fn test_verdict_display() {
		assert_eq!(Verdict::from_entailment(true, false).to_string(), "Definitely True");
		assert_eq!(Verdict::from_entailment(false, true).to_string(), "Definitely False");
		assert_eq!(
			Verdict::from_entailment(false, false).to_string(),
			"Possibly True, possibly False"
		);
		assert_eq!(
			Verdict::from_entailment(true, true).to_string(),
			"Both True and False"
		);
	}
}
