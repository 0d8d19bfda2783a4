pub mod error;
pub mod knowledge;
pub mod prop_tree;
pub mod truth_table;

pub use error::{Error, EvalError, ParseError, Result, ValidationError};
pub use knowledge::{read_statement, read_statement_file, Knowledge};
pub use prop_tree::{parse, Connective, Expression};
pub use truth_table::{entails, evaluate, FixedAssignments, Model, TruthTable, Verdict};
