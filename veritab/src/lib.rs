//! Veritab generates truth tables for propositional formulas written in
//! LaTeX math notation. Given a formula like `\neg p \land (q \to r)` it
//! enumerates every assignment of the formula's variables, evaluates every
//! subexpression, and renders the result as a Markdown table suitable for
//! pasting into a note.

pub mod table;

pub use table::generate_truth_table;

pub use veritab_formula::{BinOp, Expr, Token, TokenKind, VarId, VarTable};

pub mod latex {
    //! LaTeX formula parser.
    pub use veritab_latex::*;
}
