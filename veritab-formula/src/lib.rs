//! Formula data types used by the veritab truth-table generator.

pub mod expr;
pub mod token;

pub use expr::{BinOp, Expr, VarId, VarTable};
pub use token::{Token, TokenKind};
