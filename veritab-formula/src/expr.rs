//! Propositional formula ASTs.
use std::fmt;
use std::ops;

use rustc_hash::FxHashMap;

use crate::token::TokenKind;

/// The backing type used to represent variable ids.
pub type VarIdx = u32;

/// A propositional variable.
///
/// A variable is represented by a 0-based id into the [`VarTable`] that
/// interned it. Every occurrence of one spelled name within a formula shares
/// the same id, so assigning the variable changes all occurrences at once.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VarId {
    index: VarIdx,
}

impl VarId {
    /// Creates a variable id from a 0-based index.
    #[inline]
    pub fn from_index(index: usize) -> VarId {
        VarId {
            index: index as VarIdx,
        }
    }

    /// The 0-based index representing this variable.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "v{}", self.index)
    }
}

/// Interning table for variable names plus one value cell per variable.
///
/// Ids are handed out in first-seen order. The value cells carry the current
/// assignment used by [`Expr::eval`]; truth-table enumeration rewrites them
/// between evaluations of an otherwise unchanged AST.
#[derive(Clone, Debug, Default)]
pub struct VarTable {
    names: Vec<String>,
    values: Vec<bool>,
    ids: FxHashMap<String, VarId>,
}

impl VarTable {
    /// Create an empty table.
    pub fn new() -> VarTable {
        VarTable::default()
    }

    /// Id for `name`, interning it if it has no id yet.
    ///
    /// New variables start out assigned `false`.
    pub fn intern(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = VarId::from_index(self.names.len());
        self.names.push(name.to_string());
        self.values.push(false);
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Id for `name` if it has been interned.
    pub fn lookup(&self, name: &str) -> Option<VarId> {
        self.ids.get(name).copied()
    }

    /// Number of distinct variables.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table holds no variables.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of an interned variable.
    pub fn name(&self, var: VarId) -> &str {
        &self.names[var.index()]
    }

    /// Current assignment of an interned variable.
    pub fn value(&self, var: VarId) -> bool {
        self.values[var.index()]
    }

    /// Reassign an interned variable.
    pub fn set_value(&mut self, var: VarId, value: bool) {
        self.values[var.index()] = value;
    }

    /// All ids in first-seen order.
    pub fn ids(&self) -> impl Iterator<Item = VarId> {
        (0..self.names.len()).map(VarId::from_index)
    }
}

/// A binary connective.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    And,
    Or,
    Xor,
    Implies,
    Biconditional,
}

impl BinOp {
    /// The token kind that produces this connective.
    pub fn token_kind(self) -> TokenKind {
        match self {
            BinOp::And => TokenKind::And,
            BinOp::Or => TokenKind::Or,
            BinOp::Xor => TokenKind::Xor,
            BinOp::Implies => TokenKind::Implies,
            BinOp::Biconditional => TokenKind::Biconditional,
        }
    }

    /// The connective scanned from `kind`, if `kind` is an infix connective.
    pub fn from_token(kind: TokenKind) -> Option<BinOp> {
        match kind {
            TokenKind::And => Some(BinOp::And),
            TokenKind::Or => Some(BinOp::Or),
            TokenKind::Xor => Some(BinOp::Xor),
            TokenKind::Implies => Some(BinOp::Implies),
            TokenKind::Biconditional => Some(BinOp::Biconditional),
            _ => None,
        }
    }

    /// Shortcut for `TokenKind::precedence`.
    #[inline]
    pub fn precedence(self) -> u32 {
        self.token_kind().precedence()
    }

    /// The canonical LaTeX spelling used when rendering.
    ///
    /// The tokenizer accepts further spellings (`\wedge`, `\vee`,
    /// `\implies`, `\rightarrow`), which all render back as the canonical
    /// one.
    pub fn latex_str(self) -> &'static str {
        match self {
            BinOp::And => "\\land",
            BinOp::Or => "\\lor",
            BinOp::Xor => "\\oplus",
            BinOp::Implies => "\\to",
            BinOp::Biconditional => "\\leftrightarrow",
        }
    }

    /// Apply the connective to two truth values.
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BinOp::And => lhs & rhs,
            BinOp::Or => lhs | rhs,
            BinOp::Xor => lhs ^ rhs,
            BinOp::Implies => lhs <= rhs,
            BinOp::Biconditional => lhs == rhs,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.latex_str())
    }
}

/// A propositional formula.
///
/// Children are owned and always present; a parse that cannot produce a
/// child fails as a whole instead of building a partial node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// A variable occurrence.
    Var(VarId),
    /// Logical negation of a subformula.
    Not(Box<Expr>),
    /// A binary connective applied to two subformulas.
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Create a variable occurrence.
    pub fn var(var: VarId) -> Expr {
        Expr::Var(var)
    }

    /// Create a negation.
    pub fn negation(operand: Expr) -> Expr {
        Expr::Not(Box::new(operand))
    }

    /// Create a binary connective node.
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Shortcut for an implication node.
    pub fn implies(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Implies, lhs, rhs)
    }

    /// Shortcut for a biconditional node.
    pub fn iff(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Biconditional, lhs, rhs)
    }

    /// Binding strength of the node's top-level connective.
    ///
    /// Atoms bind tightest of all; they never need parentheses.
    pub fn precedence(&self) -> u32 {
        match self {
            Expr::Var(_) => u32::MAX,
            Expr::Not(_) => TokenKind::Not.precedence(),
            Expr::Binary { op, .. } => op.precedence(),
        }
    }

    /// Truth value of the formula under the assignment stored in `vars`.
    ///
    /// Every id occurring in the formula must have been interned in `vars`.
    pub fn eval(&self, vars: &VarTable) -> bool {
        match self {
            Expr::Var(var) => vars.value(*var),
            Expr::Not(operand) => !operand.eval(vars),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.eval(vars), rhs.eval(vars)),
        }
    }

    /// Renders the formula back into LaTeX notation.
    ///
    /// Subformulas are parenthesized only where the precedence of the child
    /// requires it; parentheses that were redundant in the input are not
    /// reproduced.
    pub fn display<'a>(&'a self, vars: &'a VarTable) -> ExprDisplay<'a> {
        ExprDisplay { expr: self, vars }
    }
}

impl ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::negation(self)
    }
}

impl ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::And, self, rhs)
    }
}

impl ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Or, self, rhs)
    }
}

impl ops::BitXor for Expr {
    type Output = Expr;

    fn bitxor(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Xor, self, rhs)
    }
}

/// Borrowing [`Display`](fmt::Display) adapter returned by [`Expr::display`].
pub struct ExprDisplay<'a> {
    expr: &'a Expr,
    vars: &'a VarTable,
}

impl<'a> fmt::Display for ExprDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.expr {
            Expr::Var(var) => f.write_str(self.vars.name(*var)),
            Expr::Not(operand) => {
                f.write_str("\\neg ")?;
                // An operand at the same precedence is parenthesized too, so
                // nested negations read as `\neg (\neg p)`.
                if operand.precedence() <= TokenKind::Not.precedence() {
                    write!(f, "({})", operand.display(self.vars))
                } else {
                    write!(f, "{}", operand.display(self.vars))
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                if lhs.precedence() < op.precedence() {
                    write!(f, "({})", lhs.display(self.vars))?;
                } else {
                    write!(f, "{}", lhs.display(self.vars))?;
                }
                write!(f, " {} ", op)?;
                if op.precedence() > rhs.precedence() {
                    write!(f, "({})", rhs.display(self.vars))
                } else {
                    write!(f, "{}", rhs.display(self.vars))
                }
            }
        }
    }
}

#[cfg(any(test, feature = "proptest-strategies"))]
#[doc(hidden)]
pub mod strategy {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for one of the binary connectives.
    pub fn bin_op() -> impl Strategy<Value = BinOp> {
        prop_oneof![
            Just(BinOp::And),
            Just(BinOp::Or),
            Just(BinOp::Xor),
            Just(BinOp::Implies),
            Just(BinOp::Biconditional),
        ]
    }

    /// Strategy for arbitrary well-formed formulas over `vars` variables.
    ///
    /// `vars` must be at least 1. Use [`var_table`] to build a matching
    /// table of names.
    pub fn expr(vars: usize, depth: u32) -> impl Strategy<Value = Expr> {
        let leaf = (0..vars).prop_map(|index| Expr::Var(VarId::from_index(index)));
        leaf.prop_recursive(depth, 32, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(Expr::negation),
                (bin_op(), inner.clone(), inner)
                    .prop_map(|(op, lhs, rhs)| Expr::binary(op, lhs, rhs)),
            ]
        })
    }

    /// Table with one single-letter name per id, matching [`expr`].
    ///
    /// Supports up to 26 variables.
    pub fn var_table(vars: usize) -> VarTable {
        let mut table = VarTable::new();
        for index in 0..vars {
            table.intern(&((b'a' + index as u8) as char).to_string());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use crate::expr::strategy::*;

    fn two_vars() -> (VarTable, Expr, Expr) {
        let mut vars = VarTable::new();
        let p = Expr::var(vars.intern("p"));
        let q = Expr::var(vars.intern("q"));
        (vars, p, q)
    }

    #[test]
    fn interning_reuses_ids() {
        let mut vars = VarTable::new();
        let p = vars.intern("p");
        let q = vars.intern("q");
        assert_ne!(p, q);
        assert_eq!(vars.intern("p"), p);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.name(p), "p");
        assert_eq!(vars.lookup("q"), Some(q));
        assert_eq!(vars.lookup("r"), None);
    }

    #[test]
    fn connective_semantics() {
        for &(op, table) in [
            (BinOp::And, [false, false, false, true]),
            (BinOp::Or, [false, true, true, true]),
            (BinOp::Xor, [false, true, true, false]),
            (BinOp::Implies, [true, true, false, true]),
            (BinOp::Biconditional, [true, false, false, true]),
        ]
        .iter()
        {
            for code in 0..4 {
                let lhs = code & 2 != 0;
                let rhs = code & 1 != 0;
                assert_eq!(
                    op.apply(lhs, rhs),
                    table[code],
                    "{:?} {} {}",
                    op,
                    lhs,
                    rhs
                );
            }
        }
    }

    #[test]
    fn eval_follows_assignment() {
        let (mut vars, p, q) = two_vars();
        let formula = !p.clone() | (p & q);

        vars.set_value(VarId::from_index(0), true);
        vars.set_value(VarId::from_index(1), false);
        assert!(!formula.eval(&vars));

        vars.set_value(VarId::from_index(1), true);
        assert!(formula.eval(&vars));
    }

    #[test]
    fn display_parenthesization() {
        let (vars, p, q) = two_vars();

        let imp = Expr::implies(p.clone(), q.clone());
        assert_eq!(imp.display(&vars).to_string(), "p \\to q");

        let guarded = imp & !p.clone();
        assert_eq!(
            guarded.display(&vars).to_string(),
            "(p \\to q) \\land \\neg p"
        );

        let negated = !(p.clone() & q.clone());
        assert_eq!(negated.display(&vars).to_string(), "\\neg (p \\land q)");

        let double = !(!p.clone());
        assert_eq!(double.display(&vars).to_string(), "\\neg (\\neg p)");

        // Or and Xor share a precedence level, so a right-nested Xor under
        // an Or renders without parentheses.
        let mixed = p.clone() | (p.clone() ^ q.clone());
        assert_eq!(mixed.display(&vars).to_string(), "p \\lor p \\oplus q");
    }

    proptest! {
        #[test]
        fn rendering_never_empty(formula in expr(4, 5)) {
            let vars = var_table(4);
            prop_assert!(!formula.display(&vars).to_string().is_empty());
        }
    }
}
