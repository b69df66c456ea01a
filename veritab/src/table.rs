//! Truth tables.
use log::info;

use rustc_hash::FxHashMap;

use veritab_formula::{Expr, VarId, VarTable};
use veritab_latex::{Parser, ParserError};

/// Markdown cell marking a true value.
const TRUE_CELL: &str = "<span class=\"latex-true-value\">$T$</span>";
/// Markdown cell marking a false value.
const FALSE_CELL: &str = "<span class=\"latex-false-value\">$F$</span>";

/// Generate a Markdown truth table for a formula in LaTeX notation.
///
/// The formula may be wrapped in `$...$` inline-math delimiters. The table
/// has one column per distinct subexpression, shortest first, and one row
/// per assignment of the formula's variables. The first row assigns every
/// variable true and enumeration counts down from there, flipping the
/// variable with the longest name fastest.
pub fn generate_truth_table(input: &str) -> Result<String, ParserError> {
    let mut parsed = Parser::new().parse(strip_math_delimiters(input))?;

    let order = assignment_order(&parsed.vars);
    let n = order.len();

    let mut columns = Columns::default();

    for row in 0..(1usize << n) {
        for (position, &var) in order.iter().enumerate() {
            let bit = (row >> (n - 1 - position)) & 1;
            parsed.vars.set_value(var, bit == 0);
        }
        columns.push_row(&parsed.root, &parsed.vars);
    }

    info!(
        "Tabulated {} assignments of {} variables over {} subexpressions",
        1usize << n,
        n,
        columns.texts.len()
    );

    Ok(columns.render())
}

/// Variable enumeration order: ascending name length, then lexicographic.
///
/// The first variable in this order changes slowest across rows.
fn assignment_order(vars: &VarTable) -> Vec<VarId> {
    let mut order: Vec<VarId> = vars.ids().collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (vars.name(a), vars.name(b));
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    });
    order
}

/// Trim whitespace and a surrounding `$...$` pair, if present.
fn strip_math_delimiters(input: &str) -> &str {
    let input = input.trim();
    if input.len() >= 2 && input.starts_with('$') && input.ends_with('$') {
        &input[1..input.len() - 1]
    } else {
        input
    }
}

/// Column-wise truth values keyed by rendered subexpression text.
#[derive(Default)]
struct Columns {
    texts: Vec<String>,
    values: Vec<Vec<bool>>,
    ids: FxHashMap<String, usize>,
}

impl Columns {
    /// Record one row: every subexpression's rendered text and value under
    /// the current assignment, in post order. Duplicate texts within a row
    /// collapse to one entry, last value wins.
    fn push_row(&mut self, root: &Expr, vars: &VarTable) {
        let mut row: Vec<(String, bool)> = vec![];
        let mut row_ids: FxHashMap<String, usize> = FxHashMap::default();
        collect(root, vars, &mut row, &mut row_ids);

        for (text, value) in row {
            let column = match self.ids.get(&text) {
                Some(&column) => column,
                None => {
                    let column = self.texts.len();
                    self.texts.push(text.clone());
                    self.values.push(vec![]);
                    self.ids.insert(text, column);
                    column
                }
            };
            self.values[column].push(value);
        }
    }

    /// Render the collected columns as a Markdown table.
    fn render(&self) -> String {
        // Shortest expressions first; ties keep first-seen order.
        let mut order: Vec<usize> = (0..self.texts.len()).collect();
        order.sort_by_key(|&column| self.texts[column].len());

        let widths: Vec<usize> = order
            .iter()
            .map(|&column| {
                let longest_cell = self.values[column]
                    .iter()
                    .map(|&value| cell(value).len())
                    .max()
                    .unwrap_or(0);
                (self.texts[column].len() + 2).max(3).max(longest_cell)
            })
            .collect();

        let mut out = String::new();

        push_table_row(
            &mut out,
            order
                .iter()
                .zip(widths.iter())
                .map(|(&column, &width)| pad(format!("${}$", self.texts[column]), width)),
        );

        push_table_row(&mut out, widths.iter().map(|&width| "-".repeat(width)));

        let rows = self.values.first().map(|column| column.len()).unwrap_or(0);
        for row in 0..rows {
            push_table_row(
                &mut out,
                order
                    .iter()
                    .zip(widths.iter())
                    .map(|(&column, &width)| pad(cell(self.values[column][row]).to_string(), width)),
            );
        }

        out
    }
}

/// Post-order walk recording every node's rendered text and value.
fn collect(
    node: &Expr,
    vars: &VarTable,
    row: &mut Vec<(String, bool)>,
    ids: &mut FxHashMap<String, usize>,
) {
    match node {
        Expr::Var(_) => {}
        Expr::Not(operand) => collect(operand, vars, row, ids),
        Expr::Binary { lhs, rhs, .. } => {
            collect(lhs, vars, row, ids);
            collect(rhs, vars, row, ids);
        }
    }

    let text = node.display(vars).to_string();
    let value = node.eval(vars);
    match ids.get(&text) {
        Some(&at) => row[at].1 = value,
        None => {
            ids.insert(text.clone(), row.len());
            row.push((text, value));
        }
    }
}

fn cell(value: bool) -> &'static str {
    if value {
        TRUE_CELL
    } else {
        FALSE_CELL
    }
}

fn pad(text: String, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

fn push_table_row(out: &mut String, cells: impl Iterator<Item = String>) {
    let cells: Vec<String> = cells.collect();
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use veritab_formula::expr::strategy::{expr, var_table};
    use veritab_latex::parse_formula;

    fn cells(line: &str) -> Vec<&str> {
        line.trim_matches('|').split(" | ").map(str::trim).collect()
    }

    #[test]
    fn two_variable_table_shape() {
        let table = generate_truth_table("p \\land q").unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2 + 4);

        // Columns are ordered shortest expression first.
        let header = lines[0];
        let p = header.find("$p$").unwrap();
        let q = header.find("$q$").unwrap();
        let conjunction = header.find("$p \\land q$").unwrap();
        assert!(p < q && q < conjunction);

        assert!(lines[1].starts_with("| --"));

        // p and q are each true on two rows, the conjunction on one.
        assert_eq!(table.matches(TRUE_CELL).count(), 5);
        assert_eq!(table.matches(FALSE_CELL).count(), 7);
    }

    #[test]
    fn first_row_assigns_all_true() {
        let table = generate_truth_table("p \\lor q").unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[2].matches(TRUE_CELL).count(), 3);
        assert_eq!(lines[5].matches(FALSE_CELL).count(), 3);
    }

    #[test]
    fn row_count_is_exponential() {
        for &(formula, n) in [
            ("p", 1usize),
            ("p \\land q", 2),
            ("p \\land q \\lor r", 3),
            ("a \\to b \\to c \\to d", 4),
        ]
        .iter()
        {
            let table = generate_truth_table(formula).unwrap();
            assert_eq!(table.lines().count(), 2 + (1 << n), "{}", formula);
        }
    }

    #[test]
    fn duplicate_subexpressions_collapse() {
        let table = generate_truth_table("(p \\land q) \\lor (p \\land q)").unwrap();
        let header = table.lines().next().unwrap();

        // p, q, the conjunction and the whole disjunction: four columns.
        assert_eq!(cells(header).len(), 4);
    }

    #[test]
    fn math_delimiters_are_stripped() {
        let plain = generate_truth_table("p \\to q").unwrap();
        let wrapped = generate_truth_table("  $p \\to q$  ").unwrap();
        assert_eq!(plain, wrapped);
    }

    #[test]
    fn parse_failure_yields_no_table() {
        assert!(generate_truth_table("p \\land 3").is_err());
        assert!(generate_truth_table("(p \\land q").is_err());
        assert!(generate_truth_table("").is_err());
    }

    #[test]
    fn pinned_example_row_zero() {
        // The stray ')' ends the parse before `\to \neg z`, leaving the
        // three variables p, q, r; see the parser crate's trailing-token
        // tests.
        let table = generate_truth_table("\\neg p \\land (q \\to r)) \\to \\neg z").unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2 + 8);

        let header = cells(lines[0]);
        assert_eq!(
            header,
            vec![
                "$p$",
                "$q$",
                "$r$",
                "$\\neg p$",
                "$q \\to r$",
                "$\\neg p \\land (q \\to r)$",
            ]
        );

        // Row 0 assigns p = q = r = true, so the root column is false.
        assert_eq!(
            cells(lines[2]),
            vec![TRUE_CELL, TRUE_CELL, TRUE_CELL, FALSE_CELL, TRUE_CELL, FALSE_CELL]
        );
    }

    proptest! {
        #[test]
        fn root_column_matches_direct_evaluation(input in expr(3, 4)) {
            let render_vars = var_table(3);
            let source = input.display(&render_vars).to_string();

            let mut parsed = parse_formula(&source).unwrap();
            let table = generate_truth_table(&source).unwrap();
            let lines: Vec<&str> = table.lines().collect();

            let order = assignment_order(&parsed.vars);
            let n = order.len();
            prop_assert_eq!(lines.len(), 2 + (1 << n));

            for row in 0..(1usize << n) {
                for (position, &var) in order.iter().enumerate() {
                    let bit = (row >> (n - 1 - position)) & 1;
                    parsed.vars.set_value(var, bit == 0);
                }
                let expected = cell(parsed.root.eval(&parsed.vars));

                // The root renders strictly longer than any of its
                // subexpressions, so it is always the last column.
                let line = cells(lines[2 + row]);
                prop_assert_eq!(line[line.len() - 1], expected);
            }
        }
    }
}
