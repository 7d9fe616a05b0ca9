//! Truth tables over every assignment of an expression's inputs

use super::display::{bar, value_text};
use super::error::{EvaluationError, Warning};
use super::eval::{overlay, Assignment};
use super::Expression;
use crate::MAX_TRUTH_TABLE_INPUTS;
use log::warn;
use std::fmt;
use std::sync::Arc;

/// One input column of a [`TruthTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputColumn {
    name: Arc<str>,
    heading: Arc<str>,
    inverted: bool,
}

impl InputColumn {
    /// The input name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column heading: the name, barred when the input is inverted
    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }
}

/// One row of a [`TruthTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthRow {
    index: usize,
    cells: Vec<(Arc<str>, Option<bool>)>,
}

impl TruthRow {
    /// Position of the row; its bits are the raw input values, first input most significant
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value under a column heading, `None` if there is no such column
    pub fn get(&self, column: &str) -> Option<Option<bool>> {
        self.cells
            .iter()
            .find(|(heading, _)| heading.as_ref() == column)
            .map(|(_, value)| *value)
    }

    /// Cells in column order: inputs first, then outputs
    pub fn cells(&self) -> &[(Arc<str>, Option<bool>)] {
        &self.cells
    }
}

/// Every assignment of an expression's inputs with the value of each output
///
/// Input cells hold the effective value (raw value XOR inversion); output cells
/// may be unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    inputs: Vec<InputColumn>,
    outputs: Vec<Arc<str>>,
    rows: Vec<TruthRow>,
    warnings: Vec<Warning>,
}

impl TruthTable {
    pub fn inputs(&self) -> &[InputColumn] {
        &self.inputs
    }

    /// Output column labels
    pub fn outputs(&self) -> &[Arc<str>] {
        &self.outputs
    }

    pub fn rows(&self) -> &[TruthRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Unresolved cells met while building the table
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Whether every output cell holds a boolean
    pub fn is_fully_resolved(&self) -> bool {
        self.warnings.is_empty()
    }

    /// All values of one column, top to bottom
    pub fn column(&self, heading: &str) -> Option<Vec<Option<bool>>> {
        self.rows.iter().map(|row| row.get(heading)).collect()
    }
}

fn cell_text(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "1",
        Some(false) => "0",
        None => "-",
    }
}

/// Plain-text table with `1`, `0` and `-` for unresolved cells
impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headings: Vec<&str> = self
            .inputs
            .iter()
            .map(|column| column.heading())
            .chain(["→"])
            .chain(self.outputs.iter().map(|label| label.as_ref()))
            .collect();
        writeln!(f, "{}", headings.join(" | "))?;

        let widths: Vec<usize> = headings.iter().map(|heading| heading.chars().count()).collect();
        let split = self.inputs.len();
        for row in &self.rows {
            let mut line: Vec<&str> = Vec::with_capacity(headings.len());
            for (position, (_, value)) in row.cells.iter().enumerate() {
                if position == split {
                    line.push("→");
                }
                line.push(cell_text(*value));
            }
            if row.cells.len() == split {
                line.push("→");
            }
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(text, width)| format!("{:<width$}", text, width = width))
                .collect();
            writeln!(f, "{}", padded.join(" | "))?;
        }
        Ok(())
    }
}

/// Raw values for row `index`, the first name being the most significant bit
fn assignment_for(names: &[Arc<str>], index: usize) -> Assignment {
    let count = names.len();
    names
        .iter()
        .enumerate()
        .map(|(bit, name)| (Arc::clone(name), (index >> (count - 1 - bit)) & 1 == 1))
        .collect()
}

fn check_input_count(count: usize) -> Result<(), EvaluationError> {
    if count > MAX_TRUTH_TABLE_INPUTS {
        return Err(EvaluationError::TooManyInputs {
            count,
            limit: MAX_TRUTH_TABLE_INPUTS,
        });
    }
    Ok(())
}

/// Output columns as `(label, values)` pairs, one value per row
pub type TruthVector = Vec<(Arc<str>, Vec<Option<bool>>)>;

impl Expression {
    /// Input columns in alphabetical order
    pub fn input_columns(&self) -> Vec<InputColumn> {
        self.inputs
            .iter()
            .map(|(name, binding)| InputColumn {
                name: Arc::clone(name),
                heading: if binding.is_inverted() {
                    bar(name).into()
                } else {
                    Arc::clone(name)
                },
                inverted: binding.is_inverted(),
            })
            .collect()
    }

    /// Evaluate every output over all `2^n` raw input assignments
    ///
    /// An expression without outputs is first labeled with its rendered text,
    /// and labels of nested expressions are collected. Each column evaluates the
    /// snapshot stored under its label against the top-level bindings. Row `k`
    /// assigns the bits of `k` to the inputs in alphabetical order, first input
    /// most significant.
    ///
    /// # Errors
    ///
    /// [`EvaluationError::TooManyInputs`] beyond [`MAX_TRUTH_TABLE_INPUTS`], or any
    /// error raised while evaluating a snapshot.
    ///
    /// # Examples
    ///
    /// ```
    /// use logic_algebra::and;
    ///
    /// # fn main() -> Result<(), logic_algebra::EvaluationError> {
    /// let mut expr = and(["a", "b"]);
    /// let columns = expr.truth_vector()?;
    /// assert_eq!(columns[0].0.as_ref(), "a ∧ b");
    /// assert_eq!(columns[0].1, vec![Some(false), Some(false), Some(false), Some(true)]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn truth_vector(&mut self) -> Result<TruthVector, EvaluationError> {
        self.truth_columns().map(|(columns, _)| columns)
    }

    fn truth_columns(&mut self) -> Result<(TruthVector, Vec<Warning>), EvaluationError> {
        let names: Vec<Arc<str>> = self.inputs.keys().cloned().collect();
        check_input_count(names.len())?;

        if self.outputs.is_empty() {
            self.add_label(None, false);
        }
        self.collect_labels();

        let rows = 1usize << names.len();
        let mut columns = Vec::with_capacity(self.outputs.len());
        let mut warnings = Vec::new();
        for output in &self.outputs {
            let mut values = Vec::with_capacity(rows);
            for row in 0..rows {
                let scope = self.scope(&assignment_for(&names, row));
                let value = output
                    .expression
                    .fold(&overlay(&output.expression.inputs, &scope), 0)?;
                if value.is_none() {
                    warnings.push(Warning::UnresolvedResult {
                        output: Arc::clone(&output.label),
                        row,
                    });
                }
                values.push(value);
            }
            columns.push((Arc::clone(&output.label), values));
        }

        if !warnings.is_empty() {
            warn!(
                "{} truth table cell(s) could not be resolved: NAND, NOR and XNOR chains are not fully supported",
                warnings.len()
            );
        }
        Ok((columns, warnings))
    }

    /// Build the full truth table
    ///
    /// Labels the expression like [`Expression::truth_vector`] does.
    ///
    /// # Examples
    ///
    /// ```
    /// use logic_algebra::Expression;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut expr = Expression::parse("a*b+c")?;
    /// let table = expr.truth_table()?;
    ///
    /// assert_eq!(table.len(), 8);
    /// assert_eq!(table.rows()[1].get("(a ∧ b) ∨ c"), Some(Some(true)));
    /// assert_eq!(table.rows()[4].get("(a ∧ b) ∨ c"), Some(Some(false)));
    /// assert_eq!(table.rows()[4].get("a"), Some(Some(true)));
    /// # Ok(())
    /// # }
    /// ```
    pub fn truth_table(&mut self) -> Result<TruthTable, EvaluationError> {
        let (columns, warnings) = self.truth_columns()?;
        let inputs = self.input_columns();
        let names: Vec<Arc<str>> = inputs.iter().map(|column| Arc::clone(&column.name)).collect();

        let rows = (0..1usize << names.len())
            .map(|index| {
                let raw = assignment_for(&names, index);
                let mut cells: Vec<(Arc<str>, Option<bool>)> = inputs
                    .iter()
                    .map(|column| {
                        let value = raw.get(&column.name).map(|value| value != &column.inverted);
                        (Arc::clone(&column.heading), value)
                    })
                    .collect();
                cells.extend(
                    columns
                        .iter()
                        .map(|(label, values)| (Arc::clone(label), values[index])),
                );
                TruthRow { index, cells }
            })
            .collect();

        Ok(TruthTable {
            inputs,
            outputs: columns.into_iter().map(|(label, _)| label).collect(),
            rows,
            warnings,
        })
    }

    /// Describe every completion of a partial assignment
    ///
    /// Inputs missing from `assignment` are enumerated (first missing name most
    /// significant) and each combination is listed with the expression rendered
    /// by value and its result.
    ///
    /// # Examples
    ///
    /// ```
    /// use logic_algebra::{and, Assignment};
    /// use std::sync::Arc;
    ///
    /// # fn main() -> Result<(), logic_algebra::EvaluationError> {
    /// let expr = and(["a", "b"]);
    /// let mut assignment = Assignment::new();
    /// assignment.insert(Arc::from("a"), true);
    ///
    /// let report = expr.print(&assignment)?;
    /// assert_eq!(
    ///     report,
    ///     "Missing 1 input (b). Resolving 2 possible states:\n\
    ///      \ttrue  ∧ false = false\n\
    ///      \ttrue  ∧ true  = true \n"
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn print(&self, assignment: &Assignment) -> Result<String, EvaluationError> {
        let missing: Vec<Arc<str>> = self
            .inputs
            .keys()
            .filter(|name| !assignment.contains_key(*name))
            .cloned()
            .collect();
        check_input_count(missing.len())?;

        let states = 1usize << missing.len();
        let mut report = String::new();
        if !missing.is_empty() {
            let plural = if missing.len() > 1 { "s" } else { "" };
            let names: Vec<&str> = missing.iter().map(|name| name.as_ref()).collect();
            report.push_str(&format!(
                "Missing {} input{} ({}). ",
                missing.len(),
                plural,
                names.join(", ")
            ));
        }
        let plural = if states > 1 { "s" } else { "" };
        report.push_str(&format!("Resolving {} possible state{}:\n", states, plural));

        for index in 0..states {
            let mut complete = assignment.clone();
            complete.extend(assignment_for(&missing, index));
            let value = self.value_of(&complete)?;
            let line = format!(
                "\t{} = {}\n",
                self.render(Some(&complete), false, false),
                value_text(value)
            );
            report.push_str(&line.replace("true", "true "));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{and, nand, or};

    #[test]
    fn test_assignment_bits() {
        let names: Vec<Arc<str>> = vec!["a".into(), "b".into(), "c".into()];
        let row = assignment_for(&names, 4);
        assert_eq!(row.get("a"), Some(&true));
        assert_eq!(row.get("b"), Some(&false));
        assert_eq!(row.get("c"), Some(&false));
    }

    #[test]
    fn test_auto_label() {
        let mut expr = or(["a", "b"]);
        let columns = expr.truth_vector().unwrap();
        assert_eq!(expr.outputs().len(), 1);
        assert_eq!(columns[0].0.as_ref(), "a ∨ b");
        assert_eq!(
            columns[0].1,
            vec![Some(false), Some(true), Some(true), Some(true)]
        );
    }

    #[test]
    fn test_columns_follow_their_snapshots() {
        let mut expr = and(["a", "b"]).label(Some("p"), false).or(["c"]).label(Some("q"), false);
        let table = expr.truth_table().unwrap();
        // a=1, b=0, c=1
        let row = &table.rows()[5];
        assert_eq!(row.get("p"), Some(Some(false)));
        assert_eq!(row.get("q"), Some(Some(true)));
    }

    #[test]
    fn test_inverted_input_columns() {
        let mut expr = and(["a", "b"]).invert(["a"]);
        let table = expr.truth_table().unwrap();
        assert_eq!(table.inputs()[0].heading(), "a\u{0304}");
        // raw a=0 shows as ā=1 and satisfies the expression with b=1
        let row = &table.rows()[1];
        assert_eq!(row.get("a\u{0304}"), Some(Some(true)));
        assert_eq!(row.get("a\u{0304} ∧ b"), Some(Some(true)));
    }

    #[test]
    fn test_unresolved_cells_warn() {
        let mut expr = and(["a"]).nand(["b", "c"]).unwrap();
        let table = expr.truth_table().unwrap();
        assert!(!table.is_fully_resolved());
        assert_eq!(table.warnings().len(), 8);
        assert!(table.rows().iter().all(|row| row.get("(a) ⊼ b ⊼ c") == Some(None)));
    }

    #[test]
    fn test_too_many_inputs() {
        let names: Vec<String> = (0..=MAX_TRUTH_TABLE_INPUTS).map(|i| format!("x{i}")).collect();
        let mut expr = and(names.iter().map(String::as_str));
        assert_eq!(
            expr.truth_table().unwrap_err(),
            EvaluationError::TooManyInputs {
                count: MAX_TRUTH_TABLE_INPUTS + 1,
                limit: MAX_TRUTH_TABLE_INPUTS
            }
        );
        assert!(expr.outputs().is_empty());
    }

    #[test]
    fn test_print_fully_assigned() {
        let expr = nand(["a", "b"]).unwrap();
        let mut assignment = Assignment::new();
        assignment.insert("a".into(), true);
        assignment.insert("b".into(), true);
        assert_eq!(
            expr.print(&assignment).unwrap(),
            "Resolving 1 possible state:\n\ttrue  ⊼ true  = false\n"
        );
    }

    #[test]
    fn test_display_table() {
        let mut expr = and(["a", "b"]).label(Some("q"), false);
        let text = expr.truth_table().unwrap().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "a | b | → | q");
        assert_eq!(lines[4], "1 | 1 | → | 1");
    }
}
