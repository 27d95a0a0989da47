//! Parser for the `cnf`, `wcnf`, `hwcnf`, and WBO/PBO input dialects.
//!
//! One logical statement per line. The problem line picks the dialect;
//! weight, show, and clause lines are validated against it and against the
//! declared variable count. Pseudo-boolean constraints are canonicalised on
//! the way in so the store only ever holds positive coefficients and `>=`
//! or `=` comparators.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::cnf::{Clause, Cnf, Comparator, ConstraintType};
use crate::config::{Config, PARSED_INPUT, RAW_INPUT, WboHeaderMode};
use crate::error::Error;
use crate::number::Number;
use crate::Result;

/// Comparator as written in the input, before canonicalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawComparator {
    Ge,
    Eq,
    Le,
}

impl Cnf {
    /// Parse a constraint file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileOpen`] when the path cannot be opened, or any
    /// parse failure raised by [`Cnf::from_reader`].
    pub fn from_file(path: impl AsRef<Path>, config: &Config) -> Result<Cnf> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::FileOpen {
            path: path.display().to_string(),
            source,
        })?;
        Cnf::from_reader(BufReader::new(file), config)
    }

    /// Parse a constraint formula from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns a typed parse failure carrying the offending line index and
    /// content; see [`Error`]. An empty clause is *not* an error: it is
    /// reported with a `WARNING` line, recorded on the store, and skipped.
    pub fn from_reader(reader: impl BufRead, config: &Config) -> Result<Cnf> {
        Parser::new(config).parse(reader)
    }
}

struct Parser<'a> {
    config: &'a Config,
    cnf: Cnf,
    problem_line_index: Option<usize>,
    wcnf: bool,
    hwcnf: bool,
}

impl<'a> Parser<'a> {
    fn new(config: &'a Config) -> Parser<'a> {
        Parser {
            config,
            cnf: Cnf::new(config),
            problem_line_index: None,
            wcnf: false,
            hwcnf: false,
        }
    }

    fn parse(mut self, reader: impl BufRead) -> Result<Cnf> {
        if self.config.verbose_cnf >= PARSED_INPUT {
            println!("c processing cnf formula...");
        }

        let mut line_index = 0;
        for line in reader.lines() {
            let line = line?;
            line_index += 1;
            if self.config.verbose_cnf >= RAW_INPUT {
                print_input_line(&line, line_index);
            }
            self.parse_line(line_index, &line)?;
        }

        if self.problem_line_index.is_none() {
            return Err(Error::MissingProblemLine { line_index });
        }

        self.finalize();
        Ok(self.cnf)
    }

    fn parse_line(&mut self, line_index: usize, line: &str) -> Result<()> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(&front) = words.first() else {
            return Ok(());
        };

        match front {
            "p" => self.problem_line(&words, line_index, line),
            "*" if words.get(1) == Some(&"#variable=") => {
                self.wbo_header(&words, line_index, line)
            }
            "w" | "vp" | "c" | "vm" => self.weight_or_show_line(&words, line_index, line),
            "s" | "INDETERMINATE" => Err(Error::UnexpectedPreprocessorOutput {
                line_index,
                line: line.to_owned(),
            }),
            _ if !front.starts_with('c') && !front.starts_with('*') && !front.starts_with("soft") => {
                self.clause_line(&words, line_index, line)
            }
            _ => Ok(()),
        }
    }

    fn problem_line(&mut self, words: &[&str], line_index: usize, line: &str) -> Result<()> {
        self.record_problem_line(line_index)?;

        if words.len() < 4 {
            return Err(Error::MalformedProblemLine {
                line_index,
                line: line.to_owned(),
            });
        }

        self.cnf.declared_var_count = self.parse_i64(words[2], line_index, line)?;
        self.cnf.declared_clause_count = self.parse_i64(words[3], line_index, line)?;

        self.hwcnf = words[1] == "hwcnf";
        self.wcnf = self.hwcnf || words[1] == "wcnf";

        if self.wcnf {
            if self.config.verbose_cnf >= PARSED_INPUT {
                println!("c solving a weighted MaxSAT instance");
            }
            if words.len() == 5 {
                self.cnf.trivial_maxsat_bound = self.parse_i64(words[4], line_index, line)?;
                if self.config.verbose_cnf >= PARSED_INPUT {
                    println!("c trivial bound: {}", self.cnf.trivial_maxsat_bound);
                }
            }
        }
        Ok(())
    }

    fn wbo_header(&mut self, words: &[&str], line_index: usize, line: &str) -> Result<()> {
        self.record_problem_line(line_index)?;

        let var_count = words.get(2).copied().unwrap_or_default();
        let clause_count = words.get(4).copied().unwrap_or_default();
        self.cnf.declared_var_count = self.parse_i64(var_count, line_index, line)?;
        self.cnf.declared_clause_count = self.parse_i64(clause_count, line_index, line)?;

        let bound_token = match self.config.wbo_header_mode {
            WboHeaderMode::Positional => words.get(12).copied(),
            WboHeaderMode::Flexible => words
                .iter()
                .rev()
                .find(|token| token.parse::<i64>().is_ok())
                .copied(),
        };
        let bound_token = bound_token.ok_or_else(|| Error::MalformedProblemLine {
            line_index,
            line: line.to_owned(),
        })?;
        self.cnf.trivial_maxsat_bound = self.parse_i64(bound_token, line_index, line)?;
        if self.config.verbose_cnf >= PARSED_INPUT {
            println!("c trivial bound: {}", self.cnf.trivial_maxsat_bound);
        }
        Ok(())
    }

    fn record_problem_line(&mut self, line_index: usize) -> Result<()> {
        if let Some(first) = self.problem_line_index {
            return Err(Error::DuplicateProblemLine {
                first,
                second: line_index,
            });
        }
        self.problem_line_index = Some(line_index);
        Ok(())
    }

    fn weight_or_show_line(&mut self, words: &[&str], line_index: usize, line: &str) -> Result<()> {
        let front = words[0];
        let positional_weight = words.len() > 4 && words[1] == "p" && words[2] == "weight";
        let positional_show = words.len() > 3 && words[1] == "p" && words[2] == "show";

        if self.config.weighted_counting && (front == "w" || positional_weight) {
            if self.problem_line_index.is_none() {
                return Err(Error::WeightWithoutProblem {
                    line_index,
                    line: line.to_owned(),
                });
            }

            let (literal_index, weight_index) = if front == "w" { (1, 2) } else { (3, 4) };
            let literal_token = words.get(literal_index).copied().unwrap_or_default();
            let literal = self.parse_i64(literal_token, line_index, line)?;
            if literal.abs() > self.cnf.declared_var_count {
                return Err(self.literal_out_of_range(literal, line_index, line));
            }

            let weight_token = words.get(weight_index).copied().unwrap_or_default();
            let weight = self.parse_number(weight_token, line_index, line)?;
            if weight < Number::zero(self.config) {
                return Err(Error::NegativeWeight {
                    line_index,
                    line: line.to_owned(),
                });
            }
            self.cnf.literal_weights.insert(literal, weight);
        } else if (self.config.projected_counting || self.config.maxsat_solving)
            && (front == "vp" || front == "vm" || positional_show)
        {
            if self.problem_line_index.is_none() {
                return Err(Error::ShowWithoutProblem {
                    line_index,
                    line: line.to_owned(),
                });
            }

            if front == "vm" && self.config.maxsat_solving {
                self.cnf.min_maxsat = true;
            }

            let start = if front == "vp" || front == "vm" { 1 } else { 3 };
            for i in start..words.len() {
                let var = self.parse_i64(words[i], line_index, line)?;
                if var == 0 {
                    if i != words.len() - 1 {
                        return Err(Error::PrematureZero {
                            line_index,
                            line: line.to_owned(),
                        });
                    }
                } else if var < 0 || var > self.cnf.declared_var_count {
                    return Err(self.literal_out_of_range(var, line_index, line));
                } else {
                    self.cnf.additive_vars.insert(var);
                }
            }
        }
        Ok(())
    }

    fn clause_line(&mut self, words: &[&str], line_index: usize, line: &str) -> Result<()> {
        if self.problem_line_index.is_none() {
            return Err(Error::ClauseWithoutProblem {
                line_index,
                line: line.to_owned(),
            });
        }

        if self.hwcnf {
            // Every hwcnf clause carries a bracketed weight up front.
            let weight = self.bracket_weight(words[0], line_index, line)?;
            let body = &words[1..];
            if body.len() > 1 && body[1].starts_with('x') {
                self.pb_clause(body, weight, line_index, line)
            } else {
                self.literal_clause(body, weight, false, line_index, line)
            }
        } else if words[0].starts_with('[') {
            // Soft pseudo-boolean constraint.
            let weight = self.bracket_weight(words[0], line_index, line)?;
            self.pb_clause(&words[1..], weight, line_index, line)
        } else if words.len() > 1 && words[1].starts_with('x') {
            // Hard pseudo-boolean constraint: weight is the total soft
            // weight plus one.
            let weight = (self.cnf.trivial_maxsat_bound + 1) as f64;
            self.pb_clause(words, weight, line_index, line)
        } else {
            self.literal_clause(words, 1.0, self.wcnf, line_index, line)
        }
    }

    /// Parse a CNF or XOR clause body: literals terminated by `0`, with an
    /// optional leading weight under wcnf and a bare `x` marking XOR.
    fn literal_clause(
        &mut self,
        words: &[&str],
        initial_weight: f64,
        consume_wcnf_weight: bool,
        line_index: usize,
        line: &str,
    ) -> Result<()> {
        let mut clause = Clause::new();
        let mut constraint_type = ConstraintType::Cnf;
        let mut weight = initial_weight;

        for (i, &token) in words.iter().enumerate() {
            if token == "x" {
                constraint_type = ConstraintType::Xor;
                continue;
            }

            let weight_position = match constraint_type {
                ConstraintType::Cnf => i == 0,
                ConstraintType::Xor => i == 1,
                ConstraintType::Pb => false,
            };
            if consume_wcnf_weight && weight_position {
                weight = self.parse_f64(token, line_index, line)?;
                continue;
            }

            let num = self.parse_i64(token, line_index, line)?;
            if num > self.cnf.declared_var_count || num < -self.cnf.declared_var_count {
                return Err(self.literal_out_of_range(num, line_index, line));
            }

            if num == 0 {
                if i != words.len() - 1 {
                    return Err(Error::PrematureZero {
                        line_index,
                        line: line.to_owned(),
                    });
                }
                if clause.is_empty() {
                    println!("WARNING: empty clause | line {line_index}: {line}");
                    self.cnf.empty_clauses.push((line_index, line.to_owned()));
                    return Ok(());
                }
                self.cnf.add_clause(
                    clause,
                    constraint_type,
                    weight,
                    Comparator::Unused,
                    BTreeMap::new(),
                    0,
                );
                self.cnf.processed_clause_count += 1;
                return Ok(());
            }

            if i == words.len() - 1 {
                return Err(Error::MissingZero {
                    line_index,
                    line: line.to_owned(),
                });
            }
            clause.insert(num);
        }

        Err(Error::MissingZero {
            line_index,
            line: line.to_owned(),
        })
    }

    /// Parse a pseudo-boolean body: `coef xVar` pairs, a comparator, the
    /// right-hand side, and a tolerated terminator.
    fn pb_clause(
        &mut self,
        body: &[&str],
        weight: f64,
        line_index: usize,
        line: &str,
    ) -> Result<()> {
        if body.len() < 5 || (body.len() - 3) % 2 != 0 {
            return Err(Error::MalformedPbConstraint {
                line_index,
                line: line.to_owned(),
            });
        }

        let mut clause = Clause::new();
        let mut coefs = BTreeMap::new();
        let pair_count = (body.len() - 3) / 2;
        for i in 0..pair_count {
            let coef = self.parse_i64(body[2 * i], line_index, line)?;
            let var_token = body[2 * i + 1];
            let var_digits = var_token.strip_prefix('x').ok_or_else(|| Error::InvalidToken {
                token: var_token.to_owned(),
                line_index,
                line: line.to_owned(),
            })?;
            let var = self.parse_i64(var_digits, line_index, line)?;
            if var < 1 || var > self.cnf.declared_var_count {
                return Err(self.literal_out_of_range(var, line_index, line));
            }
            clause.insert(var);
            coefs.insert(var, coef);
        }

        let comparator_token = body[body.len() - 3];
        let raw_comparator = match comparator_token {
            ">=" => RawComparator::Ge,
            "=" => RawComparator::Eq,
            "<=" => RawComparator::Le,
            _ => {
                return Err(Error::InvalidToken {
                    token: comparator_token.to_owned(),
                    line_index,
                    line: line.to_owned(),
                })
            }
        };
        let rhs = self.parse_i64(body[body.len() - 2], line_index, line)?;

        let (clause, coefs, comparator, rhs) = canonicalize_pb(clause, coefs, raw_comparator, rhs);
        self.cnf
            .add_clause(clause, ConstraintType::Pb, weight, comparator, coefs, rhs);
        self.cnf.processed_clause_count += 1;
        Ok(())
    }

    fn finalize(&mut self) {
        self.cnf.set_apparent_vars();

        // Without projection or maxsat, every declared variable is summed.
        if !self.config.projected_counting && !self.config.maxsat_solving {
            for var in 1..=self.cnf.declared_var_count {
                self.cnf.additive_vars.insert(var);
            }
        }

        let one = Number::one(self.config);
        if self.config.weighted_counting {
            for var in 1..=self.cnf.declared_var_count {
                let positive = self.cnf.literal_weights.contains_key(&var);
                let negative = self.cnf.literal_weights.contains_key(&-var);
                match (positive, negative) {
                    (true, true) => {}
                    (false, false) => {
                        self.cnf.literal_weights.insert(var, one.clone());
                        self.cnf.literal_weights.insert(-var, one.clone());
                    }
                    (false, true) => {
                        let given = self.cnf.literal_weights[&-var].clone();
                        if self.config.log_counting {
                            assert!(given <= one, "literal weight above 1 in log mode");
                        }
                        self.cnf.literal_weights.insert(var, one.clone() - given);
                    }
                    (true, false) => {
                        let given = self.cnf.literal_weights[&var].clone();
                        if self.config.log_counting {
                            assert!(given <= one, "literal weight above 1 in log mode");
                        }
                        self.cnf.literal_weights.insert(-var, one.clone() - given);
                    }
                }
            }
        } else {
            for var in 1..=self.cnf.declared_var_count {
                self.cnf.literal_weights.insert(var, one.clone());
                self.cnf.literal_weights.insert(-var, one.clone());
            }
        }

        tracing::debug!(
            declared_vars = self.cnf.declared_var_count,
            apparent_vars = self.cnf.apparent_vars.len(),
            declared_clauses = self.cnf.declared_clause_count,
            processed_clauses = self.cnf.processed_clause_count,
            "parsed formula"
        );

        if self.config.verbose_cnf >= PARSED_INPUT {
            println!("c declared var count: {}", self.cnf.declared_var_count);
            println!("c apparent var count: {}", self.cnf.apparent_vars.len());
            println!("c declared clause count: {}", self.cnf.declared_clause_count);
            println!("c processed clause count: {}", self.cnf.processed_clause_count);

            if self.config.projected_counting {
                print!("c additive vars: {{");
                for var in &self.cnf.additive_vars {
                    print!(" {var}");
                }
                println!(" }}");
            }
            if self.config.weighted_counting {
                self.cnf.print_literal_weights();
            }
            self.cnf.print_clauses();
        }
    }

    fn literal_out_of_range(&self, literal: i64, line_index: usize, line: &str) -> Error {
        Error::LiteralOutOfRange {
            literal,
            declared_var_count: self.cnf.declared_var_count,
            line_index,
            line: line.to_owned(),
        }
    }

    fn bracket_weight(&self, token: &str, line_index: usize, line: &str) -> Result<f64> {
        let inner = token
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .ok_or_else(|| Error::InvalidToken {
                token: token.to_owned(),
                line_index,
                line: line.to_owned(),
            })?;
        self.parse_f64(inner, line_index, line)
    }

    fn parse_i64(&self, token: &str, line_index: usize, line: &str) -> Result<i64> {
        token.parse().map_err(|_| Error::InvalidToken {
            token: token.to_owned(),
            line_index,
            line: line.to_owned(),
        })
    }

    fn parse_f64(&self, token: &str, line_index: usize, line: &str) -> Result<f64> {
        token.parse().map_err(|_| Error::InvalidToken {
            token: token.to_owned(),
            line_index,
            line: line.to_owned(),
        })
    }

    fn parse_number(&self, token: &str, line_index: usize, line: &str) -> Result<Number> {
        Number::parse(token, self.config).ok_or_else(|| Error::InvalidToken {
            token: token.to_owned(),
            line_index,
            line: line.to_owned(),
        })
    }
}

/// Rewrite a pseudo-boolean constraint so every coefficient is positive and
/// the comparator is `>=` or `=`.
///
/// `<=` flips to `>=` by negating coefficients and the right-hand side. A
/// remaining negative coefficient `-a * v` becomes `a * (1 - v)`: the
/// variable is complemented in the clause's variable set and the constant
/// moves into the right-hand side.
fn canonicalize_pb(
    mut clause: Clause,
    mut coefs: BTreeMap<i64, i64>,
    raw_comparator: RawComparator,
    mut rhs: i64,
) -> (Clause, BTreeMap<i64, i64>, Comparator, i64) {
    let comparator = match raw_comparator {
        RawComparator::Le => {
            rhs = -rhs;
            for coef in coefs.values_mut() {
                *coef = -*coef;
            }
            Comparator::Ge
        }
        RawComparator::Ge => Comparator::Ge,
        RawComparator::Eq => Comparator::Eq,
    };

    let vars: Vec<i64> = clause.iter().collect();
    for var in vars {
        let coef = coefs[&var];
        if coef < 0 {
            coefs.remove(&var);
            coefs.insert(-var, -coef);
            rhs -= coef;
            clause.remove(var);
            clause.insert(-var);
        }
    }

    (clause, coefs, comparator, rhs)
}

fn print_input_line(line: &str, line_index: usize) {
    if line.is_empty() {
        println!("c line {line_index:>5}:");
    } else {
        println!("c line {line_index:>5}: {line}");
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cnf::{Cnf, Comparator, ConstraintType};
    use crate::config::{Config, WboHeaderMode};
    use crate::number::Number;

    fn parse(input: &str, config: &Config) -> Cnf {
        Cnf::from_reader(input.as_bytes(), config).unwrap()
    }

    fn parse_err(input: &str, config: &Config) -> Error {
        Cnf::from_reader(input.as_bytes(), config).unwrap_err()
    }

    #[test]
    fn classic_cnf() {
        let config = Config::default();
        let cnf = parse("p cnf 3 2\n1 -2 0\n2 3 0\n", &config);

        assert_eq!(cnf.declared_var_count(), 3);
        assert_eq!(cnf.declared_clause_count(), 2);
        assert_eq!(cnf.processed_clause_count(), 2);
        assert_eq!(cnf.clauses().len(), 2);
        assert_eq!(cnf.clauses()[0].iter().collect::<Vec<_>>(), vec![1, -2]);
        assert_eq!(cnf.clauses()[1].iter().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(
            cnf.apparent_vars().iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            cnf.additive_vars().iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        for literal in [1, -1, 2, -2, 3, -3] {
            assert_eq!(*cnf.literal_weight(literal), Number::one(&config));
        }
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let config = Config::default();
        let cnf = parse(
            "c a comment\n\np cnf 2 1\nc another comment\ncfoo bar\nsoft stuff\n1 2 0\n",
            &config,
        );
        assert_eq!(cnf.clauses().len(), 1);
    }

    #[test]
    fn partial_weights_are_completed() {
        let config = Config::builder().weighted_counting(true).build();
        let cnf = parse("p cnf 2 1\nw 1 0.25\n1 -2 0\n", &config);

        assert_eq!(*cnf.literal_weight(1), Number::Float(0.25));
        assert_eq!(*cnf.literal_weight(-1), Number::Float(0.75));
        assert_eq!(*cnf.literal_weight(2), Number::Float(1.0));
        assert_eq!(*cnf.literal_weight(-2), Number::Float(1.0));
    }

    #[test]
    fn positional_weight_lines() {
        let config = Config::builder().weighted_counting(true).build();
        let cnf = parse("p cnf 1 1\nc p weight -1 0.2 0\n1 0\n", &config);

        assert_eq!(*cnf.literal_weight(-1), Number::Float(0.2));
        assert_eq!(*cnf.literal_weight(1), Number::Float(0.8));
    }

    #[test]
    fn weight_lines_ignored_when_unweighted() {
        let config = Config::default();
        let cnf = parse("p cnf 1 1\nw 1 0.25\n1 0\n", &config);
        assert_eq!(*cnf.literal_weight(1), Number::Float(1.0));
    }

    #[test]
    fn empty_clause_warns_and_continues() {
        let config = Config::default();
        let cnf = parse("p cnf 2 1\n0\n", &config);

        assert!(cnf.clauses().is_empty());
        assert_eq!(cnf.empty_clauses(), &[(2, "0".to_owned())]);
    }

    #[test]
    fn pb_canonicalisation_eliminates_negative_coefficients() {
        let config = Config::default();
        let cnf = parse("p cnf 2 1\n-3 x1 2 x2 <= 1 ;\n", &config);

        assert_eq!(cnf.clause_type(0), ConstraintType::Pb);
        assert_eq!(cnf.comparator(0), Comparator::Ge);
        // -3 x1 + 2 x2 <= 1  ~>  3 x1 - 2 x2 >= -1  ~>  3 x1 + 2 ~x2 >= 1.
        assert_eq!(cnf.coefs(0).get(&1), Some(&3));
        assert_eq!(cnf.coefs(0).get(&-2), Some(&2));
        assert_eq!(cnf.coefs(0).get(&2), None);
        assert_eq!(cnf.rhs(0), 1);
        assert_eq!(cnf.clauses()[0].iter().collect::<Vec<_>>(), vec![1, -2]);
    }

    #[test]
    fn soft_and_hard_pb_weights() {
        let config = Config::default();
        let cnf = parse(
            "* #variable= 2 #constraint= 2 #soft= 1 mincost= 1 maxcost= 3 sumcost= 9\n\
             [4] 1 x1 2 x2 >= 1 ;\n\
             1 x1 1 x2 >= 2 ;\n",
            &config,
        );

        assert_eq!(cnf.trivial_maxsat_bound(), 9);
        assert_eq!(cnf.clause_weight(0), 4.0);
        assert_eq!(cnf.clause_weight(1), 10.0);
        assert_eq!(cnf.comparator(1), Comparator::Ge);
    }

    #[test]
    fn wbo_header_flexible_mode() {
        let config = Config::builder()
            .wbo_header_mode(WboHeaderMode::Flexible)
            .build();
        let cnf = parse(
            "* #variable= 2 #constraint= 1 top= 7\n1 x1 1 x2 >= 1 ;\n",
            &config,
        );
        assert_eq!(cnf.trivial_maxsat_bound(), 7);
    }

    #[test]
    fn wcnf_clause_weights() {
        let config = Config::default();
        let cnf = parse("p wcnf 3 2 10\n5 1 -2 0\nx 2 1 3 0\n", &config);

        assert_eq!(cnf.trivial_maxsat_bound(), 10);
        assert_eq!(cnf.clause_weight(0), 5.0);
        assert_eq!(cnf.clause_type(0), ConstraintType::Cnf);
        assert_eq!(cnf.clauses()[0].iter().collect::<Vec<_>>(), vec![1, -2]);

        assert_eq!(cnf.clause_weight(1), 2.0);
        assert_eq!(cnf.clause_type(1), ConstraintType::Xor);
        assert_eq!(cnf.clauses()[1].iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn xor_weight_after_marker() {
        let config = Config::default();
        let cnf = parse("p wcnf 2 1\nx 3 1 -2 0\n", &config);

        assert_eq!(cnf.clause_type(0), ConstraintType::Xor);
        assert_eq!(cnf.clause_weight(0), 3.0);
        assert_eq!(cnf.clauses()[0].iter().collect::<Vec<_>>(), vec![1, -2]);
    }

    #[test]
    fn hwcnf_clauses() {
        let config = Config::default();
        let cnf = parse(
            "p hwcnf 3 3 12\n[2] 1 -2 0\n[3] x 1 3 0\n[5] 2 x1 1 x3 >= 1 ;\n",
            &config,
        );

        assert_eq!(cnf.clause_weight(0), 2.0);
        assert_eq!(cnf.clause_type(0), ConstraintType::Cnf);
        assert_eq!(cnf.clause_weight(1), 3.0);
        assert_eq!(cnf.clause_type(1), ConstraintType::Xor);
        assert_eq!(cnf.clause_weight(2), 5.0);
        assert_eq!(cnf.clause_type(2), ConstraintType::Pb);
        assert_eq!(cnf.coefs(2).get(&1), Some(&2));
        assert_eq!(cnf.coefs(2).get(&3), Some(&1));
    }

    #[test]
    fn show_lines_collect_additive_vars() {
        let config = Config::builder().projected_counting(true).build();
        let cnf = parse("p cnf 3 1\nvp 1 3 0\n1 2 3 0\n", &config);

        assert_eq!(
            cnf.additive_vars().iter().copied().collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(cnf.disjunctive_vars().into_iter().collect::<Vec<_>>(), vec![2]);
        assert!(!cnf.min_maxsat());
    }

    #[test]
    fn vm_line_sets_min_maxsat() {
        let config = Config::builder().maxsat_solving(true).build();
        let cnf = parse("p wcnf 2 1\nvm 2 0\n3 1 2 0\n", &config);

        assert!(cnf.min_maxsat());
        assert_eq!(
            cnf.additive_vars().iter().copied().collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn positional_show_line() {
        let config = Config::builder().projected_counting(true).build();
        let cnf = parse("p cnf 3 1\nc p show 2 3 0\n1 2 3 0\n", &config);
        assert_eq!(
            cnf.additive_vars().iter().copied().collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn duplicate_problem_line_is_rejected() {
        let config = Config::default();
        let err = parse_err("p cnf 1 1\np cnf 1 1\n1 0\n", &config);
        assert!(matches!(
            err,
            Error::DuplicateProblemLine { first: 1, second: 2 }
        ));
    }

    #[test]
    fn missing_problem_line_is_rejected() {
        let config = Config::default();
        assert!(matches!(
            parse_err("1 2 0\n", &config),
            Error::ClauseWithoutProblem { line_index: 1, .. }
        ));
        assert!(matches!(
            parse_err("c only comments\n", &config),
            Error::MissingProblemLine { line_index: 1 }
        ));
    }

    #[test]
    fn malformed_problem_line_is_rejected() {
        let config = Config::default();
        assert!(matches!(
            parse_err("p cnf 3\n", &config),
            Error::MalformedProblemLine { line_index: 1, .. }
        ));
    }

    #[test]
    fn zero_terminator_violations() {
        let config = Config::default();
        assert!(matches!(
            parse_err("p cnf 3 2\n1 0 2 0\n", &config),
            Error::PrematureZero { line_index: 2, .. }
        ));
        assert!(matches!(
            parse_err("p cnf 3 1\n1 2\n", &config),
            Error::MissingZero { line_index: 2, .. }
        ));
    }

    #[test]
    fn out_of_range_literals_are_rejected() {
        let config = Config::default();
        assert!(matches!(
            parse_err("p cnf 2 1\n1 -3 0\n", &config),
            Error::LiteralOutOfRange { literal: -3, .. }
        ));

        let weighted = Config::builder().weighted_counting(true).build();
        assert!(matches!(
            parse_err("p cnf 2 1\nw 5 0.5\n1 0\n", &weighted),
            Error::LiteralOutOfRange { literal: 5, .. }
        ));
    }

    #[test]
    fn negative_weights_are_rejected() {
        let config = Config::builder().weighted_counting(true).build();
        assert!(matches!(
            parse_err("p cnf 1 1\nw 1 -0.5\n1 0\n", &config),
            Error::NegativeWeight { line_index: 2, .. }
        ));
    }

    #[test]
    fn preprocessor_output_is_rejected() {
        let config = Config::default();
        assert!(matches!(
            parse_err("p cnf 1 1\ns SATISFIABLE\n", &config),
            Error::UnexpectedPreprocessorOutput { line_index: 2, .. }
        ));
        assert!(matches!(
            parse_err("INDETERMINATE\n", &config),
            Error::UnexpectedPreprocessorOutput { line_index: 1, .. }
        ));
    }

    #[test]
    fn ordering_violations_before_problem_line() {
        let weighted = Config::builder().weighted_counting(true).build();
        assert!(matches!(
            parse_err("w 1 0.5\n", &weighted),
            Error::WeightWithoutProblem { line_index: 1, .. }
        ));

        let projected = Config::builder().projected_counting(true).build();
        assert!(matches!(
            parse_err("vp 1 0\n", &projected),
            Error::ShowWithoutProblem { line_index: 1, .. }
        ));
    }

    #[test]
    fn var_to_clauses_matches_apparent_vars() {
        let config = Config::default();
        let cnf = parse("p cnf 4 2\n1 -2 0\n2 3 0\n", &config);

        assert_eq!(
            cnf.var_to_clauses().keys().copied().collect::<Vec<_>>(),
            cnf.apparent_vars().iter().copied().collect::<Vec<_>>()
        );
        assert_eq!(
            cnf.var_to_clauses()[&2].iter().copied().collect::<Vec<_>>(),
            vec![0, 1]
        );
        // Variable 4 is declared but not apparent.
        assert!(!cnf.apparent_vars().contains(&4));
        assert!(cnf.literal_weights.contains_key(&4));
        assert!(cnf.literal_weights.contains_key(&-4));
    }
}
