//! Cardinality constraints over literals
//!
//! `at most k` uses Sinz's sequential counter, which needs `O(n * k)`
//! auxiliary variables and clauses. Small at-most-one constraints fall back to
//! the pairwise encoding. `at least k` is `at most (n - k)` over the negated
//! literals.

use super::CnfModel;

/// At-most-one constraints up to this many literals use pairwise exclusion
const PAIRWISE_LIMIT: usize = 6;

impl CnfModel {
    /// At most `k` of `literals` are true
    pub fn add_at_most(&mut self, literals: &[i32], k: usize) {
        let n = literals.len();
        if k >= n {
            return;
        }
        if k == 0 {
            for &literal in literals {
                self.add_unit(-literal);
            }
            return;
        }
        if k == 1 && n <= PAIRWISE_LIMIT {
            for i in 0..n {
                for j in i + 1..n {
                    self.add_binary(-literals[i], -literals[j]);
                }
            }
            return;
        }
        self.add_sequential_counter(literals, k);
    }

    /// At least `k` of `literals` are true
    pub fn add_at_least(&mut self, literals: &[i32], k: usize) {
        let n = literals.len();
        match k {
            0 => {}
            _ if k > n => self.add_contradiction(),
            1 => self.add_clause(literals.iter().copied()),
            _ if k == n => {
                for &literal in literals {
                    self.add_unit(literal);
                }
            }
            _ => {
                let negated: Vec<i32> = literals.iter().map(|&literal| -literal).collect();
                self.add_at_most(&negated, n - k);
            }
        }
    }

    /// Exactly `k` of `literals` are true
    pub fn add_exactly(&mut self, literals: &[i32], k: usize) {
        self.add_at_least(literals, k);
        self.add_at_most(literals, k);
    }

    /// Sequential counter for `1 <= k < n`.
    ///
    /// Register `s[i][j]` is true when at least `j + 1` of `literals[..=i]` are
    /// true; overflow of the last register is forbidden.
    fn add_sequential_counter(&mut self, literals: &[i32], k: usize) {
        let n = literals.len();
        debug_assert!(k >= 1 && k < n);

        let registers: Vec<Vec<i32>> = (0..n - 1)
            .map(|_| (0..k).map(|_| self.declare_auxiliary()).collect())
            .collect();

        self.add_binary(-literals[0], registers[0][0]);
        for j in 1..k {
            self.add_unit(-registers[0][j]);
        }

        for i in 1..n - 1 {
            let x = literals[i];
            self.add_binary(-x, registers[i][0]);
            self.add_binary(-registers[i - 1][0], registers[i][0]);
            for j in 1..k {
                self.add_clause([-x, -registers[i - 1][j - 1], registers[i][j]]);
                self.add_binary(-registers[i - 1][j], registers[i][j]);
            }
            self.add_binary(-x, -registers[i - 1][k - 1]);
        }

        self.add_binary(-literals[n - 1], -registers[n - 2][k - 1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Brute-force: for every assignment of the inputs, is there an extension
    /// over the auxiliaries that satisfies the model?
    fn admits(model: &CnfModel, inputs: &[i32], values: &[bool]) -> bool {
        let aux: Vec<i32> = ((inputs.len() as i32 + 1)..=model.variable_count() as i32).collect();
        let fixed: HashMap<i32, bool> = inputs.iter().copied().zip(values.iter().copied()).collect();
        (0..(1u64 << aux.len())).any(|mask| {
            model.is_satisfied_by(|var| match fixed.get(&var) {
                Some(&value) => value,
                None => {
                    let index = aux.iter().position(|&a| a == var).unwrap();
                    mask & (1 << index) != 0
                }
            })
        })
    }

    fn check<F, P>(n: usize, build: F, predicate: P)
    where
        F: Fn(&mut CnfModel, &[i32]),
        P: Fn(usize) -> bool,
    {
        let mut model = CnfModel::new();
        let inputs: Vec<i32> = (0..n).map(|_| model.declare_boolean()).collect();
        build(&mut model, &inputs);
        for mask in 0..(1u32 << n) {
            let values: Vec<bool> = (0..n).map(|i| mask & (1 << i) != 0).collect();
            let count = values.iter().filter(|&&v| v).count();
            assert_eq!(
                admits(&model, &inputs, &values),
                predicate(count),
                "n={} mask={:b}",
                n,
                mask
            );
        }
    }

    #[test]
    fn test_at_most_pairwise_and_sequential() {
        for n in 0..=5 {
            for k in 0..=3 {
                check(n, |model, lits| model.add_at_most(lits, k), |count| count <= k);
            }
        }
        // past the pairwise limit, at-most-one goes through the counter
        for n in [7, 8] {
            check(n, |model, lits| model.add_at_most(lits, 1), |count| count <= 1);
        }
    }

    #[test]
    fn test_at_least() {
        for n in 0..=5 {
            for k in 0..=6 {
                check(n, |model, lits| model.add_at_least(lits, k), |count| count >= k);
            }
        }
    }

    #[test]
    fn test_exactly() {
        for n in 0..=5 {
            for k in 0..=3 {
                check(n, |model, lits| model.add_exactly(lits, k), |count| count == k);
            }
        }
    }

    #[test]
    fn test_exactly_one_of_nothing_is_unsatisfiable() {
        let mut model = CnfModel::new();
        model.add_exactly(&[], 1);
        assert!(model.clause_count() > 0);
        assert!(!model.is_satisfied_by(|_| true));
        assert!(!model.is_satisfied_by(|_| false));
    }

    #[test]
    fn test_sequential_counter_allocates_registers() {
        let mut model = CnfModel::new();
        let inputs: Vec<i32> = (0..10).map(|_| model.declare_boolean()).collect();
        model.add_at_most(&inputs, 2);
        assert_eq!(model.auxiliary_count(), 9 * 2);
    }
}
