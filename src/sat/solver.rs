//! SAT solver integration using CaDiCaL

use super::model::Clause;
use anyhow::Result;
use cadical::{Solver, Timeout};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default wall-clock budget for one solve
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
    timeout: Option<Duration>,
}

/// Terminal status of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// A satisfying assignment was found
    Satisfiable,
    /// The constraints were proven to admit no assignment
    Unsatisfiable,
    /// The budget ran out before either outcome was established
    Timeout,
}

impl SolveStatus {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveStatus::Satisfiable)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SolveStatus::Satisfiable => "solution found",
            SolveStatus::Unsatisfiable => "infeasible",
            SolveStatus::Timeout => "no solution within time budget",
        };
        f.write_str(text)
    }
}

/// Satisfying assignment returned by the solver
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub assignment: HashMap<i32, bool>,
    pub solve_time: Duration,
}

impl SolverSolution {
    /// Value of a variable; variables the solver never saw read as false
    pub fn value(&self, var: i32) -> bool {
        self.assignment.get(&var).copied().unwrap_or(false)
    }
}

/// Outcome of one solve call
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub solution: Option<SolverSolution>,
    pub solve_time: Duration,
}

/// Statistics about the solving process
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub timeout: Option<Duration>,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            timeout: None,
        }
    }

    /// Create a solver that gives up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        let mut solver = Self::new();
        solver.set_timeout(timeout);
        solver
    }

    /// Set solving timeout; the clock starts when `solve` is called
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Add clauses to the solver
    pub fn add_clauses(&mut self, clauses: &[Clause]) -> Result<()> {
        for clause in clauses {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    /// Add a single clause to the solver
    pub fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        if clause.is_empty() {
            anyhow::bail!("Cannot add empty clause (unsatisfiable)");
        }

        // Update variable count
        for &literal in &clause.literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(clause.literals.iter().copied());

        self.clause_count += 1;
        Ok(())
    }

    /// Solve once within the configured budget
    pub fn solve(&mut self) -> Result<SolveOutcome> {
        // The budget runs from the start of each call
        if let Some(timeout) = self.timeout {
            self.solver
                .set_callbacks(Some(Timeout::new(timeout.as_secs_f32())));
        }

        let start_time = Instant::now();
        let result = self.solver.solve();
        let solve_time = start_time.elapsed();

        debug!(
            "CaDiCaL returned {:?} after {:.3}s ({} variables, {} clauses)",
            result,
            solve_time.as_secs_f64(),
            self.variable_count,
            self.clause_count
        );

        let outcome = match result {
            Some(true) => SolveOutcome {
                status: SolveStatus::Satisfiable,
                solution: Some(SolverSolution {
                    assignment: self.extract_assignment(),
                    solve_time,
                }),
                solve_time,
            },
            Some(false) => SolveOutcome {
                status: SolveStatus::Unsatisfiable,
                solution: None,
                solve_time,
            },
            None => SolveOutcome {
                status: SolveStatus::Timeout,
                solution: None,
                solve_time,
            },
        };

        Ok(outcome)
    }

    /// Extract variable assignment from the solver
    fn extract_assignment(&self) -> HashMap<i32, bool> {
        let mut assignment = HashMap::new();

        for var in 1..=self.variable_count as i32 {
            if let Some(value) = self.solver.value(var) {
                assignment.insert(var, value);
            }
        }

        assignment
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
            timeout: self.timeout,
        }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        match self.timeout {
            Some(timeout) => writeln!(f, "  Timeout: {:.1}s", timeout.as_secs_f64())?,
            None => writeln!(f, "  Timeout: none")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::CnfModel;

    /// `pigeons` pigeons into `pigeons - 1` holes, which no assignment satisfies
    fn pigeonhole(pigeons: usize) -> CnfModel {
        let holes = pigeons - 1;
        let mut model = CnfModel::new();
        let vars: Vec<Vec<i32>> = (0..pigeons)
            .map(|_| (0..holes).map(|_| model.declare_boolean()).collect())
            .collect();

        for pigeon in &vars {
            model.add_clause(pigeon.clone());
        }
        for hole in 0..holes {
            let column: Vec<i32> = vars.iter().map(|pigeon| pigeon[hole]).collect();
            model.add_at_most(&column, 1);
        }
        model
    }

    #[test]
    fn test_solver_creation() {
        let solver = SatSolver::new();
        assert_eq!(solver.variable_count(), 0);
        assert_eq!(solver.clause_count(), 0);
    }

    #[test]
    fn test_simple_satisfiable() {
        let mut solver = SatSolver::default();

        // x1 ∨ x2, ¬x1 ∨ x2
        solver.add_clause(&Clause::new(vec![1, 2])).unwrap();
        solver.add_clause(&Clause::new(vec![-1, 2])).unwrap();

        let outcome = solver.solve().unwrap();
        assert_eq!(outcome.status, SolveStatus::Satisfiable);

        let solution = outcome.solution.unwrap();
        assert!(solution.value(2));
        assert!(!solution.value(99));
    }

    #[test]
    fn test_unsatisfiable() {
        let mut solver = SatSolver::default();

        solver.add_clause(&Clause::unit(1)).unwrap();
        solver.add_clause(&Clause::unit(-1)).unwrap();

        let outcome = solver.solve().unwrap();
        assert_eq!(outcome.status, SolveStatus::Unsatisfiable);
        assert!(outcome.solution.is_none());
    }

    #[test]
    fn test_empty_clause_error() {
        let mut solver = SatSolver::new();
        assert!(solver.add_clause(&Clause::new(vec![])).is_err());
    }

    #[test]
    fn test_variable_count_tracking() {
        let mut solver = SatSolver::new();

        solver.add_clause(&Clause::new(vec![1, -5, 3])).unwrap();
        assert_eq!(solver.variable_count(), 5);

        solver.add_clause(&Clause::new(vec![2, -7])).unwrap();
        assert_eq!(solver.variable_count(), 7);
    }

    #[test]
    fn test_timeout_is_recorded() {
        let solver = SatSolver::with_timeout(Duration::from_secs(3));
        assert_eq!(solver.statistics().timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_hard_instance_times_out() {
        let model = pigeonhole(14);
        let mut solver = SatSolver::with_timeout(Duration::from_millis(5));
        solver.add_clauses(model.clauses()).unwrap();

        let outcome = solver.solve().unwrap();
        assert_eq!(outcome.status, SolveStatus::Timeout);
        assert!(outcome.solution.is_none());
        assert!(outcome.solve_time < Duration::from_secs(5));
    }

    #[test]
    fn test_budget_starts_at_solve() {
        let mut solver = SatSolver::with_timeout(Duration::from_millis(200));
        solver.add_clause(&Clause::new(vec![1, 2])).unwrap();
        solver.add_clause(&Clause::new(vec![-1, 2])).unwrap();

        std::thread::sleep(Duration::from_millis(300));

        let outcome = solver.solve().unwrap();
        assert_eq!(outcome.status, SolveStatus::Satisfiable);

        // A second solve gets a fresh budget as well
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(solver.solve().unwrap().status, SolveStatus::Satisfiable);
    }

    #[test]
    fn test_status_display() {
        assert!(SolveStatus::Satisfiable.is_solved());
        assert!(!SolveStatus::Timeout.is_solved());
        assert_eq!(SolveStatus::Unsatisfiable.to_string(), "infeasible");
    }
}
