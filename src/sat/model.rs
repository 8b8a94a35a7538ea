//! CNF model builder shared by every rule

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self {
            literals: vec![lit1, lit2],
        }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Evaluate the clause under a total assignment
    pub fn is_satisfied_by<F: Fn(i32) -> bool>(&self, value: F) -> bool {
        self.literals.iter().any(|&literal| {
            let holds = value(literal.abs());
            if literal > 0 {
                holds
            } else {
                !holds
            }
        })
    }
}

/// An in-progress CNF model.
///
/// Every rule receives the model by `&mut` and appends clauses to it; the model
/// is handed to the solver once all rules have run. Variables are numbered from
/// 1 in declaration order.
#[derive(Debug)]
pub struct CnfModel {
    clauses: Vec<Clause>,
    next_id: i32,
    auxiliary_count: usize,
}

impl CnfModel {
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
            next_id: 1,
            auxiliary_count: 0,
        }
    }

    /// Declare a fresh decision variable
    pub fn declare_boolean(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Declare a fresh helper variable (gate outputs, counter registers)
    pub fn declare_auxiliary(&mut self) -> i32 {
        self.auxiliary_count += 1;
        self.declare_boolean()
    }

    /// Add a clause. An empty clause is recorded as an explicit contradiction.
    pub fn add_clause<I: IntoIterator<Item = i32>>(&mut self, literals: I) {
        let literals: Vec<i32> = literals.into_iter().collect();
        if literals.is_empty() {
            self.add_contradiction();
        } else {
            self.clauses.push(Clause::new(literals));
        }
    }

    pub fn add_unit(&mut self, literal: i32) {
        self.clauses.push(Clause::unit(literal));
    }

    pub fn add_binary(&mut self, lit1: i32, lit2: i32) {
        self.clauses.push(Clause::binary(lit1, lit2));
    }

    /// Make the model unsatisfiable
    pub fn add_contradiction(&mut self) {
        let witness = self.declare_auxiliary();
        self.add_unit(witness);
        self.add_unit(-witness);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Total number of declared variables
    pub fn variable_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    pub fn auxiliary_count(&self) -> usize {
        self.auxiliary_count
    }

    /// Check every clause against an assignment
    pub fn is_satisfied_by<F: Fn(i32) -> bool>(&self, value: F) -> bool {
        self.clauses.iter().all(|clause| clause.is_satisfied_by(&value))
    }
}

impl Default for CnfModel {
    fn default() -> Self {
        Self::new()
    }
}
