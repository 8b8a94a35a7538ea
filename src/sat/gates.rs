//! AND/OR gate encodings that turn compound expressions into variables

use super::CnfModel;

/// Reified boolean gates.
///
/// Both operations constrain `result` in both directions, so gate outputs can
/// be counted by cardinality constraints.
pub trait GateEncoder {
    /// `result <-> (inputs[0] AND inputs[1] AND ...)`; returns `result`
    fn and_iff(&mut self, inputs: &[i32], result: i32) -> i32;

    /// `result <-> (inputs[0] OR inputs[1] OR ...)`; returns `result`
    fn or_iff(&mut self, inputs: &[i32], result: i32) -> i32;
}

impl GateEncoder for CnfModel {
    fn and_iff(&mut self, inputs: &[i32], result: i32) -> i32 {
        // result -> every input
        for &input in inputs {
            self.add_binary(-result, input);
        }
        // NOT result -> some input is false
        let mut clause: Vec<i32> = inputs.iter().map(|&input| -input).collect();
        clause.push(result);
        self.add_clause(clause);
        result
    }

    fn or_iff(&mut self, inputs: &[i32], result: i32) -> i32 {
        // result -> some input
        let mut clause: Vec<i32> = inputs.to_vec();
        clause.push(-result);
        self.add_clause(clause);
        // NOT result -> every input is false
        for &input in inputs {
            self.add_binary(-input, result);
        }
        result
    }
}
