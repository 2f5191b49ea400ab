//! Pre-harvest action script: static block resolution and condition
//! evaluation.
//!
//! The interpreter in [`super::controller`] walks the script with an
//! explicit program counter rather than a tree, since `conditional_wait` and
//! `skip_if` jump by absolute action index — a flat, bytecode-like
//! representation is the only one that can express that directly. This
//! module performs a single forward pass to resolve `if/elif/else/if_end`
//! and `while_begin/while_end` nesting into jump targets so the controller
//! never has to re-derive structure while running.

use std::collections::HashMap;

use crate::config::{Action, Condition};

#[derive(Debug, Clone)]
pub enum Variable {
    Int(i64),
    Text(String),
}

impl Variable {
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Result of the most recent `check_element` action, consulted by the
/// condition language.
#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    pub passed: bool,
    pub value: Option<String>,
}

#[must_use]
pub fn eval_condition(condition: &Condition, last_check: &CheckOutcome) -> bool {
    match condition {
        Condition::CheckPassed => last_check.passed,
        Condition::CheckFailed => !last_check.passed,
        Condition::ValueEquals { value } => last_check.value.as_deref() == Some(value.as_str()),
        Condition::ValueNotEquals { value } => last_check.value.as_deref() != Some(value.as_str()),
    }
}

/// Precomputed structure of an action script: which group an `if`-family
/// marker belongs to, where each group's body ends, and where `while`
/// bodies begin/end.
#[derive(Debug, Default)]
pub struct ScriptProgram {
    pub actions: Vec<Action>,
    group_of: HashMap<usize, usize>,
    if_end_of: HashMap<usize, usize>,
    next_marker_of: HashMap<usize, usize>,
    while_pair: HashMap<usize, usize>,
    enclosing_while: HashMap<usize, (usize, usize)>,
}

enum OpenFrame {
    If { group: usize, markers: Vec<usize> },
    While { begin: usize },
}

impl ScriptProgram {
    /// Resolve block nesting. Panics only on a malformed script (unmatched
    /// `if_end`/`while_end`), which is a configuration error the caller
    /// should have rejected before constructing a [`ScriptProgram`].
    #[must_use]
    pub fn compile(actions: Vec<Action>) -> Self {
        let n = actions.len();
        let mut group_of = HashMap::new();
        let mut if_end_of = HashMap::new();
        let mut next_marker_of = HashMap::new();
        let mut while_pair = HashMap::new();
        let mut stack: Vec<OpenFrame> = Vec::new();
        let mut next_group = 0usize;

        for (i, action) in actions.iter().enumerate() {
            match action {
                Action::IfBegin { .. } => {
                    let group = next_group;
                    next_group += 1;
                    group_of.insert(i, group);
                    stack.push(OpenFrame::If { group, markers: vec![i] });
                }
                Action::Elif { .. } => {
                    if let Some(OpenFrame::If { group, markers }) = stack.last_mut() {
                        group_of.insert(i, *group);
                        markers.push(i);
                    }
                }
                Action::Else => {
                    if let Some(OpenFrame::If { group, markers }) = stack.last_mut() {
                        group_of.insert(i, *group);
                        markers.push(i);
                    }
                }
                Action::IfEnd => {
                    if let Some(OpenFrame::If { group, mut markers }) = stack.pop() {
                        group_of.insert(i, group);
                        if_end_of.insert(group, i);
                        markers.push(i);
                        for pair in markers.windows(2) {
                            next_marker_of.insert(pair[0], pair[1]);
                        }
                    }
                }
                Action::WhileBegin { .. } => stack.push(OpenFrame::While { begin: i }),
                Action::WhileEnd => {
                    if let Some(OpenFrame::While { begin }) = stack.pop() {
                        while_pair.insert(begin, i);
                        while_pair.insert(i, begin);
                    }
                }
                _ => {}
            }
        }

        let mut enclosing_while = HashMap::new();
        let mut while_stack: Vec<usize> = Vec::new();
        for (i, action) in actions.iter().enumerate() {
            match action {
                Action::WhileBegin { .. } => while_stack.push(i),
                Action::WhileEnd => {
                    while_stack.pop();
                }
                _ => {}
            }
            if let Some(&begin) = while_stack.last() {
                enclosing_while.insert(i, (begin, while_pair[&begin]));
            }
        }

        let _ = n;
        Self {
            actions,
            group_of,
            if_end_of,
            next_marker_of,
            while_pair,
            enclosing_while,
        }
    }

    #[must_use]
    pub fn group_of(&self, pc: usize) -> Option<usize> {
        self.group_of.get(&pc).copied()
    }

    #[must_use]
    pub fn if_end_of(&self, group: usize) -> usize {
        self.if_end_of[&group]
    }

    #[must_use]
    pub fn next_marker_of(&self, pc: usize) -> usize {
        self.next_marker_of[&pc]
    }

    #[must_use]
    pub fn while_pair(&self, pc: usize) -> usize {
        self.while_pair[&pc]
    }

    #[must_use]
    pub fn enclosing_while(&self, pc: usize) -> Option<(usize, usize)> {
        self.enclosing_while.get(&pc).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond() -> Condition {
        Condition::CheckPassed
    }

    #[test]
    fn if_else_resolves_single_group() {
        let script = ScriptProgram::compile(vec![
            Action::IfBegin { condition: cond() },
            Action::LogMessage(crate::config::LogMessageFields { message: "a".into(), level: None, log_file: None }),
            Action::Else,
            Action::LogMessage(crate::config::LogMessageFields { message: "b".into(), level: None, log_file: None }),
            Action::IfEnd,
        ]);
        let g = script.group_of(0).unwrap();
        assert_eq!(script.group_of(2), Some(g));
        assert_eq!(script.group_of(4), Some(g));
        assert_eq!(script.if_end_of(g), 4);
        assert_eq!(script.next_marker_of(0), 2);
        assert_eq!(script.next_marker_of(2), 4);
    }

    #[test]
    fn while_pair_resolves_both_directions() {
        let script = ScriptProgram::compile(vec![
            Action::WhileBegin { condition: cond() },
            Action::Break,
            Action::WhileEnd,
        ]);
        assert_eq!(script.while_pair(0), 2);
        assert_eq!(script.while_pair(2), 0);
        assert_eq!(script.enclosing_while(1), Some((0, 2)));
    }

    #[test]
    fn nested_if_inside_while_resolves_independently() {
        let script = ScriptProgram::compile(vec![
            Action::WhileBegin { condition: cond() },
            Action::IfBegin { condition: cond() },
            Action::Break,
            Action::IfEnd,
            Action::WhileEnd,
        ]);
        let g = script.group_of(1).unwrap();
        assert_eq!(script.if_end_of(g), 3);
        assert_eq!(script.enclosing_while(2), Some((0, 4)));
    }
}
