/// Outcome of one full resolution pass.
///
/// "No answer" is an expected state (headless session, nothing focused,
/// process exited mid-lookup), deliberately distinct from the error path so
/// callers cannot mistake an unsupported backend for a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// One strategy produced a pid and the process table resolved it.
    Resolved(Vec<String>),
    /// No strategy could determine an answer. Not a failure.
    NoAnswer,
}

impl ResolveOutcome {
    /// Collapse into the public contract: names on success, an empty list
    /// when there is nothing to report.
    pub fn into_names(self) -> Vec<String> {
        match self {
            ResolveOutcome::Resolved(names) => names,
            ResolveOutcome::NoAnswer => Vec::new(),
        }
    }
}
