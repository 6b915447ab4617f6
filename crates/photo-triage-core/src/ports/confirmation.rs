//! Yes/no confirmation port.

/// Asks the operator to approve an action.
pub trait Confirmation {
    /// Returns true if the operator approved `prompt`.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmation that always approves, for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
