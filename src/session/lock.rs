//! The lock gate and the password change flow.
//!
//! This is a privacy screen, not a security boundary: the password is a
//! plain string kept in local storage and compared exactly.

use tracing::{debug, info};
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Locked,
}

/// Two-state gate in front of the editor.
///
/// # Examples
///
/// ```
/// use daybook::session::LockGate;
///
/// let mut gate = LockGate::new("secret".to_string());
/// gate.lock();
/// assert!(gate.is_locked());
///
/// assert!(!gate.try_unlock("Secret")); // case-sensitive
/// assert!(gate.try_unlock("secret"));
/// assert!(!gate.is_locked());
/// ```
pub struct LockGate {
    state: LockState,
    password: Zeroizing<String>,
}

impl LockGate {
    /// A new gate starts unlocked.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            state: LockState::Unlocked,
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    pub fn lock(&mut self) {
        if self.state == LockState::Unlocked {
            info!("Journal locked");
        }
        self.state = LockState::Locked;
    }

    /// Unlocks if `attempt` matches the password exactly. A wrong attempt
    /// leaves the gate locked and is otherwise ignored.
    pub fn try_unlock(&mut self, attempt: &str) -> bool {
        if !self.is_locked() {
            return true;
        }
        if self.matches(attempt) {
            self.state = LockState::Unlocked;
            info!("Journal unlocked");
            true
        } else {
            debug!("Unlock attempt rejected");
            false
        }
    }

    pub fn matches(&self, attempt: &str) -> bool {
        attempt == self.password.as_str()
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = Zeroizing::new(password.to_string());
    }
}

impl std::fmt::Debug for LockGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGate")
            .field("state", &self.state)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeStep {
    /// Waiting for the current password.
    #[default]
    Current,
    /// Current password confirmed; waiting for the new one.
    New,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The current password was confirmed.
    Confirmed,
    /// The input was wrong or blank; the step is unchanged.
    Rejected,
    /// The password was replaced. Carries the new password to persist.
    Changed(Zeroizing<String>),
}

/// Two-step password change: confirm the current password, then supply a
/// non-blank new one.
#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    step: ChangeStep,
}

impl PasswordChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> ChangeStep {
        self.step
    }

    /// Abandons a half-finished change.
    pub fn cancel(&mut self) {
        self.step = ChangeStep::Current;
    }

    pub fn submit(&mut self, gate: &mut LockGate, input: &str) -> ChangeOutcome {
        match self.step {
            ChangeStep::Current => {
                if gate.matches(input) {
                    self.step = ChangeStep::New;
                    ChangeOutcome::Confirmed
                } else {
                    ChangeOutcome::Rejected
                }
            }
            ChangeStep::New => {
                if input.trim().is_empty() {
                    return ChangeOutcome::Rejected;
                }
                gate.set_password(input);
                self.step = ChangeStep::Current;
                info!("Lock password changed");
                ChangeOutcome::Changed(Zeroizing::new(input.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_unlocked_and_locks_unconditionally() {
        let mut gate = LockGate::new("pw");
        assert_eq!(gate.state(), LockState::Unlocked);
        gate.lock();
        gate.lock();
        assert!(gate.is_locked());
    }

    #[test]
    fn test_failed_attempts_are_unlimited() {
        let mut gate = LockGate::new("pw");
        gate.lock();
        for _ in 0..20 {
            assert!(!gate.try_unlock("nope"));
        }
        assert!(!gate.try_unlock(""));
        assert!(gate.try_unlock("pw"));
    }

    #[test]
    fn test_unlock_requires_exact_match() {
        let mut gate = LockGate::new("pw");
        gate.lock();
        assert!(!gate.try_unlock("pw "));
        assert!(!gate.try_unlock("PW"));
        assert!(gate.is_locked());
    }

    #[test]
    fn test_debug_redacts_password() {
        let gate = LockGate::new("topsecret");
        let debug = format!("{:?}", gate);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("topsecret"));
    }

    #[test]
    fn test_password_change_flow() {
        let mut gate = LockGate::new("old");
        let mut change = PasswordChange::new();

        assert_eq!(change.submit(&mut gate, "wrong"), ChangeOutcome::Rejected);
        assert_eq!(change.step(), ChangeStep::Current);

        assert_eq!(change.submit(&mut gate, "old"), ChangeOutcome::Confirmed);
        assert_eq!(change.step(), ChangeStep::New);

        assert_eq!(change.submit(&mut gate, "   "), ChangeOutcome::Rejected);
        assert_eq!(change.step(), ChangeStep::New);

        match change.submit(&mut gate, "new") {
            ChangeOutcome::Changed(password) => assert_eq!(password.as_str(), "new"),
            other => panic!("Expected Changed, got {:?}", other),
        }
        assert_eq!(change.step(), ChangeStep::Current);
        assert!(gate.matches("new"));
        assert!(!gate.matches("old"));
    }

    #[test]
    fn test_cancel_resets_step() {
        let mut gate = LockGate::new("old");
        let mut change = PasswordChange::new();
        change.submit(&mut gate, "old");
        change.cancel();
        assert_eq!(change.step(), ChangeStep::Current);
    }
}
