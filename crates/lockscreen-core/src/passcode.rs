//! Passcode entry.
//!
//! Digits accumulate until the buffer is as long as the stored code, then
//! the entry is validated. A mismatch shows an error for
//! [`PasscodeConfig::error_timeout`] before the buffer clears, so the user
//! sees which attempt failed. Input is ignored while the error shows.

use std::{
    ops::Sub,
    time::{Duration, Instant},
};

use crate::config::PasscodeConfig;

/// Keys on the passcode keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadKey {
    /// Digit key. Values above 9 are ignored.
    Digit(u8),
    /// Delete the last digit
    Backspace,
    /// Leave the passcode panel without unlocking
    Cancel,
    /// Open the emergency dialer
    EmergencyCall,
}

impl KeypadKey {
    /// Map a keypad data key (`0`-`9`, `b`, `c`, `e`) to a key.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'b' => Some(Self::Backspace),
            'c' => Some(Self::Cancel),
            'e' => Some(Self::EmergencyCall),
            _ => key.to_digit(10).map(|d| Self::Digit(d as u8)),
        }
    }
}

/// What the entry display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasscodeStatus {
    /// Accepting input
    #[default]
    Idle,
    /// Last attempt was rejected
    Error,
}

/// Result of feeding input to [`PasscodeInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasscodeOutcome {
    /// Input had no effect
    Ignored,
    /// Digit appended, code not complete yet
    Pending {
        /// Digits entered so far
        entered: usize,
    },
    /// Entry matched the stored code
    Accepted,
    /// Entry did not match; error is showing
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status<I> {
    Idle,
    Error { since: I },
}

/// Passcode entry buffer with delay-on-error.
#[derive(Debug, Clone)]
pub struct PasscodeInput<I = Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    config: PasscodeConfig,
    entered: String,
    status: Status<I>,
}

impl<I> PasscodeInput<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create an empty entry.
    pub fn new(config: PasscodeConfig) -> Self {
        Self { config, entered: String::new(), status: Status::Idle }
    }

    /// Number of digits entered.
    pub fn entered(&self) -> usize {
        self.entered.len()
    }

    /// Display status.
    pub fn status(&self) -> PasscodeStatus {
        match self.status {
            Status::Idle => PasscodeStatus::Idle,
            Status::Error { .. } => PasscodeStatus::Error,
        }
    }

    /// Whether the error display is showing.
    pub fn is_error(&self) -> bool {
        matches!(self.status, Status::Error { .. })
    }

    /// Append a digit. Validates against `code` once the entry is full.
    pub fn enter_digit(&mut self, digit: u8, code: &str, now: I) -> PasscodeOutcome {
        if digit > 9 || self.is_error() || self.entered.len() >= code.len() {
            return PasscodeOutcome::Ignored;
        }

        self.entered.push(char::from(b'0' + digit));

        if self.entered.len() < code.len() {
            return PasscodeOutcome::Pending { entered: self.entered.len() };
        }

        self.validate(code, now)
    }

    /// Compare the entry with `code`.
    ///
    /// A match clears the entry immediately. A mismatch keeps the digits
    /// until the error display times out.
    pub fn validate(&mut self, code: &str, now: I) -> PasscodeOutcome {
        if self.entered == code {
            self.entered.clear();
            self.status = Status::Idle;
            tracing::debug!("passcode accepted");
            PasscodeOutcome::Accepted
        } else {
            self.status = Status::Error { since: now };
            tracing::debug!("passcode rejected");
            PasscodeOutcome::Rejected
        }
    }

    /// Remove the last digit. Returns true if a digit was removed.
    pub fn backspace(&mut self) -> bool {
        if self.is_error() {
            return false;
        }
        self.entered.pop().is_some()
    }

    /// Clear the entry and any error.
    pub fn clear(&mut self) {
        self.entered.clear();
        self.status = Status::Idle;
    }

    /// Clear the entry unless the error display is showing.
    ///
    /// Returns true if the entry was reset.
    pub fn reset_unless_error(&mut self) -> bool {
        if self.is_error() {
            return false;
        }
        self.clear();
        true
    }

    /// Process periodic maintenance (error display timeout).
    ///
    /// Returns true if an expired error was cleared.
    pub fn tick(&mut self, now: I) -> bool {
        match self.status {
            Status::Error { since } if now - since >= self.config.error_timeout => {
                self.clear();
                true
            },
            _ => false,
        }
    }
}
