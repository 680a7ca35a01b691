//! Lock screen invariants checked after every event.
//!
//! Scenario tests pin down one path through the lock screen. The checks here
//! hold on every path: whatever pointer, keypad, power and embedded-view
//! events arrive, the lock flags, panel and passcode entry stay consistent.
//!
//! A [`ScreenSnapshot`] copies the observable state out of a
//! [`lockscreen_app::LockScreen`]; each [`Invariant`] judges one snapshot in
//! isolation.
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! registry.assert_all(&ScreenSnapshot::from_screen(&screen), "after unlock drag");
//! ```

mod checks;
mod snapshot;

pub use checks::{
    DisabledImpliesUnlocked, ErrorHoldsFullEntry, LoadingPanelIsEmbedded,
    PasscodeWithinCodeLength, ScreenOffClearsGesture, UnlockedShowsMain,
};
pub use snapshot::ScreenSnapshot;

/// Outcome of checking one snapshot against one invariant.
pub type InvariantResult = Result<(), Violation>;

/// A lock screen state that broke an invariant.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Invariant that failed
    pub invariant: &'static str,
    /// Offending state, in words
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of the lock screen that no event sequence may break.
pub trait Invariant: Send + Sync {
    /// Stable name, reported in violations.
    fn name(&self) -> &'static str;

    /// Judge a single snapshot.
    fn check(&self, state: &ScreenSnapshot) -> InvariantResult;
}

/// Set of invariants run together against each snapshot.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lock screen invariant this crate defines:
    ///
    /// - [`DisabledImpliesUnlocked`]
    /// - [`PasscodeWithinCodeLength`]
    /// - [`ErrorHoldsFullEntry`]
    /// - [`LoadingPanelIsEmbedded`]
    /// - [`UnlockedShowsMain`]
    /// - [`ScreenOffClearsGesture`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(DisabledImpliesUnlocked);
        registry.add(PasscodeWithinCodeLength);
        registry.add(ErrorHoldsFullEntry);
        registry.add(LoadingPanelIsEmbedded);
        registry.add(UnlockedShowsMain);
        registry.add(ScreenOffClearsGesture);
        registry
    }

    /// Register another check.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every check, collecting all violations rather than stopping at
    /// the first.
    pub fn check_all(&self, state: &ScreenSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Run every check and panic with `context` (usually the event just
    /// handled) if any fails.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &ScreenSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("lock screen invariant broken after {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
