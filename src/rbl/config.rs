use crate::Money;

/// Starting balance used when a room never stored one
pub const DEFAULT_INITIAL_MONEY: Money = Money(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Compare-and-swap attempts per atomic mutation before giving up
    pub max_attempts: usize,

    /// Room codes drawn before room creation gives up
    pub max_code_attempts: usize,

    pub default_initial_money: Money,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        return Self {
            max_attempts: 25,
            max_code_attempts: 100,
            default_initial_money: DEFAULT_INITIAL_MONEY,
        };
    }
}
