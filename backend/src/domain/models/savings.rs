#[derive(Debug, Clone, PartialEq, Default)]
pub struct Savings {
    /// Money already set aside, in the user's display currency
    pub free_money: f64,
    pub deposit: bool,
    /// Interest is reinvested. Never true while `deposit` is false.
    pub capitalization: bool,
    /// Annual deposit interest rate; inert while `deposit` is false
    pub percent: f64,
}
