mod engine;
mod types;

pub use engine::{
    AMORTIZATION_SAFETY_MULTIPLIER, MAINTENANCE_INFLATION_RATE, PAYOFF_EPSILON,
    RETIREMENT_HORIZON_AGE, TARGET_CORPUS_MULTIPLE, compare_loan_scenarios, compare_tax_regimes,
    compare_tax_regimes_with_rules, compute_emi, simulate_amortization, simulate_erosion,
    simulate_fire, simulate_ownership, simulate_step_up_growth,
};
pub use types::{
    AmortizationResult, BuyingParameters, ContributionParameters, ErosionParameters, ErosionPoint,
    ErosionResult, FireParameters, FirePoint, FireResult, FireVariant, GrowthPoint,
    LoanComparison, LoanParameters, NewRegimeRules, OldRegimeRules, OwnershipParameters,
    OwnershipResult, OwnershipSummary, OwnershipYearPoint, Prepayment, PrepaymentFrequency,
    RentingParameters, TaxComparison, TaxInputs, TaxRegime, TaxSlab,
};
