use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PrepaymentFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl PrepaymentFrequency {
    /// `month` is 1-based within the schedule.
    pub fn applies_to_month(self, month: u32) -> bool {
        match self {
            PrepaymentFrequency::Monthly => true,
            PrepaymentFrequency::Quarterly => month % 3 == 0,
            PrepaymentFrequency::Yearly => month % 12 == 0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FireVariant {
    Lean,
    Standard,
    Fat,
}

impl FireVariant {
    pub fn expense_multiplier(self) -> f64 {
        match self {
            FireVariant::Lean => 0.8,
            FireVariant::Standard => 1.0,
            FireVariant::Fat => 2.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxRegime {
    Old,
    New,
}

#[derive(Debug, Clone, Copy)]
pub struct Prepayment {
    pub amount: f64,
    pub frequency: PrepaymentFrequency,
}

#[derive(Debug, Clone)]
pub struct LoanParameters {
    pub principal: f64,
    pub annual_rate: f64,
    pub tenure_years: u32,
    pub prepayment: Option<Prepayment>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationResult {
    pub total_interest: f64,
    pub total_amount: f64,
    pub months: u32,
    pub converged: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanComparison {
    pub monthly_payment: f64,
    pub baseline: AmortizationResult,
    pub with_prepayment: Option<AmortizationResult>,
    pub amount_saved: f64,
    pub months_saved: u32,
}

#[derive(Debug, Clone)]
pub struct ContributionParameters {
    pub monthly_amount: f64,
    pub annual_step_up: f64,
    pub annual_return: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub year: u32,
    pub invested: f64,
    pub value: f64,
    pub gain: f64,
}

#[derive(Debug, Clone)]
pub struct ErosionParameters {
    pub initial_amount: f64,
    pub annual_inflation: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErosionPoint {
    pub year: u32,
    pub value: f64,
    pub loss: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErosionResult {
    pub series: Vec<ErosionPoint>,
    pub final_value: f64,
    pub value_lost: f64,
    pub percent_lost: f64,
}

#[derive(Debug, Clone)]
pub struct FireParameters {
    pub current_age: u32,
    pub monthly_expenses: f64,
    pub current_savings: f64,
    pub monthly_investment: f64,
    pub annual_step_up: f64,
    pub annual_return: f64,
    pub annual_inflation: f64,
    pub variant: FireVariant,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirePoint {
    pub age: u32,
    pub year: u32,
    pub wealth: f64,
    pub target: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireResult {
    pub series: Vec<FirePoint>,
    pub fire_age: Option<u32>,
    pub corpus_needed: f64,
    pub final_wealth: f64,
    pub years_to_freedom: Option<u32>,
    pub current_freedom_years: f64,
}

#[derive(Debug, Clone)]
pub struct RentingParameters {
    pub monthly_rent: f64,
    pub annual_rent_increase: f64,
    pub annual_investment_return: f64,
}

#[derive(Debug, Clone)]
pub struct BuyingParameters {
    pub property_price: f64,
    pub down_payment_percent: f64,
    pub loan_rate: f64,
    pub loan_tenure_years: u32,
    pub annual_appreciation: f64,
    pub buying_cost_percent: f64,
    pub monthly_maintenance: f64,
}

#[derive(Debug, Clone)]
pub struct OwnershipParameters {
    pub horizon_years: u32,
    pub renting: RentingParameters,
    pub buying: BuyingParameters,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipYearPoint {
    pub year: u32,
    pub buying_wealth: f64,
    pub renting_wealth: f64,
    pub property_value: f64,
    pub outstanding_loan: f64,
    pub rent_corpus: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipSummary {
    pub monthly_payment: f64,
    pub final_buying_wealth: f64,
    pub final_renting_wealth: f64,
    pub buying_is_better: bool,
    pub wealth_difference: f64,
    pub total_rent_paid: f64,
    pub total_emi_paid: f64,
    pub total_maintenance_paid: f64,
    pub final_property_value: f64,
    pub outstanding_loan: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipResult {
    pub series: Vec<OwnershipYearPoint>,
    pub summary: OwnershipSummary,
}

#[derive(Debug, Clone)]
pub struct TaxInputs {
    pub gross_salary: f64,
    pub other_income: f64,
    pub deduction_80c: f64,
    pub deduction_80d: f64,
    pub hra_exemption: f64,
    pub home_loan_interest: f64,
    pub other_deductions: f64,
}

/// One progressive bracket: income above `floor` is taxed at `rate`. Slab
/// tables are ordered by descending floor and walked top-down.
#[derive(Debug, Clone, Copy)]
pub struct TaxSlab {
    pub floor: f64,
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct OldRegimeRules {
    pub standard_deduction: f64,
    pub deduction_80c_cap: f64,
    pub home_loan_interest_cap: f64,
    pub rebate_limit: f64,
    pub cess_rate: f64,
    pub slabs: Vec<TaxSlab>,
}

impl Default for OldRegimeRules {
    fn default() -> Self {
        Self {
            standard_deduction: 50_000.0,
            deduction_80c_cap: 150_000.0,
            home_loan_interest_cap: 200_000.0,
            rebate_limit: 500_000.0,
            cess_rate: 0.04,
            slabs: vec![
                TaxSlab {
                    floor: 1_000_000.0,
                    rate: 0.30,
                },
                TaxSlab {
                    floor: 500_000.0,
                    rate: 0.20,
                },
                TaxSlab {
                    floor: 250_000.0,
                    rate: 0.05,
                },
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewRegimeRules {
    pub standard_deduction: f64,
    pub rebate_limit: f64,
    pub cess_rate: f64,
    pub slabs: Vec<TaxSlab>,
}

impl Default for NewRegimeRules {
    /// FY 2025-26 table.
    fn default() -> Self {
        Self {
            standard_deduction: 75_000.0,
            rebate_limit: 1_200_000.0,
            cess_rate: 0.04,
            slabs: vec![
                TaxSlab {
                    floor: 2_400_000.0,
                    rate: 0.30,
                },
                TaxSlab {
                    floor: 2_000_000.0,
                    rate: 0.25,
                },
                TaxSlab {
                    floor: 1_600_000.0,
                    rate: 0.20,
                },
                TaxSlab {
                    floor: 1_200_000.0,
                    rate: 0.15,
                },
                TaxSlab {
                    floor: 800_000.0,
                    rate: 0.10,
                },
                TaxSlab {
                    floor: 400_000.0,
                    rate: 0.05,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxComparison {
    pub taxable_income_old: f64,
    pub total_tax_old: f64,
    pub taxable_income_new: f64,
    pub total_tax_new: f64,
    pub better_regime: TaxRegime,
    pub savings: f64,
}
