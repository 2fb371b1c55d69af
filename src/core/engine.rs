use super::types::{
    AmortizationResult, ContributionParameters, ErosionParameters, ErosionPoint, ErosionResult,
    FireParameters, FirePoint, FireResult, GrowthPoint, LoanComparison, LoanParameters,
    NewRegimeRules, OldRegimeRules, OwnershipParameters, OwnershipResult, OwnershipSummary,
    OwnershipYearPoint, PrepaymentFrequency, TaxComparison, TaxInputs, TaxRegime, TaxSlab,
};

/// A loan counts as paid off once the balance drops to one currency unit.
pub const PAYOFF_EPSILON: f64 = 1.0;

/// The amortization loop never runs past this multiple of the nominal
/// tenure, so a payment smaller than the accruing interest cannot spin
/// forever. Hitting the bound is reported via `AmortizationResult::converged`.
pub const AMORTIZATION_SAFETY_MULTIPLIER: u32 = 2;

/// Projection horizon for the retirement model.
pub const RETIREMENT_HORIZON_AGE: u32 = 80;

/// 4% rule: a corpus of 25x annual expenses sustains withdrawal.
pub const TARGET_CORPUS_MULTIPLE: f64 = 25.0;

/// Maintenance outgo in the ownership comparison inflates at this fixed
/// annual rate, independent of the other rate inputs.
pub const MAINTENANCE_INFLATION_RATE: f64 = 0.04;

pub fn compute_emi(principal: f64, annual_rate: f64, total_months: u32) -> f64 {
    if principal == 0.0 || annual_rate == 0.0 || total_months == 0 {
        return 0.0;
    }

    let monthly_rate = annual_rate / 12.0 / 100.0;
    let growth = (1.0 + monthly_rate).powi(total_months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

pub fn simulate_amortization(
    principal: f64,
    annual_rate: f64,
    total_months: u32,
    payment: f64,
    extra_payment: f64,
    frequency: PrepaymentFrequency,
) -> AmortizationResult {
    let monthly_rate = annual_rate / 12.0 / 100.0;
    let max_months = total_months.saturating_mul(AMORTIZATION_SAFETY_MULTIPLIER);

    let mut balance = principal;
    let mut total_interest = 0.0;
    let mut months = 0_u32;

    while balance > PAYOFF_EPSILON && months < max_months {
        let interest = balance * monthly_rate;
        let mut principal_component = payment - interest;

        let mut extra = 0.0;
        if extra_payment > 0.0 && frequency.applies_to_month(months + 1) {
            extra = extra_payment;
        }

        // Final payment: settle exactly the remaining balance, drop the extra.
        if principal_component + extra > balance {
            principal_component = balance;
            extra = 0.0;
        }

        balance -= principal_component + extra;
        total_interest += interest;
        months += 1;

        if balance <= 0.0 {
            break;
        }
    }

    AmortizationResult {
        total_interest: total_interest.round(),
        total_amount: (principal + total_interest).round(),
        months,
        converged: balance <= PAYOFF_EPSILON,
    }
}

/// Runs the no-prepayment baseline and, when configured, a prepayment
/// scenario with the same fixed payment, then reports the difference.
pub fn compare_loan_scenarios(params: &LoanParameters) -> LoanComparison {
    let total_months = params.tenure_years * 12;
    let payment = compute_emi(params.principal, params.annual_rate, total_months);

    let baseline = simulate_amortization(
        params.principal,
        params.annual_rate,
        total_months,
        payment,
        0.0,
        PrepaymentFrequency::Monthly,
    );

    let with_prepayment = params.prepayment.map(|prepayment| {
        simulate_amortization(
            params.principal,
            params.annual_rate,
            total_months,
            payment,
            prepayment.amount,
            prepayment.frequency,
        )
    });

    let (amount_saved, months_saved) = match &with_prepayment {
        Some(scenario) => (
            baseline.total_amount - scenario.total_amount,
            baseline.months.saturating_sub(scenario.months),
        ),
        None => (0.0, 0),
    };

    LoanComparison {
        monthly_payment: payment,
        baseline,
        with_prepayment,
        amount_saved,
        months_saved,
    }
}

pub fn simulate_step_up_growth(params: &ContributionParameters) -> Vec<GrowthPoint> {
    let monthly_rate = params.annual_return / 100.0 / 12.0;

    let mut balance = 0.0;
    let mut invested = 0.0;
    let mut monthly = params.monthly_amount;
    let mut series = Vec::with_capacity(params.years as usize);

    for year in 1..=params.years {
        for _ in 0..12 {
            balance = (balance + monthly) * (1.0 + monthly_rate);
            invested += monthly;
        }

        series.push(GrowthPoint {
            year,
            invested: invested.round(),
            value: balance.round(),
            gain: (balance - invested).round(),
        });

        monthly *= 1.0 + params.annual_step_up / 100.0;
    }

    series
}

pub fn simulate_erosion(params: &ErosionParameters) -> ErosionResult {
    let rate = params.annual_inflation / 100.0;
    let mut series = Vec::with_capacity(params.years as usize + 1);

    for year in 0..=params.years {
        let value = params.initial_amount / (1.0 + rate).powi(year as i32);
        series.push(ErosionPoint {
            year,
            value: value.round(),
            loss: (params.initial_amount - value).round(),
        });
    }

    let final_value = series
        .last()
        .map(|point| point.value)
        .unwrap_or(params.initial_amount);
    let value_lost = params.initial_amount - final_value;
    let percent_lost = if params.initial_amount > 0.0 {
        value_lost / params.initial_amount * 100.0
    } else {
        0.0
    };

    ErosionResult {
        series,
        final_value,
        value_lost,
        percent_lost,
    }
}

pub fn simulate_fire(params: &FireParameters) -> FireResult {
    let annual_expenses =
        params.monthly_expenses * 12.0 * params.variant.expense_multiplier();
    let years_to_project = RETIREMENT_HORIZON_AGE.saturating_sub(params.current_age);

    let mut series = Vec::with_capacity(years_to_project as usize + 1);
    let mut wealth = params.current_savings;
    let mut sip = params.monthly_investment;
    let mut fire_age = None;
    let mut corpus_needed = 0.0;

    for year in 0..=years_to_project {
        let age = params.current_age + year;

        // "If I retire now, at this age, I need this much."
        let expenses_at_age = annual_expenses
            * (1.0 + params.annual_inflation / 100.0).powi(year as i32);
        let target_corpus = expenses_at_age * TARGET_CORPUS_MULTIPLE;

        series.push(FirePoint {
            age,
            year,
            wealth: wealth.round(),
            target: target_corpus.round(),
            expenses: expenses_at_age.round(),
        });

        // First crossing wins; wealth never shrinks in this model, so the
        // answer is stable once found.
        if fire_age.is_none() && wealth >= target_corpus {
            fire_age = Some(age);
            corpus_needed = target_corpus;
        }

        // Annual compounding on the post-contribution balance; a monthly
        // walk would change every projected figure.
        let annual_investment = sip * 12.0;
        let interest = (wealth + annual_investment) * (params.annual_return / 100.0);
        wealth = wealth + annual_investment + interest;
        sip *= 1.0 + params.annual_step_up / 100.0;
    }

    let years_to_freedom = fire_age.map(|age| age - params.current_age);
    let current_freedom_years = if annual_expenses > 0.0 {
        params.current_savings / annual_expenses
    } else {
        0.0
    };

    FireResult {
        series,
        fire_age,
        corpus_needed,
        final_wealth: wealth,
        years_to_freedom,
        current_freedom_years,
    }
}

pub fn simulate_ownership(params: &OwnershipParameters) -> OwnershipResult {
    let buying = &params.buying;
    let renting = &params.renting;

    let months = params.horizon_years * 12;
    let tenure_months = buying.loan_tenure_years * 12;

    let down_payment = buying.property_price * buying.down_payment_percent / 100.0;
    let one_time_costs = buying.property_price * buying.buying_cost_percent / 100.0;
    let loan_amount = buying.property_price - down_payment;

    let monthly_rate = buying.loan_rate / 12.0 / 100.0;
    // Straight-line fallback keeps a zero-rate loan well-defined.
    let emi = if monthly_rate == 0.0 {
        if tenure_months == 0 {
            0.0
        } else {
            loan_amount / tenure_months as f64
        }
    } else {
        compute_emi(loan_amount, buying.loan_rate, tenure_months)
    };

    // The renter starts with the capital the buyer sank into the purchase.
    let mut rent_corpus = down_payment + one_time_costs;

    let mut property_value = buying.property_price;
    let mut outstanding_loan = loan_amount;
    let mut current_rent = renting.monthly_rent;
    let mut current_maintenance = buying.monthly_maintenance;

    let mut total_rent_paid = 0.0;
    let mut total_emi_paid = 0.0;
    let mut total_maintenance_paid = 0.0;

    let mut series = Vec::with_capacity(params.horizon_years as usize);

    for month in 1..=months {
        let interest = outstanding_loan * monthly_rate;
        let principal_component = emi - interest;

        if month <= tenure_months {
            outstanding_loan -= principal_component;
            total_emi_paid += emi;
        } else {
            outstanding_loan = 0.0;
        }

        total_maintenance_paid += current_maintenance;
        property_value *= 1.0 + buying.annual_appreciation / 100.0 / 12.0;

        total_rent_paid += current_rent;

        // The corpus grows at the investment return, then absorbs the gap
        // between the two monthly outflows. A negative surplus draws the
        // corpus down, possibly below zero.
        let buying_outflow =
            (if month <= tenure_months { emi } else { 0.0 }) + current_maintenance;
        let surplus = buying_outflow - current_rent;
        rent_corpus *= 1.0 + renting.annual_investment_return / 100.0 / 12.0;
        rent_corpus += surplus;

        if month % 12 == 0 {
            current_rent *= 1.0 + renting.annual_rent_increase / 100.0;
            current_maintenance *= 1.0 + MAINTENANCE_INFLATION_RATE;

            series.push(OwnershipYearPoint {
                year: month / 12,
                buying_wealth: (property_value - outstanding_loan).round(),
                renting_wealth: rent_corpus.round(),
                property_value: property_value.round(),
                outstanding_loan: outstanding_loan.round(),
                rent_corpus: rent_corpus.round(),
            });
        }
    }

    let final_buying_wealth = property_value - outstanding_loan;
    let final_renting_wealth = rent_corpus;

    OwnershipResult {
        series,
        summary: OwnershipSummary {
            monthly_payment: emi,
            final_buying_wealth,
            final_renting_wealth,
            buying_is_better: final_buying_wealth > final_renting_wealth,
            wealth_difference: (final_buying_wealth - final_renting_wealth).abs(),
            total_rent_paid,
            total_emi_paid,
            total_maintenance_paid,
            final_property_value: property_value,
            outstanding_loan: outstanding_loan.max(0.0),
        },
    }
}

fn banded_tax(taxable: f64, slabs: &[TaxSlab]) -> f64 {
    let mut remaining = taxable;
    let mut tax = 0.0;

    for slab in slabs {
        if remaining > slab.floor {
            tax += (remaining - slab.floor) * slab.rate;
            remaining = slab.floor;
        }
    }

    tax
}

pub fn compare_tax_regimes(inputs: &TaxInputs) -> TaxComparison {
    compare_tax_regimes_with_rules(
        inputs,
        &OldRegimeRules::default(),
        &NewRegimeRules::default(),
    )
}

pub fn compare_tax_regimes_with_rules(
    inputs: &TaxInputs,
    old_rules: &OldRegimeRules,
    new_rules: &NewRegimeRules,
) -> TaxComparison {
    let total_income = inputs.gross_salary + inputs.other_income;

    let old_deductions = inputs.deduction_80c.min(old_rules.deduction_80c_cap)
        + inputs.deduction_80d
        + inputs.hra_exemption
        + inputs.home_loan_interest.min(old_rules.home_loan_interest_cap)
        + inputs.other_deductions
        + old_rules.standard_deduction;
    let taxable_old = (total_income - old_deductions).max(0.0);

    let mut tax_old = banded_tax(taxable_old, &old_rules.slabs);
    // 87A is a cliff, not a phase-out: at or under the limit the whole
    // liability is waived; one unit over restores all of it.
    if taxable_old <= old_rules.rebate_limit {
        tax_old = 0.0;
    }
    let total_tax_old = tax_old * (1.0 + old_rules.cess_rate);

    let taxable_new = (total_income - new_rules.standard_deduction).max(0.0);
    let mut tax_new = banded_tax(taxable_new, &new_rules.slabs);
    if taxable_new <= new_rules.rebate_limit {
        tax_new = 0.0;
    }
    let total_tax_new = tax_new * (1.0 + new_rules.cess_rate);

    TaxComparison {
        taxable_income_old: taxable_old,
        total_tax_old,
        taxable_income_new: taxable_new,
        total_tax_new,
        better_regime: if total_tax_new <= total_tax_old {
            TaxRegime::New
        } else {
            TaxRegime::Old
        },
        savings: (total_tax_old - total_tax_new).abs(),
    }
}
