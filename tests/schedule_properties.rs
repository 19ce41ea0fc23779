use mortgage::{compute_schedule, LoanParameters, RepaymentMethod, RoundingPolicy, Schedule};
use proptest::prelude::*;

fn method() -> impl Strategy<Value = RepaymentMethod> {
    prop_oneof![
        Just(RepaymentMethod::EqualPrincipal),
        Just(RepaymentMethod::EqualPrincipalAndInterest),
        Just(RepaymentMethod::Bullet),
    ]
}

fn rounding() -> impl Strategy<Value = RoundingPolicy> {
    prop_oneof![
        Just(RoundingPolicy::Nearest),
        Just(RoundingPolicy::Up),
        Just(RoundingPolicy::Down),
    ]
}

fn loan() -> impl Strategy<Value = LoanParameters> {
    (
        0i64..=10_000_000_000,
        prop_oneof![Just(0.), 0.0f64..25.],
        1u32..=600,
        method(),
        rounding(),
    )
        .prop_flat_map(|(principal, rate, term, method, rounding)| {
            (0..term).prop_map(move |grace| {
                LoanParameters::new(principal, rate, term, grace, method, rounding)
            })
        })
}

fn schedule_of(params: &LoanParameters) -> Schedule {
    compute_schedule(params).expect("valid parameters")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn schedule_invariants(params in loan()) {
        let schedule = schedule_of(&params);
        let records = schedule.records();

        prop_assert_eq!(records.len(), params.term_months as usize);
        for (idx, rec) in records.iter().enumerate() {
            prop_assert_eq!(rec.sequence as usize, idx + 1);
            prop_assert_eq!(rec.total_payment, rec.interest + rec.principal);
            prop_assert!(rec.interest >= 0);
            prop_assert!(rec.principal >= 0);
        }
        for pair in records.windows(2) {
            prop_assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
            prop_assert!(pair[1].interest_cumulative >= pair[0].interest_cumulative);
            prop_assert!(pair[1].principal_cumulative >= pair[0].principal_cumulative);
        }

        let last = schedule.last().unwrap();
        prop_assert_eq!(last.remaining_balance, 0);
        prop_assert_eq!(last.principal_cumulative, params.principal);
        prop_assert_eq!(schedule.total_interest(), last.interest_cumulative);
    }

    #[test]
    fn grace_periods_repay_nothing(params in loan()) {
        prop_assume!(params.repayment_method != RepaymentMethod::Bullet);
        let schedule = schedule_of(&params);

        for rec in &schedule.records()[..params.grace_months as usize] {
            prop_assert_eq!(rec.principal, 0);
            prop_assert_eq!(rec.remaining_balance, params.principal);
        }
    }

    #[test]
    fn zero_rate_charges_no_interest(params in loan()) {
        let params = LoanParameters { annual_rate_percent: 0., ..params };
        let schedule = schedule_of(&params);

        prop_assert!(schedule.records().iter().all(|rec| rec.interest == 0));
        if params.repayment_method != RepaymentMethod::Bullet {
            let level = params
                .rounding_policy
                .apply(params.principal as f64 / params.amortizing_months() as f64);
            prop_assert_eq!(schedule.installment(), level as i64);
        }
    }

    #[test]
    fn rounding_orders_total_interest(
        params in loan(),
        method in prop_oneof![
            Just(RepaymentMethod::EqualPrincipalAndInterest),
            Just(RepaymentMethod::Bullet),
        ],
    ) {
        let total = |rounding_policy: RoundingPolicy| {
            schedule_of(&LoanParameters { repayment_method: method, rounding_policy, ..params })
                .total_interest()
        };
        let down = total(RoundingPolicy::Down);
        let nearest = total(RoundingPolicy::Nearest);
        let up = total(RoundingPolicy::Up);

        prop_assert!(down <= nearest, "down {} > nearest {}", down, nearest);
        prop_assert!(nearest <= up, "nearest {} > up {}", nearest, up);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let params = LoanParameters {
        grace_months: 36,
        ..LoanParameters::default()
    };
    assert_eq!(schedule_of(&params), schedule_of(&params));
}
