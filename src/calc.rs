//! Invoice arithmetic.
//!
//! Every monetary figure is truncated to two decimals on its own, so a
//! line's fee and VAT are not guaranteed to reconcile exactly with its
//! total. Invoices already issued depend on these figures; keep the
//! order of operations below as it is.

use crate::models::{Currency, LineItem};

/// Share of the subtotal retained by the platform.
pub const MANAGEMENT_FEE: f64 = 0.03;

/// Rate used to strip VAT from a VAT-inclusive price, whatever the line's own rate.
pub const GENERAL_VAT: f64 = 0.21;

/// Whether a unit price was entered with or without VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBasis {
    #[default]
    VatExclusive,
    VatInclusive,
}

impl PriceBasis {
    pub fn from_vat_included(vat_included: bool) -> Self {
        if vat_included {
            PriceBasis::VatInclusive
        } else {
            PriceBasis::VatExclusive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineResult {
    pub subtotal: f64,
    pub platform_fee: f64,
    pub provider_payout: f64,
    pub vat_amount: f64,
    pub total: f64,
    pub provider_payout_per_unit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateResult {
    pub subtotal: f64,
    pub platform_fee: f64,
    pub provider_payout: f64,
    pub vat_amount: f64,
    pub total: f64,
    /// Currency of the first line; `None` for an empty invoice.
    pub currency: Option<Currency>,
}

/// `floor(value * 100) / 100`
pub fn truncate2(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}

/// VAT-exclusive unit price for a price entered on the given basis.
pub fn net_unit_price(unit_price: f64, basis: PriceBasis) -> f64 {
    match basis {
        PriceBasis::VatExclusive => unit_price,
        PriceBasis::VatInclusive => unit_price / (1.0 + GENERAL_VAT),
    }
}

pub fn compute_line(item: &LineItem, basis: PriceBasis) -> LineResult {
    let quantity = f64::from(item.quantity());
    let unit_price = net_unit_price(item.unit_price(), basis);

    let total = truncate2(quantity * unit_price * (1.0 + item.vat_rate()));
    let subtotal = truncate2(quantity * unit_price);
    let platform_fee = truncate2(subtotal * MANAGEMENT_FEE);
    let provider_payout = truncate2(subtotal * (1.0 - MANAGEMENT_FEE));
    let vat_amount = truncate2(total - subtotal);

    LineResult {
        subtotal,
        platform_fee,
        provider_payout,
        vat_amount,
        total,
        provider_payout_per_unit: truncate2(provider_payout / quantity),
    }
}

/// Sums the stored (VAT-exclusive) lines of one invoice.
///
/// The aggregate VAT is taken from the summed totals, not summed per line.
pub fn aggregate(items: &[LineItem]) -> AggregateResult {
    let mut agg = items.iter().fold(AggregateResult::default(), |mut agg, item| {
        let line = compute_line(item, PriceBasis::VatExclusive);
        agg.subtotal += line.subtotal;
        agg.platform_fee += line.platform_fee;
        agg.provider_payout += line.provider_payout;
        agg.total += line.total;
        agg
    });

    agg.vat_amount = truncate2(agg.total - agg.subtotal);
    agg.currency = items.first().map(LineItem::currency);
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineDraft, PricingMode, ServiceType, DEFAULT_FEE_PERCENT};
    use proptest::prelude::*;

    fn line(quantity: u32, unit_price: f64) -> LineItem {
        line_with_fee(quantity, unit_price, DEFAULT_FEE_PERCENT)
    }

    fn line_with_fee(quantity: u32, unit_price: f64, fee_percent: f64) -> LineItem {
        let draft = LineDraft {
            quantity,
            unit_price,
            currency: Currency::Euro,
            discount_percent: 0,
            fee_percent,
        };
        LineItem::new(ServiceType::Venue, PricingMode::ByPeople, &draft).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn ten_people_at_fifty() {
        let result = compute_line(&line(10, 50.0), PriceBasis::VatExclusive);
        assert_eq!(result.subtotal, 500.0);
        assert_eq!(result.platform_fee, 15.0);
        assert_eq!(result.provider_payout, 485.0);
        assert_eq!(result.vat_amount, 105.0);
        assert_eq!(result.total, 605.0);
        assert_eq!(result.provider_payout_per_unit, 48.5);
    }

    #[test]
    fn truncates_instead_of_rounding() {
        let result = compute_line(&line(3, 19.99), PriceBasis::VatExclusive);
        assert_eq!(result.subtotal, 59.97);
        assert_eq!(result.total, 72.56);
        assert_eq!(result.platform_fee, 1.79);
        assert_eq!(result.provider_payout, 58.17);
        assert_eq!(result.vat_amount, 12.59);
        assert_eq!(result.provider_payout_per_unit, 19.39);
    }

    #[test]
    fn vat_inclusive_price_is_stripped_with_general_rate() {
        let result = compute_line(&line(1, 121.0), PriceBasis::VatInclusive);
        assert_eq!(result.subtotal, 100.0);
        assert_eq!(result.total, 121.0);
    }

    #[test]
    fn zero_vat_rate_keeps_total_equal_to_subtotal() {
        let item = line(7, 33.33).with_vat_rate(0.0);
        let result = compute_line(&item, PriceBasis::VatExclusive);
        assert_eq!(result.total, result.subtotal);
        assert_eq!(result.vat_amount, 0.0);
    }

    #[test]
    fn aggregates_two_lines() {
        let agg = aggregate(&[line(10, 50.0), line(1, 200.0)]);
        assert_eq!(agg.subtotal, 700.0);
        assert_eq!(agg.total, 847.0);
        assert_eq!(agg.vat_amount, 147.0);
        assert_eq!(agg.platform_fee, 21.0);
        assert_eq!(agg.provider_payout, 679.0);
        assert_eq!(agg.currency, Some(Currency::Euro));
    }

    #[test]
    fn empty_aggregate_is_zero_without_currency() {
        let agg = aggregate(&[]);
        assert_eq!(agg, AggregateResult::default());
        assert!(agg.currency.is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn subtotal_is_truncated_product(q in 1u32..1_000, cents in 0u32..1_000_000) {
            let p = f64::from(cents) / 100.0;
            let result = compute_line(&line(q, p), PriceBasis::VatExclusive);
            prop_assert_eq!(result.subtotal, (f64::from(q) * p * 100.0).floor() / 100.0);
        }

        #[test]
        fn total_never_below_subtotal(q in 1u32..1_000, p in 0.0f64..10_000.0) {
            let result = compute_line(&line(q, p), PriceBasis::VatExclusive);
            prop_assert!(result.total >= result.subtotal);
        }

        #[test]
        fn fee_and_payout_ignore_fee_percent(
            q in 1u32..500,
            p in 0.0f64..5_000.0,
            fee in 0.0f64..=20.0,
        ) {
            let result = compute_line(&line_with_fee(q, p, fee), PriceBasis::VatExclusive);
            prop_assert_eq!(result.platform_fee, (result.subtotal * 0.03 * 100.0).floor() / 100.0);
            prop_assert_eq!(
                result.provider_payout,
                (result.subtotal * 0.97 * 100.0).floor() / 100.0
            );
        }

        #[test]
        fn vat_inclusive_matches_pre_divided_price(q in 1u32..500, p in 0.0f64..5_000.0) {
            let inclusive = compute_line(&line(q, p), PriceBasis::VatInclusive);
            let exclusive = compute_line(&line(q, p / (1.0 + 0.21)), PriceBasis::VatExclusive);
            prop_assert_eq!(inclusive, exclusive);
        }

        #[test]
        fn aggregate_sums_do_not_depend_on_order(
            lines in prop::collection::vec((1u32..100, 0u32..100_000), 1..10)
        ) {
            let items: Vec<LineItem> = lines
                .iter()
                .map(|(q, cents)| line(*q, f64::from(*cents) / 100.0))
                .collect();
            let mut reversed = items.clone();
            reversed.reverse();

            let forward = aggregate(&items);
            let backward = aggregate(&reversed);
            prop_assert!(approx(forward.subtotal, backward.subtotal));
            prop_assert!(approx(forward.total, backward.total));
            prop_assert_eq!(forward.vat_amount, truncate2(forward.total - forward.subtotal));
        }
    }
}
