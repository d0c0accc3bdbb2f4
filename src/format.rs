use crate::calc::{AggregateResult, LineResult};
use crate::models::{Currency, LineItem};

/// `"<amount> <symbol>"` with two decimals.
pub fn amount(value: f64, currency: Currency) -> String {
    format!("{:.2} {}", value, currency.symbol())
}

fn percent(value: f64) -> String {
    // drops float noise such as 21.000000000000004
    format!("{}", (value * 10.0).round() / 10.0)
}

/// First column of a table row, e.g. `Venue - 10 People`.
pub fn line_caption(item: &LineItem) -> String {
    if item.quantity() > 1 {
        format!(
            "{} - {} {}",
            item.service_type(),
            item.quantity(),
            item.pricing_mode().unit_noun()
        )
    } else {
        item.service_type().to_string()
    }
}

/// Annotation printed under a table row. The discount is only mentioned when set.
pub fn line_detail(item: &LineItem, result: &LineResult) -> String {
    let mut detail = format!(
        "{}: {}",
        item.pricing_mode().unit_price_caption(),
        amount(result.provider_payout_per_unit, item.currency())
    );
    if item.discount_percent() > 0 {
        detail.push_str(&format!(" - Discount: {}%", item.discount_percent()));
    }
    detail.push_str(&format!(
        " - Fee: {}% - VAT: {}%",
        percent(item.fee_percent()),
        percent(item.vat_rate() * 100.0)
    ));
    detail
}

/// The summary block under the table, or `None` when there is no line to
/// take a currency from.
pub fn totals(agg: &AggregateResult) -> Option<[(&'static str, String); 3]> {
    let currency = agg.currency?;
    Some([
        ("Subtotal", amount(agg.subtotal, currency)),
        ("VAT", amount(agg.vat_amount, currency)),
        ("Total", amount(agg.total, currency)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{compute_line, PriceBasis};
    use crate::models::{LineDraft, PricingMode, ServiceType};

    fn item(pricing_mode: PricingMode, quantity: u32, discount_percent: u32) -> LineItem {
        let draft = LineDraft {
            quantity,
            unit_price: 50.0,
            currency: Currency::Euro,
            discount_percent,
            fee_percent: 14.5,
        };
        LineItem::new(ServiceType::Venue, pricing_mode, &draft).unwrap()
    }

    #[test]
    fn amounts_keep_two_decimals() {
        assert_eq!(amount(605.0, Currency::Euro), "605.00 €");
        assert_eq!(amount(72.56, Currency::Sterling), "72.56 £");
    }

    #[test]
    fn caption_mentions_quantity_above_one() {
        assert_eq!(line_caption(&item(PricingMode::ByPeople, 10, 0)), "Venue - 10 People");
        assert_eq!(line_caption(&item(PricingMode::ByHour, 3, 0)), "Venue - 3 Hours");
        assert_eq!(line_caption(&item(PricingMode::FixedPrice, 1, 0)), "Venue");
    }

    #[test]
    fn detail_line_shows_payout_per_unit() {
        let line = item(PricingMode::ByPeople, 10, 0);
        let result = compute_line(&line, PriceBasis::VatExclusive);
        assert_eq!(
            line_detail(&line, &result),
            "Price per person: 48.50 € - Fee: 14.5% - VAT: 21%"
        );
    }

    #[test]
    fn detail_line_mentions_discount_when_set() {
        let line = item(PricingMode::ByHour, 2, 10);
        let result = compute_line(&line, PriceBasis::VatExclusive);
        assert_eq!(
            line_detail(&line, &result),
            "Price per hour: 48.50 € - Discount: 10% - Fee: 14.5% - VAT: 21%"
        );
    }

    #[test]
    fn totals_need_a_currency() {
        assert!(totals(&AggregateResult::default()).is_none());

        let agg = AggregateResult {
            subtotal: 700.0,
            vat_amount: 147.0,
            total: 847.0,
            currency: Some(Currency::Euro),
            ..AggregateResult::default()
        };
        let rows = totals(&agg).unwrap();
        assert_eq!(rows[2], ("Total", "847.00 €".to_string()));
    }
}
