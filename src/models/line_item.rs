use std::fmt;

use clap::ValueEnum;

use crate::error::ValidationError;

/// VAT applied to every service type.
pub const STANDARD_VAT_RATE: f64 = 0.21;

/// Fee shown on the add-line form before the user changes it.
pub const DEFAULT_FEE_PERCENT: f64 = 14.5;

pub const MAX_FEE_PERCENT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceType {
    Venue,
    Catering,
    Transport,
    #[value(name = "audiovisual")]
    AudiovisualEquipment,
}

impl ServiceType {
    pub const ALL: &'static [ServiceType] = &[
        ServiceType::Venue,
        ServiceType::Catering,
        ServiceType::Transport,
        ServiceType::AudiovisualEquipment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Venue => "Venue",
            ServiceType::Catering => "Catering",
            ServiceType::Transport => "Transport",
            ServiceType::AudiovisualEquipment => "Audiovisual equipment",
        }
    }

    pub fn vat_rate(&self) -> f64 {
        match self {
            ServiceType::Venue
            | ServiceType::Catering
            | ServiceType::Transport
            | ServiceType::AudiovisualEquipment => STANDARD_VAT_RATE,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Currency {
    Euro,
    Sterling,
}

impl Currency {
    pub const ALL: &'static [Currency] = &[Currency::Euro, Currency::Sterling];

    pub fn symbol(&self) -> char {
        match self {
            Currency::Euro => '€',
            Currency::Sterling => '£',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Currency::Euro => "Euro €",
            Currency::Sterling => "Sterling £",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PricingMode {
    ByHour,
    ByPeople,
    FixedPrice,
}

impl PricingMode {
    pub const ALL: &'static [PricingMode] = &[
        PricingMode::ByHour,
        PricingMode::ByPeople,
        PricingMode::FixedPrice,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PricingMode::ByHour => "by hour",
            PricingMode::ByPeople => "by number of people",
            PricingMode::FixedPrice => "fixed price",
        }
    }

    /// Form label for the quantity field. Fixed prices have no quantity.
    pub fn quantity_label(&self) -> Option<&'static str> {
        match self {
            PricingMode::ByHour => Some("Number of hours"),
            PricingMode::ByPeople => Some("Number of people"),
            PricingMode::FixedPrice => None,
        }
    }

    pub fn price_label(&self) -> &'static str {
        match self {
            PricingMode::ByHour => "Price per hour",
            PricingMode::ByPeople => "Customer price per person",
            PricingMode::FixedPrice => "Customer price",
        }
    }

    /// Label for the per-unit payout shown under each table row.
    pub fn unit_price_caption(&self) -> &'static str {
        match self {
            PricingMode::ByHour => "Price per hour",
            PricingMode::ByPeople => "Price per person",
            PricingMode::FixedPrice => "Price",
        }
    }

    pub fn unit_noun(&self) -> &'static str {
        match self {
            PricingMode::ByHour => "Hours",
            PricingMode::ByPeople | PricingMode::FixedPrice => "People",
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw values of the add-line form once parsed into numbers but not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDraft {
    pub quantity: u32,
    pub unit_price: f64,
    pub currency: Currency,
    pub discount_percent: u32,
    pub fee_percent: f64,
}

/// One billable service entry. Only constructed through [`LineItem::new`],
/// so every instance satisfies quantity >= 1 and unit_price >= 0.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    service_type: ServiceType,
    quantity: u32,
    unit_price: f64,
    currency: Currency,
    discount_percent: u32,
    fee_percent: f64,
    vat_rate: f64,
    pricing_mode: PricingMode,
}

impl LineItem {
    pub fn new(
        service_type: ServiceType,
        pricing_mode: PricingMode,
        draft: &LineDraft,
    ) -> Result<Self, ValidationError> {
        let quantity = match pricing_mode {
            PricingMode::FixedPrice => 1,
            PricingMode::ByHour | PricingMode::ByPeople => draft.quantity,
        };

        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        if !draft.unit_price.is_finite() || draft.unit_price < 0.0 {
            return Err(ValidationError::InvalidPrice(draft.unit_price));
        }
        if draft.discount_percent > 100 {
            return Err(ValidationError::DiscountOutOfRange(draft.discount_percent));
        }
        if !(0.0..=MAX_FEE_PERCENT).contains(&draft.fee_percent) {
            return Err(ValidationError::FeeOutOfRange(draft.fee_percent));
        }

        Ok(Self {
            service_type,
            quantity,
            unit_price: draft.unit_price,
            currency: draft.currency,
            discount_percent: draft.discount_percent,
            fee_percent: draft.fee_percent,
            vat_rate: service_type.vat_rate(),
            pricing_mode,
        })
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn discount_percent(&self) -> u32 {
        self.discount_percent
    }

    pub fn fee_percent(&self) -> f64 {
        self.fee_percent
    }

    pub fn vat_rate(&self) -> f64 {
        self.vat_rate
    }

    pub fn pricing_mode(&self) -> PricingMode {
        self.pricing_mode
    }

    /// Same line with the VAT rate overridden. Used to check the
    /// zero-VAT edge of the calculator.
    #[cfg(test)]
    pub fn with_vat_rate(mut self, vat_rate: f64) -> Self {
        self.vat_rate = vat_rate;
        self
    }
}
