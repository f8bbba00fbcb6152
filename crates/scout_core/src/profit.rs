/// Amazon referral fee as a fraction of the sale price.
pub const AMAZON_FEE_RATE: f64 = 0.15;
/// eBay final value fee as a fraction of the sale price.
pub const EBAY_FEE_RATE: f64 = 0.13;

pub const MISSING_INPUT_HINT: &str = "Please enter COGS and both sale prices.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitField {
    Cogs,
    AmazonPrice,
    EbayPrice,
}

/// Calculator inputs exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfitInputs {
    pub cogs: String,
    pub amazon_price: String,
    pub ebay_price: String,
}

impl ProfitInputs {
    pub fn set(&mut self, field: ProfitField, value: String) {
        match field {
            ProfitField::Cogs => self.cogs = value,
            ProfitField::AmazonPrice => self.amazon_price = value,
            ProfitField::EbayPrice => self.ebay_price = value,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cogs.trim().is_empty()
            && self.amazon_price.trim().is_empty()
            && self.ebay_price.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelEstimate {
    pub profit: f64,
    /// `None` when the cost of goods is zero.
    pub roi_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitEstimate {
    pub amazon: ChannelEstimate,
    pub ebay: ChannelEstimate,
}

/// Returns `None` unless all three inputs parse as finite numbers.
pub fn estimate(inputs: &ProfitInputs) -> Option<ProfitEstimate> {
    let cogs = parse_amount(&inputs.cogs)?;
    let amazon_price = parse_amount(&inputs.amazon_price)?;
    let ebay_price = parse_amount(&inputs.ebay_price)?;
    Some(ProfitEstimate {
        amazon: channel(amazon_price, AMAZON_FEE_RATE, cogs),
        ebay: channel(ebay_price, EBAY_FEE_RATE, cogs),
    })
}

fn channel(price: f64, fee_rate: f64, cogs: f64) -> ChannelEstimate {
    let profit = price - price * fee_rate - cogs;
    let roi_percent = (cogs != 0.0).then(|| profit / cogs * 100.0);
    ChannelEstimate {
        profit,
        roi_percent,
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_start_matches('$')
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
