//! Conversion events and their `custom_data`

use contracts::{ContentItem, CustomData, EventName};

/// Currency used when the caller has no better one
pub const DEFAULT_CURRENCY: &str = "EUR";

/// `content_type` for product events
pub const PRODUCT_CONTENT_TYPE: &str = "product";

/// A user action with its business fields
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionEvent {
    PageView,
    Purchase {
        content_ids: Vec<String>,
        order_value: f64,
        currency: String,
    },
    CompleteRegistration {
        status: String,
    },
    InitiateCheckout {
        value: f64,
        currency: String,
    },
    ViewContent {
        content_name: String,
        content_ids: Vec<String>,
        value: f64,
        currency: String,
    },
    AddToCart {
        contents: Vec<ContentItem>,
        value: f64,
        currency: String,
    },
}

impl ConversionEvent {
    pub fn name(&self) -> EventName {
        match self {
            Self::PageView => EventName::PageView,
            Self::Purchase { .. } => EventName::Purchase,
            Self::CompleteRegistration { .. } => EventName::CompleteRegistration,
            Self::InitiateCheckout { .. } => EventName::InitiateCheckout,
            Self::ViewContent { .. } => EventName::ViewContent,
            Self::AddToCart { .. } => EventName::AddToCart,
        }
    }

    /// Event-specific fields in wire order
    pub fn custom_data(&self) -> CustomData {
        match self {
            Self::PageView => CustomData::default(),
            Self::Purchase {
                content_ids,
                order_value,
                currency,
            } => CustomData {
                currency: Some(currency.clone()),
                value: Some(format_value(*order_value)),
                content_type: Some(PRODUCT_CONTENT_TYPE.to_string()),
                content_ids: Some(content_ids.clone()),
                ..Default::default()
            },
            Self::CompleteRegistration { status } => CustomData {
                status: Some(status.clone()),
                ..Default::default()
            },
            Self::InitiateCheckout { value, currency } => CustomData {
                currency: Some(currency.clone()),
                value: Some(format_value(*value)),
                ..Default::default()
            },
            Self::ViewContent {
                content_name,
                content_ids,
                value,
                currency,
            } => CustomData {
                currency: Some(currency.clone()),
                value: Some(format_value(*value)),
                content_type: Some(PRODUCT_CONTENT_TYPE.to_string()),
                content_name: Some(content_name.clone()),
                content_ids: Some(content_ids.clone()),
                ..Default::default()
            },
            Self::AddToCart {
                contents,
                value,
                currency,
            } => CustomData {
                currency: Some(currency.clone()),
                value: Some(format_value(*value)),
                content_type: Some(PRODUCT_CONTENT_TYPE.to_string()),
                contents: Some(contents.clone()),
                ..Default::default()
            },
        }
    }
}

/// Format an amount with exactly two decimals, no thousands separator.
///
/// Rounds half away from zero on the shortest decimal form of `value`,
/// so `1.005` gives `"1.01"` even though its binary value is slightly less.
/// Non-finite input formats as `"0.00"`.
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }

    // `Display` for f64 never uses exponent notation
    let repr = value.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let frac: Vec<u8> = frac_part.bytes().map(|b| b - b'0').collect();

    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    digits.push(frac.first().copied().unwrap_or(0));
    digits.push(frac.get(1).copied().unwrap_or(0));

    if frac.get(2).is_some_and(|&d| d >= 5) {
        round_up(&mut digits);
    }

    let negative = value < 0.0 && digits.iter().any(|&d| d != 0);
    let split = digits.len() - 2;
    let to_str = |ds: &[u8]| -> String { ds.iter().map(|d| char::from(b'0' + d)).collect() };

    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        to_str(&digits[..split]),
        to_str(&digits[split..])
    )
}

/// Add one unit in the last place of a decimal digit string
fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}
