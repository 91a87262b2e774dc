//! # Validation Module
//!
//! Turns an untrusted [`LineItemRequest`] into a typed [`LineItemInput`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Shape checks: numbers are numbers, lists are lists                │
//! │  └── Every field optional, nothing rejected for being absent           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields present                                           │
//! │  ├── Weights > 0, rates ≥ 0, percentages within 0..=100                │
//! │  ├── Every quantity, weight, rate and amount within its cap            │
//! │  ├── Policy tags parsed into enums                                     │
//! │  └── Missing line GST rates resolved from the shop config              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine (pricing.rs) - infallible on a LineItemInput          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing field is reported; field paths follow the JSON
//! spelling (`gemstoneBreakdown[0].ratePerCarat`).

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::{
    DiscountPolicy, DiscountType, GemstoneLine, GemstoneLineRequest, LineItemInput,
    LineItemRequest, MakingChargePolicy, MakingChargeType, MaterialLine, MaterialLineRequest,
    ShopTaxConfig,
};
use crate::{
    MAX_BREAKDOWN_LINES, MAX_DISCOUNT_AMOUNT, MAX_ITEM_QUANTITY, MAX_PERCENTAGE, MAX_RATE,
    MAX_WEIGHT,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Line Item
// =============================================================================

/// Validates a line-item request against a shop's tax configuration.
///
/// ## Defaults
/// - `gemstoneBreakdown` absent → no gemstones
/// - `wastagePercentage` absent → 0
/// - `discountType` absent → `AMOUNT`
/// - `discountValue` absent → 0
/// - a line's `gstRate` absent → `tax.gst_gold_rate`
///
/// ## Example
/// ```rust
/// use ratna_core::types::{LineItemRequest, ShopTaxConfig};
/// use ratna_core::validation::validate_line_item;
///
/// let empty = LineItemRequest { quantity: Some(1), ..Default::default() };
/// assert!(validate_line_item(&empty, &ShopTaxConfig::default()).is_err());
/// ```
pub fn validate_line_item(
    request: &LineItemRequest,
    tax: &ShopTaxConfig,
) -> ValidationResult<LineItemInput> {
    validate_tax_config(tax)?;

    let quantity = validate_quantity(request.quantity)?;

    let material_requests = match request.material_breakdown.as_deref() {
        None => return Err(required("materialBreakdown")),
        Some([]) => {
            return Err(ValidationError::Empty {
                field: "materialBreakdown".to_string(),
            })
        }
        Some(lines) => lines,
    };
    validate_line_count("materialBreakdown", material_requests.len())?;

    let materials = material_requests
        .iter()
        .enumerate()
        .map(|(index, line)| validate_material_line(index, line, tax))
        .collect::<ValidationResult<Vec<_>>>()?;

    let gemstone_requests = request.gemstone_breakdown.as_deref().unwrap_or_default();
    validate_line_count("gemstoneBreakdown", gemstone_requests.len())?;

    let gemstones = gemstone_requests
        .iter()
        .enumerate()
        .map(|(index, line)| validate_gemstone_line(index, line, tax))
        .collect::<ValidationResult<Vec<_>>>()?;

    let making = validate_making_charge(request)?;

    let gross_weight = request
        .gross_weight
        .ok_or_else(|| required("grossWeight"))?;
    validate_weight("grossWeight", gross_weight)?;

    let discount = validate_discount(
        request.discount_type.as_deref(),
        request.discount_value,
    )?;

    Ok(LineItemInput {
        quantity,
        materials,
        gemstones,
        making,
        gross_weight,
        discount,
    })
}

fn validate_material_line(
    index: usize,
    line: &MaterialLineRequest,
    tax: &ShopTaxConfig,
) -> ValidationResult<MaterialLine> {
    let path = |field: &str| format!("materialBreakdown[{}].{}", index, field);

    let weight = line.weight.ok_or_else(|| required(&path("weight")))?;
    validate_weight(&path("weight"), weight)?;

    let rate_per_gram = line
        .rate_per_gram
        .ok_or_else(|| required(&path("ratePerGram")))?;
    validate_rate(&path("ratePerGram"), rate_per_gram)?;

    let gst_rate = line.gst_rate.unwrap_or(tax.gst_gold_rate);
    validate_percentage(&path("gstRate"), gst_rate)?;

    Ok(MaterialLine {
        name: line.name.clone(),
        weight,
        rate_per_gram,
        gst_rate,
    })
}

fn validate_gemstone_line(
    index: usize,
    line: &GemstoneLineRequest,
    tax: &ShopTaxConfig,
) -> ValidationResult<GemstoneLine> {
    let path = |field: &str| format!("gemstoneBreakdown[{}].{}", index, field);

    let weight = line.weight.ok_or_else(|| required(&path("weight")))?;
    validate_weight(&path("weight"), weight)?;

    let rate_per_carat = line
        .rate_per_carat
        .ok_or_else(|| required(&path("ratePerCarat")))?;
    validate_rate(&path("ratePerCarat"), rate_per_carat)?;

    let gst_rate = line.gst_rate.unwrap_or(tax.gst_gold_rate);
    validate_percentage(&path("gstRate"), gst_rate)?;

    Ok(GemstoneLine {
        name: line.name.clone(),
        weight,
        rate_per_carat,
        gst_rate,
    })
}

fn validate_making_charge(request: &LineItemRequest) -> ValidationResult<MakingChargePolicy> {
    let tag = request
        .making_charge_type
        .as_deref()
        .ok_or_else(|| required("makingChargeType"))?;
    let charge_type = parse_making_charge_type(tag)?;

    let rate = request
        .making_charge_rate
        .ok_or_else(|| required("makingChargeRate"))?;
    validate_rate("makingChargeRate", rate)?;

    let wastage_percentage = request.wastage_percentage.unwrap_or(Decimal::ZERO);
    validate_percentage("wastagePercentage", wastage_percentage)?;

    Ok(MakingChargePolicy {
        charge_type,
        rate,
        wastage_percentage,
    })
}

/// Validates an optional discount pair, applying the defaults.
///
/// ## Rules
/// - type absent → `AMOUNT`; value absent → 0 (no discount)
/// - value must not be negative
/// - a `PERCENTAGE` value must not exceed 100
/// - an `AMOUNT` value must not exceed [`MAX_DISCOUNT_AMOUNT`]
pub fn validate_discount(
    discount_type: Option<&str>,
    discount_value: Option<Decimal>,
) -> ValidationResult<DiscountPolicy> {
    let discount_type = match discount_type {
        Some(tag) => parse_discount_type(tag)?,
        None => DiscountType::default(),
    };

    let value = discount_value.unwrap_or(Decimal::ZERO);
    validate_non_negative("discountValue", value)?;
    match discount_type {
        DiscountType::Percentage => validate_percentage("discountValue", value)?,
        DiscountType::Amount => validate_at_most("discountValue", value, MAX_DISCOUNT_AMOUNT)?,
    }

    Ok(DiscountPolicy {
        discount_type,
        value,
    })
}

/// Validates the shop-level GST rates.
pub fn validate_tax_config(tax: &ShopTaxConfig) -> ValidationResult<()> {
    validate_percentage("gstGoldRate", tax.gst_gold_rate)?;
    validate_percentage("gstMakingRate", tax.gst_making_rate)?;
    Ok(())
}

// =============================================================================
// Policy Tags
// =============================================================================

/// Parses a making-charge tag, rejecting anything unrecognized.
///
/// ## Example
/// ```rust
/// use ratna_core::types::MakingChargeType;
/// use ratna_core::validation::parse_making_charge_type;
///
/// assert_eq!(parse_making_charge_type("per_gram").unwrap(), MakingChargeType::PerGram);
/// assert!(parse_making_charge_type("PER_PIECE").is_err());
/// ```
pub fn parse_making_charge_type(tag: &str) -> ValidationResult<MakingChargeType> {
    MakingChargeType::parse(tag).ok_or_else(|| ValidationError::UnknownPolicy {
        field: "makingChargeType".to_string(),
        value: tag.to_string(),
        allowed: MakingChargeType::ALLOWED.iter().map(|s| s.to_string()).collect(),
    })
}

/// Parses a discount tag, rejecting anything unrecognized.
pub fn parse_discount_type(tag: &str) -> ValidationResult<DiscountType> {
    DiscountType::parse(tag).ok_or_else(|| ValidationError::UnknownPolicy {
        field: "discountType".to_string(),
        value: tag.to_string(),
        allowed: DiscountType::ALLOWED.iter().map(|s| s.to_string()).collect(),
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be present
/// - Must be positive (≥ 1)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(quantity: Option<i64>) -> ValidationResult<u32> {
    let quantity = quantity.ok_or_else(|| required("quantity"))?;

    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    u32::try_from(quantity).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: MAX_ITEM_QUANTITY,
    })
}

/// A weight: positive and at most [`MAX_WEIGHT`].
pub fn validate_weight(field: &str, value: Decimal) -> ValidationResult<()> {
    validate_positive(field, value)?;
    validate_at_most(field, value, MAX_WEIGHT)
}

/// A rate: non-negative and at most [`MAX_RATE`].
pub fn validate_rate(field: &str, value: Decimal) -> ValidationResult<()> {
    validate_non_negative(field, value)?;
    validate_at_most(field, value, MAX_RATE)
}

fn validate_at_most(field: &str, value: Decimal, max: i64) -> ValidationResult<()> {
    if value > Decimal::from(max) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }
    Ok(())
}

fn validate_line_count(field: &str, count: usize) -> ValidationResult<()> {
    if count > MAX_BREAKDOWN_LINES {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_BREAKDOWN_LINES as i64,
        });
    }
    Ok(())
}

/// Value must be strictly greater than zero (weights).
pub fn validate_positive(field: &str, value: Decimal) -> ValidationResult<()> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Value must be zero or greater (rates, amounts).
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Value must be a percentage within 0..=100.
pub fn validate_percentage(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO || value > Decimal::from(MAX_PERCENTAGE) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PERCENTAGE,
        });
    }
    Ok(())
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gold_line() -> MaterialLineRequest {
        MaterialLineRequest {
            name: Some("Gold 22K".to_string()),
            weight: Some(dec!(10)),
            rate_per_gram: Some(dec!(6000)),
            gst_rate: Some(dec!(3)),
        }
    }

    fn valid_request() -> LineItemRequest {
        LineItemRequest {
            quantity: Some(1),
            material_breakdown: Some(vec![gold_line()]),
            gemstone_breakdown: None,
            making_charge_type: Some("PERCENTAGE".to_string()),
            making_charge_rate: Some(dec!(10)),
            gross_weight: Some(dec!(10)),
            wastage_percentage: None,
            discount_type: None,
            discount_value: None,
        }
    }

    fn expect_err(request: &LineItemRequest) -> ValidationError {
        validate_line_item(request, &ShopTaxConfig::default()).unwrap_err()
    }

    #[test]
    fn test_valid_request_applies_defaults() {
        let input = validate_line_item(&valid_request(), &ShopTaxConfig::default()).unwrap();

        assert_eq!(input.quantity, 1);
        assert_eq!(input.materials.len(), 1);
        assert!(input.gemstones.is_empty());
        assert_eq!(input.making.charge_type, MakingChargeType::Percentage);
        assert_eq!(input.making.wastage_percentage, Decimal::ZERO);
        assert_eq!(input.discount.discount_type, DiscountType::Amount);
        assert_eq!(input.discount.value, Decimal::ZERO);
    }

    #[test]
    fn test_missing_line_gst_falls_back_to_shop_rate() {
        let mut request = valid_request();
        request.material_breakdown = Some(vec![MaterialLineRequest {
            gst_rate: None,
            ..gold_line()
        }]);
        request.gemstone_breakdown = Some(vec![GemstoneLineRequest {
            name: None,
            weight: Some(dec!(1)),
            rate_per_carat: Some(dec!(40000)),
            gst_rate: None,
        }]);

        let tax = ShopTaxConfig::new(dec!(3.5), dec!(5));
        let input = validate_line_item(&request, &tax).unwrap();

        assert_eq!(input.materials[0].gst_rate, dec!(3.5));
        assert_eq!(input.gemstones[0].gst_rate, dec!(3.5));
    }

    #[test]
    fn test_line_gst_overrides_shop_rate() {
        let tax = ShopTaxConfig::new(dec!(18), dec!(5));
        let input = validate_line_item(&valid_request(), &tax).unwrap();
        assert_eq!(input.materials[0].gst_rate, dec!(3));
    }

    #[test]
    fn test_empty_materials_rejected() {
        let mut request = valid_request();
        request.material_breakdown = Some(vec![]);
        assert_eq!(
            expect_err(&request),
            ValidationError::Empty {
                field: "materialBreakdown".to_string()
            }
        );

        request.material_breakdown = None;
        assert_eq!(expect_err(&request).field(), "materialBreakdown");
    }

    #[test]
    fn test_quantity_rules() {
        let mut request = valid_request();

        request.quantity = Some(0);
        assert!(matches!(expect_err(&request), ValidationError::MustBePositive { .. }));

        request.quantity = Some(-2);
        assert!(matches!(expect_err(&request), ValidationError::MustBePositive { .. }));

        request.quantity = None;
        assert!(matches!(expect_err(&request), ValidationError::Required { .. }));

        request.quantity = Some(1000);
        assert!(matches!(expect_err(&request), ValidationError::OutOfRange { .. }));

        request.quantity = Some(i64::from(u32::MAX) + 1);
        assert!(matches!(expect_err(&request), ValidationError::OutOfRange { .. }));

        request.quantity = Some(MAX_ITEM_QUANTITY);
        assert!(validate_line_item(&request, &ShopTaxConfig::default()).is_ok());
    }

    #[test]
    fn test_line_field_paths() {
        let mut request = valid_request();
        request.material_breakdown = Some(vec![
            gold_line(),
            MaterialLineRequest {
                weight: Some(dec!(0)),
                ..gold_line()
            },
        ]);
        assert_eq!(expect_err(&request).field(), "materialBreakdown[1].weight");

        let mut request = valid_request();
        request.gemstone_breakdown = Some(vec![GemstoneLineRequest {
            name: None,
            weight: Some(dec!(0.5)),
            rate_per_carat: Some(dec!(-1)),
            gst_rate: None,
        }]);
        assert_eq!(
            expect_err(&request).field(),
            "gemstoneBreakdown[0].ratePerCarat"
        );
    }

    #[test]
    fn test_gst_rate_range() {
        let mut request = valid_request();
        request.material_breakdown = Some(vec![MaterialLineRequest {
            gst_rate: Some(dec!(101)),
            ..gold_line()
        }]);
        assert!(matches!(expect_err(&request), ValidationError::OutOfRange { .. }));

        let bad_shop = ShopTaxConfig::new(dec!(3), dec!(-5));
        let err = validate_line_item(&valid_request(), &bad_shop).unwrap_err();
        assert_eq!(err.field(), "gstMakingRate");
    }

    #[test]
    fn test_unknown_making_charge_type_rejected() {
        let mut request = valid_request();
        request.making_charge_type = Some("PER_PIECE".to_string());

        match expect_err(&request) {
            ValidationError::UnknownPolicy { field, value, allowed } => {
                assert_eq!(field, "makingChargeType");
                assert_eq!(value, "PER_PIECE");
                assert_eq!(allowed.len(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_making_charge_required_fields() {
        let mut request = valid_request();
        request.making_charge_type = None;
        assert_eq!(expect_err(&request).field(), "makingChargeType");

        let mut request = valid_request();
        request.making_charge_rate = None;
        assert_eq!(expect_err(&request).field(), "makingChargeRate");

        let mut request = valid_request();
        request.gross_weight = Some(dec!(0));
        assert_eq!(expect_err(&request).field(), "grossWeight");

        let mut request = valid_request();
        request.wastage_percentage = Some(dec!(-1));
        assert_eq!(expect_err(&request).field(), "wastagePercentage");
    }

    #[test]
    fn test_validate_discount() {
        let policy = validate_discount(None, None).unwrap();
        assert_eq!(policy, DiscountPolicy::default());

        let policy = validate_discount(Some("percentage"), Some(dec!(10))).unwrap();
        assert_eq!(policy.discount_type, DiscountType::Percentage);

        // A flat discount may exceed 100.
        assert!(validate_discount(Some("AMOUNT"), Some(dec!(5000))).is_ok());

        assert!(validate_discount(Some("PERCENTAGE"), Some(dec!(100.01))).is_err());
        assert!(validate_discount(None, Some(dec!(-1))).is_err());
        assert!(validate_discount(Some("BOGO"), Some(dec!(1))).is_err());
    }

    #[test]
    fn test_validate_non_negative_accepts_zero() {
        assert!(validate_non_negative("rate", dec!(0)).is_ok());
        assert!(validate_non_negative("rate", dec!(-0.00)).is_ok());
        assert!(validate_non_negative("rate", dec!(-0.01)).is_err());
    }

    #[test]
    fn test_caps_on_weights_and_rates() {
        let mut request = valid_request();
        request.material_breakdown = Some(vec![MaterialLineRequest {
            weight: Some(dec!(100000.01)),
            ..gold_line()
        }]);
        assert_eq!(expect_err(&request).field(), "materialBreakdown[0].weight");

        let mut request = valid_request();
        request.material_breakdown = Some(vec![MaterialLineRequest {
            rate_per_gram: Some(dec!(10000000000)),
            ..gold_line()
        }]);
        assert_eq!(expect_err(&request).field(), "materialBreakdown[0].ratePerGram");

        let mut request = valid_request();
        request.gross_weight = Some(dec!(100000000000000000000));
        assert_eq!(expect_err(&request).field(), "grossWeight");

        let mut request = valid_request();
        request.making_charge_rate = Some(dec!(100000001));
        assert_eq!(expect_err(&request).field(), "makingChargeRate");

        let mut request = valid_request();
        request.wastage_percentage = Some(dec!(150));
        assert_eq!(expect_err(&request).field(), "wastagePercentage");
    }

    #[test]
    fn test_caps_on_line_counts_and_discount() {
        let mut request = valid_request();
        request.material_breakdown = Some(vec![gold_line(); MAX_BREAKDOWN_LINES + 1]);
        assert_eq!(expect_err(&request).field(), "materialBreakdown");

        assert!(validate_discount(Some("AMOUNT"), Some(Decimal::from(MAX_DISCOUNT_AMOUNT))).is_ok());
        let err = validate_discount(None, Some(dec!(1000000000000.01))).unwrap_err();
        assert_eq!(err.field(), "discountValue");
    }
}
