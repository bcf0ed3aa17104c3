// 🔁 Conversion State - Two linked amount fields
//
// Exactly one field is authoritative: the one the user last typed into.
// Its text is kept verbatim (including partial input like "12.").
// The other field is always round2(authoritative ⊗ rate), or blank when it can't be derived.

use crate::amount::{format_amount, parse_amount, round2};
use crate::catalog::{Catalog, CurrencyCode};
use crate::error::{ConverterError, Result};
use crate::rates::{compute_rate, RateTable};

// ============================================================================
// EDIT DIRECTION + SIDE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditDirection {
    /// User typed the source amount; target is derived
    #[default]
    Forward,
    /// User typed the target amount; source is derived
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn label(&self) -> &str {
        match self {
            Side::Source => "From",
            Side::Target => "To",
        }
    }
}

impl EditDirection {
    /// Side holding the user's literal input.
    pub fn authoritative_side(&self) -> Side {
        match self {
            EditDirection::Forward => Side::Source,
            EditDirection::Backward => Side::Target,
        }
    }
}

// ============================================================================
// CONVERSION STATE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionState {
    source_code: Option<CurrencyCode>,
    target_code: Option<CurrencyCode>,
    edit_direction: EditDirection,
    raw_amount: String,
    current_rate: Option<f64>,
    derived_amount: Option<f64>,
    rates: Option<RateTable>,
    last_error: Option<ConverterError>,
}

impl ConversionState {
    /// Fresh state: no currencies chosen, no rates, empty amount.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill unset currencies with the first two catalog entries, in catalog order.
    /// Codes the user already chose are left alone.
    pub fn initialize(&mut self, catalog: &Catalog) -> Result<()> {
        let mut entries = catalog.entries().iter();

        if self.source_code.is_none() {
            self.source_code = entries.next().map(|e| e.code.clone());
        } else {
            entries.next();
        }

        if self.target_code.is_none() {
            self.target_code = entries.next().map(|e| e.code.clone());
        }

        self.recompute()
    }

    pub fn edit_source(&mut self, amount: impl Into<String>) -> Result<()> {
        self.raw_amount = amount.into();
        self.edit_direction = EditDirection::Forward;
        self.recompute()
    }

    pub fn edit_target(&mut self, amount: impl Into<String>) -> Result<()> {
        self.raw_amount = amount.into();
        self.edit_direction = EditDirection::Backward;
        self.recompute()
    }

    pub fn edit(&mut self, side: Side, amount: impl Into<String>) -> Result<()> {
        match side {
            Side::Source => self.edit_source(amount),
            Side::Target => self.edit_target(amount),
        }
    }

    /// Change one side's currency. The field the user did not last type into is re-derived.
    pub fn set_currency(&mut self, side: Side, code: CurrencyCode) -> Result<()> {
        match side {
            Side::Source => self.source_code = Some(code),
            Side::Target => self.target_code = Some(code),
        }
        self.recompute()
    }

    /// Swap in a new rate table snapshot. Edit direction is kept.
    pub fn on_rate_data_changed(&mut self, rates: RateTable) -> Result<()> {
        self.rates = Some(rates);
        self.recompute()
    }

    fn recompute(&mut self) -> Result<()> {
        let outcome = self.derive();
        self.last_error = outcome.as_ref().err().cloned();
        outcome
    }

    fn derive(&mut self) -> Result<()> {
        self.current_rate = None;
        self.derived_amount = None;

        // Not ready until both currencies and a rate table are present
        let (Some(source), Some(target), Some(rates)) =
            (&self.source_code, &self.target_code, &self.rates)
        else {
            return Ok(());
        };

        let rate = compute_rate(source, target, rates)?;
        self.current_rate = Some(rate);

        // Cleared field: nothing to derive
        if self.raw_amount.trim().is_empty() {
            return Ok(());
        }

        let amount = parse_amount(&self.raw_amount)?;
        let derived = match self.edit_direction {
            EditDirection::Forward => amount * rate,
            EditDirection::Backward => amount / rate,
        };

        if !derived.is_finite() {
            return Err(ConverterError::RateUnavailable(format!("{}/{}", source, target)));
        }

        self.derived_amount = Some(round2(derived));
        Ok(())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn source_code(&self) -> Option<&CurrencyCode> {
        self.source_code.as_ref()
    }

    pub fn target_code(&self) -> Option<&CurrencyCode> {
        self.target_code.as_ref()
    }

    pub fn code(&self, side: Side) -> Option<&CurrencyCode> {
        match side {
            Side::Source => self.source_code(),
            Side::Target => self.target_code(),
        }
    }

    pub fn edit_direction(&self) -> EditDirection {
        self.edit_direction
    }

    pub fn raw_amount(&self) -> &str {
        &self.raw_amount
    }

    pub fn current_rate(&self) -> Option<f64> {
        self.current_rate
    }

    pub fn derived_amount(&self) -> Option<f64> {
        self.derived_amount
    }

    pub fn rates(&self) -> Option<&RateTable> {
        self.rates.as_ref()
    }

    pub fn last_error(&self) -> Option<&ConverterError> {
        self.last_error.as_ref()
    }

    /// Text shown in one side's amount field.
    pub fn amount(&self, side: Side) -> String {
        if side == self.edit_direction.authoritative_side() {
            self.raw_amount.clone()
        } else {
            self.derived_amount.map(format_amount).unwrap_or_default()
        }
    }

    pub fn source_amount(&self) -> String {
        self.amount(Side::Source)
    }

    pub fn target_amount(&self) -> String {
        self.amount(Side::Target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    fn usd_eur_table() -> RateTable {
        RateTable::from_json(r#"{"base": "USD", "rates": {"USD": 1, "EUR": 0.9}}"#).unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{"USD": "United States Dollar", "EUR": "Euro", "GBP": "British Pound Sterling"}"#,
        )
        .unwrap()
    }

    fn ready_state() -> ConversionState {
        let mut state = ConversionState::new();
        state.on_rate_data_changed(usd_eur_table()).unwrap();
        state.initialize(&catalog()).unwrap();
        state
    }

    #[test]
    fn test_initialize_picks_first_two_entries() {
        let mut state = ConversionState::new();
        state.initialize(&catalog()).unwrap();

        assert_eq!(state.source_code(), Some(&code("USD")));
        assert_eq!(state.target_code(), Some(&code("EUR")));
    }

    #[test]
    fn test_initialize_keeps_user_choice() {
        let mut state = ConversionState::new();
        state.set_currency(Side::Target, code("GBP")).unwrap();
        state.initialize(&catalog()).unwrap();

        assert_eq!(state.source_code(), Some(&code("USD")));
        assert_eq!(state.target_code(), Some(&code("GBP")));

        let mut state = ConversionState::new();
        state.set_currency(Side::Source, code("GBP")).unwrap();
        state.initialize(&catalog()).unwrap();

        assert_eq!(state.source_code(), Some(&code("GBP")));
        assert_eq!(state.target_code(), Some(&code("EUR")));
    }

    #[test]
    fn test_initialize_short_catalog() {
        let single = Catalog::from_json(r#"{"USD": "United States Dollar"}"#).unwrap();
        let mut state = ConversionState::new();
        state.initialize(&single).unwrap();

        assert_eq!(state.source_code(), Some(&code("USD")));
        assert_eq!(state.target_code(), None);

        let mut state = ConversionState::new();
        state.initialize(&Catalog::default()).unwrap();
        assert_eq!(state.source_code(), None);
    }

    #[test]
    fn test_edit_source_derives_target() {
        let mut state = ready_state();
        state.edit_source("100").unwrap();

        assert_eq!(state.edit_direction(), EditDirection::Forward);
        assert_eq!(state.source_amount(), "100");
        assert_eq!(state.target_amount(), "90.00");
    }

    #[test]
    fn test_edit_target_derives_source() {
        let mut state = ready_state();
        state.edit_target("90").unwrap();

        assert_eq!(state.edit_direction(), EditDirection::Backward);
        assert_eq!(state.target_amount(), "90");
        assert_eq!(state.source_amount(), "100.00");
    }

    #[test]
    fn test_round_trip_within_a_cent() {
        let mut rates = std::collections::HashMap::new();
        rates.insert(code("USD"), 1.0);
        rates.insert(code("EUR"), 0.917_3);
        let mut state = ConversionState::new();
        state
            .on_rate_data_changed(RateTable::new(code("USD"), rates))
            .unwrap();
        state.initialize(&catalog()).unwrap();

        for input in ["100", "12.34", "0.5", "9999.99"] {
            state.edit_source(input).unwrap();
            let derived = state.target_amount();
            state.edit_target(derived).unwrap();

            let back: f64 = state.source_amount().parse().unwrap();
            let original: f64 = input.parse().unwrap();
            assert!(
                (back - original).abs() <= 0.01 + 1e-9,
                "{} came back as {}",
                input,
                back
            );
        }
    }

    #[test]
    fn test_authoritative_field_not_rounded() {
        let mut state = ready_state();
        state.edit_source("12.").unwrap();

        assert_eq!(state.source_amount(), "12.");
        assert_eq!(state.target_amount(), "10.80");
    }

    #[test]
    fn test_invalid_amount_keeps_raw_text() {
        let mut state = ready_state();
        state.edit_source("100").unwrap();

        let err = state.edit_source("1.234").unwrap_err();
        assert!(matches!(err, ConverterError::InvalidAmount { .. }));
        assert_eq!(state.source_amount(), "1.234");
        assert_eq!(state.target_amount(), "");
        assert_eq!(state.last_error(), Some(&err));

        // Rate is still known; only the amount was bad
        assert!(state.current_rate().is_some());

        state.edit_source("2").unwrap();
        assert_eq!(state.target_amount(), "1.80");
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_zero_and_negative_rejected() {
        let mut state = ready_state();
        assert!(matches!(
            state.edit_target("0"),
            Err(ConverterError::InvalidAmount { .. })
        ));
        assert!(matches!(
            state.edit_target("-3"),
            Err(ConverterError::InvalidAmount { .. })
        ));
        assert_eq!(state.source_amount(), "");
    }

    #[test]
    fn test_cleared_field_is_not_an_error() {
        let mut state = ready_state();
        state.edit_source("100").unwrap();
        state.edit_source("").unwrap();

        assert_eq!(state.target_amount(), "");
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_set_currency_rederives_non_edited_side() {
        let mut rates = std::collections::HashMap::new();
        rates.insert(code("USD"), 1.0);
        rates.insert(code("EUR"), 0.9);
        rates.insert(code("GBP"), 0.8);
        let mut state = ConversionState::new();
        state
            .on_rate_data_changed(RateTable::new(code("USD"), rates))
            .unwrap();
        state.initialize(&catalog()).unwrap();

        // Backward edit: source stays derived after changing the target currency
        state.edit_target("90").unwrap();
        state.set_currency(Side::Target, code("GBP")).unwrap();

        assert_eq!(state.edit_direction(), EditDirection::Backward);
        assert_eq!(state.target_amount(), "90");
        assert_eq!(state.source_amount(), "112.50");
    }

    #[test]
    fn test_unavailable_rate_blocks_derivation() {
        let mut state = ready_state();
        state.edit_source("100").unwrap();

        let err = state.set_currency(Side::Target, code("GBP")).unwrap_err();
        assert_eq!(err, ConverterError::RateUnavailable("GBP".to_string()));
        assert_eq!(state.source_amount(), "100");
        assert_eq!(state.target_amount(), "");
        assert_eq!(state.current_rate(), None);
    }

    #[test]
    fn test_rate_refresh_keeps_direction() {
        let mut state = ready_state();
        state.edit_target("90").unwrap();

        let mut rates = std::collections::HashMap::new();
        rates.insert(code("USD"), 1.0);
        rates.insert(code("EUR"), 0.75);
        state
            .on_rate_data_changed(RateTable::new(code("USD"), rates))
            .unwrap();

        assert_eq!(state.edit_direction(), EditDirection::Backward);
        assert_eq!(state.target_amount(), "90");
        assert_eq!(state.source_amount(), "120.00");
    }

    #[test]
    fn test_rate_refresh_is_idempotent() {
        let mut state = ready_state();
        state.edit_source("42.5").unwrap();

        state.on_rate_data_changed(usd_eur_table()).unwrap();
        let first = state.clone();
        state.on_rate_data_changed(usd_eur_table()).unwrap();

        assert_eq!(state, first);
    }

    #[test]
    fn test_nothing_runs_before_data() {
        let mut state = ConversionState::new();
        state.edit_source("100").unwrap();

        assert_eq!(state.current_rate(), None);
        assert_eq!(state.target_amount(), "");
    }

    #[test]
    fn test_same_currency_conversion() {
        let mut state = ready_state();
        state.set_currency(Side::Target, code("USD")).unwrap();
        state.edit_source("10").unwrap();

        assert_eq!(state.current_rate(), Some(1.0));
        assert_eq!(state.target_amount(), "10.00");
    }
}
