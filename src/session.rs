// 🗂️ Session - Loaded snapshots + the conversion state they drive
//
// A Session only exists once BOTH documents have loaded, so nothing can
// calculate against a half-loaded catalog or rate table.

use crate::catalog::{Catalog, CurrencyCode};
use crate::conversion::{ConversionState, Side};
use crate::error::{ConverterError, Result};
use crate::rates::RateTable;
use chrono::{DateTime, Utc};

/// What one side of the converter shows, plus the catalog it picks from.
///
/// Changes flow back through `Session::edit` and `Session::set_currency` with `side`.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountRow<'a> {
    pub side: Side,
    pub amount: String,
    pub selected_currency: Option<&'a CurrencyCode>,
    pub catalog: &'a Catalog,
}

impl<'a> AmountRow<'a> {
    pub fn display_name(&self) -> Option<&'a str> {
        self.selected_currency
            .and_then(|code| self.catalog.display_name(code))
    }

    /// Whether this row holds the user's literal input.
    pub fn is_authoritative(&self, state: &ConversionState) -> bool {
        state.edit_direction().authoritative_side() == self.side
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    state: ConversionState,
    loaded_at: DateTime<Utc>,
}

impl Session {
    pub fn new(catalog: Catalog, rates: RateTable) -> Self {
        let mut state = ConversionState::new();
        // Default picks can legitimately lack a rate; the error stays on the state for display
        let _ = state.on_rate_data_changed(rates);
        let _ = state.initialize(&catalog);

        Session {
            catalog,
            state,
            loaded_at: Utc::now(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    pub fn rates(&self) -> Option<&RateTable> {
        self.state.rates()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn row(&self, side: Side) -> AmountRow<'_> {
        AmountRow {
            side,
            amount: self.state.amount(side),
            selected_currency: self.state.code(side),
            catalog: &self.catalog,
        }
    }

    pub fn edit(&mut self, side: Side, amount: impl Into<String>) -> Result<()> {
        self.state.edit(side, amount)
    }

    pub fn set_currency(&mut self, side: Side, code: CurrencyCode) -> Result<()> {
        self.state.set_currency(side, code)
    }

    /// Move one side's selection `step` entries through the catalog.
    pub fn cycle_currency(&mut self, side: Side, step: isize) -> Result<()> {
        let next = self
            .catalog
            .cycle(self.state.code(side), step)
            .cloned();

        match next {
            Some(code) => self.state.set_currency(side, code),
            None => Ok(()),
        }
    }
}

/// Outcome of loading a session: ready to convert, or a terminal error to show.
#[derive(Debug, Clone)]
pub enum SessionStatus {
    Ready(Session),
    Failed(ConverterError),
}

impl SessionStatus {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionStatus::Ready(session) => Some(session),
            SessionStatus::Failed(_) => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            SessionStatus::Ready(session) => Some(session),
            SessionStatus::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ConverterError> {
        match self {
            SessionStatus::Ready(_) => None,
            SessionStatus::Failed(err) => Some(err),
        }
    }
}

impl From<Result<Session>> for SessionStatus {
    fn from(result: Result<Session>) -> Self {
        match result {
            Ok(session) => SessionStatus::Ready(session),
            Err(err) => SessionStatus::Failed(err),
        }
    }
}
