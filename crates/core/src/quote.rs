//! Price Quotes

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::money::format_price;

/// Breakdown of a computed price.
///
/// Each adjustment is the unrounded change contributed by one pricing step;
/// only `final_price` is rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Base price per kilogram times weight.
    pub base_price: Decimal,

    /// Added by tiers beyond the first.
    pub layer_surcharge: Decimal,

    /// Change from the topping multiplier.
    pub topping_adjustment: Decimal,

    /// Change from the event multiplier.
    pub event_adjustment: Decimal,

    /// Added by fillings beyond the first.
    pub filling_surcharge: Decimal,

    /// Change from the complexity multiplier.
    pub complexity_adjustment: Decimal,

    /// Final price in whole currency units.
    pub final_price: i64,

    /// Version of the catalog the quote was computed with.
    pub catalog_version: String,
}

impl PriceQuote {
    /// Steps of the breakdown as `(label, delta)` pairs.
    pub fn steps(&self) -> [(&'static str, Decimal); 6] {
        [
            ("Base price", self.base_price),
            ("Layers", self.layer_surcharge),
            ("Topping", self.topping_adjustment),
            ("Event", self.event_adjustment),
            ("Fillings", self.filling_surcharge),
            ("Complexity", self.complexity_adjustment),
        ]
    }

    /// Render the breakdown as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write, currency: &'static Currency) -> io::Result<()> {
        let mut builder = Builder::default();

        builder.push_record(["Step", "Amount"]);

        for (label, delta) in self.steps() {
            builder.push_record([label.to_string(), delta.round_dp(2).to_string()]);
        }

        builder.push_record([
            "Total".to_string(),
            format_price(self.final_price, currency),
        ]);

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, "Catalog: {}", self.catalog_version)
    }
}
