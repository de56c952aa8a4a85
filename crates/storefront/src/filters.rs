//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a product stock count for display.
///
/// Usage in templates: `{{ product.stock|stock_label }}`
#[askama::filter_fn]
pub fn stock_label(stock: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let stock = stock.to_string();
    Ok(match stock.as_str() {
        "0" => "Out of stock".to_string(),
        "1" => "1 left".to_string(),
        _ => format!("{stock} in stock"),
    })
}
