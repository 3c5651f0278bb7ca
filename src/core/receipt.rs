//! Receipt and notification formatting.
//!
//! Pure string building: a plain text receipt for printing, a chat formatted
//! summary, and the deep link that hands that summary to a messaging app.

use crate::{
    config::ReceiptSettings,
    core::billing::BillingPeriod,
    errors::{Error, Result},
    models::{Bill, Payment, Tenant},
};
use chrono::NaiveDate;
use url::Url;

const RULE: &str = "----------------------------------------";

/// First and last day of a billing period.
#[must_use]
pub fn billing_period_range(period: BillingPeriod) -> (NaiveDate, NaiveDate) {
    (period.first_day(), period.last_day())
}

/// "01 Mar 2024 - 31 Mar 2024" for a stored period, or the raw value when it
/// does not parse.
fn period_range_label(billing_period: &str) -> String {
    billing_period.parse::<BillingPeriod>().map_or_else(
        |_| billing_period.to_string(),
        |period| {
            let (from, to) = billing_period_range(period);
            format!("{} - {}", format_date(from), format_date(to))
        },
    )
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Groups digits the Indian way: the last three, then pairs.
fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// Formats an amount with the currency symbol, e.g. `₹1,23,456` or
/// `₹9,560.50`. Paise are shown only when non-zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let paise = (amount.abs() * 100.0).round() as u64;
    let whole = group_digits(paise / 100);
    match paise % 100 {
        0 => format!("{sign}{symbol}{whole}"),
        fraction => format!("{sign}{symbol}{whole}.{fraction:02}"),
    }
}

/// Rate implied by a bill's electricity line; bills do not store the rate.
#[allow(clippy::cast_precision_loss)]
fn implied_rate(bill: &Bill) -> f64 {
    let units = bill.units_consumed();
    if units > 0 {
        bill.electricity_charges / units as f64
    } else {
        0.0
    }
}

/// Plain text receipt for a bill, with payment details when a payment is given.
#[must_use]
pub fn format_receipt(
    tenant: &Tenant,
    bill: &Bill,
    payment: Option<&Payment>,
    settings: &ReceiptSettings,
) -> String {
    let money = |amount: f64| format_currency(amount, &settings.currency_symbol);
    let line = |label: &str, value: String| format!("{label:<22}{value:>18}");

    let mut lines = vec![
        settings.business_name.to_uppercase(),
        "RENT RECEIPT".to_string(),
        RULE.to_string(),
        format!("Bill No: {}", bill.id),
        format!("Tenant: {}", tenant.name),
        format!("Room: {}", tenant.room_number),
        format!("Period: {}", period_range_label(&bill.billing_period)),
        format!("Bill Date: {}", format_date(bill.bill_date)),
        format!("Due Date: {}", format_date(bill.due_date)),
        RULE.to_string(),
        "ELECTRICITY".to_string(),
        line("Previous reading", bill.previous_reading.to_string()),
        line("Current reading", bill.electricity_reading.to_string()),
        line("Units consumed", bill.units_consumed().to_string()),
        line("Rate per unit", money(implied_rate(bill))),
        RULE.to_string(),
        line("Rent", money(bill.rent_amount)),
        line("Electricity", money(bill.electricity_charges)),
    ];
    if bill.adjustments != 0.0 {
        lines.push(line("Adjustment", money(bill.adjustments)));
    }
    lines.push(RULE.to_string());
    lines.push(line("TOTAL", money(bill.total_amount)));
    lines.push(line("Status", bill.payment_status.as_str().to_uppercase()));

    if let Some(payment) = payment {
        lines.push(RULE.to_string());
        lines.push("PAYMENT".to_string());
        lines.push(line("Amount paid", money(payment.amount)));
        lines.push(line("Paid on", format_date(payment.payment_date)));
        lines.push(line("Method", payment.payment_method.label().to_string()));
        if let Some(notes) = &payment.notes {
            lines.push(format!("Notes: {notes}"));
        }
    }

    lines.push(RULE.to_string());
    lines.push("Thank you!".to_string());
    lines.join("\n")
}

/// Chat formatted bill summary, using `*bold*` markup.
#[must_use]
pub fn format_share_message(tenant: &Tenant, bill: &Bill, settings: &ReceiptSettings) -> String {
    let money = |amount: f64| format_currency(amount, &settings.currency_symbol);

    let mut lines = vec![
        format!("*{}*", settings.business_name),
        format!("Hello {},", tenant.name),
        String::new(),
        format!(
            "Your bill for *{}* (Room {}):",
            period_range_label(&bill.billing_period),
            tenant.room_number
        ),
        format!("Rent: {}", money(bill.rent_amount)),
        format!(
            "Electricity: {} ({} units, {} to {})",
            money(bill.electricity_charges),
            bill.units_consumed(),
            bill.previous_reading,
            bill.electricity_reading
        ),
    ];
    if bill.adjustments != 0.0 {
        lines.push(format!("Adjustment: {}", money(bill.adjustments)));
    }
    lines.push(format!("*Total: {}*", money(bill.total_amount)));
    lines.push(format!("Due by: {}", format_date(bill.due_date)));
    lines.push(format!("Status: {}", bill.payment_status.as_str().to_uppercase()));
    lines.join("\n")
}

/// Keeps only the digits of a phone number and prefixes `country_code` when
/// exactly ten remain. Returns `None` when there are no digits.
#[must_use]
pub fn normalize_phone(raw: &str, country_code: &str) -> Option<String> {
    let digits = raw
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    match digits.len() {
        0 => None,
        10 => Some(format!("{country_code}{digits}")),
        _ => Some(digits),
    }
}

/// Deep link that opens the messaging app with `body` addressed to `phone`,
/// as `<scheme>://send?recipient=<phone>&body=<text>`.
///
/// # Errors
/// Returns a validation error when the phone number has no digits and a
/// configuration error when the configured scheme does not form a valid URL.
pub fn share_link(settings: &ReceiptSettings, phone: &str, body: &str) -> Result<Url> {
    let phone = normalize_phone(phone, &settings.country_code)
        .ok_or_else(|| Error::validation(format!("Phone number '{phone}' has no digits")))?;

    Url::parse_with_params(
        &format!("{}://send", settings.share_scheme),
        &[("recipient", phone.as_str()), ("body", body)],
    )
    .map_err(|e| Error::Config {
        message: format!("Invalid share scheme '{}': {e}", settings.share_scheme),
    })
}

/// Share link carrying the bill summary to the tenant's own number.
///
/// # Errors
/// See [`share_link`].
pub fn bill_share_link(tenant: &Tenant, bill: &Bill, settings: &ReceiptSettings) -> Result<Url> {
    share_link(
        settings,
        &tenant.mobile,
        &format_share_message(tenant, bill, settings),
    )
}
