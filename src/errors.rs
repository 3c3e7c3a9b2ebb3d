use fractic_server_error::{define_client_error, define_internal_error};
use rust_decimal::Decimal;

use crate::entities::Month;

// IO-related.
define_client_error!(ReadError, "Error reading file.");

// Parsing-related.
define_client_error!(InvalidCsv, "Invalid CSV format.");
define_client_error!(InvalidCsvContent, "Invalid CSV content: {details}.", { details: &str });
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });
define_client_error!(InvalidIsoDate, "Invalid ISO date: {date}.", { date: &str });
define_client_error!(InvalidIsoCurrencyCode, "Invalid ISO currency code: {code}.", { code: &str });
define_client_error!(InvalidMonth, "Invalid month: '{value}'. Expected 1-12 or a month name.", { value: &str });
define_client_error!(InvalidFormJson, "Invalid form input (expected a JSON object of field values).");

// Ledger-related.
define_client_error!(
    InvalidSequence,
    "Invalid monthly record sequence: {details}.",
    { details: &str }
);
define_client_error!(
    InvalidAmount,
    "Invalid payment amount ({amount}). Payments must be non-negative.",
    { amount: &Decimal }
);

// Persistence-related.
define_internal_error!(
    PersistenceFailed,
    "Failed to save ledger record for {month:?}.",
    { month: &Month }
);
define_client_error!(
    RecordAlreadyExists,
    "A ledger record for {month:?} {year} already exists.",
    { month: &Month, year: i32 }
);
define_client_error!(
    RecordNotFound,
    "No ledger record for {month:?} {year}.",
    { month: &Month, year: i32 }
);
