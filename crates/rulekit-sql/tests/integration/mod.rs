//! Integration tests for the SQL WHERE front end

mod logging;
mod properties;
mod round_trip;
mod scenarios;
