//! Parsing of the `Received` email trace field.
//!
//! ```
//! use received_field::ReceivedField;
//!
//! let field = ReceivedField::new(
//!     "from mx.example.com ([192.0.2.1]) by mail.example.org; Tue, 10 May 2005 17:26:50 -0500 (EST)",
//! );
//! assert_eq!(field.info(), "from mx.example.com ([192.0.2.1]) by mail.example.org");
//! assert_eq!(
//!     field.formatted_date().as_deref(),
//!     Some("Tue, 10 May 2005 17:26:50 -0500")
//! );
//! ```

pub mod email;

pub use email::error::EmailError;
pub use email::headers::received::{
    DateSource, ParsedReceived, ReceivedDate, ReceivedField, FIELD_NAME,
};
pub use email::parse::received::{SplitKind, SplitOutcome};
