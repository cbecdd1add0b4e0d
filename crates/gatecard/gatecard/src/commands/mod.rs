//! Command builders and response parsers for the protocol instruction set
//!
//! Each module builds the wire frame for one instruction and, where the
//! instruction has a payload-bearing success response, parses it back
//! into protocol types. Status-word interpretation stays with the caller.

pub mod get_attribute;
pub mod get_key;
pub mod initialise;
pub mod personalise;
pub mod select;
