// Core modules implementing region decoding, schema projection, encoding, and error modeling.
pub mod decode;
pub mod encode;
pub mod error;
pub mod layout;
pub mod record;
pub mod save;
pub mod schema;
pub mod table;
