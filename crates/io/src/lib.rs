// File I/O: reading input tables, mapping them to engine records, writing reports

pub mod csv;
pub mod export;
pub mod json;
pub mod normalize;
pub mod records;
pub mod table;
pub mod xlsx;

pub use normalize::normalize;
pub use records::{load_input, prepare_config, LoadedInput};
pub use table::{read_table, write_table, Table};
