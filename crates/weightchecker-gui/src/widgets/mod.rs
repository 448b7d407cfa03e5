/// UI widgets for WeightChecker.

pub mod entry_table;
pub mod status_bar;
pub mod toolbar;
