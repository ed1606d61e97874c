// Catalog: typed book records and the loosely-typed table they come from.

pub mod loader;
pub mod models;
pub mod table;
