pub mod adf;
pub mod sprint_field;
