pub mod issue;
pub mod record;
