pub mod armaments;
pub mod roll;
pub mod simulate;
