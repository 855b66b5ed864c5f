pub mod email;
pub mod mint;
