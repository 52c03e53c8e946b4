pub mod health;
pub mod next_word;
