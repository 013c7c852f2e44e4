pub mod player;
pub mod round;
pub mod score;
pub mod settings;
