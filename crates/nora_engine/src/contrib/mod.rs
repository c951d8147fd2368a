//! Ready-made gameplay components built only on the public engine API

pub mod player_controller;

pub use player_controller::PlayerController;
