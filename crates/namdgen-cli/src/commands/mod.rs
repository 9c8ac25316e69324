pub mod catalog;
pub mod generate;
pub mod preview;
pub mod verify;
