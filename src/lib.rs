pub mod compute;
pub mod controller;
pub mod display;
pub mod driver;
pub mod entities;
