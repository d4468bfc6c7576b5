pub mod appointment;
pub mod client;
pub mod enums;
pub mod finance;
pub mod health_declaration;
pub mod personal_event;

pub use appointment::*;
pub use client::*;
pub use finance::*;
pub use health_declaration::*;
pub use personal_event::*;
