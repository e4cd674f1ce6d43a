pub use display::{Display, Frame};

mod display;
