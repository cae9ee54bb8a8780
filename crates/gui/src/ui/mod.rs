pub mod layout;

pub use layout::{Button, Layout, Rect};
