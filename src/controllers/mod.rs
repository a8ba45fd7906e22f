pub mod root;
pub mod song;
