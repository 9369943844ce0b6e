pub mod audio;
pub mod draw;
pub mod pixel;
pub mod scores;
pub mod screens;
pub mod session;
pub mod world;
