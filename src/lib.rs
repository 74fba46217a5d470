pub mod colors;
pub mod error;
pub mod html;
pub mod layout;
pub mod network;
pub mod pipeline;
pub mod progress;
pub mod raster;
pub mod render;
pub mod svg;
pub mod table;
pub mod view;
