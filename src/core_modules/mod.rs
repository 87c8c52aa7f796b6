pub mod feature;
pub mod motion;
pub mod region;
pub mod segmenter;
