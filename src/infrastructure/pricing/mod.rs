pub mod gecko;
