pub mod one_inch;
