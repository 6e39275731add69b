#[macro_use]
extern crate approx;
extern crate nalgebra as na;

mod components;
mod curves;
mod darts;
mod documents;
mod malformed;
mod robustness;
mod two_panels;
