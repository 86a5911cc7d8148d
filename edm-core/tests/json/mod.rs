//! JSON transport tests

mod transport;
