//! HTTP protocol layer module
//!
//! Status responses sent by the request handler.

pub mod response;

pub use response::{
    build_404_response, build_405_response, build_415_response, build_500_response,
    build_error_response, build_options_response,
};
