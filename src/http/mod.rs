//! HTTP protocol layer module
//!
//! Response construction shared by the router and the wiki handlers.

pub mod response;

pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_415_response, build_500_response, build_html_response, build_redirect_response,
};
