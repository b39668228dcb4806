//! Session plumbing: how a login becomes a pair of cookies.
//!
//! [`password`] checks the credential, [`jwt`] mints the tokens, and
//! [`cookies`] puts them on the response. The handlers in
//! `handlers::auth` glue the three together.

pub mod cookies;
pub mod jwt;
pub mod password;
