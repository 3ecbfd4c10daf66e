//! guildsignup
//! ===========
//!
//! Tracks who's signed up for a guild event, and which team organizers have put them on.
//!
//! Members register through a chat front end, which calls into `logic::signup` and
//! `logic::export`. Organizers assign teams through the roster page served by `router`. Both
//! read and write the one `signups` table through `dal`; there's no other state.
//!
//! Hacking
//! -------
//!
//! This follows the approach laid out in
//! ["Stateless MVC"](https://www.tedinski.com/2018/09/11/stateless-mvc.html). Ignore the "Should
//! you use this design?" section...
#![deny(
    bad_style,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    while_true
)]
#![warn(unused, unused_results)]

#[macro_use]
pub mod util;

pub mod dal;
pub mod logic;
pub mod router;
pub mod schema;
pub mod view;
