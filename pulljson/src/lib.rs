// SPDX-License-Identifier: Apache-2.0

//! A pull-style JSON decoder for callers that know the shape of their data.
//!
//! Instead of producing a tree or a stream of events, [`Decoder`] is driven by
//! typed reads issued in the order the caller expects values to appear:
//! open a container, read each member with the matching call, close the
//! container. Validation happens on demand as the reads progress.
//!
//! The first error of a session is latched and returned by every later call,
//! so a chain of reads can be checked once at the end with
//! [`Decoder::end`], or short-circuited with `?` inside [`decode`].
//!
//! ```
//! use pulljson::{decode, ValueType};
//!
//! let names = decode(r#"{"users": [{"name": "ada"}, {"name": "grace"}]}"#, |d| {
//!     let mut names = Vec::new();
//!     d.open_object()?;
//!     while d.has_more() {
//!         if d.read_str()? == "users" && d.peek() == Some(ValueType::Array) {
//!             d.open_array()?;
//!             while d.has_more() {
//!                 d.open_object()?;
//!                 d.read_str()?;
//!                 names.push(d.read_string()?);
//!                 d.close_object()?;
//!             }
//!             d.close_array()?;
//!         } else {
//!             d.skip_value()?;
//!         }
//!     }
//!     d.close_object()?;
//!     Ok(names)
//! });
//! assert_eq!(names.unwrap(), ["ada", "grace"]);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[cfg(all(feature = "std", not(test)))]
extern crate std;

mod copy_on_escape;

mod decoder;
pub use decoder::{decode, Decoder};

mod escape_processor;

mod int_parser;

mod level_stack;

mod number_parser;

mod parse_error;
pub use parse_error::{ErrKind, ErrorClass, ParseError};

mod shared;
pub use shared::{DecoderConfig, ValueType, DEFAULT_MAX_DEPTH};

mod slice_input_buffer;
