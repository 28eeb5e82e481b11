//
// Copyright 2026 lazybson Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

mod builder;
mod de;
mod document;
mod error;
mod json;
mod raw;

pub mod value;
pub use value::{Regex, Value};

pub use builder::{ArrayBuf, ArrayBuilder, DocumentBuf, DocumentBuilder};
pub use de::{from_slice, Deserializer};
pub use document::{ElementType, PayloadLayout};
pub use error::{Error, Result};
pub use raw::{Elements, Items, RawArray, RawDocument};
