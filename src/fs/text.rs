// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;
use std::fmt::Write;

/// A value that can render itself as a text fragment for
/// [`RotatingWriter::write`](crate::fs::RotatingWriter::write).
///
/// Implemented for string and primitive types; `Option` values render their
/// content, or empty text when `None`.
pub trait AsText {
    /// Append this value's textual form to `out`.
    fn write_text(&self, out: &mut String);
}

impl AsText for str {
    fn write_text(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl AsText for String {
    fn write_text(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl AsText for Cow<'_, str> {
    fn write_text(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl<T: AsText + ?Sized> AsText for &T {
    fn write_text(&self, out: &mut String) {
        (**self).write_text(out);
    }
}

impl<T: AsText> AsText for Option<T> {
    fn write_text(&self, out: &mut String) {
        if let Some(value) = self {
            value.write_text(out);
        }
    }
}

macro_rules! impl_as_text_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsText for $ty {
                fn write_text(&self, out: &mut String) {
                    let _ = write!(out, "{self}");
                }
            }
        )*
    };
}

impl_as_text_primitive![
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: impl AsText) -> String {
        let mut out = String::new();
        value.write_text(&mut out);
        out
    }

    #[test]
    fn test_strings_and_primitives() {
        assert_eq!(render("plain"), "plain");
        assert_eq!(render(String::from("owned")), "owned");
        assert_eq!(render(42u32), "42");
        assert_eq!(render(-7i64), "-7");
        assert_eq!(render(true), "true");
        assert_eq!(render(1.5f64), "1.5");
    }

    #[test]
    fn test_none_renders_empty() {
        assert_eq!(render(Option::<&str>::None), "");
        assert_eq!(render(Some("present")), "present");
        assert_eq!(render(Some(3u8)), "3");
    }
}
