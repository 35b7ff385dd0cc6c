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

/// The key-value key whose value replaces the message as an attached failure.
pub(crate) const ERR_KEY: &str = "err";

/// A helper struct to format log's key-value pairs.
///
/// Renders every pair as ` key=value`, except the [`ERR_KEY`] pair, which the
/// stack layout substitutes for the message instead.
pub(crate) struct KvDisplay<'kvs> {
    kv: &'kvs dyn log::kv::Source,
}

impl<'kvs> KvDisplay<'kvs> {
    pub(crate) fn new(kv: &'kvs dyn log::kv::Source) -> Self {
        Self { kv }
    }
}

impl std::fmt::Display for KvDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut visitor = KvWriter { writer: f };
        self.kv.visit(&mut visitor).ok();
        Ok(())
    }
}

struct KvWriter<'a, 'kvs> {
    writer: &'kvs mut std::fmt::Formatter<'a>,
}

impl<'kvs> log::kv::Visitor<'kvs> for KvWriter<'_, 'kvs> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        if key.as_str() != ERR_KEY {
            write!(self.writer, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Extract the attached failure's rendering, if the record carries one.
pub(crate) fn find_error(kv: &dyn log::kv::Source) -> Option<String> {
    struct ErrFinder {
        err: Option<String>,
    }

    impl<'kvs> log::kv::Visitor<'kvs> for ErrFinder {
        fn visit_pair(
            &mut self,
            key: log::kv::Key<'kvs>,
            value: log::kv::Value<'kvs>,
        ) -> Result<(), log::kv::Error> {
            if self.err.is_none() && key.as_str() == ERR_KEY {
                self.err = Some(value.to_string());
            }
            Ok(())
        }
    }

    let mut finder = ErrFinder { err: None };
    kv.visit(&mut finder).ok();
    finder.err
}
