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

//! File I/O utilities: a size/line rotating writer and path metadata helpers.

pub use mode::Mode;
pub use path_info::PathInfo;
pub use rotating::Chunks;
pub use rotating::RotatingWriter;
pub use rotating::RotatingWriterBuilder;
pub use text::AsText;

mod mode;
mod path_info;
mod rotating;
mod text;
