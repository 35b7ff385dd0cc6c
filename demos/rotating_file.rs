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

use hannah::append::RotatingFile;
use hannah::append::Stderr;
use hannah::fs::RotatingWriter;
use log::LevelFilter;

fn main() {
    let writer = RotatingWriter::builder()
        .max_bytes(1024)
        .open("logs/example.log")
        .unwrap();

    hannah::setup()
        .level(LevelFilter::Trace)
        .handler(RotatingFile::new(writer))
        .handler(Stderr::new())
        .apply()
        .unwrap();

    for i in 0..16 {
        log::info!("Hello info, round {i}!");
        log::debug!("Hello debug, round {i}!");
    }
}
