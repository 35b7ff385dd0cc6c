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

use log::LevelFilter;

// The global logger installs once per process, so this binary holds a single
// scenario.
#[test]
fn test_setup_with_filename_delivers_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");

    hannah::setup()
        .level(LevelFilter::Debug)
        .filename(&path)
        .apply()
        .unwrap();

    log::info!("visible info");
    log::debug!("visible debug");
    log::trace!("invisible trace");
    log::logger().flush();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("visible info"));
    assert!(content.contains("visible debug"));
    assert!(!content.contains("invisible trace"));
    assert!(content.contains(" INFO "), "level missing in {content:?}");
    assert!(!content.contains('\x1b'), "file lines must stay colorless");
}
