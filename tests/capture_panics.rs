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

#[test]
fn test_panics_are_logged_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panics.log");

    hannah::setup()
        .filename(&path)
        .capture_panics(true)
        .apply()
        .unwrap();

    let result = std::panic::catch_unwind(|| panic!("kaboom"));
    assert!(result.is_err());

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("ERROR"), "no error line in {content:?}");
    assert!(content.contains("kaboom"));
}
